use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::location::LocationProvider;

mod reporter;
mod tabs;

pub use reporter::ReporterScreen;
pub use tabs::{AccentColor, Screen, Tab, TabHost};

/// A line typed into the terminal front end.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Command {
    /// Press the button on the current screen.
    Tap,
    /// Switch to the tab with this tag.
    Select(u8),
    /// Leave the application.
    Quit,
    /// Anything else.
    Unknown(String),
}

impl Command {
    /// Interpret one input line. An empty line taps the button.
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "tap" => Command::Tap,
            "1" | "button" => Command::Select(0),
            "2" | "map" => Command::Select(1),
            "q" | "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Whether the input loop keeps going.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Step {
    /// Wait for the next command.
    Continue,
    /// Stop reading input.
    Quit,
}

/// The tab host wired to a reporting screen.
pub struct App<P> {
    tabs: TabHost,
    reporter: ReporterScreen<P>,
}

impl<P: LocationProvider> App<P> {
    /// Build the tab host and load the reporting screen, which prompts for location access.
    pub fn new(reporter: ReporterScreen<P>) -> Self {
        reporter.load();
        Self {
            tabs: TabHost::new(),
            reporter,
        }
    }

    /// The tab host, for inspecting the current selection.
    pub fn tabs(&self) -> &TabHost {
        &self.tabs
    }

    /// Apply one command. Taps go to the reporting screen only.
    pub fn handle(&mut self, command: Command) -> Step {
        match command {
            Command::Tap => self.tap(),
            Command::Select(tag) => {
                if self.tabs.select(tag).is_none() {
                    debug!(tag, "no tab with this tag");
                }
            }
            Command::Quit => return Step::Quit,
            Command::Unknown(input) => debug!(%input, "ignoring unrecognised input"),
        }
        Step::Continue
    }

    fn tap(&self) {
        if self.tabs.selected().screen != Screen::Reporter {
            debug!("nothing to tap on this screen");
            return;
        }

        // the button gives no feedback; the outcome only shows up in the log
        match self.reporter.submit_current_location() {
            Ok(handle) => debug!(id = handle.id(), "report in flight"),
            Err(error) => warn!(%error, "could not report location"),
        }
    }

    /// The tab bar followed by the selected screen's content.
    pub fn render(&self) -> String {
        let body = match self.tabs.selected().screen {
            Screen::Reporter => "( Fish Caught! )   press enter to report your position",
            Screen::Map => "map view is not available yet",
        };
        format!("{}\n{}\n", self.tabs.render(), body)
    }

    /// Drive the app from `input` until it ends or a quit command arrives,
    /// redrawing to `output` after every command.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        output.write_all(self.render().as_bytes()).await?;
        output.flush().await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if self.handle(Command::parse(&line)) == Step::Quit {
                break;
            }
            output.write_all(self.render().as_bytes()).await?;
            output.flush().await?;
        }

        info!("leaving the reporter");
        Ok(())
    }
}
