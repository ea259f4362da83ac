use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::{fs::File, io::BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fishfindr::{
    app::{App, ReporterScreen},
    config::{ReporterArgs, ReporterConfig},
    finder::FinderDevice,
    location::{CachedLocation, Fix, NmeaFeed},
    server::{ReportingServer, SubmissionOutcome},
};

/// How long `report` waits for an NMEA source to produce its first fix.
const NMEA_FIRST_FIX_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(about = "Report where the fish are biting")]
struct CliParser {
    #[command(flatten)]
    reporter: ReporterArgs,

    /// Command to execute. Defaults to `run`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Report the current position once and wait for the server to answer.
    Report,
    /// Start the interactive two-tab front end on this terminal.
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env has to be loaded before clap reads its env fallbacks and before RUST_LOG is consulted
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli_args = CliParser::parse();
    let command = cli_args.command.unwrap_or(Command::Run);
    let config = cli_args.reporter.into_config()?;

    let cache = CachedLocation::new();
    if let Some(coordinate) = config.initial_fix {
        cache.update(Fix {
            coordinate,
            timestamp: Utc::now(),
        });
    }

    match command {
        Command::Report => report_once(config, cache).await,
        Command::Run => run_interactive(config, cache).await,
    }
}

fn reporter_screen(
    config: &ReporterConfig,
    cache: CachedLocation,
) -> Result<ReporterScreen<CachedLocation>> {
    let server = ReportingServer::new(
        config.endpoint.clone(),
        config.credentials.clone(),
        config.timeout,
    )?;

    Ok(ReporterScreen::new(
        FinderDevice::new(cache, config.field_order),
        Arc::new(server),
    ))
}

async fn open_nmea(
    config: &ReporterConfig,
    cache: &CachedLocation,
) -> Result<Option<(NmeaFeed, BufReader<File>)>> {
    let Some(path) = &config.nmea else {
        return Ok(None);
    };

    let file = File::open(path)
        .await
        .with_context(|| format!("opening NMEA source {}", path.display()))?;

    Ok(Some((NmeaFeed::new(cache.clone()), BufReader::new(file))))
}

async fn report_once(config: ReporterConfig, cache: CachedLocation) -> Result<()> {
    // serial receivers never reach EOF, so only wait for the first fix
    if let Some((feed, reader)) = open_nmea(&config, &cache).await? {
        match tokio::time::timeout(NMEA_FIRST_FIX_TIMEOUT, feed.first_fix(reader)).await {
            Ok(Ok(Some(fix))) => info!(timestamp = %fix.timestamp, "read fix from NMEA source"),
            Ok(Ok(None)) => warn!("NMEA source ended without a fix"),
            Ok(Err(error)) => warn!(%error, "NMEA source failed"),
            Err(_) => warn!(
                timeout_secs = NMEA_FIRST_FIX_TIMEOUT.as_secs(),
                "no fix from NMEA source in time"
            ),
        }
    }

    let screen = reporter_screen(&config, cache)?;
    screen.load();

    let handle = screen.submit_current_location()?;
    match handle.outcome().await {
        SubmissionOutcome::Delivered { status, .. } => {
            info!(status, "done");
            Ok(())
        }
        SubmissionOutcome::Failed => bail!("location report was not delivered"),
    }
}

async fn run_interactive(config: ReporterConfig, cache: CachedLocation) -> Result<()> {
    if let Some((feed, reader)) = open_nmea(&config, &cache).await? {
        tokio::spawn(async move {
            match feed.run(reader).await {
                Ok(recorded) => warn!(recorded, "NMEA source closed"),
                Err(error) => error!(%error, "NMEA source failed"),
            }
        });
    }

    let mut app = App::new(reporter_screen(&config, cache)?);
    app.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
