/// What a tab shows when selected.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Screen {
    /// The single "Fish Caught!" button that reports the current position.
    Reporter,
    /// Placeholder for a map view.
    Map,
}

/// Tint applied to the selected tab.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum AccentColor {
    /// The green used by the mobile client.
    #[default]
    SystemGreen,
}

impl AccentColor {
    /// ANSI escape selecting this colour.
    pub fn ansi(&self) -> &'static str {
        match self {
            AccentColor::SystemGreen => "\x1b[1;32m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// One entry in the tab bar.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Tab {
    /// Label shown in the tab bar.
    pub title: &'static str,
    /// SF Symbol name, kept for parity with the mobile client.
    pub symbol: &'static str,
    /// Identifies the tab for [`TabHost::select`].
    pub tag: u8,
    /// What the tab shows.
    pub screen: Screen,
}

/// Composes the reporting screen and the map placeholder.
#[derive(Debug, Clone)]
pub struct TabHost {
    tabs: [Tab; 2],
    selected: usize,
    accent: AccentColor,
}

impl Default for TabHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TabHost {
    /// The reporting tab followed by the map tab, reporting selected.
    pub fn new() -> Self {
        Self {
            tabs: [
                Tab {
                    title: "Button",
                    symbol: "archivebox",
                    tag: 0,
                    screen: Screen::Reporter,
                },
                Tab {
                    title: "Map",
                    symbol: "mappin.and.ellipse",
                    tag: 1,
                    screen: Screen::Map,
                },
            ],
            selected: 0,
            accent: AccentColor::SystemGreen,
        }
    }

    /// All tabs in display order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Tint of the selected tab.
    pub fn accent(&self) -> AccentColor {
        self.accent
    }

    /// The tab currently shown.
    pub fn selected(&self) -> &Tab {
        &self.tabs[self.selected]
    }

    /// Switch to the tab carrying `tag`. Unknown tags leave the selection alone.
    pub fn select(&mut self, tag: u8) -> Option<&Tab> {
        let index = self.tabs.iter().position(|tab| tab.tag == tag)?;
        self.selected = index;
        Some(&self.tabs[index])
    }

    /// The tab bar as one line, selected entry bracketed and tinted.
    pub fn render(&self) -> String {
        self.tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                if index == self.selected {
                    format!("{}[{}]{}", self.accent.ansi(), tab.title, RESET)
                } else {
                    format!(" {} ", tab.title)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tabs_reporter_first() {
        let host = TabHost::new();

        assert_eq!(host.tabs().len(), 2);
        assert_eq!(host.tabs()[0].screen, Screen::Reporter);
        assert_eq!(host.tabs()[0].title, "Button");
        assert_eq!(host.tabs()[1].screen, Screen::Map);
        assert_eq!(host.tabs()[1].title, "Map");
        assert_eq!(host.selected().screen, Screen::Reporter);
        assert_eq!(host.accent(), AccentColor::SystemGreen);
    }

    #[test]
    fn test_select_by_tag() {
        let mut host = TabHost::new();

        assert_eq!(host.select(1).map(|tab| tab.screen), Some(Screen::Map));
        assert_eq!(host.selected().screen, Screen::Map);

        assert_eq!(host.select(7), None);
        assert_eq!(host.selected().screen, Screen::Map);

        host.select(0);
        assert_eq!(host.selected().screen, Screen::Reporter);
    }

    #[test]
    fn test_render_highlights_selection() {
        let mut host = TabHost::new();
        assert!(host.render().contains("[Button]"));
        assert!(!host.render().contains("[Map]"));

        host.select(1);
        let bar = host.render();
        assert!(bar.contains("[Map]"));
        assert!(bar.contains(AccentColor::SystemGreen.ansi()));
    }
}
