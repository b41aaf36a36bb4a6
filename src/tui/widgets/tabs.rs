//! Channel tab bar for dashboard filtering

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::SourceFilter;
use crate::tui::theme::Theme;

/// Channel tabs; every tab shows the same dashboard over a filtered subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceTab {
    #[default]
    Consolidated,
    Facebook,
    Instagram,
}

impl SourceTab {
    /// Get the display label for this tab
    pub fn label(self) -> &'static str {
        match self {
            Self::Consolidated => "Consolidated",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
        }
    }

    /// Get all tabs in order
    pub fn all() -> &'static [SourceTab] {
        &[
            SourceTab::Consolidated,
            SourceTab::Facebook,
            SourceTab::Instagram,
        ]
    }

    /// Get the next tab (wrapping)
    pub fn next(self) -> Self {
        match self {
            Self::Consolidated => Self::Facebook,
            Self::Facebook => Self::Instagram,
            Self::Instagram => Self::Consolidated,
        }
    }

    /// Get the previous tab (wrapping)
    pub fn prev(self) -> Self {
        match self {
            Self::Consolidated => Self::Instagram,
            Self::Facebook => Self::Consolidated,
            Self::Instagram => Self::Facebook,
        }
    }

    /// Get tab from number key (1-3)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Consolidated),
            2 => Some(Self::Facebook),
            3 => Some(Self::Instagram),
            _ => None,
        }
    }

    /// The record filter this tab represents
    pub fn filter(self) -> SourceFilter {
        match self {
            Self::Consolidated => SourceFilter::All,
            Self::Facebook => SourceFilter::only("facebook"),
            Self::Instagram => SourceFilter::only("instagram"),
        }
    }
}

/// Tab bar widget showing the channel tabs
pub struct TabBar {
    selected: SourceTab,
    theme: Theme,
}

impl TabBar {
    pub fn new(selected: SourceTab, theme: Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Calculate total width of all tabs for centering
        let total_width: u16 = SourceTab::all()
            .iter()
            .map(|tab| {
                let label = tab.label();
                let display_len = if *tab == self.selected {
                    label.len() + 2 // "[label]"
                } else {
                    label.len()
                };
                display_len as u16 + 2 // + spacing
            })
            .sum::<u16>()
            .saturating_sub(2); // Remove trailing spacing

        // Center the tabs
        let start_x = area.x + (area.width.saturating_sub(total_width)) / 2;
        let mut x = start_x;

        for tab in SourceTab::all() {
            let is_selected = *tab == self.selected;
            let label = tab.label();

            let display = if is_selected {
                format!("[{}]", label)
            } else {
                label.to_string()
            };

            let display_len = display.len() as u16;
            if x + display_len > area.x + area.width {
                break;
            }

            let style = if is_selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };

            buf.set_string(x, area.y, &display, style);
            x += display_len + 2; // Add spacing between tabs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_labels() {
        assert_eq!(SourceTab::Consolidated.label(), "Consolidated");
        assert_eq!(SourceTab::Facebook.label(), "Facebook");
        assert_eq!(SourceTab::Instagram.label(), "Instagram");
    }

    #[test]
    fn test_tab_all() {
        let all = SourceTab::all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], SourceTab::Consolidated);
        assert_eq!(all[1], SourceTab::Facebook);
        assert_eq!(all[2], SourceTab::Instagram);
    }

    #[test]
    fn test_tab_next_wraps() {
        assert_eq!(SourceTab::Consolidated.next(), SourceTab::Facebook);
        assert_eq!(SourceTab::Facebook.next(), SourceTab::Instagram);
        assert_eq!(SourceTab::Instagram.next(), SourceTab::Consolidated);
    }

    #[test]
    fn test_tab_prev_wraps() {
        assert_eq!(SourceTab::Consolidated.prev(), SourceTab::Instagram);
        assert_eq!(SourceTab::Instagram.prev(), SourceTab::Facebook);
        assert_eq!(SourceTab::Facebook.prev(), SourceTab::Consolidated);
    }

    #[test]
    fn test_tab_from_number() {
        assert_eq!(SourceTab::from_number(1), Some(SourceTab::Consolidated));
        assert_eq!(SourceTab::from_number(2), Some(SourceTab::Facebook));
        assert_eq!(SourceTab::from_number(3), Some(SourceTab::Instagram));
        assert_eq!(SourceTab::from_number(0), None);
        assert_eq!(SourceTab::from_number(4), None);
    }

    #[test]
    fn test_tab_filter() {
        assert_eq!(SourceTab::Consolidated.filter(), SourceFilter::All);
        assert_eq!(
            SourceTab::Facebook.filter(),
            SourceFilter::only("facebook")
        );
    }

    #[test]
    fn test_tab_default() {
        assert_eq!(SourceTab::default(), SourceTab::Consolidated);
    }
}
