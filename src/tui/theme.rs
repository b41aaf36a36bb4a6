//! Terminal theme detection and color definitions

use crate::services::ThemePreference;
use ratatui::style::Color;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Resolve a persisted preference; Auto detects the terminal
    pub fn from_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Auto => Self::detect(),
            ThemePreference::Dark => Self::Dark,
            ThemePreference::Light => Self::Light,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected tabs, keybinding keys)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, inactive tabs, hints)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Date/period text color
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Cost/money text color
    pub fn cost(self) -> Color {
        match self {
            Self::Dark => Color::Magenta,
            Self::Light => Color::Indexed(90), // dark magenta (ANSI 256)
        }
    }

    /// Qualified leads / positive indicator color
    pub fn qualified(self) -> Color {
        match self {
            Self::Dark => Color::Green,
            Self::Light => Color::Indexed(22), // dark green (ANSI 256)
        }
    }

    /// Disqualified leads / error color
    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Stats accent color (Qualification Rate card)
    pub fn stat_blue(self) -> Color {
        match self {
            Self::Dark => Color::Blue,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Stats warm highlight (Total Spend card)
    pub fn stat_warm(self) -> Color {
        match self {
            Self::Dark => Color::LightRed,
            Self::Light => Color::Red,
        }
    }

    /// Positional breakdown slice color; cycles when there are more slices
    /// than palette entries
    pub fn slice_color(self, index: usize) -> Color {
        const DARK: [Color; 6] = [
            Color::Blue,
            Color::Green,
            Color::Yellow,
            Color::Indexed(99),  // violet (ANSI 256)
            Color::Indexed(205), // pink (ANSI 256)
            Color::Indexed(135), // purple (ANSI 256)
        ];
        const LIGHT: [Color; 6] = [
            Color::Indexed(25),  // dark blue
            Color::Indexed(22),  // dark green
            Color::Indexed(130), // dark orange
            Color::Indexed(54),  // dark violet
            Color::Indexed(161), // dark pink
            Color::Indexed(90),  // dark purple
        ];
        match self {
            Self::Dark => DARK[index % DARK.len()],
            Self::Light => LIGHT[index % LIGHT.len()],
        }
    }
}
