//! Theme system for the TUI
//!
//! Provides color schemes and styling for all UI components.

use ratatui::style::Color;

use crate::api::Priority;

/// Theme colors for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg_main: Color,
    pub bg_dark: Color,
    pub bg_highlight: Color,

    // Border colors
    pub border: Color,
    pub border_focused: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Accent colors
    pub cyan: Color,
    pub blue: Color,
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
    pub purple: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default)
    pub fn catppuccin_mocha() -> Self {
        Self {
            bg_main: Color::Rgb(30, 30, 46),
            bg_dark: Color::Rgb(24, 24, 37),
            bg_highlight: Color::Rgb(49, 50, 68),

            border: Color::Rgb(49, 50, 68),
            border_focused: Color::Rgb(137, 180, 250),

            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(166, 173, 200),
            text_muted: Color::Rgb(108, 112, 134),

            cyan: Color::Rgb(148, 226, 213),
            blue: Color::Rgb(137, 180, 250),
            green: Color::Rgb(166, 227, 161),
            yellow: Color::Rgb(249, 226, 175),
            red: Color::Rgb(243, 139, 168),
            purple: Color::Rgb(203, 166, 247),
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            bg_main: Color::Rgb(46, 52, 64),      // nord0
            bg_dark: Color::Rgb(40, 44, 52),      // darker variant
            bg_highlight: Color::Rgb(59, 66, 82), // nord1

            border: Color::Rgb(76, 86, 106),           // nord3
            border_focused: Color::Rgb(136, 192, 208), // nord8

            text_primary: Color::Rgb(236, 239, 244),   // nord6
            text_secondary: Color::Rgb(229, 233, 240), // nord5
            text_muted: Color::Rgb(143, 157, 179),     // nord4

            cyan: Color::Rgb(136, 192, 208),   // nord8
            blue: Color::Rgb(129, 161, 193),   // nord9
            green: Color::Rgb(163, 190, 140),  // nord14
            yellow: Color::Rgb(235, 203, 139), // nord13
            red: Color::Rgb(191, 97, 106),     // nord11
            purple: Color::Rgb(180, 142, 173), // nord15
        }
    }

    /// Theme by config name; unknown names fall back to the default
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "nord" => Self::nord(),
            "catppuccin_mocha" | "catppuccin" => Self::catppuccin_mocha(),
            other => {
                tracing::warn!(theme = other, "Unknown theme, using catppuccin_mocha");
                Self::catppuccin_mocha()
            }
        }
    }

    /// Badge color for a story priority
    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Alta => self.red,
            Priority::Media => self.yellow,
            Priority::Baja => self.green,
        }
    }
}
