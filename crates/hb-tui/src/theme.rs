//! Terminal color theme
//!
//! Maps the engine's abstract colours to terminal colours, with palettes for
//! dark and light backgrounds. Auto-detects via COLORFGBG, or HB_LIGHT_BG=1.

use hb_core::io::Color as UiColor;
use ratatui::style::Color;

/// Color theme for the power menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Ready entries and plain text
    pub text: Color,
    /// Entries that cannot be chosen now
    pub text_dim: Color,
    /// Known but unaffordable
    pub warning: Color,
    pub accent: Color,
    pub header: Color,
    pub bad: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark terminal background theme (default)
    pub fn dark() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::DarkGray,
            warning: Color::Rgb(255, 165, 0),
            accent: Color::LightBlue,
            header: Color::Yellow,
            bad: Color::Red,
        }
    }

    /// Light terminal background theme
    pub fn light() -> Self {
        Self {
            text: Color::Black,
            text_dim: Color::Gray,
            warning: Color::Rgb(205, 102, 0),
            accent: Color::Blue,
            header: Color::Magenta,
            bad: Color::Red,
        }
    }

    /// Pick a theme from the environment
    pub fn detect() -> Self {
        if Self::is_light_background() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Terminal colour for an engine colour
    pub fn color(&self, color: UiColor) -> Color {
        match color {
            UiColor::White => self.text,
            UiColor::Slate => self.text_dim,
            UiColor::Orange => self.warning,
            UiColor::Yellow => self.header,
            UiColor::LightBlue => self.accent,
            UiColor::Red => self.bad,
        }
    }

    fn is_light_background() -> bool {
        if let Ok(val) = std::env::var("HB_LIGHT_BG") {
            return val == "1" || val.eq_ignore_ascii_case("true");
        }

        // "fg;bg" colour indices; light backgrounds use 7 or 9..=15
        if let Ok(colorfgbg) = std::env::var("COLORFGBG")
            && let Some(bg_str) = colorfgbg.rsplit(';').next()
            && let Ok(bg_idx) = bg_str.parse::<u8>()
        {
            return matches!(bg_idx, 7 | 9..=15);
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_mapping() {
        let theme = Theme::dark();
        assert_eq!(theme.color(UiColor::White), Color::White);
        assert_eq!(theme.color(UiColor::Slate), Color::DarkGray);
        assert_ne!(theme.color(UiColor::Orange), theme.color(UiColor::White));
    }

    #[test]
    fn test_light_theme_keeps_text_visible() {
        let theme = Theme::light();
        assert_eq!(theme.color(UiColor::White), Color::Black);
    }
}
