//! Theme presets
//!
//! The application owns exactly one [`Theme`] and hands it to every page on
//! each draw, so a theme change reaches all pages without any page storing it.

use ratatui::style::{Color, Modifier, Style};

use crate::error::{CoreError, CoreResult};

/// Complete theme definition
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Theme display name
    pub name: String,
    /// Color palette
    pub colors: ThemeColors,
}

/// Color palette for the theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    /// Main background color
    pub background: Color,
    /// Main foreground/text color
    pub foreground: Color,
    /// Accent color for highlights and active tabs
    pub accent: Color,
    /// Error indicators
    pub error: Color,
    /// Pending indicators
    pub warning: Color,
    /// Success indicators
    pub success: Color,
    /// Muted/secondary text
    pub muted: Color,
    /// Status bar and selected tab background
    pub selection: Color,
}

impl Theme {
    /// Dark theme, the default
    pub fn dark() -> Self {
        Theme {
            name: "Dark".to_string(),
            colors: ThemeColors {
                background: Color::Rgb(30, 30, 46),
                foreground: Color::Rgb(205, 214, 244),
                accent: Color::Rgb(137, 180, 250),
                error: Color::Rgb(243, 139, 168),
                warning: Color::Rgb(249, 226, 175),
                success: Color::Rgb(166, 227, 161),
                muted: Color::Rgb(108, 112, 134),
                selection: Color::Rgb(49, 50, 68),
            },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Theme {
            name: "Light".to_string(),
            colors: ThemeColors {
                background: Color::Rgb(239, 241, 245),
                foreground: Color::Rgb(76, 79, 105),
                accent: Color::Rgb(30, 102, 245),
                error: Color::Rgb(210, 15, 57),
                warning: Color::Rgb(223, 142, 29),
                success: Color::Rgb(64, 160, 43),
                muted: Color::Rgb(140, 143, 161),
                selection: Color::Rgb(204, 208, 218),
            },
        }
    }

    /// Looks up a preset by case-insensitive name.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownTheme` for names without a preset.
    pub fn by_name(name: &str) -> CoreResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::dark()),
            "light" => Ok(Theme::light()),
            _ => Err(CoreError::UnknownTheme(name.to_string())),
        }
    }

    /// Returns the opposite preset.
    pub fn toggled(&self) -> Self {
        if self.name == "Light" {
            Theme::dark()
        } else {
            Theme::light()
        }
    }

    /// Base style for text on the theme background
    pub fn base(&self) -> Style {
        Style::default()
            .fg(self.colors.foreground)
            .bg(self.colors.background)
    }

    /// Style for highlighted, bold text
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for secondary text
    pub fn muted(&self) -> Style {
        Style::default().fg(self.colors.muted)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}
