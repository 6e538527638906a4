//! Status bar widget
//!
//! The [`StatusBar`] renders a three-section bar at the bottom of the
//! terminal: the active page on the left, the theme name in the center and
//! key hints on the right.
//!
//! ```ignore
//! use featuretour_ui::widgets::StatusBar;
//!
//! let status = StatusBar::new(&theme)
//!     .left("Optimistic counter")
//!     .center("Dark")
//!     .right("Tab:page  F10:help");
//! frame.render_widget(status, area);
//! ```

use featuretour_core::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Widget;

/// Status bar with left, center, and right sections
pub struct StatusBar<'a> {
    /// Left section text
    left: &'a str,
    /// Center section text
    center: &'a str,
    /// Right section text
    right: &'a str,
    /// Theme for styling
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Creates a status bar with empty sections
    pub fn new(theme: &'a Theme) -> Self {
        StatusBar {
            left: "",
            center: "",
            right: "",
            theme,
        }
    }

    /// Sets the left section, drawn bold in the accent color
    pub fn left(mut self, text: &'a str) -> Self {
        self.left = text;
        self
    }

    /// Sets the center section
    pub fn center(mut self, text: &'a str) -> Self {
        self.center = text;
        self
    }

    /// Sets the right section, drawn in the muted color
    pub fn right(mut self, text: &'a str) -> Self {
        self.right = text;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let bg = self.theme.colors.selection;
        buf.set_style(area, Style::default().bg(bg));

        let width = area.width as usize;

        if !self.left.is_empty() {
            let text = format!(" {} ", self.left);
            if text.chars().count() <= width {
                let style = Style::default()
                    .fg(self.theme.colors.accent)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD);
                buf.set_string(area.x, area.y, &text, style);
            }
        }

        if !self.center.is_empty() {
            let center_len = self.center.chars().count();
            if center_len < width {
                let start_x = area.x + (width.saturating_sub(center_len) / 2) as u16;
                let style = Style::default().fg(self.theme.colors.foreground).bg(bg);
                buf.set_string(start_x, area.y, self.center, style);
            }
        }

        if !self.right.is_empty() {
            let text = format!(" {} ", self.right);
            let len = text.chars().count();
            if len <= width {
                let start_x = area.right().saturating_sub(len as u16);
                let style = Style::default().fg(self.theme.colors.muted).bg(bg);
                buf.set_string(start_x, area.y, &text, style);
            }
        }
    }
}
