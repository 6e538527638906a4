//! Tab bar widget
//!
//! The [`TabBar`] renders a horizontal strip of labels with the active one
//! highlighted in the theme's accent color. The page bar and every panel's
//! Example / Description / Code strip use it.
//!
//! ```ignore
//! use featuretour_ui::widgets::TabBar;
//!
//! let bar = TabBar::new(manager.labels(), manager.active_index(), &theme);
//! frame.render_widget(bar, area);
//! ```

use featuretour_core::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Tabs, Widget};

/// Horizontal strip of tab labels
pub struct TabBar<'a> {
    /// Labels in display order
    labels: Vec<String>,
    /// Index of the active label
    active_index: usize,
    /// Separator drawn between labels
    divider: &'a str,
    /// Theme for styling
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    /// Creates a tab bar from labels and the active index
    pub fn new<I, S>(labels: I, active_index: usize, theme: &'a Theme) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TabBar {
            labels: labels.into_iter().map(Into::into).collect(),
            active_index,
            divider: " | ",
            theme,
        }
    }

    /// Replaces the separator between labels
    #[must_use]
    pub fn divider(mut self, divider: &'a str) -> Self {
        self.divider = divider;
        self
    }

    /// Number of labels in this bar
    pub fn tab_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether the bar has no labels
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.labels.is_empty() {
            return;
        }

        let titles: Vec<Line> = self
            .labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let content = format!(" {label} ");
                if i == self.active_index {
                    Line::from(content).style(
                        Style::default()
                            .fg(self.theme.colors.accent)
                            .bg(self.theme.colors.selection)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Line::from(content).style(Style::default().fg(self.theme.colors.muted))
                }
            })
            .collect();

        let active = Style::default()
            .fg(self.theme.colors.accent)
            .bg(self.theme.colors.selection)
            .add_modifier(Modifier::BOLD);

        Tabs::new(titles)
            .select(self.active_index)
            .highlight_style(active)
            .divider(self.divider)
            .padding("", "")
            .style(Style::default().bg(self.theme.colors.background))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, area: Rect) -> String {
        (0..area.width)
            .map(|x| buf[(x, 0)].symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn test_tab_bar_creation() {
        let theme = Theme::dark();
        let bar = TabBar::new(["Example", "Description", "Code"], 0, &theme);
        assert_eq!(bar.tab_count(), 3);
        assert!(!bar.is_empty());
    }

    #[test]
    fn test_tab_bar_renders_empty_gracefully() {
        let theme = Theme::dark();
        let bar = TabBar::new(Vec::<String>::new(), 0, &theme);
        assert!(bar.is_empty());

        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        assert!(row(&buf, area).trim().is_empty());
    }

    #[test]
    fn test_tab_bar_renders_labels() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        TabBar::new(["Example", "Description", "Code"], 0, &theme).render(area, &mut buf);

        let content = row(&buf, area);
        assert!(content.contains("Example"));
        assert!(content.contains("Description"));
        assert!(content.contains("Code"));
    }

    #[test]
    fn test_active_label_uses_accent() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        TabBar::new(["One", "Two"], 1, &theme).render(area, &mut buf);

        let content = row(&buf, area);
        let two = content.find("Two").expect("label rendered") as u16;
        let one = content.find("One").expect("label rendered") as u16;
        assert_eq!(buf[(two, 0)].fg, theme.colors.accent);
        assert_eq!(buf[(one, 0)].fg, theme.colors.muted);
    }

    #[test]
    fn test_custom_divider() {
        let theme = Theme::light();
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        TabBar::new(["A", "B"], 0, &theme)
            .divider(" / ")
            .render(area, &mut buf);
        assert!(row(&buf, area).contains('/'));
    }

    #[test]
    fn test_tab_bar_narrow_area() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        TabBar::new(["Example", "Description", "Code"], 2, &theme).render(area, &mut buf);
    }
}
