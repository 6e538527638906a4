//! Renders a [`TabbedPanel`]: its tab strip plus the active content only.

use featuretour_core::{TabbedPanel, Theme};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders};
use std::fmt;

use super::TabBar;

/// Bordered frame around a tabbed panel.
///
/// The tab strip takes the first inner row. The rest of the area goes to
/// a caller-supplied closure that receives the active content and nothing
/// else.
pub struct PanelView<'a, K, C> {
    panel: &'a TabbedPanel<K, C>,
    title: Option<&'a str>,
    theme: &'a Theme,
}

/// Areas computed by [`PanelView::layout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelAreas {
    /// Row holding the tab strip
    pub tabs: Rect,
    /// Area handed to the active content
    pub content: Rect,
}

impl<'a, K, C> PanelView<'a, K, C>
where
    K: PartialEq + fmt::Debug,
{
    /// Creates a view over `panel`
    pub fn new(panel: &'a TabbedPanel<K, C>, theme: &'a Theme) -> Self {
        PanelView {
            panel,
            title: None,
            theme,
        }
    }

    /// Title drawn on the border
    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Splits the inner area of the border into strip and content.
    pub fn layout(area: Rect) -> PanelAreas {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let [tabs, content] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        PanelAreas { tabs, content }
    }

    /// Draws the border and tab strip, then calls `draw_active` with the
    /// active content and its area.
    pub fn render<F>(self, frame: &mut Frame, area: Rect, draw_active: F)
    where
        F: FnOnce(&C, &mut Frame, Rect),
    {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.colors.muted))
            .style(self.theme.base());
        if let Some(title) = self.title {
            block = block.title(Span::styled(format!(" {title} "), self.theme.highlight()));
        }
        frame.render_widget(block, area);

        let areas = Self::layout(area);
        frame.render_widget(
            TabBar::new(self.panel.labels(), self.panel.active_index(), self.theme),
            areas.tabs,
        );
        draw_active(self.panel.active_content(), frame, areas.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use featuretour_core::{DemoTab, PanelTab};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::cell::RefCell;

    fn panel() -> TabbedPanel<DemoTab, &'static str> {
        TabbedPanel::new(vec![
            PanelTab::new(DemoTab::Example, "Example", "live"),
            PanelTab::new(DemoTab::Description, "Description", "prose"),
            PanelTab::new(DemoTab::Code, "Code", "source"),
        ])
        .expect("valid panel")
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let area = buf.area;
        (area.top()..area.bottom())
            .flat_map(|y| {
                (area.left()..area.right())
                    .map(move |x| buf[(x, y)].symbol().to_string())
                    .chain(std::iter::once("\n".to_string()))
            })
            .collect()
    }

    #[test]
    fn test_only_active_content_is_drawn() {
        let mut panel = panel();
        panel.select(&DemoTab::Description);
        let theme = Theme::dark();
        let seen = RefCell::new(Vec::new());

        let mut terminal = Terminal::new(TestBackend::new(50, 8)).expect("terminal");
        terminal
            .draw(|frame| {
                PanelView::new(&panel, &theme).title("Counter").render(
                    frame,
                    frame.area(),
                    |content, frame, area| {
                        seen.borrow_mut().push(*content);
                        frame.render_widget(Line::raw(*content), area);
                    },
                );
            })
            .expect("draw");

        assert_eq!(*seen.borrow(), vec!["prose"]);
        let text = screen(&terminal);
        assert!(text.contains("prose"));
        assert!(!text.contains("live"));
        assert!(!text.contains("source"));
        assert!(text.contains("Counter"));
        assert!(text.contains("Example"));
        assert!(text.contains("Code"));
    }

    #[test]
    fn test_layout_reserves_strip_row() {
        let areas = PanelView::<DemoTab, ()>::layout(Rect::new(0, 0, 40, 10));
        assert_eq!(areas.tabs, Rect::new(1, 1, 38, 1));
        assert_eq!(areas.content, Rect::new(1, 2, 38, 7));
    }
}
