//! Context propagation: the theme is provided once at the top and every
//! nested consumer reads it without being handed it explicitly.

use crossterm::event::{KeyCode, KeyEventKind};
use featuretour_core::{CoreResult, Message, Page, PageId, Theme};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::content::{hint_line, DemoPanel};

const DESCRIPTION: &str = "\
Context lets a value provided high up in the tree reach any component
below it without passing it through every level.

The whole tour is rendered with one theme. This page draws a few nested
boxes, and only the innermost one actually reads the theme colors. When
you switch the theme, the change travels from the top of the application
down to that box, and every other page picks it up as well.

Press space or t to toggle between dark and light, or l and d to pick one.";

/// Theme context page state
pub struct ThemeContextPage {
    id: PageId,
    panel: DemoPanel,
}

impl ThemeContextPage {
    /// Creates the page.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn new(id: PageId) -> CoreResult<Self> {
        Ok(ThemeContextPage {
            id,
            panel: DemoPanel::new(DESCRIPTION, include_str!("theme_context.rs"))?,
        })
    }

    fn view_example(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [current, swatches, nested, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(7),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Line::from(vec![
                Span::styled("Current theme: ", theme.muted()),
                Span::styled(theme.name.clone(), theme.highlight()),
            ]),
            current,
        );

        let c = &theme.colors;
        let mut spans = Vec::new();
        for (name, color) in [
            ("accent", c.accent),
            ("success", c.success),
            ("warning", c.warning),
            ("error", c.error),
            ("muted", c.muted),
        ] {
            spans.push(Span::styled("\u{2588}\u{2588}", Style::default().fg(color)));
            spans.push(Span::styled(format!(" {name}  "), theme.base()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), swatches);

        render_nested(frame, nested, theme);
        frame.render_widget(
            hint_line(&[("space/t", "toggle"), ("l", "light"), ("d", "dark")], theme),
            hints,
        );
    }
}

// Provider > Layout > Toolbar > Button; only the button reads the colors.
fn render_nested(frame: &mut Frame, area: Rect, theme: &Theme) {
    let mut area = area;
    for title in [" Provider ", " Layout ", " Toolbar "] {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.muted())
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        area = inner;
    }
    let button = Style::default()
        .fg(theme.colors.background)
        .bg(theme.colors.accent)
        .add_modifier(Modifier::BOLD);
    frame.render_widget(
        Paragraph::new(Line::styled(format!(" Button ({}) ", theme.name), button)),
        area,
    );
}

impl Page for ThemeContextPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn title(&self) -> &str {
        "Theme context"
    }

    fn focus(&mut self) {}

    fn blur(&mut self) {}

    fn view(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.panel
            .render(frame, area, theme, self.title(), |frame, area| {
                self.view_example(frame, area, theme)
            });
    }

    fn handle_message(&mut self, message: &Message) -> Option<Message> {
        if self.panel.handle_message(message) || !self.panel.is_live() {
            return None;
        }
        let Message::Key(key) = message else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char(' ' | 't') => Some(Message::ToggleTheme),
            KeyCode::Char('l') => Some(Message::SetTheme(Theme::light())),
            KeyCode::Char('d') => Some(Message::SetTheme(Theme::dark())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn press(c: char) -> Message {
        Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_keys_map_to_theme_messages() {
        let mut page = ThemeContextPage::new(5).expect("page");
        assert_eq!(page.handle_message(&press('t')), Some(Message::ToggleTheme));
        assert_eq!(page.handle_message(&press(' ')), Some(Message::ToggleTheme));
        assert_eq!(
            page.handle_message(&press('l')),
            Some(Message::SetTheme(Theme::light()))
        );
        assert_eq!(
            page.handle_message(&press('d')),
            Some(Message::SetTheme(Theme::dark()))
        );
        assert_eq!(page.handle_message(&press('x')), None);
    }

    #[test]
    fn test_keys_ignored_on_description_tab() {
        let mut page = ThemeContextPage::new(5).expect("page");
        page.handle_message(&Message::SelectPanelTab(1));
        assert_eq!(page.handle_message(&press('t')), None);
    }

    #[test]
    fn test_innermost_consumer_uses_theme_colors() {
        let page = ThemeContextPage::new(5).expect("page");
        for theme in [Theme::dark(), Theme::light()] {
            let mut terminal = Terminal::new(TestBackend::new(70, 20)).expect("terminal");
            terminal
                .draw(|frame| page.view(frame, frame.area(), &theme))
                .expect("draw");
            let buf = terminal.backend().buffer();
            let cell = buf
                .content()
                .iter()
                .find(|cell| cell.symbol() == "B" && cell.bg == theme.colors.accent)
                .expect("button drawn with the accent background");
            assert_eq!(cell.fg, theme.colors.background);
        }
    }
}
