//! Error boundary: a page that fails while drawing is replaced by a
//! fallback instead of taking the whole tour down.

use crossterm::event::{KeyCode, KeyEventKind};
use featuretour_core::{CoreResult, Message, Page, PageId, Theme};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::content::{hint_line, DemoPanel};

/// Highest value the buggy counter can draw
pub const COUNTER_LIMIT: u32 = 3;

/// Message raised by the explicit fault key
pub const FAULT_MESSAGE: &str = "Component crashed while rendering";

const DESCRIPTION: &str = "\
An error boundary catches failures of the components inside it and shows a
fallback in their place.

The counter below breaks on purpose once it goes above three: drawing it
panics. The boundary around the page catches the panic and draws an error
panel instead, while the tab bar, the status bar and every other page keep
working. Pressing t raises a fault directly without a panic.

Press r on the fallback to reset the boundary. The page starts over with
the counter back at zero.";

/// Error boundary page state
pub struct BoundaryPage {
    id: PageId,
    panel: DemoPanel,
    count: u32,
    resets: u32,
}

impl BoundaryPage {
    /// Creates the page.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn new(id: PageId) -> CoreResult<Self> {
        Ok(BoundaryPage {
            id,
            panel: DemoPanel::new(DESCRIPTION, include_str!("boundary.rs"))?,
            count: 0,
            resets: 0,
        })
    }

    /// Current counter value
    pub fn count(&self) -> u32 {
        self.count
    }

    /// How many times the boundary has reset this page
    pub fn resets(&self) -> u32 {
        self.resets
    }

    fn view_example(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if self.count > COUNTER_LIMIT {
            panic!("Counter cannot be greater than {COUNTER_LIMIT}!");
        }

        let [counter, hints] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);
        let lines = vec![
            Line::styled(
                format!("This counter fails to draw above {COUNTER_LIMIT}."),
                theme.muted(),
            ),
            Line::default(),
            Line::from(vec![
                Span::styled(self.count.to_string(), theme.highlight()),
                Span::raw("  "),
                Span::styled("[ Increment ]", theme.base()),
            ]),
            Line::default(),
            Line::styled(format!("Resets so far: {}", self.resets), theme.muted()),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.muted())
                    .title(" Buggy counter "),
            ),
            counter,
        );
        frame.render_widget(
            hint_line(&[("+/Enter", "increment"), ("t", "raise fault")], theme),
            hints,
        );
    }
}

impl Page for BoundaryPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn title(&self) -> &str {
        "Error boundary"
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
            KeyCode::Char('+') | KeyCode::Enter => {
                self.count += 1;
                None
            }
            KeyCode::Char('t') => Some(Message::PageFault {
                page: self.id,
                message: FAULT_MESSAGE.to_string(),
            }),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.count = 0;
        self.resets += 1;
        tracing::info!(resets = self.resets, "boundary page reset");
    }
}
