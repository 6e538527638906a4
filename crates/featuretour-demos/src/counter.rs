//! Optimistic counter: the value moves the moment you press the key and
//! snaps back if the simulated server rejects it.

use crossterm::event::{KeyCode, KeyEventKind};
use featuretour_core::{
    CoreResult, Message, MessageBus, OperationError, OptimisticOperation,
    OptimisticRequestSimulator, Page, PageId, SimulatedBackend, Theme,
};
use featuretour_ui::{Notice, NoticeKind};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::content::{hint_line, watch_operation, DemoPanel};

/// Message reported when the simulated server rejects an increment
pub const FAILURE_MESSAGE: &str = "Server error while updating the counter";

const DESCRIPTION: &str = "\
An optimistic update shows the expected result before the server has
confirmed it.

Pressing + applies the increment to the displayed value immediately and
sends the request. While the request is in flight the button is disabled.
When the server answers, a success makes the new value the confirmed one,
and a failure restores the last confirmed value and shows the error.

The simulated server waits before answering and fails a configurable share
of requests, so both outcomes are easy to see.";

/// Counter page state
pub struct CounterPage {
    id: PageId,
    panel: DemoPanel,
    sim: OptimisticRequestSimulator<i64, i64, SimulatedBackend>,
    committed: Arc<AtomicBool>,
    flash: bool,
}

impl CounterPage {
    /// Creates the page with its own backend.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn new(id: PageId, backend: SimulatedBackend, bus: &MessageBus) -> CoreResult<Self> {
        let sim = OptimisticRequestSimulator::new(
            OptimisticOperation::new(0, |count: &i64, delta: &i64| count + delta),
            backend,
        );
        let committed = watch_operation(&sim, bus);
        Ok(CounterPage {
            id,
            panel: DemoPanel::new(DESCRIPTION, include_str!("counter.rs"))?,
            sim,
            committed,
            flash: false,
        })
    }

    /// The driver behind the page
    pub fn simulator(&self) -> &OptimisticRequestSimulator<i64, i64, SimulatedBackend> {
        &self.sim
    }

    fn increment(&mut self) {
        self.flash = false;
        match self.sim.submit(1) {
            Ok(_) => {}
            Err(OperationError::Busy) => {}
            Err(err) => tracing::debug!(%err, "increment rejected"),
        }
    }

    fn poll_commit(&mut self) {
        if self.committed.swap(false, Ordering::SeqCst) {
            self.flash = true;
        }
    }

    fn view_example(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let snapshot = self.sim.snapshot();
        let [value, button, notice, state, hints] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let value_style = if snapshot.is_pending() {
            Style::default().fg(theme.colors.warning).add_modifier(Modifier::BOLD)
        } else {
            theme.highlight()
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::default(),
                Line::styled(snapshot.speculative.to_string(), value_style),
            ])
            .alignment(Alignment::Center),
            value,
        );

        let label = if snapshot.is_pending() {
            Span::styled("[ Updating... ]", theme.muted())
        } else {
            Span::styled("[ Increment ]", theme.highlight())
        };
        frame.render_widget(
            Paragraph::new(Line::from(label)).alignment(Alignment::Center),
            button,
        );

        let notice_widget = Notice::for_snapshot(&snapshot, "Updating...", theme).or_else(|| {
            self.flash
                .then(|| Notice::new(NoticeKind::Success, "Counter saved", theme))
        });
        if let Some(widget) = notice_widget {
            frame.render_widget(widget, notice);
        }

        let json = serde_json::to_string_pretty(&snapshot).unwrap_or_default();
        frame.render_widget(
            Paragraph::new(json)
                .style(theme.muted())
                .wrap(Wrap { trim: false }),
            state,
        );

        frame.render_widget(
            hint_line(&[("+/Enter", "increment"), ("d", "dismiss error")], theme),
            hints,
        );
    }
}

impl Page for CounterPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn title(&self) -> &str {
        "Optimistic counter"
    }

    fn focus(&mut self) {}

    fn blur(&mut self) {
        self.flash = false;
    }

    fn view(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.panel
            .render(frame, area, theme, self.title(), |frame, area| {
                self.view_example(frame, area, theme)
            });
    }

    fn handle_message(&mut self, message: &Message) -> Option<Message> {
        self.poll_commit();
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
            KeyCode::Char('+') | KeyCode::Enter => self.increment(),
            KeyCode::Char('d') => self.sim.dismiss_error(),
            _ => {}
        }
        None
    }

    fn tick(&mut self) {
        self.poll_commit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use featuretour_core::{FixedOutcome, OperationStatus, Outcome, ScriptedOutcomes};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    const LATENCY: Duration = Duration::from_millis(1500);

    fn page(outcomes: impl featuretour_core::OutcomeSource + 'static) -> CounterPage {
        let backend = SimulatedBackend::new(LATENCY, FAILURE_MESSAGE, outcomes);
        CounterPage::new(1, backend, &MessageBus::default()).expect("page")
    }

    fn press(c: char) -> Message {
        Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn screen(page: &CounterPage) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).expect("terminal");
        terminal
            .draw(|frame| page.view(frame, frame.area(), &Theme::dark()))
            .expect("draw");
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test(start_paused = true)]
    async fn test_increment_is_immediate_then_committed() {
        let mut page = page(FixedOutcome(Outcome::Success));
        page.handle_message(&press('+'));

        let snap = page.simulator().snapshot();
        assert_eq!(snap.speculative, 1);
        assert_eq!(snap.status, OperationStatus::Pending);
        assert!(screen(&page).contains("Updating..."));

        tokio::time::sleep(LATENCY * 2).await;
        page.tick();
        let snap = page.simulator().snapshot();
        assert_eq!(snap.committed, 1);
        assert_eq!(snap.status, OperationStatus::Idle);
        assert!(screen(&page).contains("Counter saved"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_rolls_back_with_message() {
        let mut page = page(FixedOutcome(Outcome::Failure));
        page.handle_message(&press('+'));
        tokio::time::sleep(LATENCY * 2).await;

        let snap = page.simulator().snapshot();
        assert_eq!(snap.speculative, 0);
        assert_eq!(snap.status, OperationStatus::Failed);
        assert!(screen(&page).contains(FAILURE_MESSAGE));

        page.handle_message(&press('d'));
        assert_eq!(page.simulator().snapshot().status, OperationStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_presses_while_pending_are_ignored() {
        let mut page = page(ScriptedOutcomes::new([Outcome::Success]));
        page.handle_message(&press('+'));
        page.handle_message(&press('+'));
        page.handle_message(&press('+'));
        assert_eq!(page.simulator().snapshot().speculative, 1);

        tokio::time::sleep(LATENCY * 2).await;
        assert_eq!(page.simulator().snapshot().committed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_ignored_off_the_example_tab() {
        let mut page = page(FixedOutcome(Outcome::Success));
        page.handle_message(&Message::SelectPanelTab(1));
        page.handle_message(&press('+'));
        assert!(!page.simulator().is_pending());
        assert!(screen(&page).contains("optimistic update"));
    }
}
