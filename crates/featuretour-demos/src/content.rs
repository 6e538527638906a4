//! Shared pieces for demo pages: the Example / Description / Code panel and
//! the hook that connects an operation to the terminal loop.

use crossterm::event::{KeyCode, KeyEventKind};
use featuretour_core::{
    CoreResult, DemoTab, Message, MessageBus, OperationStatus, OptimisticRequestSimulator,
    PanelTab, RemoteCall, TabbedPanel, Theme,
};
use featuretour_ui::PanelView;
use parking_lot::Mutex;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a demo panel tab holds.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    /// Drawn by the page itself on every frame
    Live,
    /// Pre-built prose
    Prose(Text<'static>),
    /// Pre-built source excerpt
    Code(Text<'static>),
}

/// Strips the test module from a page's own source.
pub fn source_excerpt(source: &'static str) -> &'static str {
    let end = source.find("#[cfg(test)]").unwrap_or(source.len());
    source[..end].trim_end()
}

fn prose(description: &'static str) -> Text<'static> {
    description.lines().map(Line::raw).collect()
}

fn code(source: &'static str) -> Text<'static> {
    source_excerpt(source)
        .lines()
        .map(|line| {
            if line.trim_start().starts_with("//") {
                Line::styled(line, Style::default().add_modifier(Modifier::DIM))
            } else {
                Line::raw(line)
            }
        })
        .collect()
}

/// Tabbed Example / Description / Code viewer with scrolling for the
/// static tabs.
#[derive(Debug)]
pub struct DemoPanel {
    panel: TabbedPanel<DemoTab, PanelContent>,
    scroll: u16,
}

impl DemoPanel {
    /// Builds the three stock tabs.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn new(description: &'static str, source: &'static str) -> CoreResult<Self> {
        let panel = TabbedPanel::new(vec![
            PanelTab::new(DemoTab::Example, DemoTab::Example.label(), PanelContent::Live),
            PanelTab::new(
                DemoTab::Description,
                DemoTab::Description.label(),
                PanelContent::Prose(prose(description)),
            ),
            PanelTab::new(
                DemoTab::Code,
                DemoTab::Code.label(),
                PanelContent::Code(code(source)),
            ),
        ])?;
        Ok(DemoPanel { panel, scroll: 0 })
    }

    /// The underlying panel
    pub fn panel(&self) -> &TabbedPanel<DemoTab, PanelContent> {
        &self.panel
    }

    /// Returns true when the Example tab is showing
    pub fn is_live(&self) -> bool {
        self.panel.is_active(&DemoTab::Example)
    }

    /// Current scroll offset of the static tabs
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Applies panel navigation and, on static tabs, scrolling.
    ///
    /// Returns true when the message was consumed.
    pub fn handle_message(&mut self, msg: &Message) -> bool {
        if self.panel.handle_message(msg) {
            self.scroll = 0;
            return true;
        }
        if self.is_live() {
            return false;
        }
        let Message::Key(key) = msg else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::Home => self.scroll = 0,
            _ => return false,
        }
        true
    }

    /// Draws the panel; `live` is only called while the Example tab is active.
    pub fn render<F>(&self, frame: &mut Frame, area: Rect, theme: &Theme, title: &str, live: F)
    where
        F: FnOnce(&mut Frame, Rect),
    {
        PanelView::new(&self.panel, theme)
            .title(title)
            .render(frame, area, |content, frame, area| match content {
                PanelContent::Live => live(frame, area),
                PanelContent::Prose(text) => frame.render_widget(
                    Paragraph::new(text.clone())
                        .style(theme.base())
                        .wrap(Wrap { trim: false })
                        .scroll((self.scroll, 0)),
                    area,
                ),
                PanelContent::Code(text) => frame.render_widget(
                    Paragraph::new(text.clone())
                        .style(theme.base())
                        .scroll((self.scroll, 0)),
                    area,
                ),
            });
    }
}

/// Wires an operation to the terminal loop.
///
/// Every state change publishes [`Message::Redraw`]. The returned flag is
/// raised whenever a request commits, so the page can react on its next
/// tick.
pub fn watch_operation<S, P, B>(
    sim: &OptimisticRequestSimulator<S, P, B>,
    bus: &MessageBus,
) -> Arc<AtomicBool>
where
    S: Clone + Send + 'static,
    P: Send + 'static,
    B: RemoteCall<P>,
{
    let committed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&committed);
    let bus = bus.clone();
    let previous = Mutex::new(OperationStatus::Idle);
    sim.subscribe(move |snapshot| {
        let mut previous = previous.lock();
        if *previous == OperationStatus::Pending && snapshot.status == OperationStatus::Idle {
            flag.store(true, Ordering::SeqCst);
        }
        *previous = snapshot.status;
        // Nobody listening just means no terminal loop yet
        let _ = bus.send(Message::Redraw);
    });
    committed
}

/// Renders a labelled key hint line.
pub fn hint_line(hints: &[(&str, &str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.to_string(), theme.highlight()));
        spans.push(Span::styled(format!(" {action}"), theme.muted()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use featuretour_core::{FixedOutcome, OptimisticOperation, Outcome, SimulatedBackend};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::cell::Cell;
    use std::time::Duration;

    const SOURCE: &str = "fn demo() {}\n// note\n\n#[cfg(test)]\nmod tests {}\n";

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_source_excerpt_drops_tests() {
        assert_eq!(source_excerpt(SOURCE), "fn demo() {}\n// note");
        assert_eq!(source_excerpt("plain"), "plain");
    }

    #[test]
    fn test_panel_starts_live() {
        let panel = DemoPanel::new("About", SOURCE).expect("panel");
        assert!(panel.is_live());
        assert_eq!(panel.panel().labels(), vec!["Example", "Description", "Code"]);
    }

    #[test]
    fn test_scroll_only_on_static_tabs() {
        let mut panel = DemoPanel::new("About", SOURCE).expect("panel");
        assert!(!panel.handle_message(&key(KeyCode::Down)));
        assert_eq!(panel.scroll(), 0);

        assert!(panel.handle_message(&Message::SelectPanelTab(2)));
        assert!(panel.handle_message(&key(KeyCode::Down)));
        assert!(panel.handle_message(&key(KeyCode::Down)));
        assert_eq!(panel.scroll(), 2);

        assert!(panel.handle_message(&Message::PrevPanelTab));
        assert_eq!(panel.scroll(), 0);
    }

    #[test]
    fn test_live_closure_only_runs_on_example_tab() {
        let mut panel = DemoPanel::new("About this demo", SOURCE).expect("panel");
        let theme = Theme::dark();
        let calls = Cell::new(0);
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).expect("terminal");

        terminal
            .draw(|frame| {
                panel.render(frame, frame.area(), &theme, "Demo", |_, _| {
                    calls.set(calls.get() + 1);
                });
            })
            .expect("draw");
        assert_eq!(calls.get(), 1);

        panel.handle_message(&Message::NextPanelTab);
        terminal
            .draw(|frame| {
                panel.render(frame, frame.area(), &theme, "Demo", |_, _| {
                    calls.set(calls.get() + 1);
                });
            })
            .expect("draw");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_hint_line() {
        let line = hint_line(&[("+", "increment"), ("d", "dismiss")], &Theme::dark());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "+ increment  d dismiss");
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_operation_flags_commit_and_redraws() {
        let bus = MessageBus::default();
        let mut rx = bus.subscribe();
        let sim = OptimisticRequestSimulator::new(
            OptimisticOperation::new(0i64, |count: &i64, delta: &i64| count + delta),
            SimulatedBackend::new(Duration::from_millis(10), "nope", FixedOutcome(Outcome::Success)),
        );
        let committed = watch_operation(&sim, &bus);

        let handle = sim.submit(1).expect("idle");
        assert!(!committed.load(Ordering::SeqCst));
        assert_eq!(rx.try_recv().expect("redraw"), Message::Redraw);

        handle.await.expect("task completes");
        assert!(committed.load(Ordering::SeqCst));
        assert_eq!(rx.try_recv().expect("redraw"), Message::Redraw);
    }
}
