//! Optimistic comment list: a new comment appears right away, marked as
//! sending, and disappears again if the server rejects it.

use crossterm::event::{KeyCode, KeyEventKind};
use featuretour_core::validation::Rule;
use featuretour_core::{
    CoreResult, Message, MessageBus, OperationError, OperationStatus, OptimisticOperation,
    OptimisticRequestSimulator, Page, PageId, SimulatedBackend, Theme,
};
use featuretour_ui::{Notice, NoticeKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::content::{hint_line, watch_operation, DemoPanel};
use crate::text_field::TextField;

/// Message reported when the simulated server rejects a comment
pub const FAILURE_MESSAGE: &str = "Failed to add comment";

/// Author used when the name field is left blank
pub const ANONYMOUS: &str = "Anonymous";

const TEXT_RULE: Rule = Rule::MinLength {
    field: "Comment",
    min: 3,
};

const DESCRIPTION: &str = "\
Optimistic lists append the new item before the server confirms it.

Type a comment and press Enter. The comment is added to the list at once
and marked as sending while the request is in flight. If the server
accepts it, the mark goes away and the form is cleared. If it fails, the
comment is removed again and the error is shown under the form, with your
text still in the field so you can retry.

Comments shorter than three characters are rejected before any request is
made. A blank name is posted as Anonymous.";

/// A posted comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Sequence number
    pub id: u64,
    /// Display name
    pub author: String,
    /// Comment body
    pub text: String,
}

/// Form contents submitted as one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Name field, may be blank
    pub author: String,
    /// Body field
    pub text: String,
}

fn append(comments: &Vec<Comment>, new: &NewComment) -> Vec<Comment> {
    let author = match new.author.trim() {
        "" => ANONYMOUS.to_string(),
        name => name.to_string(),
    };
    let id = comments.last().map_or(1, |c| c.id + 1);
    let mut next = comments.clone();
    next.push(Comment {
        id,
        author,
        text: new.text.trim().to_string(),
    });
    next
}

fn seed() -> Vec<Comment> {
    vec![
        Comment {
            id: 1,
            author: "Ada".to_string(),
            text: "Rollback on failure is the part I always forget.".to_string(),
        },
        Comment {
            id: 2,
            author: "Linus".to_string(),
            text: "Nice to see the pending state spelled out.".to_string(),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Author,
    Text,
}

type CommentSimulator = OptimisticRequestSimulator<Vec<Comment>, NewComment, SimulatedBackend>;

/// Comments page state
pub struct CommentsPage {
    id: PageId,
    panel: DemoPanel,
    sim: CommentSimulator,
    committed: Arc<AtomicBool>,
    author: TextField,
    text: TextField,
    focus: Field,
    flash: bool,
}

impl CommentsPage {
    /// Creates the page with its own backend.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn new(id: PageId, backend: SimulatedBackend, bus: &MessageBus) -> CoreResult<Self> {
        let operation = OptimisticOperation::new(seed(), append)
            .with_validator(|new: &NewComment| TEXT_RULE.check(&new.text));
        let sim = OptimisticRequestSimulator::new(operation, backend);
        let committed = watch_operation(&sim, bus);
        Ok(CommentsPage {
            id,
            panel: DemoPanel::new(DESCRIPTION, include_str!("comments.rs"))?,
            sim,
            committed,
            author: TextField::new(" Your name ")
                .with_placeholder("optional")
                .with_max_length(40),
            text: TextField::new(" Comment ").with_placeholder("Write a comment"),
            focus: Field::Text,
            flash: false,
        })
    }

    /// The driver behind the page
    pub fn simulator(&self) -> &CommentSimulator {
        &self.sim
    }

    fn submit(&mut self) {
        self.flash = false;
        let new = NewComment {
            author: self.author.value().to_string(),
            text: self.text.value().to_string(),
        };
        match self.sim.submit(new) {
            Ok(_) | Err(OperationError::Busy) => {}
            Err(err) => tracing::debug!(%err, "comment rejected"),
        }
    }

    fn poll_commit(&mut self) {
        if self.committed.swap(false, Ordering::SeqCst) {
            self.text.clear();
            self.flash = true;
        }
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            Field::Author => &mut self.author,
            Field::Text => &mut self.text,
        }
    }

    fn view_example(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let snapshot = self.sim.snapshot();
        let pending = snapshot.is_pending();
        let [list, author, text, notice, hints] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let confirmed = snapshot.committed.len();
        let items: Vec<ListItem> = snapshot
            .speculative
            .iter()
            .enumerate()
            .map(|(i, comment)| {
                let mut spans = vec![
                    Span::styled(format!("{}: ", comment.author), theme.highlight()),
                    Span::styled(comment.text.clone(), theme.base()),
                ];
                if pending && i >= confirmed {
                    spans.push(Span::styled(
                        " (sending...)",
                        Style::default().fg(theme.colors.warning),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        frame.render_widget(
            List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.muted())
                    .title(format!(" Comments ({}) ", snapshot.speculative.len())),
            ),
            list,
        );

        frame.render_widget(
            self.author.widget(theme, self.focus == Field::Author, !pending),
            author,
        );
        frame.render_widget(
            self.text.widget(theme, self.focus == Field::Text, !pending),
            text,
        );

        let notice_widget = Notice::for_snapshot(&snapshot, "Sending...", theme).or_else(|| {
            self.flash
                .then(|| Notice::new(NoticeKind::Success, "Comment added successfully", theme))
        });
        if let Some(widget) = notice_widget {
            frame.render_widget(widget, notice);
        }

        frame.render_widget(
            hint_line(&[("Enter", "post"), ("\u{2191}/\u{2193}", "switch field")], theme),
            hints,
        );
    }
}

impl Page for CommentsPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn title(&self) -> &str {
        "Comments"
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
        if key.kind != KeyEventKind::Press || self.sim.is_pending() {
            return None;
        }
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    Field::Author => Field::Text,
                    Field::Text => Field::Author,
                };
            }
            _ => {
                if self.focused_field().handle_key(key)
                    && self.sim.snapshot().status == OperationStatus::Failed
                {
                    self.sim.dismiss_error();
                }
            }
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
    use featuretour_core::{FixedOutcome, Outcome};
    use std::time::Duration;

    const LATENCY: Duration = Duration::from_millis(1500);

    fn page(outcome: Outcome) -> CommentsPage {
        let backend = SimulatedBackend::new(LATENCY, FAILURE_MESSAGE, FixedOutcome(outcome));
        CommentsPage::new(2, backend, &MessageBus::default()).expect("page")
    }

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(page: &mut CommentsPage, text: &str) {
        for c in text.chars() {
            page.handle_message(&key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_append_defaults_author() {
        let next = append(
            &seed(),
            &NewComment {
                author: "   ".to_string(),
                text: "hello".to_string(),
            },
        );
        let last = next.last().expect("appended");
        assert_eq!(last.author, ANONYMOUS);
        assert_eq!(last.id, 3);
        assert_eq!(next.len(), seed().len() + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_comment_is_rejected_without_request() {
        let mut page = page(Outcome::Success);
        type_text(&mut page, "hi");
        page.handle_message(&key(KeyCode::Enter));

        let snap = page.simulator().snapshot();
        assert_eq!(snap.status, OperationStatus::Failed);
        assert_eq!(
            snap.error_message.as_deref(),
            Some("Comment must be at least 3 characters")
        );
        assert_eq!(snap.speculative, seed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_comment_appears_then_commits_and_clears_text() {
        let mut page = page(Outcome::Success);
        page.handle_message(&key(KeyCode::Up));
        type_text(&mut page, "Bo");
        page.handle_message(&key(KeyCode::Down));
        type_text(&mut page, "Great demo");
        page.handle_message(&key(KeyCode::Enter));

        let snap = page.simulator().snapshot();
        assert!(snap.is_pending());
        let last = snap.speculative.last().expect("speculative comment");
        assert_eq!(last.author, "Bo");
        assert_eq!(last.text, "Great demo");
        assert_eq!(snap.committed, seed());

        tokio::time::sleep(LATENCY * 2).await;
        page.tick();
        assert_eq!(page.simulator().snapshot().committed.len(), seed().len() + 1);
        assert_eq!(page.text.value(), "");
        assert_eq!(page.author.value(), "Bo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_comment_is_removed_and_text_kept() {
        let mut page = page(Outcome::Failure);
        type_text(&mut page, "Will not stick");
        page.handle_message(&key(KeyCode::Enter));
        tokio::time::sleep(LATENCY * 2).await;
        page.tick();

        let snap = page.simulator().snapshot();
        assert_eq!(snap.speculative, seed());
        assert_eq!(snap.error_message.as_deref(), Some(FAILURE_MESSAGE));
        assert_eq!(page.text.value(), "Will not stick");

        // editing again clears the error
        page.handle_message(&key(KeyCode::Char('!')));
        assert_eq!(page.simulator().snapshot().status, OperationStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_ignored_while_pending() {
        let mut page = page(Outcome::Success);
        type_text(&mut page, "abc");
        page.handle_message(&key(KeyCode::Enter));
        type_text(&mut page, "def");
        assert_eq!(page.text.value(), "abc");
    }
}
