//! Form submission: the saved profile updates optimistically while the form
//! is locked, and the form reports either the server error or a success
//! message.

use crossterm::event::{KeyCode, KeyEventKind};
use featuretour_core::validation::{check_all, Rule};
use featuretour_core::{
    CoreResult, Message, MessageBus, OperationError, OperationStatus, OptimisticOperation,
    OptimisticRequestSimulator, Page, PageId, SimulatedBackend, Theme,
};
use featuretour_ui::{Notice, NoticeKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::content::{hint_line, watch_operation, DemoPanel};
use crate::text_field::TextField;

/// Message reported when the simulated server rejects the form
pub const FAILURE_MESSAGE: &str = "Failed to save profile";

/// Message shown after a successful save
pub const SUCCESS_MESSAGE: &str = "Profile saved successfully!";

const USERNAME: Rule = Rule::MinLength {
    field: "Username",
    min: 3,
};

const EMAIL: Rule = Rule::Contains {
    field: "email",
    needle: '@',
};

const DESCRIPTION: &str = "\
A form action validates its input, locks the form while the request runs
and then reports the outcome next to the submit button.

Fill in a username and an email and press Enter. Invalid input is reported
right away and nothing is sent. Otherwise the saved profile shows the new
values immediately, the fields are disabled and the button reads Saving.

On success the fields are cleared and a confirmation appears. On failure
the saved profile goes back to its previous values and the error is shown,
with your input kept for another try.";

/// Saved profile
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    /// Display name
    pub username: String,
    /// Contact address
    pub email: String,
}

/// Form contents submitted as one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Username field
    pub username: String,
    /// Email field
    pub email: String,
}

impl ProfileDraft {
    fn validate(&self) -> Result<(), String> {
        check_all(&[(USERNAME, self.username.as_str()), (EMAIL, self.email.as_str())])
    }
}

fn apply(_saved: &Profile, draft: &ProfileDraft) -> Profile {
    Profile {
        username: draft.username.trim().to_string(),
        email: draft.email.trim().to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Email,
}

type ProfileSimulator = OptimisticRequestSimulator<Profile, ProfileDraft, SimulatedBackend>;

/// Profile form page state
pub struct ProfilePage {
    id: PageId,
    panel: DemoPanel,
    sim: ProfileSimulator,
    committed: Arc<AtomicBool>,
    username: TextField,
    email: TextField,
    focus: Field,
    flash: bool,
}

impl ProfilePage {
    /// Creates the page with its own backend.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn new(id: PageId, backend: SimulatedBackend, bus: &MessageBus) -> CoreResult<Self> {
        let initial = Profile {
            username: "guest".to_string(),
            email: "guest@example.com".to_string(),
        };
        let operation =
            OptimisticOperation::new(initial, apply).with_validator(ProfileDraft::validate);
        let sim = OptimisticRequestSimulator::new(operation, backend);
        let committed = watch_operation(&sim, bus);
        Ok(ProfilePage {
            id,
            panel: DemoPanel::new(DESCRIPTION, include_str!("profile.rs"))?,
            sim,
            committed,
            username: TextField::new(" Username ")
                .with_placeholder("at least 3 characters")
                .with_max_length(32),
            email: TextField::new(" Email ").with_placeholder("you@example.com"),
            focus: Field::Username,
            flash: false,
        })
    }

    /// The driver behind the page
    pub fn simulator(&self) -> &ProfileSimulator {
        &self.sim
    }

    fn submit(&mut self) {
        self.flash = false;
        let draft = ProfileDraft {
            username: self.username.value().to_string(),
            email: self.email.value().to_string(),
        };
        match self.sim.submit(draft) {
            Ok(_) | Err(OperationError::Busy) => {}
            Err(err) => tracing::debug!(%err, "profile rejected"),
        }
    }

    fn poll_commit(&mut self) {
        if self.committed.swap(false, Ordering::SeqCst) {
            self.username.clear();
            self.email.clear();
            self.focus = Field::Username;
            self.flash = true;
        }
    }

    fn view_example(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let snapshot = self.sim.snapshot();
        let pending = snapshot.is_pending();
        let [saved, username, email, button, notice, hints] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(area);

        let value_style = if pending {
            Style::default().fg(theme.colors.warning)
        } else {
            theme.base()
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(vec![
                    Span::styled("Username: ", theme.muted()),
                    Span::styled(snapshot.speculative.username.clone(), value_style),
                ]),
                Line::from(vec![
                    Span::styled("Email:    ", theme.muted()),
                    Span::styled(snapshot.speculative.email.clone(), value_style),
                ]),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.muted())
                    .title(" Saved profile "),
            ),
            saved,
        );

        frame.render_widget(
            self.username
                .widget(theme, self.focus == Field::Username, !pending),
            username,
        );
        frame.render_widget(
            self.email.widget(theme, self.focus == Field::Email, !pending),
            email,
        );

        let label = if pending {
            Span::styled("[ Saving... ]", theme.muted())
        } else {
            Span::styled("[ Save ]", theme.highlight())
        };
        frame.render_widget(
            Paragraph::new(Line::from(label)).alignment(Alignment::Center),
            button,
        );

        let notice_widget = Notice::for_snapshot(&snapshot, "Saving...", theme).or_else(|| {
            self.flash
                .then(|| Notice::new(NoticeKind::Success, SUCCESS_MESSAGE, theme))
        });
        if let Some(widget) = notice_widget {
            frame.render_widget(widget, notice);
        }

        frame.render_widget(
            hint_line(&[("Enter", "save"), ("\u{2191}/\u{2193}", "switch field")], theme),
            hints,
        );
    }
}

impl Page for ProfilePage {
    fn id(&self) -> PageId {
        self.id
    }

    fn title(&self) -> &str {
        "Profile form"
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
                    Field::Username => Field::Email,
                    Field::Email => Field::Username,
                };
            }
            _ => {
                let field = match self.focus {
                    Field::Username => &mut self.username,
                    Field::Email => &mut self.email,
                };
                if field.handle_key(key) {
                    self.flash = false;
                    if self.sim.snapshot().status == OperationStatus::Failed {
                        self.sim.dismiss_error();
                    }
                }
            }
        }
        None
    }

    fn tick(&mut self) {
        self.poll_commit();
    }
}
