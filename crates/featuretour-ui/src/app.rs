//! Main application struct
//!
//! The [`App`] implements [`AppCoordinator`]: it owns the pages, the theme,
//! the per-page error boundaries and the message bus.
//!
//! # Example
//!
//! ```ignore
//! use featuretour_ui::App;
//! use featuretour_core::{AppCoordinator, Message, MessageBus, Theme};
//!
//! let mut app = App::new(MessageBus::default(), Theme::dark());
//! app.add_page(Box::new(my_page));
//!
//! loop {
//!     terminal.draw(|f| app.render(f))?;
//!
//!     if let Event::Key(key) = event::read()? {
//!         app.dispatch(Message::from_key(key));
//!     }
//!
//!     if app.should_quit() {
//!         break;
//!     }
//! }
//! ```

use crate::page_manager::PageManager;
use crate::renderer::AppLayout;
use crate::widgets::{BoundaryState, CapturedFault, ErrorFallback, StatusBar, TabBar};
use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use featuretour_core::{AppCoordinator, Message, MessageBus, Page, PageId, Theme};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::panic::{catch_unwind, AssertUnwindSafe};

const HINTS: &str = "Tab:page  F10:help  ^q:quit";

const HELP: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "next / previous page"),
    ("Ctrl+\u{2190} / Ctrl+\u{2192}", "previous / next panel tab"),
    ("F1 F2 F3", "Example / Description / Code"),
    ("r", "reset a failed page"),
    ("F10 / Esc", "toggle this help"),
    ("Ctrl+q / Ctrl+c", "quit"),
];

/// Main application state
pub struct App {
    /// Pages behind the page bar
    pages: PageManager,
    /// Theme every page renders with
    theme: Theme,
    /// Every dispatched message is broadcast here
    message_bus: MessageBus,
    /// Per-page error boundaries
    boundary: BoundaryState,
    /// Help overlay visibility
    show_help: bool,
    /// Flag indicating the application should quit
    should_quit: bool,
}

impl App {
    /// Creates an app without pages
    ///
    /// ```
    /// use featuretour_ui::App;
    /// use featuretour_core::{AppCoordinator, MessageBus, Theme};
    ///
    /// let app = App::new(MessageBus::default(), Theme::light());
    /// assert!(!app.should_quit());
    /// assert_eq!(app.theme().name, "Light");
    /// ```
    #[must_use]
    pub fn new(message_bus: MessageBus, theme: Theme) -> Self {
        App {
            pages: PageManager::new(),
            theme,
            message_bus,
            boundary: BoundaryState::default(),
            show_help: false,
            should_quit: false,
        }
    }

    /// Adds a page and returns its ID
    pub fn add_page(&mut self, page: Box<dyn Page>) -> PageId {
        self.pages.add_page(page)
    }

    /// Gets the message bus
    #[must_use]
    pub fn message_bus(&self) -> &MessageBus {
        &self.message_bus
    }

    /// Gets the page manager
    #[must_use]
    pub fn page_manager(&self) -> &PageManager {
        &self.pages
    }

    /// Gets the boundary state
    #[must_use]
    pub fn boundary(&self) -> &BoundaryState {
        &self.boundary
    }

    /// Returns true while the help overlay is shown
    #[must_use]
    pub fn help_visible(&self) -> bool {
        self.show_help
    }

    /// Replaces the theme
    pub fn set_theme(&mut self, theme: Theme) {
        tracing::info!(theme = %theme.name, "theme changed");
        self.theme = theme;
    }

    /// Renders the page bar, the active page and the status bar.
    ///
    /// A panic while drawing the active page trips the boundary instead of
    /// unwinding out of the draw call.
    pub fn render(&mut self, frame: &mut Frame) {
        let layout = AppLayout::new(frame.area());
        frame.render_widget(Block::default().style(self.theme.base()), frame.area());

        frame.render_widget(
            TabBar::new(self.pages.labels(), self.pages.active_index(), &self.theme),
            layout.tab_bar,
        );

        if let Some(id) = self.pages.active_id() {
            if !self.boundary.is_tripped_for(id) {
                if let Some(page) = self.pages.active_page() {
                    let theme = &self.theme;
                    let drawn = catch_unwind(AssertUnwindSafe(|| {
                        page.view(frame, layout.content, theme);
                    }));
                    if let Err(payload) = drawn {
                        self.boundary
                            .trip(CapturedFault::from_panic(id, payload.as_ref()));
                    }
                }
            }
            if let Some(fault) = self.boundary.fault_for(id) {
                frame.render_widget(Clear, layout.content);
                frame.render_widget(ErrorFallback::new(fault, &self.theme), layout.content);
            }
        }

        let title = self.pages.active_page().map(|p| p.title()).unwrap_or("");
        frame.render_widget(
            StatusBar::new(&self.theme)
                .left(title)
                .center(&self.theme.name)
                .right(HINTS),
            layout.status_bar,
        );

        if self.show_help {
            self.render_help(frame, &layout);
        }
    }

    fn render_help(&self, frame: &mut Frame, layout: &AppLayout) {
        let area = layout.popup(56, HELP.len() as u16 + 2);
        let lines: Vec<Line> = HELP
            .iter()
            .map(|(keys, action)| {
                Line::from(vec![
                    Span::styled(format!("{keys:<20}"), self.theme.highlight()),
                    Span::raw(*action),
                ])
            })
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Keys ")
            .border_style(Style::default().fg(self.theme.colors.accent))
            .style(self.theme.base());
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn reset_boundary(&mut self) {
        let Some(id) = self.pages.active_id() else {
            return;
        };
        if self.boundary.reset(id).is_some() {
            tracing::info!(page = id, "error boundary reset");
            if let Some(page) = self.pages.get_mut(id) {
                page.reset();
            }
        }
    }

    /// Keys the app consumes before the active page sees them.
    fn intercept_key(&self, msg: &Message) -> Option<Message> {
        let Message::Key(key) = msg else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return Some(Message::None);
        }
        if self.show_help && key.code == KeyCode::Esc {
            return Some(Message::ToggleHelp);
        }
        let tripped = self
            .pages
            .active_id()
            .is_some_and(|id| self.boundary.is_tripped_for(id));
        if tripped {
            return Some(match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('r')) => Message::ResetBoundary,
                _ => Message::None,
            });
        }
        None
    }
}

impl AppCoordinator for App {
    fn pages(&self) -> &[Box<dyn Page>] {
        self.pages.pages()
    }

    fn active_page(&self) -> PageId {
        self.pages.active_id().unwrap_or(0)
    }

    fn theme(&self) -> &Theme {
        &self.theme
    }

    fn dispatch(&mut self, msg: Message) {
        if let Some(replacement) = self.intercept_key(&msg) {
            self.dispatch(replacement);
            return;
        }

        let mut handled = true;
        match &msg {
            Message::Quit => self.should_quit = true,
            Message::NextPage => self.pages.next_page(),
            Message::PrevPage => self.pages.prev_page(),
            Message::SelectPage(id) => {
                if let Err(err) = self.pages.switch_to(*id) {
                    tracing::debug!(%err, "ignoring page selection");
                }
            }
            Message::SetTheme(theme) => self.set_theme(theme.clone()),
            Message::ToggleTheme => self.set_theme(self.theme.toggled()),
            Message::PageFault { page, message } => self.boundary.trip(CapturedFault {
                page: *page,
                message: message.clone(),
            }),
            Message::ResetBoundary => self.reset_boundary(),
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::Redraw | Message::Resize(..) => {}
            Message::Batch(messages) => {
                for m in messages.clone() {
                    self.dispatch(m);
                }
                return;
            }
            Message::None => return,
            _ => handled = false,
        }

        if !handled {
            if let Some(page) = self.pages.active_page_mut() {
                if let Some(response) = page.handle_message(&msg) {
                    self.dispatch(response);
                }
            }
        }

        // No receivers is fine; the bus is best-effort
        let _ = self.message_bus.send(msg);
    }

    fn tick(&mut self) {
        if let Some(page) = self.pages.active_page_mut() {
            page.tick();
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(MessageBus::default(), Theme::default())
    }
}
