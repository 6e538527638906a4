//! Application coordinator trait
//!
//! The `AppCoordinator` trait defines the interface for the main loop that
//! owns the pages, tracks the active one and applies messages.

use crate::event::Message;
use crate::page::{Page, PageId};
use crate::theme::Theme;

/// Trait for the main application coordinator
///
/// The terminal loop only talks to the coordinator: it feeds it input as
/// messages, calls [`tick`](Self::tick) on every poll timeout and stops once
/// [`should_quit`](Self::should_quit) returns true.
///
/// # Example
///
/// ```ignore
/// use featuretour_core::{AppCoordinator, Message, Page, PageId, Theme};
///
/// struct Tour {
///     pages: Vec<Box<dyn Page>>,
///     active: PageId,
///     theme: Theme,
///     quit: bool,
/// }
///
/// impl AppCoordinator for Tour {
///     fn pages(&self) -> &[Box<dyn Page>] { &self.pages }
///     fn active_page(&self) -> PageId { self.active }
///     fn theme(&self) -> &Theme { &self.theme }
///     fn dispatch(&mut self, msg: Message) {
///         if msg == Message::Quit {
///             self.quit = true;
///         }
///     }
///     fn tick(&mut self) {}
///     fn should_quit(&self) -> bool { self.quit }
/// }
/// ```
pub trait AppCoordinator {
    /// Returns all pages in page-bar order
    fn pages(&self) -> &[Box<dyn Page>];

    /// Returns the currently active page ID
    fn active_page(&self) -> PageId;

    /// Returns the current theme
    ///
    /// Every page renders with this theme, so replacing it re-themes the
    /// whole tour on the next frame.
    fn theme(&self) -> &Theme;

    /// Applies a message
    ///
    /// Navigation, theme and boundary messages are handled by the
    /// coordinator; everything else goes to the active page.
    fn dispatch(&mut self, msg: Message);

    /// Called on each tick of the main loop
    fn tick(&mut self);

    /// Returns true if the application should quit
    fn should_quit(&self) -> bool;
}
