//! Page trait and related types.
//!
//! A page is one entry of the top-level tab bar: a single demo with its own
//! tabbed Example / Description / Code panel.

use crate::event::Message;
use crate::theme::Theme;
use ratatui::prelude::*;

/// Unique identifier for a page.
pub type PageId = u32;

/// Trait that all demo pages implement.
///
/// Pages run on the terminal thread. State that is touched by background
/// tasks (simulated requests, resource loads) lives behind the page's own
/// mutex, so the trait itself needs no `Send + Sync` bound.
///
/// # Example
///
/// ```ignore
/// use featuretour_core::{Page, PageId, Theme};
/// use ratatui::prelude::*;
///
/// struct HelloPage {
///     id: PageId,
/// }
///
/// impl Page for HelloPage {
///     fn id(&self) -> PageId { self.id }
///     fn title(&self) -> &str { "Hello" }
///     fn focus(&mut self) {}
///     fn blur(&mut self) {}
///     fn view(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
///         frame.render_widget(Line::styled("hello", theme.base()), area);
///     }
/// }
/// ```
pub trait Page {
    /// Returns the unique identifier for this page.
    fn id(&self) -> PageId;

    /// Returns the title shown in the page bar.
    fn title(&self) -> &str;

    /// Returns an optional icon shown before the title.
    fn icon(&self) -> Option<&str> {
        None
    }

    /// Called when the page becomes the active page.
    fn focus(&mut self);

    /// Called when the page stops being the active page.
    fn blur(&mut self);

    /// Renders the page into the given area using the application theme.
    fn view(&self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Handles a message routed to the active page.
    ///
    /// The returned message, if any, is dispatched by the coordinator.
    fn handle_message(&mut self, _message: &Message) -> Option<Message> {
        None
    }

    /// Per-tick update invoked on the active page.
    fn tick(&mut self) {}

    /// Restores the page after an error boundary was reset.
    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPage {
        id: PageId,
        focused: bool,
        resets: u32,
    }

    impl Page for TestPage {
        fn id(&self) -> PageId {
            self.id
        }

        fn title(&self) -> &str {
            "Test"
        }

        fn focus(&mut self) {
            self.focused = true;
        }

        fn blur(&mut self) {
            self.focused = false;
        }

        fn view(&self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn test_defaults() {
        let mut page = TestPage {
            id: 7,
            focused: false,
            resets: 0,
        };
        assert_eq!(page.id(), 7);
        assert!(page.icon().is_none());
        assert!(page.handle_message(&Message::Redraw).is_none());
        page.tick();
    }

    #[test]
    fn test_focus_blur_reset() {
        let mut page = TestPage {
            id: 1,
            focused: false,
            resets: 0,
        };
        page.focus();
        assert!(page.focused);
        page.blur();
        assert!(!page.focused);
        page.reset();
        assert_eq!(page.resets, 1);
    }

    #[test]
    fn test_page_trait_is_object_safe() {
        fn accept(_page: &dyn Page) {}
        let page = TestPage {
            id: 1,
            focused: false,
            resets: 0,
        };
        accept(&page);
    }
}
