//! Page error boundary.
//!
//! A tripped boundary replaces its page's view with a fallback that names
//! the fault and how to reset it. Faults arrive either as an explicit
//! [`Message::PageFault`](featuretour_core::Message::PageFault) or as a
//! panic caught while drawing the page.

use featuretour_core::{PageId, Theme};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use std::any::Any;
use std::collections::btree_map::{BTreeMap, Entry};

/// A fault captured by the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFault {
    /// Page that failed
    pub page: PageId,
    /// What went wrong
    pub message: String,
}

impl CapturedFault {
    /// Builds a fault from a panic payload.
    pub fn from_panic(page: PageId, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        CapturedFault { page, message }
    }
}

/// Boundaries around the pages, one per page.
///
/// Each page keeps its own first fault until it is reset, so a fault on
/// one page never hides or replaces a fault on another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryState {
    faults: BTreeMap<PageId, CapturedFault>,
}

impl BoundaryState {
    /// Trips the boundary of `fault.page`. A page that is already tripped
    /// keeps its first fault.
    pub fn trip(&mut self, fault: CapturedFault) {
        if let Entry::Vacant(entry) = self.faults.entry(fault.page) {
            tracing::warn!(page = fault.page, message = %fault.message, "error boundary tripped");
            entry.insert(fault);
        }
    }

    /// Fault of `page`, if its boundary is tripped
    pub fn fault_for(&self, page: PageId) -> Option<&CapturedFault> {
        self.faults.get(&page)
    }

    /// Returns true when any page shows its fallback
    pub fn is_tripped(&self) -> bool {
        !self.faults.is_empty()
    }

    /// Returns true when `page` shows its fallback
    pub fn is_tripped_for(&self, page: PageId) -> bool {
        self.faults.contains_key(&page)
    }

    /// Returns `page` to the healthy state, yielding the cleared fault
    pub fn reset(&mut self, page: PageId) -> Option<CapturedFault> {
        self.faults.remove(&page)
    }
}

/// Fallback drawn in place of a failed page.
pub struct ErrorFallback<'a> {
    fault: &'a CapturedFault,
    theme: &'a Theme,
}

impl<'a> ErrorFallback<'a> {
    /// Creates the fallback for `fault`
    pub fn new(fault: &'a CapturedFault, theme: &'a Theme) -> Self {
        ErrorFallback { fault, theme }
    }
}

impl Widget for ErrorFallback<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let error = Style::default().fg(self.theme.colors.error);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(error)
            .title(Span::styled(" Something went wrong ", error.add_modifier(Modifier::BOLD)))
            .style(self.theme.base());

        let text = vec![
            Line::styled(self.fault.message.clone(), error),
            Line::default(),
            Line::styled("Press r to reset this page.", self.theme.muted()),
        ];
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
