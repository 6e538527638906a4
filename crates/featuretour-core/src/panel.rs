//! Tabbed panel: exactly one of several caller-supplied contents is active.
//!
//! The panel owns its tabs for its whole lifetime; only the active key
//! changes, and only through explicit selection. Renderers are expected to
//! draw [`TabbedPanel::active_content`] and nothing else, so inactive
//! contents cost nothing per frame.
//!
//! # Example
//!
//! ```
//! use featuretour_core::panel::{DemoTab, PanelTab, TabbedPanel};
//!
//! let mut panel = TabbedPanel::new(vec![
//!     PanelTab::new(DemoTab::Example, "Example", "live demo"),
//!     PanelTab::new(DemoTab::Description, "Description", "prose"),
//!     PanelTab::new(DemoTab::Code, "Code", "source"),
//! ])
//! .expect("valid panel");
//!
//! assert_eq!(*panel.active_key(), DemoTab::Example);
//! assert!(panel.select(&DemoTab::Code));
//! assert_eq!(*panel.active_content(), "source");
//! ```

use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::event::Message;

/// One named, mutually exclusive view within a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelTab<K, C> {
    /// Caller-chosen identifier, unique within the panel
    pub key: K,
    /// Text shown in the tab strip
    pub label: String,
    /// Opaque, pre-built content
    pub content: C,
}

impl<K, C> PanelTab<K, C> {
    /// Creates a tab
    pub fn new(key: K, label: impl Into<String>, content: C) -> Self {
        PanelTab {
            key,
            label: label.into(),
            content,
        }
    }
}

/// Stock key set used by every demo page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoTab {
    /// The live, interactive example
    Example,
    /// Prose explaining the feature
    Description,
    /// Source excerpt
    Code,
}

impl DemoTab {
    /// All keys in display order
    pub const ALL: [DemoTab; 3] = [DemoTab::Example, DemoTab::Description, DemoTab::Code];

    /// Default label for the key
    pub fn label(self) -> &'static str {
        match self {
            DemoTab::Example => "Example",
            DemoTab::Description => "Description",
            DemoTab::Code => "Code",
        }
    }
}

/// A selector showing exactly one of several tabs.
///
/// Invariant: the active index always points at an existing tab, which
/// holds because the tab list is non-empty and never changes after
/// construction.
#[derive(Debug, Clone)]
pub struct TabbedPanel<K, C> {
    tabs: Vec<PanelTab<K, C>>,
    active: usize,
}

impl<K, C> TabbedPanel<K, C>
where
    K: PartialEq + fmt::Debug,
{
    /// Creates a panel with the first tab active.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyPanel` for an empty list and
    /// `CoreError::DuplicateTabKey` when two tabs share a key.
    pub fn new(tabs: Vec<PanelTab<K, C>>) -> CoreResult<Self> {
        if tabs.is_empty() {
            return Err(CoreError::EmptyPanel);
        }
        for (i, tab) in tabs.iter().enumerate() {
            if tabs[..i].iter().any(|other| other.key == tab.key) {
                return Err(CoreError::DuplicateTabKey(format!("{:?}", tab.key)));
            }
        }
        Ok(TabbedPanel { tabs, active: 0 })
    }

    /// Activates the tab with `key`.
    ///
    /// Returns `false` and leaves the active tab unchanged when no tab has
    /// that key.
    pub fn select(&mut self, key: &K) -> bool {
        match self.tabs.iter().position(|tab| tab.key == *key) {
            Some(index) => {
                if index != self.active {
                    tracing::debug!(from = ?self.active_key(), to = ?key, "panel tab selected");
                }
                self.active = index;
                true
            }
            None => false,
        }
    }

    /// Activates the tab at `index`; out-of-range positions are ignored.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Activates the next tab, wrapping around.
    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % self.tabs.len();
    }

    /// Activates the previous tab, wrapping around.
    pub fn select_prev(&mut self) {
        self.active = self.active.checked_sub(1).unwrap_or(self.tabs.len() - 1);
    }

    /// Applies panel navigation messages.
    ///
    /// Returns true when the message was a panel message, whether or not it
    /// changed the selection.
    pub fn handle_message(&mut self, msg: &Message) -> bool {
        match msg {
            Message::NextPanelTab => {
                self.select_next();
                true
            }
            Message::PrevPanelTab => {
                self.select_prev();
                true
            }
            Message::SelectPanelTab(index) => {
                self.select_index(*index);
                true
            }
            _ => false,
        }
    }

    /// Key of the active tab
    pub fn active_key(&self) -> &K {
        &self.tabs[self.active].key
    }

    /// Position of the active tab
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Content of the active tab
    pub fn active_content(&self) -> &C {
        &self.tabs[self.active].content
    }

    /// Mutable content of the active tab
    pub fn active_content_mut(&mut self) -> &mut C {
        &mut self.tabs[self.active].content
    }

    /// Content of the tab with `key`, whether or not it is active
    pub fn content(&self, key: &K) -> Option<&C> {
        self.tabs
            .iter()
            .find(|tab| tab.key == *key)
            .map(|tab| &tab.content)
    }

    /// Returns true if the active tab has `key`
    pub fn is_active(&self, key: &K) -> bool {
        self.active_key() == key
    }

    /// Returns true if a tab has `key`
    pub fn contains(&self, key: &K) -> bool {
        self.tabs.iter().any(|tab| tab.key == *key)
    }

    /// Tab labels in display order
    pub fn labels(&self) -> Vec<&str> {
        self.tabs.iter().map(|tab| tab.label.as_str()).collect()
    }

    /// Number of tabs, always at least one
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Always false; present for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}
