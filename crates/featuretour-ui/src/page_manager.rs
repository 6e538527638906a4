//! Page management for the tour
//!
//! The [`PageManager`] keeps the ordered list of pages behind the page bar
//! and makes sure exactly one of them has focus.
//!
//! # Example
//!
//! ```ignore
//! use featuretour_ui::PageManager;
//!
//! let mut manager = PageManager::new();
//! let id = manager.add_page(Box::new(my_page));
//! manager.switch_to(id)?;
//! ```

use featuretour_core::{CoreError, CoreResult, Page, PageId};
use std::collections::HashMap;

/// Manages the collection of pages in the tour.
///
/// PageManager handles:
/// - Adding pages in page-bar order
/// - Switching between pages (by ID, next, previous)
/// - Focus management (calling focus/blur on pages)
pub struct PageManager {
    /// Pages, stored in display order
    pages: Vec<Box<dyn Page>>,
    /// Index of the currently active page
    active_index: usize,
    /// Mapping from PageId to index
    page_indices: HashMap<PageId, usize>,
}

impl PageManager {
    /// Creates a new empty page manager.
    ///
    /// ```
    /// use featuretour_ui::PageManager;
    ///
    /// let manager = PageManager::new();
    /// assert!(manager.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        PageManager {
            pages: Vec::new(),
            active_index: 0,
            page_indices: HashMap::new(),
        }
    }

    /// Adds a page at the end and returns its ID.
    ///
    /// The first page added becomes active and receives focus.
    pub fn add_page(&mut self, mut page: Box<dyn Page>) -> PageId {
        let id = page.id();
        let index = self.pages.len();

        if self.pages.is_empty() {
            page.focus();
        }

        self.page_indices.insert(id, index);
        self.pages.push(page);
        id
    }

    /// Gets the active page.
    #[must_use]
    pub fn active_page(&self) -> Option<&dyn Page> {
        self.pages.get(self.active_index).map(|p| p.as_ref())
    }

    /// Gets the active page mutably.
    pub fn active_page_mut(&mut self) -> Option<&mut Box<dyn Page>> {
        self.pages.get_mut(self.active_index)
    }

    /// Gets the active page's ID.
    #[must_use]
    pub fn active_id(&self) -> Option<PageId> {
        self.pages.get(self.active_index).map(|p| p.id())
    }

    /// Zero-based index of the active page; 0 when empty.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Gets a page by ID mutably.
    pub fn get_mut(&mut self, id: PageId) -> Option<&mut Box<dyn Page>> {
        let index = self.page_indices.get(&id).copied()?;
        self.pages.get_mut(index)
    }

    /// Switches to a specific page by ID.
    ///
    /// The old page is blurred and the new one focused. Switching to the
    /// already active page does nothing.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PageNotFound` if no page has that ID.
    pub fn switch_to(&mut self, id: PageId) -> CoreResult<()> {
        let new_index = self
            .page_indices
            .get(&id)
            .copied()
            .ok_or(CoreError::PageNotFound(id))?;

        if new_index != self.active_index {
            self.pages[self.active_index].blur();
            self.active_index = new_index;
            self.pages[self.active_index].focus();
            tracing::debug!(page = id, "switched page");
        }

        Ok(())
    }

    /// Switches to the next page, wrapping around.
    ///
    /// No-op with fewer than two pages.
    pub fn next_page(&mut self) {
        if self.pages.len() <= 1 {
            return;
        }

        self.pages[self.active_index].blur();
        self.active_index = (self.active_index + 1) % self.pages.len();
        self.pages[self.active_index].focus();
    }

    /// Switches to the previous page, wrapping around.
    ///
    /// No-op with fewer than two pages.
    pub fn prev_page(&mut self) {
        if self.pages.len() <= 1 {
            return;
        }

        self.pages[self.active_index].blur();
        self.active_index = if self.active_index == 0 {
            self.pages.len() - 1
        } else {
            self.active_index - 1
        };
        self.pages[self.active_index].focus();
    }

    /// All pages in display order.
    #[must_use]
    pub fn pages(&self) -> &[Box<dyn Page>] {
        &self.pages
    }

    /// Page-bar labels, with the icon in front when a page has one.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.pages
            .iter()
            .map(|page| match page.icon() {
                Some(icon) => format!("{icon} {}", page.title()),
                None => page.title().to_string(),
            })
            .collect()
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if there are no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Default for PageManager {
    fn default() -> Self {
        Self::new()
    }
}
