//! Application layout
//!
//! ```text
//! +---------------------------------+
//! | Page bar (1 line)               |
//! +---------------------------------+
//! |                                 |
//! | Content Area                    |
//! |                                 |
//! +---------------------------------+
//! | Status Bar (1 line)             |
//! +---------------------------------+
//! ```

use ratatui::prelude::*;

/// Main application layout areas
///
/// ```
/// use featuretour_ui::renderer::AppLayout;
/// use ratatui::prelude::Rect;
///
/// let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
///
/// assert_eq!(layout.tab_bar, Rect::new(0, 0, 80, 1));
/// assert_eq!(layout.content, Rect::new(0, 1, 80, 22));
/// assert_eq!(layout.status_bar, Rect::new(0, 23, 80, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppLayout {
    /// Area for the page bar (top)
    pub tab_bar: Rect,
    /// Area for the active page (middle)
    pub content: Rect,
    /// Area for the status bar (bottom)
    pub status_bar: Rect,
}

impl AppLayout {
    /// Calculate layout areas from the total terminal area
    ///
    /// Terminals shorter than three rows give everything to the content.
    #[must_use]
    pub fn new(area: Rect) -> Self {
        if area.height < 3 {
            return AppLayout {
                tab_bar: Rect::new(area.x, area.y, area.width, 1.min(area.height)),
                content: area,
                status_bar: Rect::default(),
            };
        }

        AppLayout {
            tab_bar: Rect::new(area.x, area.y, area.width, 1),
            content: Rect::new(area.x, area.y + 1, area.width, area.height - 2),
            status_bar: Rect::new(area.x, area.y + area.height - 1, area.width, 1),
        }
    }

    /// Centered overlay area for the help popup, clamped to `content`
    #[must_use]
    pub fn popup(&self, width: u16, height: u16) -> Rect {
        let width = width.min(self.content.width);
        let height = height.min(self.content.height);
        Rect::new(
            self.content.x + (self.content.width - width) / 2,
            self.content.y + (self.content.height - height) / 2,
            width,
            height,
        )
    }
}
