//! # featuretour-ui
//!
//! Application coordinator, page manager and widgets for the tour, built on
//! top of [`featuretour_core`].
//!
//! - [`App`] - Implements [`featuretour_core::AppCoordinator`]
//! - [`PageManager`] - Ordered pages and focus handling
//! - [`AppLayout`] - Page bar / content / status bar split
//! - [`widgets`] - Tab bar, status bar, panel view, notice and error boundary
//!
//! ## Layout Calculation
//!
//! ```
//! use featuretour_ui::AppLayout;
//! use ratatui::prelude::Rect;
//!
//! let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
//! assert_eq!(layout.content.height, 22);
//! ```

pub mod app;
pub mod page_manager;
pub mod renderer;
pub mod widgets;

pub use app::App;
pub use page_manager::PageManager;
pub use renderer::AppLayout;
pub use widgets::{
    BoundaryState, CapturedFault, ErrorFallback, Notice, NoticeKind, PanelView, StatusBar, TabBar,
};
