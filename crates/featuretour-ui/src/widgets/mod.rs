//! UI widgets for the tour
//!
//! ## Available Widgets
//!
//! - [`TabBar`] - Horizontal label strip with the active label highlighted
//! - [`StatusBar`] - Three-section status bar
//! - [`PanelView`] - Border, tab strip and active content of a tabbed panel
//! - [`Notice`] - Inline pending, success or error message
//! - [`ErrorFallback`] - Replacement view for a page behind a tripped boundary

pub mod error_boundary;
pub mod notice;
pub mod panel_view;
pub mod status_bar;
pub mod tab_bar;

pub use error_boundary::{BoundaryState, CapturedFault, ErrorFallback};
pub use notice::{Notice, NoticeKind};
pub use panel_view::{PanelAreas, PanelView};
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
