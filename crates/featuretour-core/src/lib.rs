//! # featuretour-core
//!
//! Core traits and types for the featuretour terminal tour.
//!
//! ## Overview
//!
//! The tour is a set of pages behind a tab bar. Each page shows one feature
//! through a [`TabbedPanel`] with Example, Description and Code tabs. The
//! live examples are driven by [`OptimisticOperation`]s running against a
//! [`SimulatedBackend`] with configurable latency and failure rate.
//!
//! ## Core Abstractions
//!
//! - [`TabbedPanel`] - One-of-many tab selector
//! - [`OptimisticOperation`] - Speculative update with commit or rollback
//! - [`OptimisticRequestSimulator`] - Runs operations against a backend on tokio
//! - [`ResourceLoader`] - Delayed async resource with a loading state
//! - [`Page`] - Trait for tour pages
//! - [`AppCoordinator`] - Trait for the main application loop
//! - [`Message`] / [`MessageBus`] - Events and their broadcast channel
//! - [`Theme`] - Dark and light color presets
//! - [`Config`] - TOML configuration
//! - [`CoreError`] / [`OperationError`] - Error types
//!
//! ## Example
//!
//! ```ignore
//! use featuretour_core::{
//!     FixedOutcome, Outcome, OptimisticOperation, OptimisticRequestSimulator, SimulatedBackend,
//! };
//! use std::time::Duration;
//!
//! let sim = OptimisticRequestSimulator::new(
//!     OptimisticOperation::new(0i64, |count, delta| count + delta),
//!     SimulatedBackend::new(
//!         Duration::from_millis(1500),
//!         "Server error while updating the counter",
//!         FixedOutcome(Outcome::Success),
//!     ),
//! );
//!
//! let handle = sim.submit(1)?;
//! assert_eq!(sim.snapshot().speculative, 1);
//! handle.await?;
//! assert_eq!(sim.snapshot().committed, 1);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod optimistic;
pub mod page;
pub mod panel;
pub mod resource;
pub mod simulator;
pub mod theme;
pub mod validation;

pub use app::AppCoordinator;
pub use config::{Config, DemoConfig, ResourceConfig, UiConfig};
pub use error::{CoreError, CoreResult, OperationError, UNEXPECTED_MESSAGE};
pub use event::{Message, MessageBus};
pub use optimistic::{OperationSnapshot, OperationStatus, OptimisticOperation, Ticket};
pub use page::{Page, PageId};
pub use panel::{DemoTab, PanelTab, TabbedPanel};
pub use resource::{Resource, ResourceLoader};
pub use simulator::{
    FixedOutcome, OptimisticRequestSimulator, Outcome, OutcomeSource, RandomOutcomes,
    RemoteCall, ScriptedOutcomes, SharedOperation, SimulatedBackend,
};
pub use theme::{Theme, ThemeColors};
pub use validation::Rule;
