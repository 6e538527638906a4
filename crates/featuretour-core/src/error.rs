//! Core error types for featuretour-core
//!
//! [`CoreError`] covers framework failures (page lookup, panel construction,
//! configuration). [`OperationError`] is the taxonomy surfaced by an
//! optimistic operation and always ends up as an inline message.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::page::PageId;

/// Message shown for failures that were not produced by the simulated backend.
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";

/// Errors that can occur in the featuretour framework.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Page with the specified ID was not found.
    #[error("page not found: {0}")]
    PageNotFound(PageId),

    /// A tabbed panel was constructed without any tabs.
    #[error("a tabbed panel needs at least one tab")]
    EmptyPanel,

    /// Two tabs of the same panel share a key.
    #[error("duplicate tab key: {0}")]
    DuplicateTabKey(String),

    /// Failure probability outside of `0.0..=1.0`.
    #[error("failure rate must be within 0.0..=1.0, got {0}")]
    InvalidFailureRate(f64),

    /// Theme name that has no preset.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// Event system error, such as a send without subscribers.
    #[error("event error: {0}")]
    EventError(String),

    /// Underlying IO error bubbled up from filesystem operations.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file could not be parsed.
    #[error("invalid config at {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Configuration values failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The platform has no configuration directory.
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced while running an optimistic operation.
///
/// The `Display` output of each variant is exactly the text shown to the
/// user next to the control that triggered the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// Input failed a local precondition; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The simulated backend reported a failure.
    #[error("{0}")]
    Backend(String),

    /// Anything else raised while waiting for the backend. The detail is
    /// kept for logs, the user only sees [`UNEXPECTED_MESSAGE`].
    #[error("An unexpected error occurred")]
    Unexpected(String),

    /// A request is already in flight for this operation.
    #[error("a request is already in flight")]
    Busy,
}

impl OperationError {
    /// Returns true when the error happened before any request was issued.
    pub fn is_local(&self) -> bool {
        matches!(self, OperationError::Validation(_) | OperationError::Busy)
    }
}
