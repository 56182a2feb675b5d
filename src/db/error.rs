//! Session store error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What kind of failure a [`StoreError`] represents, for callers that need
/// to distinguish "bad input from the caller" from "something broke".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreErrorKind {
    /// Storage/serialization failure unrelated to caller input.
    #[default]
    Internal,
    /// A caller-supplied pagination cursor failed to decode.
    InvalidCursor,
}

/// Store-level error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
    /// What kind of failure this is.
    pub kind: StoreErrorKind,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
            kind: StoreErrorKind::Internal,
        }
    }

    /// Creates a store error for a pagination cursor that failed to decode.
    #[track_caller]
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
            kind: StoreErrorKind::InvalidCursor,
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("diesel error: {err}"))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("connection error: {err}"))
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("board serialization error: {err}"))
    }
}
