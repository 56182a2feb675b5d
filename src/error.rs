//! Engine error kinds and their HTTP mapping.

use derive_more::Display;
use tracing::error;

use crate::db::{StoreError, StoreErrorKind};
use crate::rules::MoveError;

/// The specific reason a request failed validation, surfaced in the
/// response body's `details.code` alongside the free-text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{}", self.as_str())]
pub enum ValidationKind {
    /// A row/col pair is out of bounds or not a valid board coordinate.
    InvalidCoordinates,
    /// The acting player is not a member of the session.
    NotInSession,
    /// A user-supplied display name was empty or otherwise invalid.
    InvalidName,
    /// A `limit` query parameter fell outside its allowed range.
    InvalidLimit,
    /// A pagination `cursor` token failed to decode.
    InvalidCursor,
    /// An unrecognized `metric` query parameter.
    InvalidMetric,
    /// The request body was malformed JSON or failed to match its shape
    /// (including an unrecognized `gameType`).
    InvalidBody,
}

impl ValidationKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCoordinates => "invalid_coordinates",
            Self::NotInSession => "not_in_session",
            Self::InvalidName => "invalid_name",
            Self::InvalidLimit => "invalid_limit",
            Self::InvalidCursor => "invalid_cursor",
            Self::InvalidMetric => "invalid_metric",
            Self::InvalidBody => "invalid_body",
        }
    }

    /// The machine-readable token surfaced in the response body's `details`.
    pub fn code(self) -> &'static str {
        self.as_str()
    }
}

/// The specific state-machine violation behind a `conflict` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{}", self.as_str())]
pub enum ConflictKind {
    /// A move was submitted by a player who is not on turn.
    NotYourTurn,
    /// A move targeted an already-occupied cell, or an illegal geometry
    /// (e.g. a full connect-four column).
    CellOccupied,
    /// A move or join targeted a FINISHED session.
    AlreadyFinished,
    /// A join targeted a session that already has two distinct players.
    AlreadyFull,
    /// A move was submitted against a WAITING session.
    NotActive,
    /// The host attempted to join their own session as guest.
    CannotJoinOwnSession,
}

impl ConflictKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::NotYourTurn => "not_your_turn",
            Self::CellOccupied => "cell_occupied",
            Self::AlreadyFinished => "already_finished",
            Self::AlreadyFull => "already_full",
            Self::NotActive => "not_active",
            Self::CannotJoinOwnSession => "cannot_join_own_session",
        }
    }

    /// The machine-readable token surfaced in the response body's `details`.
    pub fn code(self) -> &'static str {
        self.as_str()
    }
}

/// A tagged engine failure. The Request Facade maps each variant to an HTTP
/// status: `Validation` → 400, `NotFound` → 404, `Conflict` → 409,
/// `Internal` → 500.
#[derive(Debug, Clone, Display)]
pub enum EngineError {
    /// Malformed input, invalid coordinates, unknown game type, or a player
    /// not in the session.
    #[display("validation error ({}): {message}", kind.code())]
    Validation {
        /// Which kind of validation failure occurred.
        kind: ValidationKind,
        /// Human-readable detail.
        message: String,
    },
    /// A referenced user or session does not exist.
    #[display("not found: {_0}")]
    NotFound(String),
    /// A state-machine violation.
    #[display("conflict ({}): {message}", kind.code())]
    Conflict {
        /// Which violation occurred.
        kind: ConflictKind,
        /// Human-readable detail.
        message: String,
    },
    /// An unexpected failure: store I/O or an invariant violation. Always
    /// logged at the point it's constructed.
    #[display("internal error: {_0}")]
    Internal(String),
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Builds a `validation` error of the given kind.
    pub fn validation(kind: ValidationKind, message: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            message: message.into(),
        }
    }

    /// Builds a `not_found` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Builds a `conflict` error of the given kind.
    pub fn conflict(kind: ConflictKind, message: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            message: message.into(),
        }
    }

    /// Builds an `internal` error, logging it immediately: invariant
    /// violations must be logged at the point of discovery.
    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(%message, "internal engine error");
        Self::Internal(message)
    }
}

impl From<StoreError> for EngineError {
    #[track_caller]
    fn from(err: StoreError) -> Self {
        match err.kind {
            StoreErrorKind::InvalidCursor => Self::validation(ValidationKind::InvalidCursor, err.message),
            StoreErrorKind::Internal => Self::internal(err.to_string()),
        }
    }
}

impl From<diesel::result::Error> for EngineError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::internal(format!("diesel error: {err}"))
    }
}

impl From<MoveError> for EngineError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::OutOfBounds => {
                Self::validation(ValidationKind::InvalidCoordinates, "invalid_coordinates")
            }
            MoveError::CellOccupied | MoveError::IllegalGeometry => {
                Self::conflict(ConflictKind::CellOccupied, "cell_occupied")
            }
        }
    }
}
