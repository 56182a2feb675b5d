//! Persistence layer: users, sessions and the append-only move log.
//!
//! The `SessionStore` holds no game semantics of its own; it gives the
//! engine a transaction, a row to read and write, and an append-only move
//! log.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{StoreError, StoreErrorKind};
pub use models::{MoveRow, NewMoveRow, NewSessionRow, NewUser, SessionRow, User};
pub use repository::{SessionFilter, SessionStore};
