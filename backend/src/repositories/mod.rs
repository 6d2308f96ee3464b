//! Data repositories
//!
//! Provides the data access layer for training sessions.

pub mod sessions;

pub use sessions::{InMemorySessionRepository, SessionFilter, SessionRepository, UpdateSession};
