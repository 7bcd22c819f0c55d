//! Core error types for the stock widget update subsystem.
//!
//! This module defines storage-agnostic error types. Host-specific failures
//! (file I/O, preference stores) are converted to these types at the boundary.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the update subsystem.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Invalid configuration value: {0}")]
    Config(String),

    #[error("Settings store error: {0}")]
    Settings(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for cache snapshot persistence.
///
/// All variants carry a `String` so storage backends can convert their own
/// failures into this shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Reading the persisted record failed.
    #[error("Failed to read cache snapshot: {0}")]
    Read(String),

    /// Writing the persisted record failed.
    #[error("Failed to write cache snapshot: {0}")]
    Write(String),

    /// The persisted record exists but cannot be decoded.
    #[error("Cache snapshot is corrupted: {0}")]
    Corrupted(String),

    /// A lock guarding the storage was poisoned by a panicking writer.
    #[error("Storage lock poisoned: {0}")]
    LockPoisoned(String),
}

// === From implementations for common error types ===

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PersistenceError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        PersistenceError::LockPoisoned(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
