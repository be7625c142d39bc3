//! # Store Error Types
//!
//! Error types for data file operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / csv::Error        CoreError (business rules)         │
//! │           │                                │                            │
//! │           └──────────────┬─────────────────┘                            │
//! │                          ▼                                              │
//! │  StoreError (this module) ← Adds file / entity context                 │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  ApiError (in CLI) ← Serialized for the operator                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A bad line inside a data file is reported as [`StoreError::Malformed`]
//! to the loader, which logs and skips it. It never aborts a load.

use brew_core::{CoreError, ValidationError};
use thiserror::Error;

/// Data file operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a data file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited reader/writer failed.
    #[error("Record I/O error: {0}")]
    Csv(#[from] csv::Error),

    /// A line could not be decoded.
    #[error("{file}:{line}: {reason}")]
    Malformed {
        file: String,
        line: u64,
        reason: String,
    },

    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: u32 },

    /// A record with the same id already exists.
    #[error("{entity} {id} already exists")]
    Duplicate { entity: String, id: u32 },

    /// Record failed its validity check (id > 0, required fields present).
    #[error("Invalid {entity} record: {reason}")]
    InvalidRecord { entity: String, reason: String },

    /// Business rule violation bubbling up from brew-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: u32) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(entity: impl Into<String>, id: u32) -> Self {
        StoreError::Duplicate {
            entity: entity.into(),
            id,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

/// Why a single record line could not be decoded.
///
/// Carries no position; the loader adds file and line when it wraps this
/// into [`StoreError::Malformed`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct DecodeError(pub String);

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        DecodeError(reason.into())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
