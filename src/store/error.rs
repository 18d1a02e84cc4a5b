//! Error types for message store operations.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants that
//! can be inspected by callers. Absence of a record is not an error: lookup
//! operations return `Option::None` instead. Conflicts are ordinary,
//! expected outcomes the caller handles as control flow; `Unavailable` and
//! `Integrity` are operational failures to log and escalate.

use crate::store::domain::{SurrogateId, Version};
use std::sync::Arc;
use thiserror::Error;

/// Result type for message store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by message store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The expected version no longer matches the stored version.
    ///
    /// The store never retries internally; the caller re-reads and retries
    /// at the application level if appropriate. `observed` is best-effort
    /// and may be absent when the diagnostic read itself fails or the
    /// record was deleted concurrently.
    #[error(
        "optimistic lock conflict on message {id}: attempted version {expected}, stored version {}",
        format_observed(.observed)
    )]
    OptimisticLockConflict {
        /// Surrogate key of the contested record.
        id: SurrogateId,
        /// Version the writer attempted to update from.
        expected: Version,
        /// Current stored version, when it could be read.
        observed: Option<Version>,
    },

    /// A payload, header, or correlation token could not be encoded or
    /// decoded. Fatal to the single operation; no partial write occurs
    /// because serialization always precedes the conditional write.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend connection or transport failure, propagated unchanged.
    #[error("storage unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// A write affected more than one row for a single surrogate key.
    ///
    /// Surrogate keys are unique, so this marks a broken invariant in the
    /// backing table; the operation aborts rather than proceeding.
    #[error("integrity violation on message {id}: {rows} rows affected")]
    Integrity {
        /// Surrogate key whose uniqueness is broken.
        id: SurrogateId,
        /// Number of rows the statement touched.
        rows: usize,
    },

    /// Invalid store configuration, detected at construction time.
    #[error("configuration error: {0}")]
    Configuration(String),
}

fn format_observed(observed: &Option<Version>) -> String {
    observed.map_or_else(|| "unknown".to_owned(), |version| version.to_string())
}

impl StoreError {
    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Wraps a backend transport or connection error.
    #[must_use]
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        // Every Diesel failure surfaces as storage unavailability: the
        // version guard reports conflicts through affected-row counts, not
        // through database errors, so there is nothing semantic to recover
        // here.
        Self::unavailable(err)
    }
}
