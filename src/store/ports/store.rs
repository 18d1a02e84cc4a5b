//! Message store port: durable CRUD with optimistic concurrency control.

use crate::store::domain::{Envelope, SurrogateId};
use crate::store::error::StoreResult;
use async_trait::async_trait;
use serde_json::Value;

/// Durable CRUD over stored message records with optimistic locking and
/// correlation-based lookup.
///
/// Implementations are safe for concurrent use by independent callers; all
/// conflict detection is pushed to the backend via the version-guarded
/// conditional update, with no in-process locking. Each operation waits for
/// the full backend round trip.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists an envelope, inserting or updating by the reserved headers.
    ///
    /// An envelope without an id header is new: a fresh surrogate key is
    /// allocated, the correlation token (if any) is normalized, the envelope
    /// is serialized, and a record is inserted with version 0. The returned
    /// envelope carries the new id and version 0.
    ///
    /// An envelope with an id header is an update attempt: the write only
    /// succeeds while the stored version still equals the version header
    /// (default 0 when absent), and increments the stored version by 1.
    ///
    /// The returned envelope keeps the *pre-increment* version in its
    /// header while the committed record is one higher. This continuity
    /// contract with the original store is deliberate; callers that need
    /// the committed value re-fetch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OptimisticLockConflict`] when the version guard
    /// rejects the update, [`StoreError::Serialization`] when the envelope
    /// or its correlation token cannot be encoded (nothing is written in
    /// that case), and [`StoreError::Unavailable`] on backend failure.
    ///
    /// [`StoreError::OptimisticLockConflict`]: crate::store::error::StoreError::OptimisticLockConflict
    /// [`StoreError::Serialization`]: crate::store::error::StoreError::Serialization
    /// [`StoreError::Unavailable`]: crate::store::error::StoreError::Unavailable
    async fn put(&self, envelope: &Envelope) -> StoreResult<Envelope>;

    /// Fetches an envelope by surrogate key.
    ///
    /// Returns `None` when no record exists; absence is never an error. The
    /// returned envelope's reserved headers are populated from the stored
    /// columns, overriding whatever the serialized blob carried.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] when the stored blob cannot be
    /// decoded and [`StoreError::Unavailable`] on backend failure.
    ///
    /// [`StoreError::Serialization`]: crate::store::error::StoreError::Serialization
    /// [`StoreError::Unavailable`]: crate::store::error::StoreError::Unavailable
    async fn get(&self, id: SurrogateId) -> StoreResult<Option<Envelope>>;

    /// Deletes a record by surrogate key, returning the pre-deletion
    /// envelope.
    ///
    /// Fetch-then-delete as one logical operation: an absent record reports
    /// `None` without touching storage, and a delete that affects zero rows
    /// after a successful fetch (a lost race with a concurrent delete) also
    /// reports `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on backend failure and
    /// [`StoreError::Integrity`] when the delete affected more than one row.
    ///
    /// [`StoreError::Unavailable`]: crate::store::error::StoreError::Unavailable
    /// [`StoreError::Integrity`]: crate::store::error::StoreError::Integrity
    async fn delete(&self, id: SurrogateId) -> StoreResult<Option<Envelope>>;

    /// Returns every stored envelope.
    ///
    /// Ordering is store-defined and not guaranteed stable across calls.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] when a stored blob cannot be
    /// decoded and [`StoreError::Unavailable`] on backend failure.
    ///
    /// [`StoreError::Serialization`]: crate::store::error::StoreError::Serialization
    /// [`StoreError::Unavailable`]: crate::store::error::StoreError::Unavailable
    async fn list(&self) -> StoreResult<Vec<Envelope>>;

    /// Returns every envelope whose correlation token normalizes to the
    /// same key as `token`.
    ///
    /// Ordering is unspecified, as for [`list`](MessageStore::list).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] when the token or a stored
    /// blob cannot be encoded or decoded and [`StoreError::Unavailable`] on
    /// backend failure.
    ///
    /// [`StoreError::Serialization`]: crate::store::error::StoreError::Serialization
    /// [`StoreError::Unavailable`]: crate::store::error::StoreError::Unavailable
    async fn list_by_correlation(&self, token: &Value) -> StoreResult<Vec<Envelope>>;
}
