//! In-memory message store for tests and contract verification.
//!
//! Keeps the full storage contract: envelopes are serialized to bytes on
//! `put` and decoded on read, updates are version-guarded, and correlation
//! lookups compare normalized keys. This makes the adapter a faithful
//! stand-in for the relational store in behavioural tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use crate::store::codec::{decode_envelope, encode_envelope};
use crate::store::domain::{CorrelationKey, Envelope, SurrogateId, Version, normalize_token};
use crate::store::error::{StoreError, StoreResult};
use crate::store::ports::{MessageStore, SurrogateKeyIncrementer};

/// Counter-backed incrementer.
///
/// Allocates keys from an in-process atomic counter. Suitable for tests and
/// single-process deployments; the default strategy of
/// [`InMemoryMessageStore`].
#[derive(Debug)]
pub struct AtomicIncrementer {
    next: AtomicI64,
}

impl AtomicIncrementer {
    /// Creates an incrementer whose first allocated key is `start`.
    #[must_use]
    pub const fn new(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }
}

impl Default for AtomicIncrementer {
    fn default() -> Self {
        Self::new(1)
    }
}

#[async_trait]
impl SurrogateKeyIncrementer for AtomicIncrementer {
    async fn next_id(&self) -> StoreResult<SurrogateId> {
        Ok(SurrogateId::new(self.next.fetch_add(1, Ordering::Relaxed)))
    }
}

#[derive(Debug, Clone)]
struct StoredRecord {
    correlation_key: Option<CorrelationKey>,
    message_bytes: Vec<u8>,
    version: Version,
}

/// Thread-safe in-memory message store.
#[derive(Clone)]
pub struct InMemoryMessageStore {
    state: Arc<RwLock<HashMap<SurrogateId, StoredRecord>>>,
    incrementer: Arc<dyn SurrogateKeyIncrementer>,
}

impl std::fmt::Debug for InMemoryMessageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMessageStore").finish_non_exhaustive()
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageStore {
    /// Creates an empty store with a fresh [`AtomicIncrementer`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_incrementer(Arc::new(AtomicIncrementer::default()))
    }

    /// Creates an empty store using the given key allocation strategy.
    #[must_use]
    pub fn with_incrementer(incrementer: Arc<dyn SurrogateKeyIncrementer>) -> Self {
        Self {
            state: Arc::new(RwLock::new(HashMap::new())),
            incrementer,
        }
    }

    fn read_state(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Records>> {
        self.state
            .read()
            .map_err(|err| StoreError::unavailable(std::io::Error::other(err.to_string())))
    }

    fn write_state(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Records>> {
        self.state
            .write()
            .map_err(|err| StoreError::unavailable(std::io::Error::other(err.to_string())))
    }

    fn update_guarded(
        &self,
        id: SurrogateId,
        expected: Version,
        correlation_key: Option<CorrelationKey>,
        message_bytes: Vec<u8>,
    ) -> StoreResult<()> {
        let mut state = self.write_state()?;
        let Some(record) = state.get_mut(&id) else {
            // Matches the relational adapter: a vanished record fails the
            // version guard, with no observed version to report.
            return Err(StoreError::OptimisticLockConflict {
                id,
                expected,
                observed: None,
            });
        };
        if record.version != expected {
            return Err(StoreError::OptimisticLockConflict {
                id,
                expected,
                observed: Some(record.version),
            });
        }
        record.correlation_key = correlation_key;
        record.message_bytes = message_bytes;
        record.version = expected.next();
        Ok(())
    }
}

type Records = HashMap<SurrogateId, StoredRecord>;

fn record_to_envelope(id: SurrogateId, record: &StoredRecord) -> StoreResult<Envelope> {
    Ok(decode_envelope(&record.message_bytes)?.with_identity(id, record.version))
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn put(&self, envelope: &Envelope) -> StoreResult<Envelope> {
        let correlation_key = normalize_token(envelope.correlation_token())?;
        let message_bytes = encode_envelope(envelope)?;

        if let Some(id) = envelope.surrogate_id() {
            let expected = envelope.version().unwrap_or_default();
            self.update_guarded(id, expected, correlation_key, message_bytes)?;
            return Ok(envelope.clone().with_identity(id, expected));
        }

        let id = self.incrementer.next_id().await?;
        let mut state = self.write_state()?;
        state.insert(
            id,
            StoredRecord {
                correlation_key,
                message_bytes,
                version: Version::initial(),
            },
        );
        Ok(envelope.clone().with_identity(id, Version::initial()))
    }

    async fn get(&self, id: SurrogateId) -> StoreResult<Option<Envelope>> {
        let state = self.read_state()?;
        state
            .get(&id)
            .map(|record| record_to_envelope(id, record))
            .transpose()
    }

    async fn delete(&self, id: SurrogateId) -> StoreResult<Option<Envelope>> {
        let mut state = self.write_state()?;
        state
            .remove(&id)
            .map(|record| record_to_envelope(id, &record))
            .transpose()
    }

    async fn list(&self) -> StoreResult<Vec<Envelope>> {
        let state = self.read_state()?;
        state
            .iter()
            .map(|(id, record)| record_to_envelope(*id, record))
            .collect()
    }

    async fn list_by_correlation(&self, token: &Value) -> StoreResult<Vec<Envelope>> {
        let key = CorrelationKey::from_token(token)?;
        let state = self.read_state()?;
        state
            .iter()
            .filter(|(_, record)| record.correlation_key.as_ref() == Some(&key))
            .map(|(id, record)| record_to_envelope(*id, record))
            .collect()
    }
}
