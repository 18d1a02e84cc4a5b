//! `PostgreSQL` message store.
//!
//! Persists envelopes as binary blobs through raw parameterized statements
//! (the table name carries a configurable prefix, which rules out the query
//! builder). Conflict detection is pushed to the database: the update
//! statement only matches while the stored version equals the version the
//! writer read, so the backend's row-level atomicity is the sole
//! synchronization primitive.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Binary, Integer, Nullable, VarChar};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::error;

use super::models::{MessageRow, VersionRow};
use super::sequence::PgSequenceIncrementer;
use super::sql::{DEFAULT_TABLE_PREFIX, StoreQueries};
use crate::store::codec::{decode_envelope, encode_envelope};
use crate::store::domain::{CorrelationKey, Envelope, SurrogateId, Version, normalize_token};
use crate::store::error::{StoreError, StoreResult};
use crate::store::ports::{ByteaLobCodec, LobCodec, MessageStore, SurrogateKeyIncrementer};

/// `PostgreSQL` connection pool type used by the store.
pub type StorePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed [`MessageStore`].
///
/// Uses Diesel with r2d2 pooling; a connection is acquired per operation and
/// released on every exit path. Thread-safe for concurrent access.
///
/// # Example
///
/// ```ignore
/// use diesel::r2d2::{ConnectionManager, Pool};
/// use diesel::PgConnection;
/// use depot::store::adapters::postgres::PostgresMessageStore;
///
/// let manager = ConnectionManager::<PgConnection>::new("postgres://...");
/// let pool = Pool::builder().build(manager).expect("pool");
/// let store = PostgresMessageStore::new(pool).expect("store");
/// ```
#[derive(Clone)]
pub struct PostgresMessageStore {
    pool: StorePgPool,
    queries: Arc<StoreQueries>,
    incrementer: Arc<dyn SurrogateKeyIncrementer>,
    lob_codec: Arc<dyn LobCodec>,
}

impl fmt::Debug for PostgresMessageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresMessageStore")
            .field("queries", &self.queries)
            .finish_non_exhaustive()
    }
}

impl PostgresMessageStore {
    /// Creates a store with the default table prefix, a sequence-backed
    /// incrementer, and the identity `BYTEA` codec.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] when statement rendering fails.
    pub fn new(pool: StorePgPool) -> StoreResult<Self> {
        Self::with_table_prefix(pool, DEFAULT_TABLE_PREFIX)
    }

    /// Creates a store whose table and sequence names use the given prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] when the prefix contains
    /// characters outside `[A-Za-z0-9_]`.
    pub fn with_table_prefix(pool: StorePgPool, table_prefix: &str) -> StoreResult<Self> {
        let queries = Arc::new(StoreQueries::new(table_prefix)?);
        let incrementer = Arc::new(PgSequenceIncrementer::new(pool.clone(), table_prefix)?);
        Ok(Self {
            pool,
            queries,
            incrementer,
            lob_codec: Arc::new(ByteaLobCodec),
        })
    }

    /// Replaces the surrogate-key allocation strategy.
    #[must_use]
    pub fn with_incrementer(mut self, incrementer: Arc<dyn SurrogateKeyIncrementer>) -> Self {
        self.incrementer = incrementer;
        self
    }

    /// Replaces the large-object codec.
    #[must_use]
    pub fn with_lob_codec(mut self, lob_codec: Arc<dyn LobCodec>) -> Self {
        self.lob_codec = lob_codec;
        self
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::unavailable)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::unavailable)?
    }

    async fn insert(
        &self,
        id: SurrogateId,
        correlation_key: Option<CorrelationKey>,
        message_bytes: Vec<u8>,
    ) -> StoreResult<()> {
        let queries = Arc::clone(&self.queries);
        self.run_blocking(move |connection| {
            diesel::sql_query(queries.insert_message())
                .bind::<BigInt, _>(id.as_i64())
                .bind::<Nullable<VarChar>, _>(correlation_key.map(CorrelationKey::into_inner))
                .bind::<Binary, _>(message_bytes)
                .bind::<Integer, _>(Version::initial().as_i32())
                .execute(connection)
                .map_err(StoreError::from)?;
            Ok(())
        })
        .await
    }

    async fn update_guarded(
        &self,
        id: SurrogateId,
        expected: Version,
        correlation_key: Option<CorrelationKey>,
        message_bytes: Vec<u8>,
    ) -> StoreResult<()> {
        let queries = Arc::clone(&self.queries);
        self.run_blocking(move |connection| {
            let affected = diesel::sql_query(queries.update_message())
                .bind::<Nullable<VarChar>, _>(correlation_key.map(CorrelationKey::into_inner))
                .bind::<Binary, _>(message_bytes)
                .bind::<Integer, _>(expected.next().as_i32())
                .bind::<Integer, _>(expected.as_i32())
                .bind::<BigInt, _>(id.as_i64())
                .execute(connection)
                .map_err(StoreError::from)?;

            match affected {
                1 => Ok(()),
                0 => Err(StoreError::OptimisticLockConflict {
                    id,
                    expected,
                    observed: current_version(connection, &queries, id),
                }),
                rows => {
                    error!(%id, rows, "guarded update matched multiple rows for one surrogate key");
                    Err(StoreError::Integrity { id, rows })
                }
            }
        })
        .await
    }

    fn row_to_envelope(&self, row: MessageRow) -> StoreResult<Envelope> {
        let message_bytes = self.lob_codec.decode(row.message_bytes)?;
        Ok(decode_envelope(&message_bytes)?
            .with_identity(SurrogateId::new(row.message_id), Version::new(row.version)))
    }
}

/// Best-effort read of the stored version for conflict diagnostics.
///
/// A failure here (including a concurrently deleted record) degrades the
/// conflict report, never the operation outcome.
fn current_version(
    connection: &mut PgConnection,
    queries: &StoreQueries,
    id: SurrogateId,
) -> Option<Version> {
    diesel::sql_query(queries.select_current_version())
        .bind::<BigInt, _>(id.as_i64())
        .get_result::<VersionRow>(connection)
        .ok()
        .map(|row| Version::new(row.version))
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn put(&self, envelope: &Envelope) -> StoreResult<Envelope> {
        // Normalize and serialize before touching the database so that a
        // failure cannot leave a partially written record.
        let correlation_key = normalize_token(envelope.correlation_token())?;
        let message_bytes = self.lob_codec.encode(&encode_envelope(envelope)?)?;

        if let Some(id) = envelope.surrogate_id() {
            let expected = envelope.version().unwrap_or_default();
            self.update_guarded(id, expected, correlation_key, message_bytes)
                .await?;
            // The returned header keeps the pre-increment version; the
            // committed row is one higher. See `MessageStore::put`.
            return Ok(envelope.clone().with_identity(id, expected));
        }

        let id = self.incrementer.next_id().await?;
        self.insert(id, correlation_key, message_bytes).await?;
        Ok(envelope.clone().with_identity(id, Version::initial()))
    }

    async fn get(&self, id: SurrogateId) -> StoreResult<Option<Envelope>> {
        let queries = Arc::clone(&self.queries);
        let row = self
            .run_blocking(move |connection| {
                diesel::sql_query(queries.select_by_id())
                    .bind::<BigInt, _>(id.as_i64())
                    .get_result::<MessageRow>(connection)
                    .optional()
                    .map_err(StoreError::from)
            })
            .await?;
        row.map(|row| self.row_to_envelope(row)).transpose()
    }

    async fn delete(&self, id: SurrogateId) -> StoreResult<Option<Envelope>> {
        let Some(envelope) = self.get(id).await? else {
            return Ok(None);
        };

        let queries = Arc::clone(&self.queries);
        let affected = self
            .run_blocking(move |connection| {
                diesel::sql_query(queries.delete_by_id())
                    .bind::<BigInt, _>(id.as_i64())
                    .execute(connection)
                    .map_err(StoreError::from)
            })
            .await?;

        match affected {
            1 => Ok(Some(envelope)),
            // Lost the race with a concurrent delete.
            0 => Ok(None),
            rows => {
                error!(%id, rows, "delete matched multiple rows for one surrogate key");
                Err(StoreError::Integrity { id, rows })
            }
        }
    }

    async fn list(&self) -> StoreResult<Vec<Envelope>> {
        let queries = Arc::clone(&self.queries);
        let rows = self
            .run_blocking(move |connection| {
                diesel::sql_query(queries.select_all())
                    .load::<MessageRow>(connection)
                    .map_err(StoreError::from)
            })
            .await?;
        rows.into_iter().map(|row| self.row_to_envelope(row)).collect()
    }

    async fn list_by_correlation(&self, token: &Value) -> StoreResult<Vec<Envelope>> {
        let key = CorrelationKey::from_token(token)?;
        let queries = Arc::clone(&self.queries);
        let rows = self
            .run_blocking(move |connection| {
                diesel::sql_query(queries.select_by_correlation())
                    .bind::<VarChar, _>(key.into_inner())
                    .load::<MessageRow>(connection)
                    .map_err(StoreError::from)
            })
            .await?;
        rows.into_iter().map(|row| self.row_to_envelope(row)).collect()
    }
}
