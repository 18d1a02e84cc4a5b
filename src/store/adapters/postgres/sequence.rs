//! Sequence-backed surrogate-key incrementer.

use async_trait::async_trait;
use diesel::PgConnection;
use diesel::RunQueryDsl;
use diesel::r2d2::{ConnectionManager, Pool};

use super::models::NextIdRow;
use super::sql::next_sequence_statement;
use crate::store::domain::SurrogateId;
use crate::store::error::{StoreError, StoreResult};
use crate::store::ports::SurrogateKeyIncrementer;

/// Surrogate-key incrementer backed by a `PostgreSQL` sequence.
///
/// Advances `{prefix}message_seq` with `nextval`, which is monotonically
/// increasing and unique across concurrent sessions. Sequences never roll
/// back, so aborted operations leave gaps; the store tolerates them.
#[derive(Debug, Clone)]
pub struct PgSequenceIncrementer {
    pool: Pool<ConnectionManager<PgConnection>>,
    statement: String,
}

impl PgSequenceIncrementer {
    /// Creates an incrementer for the sequence named by the table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] when the prefix contains
    /// characters outside `[A-Za-z0-9_]`.
    pub fn new(
        pool: Pool<ConnectionManager<PgConnection>>,
        table_prefix: &str,
    ) -> StoreResult<Self> {
        Ok(Self {
            pool,
            statement: next_sequence_statement(table_prefix)?,
        })
    }
}

#[async_trait]
impl SurrogateKeyIncrementer for PgSequenceIncrementer {
    async fn next_id(&self) -> StoreResult<SurrogateId> {
        let pool = self.pool.clone();
        let statement = self.statement.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::unavailable)?;
            let row = diesel::sql_query(statement)
                .get_result::<NextIdRow>(&mut connection)
                .map_err(StoreError::from)?;
            Ok(SurrogateId::new(row.next_id))
        })
        .await
        .map_err(StoreError::unavailable)?
    }
}
