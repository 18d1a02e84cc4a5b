//! Diesel row models for the message table.

use diesel::QueryableByName;
use diesel::sql_types::{BigInt, Binary, Integer, Nullable, VarChar};

/// Query result row for stored message records.
#[derive(Debug, QueryableByName)]
pub(super) struct MessageRow {
    /// Surrogate key column.
    #[diesel(sql_type = BigInt)]
    pub message_id: i64,
    /// Normalized correlation key, absent for untagged messages.
    #[diesel(sql_type = Nullable<VarChar>)]
    pub correlation_key: Option<String>,
    /// Serialized envelope blob.
    #[diesel(sql_type = Binary)]
    pub message_bytes: Vec<u8>,
    /// Optimistic-lock version counter.
    #[diesel(sql_type = Integer)]
    pub version: i32,
}

/// Scalar row for the best-effort current-version read.
#[derive(Debug, QueryableByName)]
pub(super) struct VersionRow {
    #[diesel(sql_type = Integer)]
    pub version: i32,
}

/// Scalar row for sequence advancement.
#[derive(Debug, QueryableByName)]
pub(super) struct NextIdRow {
    #[diesel(sql_type = BigInt)]
    pub next_id: i64,
}
