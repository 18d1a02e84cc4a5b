//! `PostgreSQL` implementation of the message store ports.

mod models;
mod sequence;
mod sql;
mod store;

pub use sequence::PgSequenceIncrementer;
pub use sql::{DEFAULT_TABLE_PREFIX, StoreQueries};
pub use store::{PostgresMessageStore, StorePgPool};
