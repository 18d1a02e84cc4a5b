//! SQL statement templates for the message table.
//!
//! The statements are data, not per-dialect branches: each template carries
//! a `%PREFIX%` substitution point that is replaced with the configured
//! table prefix exactly once, at store construction. Row values are always
//! passed as binds; only the prefix is interpolated into SQL text, and it is
//! validated to a safe identifier charset because binds cannot cover
//! identifiers.

use crate::store::error::{StoreError, StoreResult};

/// Default table prefix; yields the `depot_message` table and the
/// `depot_message_seq` sequence provisioned by the crate's migrations.
pub const DEFAULT_TABLE_PREFIX: &str = "depot_";

const PREFIX_TOKEN: &str = "%PREFIX%";

const SELECT_BY_ID: &str = "SELECT message_id, correlation_key, message_bytes, version \
     FROM %PREFIX%message WHERE message_id = $1";

const SELECT_ALL: &str =
    "SELECT message_id, correlation_key, message_bytes, version FROM %PREFIX%message";

const SELECT_BY_CORRELATION: &str =
    "SELECT message_id, correlation_key, message_bytes, version \
     FROM %PREFIX%message WHERE correlation_key = $1";

const SELECT_CURRENT_VERSION: &str =
    "SELECT version FROM %PREFIX%message WHERE message_id = $1";

const INSERT_MESSAGE: &str =
    "INSERT INTO %PREFIX%message (message_id, correlation_key, message_bytes, version) \
     VALUES ($1, $2, $3, $4)";

const UPDATE_MESSAGE: &str = "UPDATE %PREFIX%message \
     SET correlation_key = $1, message_bytes = $2, version = $3 \
     WHERE version = $4 AND message_id = $5";

const DELETE_BY_ID: &str = "DELETE FROM %PREFIX%message WHERE message_id = $1";

const NEXT_SEQUENCE_VALUE: &str = "SELECT nextval('%PREFIX%message_seq') AS next_id";

/// The message-table statements, rendered once for a validated prefix.
#[derive(Debug, Clone)]
pub struct StoreQueries {
    select_by_id: String,
    select_all: String,
    select_by_correlation: String,
    select_current_version: String,
    insert_message: String,
    update_message: String,
    delete_by_id: String,
}

impl StoreQueries {
    /// Renders the statement set for a table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] when the prefix contains
    /// characters outside `[A-Za-z0-9_]`.
    pub fn new(table_prefix: &str) -> StoreResult<Self> {
        validate_prefix(table_prefix)?;
        Ok(Self {
            select_by_id: render(SELECT_BY_ID, table_prefix),
            select_all: render(SELECT_ALL, table_prefix),
            select_by_correlation: render(SELECT_BY_CORRELATION, table_prefix),
            select_current_version: render(SELECT_CURRENT_VERSION, table_prefix),
            insert_message: render(INSERT_MESSAGE, table_prefix),
            update_message: render(UPDATE_MESSAGE, table_prefix),
            delete_by_id: render(DELETE_BY_ID, table_prefix),
        })
    }

    /// Select one record by surrogate key.
    #[must_use]
    pub fn select_by_id(&self) -> &str {
        &self.select_by_id
    }

    /// Select every record.
    #[must_use]
    pub fn select_all(&self) -> &str {
        &self.select_all
    }

    /// Select records by normalized correlation key.
    #[must_use]
    pub fn select_by_correlation(&self) -> &str {
        &self.select_by_correlation
    }

    /// Best-effort read of the current version for conflict diagnostics.
    #[must_use]
    pub fn select_current_version(&self) -> &str {
        &self.select_current_version
    }

    /// Insert a new record.
    #[must_use]
    pub fn insert_message(&self) -> &str {
        &self.insert_message
    }

    /// Version-guarded update of an existing record.
    #[must_use]
    pub fn update_message(&self) -> &str {
        &self.update_message
    }

    /// Delete one record by surrogate key.
    #[must_use]
    pub fn delete_by_id(&self) -> &str {
        &self.delete_by_id
    }
}

/// Renders the sequence-advance statement for a table prefix.
///
/// # Errors
///
/// Returns [`StoreError::Configuration`] when the prefix contains characters
/// outside `[A-Za-z0-9_]`.
pub(crate) fn next_sequence_statement(table_prefix: &str) -> StoreResult<String> {
    validate_prefix(table_prefix)?;
    Ok(render(NEXT_SEQUENCE_VALUE, table_prefix))
}

fn render(template: &str, table_prefix: &str) -> String {
    template.replace(PREFIX_TOKEN, table_prefix)
}

fn validate_prefix(table_prefix: &str) -> StoreResult<()> {
    let valid = table_prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::configuration(format!(
            "table prefix {table_prefix:?} must match [A-Za-z0-9_]"
        )))
    }
}
