//! Correlation-key normalization.
//!
//! A correlation token is an arbitrary caller-supplied JSON value. Before
//! storage or lookup it is reduced to a fixed-length, comparable key:
//! canonical JSON bytes, hashed with MD5, rendered as 32 lowercase hex
//! characters. The mapping is deterministic across processes (no salt), so
//! independent callers submitting equal tokens land in the same group, and
//! one-way, so the original token cannot be recovered from the key.

use crate::store::error::{StoreError, StoreResult};
use md5::{Digest, Md5};
use serde_json::Value;
use std::fmt;

/// Normalized correlation key: a 32-character lowercase hex MD5 digest.
///
/// Only produced by [`CorrelationKey::from_token`]; there is no way to build
/// one from an arbitrary string, which keeps the column contents uniform.
///
/// # Examples
///
/// ```
/// use depot::store::domain::CorrelationKey;
/// use serde_json::json;
///
/// let a = CorrelationKey::from_token(&json!("order-42")).expect("digest");
/// let b = CorrelationKey::from_token(&json!("order-42")).expect("digest");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationKey(String);

impl CorrelationKey {
    /// Derives the key for a correlation token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] when the token cannot be
    /// rendered to its canonical JSON byte form.
    pub fn from_token(token: &Value) -> StoreResult<Self> {
        let canonical =
            serde_json::to_vec(token).map_err(|err| StoreError::serialization(err.to_string()))?;
        let digest = u128::from_be_bytes(Md5::digest(&canonical).into());
        Ok(Self(format!("{digest:032x}")))
    }

    /// Returns the hex form stored in the correlation-key column.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the owned hex string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes an optional correlation token.
///
/// An absent token yields an absent key: untagged envelopes never collide
/// with each other or with tagged ones on the correlation column.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] when a present token cannot be
/// serialized.
pub fn normalize_token(token: Option<&Value>) -> StoreResult<Option<CorrelationKey>> {
    token.map(CorrelationKey::from_token).transpose()
}
