//! Large-object codec port.

use crate::store::error::StoreResult;
use std::fmt;

/// Encodes and decodes the serialized envelope blob for a backend's
/// large-object column.
///
/// Most backends accept the serialized bytes as-is, but some require a
/// native large-object representation; substituting a codec at store
/// construction keeps the store logic dialect-agnostic.
pub trait LobCodec: Send + Sync + fmt::Debug {
    /// Converts serialized envelope bytes to the column representation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] when the bytes cannot be
    /// represented for the backend.
    ///
    /// [`StoreError::Serialization`]: crate::store::error::StoreError::Serialization
    fn encode(&self, bytes: &[u8]) -> StoreResult<Vec<u8>>;

    /// Converts a column value back to serialized envelope bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] when the column value is not a
    /// valid encoding.
    ///
    /// [`StoreError::Serialization`]: crate::store::error::StoreError::Serialization
    fn decode(&self, raw: Vec<u8>) -> StoreResult<Vec<u8>>;
}

/// Identity codec for backends whose binary column takes raw bytes
/// directly, such as PostgreSQL `BYTEA`. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteaLobCodec;

impl LobCodec for ByteaLobCodec {
    fn encode(&self, bytes: &[u8]) -> StoreResult<Vec<u8>> {
        Ok(bytes.to_vec())
    }

    fn decode(&self, raw: Vec<u8>) -> StoreResult<Vec<u8>> {
        Ok(raw)
    }
}
