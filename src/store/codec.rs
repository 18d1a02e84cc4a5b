//! Envelope serialization to and from the binary blob column.
//!
//! The wire form is the envelope's JSON rendering as bytes. Serialization
//! always happens before any conditional write, so an encoding failure can
//! never leave a partially written record.

use crate::store::domain::Envelope;
use crate::store::error::{StoreError, StoreResult};

/// Serializes an envelope to its stored binary form.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] when the payload or a header value
/// cannot be rendered.
pub fn encode_envelope(envelope: &Envelope) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(envelope).map_err(|err| StoreError::serialization(err.to_string()))
}

/// Deserializes an envelope from its stored binary form.
///
/// Adapters override the reserved id/version headers from the row columns
/// after decoding; the blob's own copies of those headers reflect the state
/// at write time.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] when the bytes are not a valid
/// envelope encoding.
pub fn decode_envelope(bytes: &[u8]) -> StoreResult<Envelope> {
    serde_json::from_slice(bytes).map_err(|err| StoreError::serialization(err.to_string()))
}
