//! Pure domain types for the message store.
//!
//! Nothing in this module touches a backend: envelopes, identifiers, and
//! correlation keys are plain values that adapters map to and from rows.

mod correlation;
mod envelope;
mod ids;

pub use correlation::{CorrelationKey, normalize_token};
pub use envelope::{CORRELATION_HEADER, Envelope, ID_HEADER, VERSION_HEADER};
pub use ids::{SurrogateId, Version};
