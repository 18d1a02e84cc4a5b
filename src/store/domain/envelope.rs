//! Message envelope: a payload value plus an ordered header map.

use super::ids::{SurrogateId, Version};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Header holding the store-assigned surrogate key once a record exists.
///
/// Reserved: the store overwrites this header on every operation that
/// returns an envelope, so caller-written values never survive a round trip.
pub const ID_HEADER: &str = "depot.id";

/// Header holding the optimistic-lock version once a record exists.
///
/// Reserved in the same way as [`ID_HEADER`].
pub const VERSION_HEADER: &str = "depot.version";

/// Header carrying the caller-supplied correlation token, if any.
///
/// Not reserved: callers set it freely via
/// [`Envelope::with_correlation_token`] and the store only reads it.
pub const CORRELATION_HEADER: &str = "depot.correlation_id";

/// A message envelope: payload value plus ordered header mapping.
///
/// Envelopes are what callers submit to and receive from the store. The
/// payload is opaque to the store; headers are a `BTreeMap` so that their
/// serialized form is deterministic. Two header names are reserved and
/// store-managed ([`ID_HEADER`], [`VERSION_HEADER`]): the store is the sole
/// writer of their values.
///
/// # Examples
///
/// ```
/// use depot::store::domain::Envelope;
/// use serde_json::json;
///
/// let envelope = Envelope::new(json!({"body": "hello"}))
///     .with_header("source", json!("billing"))
///     .with_correlation_token(json!("order-42"));
///
/// assert_eq!(envelope.header("source"), Some(&json!("billing")));
/// assert!(envelope.surrogate_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    payload: Value,
    headers: BTreeMap<String, Value>,
}

impl Envelope {
    /// Creates an envelope around a payload with no headers.
    #[must_use]
    pub const fn new(payload: Value) -> Self {
        Self {
            payload,
            headers: BTreeMap::new(),
        }
    }

    /// Returns the envelope with the given header set.
    ///
    /// The reserved [`ID_HEADER`] and [`VERSION_HEADER`] belong to the
    /// store: re-submitting an envelope the store returned is how updates
    /// are addressed, but hand-written values for these headers are not
    /// meaningful and every returned envelope carries store-written values.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: Value) -> Self {
        self.headers.insert(name.into(), value);
        self
    }

    /// Returns the envelope with the correlation token header set.
    #[must_use]
    pub fn with_correlation_token(self, token: Value) -> Self {
        self.with_header(CORRELATION_HEADER, token)
    }

    /// Returns the payload value.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the full header mapping.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, Value> {
        &self.headers
    }

    /// Returns a header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&Value> {
        self.headers.get(name)
    }

    /// Returns the caller-supplied correlation token, if present.
    #[must_use]
    pub fn correlation_token(&self) -> Option<&Value> {
        self.headers.get(CORRELATION_HEADER)
    }

    /// Returns the surrogate key from the reserved id header.
    ///
    /// `None` marks the envelope as new: the store will insert it rather
    /// than attempt an update.
    #[must_use]
    pub fn surrogate_id(&self) -> Option<SurrogateId> {
        self.headers
            .get(ID_HEADER)
            .and_then(Value::as_i64)
            .map(SurrogateId::new)
    }

    /// Returns the version counter from the reserved version header.
    #[must_use]
    pub fn version(&self) -> Option<Version> {
        self.headers
            .get(VERSION_HEADER)
            .and_then(Value::as_i64)
            .and_then(|value| i32::try_from(value).ok())
            .map(Version::new)
    }

    /// Returns the envelope with both reserved headers set from store state.
    ///
    /// Store adapters call this on every returned envelope; it is not meant
    /// for general callers, whose writes to the reserved headers the store
    /// overwrites anyway.
    #[must_use]
    pub fn with_identity(mut self, id: SurrogateId, version: Version) -> Self {
        self.headers
            .insert(ID_HEADER.to_owned(), Value::from(id.as_i64()));
        self.headers
            .insert(VERSION_HEADER.to_owned(), Value::from(version.as_i32()));
        self
    }
}
