//! Durable message store with surrogate keys and optimistic locking.
//!
//! The store persists [`domain::Envelope`] values as binary blobs keyed by a
//! store-assigned surrogate identifier. A caller-supplied correlation token
//! is normalized to a fixed-length digest so that related envelopes can be
//! retrieved as a group. Every update is guarded by a version counter; stale
//! writers receive an [`error::StoreError::OptimisticLockConflict`] instead
//! of silently overwriting newer state.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::Envelope`],
//!   [`domain::SurrogateId`], [`domain::Version`], [`domain::CorrelationKey`])
//! - **Ports**: Abstract trait interfaces ([`ports::MessageStore`],
//!   [`ports::SurrogateKeyIncrementer`], [`ports::LobCodec`])
//! - **Adapters**: Concrete implementations
//!   ([`adapters::memory::InMemoryMessageStore`],
//!   [`adapters::postgres::PostgresMessageStore`])
//!
//! # Example
//!
//! ```
//! use depot::store::adapters::memory::InMemoryMessageStore;
//! use depot::store::domain::Envelope;
//! use depot::store::ports::MessageStore;
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = InMemoryMessageStore::new();
//! let envelope = Envelope::new(json!("hello")).with_correlation_token(json!("order-42"));
//!
//! let stored = store.put(&envelope).await.expect("put");
//! let id = stored.surrogate_id().expect("assigned id");
//!
//! let fetched = store.get(id).await.expect("get").expect("present");
//! assert_eq!(fetched.payload(), &json!("hello"));
//! # });
//! ```

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod error;
pub mod ports;
