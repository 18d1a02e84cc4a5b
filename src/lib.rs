//! Depot: durable relational message store.
//!
//! This crate persists discrete, serializable message envelopes in a
//! relational backend so that they survive process restarts and can be
//! retrieved individually, by caller-supplied correlation identifier, or in
//! bulk. Updates are guarded by an optimistic-locking protocol; concurrent
//! conflicting writes are detected by the backend and reported to the caller.
//!
//! # Architecture
//!
//! Depot follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`store`]: Message store domain, ports, and adapters

pub mod store;
