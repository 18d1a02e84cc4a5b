//! Concrete message store implementations.

pub mod memory;
pub mod postgres;
