//! Adapters - concrete implementations of the ports.

pub mod audit;
pub mod clock;
pub mod document;
pub mod locking;
