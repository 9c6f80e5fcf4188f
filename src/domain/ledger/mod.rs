//! Ledger module - append-only points transaction history.

mod transaction;

pub use transaction::{Direction, PointsTransaction};
