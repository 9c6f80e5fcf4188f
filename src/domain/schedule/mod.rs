//! Schedule module - cadence vocabulary and cycle calculation.
//!
//! Pure date math: no storage, no clock. The materializer feeds in
//! "today" from the reference clock and acts on the results.

mod cadence;
mod cycle;
mod frequency;

pub use cadence::Cadence;
pub use cycle::{compute_due_date, CycleId};
pub use frequency::Frequency;
