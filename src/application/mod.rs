//! Application layer - the materializer, the award service, and the
//! command handlers that tie domain logic to the ports.

pub mod handlers;

mod awards;
mod materializer;

pub use awards::AwardService;
pub use materializer::{MaterializationReport, Materializer};
