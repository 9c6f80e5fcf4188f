//! Instance module - concrete dated occurrences of chores.

mod aggregate;
mod status;

pub use aggregate::{Instance, Subtask};
pub use status::InstanceStatus;
