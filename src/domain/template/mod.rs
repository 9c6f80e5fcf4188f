//! Template module - recurring chore definitions.

mod aggregate;

pub use aggregate::{SchedulerCursor, SubtaskSpec, Template, MAX_TITLE_LENGTH};
