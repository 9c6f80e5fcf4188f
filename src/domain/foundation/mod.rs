//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Chorewheel domain.

mod actor;
mod due_date;
mod errors;
mod ids;
mod role;
mod settings;
mod timestamp;

pub use actor::ActorContext;
pub use due_date::DueDate;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{InstanceId, MemberId, TemplateId, TenantId, TransactionId};
pub use role::Role;
pub use settings::TenantSettings;
pub use timestamp::Timestamp;
