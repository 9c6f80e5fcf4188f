//! Ports - contracts toward the external collaborators.
//!
//! Handlers and the materializer depend only on these traits; adapters
//! supply the implementations.

mod audit_log;
mod clock;
mod document_store;
mod instance_repository;
mod member_repository;
mod settings_repository;
mod template_repository;
mod transaction_log;

pub use audit_log::{AuditEvent, AuditKind, AuditLog};
pub use clock::Clock;
pub use document_store::{DocumentStore, VersionedDocument};
pub use instance_repository::InstanceRepository;
pub use member_repository::MemberRepository;
pub use settings_repository::SettingsRepository;
pub use template_repository::TemplateRepository;
pub use transaction_log::TransactionLog;
