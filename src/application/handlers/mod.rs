//! Command and query handlers.
//!
//! Each handler owns its port dependencies behind `Arc<dyn ...>`, takes a
//! command plus the verified [`ActorContext`], acquires the tenant lock
//! for any read-modify-write, and returns structured `DomainError`s.
//!
//! [`ActorContext`]: crate::domain::foundation::ActorContext

pub mod instance;
pub mod points;
pub mod template;
