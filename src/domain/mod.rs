//! Domain layer - entities, value objects, and the chore vocabulary.

pub mod foundation;
pub mod instance;
pub mod ledger;
pub mod member;
pub mod schedule;
pub mod template;
