//! Template handlers - parent-only CRUD over recurring chore definitions.

mod create_template;
mod delete_template;
mod update_template;

pub use create_template::{CreateTemplateCommand, CreateTemplateHandler};
pub use delete_template::{DeleteTemplateCommand, DeleteTemplateHandler, DeleteTemplateResult};
pub use update_template::{UpdateTemplateCommand, UpdateTemplateHandler};
