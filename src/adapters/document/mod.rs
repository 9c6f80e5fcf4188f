//! Document store adapters and the typed repositories layered on them.

mod in_memory;
mod json_file;
mod repositories;

pub use in_memory::InMemoryDocumentStore;
pub use json_file::JsonFileDocumentStore;
pub use repositories::DocumentRepositories;
