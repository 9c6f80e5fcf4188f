//! Instance handlers - listing (with reconciliation), one-off creation,
//! and the completion/verification lifecycle.

mod complete_instance;
mod create_instance;
mod list_instances;
mod verify_instance;

pub use complete_instance::{CompleteInstanceCommand, CompleteInstanceHandler, CompleteInstanceResult};
pub use create_instance::{CreateInstanceCommand, CreateInstanceHandler};
pub use list_instances::{ListInstancesHandler, ListInstancesResult};
pub use verify_instance::{VerifyInstanceCommand, VerifyInstanceHandler, VerifyInstanceResult};
