//! Tenant lock manager.

mod in_memory;

pub use in_memory::TenantLockManager;
