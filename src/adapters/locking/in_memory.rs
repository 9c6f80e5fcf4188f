//! In-process per-tenant mutual exclusion.
//!
//! Handlers that read-modify-write a tenant's documents take the tenant
//! lock first, so a materialize-then-act sequence is atomic with respect
//! to other handlers on the same tenant. Different tenants never contend.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::TenantId;

/// Hands out one async mutex per tenant.
#[derive(Debug, Default)]
pub struct TenantLockManager {
    locks: Mutex<HashMap<TenantId, Arc<Mutex<()>>>>,
}

impl TenantLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for a tenant, waiting if another task holds it.
    /// The guard is owned so it can cross await points freely.
    pub async fn acquire(&self, tenant: &TenantId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(tenant.clone()).or_default())
        };
        lock.lock_owned().await
    }
}
