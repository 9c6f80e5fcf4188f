//! Tenant settings port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TenantId, TenantSettings};

/// Access to per-tenant behavior settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// The tenant's settings, or the defaults when none were stored.
    async fn get(&self, tenant: &TenantId) -> Result<TenantSettings, DomainError>;

    /// Replaces the tenant's settings.
    async fn save(&self, tenant: &TenantId, settings: &TenantSettings) -> Result<(), DomainError>;
}
