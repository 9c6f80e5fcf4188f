//! Instance repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InstanceId, TemplateId, TenantId};
use crate::domain::instance::Instance;

/// Persistence contract for task instances.
#[async_trait]
pub trait InstanceRepository: Send + Sync {
    /// All instances of the tenant.
    async fn list(&self, tenant: &TenantId) -> Result<Vec<Instance>, DomainError>;

    /// Instances materialized from one template.
    async fn list_by_template(
        &self,
        tenant: &TenantId,
        template_id: &TemplateId,
    ) -> Result<Vec<Instance>, DomainError>;

    /// Finds an instance by ID, `None` if absent.
    async fn find_by_id(
        &self,
        tenant: &TenantId,
        id: &InstanceId,
    ) -> Result<Option<Instance>, DomainError>;

    /// Stores a new instance.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the ID already exists
    async fn insert(&self, tenant: &TenantId, instance: &Instance) -> Result<(), DomainError>;

    /// Replaces an existing instance.
    ///
    /// # Errors
    ///
    /// - `InstanceNotFound` if the instance doesn't exist
    async fn update(&self, tenant: &TenantId, instance: &Instance) -> Result<(), DomainError>;

    /// Deletes an instance (expiry sweep, explicit deletion).
    ///
    /// # Errors
    ///
    /// - `InstanceNotFound` if the instance doesn't exist
    async fn delete(&self, tenant: &TenantId, id: &InstanceId) -> Result<(), DomainError>;

    /// Deletes all instances of a template (cascade on template deletion).
    /// Returns how many were removed.
    async fn delete_by_template(
        &self,
        tenant: &TenantId,
        template_id: &TemplateId,
    ) -> Result<usize, DomainError>;
}
