//! Template repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TemplateId, TenantId};
use crate::domain::template::Template;

/// Persistence contract for chore templates.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// All templates of the tenant.
    async fn list(&self, tenant: &TenantId) -> Result<Vec<Template>, DomainError>;

    /// Finds a template by ID, `None` if absent.
    async fn find_by_id(
        &self,
        tenant: &TenantId,
        id: &TemplateId,
    ) -> Result<Option<Template>, DomainError>;

    /// Stores a new template.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the ID already exists
    async fn insert(&self, tenant: &TenantId, template: &Template) -> Result<(), DomainError>;

    /// Replaces an existing template (including cursor advances).
    ///
    /// # Errors
    ///
    /// - `TemplateNotFound` if the template doesn't exist
    async fn update(&self, tenant: &TenantId, template: &Template) -> Result<(), DomainError>;

    /// Deletes a template. Instance cascade is the caller's job.
    ///
    /// # Errors
    ///
    /// - `TemplateNotFound` if the template doesn't exist
    async fn delete(&self, tenant: &TenantId, id: &TemplateId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn TemplateRepository) {}
    }
}
