//! DeleteTemplateHandler - removes a template and all of its instances.

use std::sync::Arc;

use tracing::warn;

use crate::adapters::locking::TenantLockManager;
use crate::domain::foundation::{ActorContext, DomainError, ErrorCode, TemplateId};
use crate::ports::{AuditEvent, AuditKind, AuditLog, InstanceRepository, TemplateRepository};

/// Command to delete a template.
#[derive(Debug, Clone)]
pub struct DeleteTemplateCommand {
    pub template_id: TemplateId,
}

/// Result of a cascade deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteTemplateResult {
    /// Instances removed alongside the template.
    pub removed_instances: usize,
}

/// Handler for deleting templates.
pub struct DeleteTemplateHandler {
    templates: Arc<dyn TemplateRepository>,
    instances: Arc<dyn InstanceRepository>,
    locks: Arc<TenantLockManager>,
    audit: Arc<dyn AuditLog>,
}

impl DeleteTemplateHandler {
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        instances: Arc<dyn InstanceRepository>,
        locks: Arc<TenantLockManager>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            templates,
            instances,
            locks,
            audit,
        }
    }

    /// # Errors
    ///
    /// - `Forbidden` if the actor is not a parent
    /// - `TemplateNotFound` if the template doesn't exist
    pub async fn handle(
        &self,
        cmd: DeleteTemplateCommand,
        ctx: ActorContext,
    ) -> Result<DeleteTemplateResult, DomainError> {
        ctx.require_parent()?;

        let _guard = self.locks.acquire(&ctx.tenant).await;

        let template = self
            .templates
            .find_by_id(&ctx.tenant, &cmd.template_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::TemplateNotFound, "Template not found")
                    .with_detail("template_id", cmd.template_id.to_string())
            })?;

        let removed_instances = self
            .instances
            .delete_by_template(&ctx.tenant, &cmd.template_id)
            .await?;
        self.templates.delete(&ctx.tenant, &cmd.template_id).await?;

        let event = AuditEvent::new(
            ctx.tenant.clone(),
            AuditKind::TemplateDeleted,
            cmd.template_id.to_string(),
            Some(ctx.actor),
            format!(
                "Deleted template '{}' and {} instance(s)",
                template.title(),
                removed_instances
            ),
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }

        Ok(DeleteTemplateResult { removed_instances })
    }
}
