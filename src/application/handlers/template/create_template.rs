//! CreateTemplateHandler - creates a recurring chore definition.

use std::sync::Arc;

use tracing::warn;

use crate::adapters::locking::TenantLockManager;
use crate::domain::foundation::{ActorContext, DomainError, DueDate, MemberId, TemplateId};
use crate::domain::schedule::Cadence;
use crate::domain::template::{SubtaskSpec, Template};
use crate::ports::{AuditEvent, AuditKind, AuditLog, TemplateRepository};

/// Command to create a template.
#[derive(Debug, Clone)]
pub struct CreateTemplateCommand {
    pub title: String,
    pub description: Option<String>,

    /// Empty set means instances start unassigned and may be claimed.
    pub assignees: Vec<MemberId>,

    pub points: u32,
    pub cadence: Cadence,

    /// Subtask titles copied onto every materialized instance.
    pub subtasks: Vec<String>,

    /// Explicit due date for the first instance, if any.
    pub first_due_date: Option<DueDate>,
}

/// Handler for creating templates.
pub struct CreateTemplateHandler {
    templates: Arc<dyn TemplateRepository>,
    locks: Arc<TenantLockManager>,
    audit: Arc<dyn AuditLog>,
}

impl CreateTemplateHandler {
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        locks: Arc<TenantLockManager>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            templates,
            locks,
            audit,
        }
    }

    /// # Errors
    ///
    /// - `Forbidden` if the actor is not a parent
    /// - `ValidationFailed` for a bad title, points, or subtask title
    pub async fn handle(
        &self,
        cmd: CreateTemplateCommand,
        ctx: ActorContext,
    ) -> Result<Template, DomainError> {
        ctx.require_parent()?;

        let subtasks = cmd
            .subtasks
            .into_iter()
            .map(SubtaskSpec::new)
            .collect::<Result<Vec<_>, _>>()?;

        let template = Template::new(
            TemplateId::new(),
            cmd.title,
            cmd.description,
            cmd.assignees,
            ctx.actor.clone(),
            cmd.points,
            cmd.cadence,
            subtasks,
            cmd.first_due_date,
        )?;

        let _guard = self.locks.acquire(&ctx.tenant).await;
        self.templates.insert(&ctx.tenant, &template).await?;

        let event = AuditEvent::new(
            ctx.tenant.clone(),
            AuditKind::TemplateCreated,
            template.id().to_string(),
            Some(ctx.actor),
            format!("Created template '{}'", template.title()),
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }

        Ok(template)
    }
}
