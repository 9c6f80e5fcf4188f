//! CreateInstanceHandler - parent-created one-off tasks.
//!
//! One-offs have no template and no cycle tag; the materializer never
//! touches them beyond the ordinary expiry rules.

use std::sync::Arc;

use tracing::warn;

use crate::adapters::locking::TenantLockManager;
use crate::domain::foundation::{ActorContext, DomainError, DueDate, InstanceId, MemberId};
use crate::domain::instance::{Instance, Subtask};
use crate::domain::template::SubtaskSpec;
use crate::ports::{AuditEvent, AuditKind, AuditLog, InstanceRepository};

/// Command to create a one-off instance.
#[derive(Debug, Clone)]
pub struct CreateInstanceCommand {
    pub title: String,
    pub description: Option<String>,
    pub subtasks: Vec<String>,
    pub assignees: Vec<MemberId>,
    pub due_date: DueDate,
    pub points: u32,
}

/// Handler for creating one-off instances.
pub struct CreateInstanceHandler {
    instances: Arc<dyn InstanceRepository>,
    locks: Arc<TenantLockManager>,
    audit: Arc<dyn AuditLog>,
}

impl CreateInstanceHandler {
    pub fn new(
        instances: Arc<dyn InstanceRepository>,
        locks: Arc<TenantLockManager>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            instances,
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
        cmd: CreateInstanceCommand,
        ctx: ActorContext,
    ) -> Result<Instance, DomainError> {
        ctx.require_parent()?;

        let subtasks = cmd
            .subtasks
            .into_iter()
            .map(|title| {
                SubtaskSpec::new(title).map(|spec| Subtask {
                    title: spec.title,
                    done: false,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let instance = Instance::one_off(
            InstanceId::new(),
            cmd.title,
            cmd.description,
            subtasks,
            cmd.assignees,
            cmd.due_date,
            cmd.points,
        )?;

        let _guard = self.locks.acquire(&ctx.tenant).await;
        self.instances.insert(&ctx.tenant, &instance).await?;

        let event = AuditEvent::new(
            ctx.tenant.clone(),
            AuditKind::InstanceCreated,
            instance.id().to_string(),
            Some(ctx.actor),
            format!("Created one-off task '{}'", instance.title()),
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }

        Ok(instance)
    }
}
