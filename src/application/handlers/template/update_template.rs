//! UpdateTemplateHandler - edits a template in place.
//!
//! Only fields carrying `Some` are changed. The scheduler cursor is never
//! touched here; already-materialized instances keep their copied fields.

use std::sync::Arc;

use tracing::warn;

use crate::adapters::locking::TenantLockManager;
use crate::domain::foundation::{
    ActorContext, DomainError, ErrorCode, MemberId, TemplateId,
};
use crate::domain::schedule::Cadence;
use crate::domain::template::{SubtaskSpec, Template};
use crate::ports::{AuditEvent, AuditKind, AuditLog, TemplateRepository};

/// Command to update a template. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplateCommand {
    pub template_id: TemplateId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub points: Option<u32>,
    pub cadence: Option<Cadence>,
    pub assignees: Option<Vec<MemberId>>,
    pub subtasks: Option<Vec<String>>,
}

/// Handler for updating templates.
pub struct UpdateTemplateHandler {
    templates: Arc<dyn TemplateRepository>,
    locks: Arc<TenantLockManager>,
    audit: Arc<dyn AuditLog>,
}

impl UpdateTemplateHandler {
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
    /// - `TemplateNotFound` if the template doesn't exist
    /// - `ValidationFailed` for a bad title, points, or subtask title
    pub async fn handle(
        &self,
        cmd: UpdateTemplateCommand,
        ctx: ActorContext,
    ) -> Result<Template, DomainError> {
        ctx.require_parent()?;

        let _guard = self.locks.acquire(&ctx.tenant).await;

        let mut template = self
            .templates
            .find_by_id(&ctx.tenant, &cmd.template_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::TemplateNotFound, "Template not found")
                    .with_detail("template_id", cmd.template_id.to_string())
            })?;

        if let Some(title) = cmd.title {
            template.rename(title)?;
        }
        if let Some(description) = cmd.description {
            template.update_description(Some(description));
        }
        if let Some(points) = cmd.points {
            template.set_points(points)?;
        }
        if let Some(cadence) = cmd.cadence {
            template.set_cadence(cadence);
        }
        if let Some(assignees) = cmd.assignees {
            template.set_assignees(assignees);
        }
        if let Some(subtasks) = cmd.subtasks {
            let specs = subtasks
                .into_iter()
                .map(SubtaskSpec::new)
                .collect::<Result<Vec<_>, _>>()?;
            template.set_subtasks(specs);
        }

        self.templates.update(&ctx.tenant, &template).await?;

        let event = AuditEvent::new(
            ctx.tenant.clone(),
            AuditKind::TemplateUpdated,
            template.id().to_string(),
            Some(ctx.actor),
            format!("Updated template '{}'", template.title()),
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }

        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::audit::RingBufferAuditLog;
    use crate::adapters::document::{DocumentRepositories, InMemoryDocumentStore};
    use crate::domain::schedule::Frequency;

    async fn seeded_handler() -> (UpdateTemplateHandler, DocumentRepositories, Template) {
        let repos = DocumentRepositories::new(Arc::new(InMemoryDocumentStore::new()));
        let ctx = ActorContext::test_parent();
        let template = Template::new(
            TemplateId::new(),
            "Dishes".to_string(),
            None,
            vec![],
            ctx.actor.clone(),
            10,
            Cadence::simple(Frequency::Daily),
            vec![],
            None,
        )
        .unwrap();
        TemplateRepository::insert(&repos, &ctx.tenant, &template)
            .await
            .unwrap();

        let handler = UpdateTemplateHandler::new(
            Arc::new(repos.clone()),
            Arc::new(TenantLockManager::new()),
            Arc::new(RingBufferAuditLog::default()),
        );
        (handler, repos, template)
    }

    #[tokio::test]
    async fn updates_only_provided_fields() {
        let (handler, repos, template) = seeded_handler().await;
        let ctx = ActorContext::test_parent();

        let cmd = UpdateTemplateCommand {
            template_id: *template.id(),
            points: Some(25),
            ..Default::default()
        };
        let updated = handler.handle(cmd, ctx.clone()).await.unwrap();

        assert_eq!(updated.points(), 25);
        assert_eq!(updated.title(), "Dishes");

        let stored = TemplateRepository::find_by_id(&repos, &ctx.tenant, template.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.points(), 25);
    }

    #[tokio::test]
    async fn missing_template_is_not_found() {
        let (handler, _, _) = seeded_handler().await;

        let cmd = UpdateTemplateCommand {
            template_id: TemplateId::new(),
            title: Some("New".to_string()),
            ..Default::default()
        };
        let err = handler
            .handle(cmd, ActorContext::test_parent())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TemplateNotFound);
    }

    #[tokio::test]
    async fn child_is_forbidden() {
        let (handler, _, template) = seeded_handler().await;

        let cmd = UpdateTemplateCommand {
            template_id: *template.id(),
            title: Some("New".to_string()),
            ..Default::default()
        };
        let err = handler
            .handle(cmd, ActorContext::test_child("kid-1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn invalid_title_is_rejected_without_persisting() {
        let (handler, repos, template) = seeded_handler().await;
        let ctx = ActorContext::test_parent();

        let cmd = UpdateTemplateCommand {
            template_id: *template.id(),
            title: Some("".to_string()),
            ..Default::default()
        };
        assert!(handler.handle(cmd, ctx.clone()).await.is_err());

        let stored = TemplateRepository::find_by_id(&repos, &ctx.tenant, template.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title(), "Dishes");
    }
}
