//! Instance materializer.
//!
//! Reconciles a tenant's instances against its templates: exactly one live
//! instance per (template, current cycle), stale pending work expired.
//! Idempotent and synchronous - list handlers run it before every read, so
//! there is no background scheduler.
//!
//! Templates are processed independently. One malformed template is logged
//! and counted as failed; the sweep continues with the rest.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{DomainError, DueDate, InstanceId, TenantId};
use crate::domain::instance::Instance;
use crate::domain::schedule::{compute_due_date, CycleId};
use crate::domain::template::Template;
use crate::ports::{
    AuditEvent, AuditKind, AuditLog, Clock, InstanceRepository, TemplateRepository,
};

/// Outcome counters for one materialization sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializationReport {
    /// Instances created this sweep.
    pub created: usize,

    /// Stale instances deleted by the expire pass.
    pub expired: usize,

    /// Templates whose processing failed and was skipped.
    pub failed: usize,
}

/// Ensures the tenant's instances match its templates for the current
/// cycle.
pub struct Materializer {
    templates: Arc<dyn TemplateRepository>,
    instances: Arc<dyn InstanceRepository>,
    audit: Arc<dyn AuditLog>,
    clock: Arc<dyn Clock>,
}

impl Materializer {
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        instances: Arc<dyn InstanceRepository>,
        audit: Arc<dyn AuditLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            templates,
            instances,
            audit,
            clock,
        }
    }

    /// Runs one sweep over all of the tenant's templates.
    ///
    /// Callers must hold the tenant lock: the sweep read-modify-writes the
    /// instance and template collections.
    pub async fn ensure_instances(
        &self,
        tenant: &TenantId,
    ) -> Result<MaterializationReport, DomainError> {
        let templates = self.templates.list(tenant).await?;
        let mut report = MaterializationReport::default();

        for template in templates {
            match self.reconcile_template(tenant, template).await {
                Ok((created, expired)) => {
                    report.created += created;
                    report.expired += expired;
                }
                Err(err) => {
                    warn!(
                        tenant = %tenant,
                        error = %err,
                        "skipping template after materialization failure"
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    async fn reconcile_template(
        &self,
        tenant: &TenantId,
        mut template: Template,
    ) -> Result<(usize, usize), DomainError> {
        let today = self.clock.today();
        let current_cycle = CycleId::for_date(today, template.cadence().frequency());
        let existing = self.instances.list_by_template(tenant, template.id()).await?;

        // Expire pass. Instances due today or later are never removed,
        // whatever their cycle tag.
        let mut remaining = Vec::with_capacity(existing.len());
        let mut expired = 0;
        let mut expired_current_cycle = false;
        for instance in existing {
            if !instance.status().is_settled() && instance.due_date().is_before(today) {
                self.instances.delete(tenant, instance.id()).await?;
                expired += 1;
                if instance.is_for_cycle(&current_cycle) {
                    expired_current_cycle = true;
                }
                self.audit_expired(tenant, &instance).await;
            } else {
                remaining.push(instance);
            }
        }

        let has_current = remaining.iter().any(|i| i.is_for_cycle(&current_cycle));
        let settled_current = remaining
            .iter()
            .any(|i| i.is_for_cycle(&current_cycle) && i.status().is_settled());

        // Materialize pass. The cursor check stops re-creating an instance
        // the lifecycle engine already settled and the expire pass left
        // alone.
        let mut created = 0;
        let should_create = !has_current
            && !settled_current
            && (expired_current_cycle || !template.cursor_at(&current_cycle));
        if should_create {
            created += self
                .create_instance(tenant, &mut template, &current_cycle, today)
                .await?;
        }

        // Catch-up pass: a prior-cycle instance was settled early, nothing
        // is due yet, and the cursor still lags the current cycle.
        if created == 0 && !has_current && !template.cursor_at(&current_cycle) {
            let prior_settled = remaining
                .iter()
                .any(|i| !i.is_for_cycle(&current_cycle) && i.status().is_settled());
            if prior_settled {
                created += self
                    .create_instance(tenant, &mut template, &current_cycle, today)
                    .await?;
            }
        }

        Ok((created, expired))
    }

    /// Creates the current-cycle instance and advances the cursor. Returns
    /// 0 when the template is exhausted (end date passed).
    async fn create_instance(
        &self,
        tenant: &TenantId,
        template: &mut Template,
        current_cycle: &CycleId,
        today: chrono::NaiveDate,
    ) -> Result<usize, DomainError> {
        // The explicit first due date only applies before any cursor
        // exists.
        let explicit_first = match template.cursor() {
            None => template.first_due_date(),
            Some(_) => None,
        };
        let Some(due_date) = compute_due_date(today, template.cadence(), explicit_first) else {
            return Ok(0);
        };

        let instance = Instance::from_template(
            InstanceId::new(),
            template,
            current_cycle.clone(),
            due_date,
        );
        self.instances.insert(tenant, &instance).await?;

        template.advance_cursor(current_cycle.clone(), due_date);
        self.templates.update(tenant, template).await?;

        self.audit_created(tenant, &instance, due_date).await;
        Ok(1)
    }

    async fn audit_expired(&self, tenant: &TenantId, instance: &Instance) {
        let event = AuditEvent::new(
            tenant.clone(),
            AuditKind::InstanceExpired,
            instance.id().to_string(),
            None,
            format!("Expired overdue instance '{}'", instance.title()),
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }
    }

    async fn audit_created(&self, tenant: &TenantId, instance: &Instance, due: DueDate) {
        let event = AuditEvent::new(
            tenant.clone(),
            AuditKind::InstanceMaterialized,
            instance.id().to_string(),
            None,
            format!("Materialized '{}' due {}", instance.title(), due),
        );
        if let Err(err) = self.audit.append(event).await {
            warn!(error = %err, "failed to append audit event");
        }
    }
}
