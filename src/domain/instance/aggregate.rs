//! Instance aggregate entity.
//!
//! One concrete, dated occurrence of a chore: materialized from a template
//! for a cycle, or created directly as a one-off. Title, description and
//! subtasks are copied from the template at creation time and mutate
//! independently afterwards.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, DueDate, ErrorCode, InstanceId, MemberId, TemplateId, Timestamp,
};
use crate::domain::schedule::CycleId;
use crate::domain::template::Template;

use super::InstanceStatus;

/// A subtask copied from the template, checked off before completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    pub done: bool,
}

/// Instance aggregate - one dated occurrence of a chore.
///
/// # Invariants
///
/// - at most one non-removed instance exists per (template, cycle)
/// - `completed_by`/`completed_at` are set exactly while status is past
///   `Pending`
/// - `points_awarded` is set at most once, alongside the `Verified`
///   transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    id: InstanceId,

    /// Absent for one-off tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    template_id: Option<TemplateId>,

    /// Period tag; absent for one-off tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle_id: Option<CycleId>,

    title: String,
    description: Option<String>,
    subtasks: Vec<Subtask>,

    /// Empty = unassigned; the first successful completer claims it.
    assignees: Vec<MemberId>,

    due_date: DueDate,

    /// Point value copied from the template at creation time.
    points: u32,

    status: InstanceStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    completed_by: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verified_by: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verified_at: Option<Timestamp>,

    /// Opaque reference to uploaded photo proof; transport is external.
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_proof: Option<String>,

    /// Exactly-once award guard, flipped with the `Verified` transition.
    #[serde(default)]
    points_awarded: bool,

    created_at: Timestamp,
}

impl Instance {
    /// Materializes an instance from a template for the given cycle.
    pub fn from_template(
        id: InstanceId,
        template: &Template,
        cycle_id: CycleId,
        due_date: DueDate,
    ) -> Self {
        Self {
            id,
            template_id: Some(*template.id()),
            cycle_id: Some(cycle_id),
            title: template.title().to_string(),
            description: template.description().map(str::to_string),
            subtasks: template
                .subtasks()
                .iter()
                .map(|spec| Subtask {
                    title: spec.title.clone(),
                    done: false,
                })
                .collect(),
            assignees: template.assignees().to_vec(),
            due_date,
            points: template.points(),
            status: InstanceStatus::Pending,
            completed_by: None,
            completed_at: None,
            verified_by: None,
            verified_at: None,
            photo_proof: None,
            points_awarded: false,
            created_at: Timestamp::now(),
        }
    }

    /// Creates a one-off instance with no template or cycle.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is empty or points is zero
    pub fn one_off(
        id: InstanceId,
        title: String,
        description: Option<String>,
        subtasks: Vec<Subtask>,
        assignees: Vec<MemberId>,
        due_date: DueDate,
        points: u32,
    ) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if points == 0 {
            return Err(DomainError::validation("points", "Points must be positive"));
        }
        Ok(Self {
            id,
            template_id: None,
            cycle_id: None,
            title,
            description,
            subtasks,
            assignees,
            due_date,
            points,
            status: InstanceStatus::Pending,
            completed_by: None,
            completed_at: None,
            verified_by: None,
            verified_at: None,
            photo_proof: None,
            points_awarded: false,
            created_at: Timestamp::now(),
        })
    }

    // Accessors

    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    pub fn template_id(&self) -> Option<&TemplateId> {
        self.template_id.as_ref()
    }

    pub fn cycle_id(&self) -> Option<&CycleId> {
        self.cycle_id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    pub fn assignees(&self) -> &[MemberId] {
        &self.assignees
    }

    pub fn due_date(&self) -> DueDate {
        self.due_date
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn status(&self) -> InstanceStatus {
        self.status
    }

    pub fn completed_by(&self) -> Option<&MemberId> {
        self.completed_by.as_ref()
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn verified_by(&self) -> Option<&MemberId> {
        self.verified_by.as_ref()
    }

    pub fn verified_at(&self) -> Option<&Timestamp> {
        self.verified_at.as_ref()
    }

    pub fn photo_proof(&self) -> Option<&str> {
        self.photo_proof.as_deref()
    }

    pub fn points_awarded(&self) -> bool {
        self.points_awarded
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// True if the instance belongs to the given cycle.
    pub fn is_for_cycle(&self, cycle: &CycleId) -> bool {
        self.cycle_id.as_ref() == Some(cycle)
    }

    // Lifecycle transitions

    /// Marks the instance completed by `actor`.
    ///
    /// An empty assignee set means the instance is unassigned: anyone may
    /// claim it, and claiming records the actor as the sole assignee.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the instance is not pending
    /// - `Unauthorized` if the actor is not an assignee of an assigned
    ///   instance
    /// - `SubtasksIncomplete` if any subtask is not done
    pub fn complete(
        &mut self,
        actor: &MemberId,
        photo_proof: Option<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if self.status != InstanceStatus::Pending {
            return Err(DomainError::conflict("Instance is already completed")
                .with_detail("status", self.status.to_string()));
        }

        if self.assignees.is_empty() {
            // Claim: the completer becomes the sole assignee.
            self.assignees.push(actor.clone());
        } else if !self.assignees.contains(actor) {
            return Err(DomainError::new(
                ErrorCode::Unauthorized,
                "Actor is not assigned to this instance",
            )
            .with_detail("actor", actor.to_string()));
        }

        if let Some(undone) = self.subtasks.iter().find(|s| !s.done) {
            return Err(DomainError::new(
                ErrorCode::SubtasksIncomplete,
                "All subtasks must be finished before completing",
            )
            .with_detail("subtask", undone.title.clone()));
        }

        self.status = InstanceStatus::Completed;
        self.completed_by = Some(actor.clone());
        self.completed_at = Some(now);
        self.photo_proof = photo_proof;
        Ok(())
    }

    /// Approves a completed instance, making it verified.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the instance is not completed
    pub fn approve(&mut self, verifier: MemberId, now: Timestamp) -> Result<(), DomainError> {
        if self.status != InstanceStatus::Completed {
            return Err(DomainError::conflict("Only completed instances can be verified")
                .with_detail("status", self.status.to_string()));
        }
        self.status = InstanceStatus::Verified;
        self.verified_by = Some(verifier);
        self.verified_at = Some(now);
        Ok(())
    }

    /// Rejects a completed instance back to pending, clearing completion
    /// fields and the photo proof. Subtask progress is kept.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the instance is not completed
    pub fn reject(&mut self) -> Result<(), DomainError> {
        if self.status != InstanceStatus::Completed {
            return Err(DomainError::conflict("Only completed instances can be rejected")
                .with_detail("status", self.status.to_string()));
        }
        self.status = InstanceStatus::Pending;
        self.completed_by = None;
        self.completed_at = None;
        self.photo_proof = None;
        Ok(())
    }

    /// Flags the instance as having produced its points transaction.
    ///
    /// # Errors
    ///
    /// - `Conflict` if points were already awarded
    pub fn mark_awarded(&mut self) -> Result<(), DomainError> {
        if self.points_awarded {
            return Err(DomainError::conflict("Points were already awarded for this instance"));
        }
        self.points_awarded = true;
        Ok(())
    }

    /// Checks or unchecks a subtask.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the index is out of range
    /// - `Conflict` if the instance is already verified
    pub fn set_subtask_done(&mut self, index: usize, done: bool) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::conflict("Verified instances cannot be modified"));
        }
        match self.subtasks.get_mut(index) {
            Some(subtask) => {
                subtask.done = done;
                Ok(())
            }
            None => Err(DomainError::validation(
                "subtask_index",
                format!("No subtask at index {}", index),
            )),
        }
    }
}
