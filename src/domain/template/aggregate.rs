//! Template aggregate entity.
//!
//! A template is a recurring chore definition with a cadence. The
//! materializer stamps out one instance per cycle and records its progress
//! in the template's scheduler cursor.
//!
//! # Ownership
//!
//! Templates reference members by ID but do NOT own them. The cursor is
//! owned by the materializer: nothing else advances it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, DueDate, MemberId, TemplateId, Timestamp};
use crate::domain::schedule::{Cadence, CycleId};

/// Maximum length for template and subtask titles.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Definition of a subtask copied onto each new instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskSpec {
    pub title: String,
}

impl SubtaskSpec {
    /// Creates a subtask definition.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is empty or too long
    pub fn new(title: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self { title })
    }
}

/// Last-materialized-cycle marker, advanced only by the materializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerCursor {
    pub last_cycle_id: CycleId,
    pub last_due_date: DueDate,
}

/// Template aggregate - a recurring chore definition.
///
/// # Invariants
///
/// - `title` is 1-200 characters, non-empty
/// - `points` is positive
/// - `cursor` only ever moves forward, one cycle at a time, via
///   [`Template::advance_cursor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    id: TemplateId,
    title: String,
    description: Option<String>,

    /// Members the chore is assigned to. Empty = unassigned; instances may
    /// then be claimed by anyone.
    assignees: Vec<MemberId>,

    created_by: MemberId,

    /// Points awarded per verified instance.
    points: u32,

    cadence: Cadence,

    subtasks: Vec<SubtaskSpec>,

    /// Explicit due date for the very first instance, if the creator set
    /// one. Ignored once a cursor exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    first_due_date: Option<DueDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<SchedulerCursor>,

    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Template {
    /// Creates a new template with no cursor.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is empty/too long or points is zero
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TemplateId,
        title: String,
        description: Option<String>,
        assignees: Vec<MemberId>,
        created_by: MemberId,
        points: u32,
        cadence: Cadence,
        subtasks: Vec<SubtaskSpec>,
        first_due_date: Option<DueDate>,
    ) -> Result<Self, DomainError> {
        validate_title(&title)?;
        validate_points(points)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            title,
            description,
            assignees,
            created_by,
            points,
            cadence,
            subtasks,
            first_due_date,
            cursor: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a template from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: TemplateId,
        title: String,
        description: Option<String>,
        assignees: Vec<MemberId>,
        created_by: MemberId,
        points: u32,
        cadence: Cadence,
        subtasks: Vec<SubtaskSpec>,
        first_due_date: Option<DueDate>,
        cursor: Option<SchedulerCursor>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title,
            description,
            assignees,
            created_by,
            points,
            cadence,
            subtasks,
            first_due_date,
            cursor,
            created_at,
            updated_at,
        }
    }

    // Accessors

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn assignees(&self) -> &[MemberId] {
        &self.assignees
    }

    pub fn created_by(&self) -> &MemberId {
        &self.created_by
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    pub fn subtasks(&self) -> &[SubtaskSpec] {
        &self.subtasks
    }

    /// Explicit first due date, only honored while no cursor exists.
    pub fn first_due_date(&self) -> Option<DueDate> {
        self.first_due_date
    }

    pub fn cursor(&self) -> Option<&SchedulerCursor> {
        self.cursor.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// True if the cursor already points at the given cycle.
    pub fn cursor_at(&self, cycle: &CycleId) -> bool {
        self.cursor
            .as_ref()
            .is_some_and(|c| &c.last_cycle_id == cycle)
    }

    // Mutations

    /// Records the cycle and due date of a freshly materialized instance.
    ///
    /// Only the materializer calls this.
    pub fn advance_cursor(&mut self, cycle_id: CycleId, due_date: DueDate) {
        self.cursor = Some(SchedulerCursor {
            last_cycle_id: cycle_id,
            last_due_date: due_date,
        });
        self.updated_at = Timestamp::now();
    }

    /// Rename the template.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is empty or too long
    pub fn rename(&mut self, new_title: String) -> Result<(), DomainError> {
        validate_title(&new_title)?;
        self.title = new_title;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Update the description.
    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Timestamp::now();
    }

    /// Update the point value.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if points is zero
    pub fn set_points(&mut self, points: u32) -> Result<(), DomainError> {
        validate_points(points)?;
        self.points = points;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Replace the cadence. The cursor is kept: existing instances stay
    /// tagged with their original cycles.
    pub fn set_cadence(&mut self, cadence: Cadence) {
        self.cadence = cadence;
        self.updated_at = Timestamp::now();
    }

    /// Replace the assignee set.
    pub fn set_assignees(&mut self, assignees: Vec<MemberId>) {
        self.assignees = assignees;
        self.updated_at = Timestamp::now();
    }

    /// Replace the subtask definitions.
    pub fn set_subtasks(&mut self, subtasks: Vec<SubtaskSpec>) {
        self.subtasks = subtasks;
        self.updated_at = Timestamp::now();
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("title", "Title cannot be empty"));
    }
    if trimmed.len() > MAX_TITLE_LENGTH {
        return Err(DomainError::validation(
            "title",
            format!("Title must be {} characters or less", MAX_TITLE_LENGTH),
        ));
    }
    Ok(())
}

fn validate_points(points: u32) -> Result<(), DomainError> {
    if points == 0 {
        return Err(DomainError::validation("points", "Points must be positive"));
    }
    Ok(())
}
