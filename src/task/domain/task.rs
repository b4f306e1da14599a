//! Task aggregate root, status lifecycle, and permission predicates.

use super::{ParseTaskPriorityError, ParseTaskStatusError, TaskId, TaskTitle};
use crate::account::domain::UserId;
use crate::workspace::domain::{Workspace, WorkspaceId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
///
/// The quick-toggle path cycles To-do → In progress → Done → To-do; the
/// edit path may set any status directly (there is no enforced linear
/// order outside the toggle shortcut).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is complete.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns the next status in the toggle cycle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Todo => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::Todo,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    workspace_id: WorkspaceId,
    title: TaskTitle,
    description: String,
    created_by: UserId,
    assignee: Option<UserId>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning workspace identifier.
    pub workspace_id: WorkspaceId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted creator identifier.
    pub created_by: UserId,
    /// Persisted assignee, if any.
    pub assignee: Option<UserId>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Full-field replacement applied by [`Task::apply_edit`].
///
/// Mirrors the edit form: every field is submitted on each edit, including
/// a `None` assignee or due date to clear them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    /// New title.
    pub title: TaskTitle,
    /// New description.
    pub description: String,
    /// New assignee, or `None` to unassign.
    pub assignee: Option<UserId>,
    /// New status.
    pub status: TaskStatus,
    /// New priority.
    pub priority: TaskPriority,
    /// New due date, or `None` to clear it.
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// Creates a new task in the given workspace.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        title: TaskTitle,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            workspace_id,
            title,
            description: String::new(),
            created_by,
            assignee: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            workspace_id: data.workspace_id,
            title: data.title,
            description: data.description,
            created_by: data.created_by,
            assignee: data.assignee,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning workspace identifier.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creator identifier.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the user may edit this task: workspace owner,
    /// task creator, or assignee.
    #[must_use]
    pub fn can_edit(&self, workspace: &Workspace, user: UserId) -> bool {
        debug_assert_eq!(
            workspace.id(),
            self.workspace_id,
            "permission check against a foreign workspace"
        );
        workspace.is_owner(user) || self.created_by == user || self.assignee == Some(user)
    }

    /// Returns `true` when the user may delete this task: workspace owner
    /// or task creator. The assignee alone cannot delete.
    #[must_use]
    pub fn can_delete(&self, workspace: &Workspace, user: UserId) -> bool {
        debug_assert_eq!(
            workspace.id(),
            self.workspace_id,
            "permission check against a foreign workspace"
        );
        workspace.is_owner(user) || self.created_by == user
    }

    /// Returns `true` when the task has a due date in the past and is not
    /// done.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due_date) => self.status != TaskStatus::Done && due_date < today,
            None => false,
        }
    }

    /// Advances the status one step along the toggle cycle and returns the
    /// new status.
    ///
    /// Callers gate this on [`Task::can_edit`].
    pub fn toggle_status(&mut self, clock: &impl Clock) -> TaskStatus {
        self.status = self.status.toggled();
        self.touch(clock);
        self.status
    }

    /// Replaces every editable field with the submitted edit.
    ///
    /// Callers gate this on [`Task::can_edit`] and validate the assignee
    /// against the workspace before applying.
    pub fn apply_edit(&mut self, edit: TaskEdit, clock: &impl Clock) {
        self.title = edit.title;
        self.description = edit.description;
        self.assignee = edit.assignee;
        self.status = edit.status;
        self.priority = edit.priority;
        self.due_date = edit.due_date;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
