//! Service layer for task creation, editing, and lifecycle transitions.
//!
//! This is the request collaborator for task operations: exactly one
//! query or mutation per call, gated on the aggregate's permission
//! predicates. Permission failures come back as plain error values for the
//! caller to surface; nothing here is fatal.

use crate::account::domain::UserId;
use crate::task::{
    domain::{
        Comment, Task, TaskDomainError, TaskEdit, TaskId, TaskPriority, TaskStatus, TaskTitle,
    },
    ports::{
        CommentRepository, CommentRepositoryError, TaskFilter, TaskRepository,
        TaskRepositoryError, TaskStatusCounts,
    },
};
use crate::workspace::{
    domain::{Workspace, WorkspaceId},
    ports::{WorkspaceRepository, WorkspaceRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    assignee: Option<UserId>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Creates a draft with the required title; other fields default.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            assignee: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
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
}

/// Request payload for editing a task; every field is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEditRequest {
    title: String,
    description: String,
    assignee: Option<UserId>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
}

impl TaskEditRequest {
    /// Creates an edit request with the required title; other fields
    /// default (and therefore clear unless set).
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            assignee: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
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

    /// Sets the status.
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
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// The workspace does not exist.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(WorkspaceId),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The acting user is neither owner nor member of the workspace.
    #[error("user {user} has no access to workspace {workspace}")]
    AccessDenied {
        /// Target workspace.
        workspace: WorkspaceId,
        /// Acting user.
        user: UserId,
    },

    /// The acting user may not edit the task.
    #[error("user {user} may not edit task {task}")]
    EditForbidden {
        /// Target task.
        task: TaskId,
        /// Acting user.
        user: UserId,
    },

    /// The acting user may not delete the task.
    #[error("user {user} may not delete task {task}")]
    DeleteForbidden {
        /// Target task.
        task: TaskId,
        /// Acting user.
        user: UserId,
    },

    /// The requested assignee is not a participant of the workspace.
    #[error("user {user} is not a participant of workspace {workspace}")]
    AssigneeNotParticipant {
        /// Target workspace.
        workspace: WorkspaceId,
        /// Rejected assignee.
        user: UserId,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Task persistence failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Comment lookup failed.
    #[error(transparent)]
    Comments(#[from] CommentRepositoryError),

    /// Workspace lookup failed.
    #[error(transparent)]
    Workspaces(#[from] WorkspaceRepositoryError),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// A comment decorated with the viewer's permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    /// The comment itself.
    pub comment: Comment,
    /// Whether the viewer may edit it (author only).
    pub can_edit: bool,
    /// Whether the viewer may delete it (author or workspace owner).
    pub can_delete: bool,
    /// Whether the comment was edited after creation.
    pub is_edited: bool,
}

/// Task detail view for a specific viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetail {
    /// The task aggregate.
    pub task: Task,
    /// Whether the viewer may edit the task.
    pub can_edit: bool,
    /// Whether the viewer may delete the task.
    pub can_delete: bool,
    /// The task's comments, oldest first, with per-viewer permissions.
    pub comments: Vec<CommentView>,
}

/// Workspace task listing with per-status counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceTasks {
    /// Matching tasks, newest first.
    pub tasks: Vec<Task>,
    /// Counts across the workspace's tasks (unfiltered).
    pub counts: TaskStatusCounts,
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskService<T, Cm, W, C>
where
    T: TaskRepository,
    Cm: CommentRepository,
    W: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    comments: Arc<Cm>,
    workspaces: Arc<W>,
    clock: Arc<C>,
}

impl<T, Cm, W, C> TaskService<T, Cm, W, C>
where
    T: TaskRepository,
    Cm: CommentRepository,
    W: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, comments: Arc<Cm>, workspaces: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            comments,
            workspaces,
            clock,
        }
    }

    /// Creates a task in the workspace. Any participant may create.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::AccessDenied`] when the acting user is
    /// not a participant, [`TaskServiceError::AssigneeNotParticipant`]
    /// when the draft assigns a non-participant, or a domain error for an
    /// invalid title.
    pub async fn create_task(
        &self,
        acting: UserId,
        workspace_id: WorkspaceId,
        draft: TaskDraft,
    ) -> TaskServiceResult<Task> {
        let workspace = self.require_workspace(workspace_id).await?;
        if !workspace.can_access(acting) {
            return Err(TaskServiceError::AccessDenied {
                workspace: workspace_id,
                user: acting,
            });
        }
        check_assignee(&workspace, draft.assignee)?;

        let title = TaskTitle::new(draft.title)?;
        let mut task = Task::new(workspace_id, title, acting, &*self.clock)
            .with_description(draft.description)
            .with_status(draft.status)
            .with_priority(draft.priority);
        if let Some(assignee) = draft.assignee {
            task = task.with_assignee(assignee);
        }
        if let Some(due_date) = draft.due_date {
            task = task.with_due_date(due_date);
        }

        self.tasks.store(&task).await?;
        Ok(task)
    }

    /// Replaces a task's editable fields. Gated on `can_edit`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::EditForbidden`] when the acting user is
    /// neither workspace owner, creator, nor assignee.
    pub async fn edit_task(
        &self,
        acting: UserId,
        task_id: TaskId,
        edit: TaskEditRequest,
    ) -> TaskServiceResult<Task> {
        let (mut task, workspace) = self.require_task(task_id).await?;
        if !task.can_edit(&workspace, acting) {
            return Err(TaskServiceError::EditForbidden {
                task: task_id,
                user: acting,
            });
        }
        check_assignee(&workspace, edit.assignee)?;

        let title = TaskTitle::new(edit.title)?;
        task.apply_edit(
            TaskEdit {
                title,
                description: edit.description,
                assignee: edit.assignee,
                status: edit.status,
                priority: edit.priority,
                due_date: edit.due_date,
            },
            &*self.clock,
        );

        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Deletes a task and its comments. Gated on `can_delete`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::DeleteForbidden`] when the acting user
    /// is neither workspace owner nor creator (the assignee alone cannot
    /// delete).
    pub async fn delete_task(&self, acting: UserId, task_id: TaskId) -> TaskServiceResult<()> {
        let (task, workspace) = self.require_task(task_id).await?;
        if !task.can_delete(&workspace, acting) {
            return Err(TaskServiceError::DeleteForbidden {
                task: task_id,
                user: acting,
            });
        }
        self.tasks.delete(task_id).await?;
        Ok(())
    }

    /// Advances the task status one step along the toggle cycle and
    /// returns the new status. Gated on `can_edit`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::EditForbidden`] when the acting user
    /// fails the edit predicate.
    pub async fn toggle_status(
        &self,
        acting: UserId,
        task_id: TaskId,
    ) -> TaskServiceResult<TaskStatus> {
        let (mut task, workspace) = self.require_task(task_id).await?;
        if !task.can_edit(&workspace, acting) {
            return Err(TaskServiceError::EditForbidden {
                task: task_id,
                user: acting,
            });
        }

        let status = task.toggle_status(&*self.clock);
        self.tasks.update(&task).await?;
        Ok(status)
    }

    /// Returns the task detail view for the acting user, including the
    /// comment thread with per-viewer permissions.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::AccessDenied`] when the acting user is
    /// not a participant of the task's workspace.
    pub async fn task_detail(
        &self,
        acting: UserId,
        task_id: TaskId,
    ) -> TaskServiceResult<TaskDetail> {
        let (task, workspace) = self.require_task(task_id).await?;
        if !workspace.can_access(acting) {
            return Err(TaskServiceError::AccessDenied {
                workspace: workspace.id(),
                user: acting,
            });
        }

        let can_edit = task.can_edit(&workspace, acting);
        let can_delete = task.can_delete(&workspace, acting);
        let comments = self
            .comments
            .list_by_task(task_id)
            .await?
            .into_iter()
            .map(|comment| CommentView {
                can_edit: comment.can_edit(acting),
                can_delete: comment.can_delete(&workspace, acting),
                is_edited: comment.is_edited(),
                comment,
            })
            .collect();

        Ok(TaskDetail {
            task,
            can_edit,
            can_delete,
            comments,
        })
    }

    /// Returns the workspace's tasks matching the filter plus unfiltered
    /// per-status counts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::AccessDenied`] when the acting user is
    /// not a participant of the workspace.
    pub async fn list_tasks(
        &self,
        acting: UserId,
        workspace_id: WorkspaceId,
        filter: &TaskFilter,
    ) -> TaskServiceResult<WorkspaceTasks> {
        let workspace = self.require_workspace(workspace_id).await?;
        if !workspace.can_access(acting) {
            return Err(TaskServiceError::AccessDenied {
                workspace: workspace_id,
                user: acting,
            });
        }

        let tasks = self.tasks.list_by_workspace(workspace_id, filter).await?;
        let counts = self.tasks.status_counts(workspace_id).await?;
        Ok(WorkspaceTasks { tasks, counts })
    }

    /// Loads a workspace or reports it missing.
    async fn require_workspace(&self, workspace_id: WorkspaceId) -> TaskServiceResult<Workspace> {
        self.workspaces
            .find_by_id(workspace_id)
            .await?
            .ok_or(TaskServiceError::WorkspaceNotFound(workspace_id))
    }

    /// Loads a task together with its workspace.
    async fn require_task(&self, task_id: TaskId) -> TaskServiceResult<(Task, Workspace)> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(task_id))?;
        let workspace = self.require_workspace(task.workspace_id()).await?;
        Ok((task, workspace))
    }
}

/// Rejects an assignee who is neither owner nor member of the workspace.
///
/// Resolves the original member-only assignee dropdown uniformly: the
/// owner is a valid assignee even though the explicit member set omits
/// them.
fn check_assignee(workspace: &Workspace, assignee: Option<UserId>) -> TaskServiceResult<()> {
    match assignee {
        Some(user) if !workspace.can_access(user) => {
            Err(TaskServiceError::AssigneeNotParticipant {
                workspace: workspace.id(),
                user,
            })
        }
        _ => Ok(()),
    }
}
