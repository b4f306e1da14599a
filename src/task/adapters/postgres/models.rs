//! Diesel row models for task and comment persistence.

use super::schema::{comments, tasks};
use crate::account::domain::UserId;
use crate::task::{
    domain::{
        Comment, CommentBody, CommentId, PersistedCommentData, PersistedTaskData, Task, TaskId,
        TaskPriority, TaskStatus, TaskTitle,
    },
    ports::{
        CommentRepositoryError, CommentRepositoryResult, TaskRepositoryError, TaskRepositoryResult,
    },
};
use crate::workspace::domain::WorkspaceId;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning workspace identifier.
    pub workspace_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Creator user identifier.
    pub creator_id: uuid::Uuid,
    /// Optional assignee user identifier.
    pub assignee_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Priority level.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert/update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning workspace identifier.
    pub workspace_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Creator user identifier.
    pub creator_id: uuid::Uuid,
    /// Optional assignee user identifier.
    pub assignee_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Priority level.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for comment records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Comment identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Authoring user identifier.
    pub author_id: uuid::Uuid,
    /// Free-text body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert/update model for comment records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = comments)]
pub struct NewCommentRow {
    /// Comment identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Authoring user identifier.
    pub author_id: uuid::Uuid,
    /// Free-text body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Maps a task aggregate to an insert/update row.
pub fn to_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        workspace_id: task.workspace_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        creator_id: task.created_by().into_inner(),
        assignee_id: task.assignee().map(UserId::into_inner),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

/// Maps a query row back to a task aggregate.
pub fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        workspace_id,
        title: persisted_title,
        description,
        creator_id,
        assignee_id,
        status: persisted_status,
        priority: persisted_priority,
        due_date,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        workspace_id: WorkspaceId::from_uuid(workspace_id),
        title,
        description,
        created_by: UserId::from_uuid(creator_id),
        assignee: assignee_id.map(UserId::from_uuid),
        status,
        priority,
        due_date,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

/// Maps a comment aggregate to an insert/update row.
pub fn to_comment_row(comment: &Comment) -> NewCommentRow {
    NewCommentRow {
        id: comment.id().into_inner(),
        task_id: comment.task_id().into_inner(),
        author_id: comment.author().into_inner(),
        body: comment.body().as_str().to_owned(),
        created_at: comment.created_at(),
        updated_at: comment.updated_at(),
    }
}

/// Maps a query row back to a comment aggregate.
pub fn row_to_comment(row: CommentRow) -> CommentRepositoryResult<Comment> {
    let CommentRow {
        id,
        task_id,
        author_id,
        body: persisted_body,
        created_at,
        updated_at,
    } = row;

    let body = CommentBody::new(persisted_body).map_err(CommentRepositoryError::persistence)?;

    let data = PersistedCommentData {
        id: CommentId::from_uuid(id),
        task_id: TaskId::from_uuid(task_id),
        author: UserId::from_uuid(author_id),
        body,
        created_at,
        updated_at,
    };
    Ok(Comment::from_persisted(data))
}
