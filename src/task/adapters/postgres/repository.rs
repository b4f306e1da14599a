//! `PostgreSQL` repository implementation for task storage.
//!
//! Cascade deletes (task → comments) run as explicit multi-table
//! transactions so the rule lives at the storage boundary rather than in
//! schema triggers.

use super::{
    models::{TaskRow, row_to_task, to_task_row},
    schema::{comments, tasks},
};
use crate::account::domain::UserId;
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{
        AssigneeFilter, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TaskStatusCounts,
    },
};
use crate::workspace::domain::WorkspaceId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

/// Deletes the given tasks and their comments in one transaction.
fn delete_tasks_cascading(
    connection: &mut PgConnection,
    task_ids: Vec<uuid::Uuid>,
) -> Result<usize, DieselError> {
    connection.transaction(|conn| {
        diesel::delete(comments::table.filter(comments::task_id.eq_any(task_ids.clone())))
            .execute(conn)?;
        diesel::delete(tasks::table.filter(tasks::id.eq_any(task_ids))).execute(conn)
    })
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_task_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changes = to_task_row(task);

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&changes)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = delete_tasks_cascading(connection, vec![id.into_inner()])
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_by_workspace(&self, workspace_id: WorkspaceId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let task_ids = tasks::table
                .filter(tasks::workspace_id.eq(workspace_id.into_inner()))
                .select(tasks::id)
                .load::<uuid::Uuid>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            delete_tasks_cascading(connection, task_ids)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete_created_by(&self, user: UserId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let task_ids = tasks::table
                .filter(tasks::creator_id.eq(user.into_inner()))
                .select(tasks::id)
                .load::<uuid::Uuid>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            delete_tasks_cascading(connection, task_ids)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn clear_assignee(&self, user: UserId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::update(tasks::table.filter(tasks::assignee_id.eq(user.into_inner())))
                .set(tasks::assignee_id.eq(None::<uuid::Uuid>))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let criteria = *filter;
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::workspace_id.eq(workspace_id.into_inner()))
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .into_boxed();

            if let Some(status) = criteria.status {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(priority) = criteria.priority {
                query = query.filter(tasks::priority.eq(priority.as_str()));
            }
            match criteria.assignee {
                Some(AssigneeFilter::Unassigned) => {
                    query = query.filter(tasks::assignee_id.is_null());
                }
                Some(AssigneeFilter::User(assignee)) => {
                    query = query.filter(tasks::assignee_id.eq(assignee.into_inner()));
                }
                None => {}
            }

            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_for_user(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(
                    tasks::creator_id
                        .eq(user.into_inner())
                        .or(tasks::assignee_id.eq(user.into_inner())),
                )
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn status_counts(
        &self,
        workspace_id: WorkspaceId,
    ) -> TaskRepositoryResult<TaskStatusCounts> {
        self.run_blocking(move |connection| {
            let statuses = tasks::table
                .filter(tasks::workspace_id.eq(workspace_id.into_inner()))
                .select(tasks::status)
                .load::<String>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            let mut counts = TaskStatusCounts::default();
            for status in statuses {
                let parsed = TaskStatus::try_from(status.as_str())
                    .map_err(TaskRepositoryError::persistence)?;
                counts.record(parsed);
            }
            Ok(counts)
        })
        .await
    }
}
