//! `PostgreSQL` repository implementation for comment storage.

use super::{
    models::{CommentRow, row_to_comment, to_comment_row},
    schema::comments,
};
use crate::account::domain::UserId;
use crate::task::{
    adapters::postgres::TaskPgPool,
    domain::{Comment, CommentId, TaskId},
    ports::{CommentRepository, CommentRepositoryError, CommentRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed comment repository.
#[derive(Debug, Clone)]
pub struct PostgresCommentRepository {
    pool: TaskPgPool,
}

impl PostgresCommentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CommentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CommentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CommentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CommentRepositoryError::persistence)?
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn store(&self, comment: &Comment) -> CommentRepositoryResult<()> {
        let comment_id = comment.id();
        let new_row = to_comment_row(comment);

        self.run_blocking(move |connection| {
            diesel::insert_into(comments::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CommentRepositoryError::DuplicateComment(comment_id)
                    }
                    _ => CommentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, comment: &Comment) -> CommentRepositoryResult<()> {
        let comment_id = comment.id();
        let changes = to_comment_row(comment);

        self.run_blocking(move |connection| {
            let updated =
                diesel::update(comments::table.filter(comments::id.eq(comment_id.into_inner())))
                    .set(&changes)
                    .execute(connection)
                    .map_err(CommentRepositoryError::persistence)?;
            if updated == 0 {
                return Err(CommentRepositoryError::NotFound(comment_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: CommentId) -> CommentRepositoryResult<Option<Comment>> {
        self.run_blocking(move |connection| {
            let row = comments::table
                .filter(comments::id.eq(id.into_inner()))
                .select(CommentRow::as_select())
                .first::<CommentRow>(connection)
                .optional()
                .map_err(CommentRepositoryError::persistence)?;
            row.map(row_to_comment).transpose()
        })
        .await
    }

    async fn delete(&self, id: CommentId) -> CommentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(comments::table.filter(comments::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(CommentRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(CommentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn list_by_task(&self, task_id: TaskId) -> CommentRepositoryResult<Vec<Comment>> {
        self.run_blocking(move |connection| {
            let rows = comments::table
                .filter(comments::task_id.eq(task_id.into_inner()))
                .order(comments::created_at.asc())
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)
                .map_err(CommentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_comment).collect()
        })
        .await
    }

    async fn delete_by_author(&self, user: UserId) -> CommentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::delete(comments::table.filter(comments::author_id.eq(user.into_inner())))
                .execute(connection)
                .map_err(CommentRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}
