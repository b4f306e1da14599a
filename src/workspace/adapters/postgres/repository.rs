//! `PostgreSQL` repository implementation for workspace storage.
//!
//! Membership rows are replaced wholesale on every aggregate update inside
//! one transaction; the member set is small (a workspace's direct
//! collaborators) so the rewrite is cheaper than diffing.

use super::{
    models::{WorkspaceRow, row_to_workspace, to_member_rows, to_new_row},
    schema::{workspace_members, workspaces},
};
use crate::account::domain::UserId;
use crate::workspace::{
    domain::{Workspace, WorkspaceId},
    ports::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by workspace adapters.
pub type WorkspacePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed workspace repository.
#[derive(Debug, Clone)]
pub struct PostgresWorkspaceRepository {
    pool: WorkspacePgPool,
}

impl PostgresWorkspaceRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkspacePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkspaceRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkspaceRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(WorkspaceRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkspaceRepositoryError::persistence)?
    }
}

/// Loads the membership rows for one workspace.
fn load_member_ids(
    connection: &mut PgConnection,
    workspace_id: uuid::Uuid,
) -> WorkspaceRepositoryResult<Vec<uuid::Uuid>> {
    workspace_members::table
        .filter(workspace_members::workspace_id.eq(workspace_id))
        .select(workspace_members::user_id)
        .load::<uuid::Uuid>(connection)
        .map_err(WorkspaceRepositoryError::persistence)
}

/// Hydrates a batch of workspace rows with their membership rows.
fn hydrate_rows(
    connection: &mut PgConnection,
    rows: Vec<WorkspaceRow>,
) -> WorkspaceRepositoryResult<Vec<Workspace>> {
    rows.into_iter()
        .map(|row| {
            let member_ids = load_member_ids(connection, row.id)?;
            row_to_workspace(row, member_ids)
        })
        .collect()
}

#[async_trait]
impl WorkspaceRepository for PostgresWorkspaceRepository {
    async fn store(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let workspace_id = workspace.id();
        let new_row = to_new_row(workspace);
        let member_rows = to_member_rows(workspace);

        self.run_blocking(move |connection| {
            connection
                .transaction(|conn| {
                    diesel::insert_into(workspaces::table)
                        .values(&new_row)
                        .execute(conn)?;
                    diesel::insert_into(workspace_members::table)
                        .values(&member_rows)
                        .execute(conn)?;
                    Ok(())
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        WorkspaceRepositoryError::DuplicateWorkspace(workspace_id)
                    }
                    _ => WorkspaceRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn update(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let workspace_id = workspace.id();
        let changes = to_new_row(workspace);
        let member_rows = to_member_rows(workspace);

        self.run_blocking(move |connection| {
            connection
                .transaction(|conn| {
                    let updated = diesel::update(
                        workspaces::table.filter(workspaces::id.eq(workspace_id.into_inner())),
                    )
                    .set(&changes)
                    .execute(conn)?;
                    if updated == 0 {
                        return Err(diesel::result::Error::NotFound);
                    }

                    diesel::delete(
                        workspace_members::table
                            .filter(workspace_members::workspace_id.eq(workspace_id.into_inner())),
                    )
                    .execute(conn)?;
                    diesel::insert_into(workspace_members::table)
                        .values(&member_rows)
                        .execute(conn)?;
                    Ok(())
                })
                .map_err(|err| match err {
                    DieselError::NotFound => WorkspaceRepositoryError::NotFound(workspace_id),
                    _ => WorkspaceRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn find_by_id(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>> {
        self.run_blocking(move |connection| {
            let row = workspaces::table
                .filter(workspaces::id.eq(id.into_inner()))
                .select(WorkspaceRow::as_select())
                .first::<WorkspaceRow>(connection)
                .optional()
                .map_err(WorkspaceRepositoryError::persistence)?;
            let Some(row) = row else {
                return Ok(None);
            };
            let member_ids = load_member_ids(connection, row.id)?;
            row_to_workspace(row, member_ids).map(Some)
        })
        .await
    }

    async fn delete(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection
                .transaction(|conn| {
                    diesel::delete(
                        workspace_members::table
                            .filter(workspace_members::workspace_id.eq(id.into_inner())),
                    )
                    .execute(conn)?;
                    let deleted = diesel::delete(
                        workspaces::table.filter(workspaces::id.eq(id.into_inner())),
                    )
                    .execute(conn)?;
                    if deleted == 0 {
                        return Err(diesel::result::Error::NotFound);
                    }
                    Ok(())
                })
                .map_err(|err| match err {
                    DieselError::NotFound => WorkspaceRepositoryError::NotFound(id),
                    _ => WorkspaceRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn list_owned_by(&self, user: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        self.run_blocking(move |connection| {
            let rows = workspaces::table
                .filter(workspaces::owner_id.eq(user.into_inner()))
                .order(workspaces::created_at.desc())
                .select(WorkspaceRow::as_select())
                .load::<WorkspaceRow>(connection)
                .map_err(WorkspaceRepositoryError::persistence)?;
            hydrate_rows(connection, rows)
        })
        .await
    }

    async fn list_for_user(&self, user: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        self.run_blocking(move |connection| {
            let member_workspace_ids = workspace_members::table
                .filter(workspace_members::user_id.eq(user.into_inner()))
                .select(workspace_members::workspace_id);
            let rows = workspaces::table
                .filter(
                    workspaces::owner_id
                        .eq(user.into_inner())
                        .or(workspaces::id.eq_any(member_workspace_ids)),
                )
                .order(workspaces::created_at.desc())
                .select(WorkspaceRow::as_select())
                .load::<WorkspaceRow>(connection)
                .map_err(WorkspaceRepositoryError::persistence)?;
            hydrate_rows(connection, rows)
        })
        .await
    }

    async fn remove_user_memberships(&self, user: UserId) -> WorkspaceRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::delete(
                workspace_members::table.filter(workspace_members::user_id.eq(user.into_inner())),
            )
            .execute(connection)
            .map_err(WorkspaceRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}
