//! Diesel row models for workspace persistence.

use super::schema::{workspace_members, workspaces};
use crate::account::domain::UserId;
use crate::workspace::{
    domain::{PersistedWorkspaceData, Workspace, WorkspaceId, WorkspaceName},
    ports::{WorkspaceRepositoryError, WorkspaceRepositoryResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::collections::BTreeSet;

/// Query result row for workspace records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workspaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkspaceRow {
    /// Workspace identifier.
    pub id: uuid::Uuid,
    /// Workspace display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Owner user identifier.
    pub owner_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert/update model for workspace records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = workspaces)]
pub struct NewWorkspaceRow {
    /// Workspace identifier.
    pub id: uuid::Uuid,
    /// Workspace display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Owner user identifier.
    pub owner_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for membership rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workspace_members)]
pub struct NewMemberRow {
    /// Workspace identifier.
    pub workspace_id: uuid::Uuid,
    /// Member user identifier.
    pub user_id: uuid::Uuid,
}

/// Maps a workspace aggregate to an insert/update row.
pub fn to_new_row(workspace: &Workspace) -> NewWorkspaceRow {
    NewWorkspaceRow {
        id: workspace.id().into_inner(),
        name: workspace.name().as_str().to_owned(),
        description: workspace.description().to_owned(),
        owner_id: workspace.owner().into_inner(),
        created_at: workspace.created_at(),
        updated_at: workspace.updated_at(),
    }
}

/// Maps the aggregate's member set to membership rows.
pub fn to_member_rows(workspace: &Workspace) -> Vec<NewMemberRow> {
    workspace
        .members()
        .iter()
        .map(|member| NewMemberRow {
            workspace_id: workspace.id().into_inner(),
            user_id: member.into_inner(),
        })
        .collect()
}

/// Maps a query row plus its membership rows back to an aggregate.
pub fn row_to_workspace(
    row: WorkspaceRow,
    member_ids: Vec<uuid::Uuid>,
) -> WorkspaceRepositoryResult<Workspace> {
    let WorkspaceRow {
        id,
        name: persisted_name,
        description,
        owner_id,
        created_at,
        updated_at,
    } = row;

    let name = WorkspaceName::new(persisted_name).map_err(WorkspaceRepositoryError::persistence)?;
    let members: BTreeSet<UserId> = member_ids.into_iter().map(UserId::from_uuid).collect();

    let data = PersistedWorkspaceData {
        id: WorkspaceId::from_uuid(id),
        name,
        description,
        owner: UserId::from_uuid(owner_id),
        members,
        created_at,
        updated_at,
    };
    Ok(Workspace::from_persisted(data))
}
