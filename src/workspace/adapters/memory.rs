//! In-memory repository for workspace tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::account::domain::UserId;
use crate::workspace::{
    domain::{PersistedWorkspaceData, Workspace, WorkspaceId},
    ports::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult},
};

/// Thread-safe in-memory workspace repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspaceRepository {
    state: Arc<RwLock<InMemoryWorkspaceState>>,
}

#[derive(Debug, Default)]
struct InMemoryWorkspaceState {
    workspaces: HashMap<WorkspaceId, Workspace>,
}

impl InMemoryWorkspaceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sorts workspaces newest first, matching the listing contract.
fn sort_newest_first(workspaces: &mut [Workspace]) {
    workspaces.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

#[async_trait]
impl WorkspaceRepository for InMemoryWorkspaceRepository {
    async fn store(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.workspaces.contains_key(&workspace.id()) {
            return Err(WorkspaceRepositoryError::DuplicateWorkspace(workspace.id()));
        }
        state.workspaces.insert(workspace.id(), workspace.clone());
        Ok(())
    }

    async fn update(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.workspaces.contains_key(&workspace.id()) {
            return Err(WorkspaceRepositoryError::NotFound(workspace.id()));
        }
        state.workspaces.insert(workspace.id(), workspace.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>> {
        let state = self.state.read().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.workspaces.get(&id).cloned())
    }

    async fn delete(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .workspaces
            .remove(&id)
            .ok_or(WorkspaceRepositoryError::NotFound(id))?;
        Ok(())
    }

    async fn list_owned_by(&self, user: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        let state = self.state.read().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut owned: Vec<Workspace> = state
            .workspaces
            .values()
            .filter(|workspace| workspace.is_owner(user))
            .cloned()
            .collect();
        sort_newest_first(&mut owned);
        Ok(owned)
    }

    async fn list_for_user(&self, user: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>> {
        let state = self.state.read().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut visible: Vec<Workspace> = state
            .workspaces
            .values()
            .filter(|workspace| workspace.can_access(user))
            .cloned()
            .collect();
        sort_newest_first(&mut visible);
        Ok(visible)
    }

    async fn remove_user_memberships(&self, user: UserId) -> WorkspaceRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkspaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        for workspace in state.workspaces.values_mut() {
            let mut members = workspace.members().clone();
            if members.remove(&user) {
                // Storage-level cleanup: the membership row disappears
                // without touching the aggregate's audit timestamp.
                *workspace = Workspace::from_persisted(PersistedWorkspaceData {
                    id: workspace.id(),
                    name: workspace.name().clone(),
                    description: workspace.description().to_owned(),
                    owner: workspace.owner(),
                    members,
                    created_at: workspace.created_at(),
                    updated_at: workspace.updated_at(),
                });
            }
        }
        Ok(())
    }
}
