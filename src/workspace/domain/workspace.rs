//! Workspace aggregate root and membership predicates.

use super::{WorkspaceId, WorkspaceName};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Workspace aggregate root.
///
/// The owner is fixed at creation and never appears in the explicit member
/// set. Permission checks that mean "anyone with access" must use
/// [`Workspace::can_access`], which treats the owner as a member; callers
/// that need the distinction (owner-only operations) use
/// [`Workspace::is_owner`] directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: WorkspaceName,
    description: String,
    owner: UserId,
    members: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted workspace aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkspaceData {
    /// Persisted workspace identifier.
    pub id: WorkspaceId,
    /// Persisted workspace name.
    pub name: WorkspaceName,
    /// Persisted description.
    pub description: String,
    /// Persisted owner identifier.
    pub owner: UserId,
    /// Persisted explicit member set (owner excluded).
    pub members: BTreeSet<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates a new workspace owned by the given user.
    #[must_use]
    pub fn new(
        name: WorkspaceName,
        description: impl Into<String>,
        owner: UserId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: WorkspaceId::new(),
            name,
            description: description.into(),
            owner,
            members: BTreeSet::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a workspace from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkspaceData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            owner: data.owner,
            members: data.members,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the workspace name.
    #[must_use]
    pub const fn name(&self) -> &WorkspaceName {
        &self.name
    }

    /// Returns the workspace description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the owner identifier.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
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

    /// Returns `true` when the user owns this workspace.
    #[must_use]
    pub fn is_owner(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Returns `true` when the user is in the explicit member set.
    ///
    /// The owner is not part of the explicit set; combine with
    /// [`Workspace::is_owner`] or use [`Workspace::can_access`] for
    /// visibility checks.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Returns `true` when the user is the owner or an explicit member.
    #[must_use]
    pub fn can_access(&self, user: UserId) -> bool {
        self.is_owner(user) || self.is_member(user)
    }

    /// Returns the explicit member set (owner excluded).
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<UserId> {
        &self.members
    }

    /// Returns the number of explicit members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Adds a user to the explicit member set.
    ///
    /// Idempotent: adding an existing member is a no-op and does not touch
    /// the update timestamp. The owner rule (owner is never an explicit
    /// member) is enforced by the membership service before this call.
    pub fn add_member(&mut self, user: UserId, clock: &impl Clock) {
        if self.members.insert(user) {
            self.touch(clock);
        }
    }

    /// Removes a user from the explicit member set.
    ///
    /// Idempotent: removing a non-member is a no-op. Callers must refuse
    /// owner removal before reaching this mutation.
    pub fn remove_member(&mut self, user: UserId, clock: &impl Clock) {
        if self.members.remove(&user) {
            self.touch(clock);
        }
    }

    /// Replaces the workspace name and description.
    pub fn update_details(
        &mut self,
        name: WorkspaceName,
        description: impl Into<String>,
        clock: &impl Clock,
    ) {
        self.name = name;
        self.description = description.into();
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
