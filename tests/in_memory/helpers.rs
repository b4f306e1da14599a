//! Shared test helpers for in-memory integration tests.

use atelier::account::{
    adapters::memory::InMemoryUserRepository,
    domain::UserId,
    services::{NewAccount, ProfileService},
};
use atelier::dashboard::DashboardService;
use atelier::task::{
    adapters::memory::{InMemoryCommentRepository, InMemoryTaskRepository},
    services::{CommentService, TaskService},
};
use atelier::workspace::{
    adapters::memory::InMemoryWorkspaceRepository,
    domain::WorkspaceId,
    services::MembershipService,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Fully wired application core over shared in-memory storage.
pub struct App {
    /// User repository handle for direct state assertions.
    pub users: Arc<InMemoryUserRepository>,
    /// Workspace repository handle for direct state assertions.
    pub workspaces: Arc<InMemoryWorkspaceRepository>,
    /// Task repository handle for direct state assertions.
    pub tasks: Arc<InMemoryTaskRepository>,
    /// Account service.
    pub profile: ProfileService<
        InMemoryUserRepository,
        InMemoryWorkspaceRepository,
        InMemoryTaskRepository,
        InMemoryCommentRepository,
        DefaultClock,
    >,
    /// Workspace/membership service.
    pub membership: MembershipService<
        InMemoryWorkspaceRepository,
        InMemoryUserRepository,
        InMemoryTaskRepository,
        DefaultClock,
    >,
    /// Task service.
    pub task_service: TaskService<
        InMemoryTaskRepository,
        InMemoryCommentRepository,
        InMemoryWorkspaceRepository,
        DefaultClock,
    >,
    /// Comment service.
    pub comment_service: CommentService<
        InMemoryCommentRepository,
        InMemoryTaskRepository,
        InMemoryWorkspaceRepository,
        DefaultClock,
    >,
    /// Dashboard service.
    pub dashboard:
        DashboardService<InMemoryWorkspaceRepository, InMemoryTaskRepository, DefaultClock>,
}

/// Provides a freshly wired application core for each test.
#[fixture]
pub fn app() -> App {
    let users = Arc::new(InMemoryUserRepository::new());
    let workspaces = Arc::new(InMemoryWorkspaceRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let comments = Arc::new(tasks.comment_repository());
    let clock = Arc::new(DefaultClock);

    App {
        profile: ProfileService::new(
            Arc::clone(&users),
            Arc::clone(&workspaces),
            Arc::clone(&tasks),
            Arc::clone(&comments),
            Arc::clone(&clock),
        ),
        membership: MembershipService::new(
            Arc::clone(&workspaces),
            Arc::clone(&users),
            Arc::clone(&tasks),
            Arc::clone(&clock),
        ),
        task_service: TaskService::new(
            Arc::clone(&tasks),
            Arc::clone(&comments),
            Arc::clone(&workspaces),
            Arc::clone(&clock),
        ),
        comment_service: CommentService::new(
            Arc::clone(&comments),
            Arc::clone(&tasks),
            Arc::clone(&workspaces),
            Arc::clone(&clock),
        ),
        dashboard: DashboardService::new(
            Arc::clone(&workspaces),
            Arc::clone(&tasks),
            Arc::clone(&clock),
        ),
        users,
        workspaces,
        tasks,
    }
}

/// Registers a user with a derived email and returns the new identifier.
pub async fn register(app: &App, username: &str) -> UserId {
    app.profile
        .register(NewAccount::new(
            username,
            format!("{username}@example.com"),
        ))
        .await
        .expect("registration should succeed")
        .id()
}

/// Creates a workspace owned by `owner` and adds `members` by username.
pub async fn workspace_with_members(
    app: &App,
    owner: UserId,
    name: &str,
    members: &[&str],
) -> WorkspaceId {
    let workspace = app
        .membership
        .create_workspace(owner, name, "")
        .await
        .expect("workspace creation should succeed");
    for member in members {
        app.membership
            .add_member(owner, workspace.id(), member)
            .await
            .expect("member addition should succeed");
    }
    workspace.id()
}
