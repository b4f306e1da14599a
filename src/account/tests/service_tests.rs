//! Service orchestration tests for registration, profile, and account
//! deletion.

use std::sync::Arc;

use crate::account::{
    adapters::memory::InMemoryUserRepository,
    domain::UserId,
    ports::{UserRepository, UserRepositoryError},
    services::{AccountServiceError, NewAccount, ProfileService},
};
use crate::task::{
    adapters::memory::{InMemoryCommentRepository, InMemoryTaskRepository},
    ports::{TaskFilter, TaskRepository},
    services::{TaskDraft, TaskService},
};
use crate::workspace::{
    adapters::memory::InMemoryWorkspaceRepository,
    ports::WorkspaceRepository,
    services::MembershipService,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Harness {
    users: Arc<InMemoryUserRepository>,
    workspaces: Arc<InMemoryWorkspaceRepository>,
    tasks: Arc<InMemoryTaskRepository>,
    profile: ProfileService<
        InMemoryUserRepository,
        InMemoryWorkspaceRepository,
        InMemoryTaskRepository,
        InMemoryCommentRepository,
        DefaultClock,
    >,
    membership: MembershipService<
        InMemoryWorkspaceRepository,
        InMemoryUserRepository,
        InMemoryTaskRepository,
        DefaultClock,
    >,
    task_service: TaskService<
        InMemoryTaskRepository,
        InMemoryCommentRepository,
        InMemoryWorkspaceRepository,
        DefaultClock,
    >,
}

#[fixture]
fn harness() -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let workspaces = Arc::new(InMemoryWorkspaceRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let comments = Arc::new(tasks.comment_repository());
    let clock = Arc::new(DefaultClock);

    Harness {
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
        users,
        workspaces,
        tasks,
    }
}

async fn register(harness: &Harness, username: &str) -> UserId {
    harness
        .profile
        .register(NewAccount::new(
            username,
            format!("{username}@example.com"),
        ))
        .await
        .expect("registration should succeed")
        .id()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_duplicate_username(harness: Harness) {
    register(&harness, "alice").await;

    let duplicate = harness
        .profile
        .register(NewAccount::new("alice", "other@example.com"))
        .await;

    assert!(matches!(
        duplicate,
        Err(AccountServiceError::Repository(
            UserRepositoryError::DuplicateUsername(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_duplicate_email(harness: Harness) {
    register(&harness, "alice").await;

    let duplicate = harness
        .profile
        .register(NewAccount::new("alice2", "alice@example.com"))
        .await;

    assert!(matches!(
        duplicate,
        Err(AccountServiceError::Repository(
            UserRepositoryError::DuplicateEmail(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn profile_reports_activity_statistics(harness: Harness) {
    let alice = register(&harness, "alice").await;
    let bob = register(&harness, "bob").await;

    let workspace = harness
        .membership
        .create_workspace(alice, "Release", "")
        .await
        .expect("workspace creation should succeed");
    harness
        .membership
        .add_member(alice, workspace.id(), "bob")
        .await
        .expect("member addition should succeed");

    harness
        .task_service
        .create_task(
            alice,
            workspace.id(),
            TaskDraft::new("Write changelog").with_assignee(bob),
        )
        .await
        .expect("task creation should succeed");
    let done = harness
        .task_service
        .create_task(alice, workspace.id(), TaskDraft::new("Cut branch"))
        .await
        .expect("task creation should succeed");
    harness
        .task_service
        .toggle_status(alice, done.id())
        .await
        .expect("toggle should succeed");
    harness
        .task_service
        .toggle_status(alice, done.id())
        .await
        .expect("toggle should succeed");

    let summary = harness
        .profile
        .profile(alice)
        .await
        .expect("profile should succeed");

    assert_eq!(summary.owned_workspaces, 1);
    assert_eq!(summary.member_workspaces, 0);
    assert_eq!(summary.created_tasks, 2);
    assert_eq!(summary.assigned_tasks, 0);
    assert_eq!(summary.completed_tasks, 1);

    let bob_summary = harness
        .profile
        .profile(bob)
        .await
        .expect("profile should succeed");
    assert_eq!(bob_summary.owned_workspaces, 0);
    assert_eq!(bob_summary.member_workspaces, 1);
    assert_eq!(bob_summary.assigned_tasks, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_account_cascades_across_aggregates(harness: Harness) {
    let alice = register(&harness, "alice").await;
    let bob = register(&harness, "bob").await;

    // Alice owns a workspace with one of Bob's tasks in it; Bob also owns
    // a workspace with a task assigned to Alice.
    let alices = harness
        .membership
        .create_workspace(alice, "Alice's", "")
        .await
        .expect("workspace creation should succeed");
    harness
        .membership
        .add_member(alice, alices.id(), "bob")
        .await
        .expect("member addition should succeed");
    let bobs_task = harness
        .task_service
        .create_task(bob, alices.id(), TaskDraft::new("Bob's task"))
        .await
        .expect("task creation should succeed");

    let bobs = harness
        .membership
        .create_workspace(bob, "Bob's", "")
        .await
        .expect("workspace creation should succeed");
    harness
        .membership
        .add_member(bob, bobs.id(), "alice")
        .await
        .expect("member addition should succeed");
    let assigned = harness
        .task_service
        .create_task(
            bob,
            bobs.id(),
            TaskDraft::new("Assigned to Alice").with_assignee(alice),
        )
        .await
        .expect("task creation should succeed");

    harness
        .profile
        .delete_account(alice)
        .await
        .expect("account deletion should succeed");

    // Alice's workspace and the task inside it are gone.
    assert!(
        harness
            .workspaces
            .find_by_id(alices.id())
            .await
            .expect("lookup should succeed")
            .is_none()
    );
    assert!(
        harness
            .tasks
            .find_by_id(bobs_task.id())
            .await
            .expect("lookup should succeed")
            .is_none()
    );

    // Bob's workspace survives without Alice as member or assignee.
    let surviving = harness
        .workspaces
        .find_by_id(bobs.id())
        .await
        .expect("lookup should succeed")
        .expect("workspace should survive");
    assert!(!surviving.is_member(alice));

    let surviving_task = harness
        .tasks
        .find_by_id(assigned.id())
        .await
        .expect("lookup should succeed")
        .expect("task should survive");
    assert_eq!(surviving_task.assignee(), None);

    assert!(
        harness
            .users
            .find_by_id(alice)
            .await
            .expect("lookup should succeed")
            .is_none()
    );

    let remaining = harness
        .tasks
        .list_by_workspace(bobs.id(), &TaskFilter::new())
        .await
        .expect("listing should succeed");
    assert_eq!(remaining.len(), 1);
}
