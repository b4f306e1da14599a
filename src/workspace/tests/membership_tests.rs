//! Service orchestration tests for workspace management and membership.

use std::sync::Arc;

use crate::account::{
    adapters::memory::InMemoryUserRepository,
    domain::{EmailAddress, User, UserId, Username},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
    services::{NewAccount, ProfileService},
};
use crate::task::{
    adapters::memory::{InMemoryCommentRepository, InMemoryTaskRepository},
    ports::TaskRepository,
    services::{TaskDraft, TaskService},
};
use crate::workspace::{
    adapters::memory::InMemoryWorkspaceRepository,
    services::{MembershipService, WorkspaceServiceError},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use mockall::mock;
use rstest::{fixture, rstest};

type TestMembershipService = MembershipService<
    InMemoryWorkspaceRepository,
    InMemoryUserRepository,
    InMemoryTaskRepository,
    DefaultClock,
>;

struct Harness {
    tasks: Arc<InMemoryTaskRepository>,
    membership: TestMembershipService,
    task_service: TaskService<
        InMemoryTaskRepository,
        InMemoryCommentRepository,
        InMemoryWorkspaceRepository,
        DefaultClock,
    >,
    profile: ProfileService<
        InMemoryUserRepository,
        InMemoryWorkspaceRepository,
        InMemoryTaskRepository,
        InMemoryCommentRepository,
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
        profile: ProfileService::new(
            Arc::clone(&users),
            Arc::clone(&workspaces),
            Arc::clone(&tasks),
            Arc::clone(&comments),
            Arc::clone(&clock),
        ),
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
async fn create_workspace_requires_existing_owner(harness: Harness) {
    let ghost = UserId::new();
    let result = harness
        .membership
        .create_workspace(ghost, "Nowhere", "")
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceServiceError::UserNotFound(id)) if id == ghost
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_owner_manages_members(harness: Harness) {
    let alice = register(&harness, "alice").await;
    let bob = register(&harness, "bob").await;
    register(&harness, "carol").await;

    let workspace = harness
        .membership
        .create_workspace(alice, "Roadmap", "")
        .await
        .expect("workspace creation should succeed");
    harness
        .membership
        .add_member(alice, workspace.id(), "bob")
        .await
        .expect("member addition should succeed");

    let result = harness
        .membership
        .add_member(bob, workspace.id(), "carol")
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceServiceError::NotOwner(id)) if id == workspace.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_member_rejects_unknown_username(harness: Harness) {
    let alice = register(&harness, "alice").await;
    let workspace = harness
        .membership
        .create_workspace(alice, "Roadmap", "")
        .await
        .expect("workspace creation should succeed");

    let result = harness
        .membership
        .add_member(alice, workspace.id(), "nobody")
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceServiceError::UnknownUsername(name)) if name == "nobody"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_member_rejects_existing_member_and_owner(harness: Harness) {
    let alice = register(&harness, "alice").await;
    register(&harness, "bob").await;

    let workspace = harness
        .membership
        .create_workspace(alice, "Roadmap", "")
        .await
        .expect("workspace creation should succeed");
    harness
        .membership
        .add_member(alice, workspace.id(), "bob")
        .await
        .expect("member addition should succeed");

    let again = harness
        .membership
        .add_member(alice, workspace.id(), "bob")
        .await;
    assert!(matches!(
        again,
        Err(WorkspaceServiceError::AlreadyMember { .. })
    ));

    let owner = harness
        .membership
        .add_member(alice, workspace.id(), "alice")
        .await;
    assert!(matches!(
        owner,
        Err(WorkspaceServiceError::OwnerIsImplicitMember(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_member_refuses_the_owner(harness: Harness) {
    let alice = register(&harness, "alice").await;
    let workspace = harness
        .membership
        .create_workspace(alice, "Roadmap", "")
        .await
        .expect("workspace creation should succeed");

    let result = harness
        .membership
        .remove_member(alice, workspace.id(), alice)
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceServiceError::CannotRemoveOwner(id)) if id == workspace.id()
    ));

    // The owner still has access afterwards.
    let detail = harness
        .membership
        .workspace_detail(alice, workspace.id())
        .await
        .expect("detail should succeed");
    assert!(detail.is_owner);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_member_loses_access(harness: Harness) {
    let alice = register(&harness, "alice").await;
    let bob = register(&harness, "bob").await;

    let workspace = harness
        .membership
        .create_workspace(alice, "Roadmap", "")
        .await
        .expect("workspace creation should succeed");
    harness
        .membership
        .add_member(alice, workspace.id(), "bob")
        .await
        .expect("member addition should succeed");
    harness
        .membership
        .remove_member(alice, workspace.id(), bob)
        .await
        .expect("member removal should succeed");

    let result = harness.membership.workspace_detail(bob, workspace.id()).await;
    assert!(matches!(
        result,
        Err(WorkspaceServiceError::AccessDenied { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workspace_detail_is_hidden_from_outsiders(harness: Harness) {
    let alice = register(&harness, "alice").await;
    let carol = register(&harness, "carol").await;

    let workspace = harness
        .membership
        .create_workspace(alice, "Roadmap", "")
        .await
        .expect("workspace creation should succeed");

    let result = harness
        .membership
        .workspace_detail(carol, workspace.id())
        .await;
    assert!(matches!(
        result,
        Err(WorkspaceServiceError::AccessDenied { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_workspace_cascades_to_tasks_and_comments(harness: Harness) {
    let alice = register(&harness, "alice").await;
    let workspace = harness
        .membership
        .create_workspace(alice, "Roadmap", "")
        .await
        .expect("workspace creation should succeed");
    let task = harness
        .task_service
        .create_task(alice, workspace.id(), TaskDraft::new("Plan Q3"))
        .await
        .expect("task creation should succeed");

    harness
        .membership
        .delete_workspace(alice, workspace.id())
        .await
        .expect("workspace deletion should succeed");

    assert!(
        harness
            .tasks
            .find_by_id(task.id())
            .await
            .expect("lookup should succeed")
            .is_none()
    );
}

mock! {
    UserDirectory {}

    #[async_trait]
    impl UserRepository for UserDirectory {
        async fn store(&self, user: &User) -> UserRepositoryResult<()>;
        async fn update(&self, user: &User) -> UserRepositoryResult<()>;
        async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;
        async fn find_by_username(&self, username: &str) -> UserRepositoryResult<Option<User>>;
        async fn delete(&self, id: UserId) -> UserRepositoryResult<()>;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_member_surfaces_user_lookup_failures() {
    let clock = Arc::new(DefaultClock);
    let workspaces = Arc::new(InMemoryWorkspaceRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());

    let owner_name = Username::new("alice").expect("valid username");
    let owner_email = EmailAddress::new("alice@example.com").expect("valid email");
    let owner = User::new(owner_name, owner_email, &*clock);
    let owner_id = owner.id();

    let mut directory = MockUserDirectory::new();
    directory
        .expect_find_by_id()
        .returning(move |_| Ok(Some(owner.clone())));
    directory.expect_find_by_username().returning(|_| {
        Err(UserRepositoryError::persistence(std::io::Error::other(
            "directory offline",
        )))
    });

    let membership = MembershipService::new(
        Arc::clone(&workspaces),
        Arc::new(directory),
        Arc::clone(&tasks),
        Arc::clone(&clock),
    );

    let workspace = membership
        .create_workspace(owner_id, "Roadmap", "")
        .await
        .expect("workspace creation should succeed");

    let result = membership.add_member(owner_id, workspace.id(), "bob").await;
    assert!(matches!(
        result,
        Err(WorkspaceServiceError::Users(
            UserRepositoryError::Persistence(_)
        ))
    ));
}
