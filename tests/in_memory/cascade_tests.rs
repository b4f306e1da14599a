//! Integration tests for workspace and account deletion cascades.

use super::helpers::{App, app, register, workspace_with_members};
use atelier::task::{
    ports::{TaskFilter, TaskRepository},
    services::TaskDraft,
};
use atelier::workspace::ports::WorkspaceRepository;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_workspace_removes_its_tasks_and_comments(app: App) {
    let alice = register(&app, "alice").await;
    register(&app, "bob").await;
    let workspace_id = workspace_with_members(&app, alice, "Doomed", &["bob"]).await;

    let task = app
        .task_service
        .create_task(alice, workspace_id, TaskDraft::new("Doomed task"))
        .await
        .expect("task creation should succeed");
    app.comment_service
        .add_comment(alice, task.id(), "Doomed comment")
        .await
        .expect("comment should succeed");

    app.membership
        .delete_workspace(alice, workspace_id)
        .await
        .expect("workspace deletion should succeed");

    assert!(
        app.workspaces
            .find_by_id(workspace_id)
            .await
            .expect("lookup should succeed")
            .is_none()
    );
    assert!(
        app.tasks
            .find_by_id(task.id())
            .await
            .expect("lookup should succeed")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_removes_its_comment_thread(app: App) {
    let alice = register(&app, "alice").await;
    let workspace_id = workspace_with_members(&app, alice, "Tidy", &[]).await;

    let task = app
        .task_service
        .create_task(alice, workspace_id, TaskDraft::new("Short-lived"))
        .await
        .expect("task creation should succeed");
    let comment = app
        .comment_service
        .add_comment(alice, task.id(), "Fleeting thought")
        .await
        .expect("comment should succeed");

    app.task_service
        .delete_task(alice, task.id())
        .await
        .expect("task deletion should succeed");

    // Editing the orphaned comment now reports the missing entity chain.
    let result = app
        .comment_service
        .delete_comment(alice, comment.id())
        .await;
    assert!(result.is_err());

    let remaining = app
        .tasks
        .list_by_workspace(workspace_id, &TaskFilter::new())
        .await
        .expect("listing should succeed");
    assert!(remaining.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_an_assignee_unassigns_their_tasks(app: App) {
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let workspace_id = workspace_with_members(&app, alice, "Handover", &["bob"]).await;

    let task = app
        .task_service
        .create_task(
            alice,
            workspace_id,
            TaskDraft::new("Bob's duty").with_assignee(bob),
        )
        .await
        .expect("task creation should succeed");

    app.profile
        .delete_account(bob)
        .await
        .expect("account deletion should succeed");

    let surviving = app
        .tasks
        .find_by_id(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should survive its assignee");
    assert_eq!(surviving.assignee(), None);

    // Bob also vanishes from the member set.
    let workspace = app
        .workspaces
        .find_by_id(workspace_id)
        .await
        .expect("lookup should succeed")
        .expect("workspace should survive");
    assert!(!workspace.is_member(bob));
}
