//! Integration tests for task permissions and the status cycle.

use super::helpers::{App, app, register, workspace_with_members};
use atelier::task::{
    domain::TaskStatus,
    services::{TaskDraft, TaskServiceError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_creator_and_outsider_follow_the_edit_matrix(app: App) {
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let carol = register(&app, "carol").await;
    let workspace_id = workspace_with_members(&app, alice, "Matrix", &["bob"]).await;

    // Bob creates an unassigned task in Alice's workspace.
    let task = app
        .task_service
        .create_task(bob, workspace_id, TaskDraft::new("Shared item"))
        .await
        .expect("task creation should succeed");

    // Owner and creator pass the edit gate through the service.
    app.task_service
        .toggle_status(alice, task.id())
        .await
        .expect("owner may edit");
    app.task_service
        .toggle_status(bob, task.id())
        .await
        .expect("creator may edit");

    // Carol is not in the workspace at all.
    let denied = app.task_service.toggle_status(carol, task.id()).await;
    assert!(matches!(
        denied,
        Err(TaskServiceError::EditForbidden { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn three_toggles_return_a_task_to_its_original_status(app: App) {
    let alice = register(&app, "alice").await;
    let workspace_id = workspace_with_members(&app, alice, "Cycle", &[]).await;

    let task = app
        .task_service
        .create_task(alice, workspace_id, TaskDraft::new("Round trip"))
        .await
        .expect("task creation should succeed");
    assert_eq!(task.status(), TaskStatus::Todo);

    let first = app
        .task_service
        .toggle_status(alice, task.id())
        .await
        .expect("toggle should succeed");
    let second = app
        .task_service
        .toggle_status(alice, task.id())
        .await
        .expect("toggle should succeed");
    let third = app
        .task_service
        .toggle_status(alice, task.id())
        .await
        .expect("toggle should succeed");

    assert_eq!(first, TaskStatus::InProgress);
    assert_eq!(second, TaskStatus::Done);
    assert_eq!(third, TaskStatus::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_task_recovers_after_completion(app: App) {
    let alice = register(&app, "alice").await;
    let workspace_id = workspace_with_members(&app, alice, "Deadlines", &[]).await;

    let today = chrono::Utc::now().date_naive();
    let yesterday = today - chrono::Duration::days(1);

    let task = app
        .task_service
        .create_task(
            alice,
            workspace_id,
            TaskDraft::new("Past due").with_due_date(yesterday),
        )
        .await
        .expect("task creation should succeed");
    assert!(task.is_overdue(today));

    // Two toggles land on Done, which clears the overdue flag.
    app.task_service
        .toggle_status(alice, task.id())
        .await
        .expect("toggle should succeed");
    app.task_service
        .toggle_status(alice, task.id())
        .await
        .expect("toggle should succeed");

    let detail = app
        .task_service
        .task_detail(alice, task.id())
        .await
        .expect("detail should succeed");
    assert_eq!(detail.task.status(), TaskStatus::Done);
    assert!(!detail.task.is_overdue(today));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn detail_is_visible_to_members_but_not_outsiders(app: App) {
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let carol = register(&app, "carol").await;
    let workspace_id = workspace_with_members(&app, alice, "Visibility", &["bob"]).await;

    let task = app
        .task_service
        .create_task(alice, workspace_id, TaskDraft::new("Owner's item"))
        .await
        .expect("task creation should succeed");

    let bobs_view = app
        .task_service
        .task_detail(bob, task.id())
        .await
        .expect("member should see the task");
    assert!(!bobs_view.can_edit);
    assert!(!bobs_view.can_delete);

    let denied = app.task_service.task_detail(carol, task.id()).await;
    assert!(matches!(
        denied,
        Err(TaskServiceError::AccessDenied { .. })
    ));
}
