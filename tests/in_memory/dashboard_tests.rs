//! Integration tests for the dashboard read model.

use super::helpers::{App, app, register, workspace_with_members};
use atelier::task::services::TaskDraft;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboard_reflects_both_roles_and_flags_overdue_work(app: App) {
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let own = workspace_with_members(&app, alice, "Alice's board", &[]).await;
    let shared = workspace_with_members(&app, bob, "Bob's board", &["alice"]).await;

    let yesterday = chrono::Utc::now().date_naive() - chrono::Duration::days(1);
    app.task_service
        .create_task(
            alice,
            own,
            TaskDraft::new("Slipping item").with_due_date(yesterday),
        )
        .await
        .expect("task creation should succeed");
    app.task_service
        .create_task(
            bob,
            shared,
            TaskDraft::new("Delegated item").with_assignee(alice),
        )
        .await
        .expect("task creation should succeed");

    let summary = app
        .dashboard
        .summary(alice)
        .await
        .expect("summary should succeed");

    assert_eq!(summary.workspaces.len(), 2);
    let owned_flags: Vec<_> = summary
        .workspaces
        .iter()
        .map(|overview| (overview.workspace.id(), overview.is_owner))
        .collect();
    assert!(owned_flags.contains(&(own, true)));
    assert!(owned_flags.contains(&(shared, false)));

    // Alice sees the task she created and the one assigned to her.
    assert_eq!(summary.my_tasks.len(), 2);
    assert_eq!(summary.counts.todo, 2);
    assert_eq!(summary.overdue.len(), 1);
    let overdue = summary.overdue.first().expect("one overdue task");
    assert_eq!(overdue.title().as_str(), "Slipping item");
}
