//! Integration tests for the asymmetric comment permission rules.

use super::helpers::{App, app, register, workspace_with_members};
use atelier::task::services::{CommentServiceError, TaskDraft};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_may_delete_but_never_edit_a_members_comment(app: App) {
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let carol = register(&app, "carol").await;
    let workspace_id = workspace_with_members(&app, alice, "Moderated", &["bob"]).await;

    let task = app
        .task_service
        .create_task(bob, workspace_id, TaskDraft::new("Thread starter"))
        .await
        .expect("task creation should succeed");
    let comment = app
        .comment_service
        .add_comment(bob, task.id(), "Bob's opinion")
        .await
        .expect("comment should succeed");

    // Edit is author-only, even for the workspace owner.
    let edit_denied = app
        .comment_service
        .edit_comment(alice, comment.id(), "Rewritten by management")
        .await;
    assert!(matches!(
        edit_denied,
        Err(CommentServiceError::NotAuthor { .. })
    ));

    // Carol has no relationship to the workspace at all.
    let delete_denied = app.comment_service.delete_comment(carol, comment.id()).await;
    assert!(matches!(
        delete_denied,
        Err(CommentServiceError::DeleteForbidden { .. })
    ));

    // The owner's delete override stands.
    app.comment_service
        .delete_comment(alice, comment.id())
        .await
        .expect("owner delete should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_thread_reads_oldest_first(app: App) {
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let workspace_id = workspace_with_members(&app, alice, "Thread", &["bob"]).await;

    let task = app
        .task_service
        .create_task(alice, workspace_id, TaskDraft::new("Discussion"))
        .await
        .expect("task creation should succeed");

    let first = app
        .comment_service
        .add_comment(alice, task.id(), "Opening note")
        .await
        .expect("comment should succeed");
    let second = app
        .comment_service
        .add_comment(bob, task.id(), "Reply")
        .await
        .expect("comment should succeed");

    let detail = app
        .task_service
        .task_detail(alice, task.id())
        .await
        .expect("detail should succeed");

    let ids: Vec<_> = detail
        .comments
        .iter()
        .map(|view| view.comment.id())
        .collect();
    assert_eq!(ids, vec![first.id(), second.id()]);

    // Viewer-specific flags: Alice wrote the first comment only.
    let first_view = detail.comments.first().expect("first comment");
    assert!(first_view.can_edit);
    let second_view = detail.comments.get(1).expect("second comment");
    assert!(!second_view.can_edit);
    assert!(second_view.can_delete); // owner override
}
