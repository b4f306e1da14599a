//! Integration tests for workspace access and the owner invariants.

use super::helpers::{App, app, register, workspace_with_members};
use atelier::account::ports::UserRepository;
use atelier::workspace::{
    ports::WorkspaceRepository,
    services::WorkspaceServiceError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_is_authorized_without_being_an_explicit_member(app: App) {
    let alice = register(&app, "alice").await;
    let stored_user = app
        .users
        .find_by_id(alice)
        .await
        .expect("lookup should succeed")
        .expect("registered user should exist");
    assert_eq!(stored_user.username().as_str(), "alice");

    let workspace_id = workspace_with_members(&app, alice, "Core", &[]).await;

    let detail = app
        .membership
        .workspace_detail(alice, workspace_id)
        .await
        .expect("owner should see the workspace");

    assert!(detail.is_owner);
    assert!(detail.members.is_empty());
    assert!(!detail.workspace.is_member(alice));
    assert!(detail.workspace.can_access(alice));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_removal_is_refused_before_the_domain_mutation(app: App) {
    let alice = register(&app, "alice").await;
    register(&app, "bob").await;
    let workspace_id = workspace_with_members(&app, alice, "Core", &["bob"]).await;

    let result = app
        .membership
        .remove_member(alice, workspace_id, alice)
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceServiceError::CannotRemoveOwner(_))
    ));

    // The stored aggregate is untouched: Bob is still the only member.
    let stored = app
        .workspaces
        .find_by_id(workspace_id)
        .await
        .expect("lookup should succeed")
        .expect("workspace should exist");
    assert_eq!(stored.member_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_shows_owned_and_joined_workspaces(app: App) {
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let owned = workspace_with_members(&app, alice, "Alice's own", &[]).await;
    let joined = workspace_with_members(&app, bob, "Bob's shared", &["alice"]).await;
    workspace_with_members(&app, bob, "Bob's private", &[]).await;

    let visible = app
        .membership
        .list_for_user(alice)
        .await
        .expect("listing should succeed");

    let ids: Vec<_> = visible.iter().map(|workspace| workspace.id()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&owned));
    assert!(ids.contains(&joined));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_details_is_owner_only(app: App) {
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    let workspace_id = workspace_with_members(&app, alice, "Before", &["bob"]).await;

    let denied = app
        .membership
        .update_details(bob, workspace_id, "After", "hijacked")
        .await;
    assert!(matches!(denied, Err(WorkspaceServiceError::NotOwner(_))));

    let renamed = app
        .membership
        .update_details(alice, workspace_id, "After", "fresh description")
        .await
        .expect("owner update should succeed");
    assert_eq!(renamed.name().as_str(), "After");
    assert_eq!(renamed.description(), "fresh description");
}
