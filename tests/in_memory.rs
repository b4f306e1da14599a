//! In-memory repository integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `membership_tests`: Workspace access, owner rules, member lifecycle
//! - `task_permission_tests`: Edit/delete predicates and the status cycle
//! - `comment_permission_tests`: Author-scoped comment rules
//! - `cascade_tests`: Workspace and account deletion cascades
//! - `dashboard_tests`: Landing-view assembly

mod in_memory {
    pub mod helpers;

    mod cascade_tests;
    mod comment_permission_tests;
    mod dashboard_tests;
    mod membership_tests;
    mod task_permission_tests;
}
