//! Application services for workspace management and membership.

mod membership;

pub use membership::{
    MembershipService, WorkspaceDetail, WorkspaceServiceError, WorkspaceServiceResult,
};
