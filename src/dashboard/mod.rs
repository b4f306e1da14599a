//! Cross-context read model for the signed-in user's landing view.
//!
//! The dashboard aggregates recent workspaces, the user's tasks, status
//! counts, and the overdue backlog. It owns no persistence; it reads
//! through the workspace and task ports.

mod service;

pub use service::{
    DashboardService, DashboardServiceError, DashboardServiceResult, DashboardSummary,
    WorkspaceOverview,
};
