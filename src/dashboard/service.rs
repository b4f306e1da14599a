//! Dashboard summary assembly.

use crate::account::domain::UserId;
use crate::task::{
    domain::Task,
    ports::{TaskRepository, TaskRepositoryError, TaskStatusCounts},
};
use crate::workspace::{
    domain::Workspace,
    ports::{WorkspaceRepository, WorkspaceRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Number of recent workspaces shown on the dashboard.
const MAX_RECENT_WORKSPACES: usize = 5;

/// Number of recent tasks shown on the dashboard.
const MAX_RECENT_TASKS: usize = 10;

/// Service-level errors for dashboard assembly.
#[derive(Debug, Error)]
pub enum DashboardServiceError {
    /// Workspace listing failed.
    #[error(transparent)]
    Workspaces(#[from] WorkspaceRepositoryError),

    /// Task listing failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for dashboard operations.
pub type DashboardServiceResult<T> = Result<T, DashboardServiceError>;

/// A workspace decorated with the viewer's ownership flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceOverview {
    /// The workspace aggregate.
    pub workspace: Workspace,
    /// Whether the viewer owns it.
    pub is_owner: bool,
}

/// The signed-in user's landing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// The user's most recent workspaces (at most five).
    pub workspaces: Vec<WorkspaceOverview>,
    /// The user's most recent tasks, created or assigned (at most ten).
    pub my_tasks: Vec<Task>,
    /// Status counts across all of the user's tasks.
    pub counts: TaskStatusCounts,
    /// The user's tasks with a due date in the past that are not done.
    pub overdue: Vec<Task>,
}

/// Dashboard read-model service.
#[derive(Clone)]
pub struct DashboardService<W, T, C>
where
    W: WorkspaceRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    workspaces: Arc<W>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<W, T, C> DashboardService<W, T, C>
where
    W: WorkspaceRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new dashboard service.
    #[must_use]
    pub const fn new(workspaces: Arc<W>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            workspaces,
            tasks,
            clock,
        }
    }

    /// Assembles the dashboard for the acting user.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardServiceError`] when either listing fails.
    pub async fn summary(&self, acting: UserId) -> DashboardServiceResult<DashboardSummary> {
        let workspaces = self
            .workspaces
            .list_for_user(acting)
            .await?
            .into_iter()
            .take(MAX_RECENT_WORKSPACES)
            .map(|workspace| WorkspaceOverview {
                is_owner: workspace.is_owner(acting),
                workspace,
            })
            .collect();

        let all_tasks = self.tasks.list_for_user(acting).await?;
        let today = self.clock.utc().date_naive();

        let mut counts = TaskStatusCounts::default();
        for task in &all_tasks {
            counts.record(task.status());
        }
        let overdue: Vec<Task> = all_tasks
            .iter()
            .filter(|task| task.is_overdue(today))
            .cloned()
            .collect();
        let my_tasks: Vec<Task> = all_tasks.into_iter().take(MAX_RECENT_TASKS).collect();

        Ok(DashboardSummary {
            workspaces,
            my_tasks,
            counts,
            overdue,
        })
    }
}
