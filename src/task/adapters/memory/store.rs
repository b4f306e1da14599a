//! Shared in-memory store backing the task and comment repositories.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::account::domain::UserId;
use crate::task::{
    domain::{Comment, CommentId, PersistedTaskData, Task, TaskId},
    ports::{
        CommentRepository, CommentRepositoryError, CommentRepositoryResult, TaskFilter,
        TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskStatusCounts,
    },
};
use crate::workspace::domain::WorkspaceId;

#[derive(Debug, Default)]
struct TaskStoreState {
    tasks: HashMap<TaskId, Task>,
    comments: HashMap<CommentId, Comment>,
}

impl TaskStoreState {
    /// Removes every comment belonging to the given task.
    fn drop_comments_of(&mut self, task_id: TaskId) {
        self.comments
            .retain(|_, comment| comment.task_id() != task_id);
    }

    /// Removes a task and cascades to its comments.
    fn drop_task(&mut self, task_id: TaskId) -> Option<Task> {
        let removed = self.tasks.remove(&task_id);
        if removed.is_some() {
            self.drop_comments_of(task_id);
        }
        removed
    }
}

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<TaskStoreState>>,
}

/// Thread-safe in-memory comment repository sharing the task store.
#[derive(Debug, Clone)]
pub struct InMemoryCommentRepository {
    state: Arc<RwLock<TaskStoreState>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a comment repository backed by the same store.
    #[must_use]
    pub fn comment_repository(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            state: Arc::clone(&self.state),
        }
    }
}

/// Sorts tasks newest first, matching the listing contract.
fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .drop_task(id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        Ok(())
    }

    async fn delete_by_workspace(&self, workspace_id: WorkspaceId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let doomed: Vec<TaskId> = state
            .tasks
            .values()
            .filter(|task| task.workspace_id() == workspace_id)
            .map(Task::id)
            .collect();
        for task_id in doomed {
            state.drop_task(task_id);
        }
        Ok(())
    }

    async fn delete_created_by(&self, user: UserId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let doomed: Vec<TaskId> = state
            .tasks
            .values()
            .filter(|task| task.created_by() == user)
            .map(Task::id)
            .collect();
        for task_id in doomed {
            state.drop_task(task_id);
        }
        Ok(())
    }

    async fn clear_assignee(&self, user: UserId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        for task in state.tasks.values_mut() {
            if task.assignee() == Some(user) {
                // Storage-level cleanup: the assignee column goes null
                // without touching the aggregate's audit timestamp.
                *task = Task::from_persisted(PersistedTaskData {
                    id: task.id(),
                    workspace_id: task.workspace_id(),
                    title: task.title().clone(),
                    description: task.description().to_owned(),
                    created_by: task.created_by(),
                    assignee: None,
                    status: task.status(),
                    priority: task.priority(),
                    due_date: task.due_date(),
                    created_at: task.created_at(),
                    updated_at: task.updated_at(),
                });
            }
        }
        Ok(())
    }

    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.workspace_id() == workspace_id && filter.matches(task))
            .cloned()
            .collect();
        sort_newest_first(&mut tasks);
        Ok(tasks)
    }

    async fn list_for_user(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.created_by() == user || task.assignee() == Some(user))
            .cloned()
            .collect();
        sort_newest_first(&mut tasks);
        Ok(tasks)
    }

    async fn status_counts(
        &self,
        workspace_id: WorkspaceId,
    ) -> TaskRepositoryResult<TaskStatusCounts> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut counts = TaskStatusCounts::default();
        for task in state.tasks.values() {
            if task.workspace_id() == workspace_id {
                counts.record(task.status());
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn store(&self, comment: &Comment) -> CommentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CommentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.comments.contains_key(&comment.id()) {
            return Err(CommentRepositoryError::DuplicateComment(comment.id()));
        }
        state.comments.insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> CommentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CommentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.comments.contains_key(&comment.id()) {
            return Err(CommentRepositoryError::NotFound(comment.id()));
        }
        state.comments.insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CommentId) -> CommentRepositoryResult<Option<Comment>> {
        let state = self.state.read().map_err(|err| {
            CommentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.comments.get(&id).cloned())
    }

    async fn delete(&self, id: CommentId) -> CommentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CommentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .comments
            .remove(&id)
            .ok_or(CommentRepositoryError::NotFound(id))?;
        Ok(())
    }

    async fn list_by_task(&self, task_id: TaskId) -> CommentRepositoryResult<Vec<Comment>> {
        let state = self.state.read().map_err(|err| {
            CommentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|comment| comment.task_id() == task_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(comments)
    }

    async fn delete_by_author(&self, user: UserId) -> CommentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CommentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.comments.retain(|_, comment| comment.author() != user);
        Ok(())
    }
}
