//! Application services for task and comment orchestration.

mod comments;
mod lifecycle;

pub use comments::{CommentService, CommentServiceError, CommentServiceResult};
pub use lifecycle::{
    CommentView, TaskDetail, TaskDraft, TaskEditRequest, TaskService, TaskServiceError,
    TaskServiceResult, WorkspaceTasks,
};
