//! Port contracts for task and comment persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod comments;
pub mod repository;

pub use comments::{CommentRepository, CommentRepositoryError, CommentRepositoryResult};
pub use repository::{
    AssigneeFilter, TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    TaskStatusCounts,
};
