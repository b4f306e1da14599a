//! Error types for workspace domain validation.

use thiserror::Error;

/// Errors returned while constructing workspace domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The workspace name is empty after trimming.
    #[error("workspace name must not be empty")]
    EmptyName,

    /// The workspace name exceeds the maximum length.
    #[error("workspace name is {0} characters, maximum is 200")]
    NameTooLong(usize),
}
