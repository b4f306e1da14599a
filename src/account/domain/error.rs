//! Error types for account domain validation.

use thiserror::Error;

/// Maximum length of the free-text profile bio, in characters.
pub const MAX_BIO_LENGTH: usize = 500;

/// Errors returned while constructing account domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountDomainError {
    /// The username is empty, too long, or contains whitespace.
    #[error("invalid username '{0}', expected 1-150 characters without whitespace")]
    InvalidUsername(String),

    /// The email address does not follow the `local@domain` shape.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The profile bio exceeds the maximum length.
    #[error("bio is {0} characters, maximum is {MAX_BIO_LENGTH}")]
    BioTooLong(usize),
}
