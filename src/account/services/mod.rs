//! Application services for account registration and profile management.

mod profile;

pub use profile::{
    AccountServiceError, AccountServiceResult, NewAccount, ProfileService, ProfileSummary,
};
