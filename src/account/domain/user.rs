//! User aggregate root and profile update types.

use super::error::MAX_BIO_LENGTH;
use super::{AccountDomainError, EmailAddress, UserId, Username};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    first_name: Option<String>,
    last_name: Option<String>,
    bio: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted username.
    pub username: Username,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted first name, if any.
    pub first_name: Option<String>,
    /// Persisted last name, if any.
    pub last_name: Option<String>,
    /// Persisted profile bio.
    pub bio: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Profile fields replaced by [`User::apply_profile_update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    first_name: Option<String>,
    last_name: Option<String>,
    bio: String,
}

impl ProfileUpdate {
    /// Creates an empty profile update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Sets the profile bio.
    #[must_use]
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }
}

impl User {
    /// Creates a new user account.
    #[must_use]
    pub fn new(username: Username, email: EmailAddress, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserId::new(),
            username,
            email,
            first_name: None,
            last_name: None,
            bio: String::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            bio: data.bio,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the first name, if set.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Returns the last name, if set.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns the profile bio.
    #[must_use]
    pub fn bio(&self) -> &str {
        &self.bio
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns "first last" when both names are set, the username otherwise.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => self.username.as_str().to_owned(),
        }
    }

    /// Replaces the profile fields with the given update.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::BioTooLong`] when the bio exceeds the
    /// maximum length. No field changes on error.
    pub fn apply_profile_update(
        &mut self,
        update: ProfileUpdate,
        clock: &impl Clock,
    ) -> Result<(), AccountDomainError> {
        let bio_length = update.bio.chars().count();
        if bio_length > MAX_BIO_LENGTH {
            return Err(AccountDomainError::BioTooLong(bio_length));
        }

        self.first_name = update.first_name;
        self.last_name = update.last_name;
        self.bio = update.bio;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
