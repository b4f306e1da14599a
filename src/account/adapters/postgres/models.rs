//! Diesel row models for account persistence.

use super::schema::users;
use crate::account::{
    domain::{EmailAddress, PersistedUserData, User, UserId, Username},
    ports::{UserRepositoryError, UserRepositoryResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Optional first name.
    pub first_name: Option<String>,
    /// Optional last name.
    pub last_name: Option<String>,
    /// Free-text profile bio.
    pub bio: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert/update model for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub struct NewUserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Optional first name.
    pub first_name: Option<String>,
    /// Optional last name.
    pub last_name: Option<String>,
    /// Free-text profile bio.
    pub bio: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Maps a user aggregate to an insert/update row.
pub fn to_new_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().into_inner(),
        username: user.username().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        first_name: user.first_name().map(ToOwned::to_owned),
        last_name: user.last_name().map(ToOwned::to_owned),
        bio: user.bio().to_owned(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

/// Maps a query row back to a user aggregate.
pub fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        username: persisted_username,
        email: persisted_email,
        first_name,
        last_name,
        bio,
        created_at,
        updated_at,
    } = row;

    let username = Username::new(persisted_username).map_err(UserRepositoryError::persistence)?;
    let email = EmailAddress::new(persisted_email).map_err(UserRepositoryError::persistence)?;

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        username,
        email,
        first_name,
        last_name,
        bio,
        created_at,
        updated_at,
    };
    Ok(User::from_persisted(data))
}
