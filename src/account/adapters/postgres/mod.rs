//! `PostgreSQL` adapter for account persistence.

mod models;
mod repository;
mod schema;

pub use repository::{AccountPgPool, PostgresUserRepository};
