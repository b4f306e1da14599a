//! User identity and profile management for Atelier.
//!
//! Accounts are the leaf entity of the system: workspaces, tasks, and
//! comments all reference users by identifier. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
