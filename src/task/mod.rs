//! Task and comment lifecycle for Atelier.
//!
//! Tasks belong to exactly one workspace and carry a creator, an optional
//! assignee, a cyclic status lifecycle (to-do, in progress, done), a
//! priority, and an optional due date. Comments belong to exactly one task
//! and one authoring user. Permission predicates live on the aggregates as
//! plain boolean methods; the services gate every mutation on them. The
//! module follows hexagonal architecture:
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
