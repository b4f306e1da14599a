//! Workspace aggregate and membership authority for Atelier.
//!
//! A workspace is a named collection of tasks with exactly one owner and an
//! explicit member set. The owner is never part of the explicit set but is
//! always authorized as if a member; every visibility decision in the crate
//! funnels through [`domain::Workspace::can_access`]. The module follows
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
