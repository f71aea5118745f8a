//! Task board: the transactional data core of the organizer.
//!
//! Tasks, categories, and the append-only audit trail, with counter and
//! audit maintenance running in the same transaction as each mutation. The
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
