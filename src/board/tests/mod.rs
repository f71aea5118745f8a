//! Unit tests for the board module.
//!
//! Tests are organised by layer: domain invariants, memory-store semantics,
//! service gating, and the startup readiness helper.

mod domain_tests;
mod service_tests;
