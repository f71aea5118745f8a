//! Port contracts for the task board.

mod store;

pub use store::{StoreError, StoreResult, TaskStore};

#[cfg(test)]
pub use store::MockTaskStore;
