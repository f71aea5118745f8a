//! Orchestration services for the task board.

mod board;
mod readiness;

pub use board::{BoardError, BoardResult, DEFAULT_AUDIT_LIMIT, TaskBoardService};
pub use readiness::{Readiness, ReadinessCell, RetryPolicy, StartupError, await_ready};
