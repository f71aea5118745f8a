//! Storage port for the task board.

use crate::board::domain::{
    AuditEntry, Category, CategoryId, Task, TaskDraft, TaskId, TaskUpdate, TaskWithCategory,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract consumed by the board service.
///
/// Every mutating operation is atomic with respect to its own side effects:
/// counter maintenance and audit appends happen in the same transaction as
/// the primary write, or not at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a new task and returns its identifier.
    ///
    /// When the draft references a category, the category's `task_count` is
    /// incremented and an `INSERT` audit entry is appended atomically with
    /// the insert.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownCategory`] when the referenced category
    /// does not exist.
    async fn create_task(&self, draft: TaskDraft) -> StoreResult<TaskId>;

    /// Returns all tasks joined with their category names, newest first.
    async fn list_tasks(&self) -> StoreResult<Vec<TaskWithCategory>>;

    /// Returns the tasks referencing the given category, newest first.
    async fn list_tasks_by_category(&self, category_id: CategoryId) -> StoreResult<Vec<Task>>;

    /// Updates a task's descriptive fields, leaving completion state alone.
    ///
    /// Returns the number of rows affected (0 or 1).
    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> StoreResult<usize>;

    /// Marks a task completed, stamping `completed_at` on the open-to-done
    /// transition and appending a `COMPLETE` audit entry.
    ///
    /// Re-completing an already-completed task is a no-op that still reports
    /// the row as affected; the stored timestamp and audit trail are
    /// unchanged. Returns 0 when the task does not exist.
    async fn complete_task(&self, id: TaskId) -> StoreResult<usize>;

    /// Deletes a task, decrementing its category's `task_count` (when set)
    /// and appending a `DELETE` audit entry atomically with the delete.
    ///
    /// Returns the number of rows affected (0 or 1).
    async fn delete_task(&self, id: TaskId) -> StoreResult<usize>;

    /// Returns all categories ordered by name.
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    /// Returns up to `limit` audit entries, newest first.
    async fn list_audit_log(&self, limit: i64) -> StoreResult<Vec<AuditEntry>>;

    /// Deletes a category together with every task referencing it, as one
    /// all-or-nothing transaction.
    ///
    /// The bulk task delete bypasses the per-task audit/counter side effects
    /// of [`TaskStore::delete_task`]; the removal is reported at category
    /// granularity through the log. Returns `false` when anything goes wrong
    /// (including a missing category), after rolling back; the cause is
    /// recorded at WARN rather than surfaced to the caller.
    async fn delete_category_with_tasks(&self, category_id: CategoryId) -> bool;

    /// Executes a trivial round-trip query.
    ///
    /// Returns `false` on any failure, never an error.
    async fn health_check(&self) -> bool;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The referenced category does not exist.
    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// The database could not be reached or the pool was exhausted.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Creates a connectivity error.
    #[must_use]
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity(message.into())
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        // Required by `Connection::transaction` so rollback failures have
        // somewhere to go; all Diesel errors become persistence errors.
        Self::persistence(err)
    }
}
