//! UI-facing orchestration service for the task board.

use crate::board::domain::{
    AuditEntry, Category, CategoryId, Task, TaskDomainError, TaskDraft, TaskId, TaskUpdate,
    TaskWithCategory,
};
use crate::board::ports::{StoreError, TaskStore};
use crate::board::services::readiness::{
    Readiness, ReadinessCell, RetryPolicy, StartupError, await_ready,
};
use std::sync::Arc;
use thiserror::Error;

/// Audit entries returned when the caller does not pick a limit.
pub const DEFAULT_AUDIT_LIMIT: i64 = 50;

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The store has not been brought up yet, or startup failed.
    #[error("store is not ready: {0}")]
    NotReady(Readiness),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Task board orchestration service.
///
/// Wraps a [`TaskStore`] with readiness gating: every operation checks the
/// shared readiness state before touching the store, so a UI shell gets one
/// consistent "not ready" failure mode instead of scattered flag checks.
#[derive(Debug, Clone)]
pub struct TaskBoardService<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    readiness: ReadinessCell,
}

impl<S> TaskBoardService<S>
where
    S: TaskStore,
{
    /// Creates a service in the `Connecting` state.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            readiness: ReadinessCell::new(),
        }
    }

    /// Returns the current readiness state.
    #[must_use]
    pub fn readiness(&self) -> Readiness {
        self.readiness.get()
    }

    /// Probes the store with bounded retries, transitioning the readiness
    /// state to `Connected` on success or `Error` on exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::RetriesExhausted`] when every attempt fails.
    pub async fn connect(&self, policy: RetryPolicy) -> Result<(), StartupError> {
        self.readiness.set(Readiness::Connecting);
        match await_ready(self.store.as_ref(), policy).await {
            Ok(()) => {
                self.readiness.set(Readiness::Connected);
                Ok(())
            }
            Err(err) => {
                self.readiness.set(Readiness::Error);
                Err(err)
            }
        }
    }

    fn ensure_ready(&self) -> BoardResult<()> {
        let readiness = self.readiness.get();
        if readiness == Readiness::Connected {
            Ok(())
        } else {
            Err(BoardError::NotReady(readiness))
        }
    }

    /// Creates a task from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotReady`] before startup completes, or a store
    /// error (unknown category, connectivity, persistence).
    pub async fn create_task(&self, draft: TaskDraft) -> BoardResult<TaskId> {
        self.ensure_ready()?;
        Ok(self.store.create_task(draft).await?)
    }

    /// Returns all tasks joined with category names, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotReady`] before startup completes, or a store
    /// error.
    pub async fn list_tasks(&self) -> BoardResult<Vec<TaskWithCategory>> {
        self.ensure_ready()?;
        Ok(self.store.list_tasks().await?)
    }

    /// Returns the tasks in one category, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotReady`] before startup completes, or a store
    /// error.
    pub async fn list_tasks_by_category(
        &self,
        category_id: CategoryId,
    ) -> BoardResult<Vec<Task>> {
        self.ensure_ready()?;
        Ok(self.store.list_tasks_by_category(category_id).await?)
    }

    /// Updates a task's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotReady`] before startup completes, or a store
    /// error.
    pub async fn update_task(&self, id: TaskId, update: TaskUpdate) -> BoardResult<usize> {
        self.ensure_ready()?;
        Ok(self.store.update_task(id, update).await?)
    }

    /// Marks a task completed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotReady`] before startup completes, or a store
    /// error.
    pub async fn complete_task(&self, id: TaskId) -> BoardResult<usize> {
        self.ensure_ready()?;
        Ok(self.store.complete_task(id).await?)
    }

    /// Deletes a single task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotReady`] before startup completes, or a store
    /// error.
    pub async fn delete_task(&self, id: TaskId) -> BoardResult<usize> {
        self.ensure_ready()?;
        Ok(self.store.delete_task(id).await?)
    }

    /// Returns all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotReady`] before startup completes, or a store
    /// error.
    pub async fn list_categories(&self) -> BoardResult<Vec<Category>> {
        self.ensure_ready()?;
        Ok(self.store.list_categories().await?)
    }

    /// Returns the newest audit entries; `None` selects
    /// [`DEFAULT_AUDIT_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotReady`] before startup completes,
    /// [`TaskDomainError::InvalidAuditLimit`] for a non-positive limit, or a
    /// store error.
    pub async fn list_audit_log(&self, limit: Option<i64>) -> BoardResult<Vec<AuditEntry>> {
        self.ensure_ready()?;
        let limit = limit.unwrap_or(DEFAULT_AUDIT_LIMIT);
        if limit <= 0 {
            return Err(BoardError::Domain(TaskDomainError::InvalidAuditLimit(
                limit,
            )));
        }
        Ok(self.store.list_audit_log(limit).await?)
    }

    /// Deletes a category and all its tasks in one transaction.
    ///
    /// Returns `false` when the operation rolled back for any reason; the
    /// cause is observable only in the log.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotReady`] before startup completes.
    pub async fn delete_category_with_tasks(
        &self,
        category_id: CategoryId,
    ) -> BoardResult<bool> {
        self.ensure_ready()?;
        Ok(self.store.delete_category_with_tasks(category_id).await)
    }

    /// Executes a trivial round-trip query against the store.
    ///
    /// Not gated on readiness; this is the probe readiness is built from.
    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
}
