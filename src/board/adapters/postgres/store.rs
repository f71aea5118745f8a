//! `PostgreSQL` implementation of the [`TaskStore`] port.
//!
//! Uses Diesel with r2d2 connection pooling. Every mutating operation runs
//! as a single transaction on one pooled connection: the primary write plus
//! its counter/audit side effects commit together or not at all. All
//! database work is offloaded via [`tokio::task::spawn_blocking`].

use async_trait::async_trait;
use diesel::prelude::*;
use thiserror::Error;

use super::connect::{PgPool, build_pool, get_conn, probe, run_blocking};
use super::models::{
    AuditRow, CategoryRow, NewTaskRow, TaskRow, row_to_audit_entry, row_to_category, row_to_task,
};
use super::provision::{ensure_schema, seed_default_categories};
use super::schema::{audit_log, categories, tasks};
use super::side_effects::{
    ensure_category_exists, lock_task_row, on_task_completed, on_task_deleted, on_task_inserted,
};
use crate::board::domain::{
    AuditEntry, Category, CategoryId, Task, TaskDraft, TaskId, TaskUpdate, TaskWithCategory,
};
use crate::board::ports::{StoreError, StoreResult, TaskStore};
use crate::board::services::StartupError;
use crate::config::DatabaseConfig;

/// Raised inside the category-delete transaction when the category row is
/// absent, forcing a rollback of the preceding bulk task delete.
#[derive(Debug, Clone, Error)]
#[error("category {0} not found during transactional delete")]
struct MissingCategory(CategoryId);

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: PgPool,
}

impl PostgresTaskStore {
    /// Creates a store from an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the pool, provisions the schema, and seeds default categories.
    ///
    /// This is the blocking startup path; run it before entering the async
    /// runtime or inside `spawn_blocking`.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] when the pool cannot be built or
    /// provisioning fails.
    pub fn bootstrap(config: &DatabaseConfig) -> Result<Self, StartupError> {
        let pool = build_pool(config)?;
        ensure_schema(&pool).map_err(|err| StartupError::Provision(err.to_string()))?;
        seed_default_categories(&pool).map_err(|err| StartupError::Provision(err.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn create_task(&self, draft: TaskDraft) -> StoreResult<TaskId> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            conn.transaction::<TaskId, StoreError, _>(|tx| {
                // Pre-check for a semantic error; the foreign key still
                // backstops the TOCTOU window between check and insert.
                if let Some(category_id) = draft.category_id() {
                    ensure_category_exists(tx, category_id)?;
                }

                let new_row = NewTaskRow {
                    title: draft.title().to_owned(),
                    description: draft.description().map(str::to_owned),
                    category_id: draft.category_id().map(CategoryId::into_inner),
                    priority: draft.priority().as_str().to_owned(),
                };
                let id: i64 = diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .returning(tasks::id)
                    .get_result(tx)
                    .map_err(|err| map_foreign_key_violation(err, draft.category_id()))?;

                let task_id = TaskId::from_inner(id);
                on_task_inserted(tx, task_id, draft.title(), draft.category_id())?;
                tracing::debug!(%task_id, "task created");
                Ok(task_id)
            })
        })
        .await
    }

    async fn list_tasks(&self) -> StoreResult<Vec<TaskWithCategory>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = tasks::table
                .left_join(categories::table)
                .select((TaskRow::as_select(), categories::name.nullable()))
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .load::<(TaskRow, Option<String>)>(&mut conn)?;
            rows.into_iter()
                .map(|(row, category_name)| {
                    Ok(TaskWithCategory {
                        task: row_to_task(row)?,
                        category_name,
                    })
                })
                .collect()
        })
        .await
    }

    async fn list_tasks_by_category(&self, category_id: CategoryId) -> StoreResult<Vec<Task>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = tasks::table
                .filter(tasks::category_id.eq(category_id.into_inner()))
                .select(TaskRow::as_select())
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .load::<TaskRow>(&mut conn)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> StoreResult<usize> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let affected = diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .set((
                    tasks::title.eq(update.title().to_owned()),
                    tasks::description.eq(update.description().map(str::to_owned)),
                    tasks::category_id.eq(update.category_id().map(CategoryId::into_inner)),
                    tasks::priority.eq(update.priority().as_str()),
                ))
                .execute(&mut conn)
                .map_err(|err| map_foreign_key_violation(err, update.category_id()))?;
            tracing::debug!(task_id = %id, affected, "task updated");
            Ok(affected)
        })
        .await
    }

    async fn complete_task(&self, id: TaskId) -> StoreResult<usize> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            conn.transaction::<usize, StoreError, _>(|tx| {
                let Some((title, _, is_completed)) = lock_task_row(tx, id)? else {
                    return Ok(0);
                };
                if is_completed {
                    // Already done: report the row as matched but leave the
                    // stored timestamp and the audit trail untouched.
                    return Ok(1);
                }

                diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                    .set((
                        tasks::is_completed.eq(true),
                        tasks::completed_at.eq(diesel::dsl::now),
                    ))
                    .execute(tx)?;
                on_task_completed(tx, id, &title)?;
                tracing::debug!(task_id = %id, "task completed");
                Ok(1)
            })
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<usize> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            conn.transaction::<usize, StoreError, _>(|tx| {
                let Some((title, category_id, _)) = lock_task_row(tx, id)? else {
                    return Ok(0);
                };
                let affected =
                    diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                        .execute(tx)?;
                if affected == 1 {
                    on_task_deleted(tx, id, &title, category_id.map(CategoryId::from_inner))?;
                }
                tracing::debug!(task_id = %id, affected, "task deleted");
                Ok(affected)
            })
        })
        .await
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let rows = categories::table
                .select(CategoryRow::as_select())
                .order(categories::name.asc())
                .load::<CategoryRow>(&mut conn)?;
            Ok(rows.into_iter().map(row_to_category).collect())
        })
        .await
    }

    async fn list_audit_log(&self, limit: i64) -> StoreResult<Vec<AuditEntry>> {
        let pool = self.pool.clone();
        run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            // recorded_at alone is unstable for entries written in the same
            // transaction; id breaks the tie.
            let rows = audit_log::table
                .select(AuditRow::as_select())
                .order((audit_log::recorded_at.desc(), audit_log::id.desc()))
                .limit(limit)
                .load::<AuditRow>(&mut conn)?;
            rows.into_iter().map(row_to_audit_entry).collect()
        })
        .await
    }

    async fn delete_category_with_tasks(&self, category_id: CategoryId) -> bool {
        let pool = self.pool.clone();
        let result = run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            conn.transaction::<usize, StoreError, _>(|tx| {
                // Informational only: reported through the log, never used
                // for branching.
                let pending: i64 = tasks::table
                    .filter(tasks::category_id.eq(category_id.into_inner()))
                    .count()
                    .get_result(tx)?;

                // Bulk path: deliberately bypasses the per-task audit and
                // counter side effects of the single-delete operation.
                let removed_tasks = diesel::delete(
                    tasks::table.filter(tasks::category_id.eq(category_id.into_inner())),
                )
                .execute(tx)?;

                let removed_categories = diesel::delete(
                    categories::table.filter(categories::id.eq(category_id.into_inner())),
                )
                .execute(tx)?;
                if removed_categories == 0 {
                    return Err(StoreError::persistence(MissingCategory(category_id)));
                }

                tracing::info!(
                    %category_id,
                    pending,
                    removed_tasks,
                    "category deleted with its tasks"
                );
                Ok(removed_tasks)
            })
        })
        .await;

        match result {
            Ok(_) => true,
            Err(err) => {
                // The boolean contract swallows the cause; the log is the
                // only place it remains observable.
                tracing::warn!(%category_id, error = %err, "category delete rolled back");
                false
            }
        }
    }

    async fn health_check(&self) -> bool {
        let pool = self.pool.clone();
        let result = run_blocking(move || {
            let mut conn = get_conn(&pool)?;
            probe(&mut conn).map_err(StoreError::persistence)
        })
        .await;

        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "health check failed");
                false
            }
        }
    }
}

/// Maps a foreign-key violation on `tasks.category_id` to the semantic
/// unknown-category error; everything else stays a persistence error.
fn map_foreign_key_violation(
    err: diesel::result::Error,
    category_id: Option<CategoryId>,
) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    match (&err, category_id) {
        (
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _),
            Some(category_id),
        ) => StoreError::UnknownCategory(category_id),
        _ => StoreError::persistence(err),
    }
}
