//! Mutation side effects: counter maintenance and audit appends.
//!
//! These replace the database triggers of a conventional design with an
//! explicit call graph: each mutating store operation invokes the relevant
//! helper inside its own transaction, so a failed side effect rolls back the
//! primary write. Nothing here opens its own transaction.

use super::models::NewAuditRow;
use super::schema::{audit_log, categories, tasks};
use crate::board::domain::{AUDITED_ENTITY_TASKS, AuditAction, CategoryId, TaskId};
use crate::board::ports::{StoreError, StoreResult};
use diesel::dsl::exists;
use diesel::prelude::*;

/// Verifies that a category exists before a task insert references it.
///
/// # Errors
///
/// Returns [`StoreError::UnknownCategory`] when the category is absent.
pub(super) fn ensure_category_exists(
    conn: &mut PgConnection,
    category_id: CategoryId,
) -> StoreResult<()> {
    let found: bool = diesel::select(exists(
        categories::table.filter(categories::id.eq(category_id.into_inner())),
    ))
    .get_result(conn)?;
    if found {
        Ok(())
    } else {
        Err(StoreError::UnknownCategory(category_id))
    }
}

/// Adjusts a category's cached task count by `delta`.
pub(super) fn adjust_task_count(
    conn: &mut PgConnection,
    category_id: CategoryId,
    delta: i64,
) -> StoreResult<()> {
    diesel::update(categories::table.filter(categories::id.eq(category_id.into_inner())))
        .set(categories::task_count.eq(categories::task_count + delta))
        .execute(conn)?;
    Ok(())
}

/// Appends one audit entry for a task mutation.
pub(super) fn append_task_audit(
    conn: &mut PgConnection,
    action: AuditAction,
    task_id: TaskId,
    detail: String,
) -> StoreResult<()> {
    let row = NewAuditRow {
        action: action.as_str().to_owned(),
        entity: AUDITED_ENTITY_TASKS.to_owned(),
        entity_id: Some(task_id.into_inner()),
        detail: Some(detail),
    };
    diesel::insert_into(audit_log::table)
        .values(&row)
        .execute(conn)?;
    Ok(())
}

/// Side effects of a task insert: counter increment for a referenced
/// category plus an `INSERT` audit entry.
pub(super) fn on_task_inserted(
    conn: &mut PgConnection,
    task_id: TaskId,
    title: &str,
    category_id: Option<CategoryId>,
) -> StoreResult<()> {
    if let Some(category_id) = category_id {
        adjust_task_count(conn, category_id, 1)?;
    }
    append_task_audit(
        conn,
        AuditAction::Insert,
        task_id,
        format!("Task created: {title}"),
    )
}

/// Side effect of an open-to-done completion transition: a `COMPLETE` audit
/// entry. Counters are untouched.
pub(super) fn on_task_completed(
    conn: &mut PgConnection,
    task_id: TaskId,
    title: &str,
) -> StoreResult<()> {
    append_task_audit(
        conn,
        AuditAction::Complete,
        task_id,
        format!("Task completed: {title}"),
    )
}

/// Side effects of a single-task delete: counter decrement for the formerly
/// referenced category plus a `DELETE` audit entry with the prior title.
pub(super) fn on_task_deleted(
    conn: &mut PgConnection,
    task_id: TaskId,
    title: &str,
    category_id: Option<CategoryId>,
) -> StoreResult<()> {
    if let Some(category_id) = category_id {
        adjust_task_count(conn, category_id, -1)?;
    }
    append_task_audit(
        conn,
        AuditAction::Delete,
        task_id,
        format!("Task deleted: {title}"),
    )
}

/// Helper used by `tasks` queries that must not race with concurrent
/// mutators: reads the row with `FOR UPDATE`.
pub(super) fn lock_task_row(
    conn: &mut PgConnection,
    task_id: TaskId,
) -> StoreResult<Option<(String, Option<i64>, bool)>> {
    let row = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .select((tasks::title, tasks::category_id, tasks::is_completed))
        .for_update()
        .first::<(String, Option<i64>, bool)>(conn)
        .optional()?;
    Ok(row)
}
