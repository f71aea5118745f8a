//! Diesel row models for board persistence.

use super::schema::{audit_log, categories, tasks};
use crate::board::domain::{
    AuditAction, AuditEntry, AuditEntryId, Category, CategoryId, Priority, Task, TaskId,
};
use crate::board::ports::StoreError;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Optional category reference.
    pub category_id: Option<i64>,
    /// Completion flag.
    pub is_completed: bool,
    /// Priority storage string.
    pub priority: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insert model for task records; identifier and creation timestamp come
/// from database defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Optional category reference.
    pub category_id: Option<i64>,
    /// Priority storage string.
    pub priority: String,
}

/// Query result row for category records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    /// Category identifier.
    pub id: i64,
    /// Unique display name.
    pub name: String,
    /// Cached task count.
    pub task_count: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for audit entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditRow {
    /// Entry identifier.
    pub id: i64,
    /// Mutation kind storage string.
    pub action: String,
    /// Affected table name.
    pub entity: String,
    /// Affected row identifier.
    pub entity_id: Option<i64>,
    /// Free-text detail.
    pub detail: Option<String>,
    /// Recording timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Insert model for audit entries; identifier and timestamp come from
/// database defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_log)]
pub struct NewAuditRow {
    /// Mutation kind storage string.
    pub action: String,
    /// Affected table name.
    pub entity: String,
    /// Affected row identifier.
    pub entity_id: Option<i64>,
    /// Free-text detail.
    pub detail: Option<String>,
}

/// Converts a task row into the domain read model.
///
/// # Errors
///
/// Returns a persistence error when the stored priority string is not part
/// of the closed enumeration.
pub fn row_to_task(row: TaskRow) -> Result<Task, StoreError> {
    let priority = Priority::try_from(row.priority.as_str()).map_err(StoreError::persistence)?;
    Ok(Task {
        id: TaskId::from_inner(row.id),
        title: row.title,
        description: row.description,
        category_id: row.category_id.map(CategoryId::from_inner),
        is_completed: row.is_completed,
        priority,
        created_at: row.created_at,
        completed_at: row.completed_at,
    })
}

/// Converts a category row into the domain read model.
#[must_use]
pub fn row_to_category(row: CategoryRow) -> Category {
    Category {
        id: CategoryId::from_inner(row.id),
        name: row.name,
        task_count: row.task_count,
        created_at: row.created_at,
    }
}

/// Converts an audit row into the domain read model.
///
/// # Errors
///
/// Returns a persistence error when the stored action string is unknown.
pub fn row_to_audit_entry(row: AuditRow) -> Result<AuditEntry, StoreError> {
    let action = AuditAction::try_from(row.action.as_str()).map_err(StoreError::persistence)?;
    Ok(AuditEntry {
        id: AuditEntryId::from_inner(row.id),
        action,
        entity: row.entity,
        entity_id: row.entity_id,
        detail: row.detail,
        recorded_at: row.recorded_at,
    })
}
