//! Audit trail types.
//!
//! Audit entries are written exclusively by the storage layer's mutation
//! side effects; application code never inserts, updates, or deletes them
//! directly. The `entity_id` is a loose reference without a foreign key so
//! the history survives deletion of its subject.

use super::{AuditEntryId, ParseAuditActionError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A task was created.
    Insert,
    /// A task transitioned from open to completed.
    Complete,
    /// A task was deleted through the single-task path.
    Delete,
}

impl AuditAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Complete => "COMPLETE",
            Self::Delete => "DELETE",
        }
    }
}

impl TryFrom<&str> for AuditAction {
    type Error = ParseAuditActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INSERT" => Ok(Self::Insert),
            "COMPLETE" => Ok(Self::Complete),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ParseAuditActionError(value.to_owned())),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table names an audit entry can refer to.
pub const AUDITED_ENTITY_TASKS: &str = "tasks";

/// One append-only record of a task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Entry identifier.
    pub id: AuditEntryId,
    /// Kind of mutation recorded.
    pub action: AuditAction,
    /// Name of the affected table.
    pub entity: String,
    /// Identifier of the affected row, if any.
    pub entity_id: Option<i64>,
    /// Free-text description of the mutation.
    pub detail: Option<String>,
    /// When the mutation was recorded.
    pub recorded_at: DateTime<Utc>,
}
