//! Category read model.

use super::CategoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named grouping for tasks with a cached task count.
///
/// `task_count` is maintained incrementally by the storage layer's mutation
/// side effects and is never written directly by application code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    pub id: CategoryId,
    /// Unique display name.
    pub name: String,
    /// Cached count of tasks currently referencing this category.
    pub task_count: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Display names seeded into an empty store at provisioning time.
pub const DEFAULT_CATEGORY_NAMES: [&str; 4] = ["Personal", "Work", "Study", "Home"];
