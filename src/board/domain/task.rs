//! Task read models and validated mutation payloads.

use super::{CategoryId, Priority, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored task as read back from persistence.
///
/// Pure data carrier: the title invariant is enforced at the write boundary
/// by [`TaskDraft`] and [`TaskUpdate`], so reads stay cheap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Short title, never empty.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Category the task belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// Whether the task has been completed.
    pub is_completed: bool,
    /// Task priority.
    pub priority: Priority,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Set exactly when the task transitions from open to completed.
    pub completed_at: Option<DateTime<Utc>>,
}

/// A task joined with its category's display name for list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithCategory {
    /// The task record.
    pub task: Task,
    /// Display name of the referenced category, if any.
    pub category_name: Option<String>,
}

/// Validated payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: Option<String>,
    category_id: Option<CategoryId>,
    priority: Priority,
}

impl TaskDraft {
    /// Creates a draft with the default [`Priority::Medium`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is empty.
    /// Trimming is the caller's responsibility; the domain only rejects the
    /// genuinely empty string.
    pub fn new(title: impl Into<String>) -> Result<Self, TaskDomainError> {
        let title = title.into();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            title,
            description: None,
            category_id: None,
            priority: Priority::default(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category reference.
    #[must_use]
    pub const fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the category reference, if set.
    #[must_use]
    pub const fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }
}

/// Validated payload for editing a task's descriptive fields.
///
/// Completion state is deliberately absent: completing a task goes through
/// its own operation so the completion side effects stay in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    title: String,
    description: Option<String>,
    category_id: Option<CategoryId>,
    priority: Priority,
}

impl TaskUpdate {
    /// Creates an update payload.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is empty.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        category_id: Option<CategoryId>,
        priority: Priority,
    ) -> Result<Self, TaskDomainError> {
        let title = title.into();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            title,
            description,
            category_id,
            priority,
        })
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the category reference, if set.
    #[must_use]
    pub const fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }
}
