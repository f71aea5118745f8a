//! Domain types for the task board: identifiers, enumerations, read models,
//! and validated mutation payloads. No infrastructure dependencies.

mod audit;
mod category;
mod error;
mod ids;
mod priority;
mod task;

pub use audit::{AUDITED_ENTITY_TASKS, AuditAction, AuditEntry};
pub use category::{Category, DEFAULT_CATEGORY_NAMES};
pub use error::{ParseAuditActionError, ParsePriorityError, TaskDomainError};
pub use ids::{AuditEntryId, CategoryId, TaskId};
pub use priority::Priority;
pub use task::{Task, TaskDraft, TaskUpdate, TaskWithCategory};
