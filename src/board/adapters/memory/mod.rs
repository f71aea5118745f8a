//! In-memory task store for tests and examples.
//!
//! Mirrors the `PostgreSQL` adapter's semantics exactly: counter and audit
//! side effects are applied with the primary mutation, and the category
//! delete commits a draft copy of the state so a mid-operation failure
//! leaves everything untouched.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::board::domain::{
    AUDITED_ENTITY_TASKS, AuditAction, AuditEntry, AuditEntryId, Category, CategoryId,
    DEFAULT_CATEGORY_NAMES, Task, TaskDraft, TaskId, TaskUpdate, TaskWithCategory,
};
use crate::board::ports::{StoreError, StoreResult, TaskStore};

/// Mutable board state behind the store's lock.
#[derive(Debug, Default, Clone)]
struct BoardState {
    tasks: BTreeMap<i64, Task>,
    categories: BTreeMap<i64, Category>,
    audit: Vec<AuditEntry>,
    next_task_id: i64,
    next_category_id: i64,
    next_audit_id: i64,
}

impl BoardState {
    fn allocate_task_id(&mut self) -> TaskId {
        self.next_task_id += 1;
        TaskId::from_inner(self.next_task_id)
    }

    fn allocate_category_id(&mut self) -> CategoryId {
        self.next_category_id += 1;
        CategoryId::from_inner(self.next_category_id)
    }

    fn append_audit(
        &mut self,
        action: AuditAction,
        task_id: TaskId,
        detail: String,
        recorded_at: chrono::DateTime<chrono::Utc>,
    ) {
        self.next_audit_id += 1;
        self.audit.push(AuditEntry {
            id: AuditEntryId::from_inner(self.next_audit_id),
            action,
            entity: AUDITED_ENTITY_TASKS.to_owned(),
            entity_id: Some(task_id.into_inner()),
            detail: Some(detail),
            recorded_at,
        });
    }

    fn adjust_task_count(&mut self, category_id: CategoryId, delta: i64) {
        if let Some(category) = self.categories.get_mut(&category_id.into_inner()) {
            category.task_count += delta;
        }
    }
}

/// Thread-safe in-memory task store.
#[derive(Debug, Clone)]
pub struct InMemoryTaskStore<C = DefaultClock> {
    state: Arc<RwLock<BoardState>>,
    clock: Arc<C>,
    fail_category_delete: Arc<AtomicBool>,
}

impl InMemoryTaskStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Creates a store pre-seeded with the default category names, matching
    /// what `PostgreSQL` provisioning produces on a fresh database.
    #[must_use]
    pub fn with_default_categories() -> Self {
        let store = Self::new();
        let _seeded = store.seed_categories(DEFAULT_CATEGORY_NAMES);
        store
    }
}

impl Default for InMemoryTaskStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store with the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(BoardState::default())),
            clock,
            fail_category_delete: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Inserts categories by name, skipping names already present.
    ///
    /// Returns the identifiers of the categories now carrying those names,
    /// in input order.
    #[must_use]
    pub fn seed_categories<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Vec<CategoryId> {
        let now = self.clock.utc();
        let mut ids = Vec::new();
        let Ok(mut state) = self.state.write() else {
            return ids;
        };
        for name in names {
            let existing = state
                .categories
                .values()
                .find(|category| category.name == name)
                .map(|category| category.id);
            let id = existing.unwrap_or_else(|| {
                let id = state.allocate_category_id();
                state.categories.insert(
                    id.into_inner(),
                    Category {
                        id,
                        name: name.to_owned(),
                        task_count: 0,
                        created_at: now,
                    },
                );
                id
            });
            ids.push(id);
        }
        ids
    }

    /// Arms a one-shot failure between the bulk task delete and the category
    /// delete, for exercising the rollback guarantee.
    #[cfg(test)]
    pub(crate) fn fail_next_category_delete(&self) {
        self.fail_category_delete.store(true, Ordering::SeqCst);
    }

    fn read_state(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, BoardState>> {
        self.state
            .read()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write_state(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, BoardState>> {
        self.state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn newest_first(a: &Task, b: &Task) -> std::cmp::Ordering {
    (b.created_at, b.id).cmp(&(a.created_at, a.id))
}

#[async_trait]
impl<C> TaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn create_task(&self, draft: TaskDraft) -> StoreResult<TaskId> {
        let now = self.clock.utc();
        let mut state = self.write_state()?;

        if let Some(category_id) = draft.category_id() {
            if !state.categories.contains_key(&category_id.into_inner()) {
                return Err(StoreError::UnknownCategory(category_id));
            }
        }

        let task_id = state.allocate_task_id();
        state.tasks.insert(
            task_id.into_inner(),
            Task {
                id: task_id,
                title: draft.title().to_owned(),
                description: draft.description().map(str::to_owned),
                category_id: draft.category_id(),
                is_completed: false,
                priority: draft.priority(),
                created_at: now,
                completed_at: None,
            },
        );
        if let Some(category_id) = draft.category_id() {
            state.adjust_task_count(category_id, 1);
        }
        state.append_audit(
            AuditAction::Insert,
            task_id,
            format!("Task created: {}", draft.title()),
            now,
        );
        Ok(task_id)
    }

    async fn list_tasks(&self) -> StoreResult<Vec<TaskWithCategory>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
        tasks.sort_by(newest_first);
        Ok(tasks
            .into_iter()
            .map(|task| {
                let category_name = task
                    .category_id
                    .and_then(|id| state.categories.get(&id.into_inner()))
                    .map(|category| category.name.clone());
                TaskWithCategory {
                    task,
                    category_name,
                }
            })
            .collect())
    }

    async fn list_tasks_by_category(&self, category_id: CategoryId) -> StoreResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.category_id == Some(category_id))
            .cloned()
            .collect();
        tasks.sort_by(newest_first);
        Ok(tasks)
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> StoreResult<usize> {
        let mut state = self.write_state()?;

        if let Some(category_id) = update.category_id() {
            if !state.categories.contains_key(&category_id.into_inner()) {
                return Err(StoreError::UnknownCategory(category_id));
            }
        }

        let Some(task) = state.tasks.get_mut(&id.into_inner()) else {
            return Ok(0);
        };
        task.title = update.title().to_owned();
        task.description = update.description().map(str::to_owned);
        task.category_id = update.category_id();
        task.priority = update.priority();
        Ok(1)
    }

    async fn complete_task(&self, id: TaskId) -> StoreResult<usize> {
        let now = self.clock.utc();
        let mut state = self.write_state()?;

        let Some(task) = state.tasks.get_mut(&id.into_inner()) else {
            return Ok(0);
        };
        if task.is_completed {
            // Already done: the stored timestamp and audit trail stay as
            // they are.
            return Ok(1);
        }
        task.is_completed = true;
        task.completed_at = Some(now);
        let title = task.title.clone();
        state.append_audit(
            AuditAction::Complete,
            id,
            format!("Task completed: {title}"),
            now,
        );
        Ok(1)
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<usize> {
        let now = self.clock.utc();
        let mut state = self.write_state()?;

        let Some(task) = state.tasks.remove(&id.into_inner()) else {
            return Ok(0);
        };
        if let Some(category_id) = task.category_id {
            state.adjust_task_count(category_id, -1);
        }
        state.append_audit(
            AuditAction::Delete,
            id,
            format!("Task deleted: {}", task.title),
            now,
        );
        Ok(1)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let state = self.read_state()?;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_audit_log(&self, limit: i64) -> StoreResult<Vec<AuditEntry>> {
        let state = self.read_state()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state.audit.iter().rev().take(limit).cloned().collect())
    }

    async fn delete_category_with_tasks(&self, category_id: CategoryId) -> bool {
        let Ok(mut state) = self.state.write() else {
            tracing::warn!(%category_id, "category delete rolled back: lock poisoned");
            return false;
        };

        // Work on a draft so nothing is applied unless every step succeeds.
        let mut draft = state.clone();
        let pending = draft
            .tasks
            .values()
            .filter(|task| task.category_id == Some(category_id))
            .count();

        // Bulk path: no per-task audit or counter side effects.
        draft
            .tasks
            .retain(|_, task| task.category_id != Some(category_id));

        if self.fail_category_delete.swap(false, Ordering::SeqCst) {
            tracing::warn!(%category_id, "category delete rolled back: injected failure");
            return false;
        }

        if draft.categories.remove(&category_id.into_inner()).is_none() {
            tracing::warn!(%category_id, "category delete rolled back: category not found");
            return false;
        }

        tracing::info!(%category_id, pending, "category deleted with its tasks");
        *state = draft;
        true
    }

    async fn health_check(&self) -> bool {
        self.state.read().is_ok()
    }
}
