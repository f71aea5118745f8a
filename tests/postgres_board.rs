//! Integration tests for [`PostgresTaskStore`] against a real `PostgreSQL`
//! database.
//!
//! These run only when `TASKDOCK_TEST_DATABASE_URL` points at a disposable
//! database; without it every test returns early. Provisioning is idempotent,
//! so the suite can be pointed at the same database repeatedly. Tests assert
//! relative changes (counter deltas, per-entity audit entries) so leftover
//! rows from earlier runs do not interfere.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]
#![expect(
    clippy::cognitive_complexity,
    reason = "Test functions may have higher complexity for full scenario coverage"
)]

use std::time::{SystemTime, UNIX_EPOCH};

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use taskdock::board::adapters::postgres::{
    PostgresTaskStore, ensure_schema, seed_categories, seed_default_categories,
};
use taskdock::board::domain::{AuditAction, CategoryId, TaskDraft};
use taskdock::board::ports::{StoreError, TaskStore};

/// Environment variable naming the database to test against.
const DATABASE_URL_VAR: &str = "TASKDOCK_TEST_DATABASE_URL";

/// Installs a subscriber once so rollback WARN lines are visible under
/// `RUST_LOG` when debugging a live run.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builds a provisioned store, or `None` when no test database is configured.
fn test_store() -> Option<PostgresTaskStore> {
    init_tracing();
    let url = std::env::var(DATABASE_URL_VAR).ok()?;
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .expect("failed to build test pool");
    ensure_schema(&pool).expect("failed to provision schema");
    seed_default_categories(&pool).expect("failed to seed categories");
    Some(PostgresTaskStore::new(pool))
}

/// Returns a title unlikely to collide with rows from earlier runs.
fn unique_title(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{prefix}-{nanos}")
}

async fn category_id_by_name(store: &PostgresTaskStore, name: &str) -> CategoryId {
    store
        .list_categories()
        .await
        .expect("list categories")
        .into_iter()
        .find(|category| category.name == name)
        .map(|category| category.id)
        .expect("seeded category present")
}

async fn task_count_of(store: &PostgresTaskStore, id: CategoryId) -> i64 {
    store
        .list_categories()
        .await
        .expect("list categories")
        .into_iter()
        .find(|category| category.id == id)
        .map(|category| category.task_count)
        .expect("category present")
}

#[tokio::test(flavor = "multi_thread")]
async fn provisioning_is_idempotent() {
    let Some(store) = test_store() else { return };

    // A second provisioning pass must neither fail nor duplicate categories.
    ensure_schema(store.pool()).expect("re-provision schema");
    seed_default_categories(store.pool()).expect("re-seed categories");

    let categories = store.list_categories().await.expect("list categories");
    for name in ["Home", "Personal", "Study", "Work"] {
        let occurrences = categories
            .iter()
            .filter(|category| category.name == name)
            .count();
        assert_eq!(occurrences, 1, "category {name} seeded exactly once");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn health_check_round_trips() {
    let Some(store) = test_store() else { return };
    assert!(store.health_check().await);
}

#[tokio::test(flavor = "multi_thread")]
async fn task_lifecycle_maintains_counters_and_audit() {
    let Some(store) = test_store() else { return };
    let work = category_id_by_name(&store, "Work").await;
    let count_before = task_count_of(&store, work).await;
    let title = unique_title("lifecycle");

    let draft = TaskDraft::new(title.clone())
        .expect("valid draft")
        .with_category(work);
    let id = store.create_task(draft).await.expect("create");
    assert_eq!(task_count_of(&store, work).await, count_before + 1);

    // First completion stamps the timestamp; the second changes nothing.
    assert_eq!(store.complete_task(id).await.expect("first complete"), 1);
    let stamped = store
        .list_tasks()
        .await
        .expect("list")
        .into_iter()
        .find(|entry| entry.task.id == id)
        .expect("task present")
        .task
        .completed_at
        .expect("completion stamped");
    assert_eq!(store.complete_task(id).await.expect("second complete"), 1);
    let restamped = store
        .list_tasks()
        .await
        .expect("list")
        .into_iter()
        .find(|entry| entry.task.id == id)
        .expect("task present")
        .task
        .completed_at;
    assert_eq!(restamped, Some(stamped));

    assert_eq!(store.delete_task(id).await.expect("delete"), 1);
    assert_eq!(task_count_of(&store, work).await, count_before);

    // One entry per lifecycle step for this entity, newest first, and no
    // duplicate COMPLETE from the idempotent second call.
    let actions: Vec<AuditAction> = store
        .list_audit_log(200)
        .await
        .expect("audit")
        .into_iter()
        .filter(|entry| entry.entity_id == Some(id.into_inner()))
        .map(|entry| entry.action)
        .collect();
    assert_eq!(
        actions,
        vec![AuditAction::Delete, AuditAction::Complete, AuditAction::Insert]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_unknown_category() {
    let Some(store) = test_store() else { return };
    let missing = CategoryId::from_inner(i64::MAX);

    let result = store
        .create_task(
            TaskDraft::new(unique_title("orphan"))
                .expect("valid draft")
                .with_category(missing),
        )
        .await;

    assert!(matches!(
        result,
        Err(StoreError::UnknownCategory(id)) if id == missing
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_category_with_tasks_is_transactional() {
    let Some(store) = test_store() else { return };
    // A throwaway category so the seeded defaults stay intact for the other
    // tests in this binary.
    let name = unique_title("doomed-category");
    let seeded = seed_categories(store.pool(), &[name.as_str()]).expect("seed category");
    let doomed = *seeded.first().expect("freshly inserted category id");

    for prefix in ["doomed-a", "doomed-b"] {
        let draft = TaskDraft::new(unique_title(prefix))
            .expect("valid draft")
            .with_category(doomed);
        let _id = store.create_task(draft).await.expect("create");
    }

    assert!(store.delete_category_with_tasks(doomed).await);
    assert!(
        store
            .list_tasks_by_category(doomed)
            .await
            .expect("list by category")
            .is_empty()
    );
    assert!(
        store
            .list_categories()
            .await
            .expect("list categories")
            .iter()
            .all(|category| category.id != doomed)
    );

    // A second delete of the now-missing category rolls back and reports
    // false.
    assert!(!store.delete_category_with_tasks(doomed).await);
}
