//! Tests for the board service's readiness gating and delegation.

use crate::board::adapters::memory::InMemoryTaskStore;
use crate::board::domain::{CategoryId, TaskDomainError, TaskDraft, TaskId};
use crate::board::ports::{MockTaskStore, StoreError};
use crate::board::services::{
    BoardError, DEFAULT_AUDIT_LIMIT, Readiness, RetryPolicy, StartupError, TaskBoardService,
};
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::time::Duration;

fn quick_policy() -> RetryPolicy {
    RetryPolicy {
        attempts: 3,
        delay: Duration::from_millis(1),
    }
}

#[fixture]
async fn connected_service() -> TaskBoardService<InMemoryTaskStore> {
    let store = Arc::new(InMemoryTaskStore::with_default_categories());
    let service = TaskBoardService::new(store);
    service.connect(quick_policy()).await.expect("connect");
    service
}

#[tokio::test(flavor = "multi_thread")]
async fn operations_fail_before_connect() {
    let service = TaskBoardService::new(Arc::new(InMemoryTaskStore::new()));

    assert_eq!(service.readiness(), Readiness::Connecting);
    let result = service.list_tasks().await;
    assert!(matches!(
        result,
        Err(BoardError::NotReady(Readiness::Connecting))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_transitions_to_connected_on_healthy_store() {
    let service = TaskBoardService::new(Arc::new(InMemoryTaskStore::new()));

    service.connect(quick_policy()).await.expect("connect");

    assert_eq!(service.readiness(), Readiness::Connected);
    assert!(service.list_tasks().await.expect("list").is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_transitions_to_error_when_probing_is_exhausted() {
    let mut store = MockTaskStore::new();
    store.expect_health_check().times(2).returning(|| false);
    let service = TaskBoardService::new(Arc::new(store));

    let result = service
        .connect(RetryPolicy {
            attempts: 2,
            delay: Duration::from_millis(1),
        })
        .await;

    assert_eq!(result, Err(StartupError::RetriesExhausted { attempts: 2 }));
    assert_eq!(service.readiness(), Readiness::Error);
    assert!(matches!(
        service.list_categories().await,
        Err(BoardError::NotReady(Readiness::Error))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_and_complete_flow_through_the_store(
    #[future] connected_service: TaskBoardService<InMemoryTaskStore>,
) {
    let service = connected_service.await;
    let draft = TaskDraft::new("Ship release notes").expect("valid draft");

    let id = service.create_task(draft).await.expect("create");
    assert_eq!(service.complete_task(id).await.expect("complete"), 1);

    let tasks = service.list_tasks().await.expect("list");
    assert!(tasks.first().expect("one task").task.is_completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_category_surfaces_as_store_error(
    #[future] connected_service: TaskBoardService<InMemoryTaskStore>,
) {
    let service = connected_service.await;
    let missing = CategoryId::from_inner(9_999);
    let draft = TaskDraft::new("Orphan")
        .expect("valid draft")
        .with_category(missing);

    let result = service.create_task(draft).await;

    assert!(matches!(
        result,
        Err(BoardError::Store(StoreError::UnknownCategory(id))) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_draft_titles_never_reach_the_store() {
    // Validation lives in the draft constructor, so the service cannot even
    // be handed an empty title.
    let result = TaskDraft::new("");
    assert!(matches!(result, Err(TaskDomainError::EmptyTitle)));
}

#[rstest]
#[case(Some(0))]
#[case(Some(-5))]
#[tokio::test(flavor = "multi_thread")]
async fn audit_log_rejects_non_positive_limits(
    #[future] connected_service: TaskBoardService<InMemoryTaskStore>,
    #[case] limit: Option<i64>,
) {
    let service = connected_service.await;

    let result = service.list_audit_log(limit).await;

    assert!(matches!(
        result,
        Err(BoardError::Domain(TaskDomainError::InvalidAuditLimit(_)))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn audit_log_defaults_to_fifty_entries() {
    let mut store = MockTaskStore::new();
    store.expect_health_check().returning(|| true);
    store
        .expect_list_audit_log()
        .withf(|limit| *limit == DEFAULT_AUDIT_LIMIT)
        .times(1)
        .returning(|_| Ok(Vec::new()));
    let service = TaskBoardService::new(Arc::new(store));
    service.connect(quick_policy()).await.expect("connect");

    let entries = service.list_audit_log(None).await.expect("audit");
    assert!(entries.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_category_reports_rollback_as_false(
    #[future] connected_service: TaskBoardService<InMemoryTaskStore>,
) {
    let service = connected_service.await;

    assert!(
        !service
            .delete_category_with_tasks(CategoryId::from_inner(9_999))
            .await
            .expect("delete category")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_task_reports_zero_for_missing_id(
    #[future] connected_service: TaskBoardService<InMemoryTaskStore>,
) {
    let service = connected_service.await;

    let affected = service
        .delete_task(TaskId::from_inner(404))
        .await
        .expect("delete");
    assert_eq!(affected, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn health_check_is_not_gated_on_readiness() {
    let service = TaskBoardService::new(Arc::new(InMemoryTaskStore::new()));

    assert_eq!(service.readiness(), Readiness::Connecting);
    assert!(service.health_check().await);
}
