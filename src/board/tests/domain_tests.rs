//! Domain-focused tests for board value types.

use crate::board::domain::{
    AuditAction, CategoryId, Priority, TaskDomainError, TaskDraft, TaskId, TaskUpdate,
};
use rstest::rstest;

#[rstest]
#[case("low", Priority::Low)]
#[case("medium", Priority::Medium)]
#[case("high", Priority::High)]
#[case("  HIGH  ", Priority::High)]
fn priority_parses_storage_strings(#[case] raw: &str, #[case] expected: Priority) {
    assert_eq!(Priority::try_from(raw), Ok(expected));
}

#[rstest]
fn priority_rejects_unknown_strings() {
    assert!(Priority::try_from("urgent").is_err());
}

#[rstest]
fn priority_defaults_to_medium() {
    assert_eq!(Priority::default(), Priority::Medium);
}

#[rstest]
#[case(Priority::Low, "low")]
#[case(Priority::Medium, "medium")]
#[case(Priority::High, "high")]
fn priority_round_trips_through_storage_string(
    #[case] priority: Priority,
    #[case] storage: &str,
) {
    assert_eq!(priority.as_str(), storage);
    assert_eq!(Priority::try_from(priority.as_str()), Ok(priority));
}

#[rstest]
#[case("INSERT", AuditAction::Insert)]
#[case("COMPLETE", AuditAction::Complete)]
#[case("DELETE", AuditAction::Delete)]
#[case("delete", AuditAction::Delete)]
fn audit_action_parses_storage_strings(#[case] raw: &str, #[case] expected: AuditAction) {
    assert_eq!(AuditAction::try_from(raw), Ok(expected));
}

#[rstest]
fn audit_action_rejects_unknown_strings() {
    assert!(AuditAction::try_from("TRUNCATE").is_err());
}

#[rstest]
fn task_draft_rejects_empty_title() {
    assert_eq!(TaskDraft::new(""), Err(TaskDomainError::EmptyTitle));
}

#[rstest]
fn task_draft_keeps_whitespace_titles() {
    // Trimming is the UI collaborator's job; the domain only rejects the
    // genuinely empty string.
    let draft = TaskDraft::new("  ").expect("whitespace title accepted");
    assert_eq!(draft.title(), "  ");
}

#[rstest]
fn task_draft_builder_sets_all_fields() {
    let draft = TaskDraft::new("Water the plants")
        .expect("valid draft")
        .with_description("Balcony first")
        .with_category(CategoryId::from_inner(3))
        .with_priority(Priority::High);

    assert_eq!(draft.title(), "Water the plants");
    assert_eq!(draft.description(), Some("Balcony first"));
    assert_eq!(draft.category_id(), Some(CategoryId::from_inner(3)));
    assert_eq!(draft.priority(), Priority::High);
}

#[rstest]
fn task_draft_defaults_to_medium_priority_and_no_category() {
    let draft = TaskDraft::new("Plain task").expect("valid draft");
    assert_eq!(draft.priority(), Priority::Medium);
    assert_eq!(draft.category_id(), None);
    assert_eq!(draft.description(), None);
}

#[rstest]
fn task_update_rejects_empty_title() {
    let result = TaskUpdate::new("", None, None, Priority::Low);
    assert_eq!(result, Err(TaskDomainError::EmptyTitle));
}

#[rstest]
fn identifiers_display_their_inner_value() {
    assert_eq!(TaskId::from_inner(42).to_string(), "42");
    assert_eq!(CategoryId::from_inner(7).to_string(), "7");
}
