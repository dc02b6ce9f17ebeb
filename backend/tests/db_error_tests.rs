//! Tests for db::repository::error.

use hotel_booking::db::repository::{ErrorContext, RepositoryError};

#[test]
fn test_error_context_chaining() {
    let ctx = ErrorContext::new("dislike")
        .with_entity("hotel")
        .with_entity_id(42)
        .with_details("pool exhausted")
        .retryable();

    assert_eq!(ctx.operation.as_deref(), Some("dislike"));
    assert_eq!(ctx.entity.as_deref(), Some("hotel"));
    assert_eq!(ctx.entity_id.as_deref(), Some("42"));
    assert_eq!(ctx.details.as_deref(), Some("pool exhausted"));
    assert!(ctx.retryable);
}

#[test]
fn test_error_context_default_is_empty() {
    let ctx = ErrorContext::default();
    assert!(ctx.operation.is_none());
    assert!(ctx.entity.is_none());
    assert!(ctx.entity_id.is_none());
    assert!(ctx.details.is_none());
    assert!(!ctx.retryable);
    assert_eq!(ctx.to_string(), "[]");
}

#[test]
fn test_error_context_display() {
    let ctx = ErrorContext::new("create_room")
        .with_entity("hotel")
        .with_entity_id("7")
        .with_details("fk")
        .retryable();

    let display = ctx.to_string();
    assert!(display.contains("operation=create_room"));
    assert!(display.contains("entity=hotel"));
    assert!(display.contains("id=7"));
    assert!(display.contains("details=fk"));
    assert!(display.contains("retryable=true"));
}

#[test]
fn test_constructor_messages() {
    let cases = [
        (RepositoryError::connection("refused"), "Connection error"),
        (RepositoryError::query("bad SQL"), "Query error"),
        (RepositoryError::not_found("gone"), "Not found"),
        (RepositoryError::validation("bad range"), "validation error"),
        (RepositoryError::configuration("no url"), "Configuration error"),
        (RepositoryError::internal("oops"), "Internal error"),
        (RepositoryError::transaction("rolled back"), "Transaction error"),
        (RepositoryError::timeout("slow"), "Timeout error"),
    ];

    for (err, prefix) in cases {
        assert!(
            err.to_string().contains(prefix),
            "{:?} should mention {}",
            err,
            prefix
        );
    }
}

#[test]
fn test_retryable_classification() {
    assert!(RepositoryError::connection("temp").is_retryable());
    assert!(RepositoryError::timeout("slow").is_retryable());
    assert!(RepositoryError::connection_with_context("x", ErrorContext::new("op")).is_retryable());

    assert!(!RepositoryError::not_found("missing").is_retryable());
    assert!(!RepositoryError::validation("invalid").is_retryable());
    assert!(!RepositoryError::query("syntax").is_retryable());
    assert!(RepositoryError::query_with_context("serialization", ErrorContext::new("op").retryable())
        .is_retryable());
}

#[test]
fn test_missing_names_the_entity() {
    let err = RepositoryError::missing("get_reservation", "reservation", 9);
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Reservation 9 not found"));
    assert_eq!(err.context().entity_id.as_deref(), Some("9"));
}

#[test]
fn test_with_operation_sets_context() {
    let err = RepositoryError::not_found_with_context("gone", ErrorContext::new("lookup"))
        .with_operation("delete_room");
    assert_eq!(err.context().operation.as_deref(), Some("delete_room"));
    assert!(err.to_string().contains("operation=delete_room"));
}

#[test]
fn test_string_conversions_are_internal() {
    let err: RepositoryError = "boom".into();
    assert!(matches!(err, RepositoryError::InternalError { .. }));

    let err: RepositoryError = String::from("boom").into();
    assert!(matches!(err, RepositoryError::InternalError { .. }));
}
