//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, Value};

#[test]
fn test_new_error_is_plain_error() {
    let error = JsError::new("<rejection value>");
    assert!(matches!(error.kind, ErrorKind::Error));
    assert_eq!(error.message, "<rejection value>");
}

#[test]
fn test_errors_compare_by_identity() {
    let a = JsError::new("<rejection value>");
    let b = JsError::new("<rejection value>");
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert_ne!(a.id, b.id);
}

#[test]
fn test_error_display_includes_kind_and_identity() {
    let error = JsError::with_kind(ErrorKind::TypeError, "boom");
    let rendered = error.to_string();
    assert!(rendered.starts_with("TypeError: boom"));
    assert!(rendered.contains(&error.id.to_string()));
}

#[test]
fn test_error_values_compare_by_identity() {
    let error = JsError::new("x");
    assert_eq!(Value::Error(error.clone()), Value::Error(error));
    assert_ne!(Value::Error(JsError::new("x")), Value::Error(JsError::new("x")));
}
