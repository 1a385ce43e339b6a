use delve_core::{strip_reasoning_markup, DelveError, Directive};
use serde_json::json;

#[test]
fn directive_requires_tool_calls() {
    let err = Directive::from_json(json!({"status_update": "DONE"})).unwrap_err();
    assert!(matches!(err, DelveError::ParseFailed { .. }));
}

#[test]
fn directive_rejects_null_tool_calls() {
    let err = Directive::from_json(json!({"tool_calls": null})).unwrap_err();
    assert!(matches!(err, DelveError::ParseFailed { .. }));
}

#[test]
fn directive_defaults_optional_fields() {
    let directive = Directive::from_json(json!({"tool_calls": []})).unwrap();
    assert!(directive.status_update.is_none());
    assert!(directive.memory_updates.is_none());
    assert!(directive.answer.is_none());
    assert!(directive.tool_calls.is_empty());
}

#[test]
fn directive_parses_a_full_round_payload() {
    let directive = Directive::from_json(json!({
        "status_update": "IN_PROGRESS",
        "memory_updates": [
            {"operation": "add", "content": "lead: https://example.com"},
            {"operation": "delete", "id": "abc-123"}
        ],
        "tool_calls": [{"tool": "search", "input": "rust async runtimes"}],
        "answer": null
    }))
    .unwrap();

    let updates = directive.memory_updates.unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].operation, "add");
    assert_eq!(updates[1].id.as_deref(), Some("abc-123"));
    assert_eq!(directive.tool_calls[0].input, "rust async runtimes");
    assert!(directive.answer.is_none());
}

#[test]
fn directive_tolerates_unknown_operations() {
    let directive = Directive::from_json(json!({
        "memory_updates": [{"operation": "archive", "id": "abc-123"}],
        "tool_calls": []
    }))
    .unwrap();
    assert_eq!(directive.memory_updates.unwrap()[0].operation, "archive");
}

#[test]
fn reasoning_markup_is_stripped_before_parsing() {
    let raw = "<think>I should search first.</think>{\"tool_calls\": []}";
    assert_eq!(strip_reasoning_markup(raw), "{\"tool_calls\": []}");

    let unopened = "mid-trace text</think>after";
    assert_eq!(strip_reasoning_markup(unopened), "after");

    let untouched = "{\"tool_calls\": []}";
    assert_eq!(strip_reasoning_markup(untouched), untouched);
}
