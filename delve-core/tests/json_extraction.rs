use delve_core::{extract_json_values, extract_largest_json, DelveError};
use serde_json::json;

#[test]
fn extraction_prefers_the_largest_value() {
    let text = r#"blah {"a":1} more {"a":1,"b":2} tail"#;
    let value = extract_largest_json(text).unwrap();
    assert_eq!(value, json!({"a": 1, "b": 2}));
}

#[test]
fn extraction_fails_without_json() {
    let err = extract_largest_json("no json here").unwrap_err();
    assert!(matches!(err, DelveError::NoJsonFound));
}

#[test]
fn extraction_skips_broken_fragments() {
    let text = r#"{"broken": } then {"ok": true} and [1, 2, 3"#;
    let values = extract_json_values(text);
    assert_eq!(values, vec![json!({"ok": true})]);
}

#[test]
fn extraction_sees_through_markdown_fences() {
    let text = "Here is the plan:\n```json\n{\"tool_calls\": [], \"status_update\": \"DONE\"}\n```\nthanks";
    let value = extract_largest_json(text).unwrap();
    assert_eq!(value["status_update"], "DONE");
}

#[test]
fn extraction_collects_arrays_and_objects() {
    let text = r#"[1,2] separator {"k":"v"}"#;
    let values = extract_json_values(text);
    assert_eq!(values, vec![json!([1, 2]), json!({"k": "v"})]);
}

#[test]
fn extraction_handles_nested_payloads() {
    let text = r#"prose {"memory_updates":[{"operation":"add","content":"x"}],"tool_calls":[{"tool":"search","input":"q"}]} prose"#;
    let value = extract_largest_json(text).unwrap();
    assert_eq!(value["tool_calls"][0]["tool"], "search");
}
