use delve_agent::Workspace;
use delve_core::BlockOp;

#[test]
fn empty_workspace_renders_the_exact_placeholder_shape() {
    let workspace = Workspace::new();
    assert_eq!(
        workspace.to_text(),
        "Status: IN_PROGRESS\nMemory: \n... no memory blocks ...\n"
    );
}

#[test]
fn blocks_render_as_tagged_lines() {
    let mut workspace = Workspace::new();
    workspace.restore_block("xyz-999", "hello");
    assert_eq!(
        workspace.to_text(),
        "Status: IN_PROGRESS\nMemory: \n<xyz-999>hello</xyz-999>\n"
    );
}

#[test]
fn generated_ids_are_unique_and_well_formed() {
    let mut workspace = Workspace::new();
    let ops: Vec<BlockOp> = (0..200).map(|i| BlockOp::add(format!("fact {i}"))).collect();
    workspace.update(None, &ops, None);

    let blocks = workspace.blocks();
    assert_eq!(blocks.len(), 200);
    for id in blocks.keys() {
        let bytes = id.as_bytes();
        assert_eq!(bytes.len(), 7, "unexpected id shape: {id}");
        assert!(bytes[..3].iter().all(u8::is_ascii_lowercase));
        assert_eq!(bytes[3], b'-');
        assert!(bytes[4..].iter().all(u8::is_ascii_digit));
    }
}

#[test]
fn deleting_an_unknown_id_is_a_no_op() {
    let mut workspace = Workspace::new();
    workspace.restore_block("abc-123", "keep me");
    let before = workspace.to_text();

    workspace.update(None, &[BlockOp::delete("zzz-000")], None);
    assert_eq!(workspace.to_text(), before);
}

#[test]
fn delete_removes_an_existing_block() {
    let mut workspace = Workspace::new();
    workspace.restore_block("abc-123", "stale lead");
    workspace.update(None, &[BlockOp::delete("abc-123")], None);
    assert!(workspace.is_empty());
}

#[test]
fn add_defaults_missing_content_to_empty() {
    let mut workspace = Workspace::new();
    let op = BlockOp {
        operation: "add".to_string(),
        content: None,
        id: None,
    };
    workspace.update(None, &[op], None);
    assert_eq!(workspace.blocks().values().next().map(String::as_str), Some(""));
}

#[test]
fn unrecognized_operations_are_ignored() {
    let mut workspace = Workspace::new();
    let op = BlockOp {
        operation: "archive".to_string(),
        content: Some("whatever".to_string()),
        id: Some("abc-123".to_string()),
    };
    workspace.update(None, &[op], None);
    assert!(workspace.is_empty());
}

#[test]
fn status_defaults_to_in_progress_when_absent() {
    let mut workspace = Workspace::new();
    workspace.update(Some("DONE"), &[], None);
    assert!(workspace.is_done());

    workspace.update(None, &[], None);
    assert!(!workspace.is_done());
    assert_eq!(workspace.status(), "IN_PROGRESS");
}

#[test]
fn any_non_in_progress_status_counts_as_done() {
    let mut workspace = Workspace::new();
    workspace.update(Some("COMPLETE"), &[], None);
    assert!(workspace.is_done());
    assert_eq!(workspace.status(), "COMPLETE");
}

#[test]
fn answer_persists_until_overwritten() {
    let mut workspace = Workspace::new();
    assert_eq!(workspace.answer(), None);

    workspace.update(None, &[], Some("first draft"));
    workspace.update(None, &[], None);
    assert_eq!(workspace.answer(), Some("first draft"));

    workspace.update(Some("DONE"), &[], Some("final answer"));
    assert_eq!(workspace.answer(), Some("final answer"));
}

#[test]
fn workspace_round_trips_through_serde() {
    let mut workspace = Workspace::new();
    workspace.restore_block("abc-123", "a fact");
    workspace.update(Some("DONE"), &[], Some("the answer"));

    let json = serde_json::to_string(&workspace).unwrap();
    let rehydrated: Workspace = serde_json::from_str(&json).unwrap();
    assert_eq!(rehydrated, workspace);
    assert_eq!(rehydrated.to_text(), workspace.to_text());
}
