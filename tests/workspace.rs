//! Tree catalog: selection, creation, deletion, import and export.

use chrono::{TimeZone, Utc};
use tree_explorer::storage::{TreeDocument, SELECTED_TREE_KEY, TREE_KEY_PREFIX};
use tree_explorer::{
    Config, Event, JsonFileStore, KeyValueStore, MemoryStore, NodeId, TreeError, Workspace,
};

fn config() -> Config {
    Config {
        viewport_width: 500.0,
        viewport_height: 500.0,
        ..Default::default()
    }
}

fn open() -> Workspace<MemoryStore> {
    Workspace::open(MemoryStore::new(), &config()).unwrap()
}

const PLANS: &str = r#"{"version":"1","history":[
    {"action":"add","item":{"id":"root","text":"Spring plans","sizeIndicator":3}},
    {"action":"add","item":{"id":"a","parentId":"root","text":"Garden","sizeIndicator":"2"}}
]}"#;

#[test]
fn opening_an_empty_store_creates_and_selects_one_tree() {
    let workspace = open();

    let trees = workspace.trees().unwrap();
    assert_eq!(trees.len(), 1);
    assert!(trees[0].selected);
    assert_eq!(trees[0].title, "New");
    assert!(trees[0].storage_key.starts_with(TREE_KEY_PREFIX));
    assert_eq!(
        workspace.store().get(SELECTED_TREE_KEY).unwrap().as_deref(),
        Some(workspace.selected_key())
    );
}

#[test]
fn new_select_and_delete_trees() {
    let mut workspace = open();
    let first = workspace.selected_key().to_string();

    let second = workspace.new_tree().unwrap();
    assert_ne!(first, second);
    assert_eq!(workspace.selected_key(), second);
    assert_eq!(workspace.trees().unwrap().len(), 2);

    workspace.select_tree(&first).unwrap();
    assert_eq!(workspace.selected_key(), first);
    let selected: Vec<bool> = workspace.trees().unwrap().iter().map(|t| t.selected).collect();
    assert_eq!(selected.iter().filter(|s| **s).count(), 1);

    workspace.delete_current_tree().unwrap();
    assert_eq!(workspace.selected_key(), second);
    assert!(workspace.store().get(&first).unwrap().is_none());
}

#[test]
fn deleting_the_last_tree_creates_a_fresh_one() {
    let mut workspace = open();
    workspace.dispatch(&Event::Click { x: 391.42, y: 108.58 }).unwrap();
    assert_eq!(workspace.session().store().table().len(), 2);

    workspace.delete_current_tree().unwrap();

    let trees = workspace.trees().unwrap();
    assert_eq!(trees.len(), 1);
    assert!(trees[0].selected);
    assert_eq!(workspace.session().store().table().len(), 1);
}

#[test]
fn selecting_an_unknown_tree_changes_nothing() {
    let mut workspace = open();
    let selected = workspace.selected_key().to_string();

    assert!(workspace.select_tree("te_tree_missing").is_err());
    assert!(workspace.select_tree("settings").is_err());
    assert_eq!(workspace.selected_key(), selected);
}

#[test]
fn invalid_json_import_leaves_the_selected_tree_alone() {
    let mut workspace = open();
    workspace.dispatch(&Event::Click { x: 391.42, y: 108.58 }).unwrap();
    let key = workspace.selected_key().to_string();
    let stored = workspace.store().get(&key).unwrap();

    let err = workspace
        .import("te_tree_1__x.json", "{\"version\": \"1\", \"history\": [", false)
        .unwrap_err();

    assert!(matches!(err, TreeError::Import(_)));
    assert_eq!(workspace.selected_key(), key);
    assert_eq!(workspace.store().get(&key).unwrap(), stored);
    assert!(workspace.store().get("te_tree_1").unwrap().is_none());
    assert_eq!(workspace.session().store().table().len(), 2);
}

#[test]
fn import_rejects_bad_documents() {
    let mut workspace = open();

    let cases = [
        ("plans.txt", PLANS),
        ("plans.json", r#"{"history":[{"action":"rename","item":{"id":"x"}}]}"#),
        ("plans.json", r#"{"version":"1","history":[]}"#),
        (
            "plans.json",
            r#"{"history":[{"action":"add","item":{"id":"a","parentId":"ghost","text":"x","sizeIndicator":3}}]}"#,
        ),
    ];
    for (file_name, content) in cases {
        let result = workspace.import(file_name, content, false);
        assert!(
            matches!(result, Err(TreeError::Import(_))),
            "{file_name}: {content} gave {result:?}"
        );
    }
    assert_eq!(workspace.trees().unwrap().len(), 1);
}

#[test]
fn import_uses_the_key_prefix_of_the_file_name() {
    let mut workspace = open();

    let key = workspace
        .import("te_tree_20240101000000000__Spring_plans__2024_01_01.json", PLANS, false)
        .unwrap();

    assert_eq!(key, "te_tree_20240101000000000");
    assert_eq!(workspace.selected_key(), key);
    let garden = workspace.session().store().node(&NodeId::from("a")).cloned().unwrap();
    assert_eq!(garden.text, "Garden");

    // Stored compactly.
    let stored = workspace.store().get(&key).unwrap().unwrap();
    assert!(!stored.contains('\n'));
    assert_eq!(TreeDocument::from_json(&stored).unwrap().history.len(), 2);
}

#[test]
fn import_without_a_tree_key_gets_a_fresh_one() {
    let mut workspace = open();

    let key = workspace.import("Spring plans.json", PLANS, false).unwrap();

    assert!(key.starts_with(TREE_KEY_PREFIX));
    assert_eq!(workspace.trees().unwrap().len(), 2);
}

#[test]
fn import_over_an_existing_tree_needs_overwrite() {
    let mut workspace = open();
    workspace.import("te_tree_7__a.json", PLANS, false).unwrap();

    let err = workspace.import("te_tree_7__b.json", PLANS, false).unwrap_err();
    assert!(matches!(err, TreeError::Import(_)));

    assert_eq!(workspace.import("te_tree_7__b.json", PLANS, true).unwrap(), "te_tree_7");
}

#[test]
fn export_names_the_file_after_key_title_and_time() {
    let mut workspace = open();
    let key = workspace.import("te_tree_5__x.json", PLANS, false).unwrap();
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();

    let exported = workspace.export_at(at).unwrap();

    assert_eq!(
        exported.file_name,
        format!("{key}__Spring_plans__2024_03_09_07_05_01_000.json")
    );
    assert_eq!(exported.json, workspace.store().get(&key).unwrap().unwrap());
}

#[test]
fn exported_trees_import_into_another_workspace() {
    let mut source = open();
    source.dispatch(&Event::Click { x: 391.42, y: 108.58 }).unwrap();
    let exported = source.export().unwrap();

    let mut target = open();
    let key = target.import(&exported.file_name, &exported.json, true).unwrap();

    assert_eq!(key, source.selected_key());
    assert_eq!(
        target.session().store().history(),
        source.session().store().history()
    );
}

#[test]
fn json_store_keeps_trees_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trees.json");

    let key = {
        let mut workspace = Workspace::open(JsonFileStore::open(&path).unwrap(), &config()).unwrap();
        workspace.dispatch(&Event::Click { x: 391.42, y: 108.58 }).unwrap();
        workspace.selected_key().to_string()
    };

    let workspace = Workspace::open(JsonFileStore::open(&path).unwrap(), &config()).unwrap();
    assert_eq!(workspace.selected_key(), key);
    assert_eq!(workspace.session().store().table().len(), 2);
}

#[test]
fn resize_events_carry_over_to_trees_opened_later() {
    let mut workspace = open();
    let first = workspace.selected_key().to_string();

    workspace
        .dispatch(&Event::Resize {
            width: 1000.0,
            height: 1000.0,
        })
        .unwrap();
    assert!((workspace.session().viewport().width - 1000.0).abs() < f64::EPSILON);

    workspace.new_tree().unwrap();
    assert!((workspace.session().viewport().width - 1000.0).abs() < f64::EPSILON);
    assert!((workspace.session().viewport().height - 1000.0).abs() < f64::EPSILON);
    assert!((workspace.session().camera().zoom - 2.0).abs() < f64::EPSILON);

    workspace.select_tree(&first).unwrap();
    let root = workspace.session().store().root().cloned().unwrap();
    let layout = workspace.session_mut().node_layout(&root).unwrap();
    assert!((layout.x - 500.0).abs() < f64::EPSILON);
    assert!((layout.y - 500.0).abs() < f64::EPSILON);

    workspace.import("te_tree_9__a.json", PLANS, false).unwrap();
    assert!((workspace.session().viewport().width - 1000.0).abs() < f64::EPSILON);
}
