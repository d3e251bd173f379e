use crate::{JsonFileStore, MacroStore};

use serde_json::json;

/// WHAT: Reading a never-written store yields None, not an error
/// WHY: First launch has no persisted macros
#[test]
#[allow(clippy::unwrap_used)]
fn given_absent_file_when_reading_then_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("SavedMacros.json"));

    assert!(store.read().unwrap().is_none());
}

/// WHAT: A written value reads back identically
/// WHY: The store is the durability boundary for built macros
#[test]
#[allow(clippy::unwrap_used)]
fn given_written_value_when_reading_then_identical() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("SavedMacros.json"));

    let value = json!([{ "name": "Test", "id": "AnyMacro_Test", "executeList": ["A"] }]);
    store.write(&value).unwrap();

    assert_eq!(store.read().unwrap().unwrap(), value);
}

/// WHAT: A rewrite fully replaces previous contents
/// WHY: Saves are wholesale, never partial or appended
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_contents_when_rewriting_then_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("SavedMacros.json"));

    store.write(&json!([{ "name": "Old", "id": "AnyMacro_Old", "executeList": ["A"] }]))
        .unwrap();
    let replacement = json!([]);
    store.write(&replacement).unwrap();

    assert_eq!(store.read().unwrap().unwrap(), replacement);
}

/// WHAT: Missing parent directories are created on first write
/// WHY: The data directory may not exist on a fresh machine
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_parent_directory_when_writing_then_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("macros").join("SavedMacros.json");
    let mut store = JsonFileStore::new(&nested);

    store.write(&json!([])).unwrap();

    assert!(nested.exists());
}
