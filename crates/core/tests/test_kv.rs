//! Integration tests for KeyValueStore implementations
//!
//! Shared behaviour runs against MemoryKv and FileKv.

use pantry_core::kv::{load_json, save_json, FileKv, KeyValueStore, MemoryKv};

fn create_stores(dir: &std::path::Path) -> Vec<(&'static str, Box<dyn KeyValueStore>)> {
    vec![
        ("memory", Box::new(MemoryKv::new())),
        ("file", Box::new(FileKv::open(dir.join("state.json")))),
    ]
}

#[test]
fn set_get_remove_all_stores() {
    let tmp = tempfile::tempdir().unwrap();
    for (name, store) in create_stores(tmp.path()) {
        assert!(store.get("k").unwrap().is_none(), "{name}");
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"), "{name}");
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none(), "{name}");
    }
}

#[test]
fn json_helpers_all_stores() {
    let tmp = tempfile::tempdir().unwrap();
    for (name, store) in create_stores(tmp.path()) {
        save_json(store.as_ref(), "list", &vec![1, 2, 3]).unwrap();
        let back: Option<Vec<i32>> = load_json(store.as_ref(), "list");
        assert_eq!(back, Some(vec![1, 2, 3]), "{name}");

        store.set("broken", "{not json").unwrap();
        let broken: Option<Vec<i32>> = load_json(store.as_ref(), "broken");
        assert!(broken.is_none(), "{name}");
    }
}

#[test]
fn file_store_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("state.json");

    {
        let kv = FileKv::open(&path);
        kv.set("hasPremium", "true").unwrap();
        kv.set("selectedLanguage", "kk").unwrap();
    }

    let kv = FileKv::open(&path);
    assert_eq!(kv.get("hasPremium").unwrap().as_deref(), Some("true"));
    assert_eq!(kv.get("selectedLanguage").unwrap().as_deref(), Some("kk"));
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn file_store_writes_plain_json_object() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("state.json");
    let kv = FileKv::open(&path);
    kv.set("hasPremium", "true").unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["hasPremium"], "true");
}

#[test]
fn corrupt_file_opens_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("state.json");
    std::fs::write(&path, "}}} garbage").unwrap();

    let kv = FileKv::open(&path);
    assert!(kv.get("hasPremium").unwrap().is_none());

    kv.set("hasPremium", "true").unwrap();
    assert_eq!(
        FileKv::open(&path).get("hasPremium").unwrap().as_deref(),
        Some("true")
    );
}

#[test]
fn remove_on_missing_file_does_not_create_it() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("state.json");
    let kv = FileKv::open(&path);

    kv.remove("hasPremium").unwrap();
    assert!(!path.exists());
}
