//! Keyspace Tests
//!
//! Tests verify:
//! - Basic set/get/remove operations
//! - Type reporting
//! - List creation and appends
//! - Used-memory accounting
//! - Sorted snapshots and clear

use bytes::Bytes;
use modkv::keyspace::{KeyType, Keyspace, Value};

fn b(s: &str) -> Bytes {
    Bytes::from(s.to_string())
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_keyspace_is_empty() {
    let keyspace = Keyspace::new();
    assert_eq!(keyspace.len(), 0);
    assert_eq!(keyspace.used_memory(), 0);
    assert!(keyspace.is_empty());
}

#[test]
fn test_set_and_get() {
    let mut keyspace = Keyspace::new();

    keyspace.set_string(b"key1", b("value1"));

    assert_eq!(keyspace.get(b"key1"), Some(&Value::String(b("value1"))));
    assert_eq!(keyspace.get(b"missing"), None);
}

#[test]
fn test_set_overwrites_any_type() {
    let mut keyspace = Keyspace::new();

    keyspace.push_list(b"key", vec![b("a")]);
    keyspace.set_string(b"key", b("plain"));

    assert_eq!(keyspace.key_type(b"key"), KeyType::String);
    assert_eq!(keyspace.len(), 1);
}

#[test]
fn test_remove() {
    let mut keyspace = Keyspace::new();

    keyspace.set_string(b"key", b("value"));

    assert_eq!(keyspace.remove(b"key"), Some(Value::String(b("value"))));
    assert_eq!(keyspace.remove(b"key"), None);
    assert!(keyspace.is_empty());
}

// =============================================================================
// Type Tests
// =============================================================================

#[test]
fn test_key_types() {
    let mut keyspace = Keyspace::new();

    keyspace.set_string(b"s", b("1"));
    keyspace.push_list(b"l", vec![b("x")]);

    assert_eq!(keyspace.key_type(b"s"), KeyType::String);
    assert_eq!(keyspace.key_type(b"l"), KeyType::List);
    assert_eq!(keyspace.key_type(b"none"), KeyType::Empty);
    assert_eq!(KeyType::Empty.as_str(), "none");
}

#[test]
fn test_push_list_appends() {
    let mut keyspace = Keyspace::new();

    assert_eq!(keyspace.push_list(b"l", vec![b("a"), b("b")]), Some(2));
    assert_eq!(keyspace.push_list(b"l", vec![b("c")]), Some(3));
    assert_eq!(
        keyspace.get(b"l"),
        Some(&Value::List(vec![b("a"), b("b"), b("c")]))
    );
}

#[test]
fn test_push_list_refuses_string() {
    let mut keyspace = Keyspace::new();

    keyspace.set_string(b"s", b("1"));

    assert_eq!(keyspace.push_list(b"s", vec![b("a")]), None);
    assert_eq!(keyspace.get(b"s"), Some(&Value::String(b("1"))));
}

// =============================================================================
// Size Tracking Tests
// =============================================================================

#[test]
fn test_used_memory_tracks_sets() {
    let mut keyspace = Keyspace::new();

    keyspace.set_string(b"key", b("value"));
    assert_eq!(keyspace.used_memory(), b"key".len() + b"value".len());

    keyspace.set_string(b"key", b("much_longer_value"));
    assert_eq!(
        keyspace.used_memory(),
        b"key".len() + b"much_longer_value".len()
    );
}

#[test]
fn test_used_memory_tracks_lists_and_removes() {
    let mut keyspace = Keyspace::new();

    keyspace.push_list(b"l", vec![b("ab")]);
    keyspace.push_list(b"l", vec![b("cde")]);
    assert_eq!(keyspace.used_memory(), 1 + 2 + 3);

    keyspace.remove(b"l");
    assert_eq!(keyspace.used_memory(), 0);
}

// =============================================================================
// Snapshot / Clear Tests
// =============================================================================

#[test]
fn test_snapshot_sorted_order() {
    let mut keyspace = Keyspace::new();

    keyspace.set_string(b"cherry", b("3"));
    keyspace.set_string(b"apple", b("1"));
    keyspace.set_string(b"banana", b("2"));

    let entries = keyspace.snapshot();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].0, b"apple");
    assert_eq!(entries[1].0, b"banana");
    assert_eq!(entries[2].0, b"cherry");
}

#[test]
fn test_clear() {
    let mut keyspace = Keyspace::new();

    keyspace.set_string(b"key1", b("value1"));
    keyspace.push_list(b"key2", vec![b("value2")]);

    keyspace.clear();

    assert!(keyspace.is_empty());
    assert_eq!(keyspace.used_memory(), 0);
    assert_eq!(keyspace.get(b"key1"), None);
}
