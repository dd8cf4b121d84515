//! Keyspace implementation
//!
//! BTreeMap-backed store with used-memory accounting.

use std::collections::BTreeMap;

use bytes::Bytes;

use super::{KeyType, Value};

/// In-memory keyspace
#[derive(Debug, Default)]
pub struct Keyspace {
    data: BTreeMap<Vec<u8>, Value>,

    /// Sum of key and value bytes currently stored
    used_memory: usize,
}

impl Keyspace {
    /// Create a new empty keyspace
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value stored at a key
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.data.get(key)
    }

    /// Type of the value at a key, `Empty` when absent
    pub fn key_type(&self, key: &[u8]) -> KeyType {
        self.data.get(key).map_or(KeyType::Empty, Value::key_type)
    }

    /// Store a string, replacing whatever the key held before
    ///
    /// Returns the new used-memory figure
    pub fn set_string(&mut self, key: &[u8], value: Bytes) -> usize {
        self.insert(key, Value::String(value))
    }

    /// Append items to the list at `key`, creating it when absent
    ///
    /// Returns the new list length, or `None` if the key holds a non-list value
    pub fn push_list(&mut self, key: &[u8], items: impl IntoIterator<Item = Bytes>) -> Option<usize> {
        match self.data.get_mut(key) {
            Some(Value::List(list)) => {
                for item in items {
                    self.used_memory += item.len();
                    list.push(item);
                }
                Some(list.len())
            }
            Some(_) => None,
            None => {
                let list: Vec<Bytes> = items.into_iter().collect();
                let len = list.len();
                self.insert(key, Value::List(list));
                Some(len)
            }
        }
    }

    /// Remove a key, returning its value if present
    pub fn remove(&mut self, key: &[u8]) -> Option<Value> {
        let removed = self.data.remove(key);
        if let Some(value) = &removed {
            self.used_memory -= key.len() + value.footprint();
        }
        removed
    }

    /// Get approximate used memory in bytes
    pub fn used_memory(&self) -> usize {
        self.used_memory
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the keyspace holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sorted copy of every entry
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Value)> {
        self.data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.data.clear();
        self.used_memory = 0;
    }

    fn insert(&mut self, key: &[u8], value: Value) -> usize {
        let added = value.footprint();
        match self.data.insert(key.to_vec(), value) {
            Some(old) => {
                self.used_memory = self.used_memory - old.footprint() + added;
            }
            None => {
                self.used_memory += key.len() + added;
            }
        }
        self.used_memory
    }
}
