//! Keyspace Module
//!
//! The host's in-memory mapping from key names to typed values.
//!
//! ## Responsibilities
//! - Store string and list values by key
//! - Report the type stored at a key
//! - Track approximate used memory for `deny-oom` decisions
//! - Ordered snapshots for inspection
//!
//! ## Data Structure Choice
//! A plain BTreeMap without internal locking. The host wraps the whole
//! keyspace in one mutex so a command invocation sees it exclusively.

mod store;

pub use store::Keyspace;

use bytes::Bytes;

/// A value stored at a key
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A byte string
    String(Bytes),

    /// A list of byte strings
    List(Vec<Bytes>),
}

impl Value {
    /// The type tag of this value
    pub fn key_type(&self) -> KeyType {
        match self {
            Value::String(_) => KeyType::String,
            Value::List(_) => KeyType::List,
        }
    }

    /// Approximate memory footprint of the value payload
    pub fn footprint(&self) -> usize {
        match self {
            Value::String(s) => s.len(),
            Value::List(items) => items.iter().map(Bytes::len).sum(),
        }
    }
}

/// Type of the value found at a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// Nothing stored at the key
    Empty,

    /// A byte string
    String,

    /// A list
    List,
}

impl KeyType {
    /// Name reported by `TYPE`
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Empty => "none",
            KeyType::String => "string",
            KeyType::List => "list",
        }
    }
}
