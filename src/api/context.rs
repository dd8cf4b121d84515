//! Invocation context and key handles
//!
//! The capability surface a module sees while one of its commands runs.

use std::cell::Cell;

use bytes::Bytes;

use crate::config::Config;
use crate::error::{CommandError, CommandResult, KvError, Result};
use crate::keyspace::{KeyType, Keyspace, Value};

/// Access mode requested when opening a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    ReadWrite,
}

impl OpenMode {
    pub fn is_writable(&self) -> bool {
        matches!(self, OpenMode::ReadWrite)
    }
}

/// Per-invocation view of the host
///
/// Created by the host for exactly one command call and dropped before the
/// reply is returned. The keyspace borrow is exclusive for that whole span.
pub struct Context<'a> {
    keyspace: &'a mut Keyspace,
    config: &'a Config,

    /// Handles opened and not yet released
    open_handles: Cell<usize>,
}

impl<'a> Context<'a> {
    pub fn new(keyspace: &'a mut Keyspace, config: &'a Config) -> Self {
        Self {
            keyspace,
            config,
            open_handles: Cell::new(0),
        }
    }

    /// Open a key for the rest of the handler's scope
    ///
    /// Missing keys still yield a handle whose type is `Empty`. Fails when
    /// the key name is empty or longer than `max_key_len`.
    pub fn open_key(&mut self, name: &[u8], mode: OpenMode) -> Result<KeyHandle<'_>> {
        if name.is_empty() {
            return Err(KvError::KeyAccess("empty key name".to_string()));
        }
        if name.len() > self.config.max_key_len {
            return Err(KvError::KeyAccess(format!(
                "key length {} exceeds limit {}",
                name.len(),
                self.config.max_key_len
            )));
        }

        self.open_handles.set(self.open_handles.get() + 1);
        tracing::trace!(key = %String::from_utf8_lossy(name), ?mode, "key opened");

        Ok(KeyHandle {
            keyspace: &mut *self.keyspace,
            open_handles: &self.open_handles,
            config: self.config,
            name: name.to_vec(),
            mode,
        })
    }

    /// Allocate an empty buffer with room for `len` bytes
    ///
    /// Never aborts: exceeding `max_alloc` or an allocator refusal is
    /// reported as `OutOfMemory`.
    pub fn alloc(&self, len: usize) -> CommandResult<Vec<u8>> {
        if len > self.config.max_alloc {
            tracing::debug!(len, limit = self.config.max_alloc, "allocation over limit");
            return Err(CommandError::OutOfMemory);
        }
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| CommandError::OutOfMemory)?;
        Ok(buf)
    }

    /// Number of keys in the keyspace
    pub fn db_size(&self) -> usize {
        self.keyspace.len()
    }

    /// Handles still open; zero once the handler has returned
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }
}

/// Scoped access to one key
///
/// Released on drop, so every exit path of a handler closes it exactly once.
pub struct KeyHandle<'c> {
    keyspace: &'c mut Keyspace,
    open_handles: &'c Cell<usize>,
    config: &'c Config,
    name: Vec<u8>,
    mode: OpenMode,
}

impl KeyHandle<'_> {
    /// Type of the value currently at the key
    pub fn key_type(&self) -> KeyType {
        self.keyspace.key_type(&self.name)
    }

    /// Read-only view of a string value; `None` for any other type
    pub fn string_view(&self) -> Option<&[u8]> {
        match self.keyspace.get(&self.name) {
            Some(Value::String(s)) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Replace the key's value with a string
    pub fn string_set(&mut self, value: Bytes) -> Result<()> {
        self.ensure_writable()?;
        if value.len() > self.config.max_value_len {
            return Err(KvError::WriteRejected(format!(
                "value length {} exceeds limit {}",
                value.len(),
                self.config.max_value_len
            )));
        }
        self.keyspace.set_string(&self.name, value);
        Ok(())
    }

    /// Append items to a list value, creating the list when the key is empty
    ///
    /// Returns the new length, or `None` when the key holds another type.
    pub fn list_push(&mut self, items: Vec<Bytes>) -> Result<Option<usize>> {
        self.ensure_writable()?;
        Ok(self.keyspace.push_list(&self.name, items))
    }

    /// Delete the key; returns whether anything was removed
    pub fn delete(&mut self) -> Result<bool> {
        self.ensure_writable()?;
        Ok(self.keyspace.remove(&self.name).is_some())
    }

    fn ensure_writable(&self) -> Result<()> {
        if !self.mode.is_writable() {
            return Err(KvError::WriteRejected("key opened read-only".to_string()));
        }
        Ok(())
    }
}

impl Drop for KeyHandle<'_> {
    fn drop(&mut self) {
        self.open_handles.set(self.open_handles.get() - 1);
        tracing::trace!(key = %String::from_utf8_lossy(&self.name), "key closed");
    }
}
