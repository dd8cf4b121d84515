//! Configuration for modkv
//!
//! Centralized host configuration with sensible defaults.

use crate::error::{KvError, Result};

/// 512 MiB, the host's default ceiling for keys, values and single allocations
const DEFAULT_LIMIT: usize = 512 * 1024 * 1024;

/// Main configuration for a modkv host
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Memory Configuration
    // -------------------------------------------------------------------------
    /// Used-memory ceiling in bytes; `deny-oom` commands are rejected once the
    /// keyspace reaches it. 0 disables the check.
    pub maxmemory: usize,

    /// Largest single buffer a module may allocate through its context
    pub max_alloc: usize,

    // -------------------------------------------------------------------------
    // Keyspace Configuration
    // -------------------------------------------------------------------------
    /// Longest key name that can be opened
    pub max_key_len: usize,

    /// Longest string value that can be stored
    pub max_value_len: usize,

    // -------------------------------------------------------------------------
    // Module Configuration
    // -------------------------------------------------------------------------
    /// Load the counter module at startup
    pub load_counter: bool,

    /// Load the greeting module at startup
    pub load_greet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            maxmemory: 0,
            max_alloc: DEFAULT_LIMIT,
            max_key_len: DEFAULT_LIMIT,
            max_value_len: DEFAULT_LIMIT,
            load_counter: true,
            load_greet: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// True when the used-memory ceiling is enabled and reached
    pub fn is_over_maxmemory(&self, used: usize) -> bool {
        self.maxmemory > 0 && used >= self.maxmemory
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the used-memory ceiling (in bytes, 0 = unlimited)
    pub fn maxmemory(mut self, bytes: usize) -> Self {
        self.config.maxmemory = bytes;
        self
    }

    /// Set the largest allowed module allocation (in bytes)
    pub fn max_alloc(mut self, bytes: usize) -> Self {
        self.config.max_alloc = bytes;
        self
    }

    /// Set the longest allowed key name (in bytes)
    pub fn max_key_len(mut self, bytes: usize) -> Self {
        self.config.max_key_len = bytes;
        self
    }

    /// Set the longest allowed string value (in bytes)
    pub fn max_value_len(mut self, bytes: usize) -> Self {
        self.config.max_value_len = bytes;
        self
    }

    /// Load (or skip) the counter module
    pub fn load_counter(mut self, load: bool) -> Self {
        self.config.load_counter = load;
        self
    }

    /// Load (or skip) the greeting module
    pub fn load_greet(mut self, load: bool) -> Self {
        self.config.load_greet = load;
        self
    }

    /// Validate and produce the config
    pub fn build(self) -> Result<Config> {
        let c = &self.config;
        if c.max_alloc == 0 {
            return Err(KvError::Config("max_alloc must be greater than 0".into()));
        }
        if c.max_key_len == 0 {
            return Err(KvError::Config("max_key_len must be greater than 0".into()));
        }
        if c.max_value_len == 0 {
            return Err(KvError::Config("max_value_len must be greater than 0".into()));
        }
        Ok(self.config)
    }
}
