//! Host Module
//!
//! The in-process server that owns the keyspace and dispatches commands to
//! registered handlers.
//!
//! ## Responsibilities
//! - Load modules (and its own built-in table) into the registry
//! - Route each argv to the registered handler
//! - Reject `deny-oom` commands while over `maxmemory`
//! - Serialize invocations so each handler sees the keyspace exclusively
//! - Answer host-level introspection (`MODULE LIST`, `COMMAND ...`)

mod builtin;

pub use builtin::CORE_MODULE;

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};

use crate::api::{Context, LoadedModule, ModuleSpec, RegisteredCommand, Registry, Reply};
use crate::config::Config;
use crate::error::{Result, OOM_REJECT_MESSAGE};
use crate::keyspace::{Keyspace, Value};
use crate::modules::{counter, greet};
use crate::protocol;

/// The command host
///
/// ## Concurrency Model
///
/// One `Mutex` guards the whole keyspace and is held for a full handler
/// invocation, so read-modify-write sequences inside a handler are never
/// interleaved with another command. Handlers themselves take no locks.
///
/// The registry sits behind an `RwLock`: dispatch takes a short read lock to
/// copy the command out, loading a module takes the write lock.
pub struct Host {
    /// Host configuration
    config: Config,

    /// All stored data
    keyspace: Mutex<Keyspace>,

    /// Loaded modules and their commands
    registry: RwLock<Registry>,
}

impl Host {
    /// Create a host and load the modules enabled in `config`
    ///
    /// Startup:
    /// 1. Register the built-in command table
    /// 2. Load the counter module (if enabled)
    /// 3. Load the greeting module (if enabled)
    pub fn open(config: Config) -> Result<Self> {
        let host = Self::bare(config);

        if host.config.load_counter {
            host.load_module(&counter::MODULE, &[])?;
        }
        if host.config.load_greet {
            host.load_module(&greet::MODULE, &[])?;
        }

        Ok(host)
    }

    /// Create a host with only the built-in commands
    pub fn bare(config: Config) -> Self {
        let mut registry = Registry::new();
        // The built-in table is static and known to be well-formed
        if let Err(e) = registry.load(&builtin::CORE, &[]) {
            tracing::error!(error = %e, "built-in command table rejected");
        }

        Self {
            config,
            keyspace: Mutex::new(Keyspace::new()),
            registry: RwLock::new(registry),
        }
    }

    /// Load a module; on failure nothing from it is registered
    pub fn load_module(&self, spec: &ModuleSpec, args: &[Bytes]) -> Result<()> {
        let result = self.registry.write().load(spec, args);
        if let Err(ref e) = result {
            tracing::warn!(module = spec.name, error = %e, "module load aborted");
        }
        result
    }

    /// Execute one command and produce its reply
    ///
    /// Errors never escape as `Err`: every failure becomes an error reply.
    pub fn execute(&self, argv: &[Bytes]) -> Reply {
        let Some(name) = argv.first() else {
            return Reply::error("ERR empty command");
        };

        if name.eq_ignore_ascii_case(b"module") {
            return self.module_command(argv);
        }
        if name.eq_ignore_ascii_case(b"command") {
            return self.command_command(argv);
        }

        let command = match self.lookup(name) {
            Some(command) => command,
            None => {
                return Reply::error(format!(
                    "ERR unknown command '{}'",
                    String::from_utf8_lossy(name)
                ))
            }
        };

        tracing::trace!(command = %command.name, argc = argv.len(), "dispatching");

        let mut keyspace = self.keyspace.lock();

        if command.flags.deny_oom && self.config.is_over_maxmemory(keyspace.used_memory()) {
            tracing::debug!(command = %command.name, used = keyspace.used_memory(), "rejected by deny-oom");
            return Reply::error(OOM_REJECT_MESSAGE);
        }

        let mut ctx = Context::new(&mut *keyspace, &self.config);
        let result = (command.handler())(&mut ctx, argv);

        if ctx.open_handles() != 0 {
            tracing::warn!(command = %command.name, open = ctx.open_handles(), "handler returned with open key handles");
        }

        match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!(command = %command.name, error = %e, "command failed");
                e.into()
            }
        }
    }

    /// Parse an inline request line and execute it
    ///
    /// Returns `Ok(None)` for a blank line.
    pub fn execute_inline(&self, line: &str) -> Result<Option<Reply>> {
        let argv = protocol::parse_inline(line)?;
        if argv.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.execute(&argv)))
    }

    /// `MODULE LIST`
    fn module_command(&self, argv: &[Bytes]) -> Reply {
        if argv.len() != 2 {
            return Reply::error("ERR wrong number of arguments for 'module' command");
        }
        if !argv[1].eq_ignore_ascii_case(b"list") {
            return Reply::error(format!(
                "ERR unknown subcommand '{}'",
                String::from_utf8_lossy(&argv[1])
            ));
        }

        let entries = self
            .modules()
            .into_iter()
            .map(|m| {
                Reply::Array(vec![
                    Reply::bulk("name"),
                    Reply::bulk(m.name),
                    Reply::bulk("ver"),
                    Reply::Integer(i64::from(m.version)),
                ])
            })
            .collect();
        Reply::Array(entries)
    }

    /// `COMMAND COUNT` and `COMMAND GETKEYS <command> [args ...]`
    fn command_command(&self, argv: &[Bytes]) -> Reply {
        let Some(sub) = argv.get(1) else {
            return Reply::error("ERR wrong number of arguments for 'command' command");
        };

        if sub.eq_ignore_ascii_case(b"count") {
            return Reply::Integer(self.registry.read().command_count() as i64);
        }
        if !sub.eq_ignore_ascii_case(b"getkeys") {
            return Reply::error(format!(
                "ERR unknown subcommand '{}'",
                String::from_utf8_lossy(sub)
            ));
        }

        let target = &argv[2..];
        let Some(name) = target.first() else {
            return Reply::error("ERR wrong number of arguments for 'command|getkeys' command");
        };
        let Some(command) = self.lookup(name) else {
            return Reply::error("ERR Invalid command specified");
        };

        let keys = command.keys.keys(target);
        if keys.is_empty() {
            return Reply::error("ERR The command has no key arguments");
        }
        Reply::Array(keys.into_iter().map(|k| Reply::Bulk(Some(k))).collect())
    }

    fn lookup(&self, name: &[u8]) -> Option<RegisteredCommand> {
        self.registry.read().lookup(name).cloned()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Loaded modules, excluding the built-in table
    pub fn modules(&self) -> Vec<LoadedModule> {
        self.registry
            .read()
            .modules()
            .iter()
            .filter(|m| m.name != CORE_MODULE)
            .cloned()
            .collect()
    }

    /// Value currently stored at a key
    pub fn value(&self, key: &[u8]) -> Option<Value> {
        self.keyspace.lock().get(key).cloned()
    }

    /// Sorted copy of the keyspace
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Value)> {
        self.keyspace.lock().snapshot()
    }

    /// Approximate used memory in bytes
    pub fn used_memory(&self) -> usize {
        self.keyspace.lock().used_memory()
    }

    /// Number of keys
    pub fn db_size(&self) -> usize {
        self.keyspace.lock().len()
    }

    /// Remove every key
    pub fn flush_all(&self) {
        self.keyspace.lock().clear();
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("config", &self.config)
            .field("modules", &self.modules())
            .finish()
    }
}
