//! Command registry
//!
//! Holds every loaded module and the commands it exported. Loading is
//! staged: a module's commands become visible only once all of them have
//! registered successfully.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

use super::command::{CommandFlags, CommandHandler, CommandSpec, KeyRange, ModuleSpec};
use crate::error::{KvError, Result};

/// A command as the dispatcher sees it
#[derive(Clone)]
pub struct RegisteredCommand {
    /// Lowercased command name
    pub name: String,

    /// Owning module
    pub module: String,

    pub flags: CommandFlags,
    pub keys: KeyRange,
    pub(crate) handler: CommandHandler,
}

impl RegisteredCommand {
    /// Handler to invoke for this command
    pub fn handler(&self) -> CommandHandler {
        self.handler
    }
}

impl fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("flags", &self.flags)
            .field("keys", &self.keys)
            .finish()
    }
}

/// Name and version of a loaded module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    pub name: String,
    pub version: u32,
}

/// All registered modules and commands
#[derive(Debug, Default)]
pub struct Registry {
    modules: Vec<LoadedModule>,
    commands: HashMap<String, RegisteredCommand>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a module from its descriptor
    ///
    /// Steps:
    /// 1. Init: claim the module name and version
    /// 2. Register each command in table order
    /// 3. Commit everything, or nothing if any step failed
    ///
    /// Load arguments are logged and otherwise ignored.
    pub fn load(&mut self, spec: &ModuleSpec, args: &[Bytes]) -> Result<()> {
        if !args.is_empty() {
            tracing::debug!(module = spec.name, argc = args.len(), "ignoring module load arguments");
        }

        let mut staged = self.init(spec.name, spec.version)?;
        for command in spec.commands {
            staged.create_command(self, command)?;
        }

        let count = staged.commands.len();
        self.modules.push(staged.module);
        for command in staged.commands {
            self.commands.insert(command.name.clone(), command);
        }

        tracing::info!(module = spec.name, version = spec.version, commands = count, "module loaded");
        Ok(())
    }

    /// Look up a command by name, case-insensitively
    pub fn lookup(&self, name: &[u8]) -> Option<&RegisteredCommand> {
        let name = String::from_utf8_lossy(name).to_ascii_lowercase();
        self.commands.get(&name)
    }

    /// Loaded modules in load order
    pub fn modules(&self) -> &[LoadedModule] {
        &self.modules
    }

    /// Check whether a module is loaded
    pub fn is_loaded(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Number of registered commands
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    fn init(&self, name: &str, version: u32) -> Result<StagedModule> {
        if name.is_empty() {
            return Err(KvError::ModuleInit("module name is empty".to_string()));
        }
        if self.is_loaded(name) {
            return Err(KvError::ModuleInit(format!(
                "module '{}' is already loaded",
                name
            )));
        }
        Ok(StagedModule {
            module: LoadedModule {
                name: name.to_string(),
                version,
            },
            commands: Vec::new(),
        })
    }
}

/// A module whose commands are being registered
struct StagedModule {
    module: LoadedModule,
    commands: Vec<RegisteredCommand>,
}

impl StagedModule {
    fn create_command(&mut self, registry: &Registry, spec: &CommandSpec) -> Result<()> {
        let name = spec.name.to_ascii_lowercase();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(KvError::Registration(format!(
                "invalid command name '{}'",
                spec.name
            )));
        }
        if registry.commands.contains_key(&name) || self.commands.iter().any(|c| c.name == name) {
            return Err(KvError::Registration(format!(
                "command '{}' is already registered",
                name
            )));
        }

        let flags: CommandFlags = spec.flags.parse()?;
        let keys = KeyRange::new(spec.first_key, spec.last_key, spec.key_step)?;

        tracing::debug!(module = %self.module.name, command = %name, flags = spec.flags, "command registered");

        self.commands.push(RegisteredCommand {
            name,
            module: self.module.name.clone(),
            flags,
            keys,
            handler: spec.handler,
        });
        Ok(())
    }
}
