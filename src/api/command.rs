//! Command definitions
//!
//! The declarative tables modules hand to the host at load time.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use super::{Context, Reply};
use crate::error::{CommandResult, KvError};

/// Signature every command handler implements
///
/// `argv[0]` is the command name as the caller typed it.
pub type CommandHandler = fn(&mut Context<'_>, &[Bytes]) -> CommandResult<Reply>;

/// One row of a module's command table
#[derive(Clone, Copy)]
pub struct CommandSpec {
    /// Command name, matched case-insensitively
    pub name: &'static str,

    /// Function invoked for each call
    pub handler: CommandHandler,

    /// Space-separated access-mode flags, e.g. `"write deny-oom"`
    pub flags: &'static str,

    /// Position of the first key argument (0 = no keys)
    pub first_key: i32,

    /// Position of the last key argument (-1 = last argument)
    pub last_key: i32,

    /// Distance between key arguments
    pub key_step: i32,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("first_key", &self.first_key)
            .field("last_key", &self.last_key)
            .field("key_step", &self.key_step)
            .finish()
    }
}

/// A module's load-time descriptor
#[derive(Debug, Clone, Copy)]
pub struct ModuleSpec {
    /// Name the module registers under
    pub name: &'static str,

    /// Module version
    pub version: u32,

    /// Commands the module exports
    pub commands: &'static [CommandSpec],
}

/// Parsed access-mode flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandFlags {
    /// May modify the keyspace
    pub write: bool,

    /// Never modifies the keyspace
    pub readonly: bool,

    /// Reject the call outright while over `maxmemory`
    pub deny_oom: bool,

    /// Runs in constant or logarithmic time
    pub fast: bool,

    /// Administrative command
    pub admin: bool,
}

impl FromStr for CommandFlags {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = CommandFlags::default();
        for token in s.split_whitespace() {
            match token.to_ascii_lowercase().as_str() {
                "write" => flags.write = true,
                "readonly" => flags.readonly = true,
                "deny-oom" => flags.deny_oom = true,
                "fast" => flags.fast = true,
                "admin" => flags.admin = true,
                other => {
                    return Err(KvError::Registration(format!(
                        "unknown command flag '{}'",
                        other
                    )))
                }
            }
        }
        if flags.write && flags.readonly {
            return Err(KvError::Registration(
                "command cannot be both 'write' and 'readonly'".to_string(),
            ));
        }
        Ok(flags)
    }
}

/// Key-position descriptor (first/last/step)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    pub first: i32,
    pub last: i32,
    pub step: i32,
}

impl KeyRange {
    /// Validate a first/last/step triple
    pub fn new(first: i32, last: i32, step: i32) -> Result<Self, KvError> {
        let valid = if first == 0 {
            last == 0 && step == 0
        } else {
            first > 0 && step > 0 && (last == -1 || last >= first)
        };
        if !valid {
            return Err(KvError::Registration(format!(
                "invalid key range {}/{}/{}",
                first, last, step
            )));
        }
        Ok(Self { first, last, step })
    }

    /// Extract the key arguments from a full argv
    pub fn keys(&self, argv: &[Bytes]) -> Vec<Bytes> {
        if self.first == 0 || argv.len() <= self.first as usize {
            return Vec::new();
        }
        let last = if self.last < 0 {
            argv.len() - 1
        } else {
            (self.last as usize).min(argv.len() - 1)
        };
        (self.first as usize..=last)
            .step_by(self.step as usize)
            .map(|i| argv[i].clone())
            .collect()
    }
}
