//! Error types for modkv
//!
//! Two layers of errors:
//! - [`KvError`]: host-level failures (configuration, protocol, module loading, I/O)
//! - [`CommandError`]: the outcome of a failed command invocation, rendered
//!   verbatim as the error reply sent back to the caller

use bytes::Bytes;
use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Result type returned by command handlers
pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// Fixed message the host uses for every wrong-type reply
pub const WRONGTYPE_MESSAGE: &str =
    "WRONGTYPE Operation against a key holding the wrong kind of value";

/// Message the host replies with when a deny-oom command is rejected
pub const OOM_REJECT_MESSAGE: &str =
    "OOM command not allowed when used memory > 'maxmemory'.";

/// Unified error type for host operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Module Errors
    // -------------------------------------------------------------------------
    #[error("Module init failed: {0}")]
    ModuleInit(String),

    #[error("Command registration failed: {0}")]
    Registration(String),

    // -------------------------------------------------------------------------
    // Key Access Errors
    // -------------------------------------------------------------------------
    #[error("Key access denied: {0}")]
    KeyAccess(String),

    #[error("Write rejected: {0}")]
    WriteRejected(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure outcome of a single command invocation
///
/// The `Display` output is the exact error reply text, class prefix included.
/// Every variant is terminal for the invocation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("ERR wrong number of arguments for '{command}' command")]
    WrongArity { command: String },

    #[error("ERR {0}")]
    InvalidArgument(String),

    #[error("ERR failed to open key")]
    KeyAccess,

    #[error("{}", WRONGTYPE_MESSAGE)]
    WrongType,

    #[error("ERR failed to read value")]
    Read,

    #[error("ERR increment would overflow")]
    Overflow,

    #[error("ERR failed to store value")]
    Write,

    #[error("ERR out of memory")]
    OutOfMemory,
}

impl CommandError {
    /// Arity error for the command named by `argv[0]`
    pub fn wrong_arity(command: &[u8]) -> Self {
        CommandError::WrongArity {
            command: String::from_utf8_lossy(command).to_ascii_lowercase(),
        }
    }

    /// Arity error for a handler's argv, which may be empty
    pub fn arity_of(argv: &[Bytes]) -> Self {
        Self::wrong_arity(argv.first().map_or(&[][..], |name| name.as_ref()))
    }

    /// Class prefix of the reply (`ERR`, `WRONGTYPE`, ...)
    pub fn class(&self) -> &'static str {
        match self {
            CommandError::WrongType => "WRONGTYPE",
            _ => "ERR",
        }
    }
}
