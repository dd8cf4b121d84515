//! Counter Module
//!
//! A signed 64-bit counter stored in the host's plain string values.
//!
//! ## Commands
//! - `COUNTER.INCR <key> [amount]`: add `amount` (default 1), reply the new value
//! - `COUNTER.GET <key>`: reply the current value, 0 when the key is absent
//!
//! ## Increment Flow
//! ```text
//!   open key ──► type check ──► decode ──► checked add ──► encode ──► store ──► reply
//!       │            │             │            │                       │
//!       └────────────┴─────────────┴────────────┴───────────────────────┴──► error reply
//! ```
//!
//! The store is the only mutating step and runs after every check has
//! passed, so a failed call never changes the stored value. The key handle
//! is released on every path when it goes out of scope.

pub mod arith;
pub mod codec;

use bytes::Bytes;

use crate::api::{CommandSpec, Context, KeyHandle, ModuleSpec, OpenMode, Reply};
use crate::error::{CommandError, CommandResult};
use crate::keyspace::KeyType;

pub use arith::{checked_add, Overflow};

/// Load-time descriptor for the counter module
pub static MODULE: ModuleSpec = ModuleSpec {
    name: "counter",
    version: 1,
    commands: &[
        CommandSpec {
            name: "counter.incr",
            handler: incr_command,
            flags: "write deny-oom",
            first_key: 1,
            last_key: 1,
            key_step: 1,
        },
        CommandSpec {
            name: "counter.get",
            handler: get_command,
            flags: "readonly",
            first_key: 1,
            last_key: 1,
            key_step: 1,
        },
    ],
};

/// `COUNTER.INCR <key> [amount]`
pub fn incr_command(ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    if argv.len() != 2 && argv.len() != 3 {
        return Err(CommandError::arity_of(argv));
    }

    let increment = match argv.get(2) {
        Some(arg) => codec::parse_strict(arg)
            .ok_or_else(|| CommandError::InvalidArgument("invalid increment amount".to_string()))?,
        None => 1,
    };

    incr(ctx, &argv[1], increment).map(Reply::Integer)
}

/// `COUNTER.GET <key>`
pub fn get_command(ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    if argv.len() != 2 {
        return Err(CommandError::arity_of(argv));
    }

    get(ctx, &argv[1]).map(Reply::Integer)
}

/// Add `increment` to the counter at `key` and return the new value
pub fn incr(ctx: &mut Context<'_>, key: &[u8], increment: i64) -> CommandResult<i64> {
    let mut handle = ctx
        .open_key(key, OpenMode::ReadWrite)
        .map_err(|e| {
            tracing::debug!(error = %e, "counter.incr could not open key");
            CommandError::KeyAccess
        })?;

    let current = read_counter(&handle)?;

    let value = checked_add(current, increment).map_err(|Overflow| CommandError::Overflow)?;

    handle.string_set(codec::encode(value)).map_err(|e| {
        tracing::debug!(error = %e, "counter.incr could not store value");
        CommandError::Write
    })?;

    Ok(value)
}

/// Current value of the counter at `key`, 0 when absent
pub fn get(ctx: &mut Context<'_>, key: &[u8]) -> CommandResult<i64> {
    let handle = ctx.open_key(key, OpenMode::Read).map_err(|e| {
        tracing::debug!(error = %e, "counter.get could not open key");
        CommandError::KeyAccess
    })?;

    read_counter(&handle)
}

/// Type-check and decode the value behind an open handle
fn read_counter(handle: &KeyHandle<'_>) -> CommandResult<i64> {
    match handle.key_type() {
        KeyType::Empty => Ok(codec::decode(None)),
        KeyType::String => match handle.string_view() {
            Some(bytes) if !bytes.is_empty() => Ok(codec::decode(Some(bytes))),
            _ => Err(CommandError::Read),
        },
        _ => Err(CommandError::WrongType),
    }
}
