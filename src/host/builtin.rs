//! Built-in commands
//!
//! The host's own command table, registered through the same path modules
//! use. These give callers a way to seed and inspect the keyspace.

use bytes::Bytes;

use crate::api::{CommandSpec, Context, ModuleSpec, OpenMode, Reply};
use crate::error::{CommandError, CommandResult, KvError};
use crate::keyspace::KeyType;

/// Name the built-in table registers under
pub const CORE_MODULE: &str = "core";

pub static CORE: ModuleSpec = ModuleSpec {
    name: CORE_MODULE,
    version: 1,
    commands: &[
        CommandSpec { name: "ping", handler: ping, flags: "fast", first_key: 0, last_key: 0, key_step: 0 },
        CommandSpec { name: "set", handler: set, flags: "write deny-oom", first_key: 1, last_key: 1, key_step: 1 },
        CommandSpec { name: "get", handler: get, flags: "readonly fast", first_key: 1, last_key: 1, key_step: 1 },
        CommandSpec { name: "del", handler: del, flags: "write", first_key: 1, last_key: -1, key_step: 1 },
        CommandSpec { name: "type", handler: key_type, flags: "readonly fast", first_key: 1, last_key: 1, key_step: 1 },
        CommandSpec { name: "rpush", handler: rpush, flags: "write deny-oom fast", first_key: 1, last_key: 1, key_step: 1 },
        CommandSpec { name: "dbsize", handler: dbsize, flags: "readonly fast", first_key: 0, last_key: 0, key_step: 0 },
    ],
};

fn key_access(err: KvError) -> CommandError {
    tracing::debug!(error = %err, "key open failed");
    CommandError::KeyAccess
}

fn write_failed(err: KvError) -> CommandError {
    tracing::debug!(error = %err, "write failed");
    CommandError::Write
}

/// `PING [message]`
fn ping(_ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    match argv.len() {
        1 => Ok(Reply::simple("PONG")),
        2 => Ok(Reply::bulk(argv[1].clone())),
        _ => Err(CommandError::arity_of(argv)),
    }
}

/// `SET key value`
fn set(ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    if argv.len() != 3 {
        return Err(CommandError::arity_of(argv));
    }
    let mut handle = ctx.open_key(&argv[1], OpenMode::ReadWrite).map_err(key_access)?;
    handle.string_set(argv[2].clone()).map_err(write_failed)?;
    Ok(Reply::ok())
}

/// `GET key`
fn get(ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    if argv.len() != 2 {
        return Err(CommandError::arity_of(argv));
    }
    let handle = ctx.open_key(&argv[1], OpenMode::Read).map_err(key_access)?;
    match handle.key_type() {
        KeyType::Empty => Ok(Reply::nil()),
        KeyType::String => Ok(handle
            .string_view()
            .map_or_else(Reply::nil, |v| Reply::bulk(Bytes::copy_from_slice(v)))),
        _ => Err(CommandError::WrongType),
    }
}

/// `DEL key [key ...]`
fn del(ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    if argv.len() < 2 {
        return Err(CommandError::arity_of(argv));
    }
    // Every key must open before any is removed
    for key in &argv[1..] {
        ctx.open_key(key, OpenMode::ReadWrite).map_err(key_access)?;
    }

    let mut removed = 0;
    for key in &argv[1..] {
        let mut handle = ctx.open_key(key, OpenMode::ReadWrite).map_err(key_access)?;
        if handle.delete().map_err(write_failed)? {
            removed += 1;
        }
    }
    Ok(Reply::Integer(removed))
}

/// `TYPE key`
fn key_type(ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    if argv.len() != 2 {
        return Err(CommandError::arity_of(argv));
    }
    let handle = ctx.open_key(&argv[1], OpenMode::Read).map_err(key_access)?;
    Ok(Reply::simple(handle.key_type().as_str()))
}

/// `RPUSH key value [value ...]`
fn rpush(ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    if argv.len() < 3 {
        return Err(CommandError::arity_of(argv));
    }
    let mut handle = ctx.open_key(&argv[1], OpenMode::ReadWrite).map_err(key_access)?;
    match handle.list_push(argv[2..].to_vec()).map_err(write_failed)? {
        Some(len) => Ok(Reply::Integer(len as i64)),
        None => Err(CommandError::WrongType),
    }
}

/// `DBSIZE`
fn dbsize(ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    if argv.len() != 1 {
        return Err(CommandError::arity_of(argv));
    }
    Ok(Reply::Integer(ctx.db_size() as i64))
}
