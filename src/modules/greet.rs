//! Greeting Module
//!
//! `SIMPLE.GREET <name>` replies `Hello <name>`. The reply buffer comes
//! from the host allocator, so an oversized name fails with an out-of-memory
//! error instead of taking the process down. The reply is a status line,
//! so names containing CR or LF are refused.

use bytes::Bytes;

use crate::api::{CommandSpec, Context, ModuleSpec, Reply};
use crate::error::{CommandError, CommandResult};

const PREFIX: &[u8] = b"Hello ";

/// Load-time descriptor for the greeting module
pub static MODULE: ModuleSpec = ModuleSpec {
    name: "simple",
    version: 1,
    commands: &[CommandSpec {
        name: "simple.greet",
        handler: greet_command,
        flags: "readonly",
        first_key: 1,
        last_key: 1,
        key_step: 1,
    }],
};

/// `SIMPLE.GREET <name>`
pub fn greet_command(ctx: &mut Context<'_>, argv: &[Bytes]) -> CommandResult<Reply> {
    if argv.len() != 2 {
        return Err(CommandError::arity_of(argv));
    }

    greet(ctx, &argv[1]).map(Reply::Simple)
}

/// Build `"Hello " + name` in a host-allocated buffer
pub fn greet(ctx: &Context<'_>, name: &[u8]) -> CommandResult<Bytes> {
    if name.iter().any(|&b| b == b'\r' || b == b'\n') {
        return Err(CommandError::InvalidArgument(
            "name must not contain CR or LF".to_string(),
        ));
    }

    let len = PREFIX
        .len()
        .checked_add(name.len())
        .ok_or(CommandError::OutOfMemory)?;

    let mut buf = ctx.alloc(len)?;
    buf.extend_from_slice(PREFIX);
    buf.extend_from_slice(name);
    Ok(Bytes::from(buf))
}
