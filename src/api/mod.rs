//! Module API
//!
//! Everything an extension module may touch: the per-invocation context,
//! scoped key handles, replies, and the command tables it registers.
//!
//! ## Lifecycle
//! ```text
//!   load:    ModuleSpec ──► Registry::load ──► commands visible to dispatch
//!   call:    argv ──► Host ──► Context ──► handler ──► Reply
//! ```
//!
//! Handlers never hold on to keyspace data past their return; a
//! [`KeyHandle`] borrows the context and is released when dropped.

mod command;
mod context;
mod registry;
mod reply;

pub use command::{CommandFlags, CommandHandler, CommandSpec, KeyRange, ModuleSpec};
pub use context::{Context, KeyHandle, OpenMode};
pub use registry::{LoadedModule, RegisteredCommand, Registry};
pub use reply::Reply;
