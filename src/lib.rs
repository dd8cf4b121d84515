//! # modkv
//!
//! An in-process key-value host that loads command modules:
//! - A keyspace of typed values (strings and lists)
//! - A module API of scoped key handles, replies and allocation
//! - A registry fed by static per-module command tables
//! - Two bundled modules: a 64-bit counter and a greeting
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Request (inline / multibulk)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ argv
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Host                                  │
//! │        (registry lookup, deny-oom, one call at a time)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Context
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   counter   │          │   simple    │
//!   │ INCR / GET  │          │   GREET     │
//!   └──────┬──────┘          └─────────────┘
//!          │ KeyHandle
//!          ▼
//!   ┌─────────────┐
//!   │  Keyspace   │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod keyspace;
pub mod api;
pub mod modules;
pub mod protocol;
pub mod host;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CommandError, KvError, Result};
pub use config::Config;
pub use api::Reply;
pub use host::Host;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of modkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
