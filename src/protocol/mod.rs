//! Protocol Module
//!
//! The text/array protocol callers use to talk to the host.
//!
//! ## Requests
//! - Inline: one line of whitespace-separated, optionally quoted tokens
//! - Multibulk: `*<argc>\r\n` followed by `$<len>\r\n<bytes>\r\n` per argument
//!
//! ## Replies
//! RESP2 on the wire, or a human-readable rendering for interactive use.

mod codec;
mod request;

pub use codec::{encode_reply, format_reply, write_reply};
pub use request::{decode_request, parse_inline, MAX_ARGS, MAX_BULK_LEN};
