//! Reply definitions
//!
//! Values a command hands back to the host for serialization.

use bytes::Bytes;

use crate::error::CommandError;

/// A reply to send to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Status line, e.g. `OK`
    Simple(Bytes),

    /// Error line with class prefix, e.g. `ERR failed to open key`
    Error(String),

    /// Signed 64-bit integer
    Integer(i64),

    /// Binary-safe string; `None` is the nil reply
    Bulk(Option<Bytes>),

    /// Ordered list of replies
    Array(Vec<Reply>),
}

impl Reply {
    /// The `+OK` status reply
    pub fn ok() -> Self {
        Reply::Simple(Bytes::from_static(b"OK"))
    }

    /// Status reply from arbitrary bytes
    pub fn simple(text: impl Into<Bytes>) -> Self {
        Reply::Simple(text.into())
    }

    /// Bulk reply carrying a value
    pub fn bulk(value: impl Into<Bytes>) -> Self {
        Reply::Bulk(Some(value.into()))
    }

    /// The nil reply
    pub fn nil() -> Self {
        Reply::Bulk(None)
    }

    /// Error reply with a verbatim message (prefix included)
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error(message.into())
    }

    /// Check if this is an error reply
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl From<CommandError> for Reply {
    fn from(err: CommandError) -> Self {
        Reply::Error(err.to_string())
    }
}
