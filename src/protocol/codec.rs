//! Reply codec
//!
//! Serializes replies for the caller.
//!
//! ## Wire Format (RESP2)
//! ```text
//!   Simple   +OK\r\n
//!   Error    -ERR failed to open key\r\n
//!   Integer  :42\r\n
//!   Bulk     $5\r\nhello\r\n      (nil: $-1\r\n)
//!   Array    *2\r\n<reply><reply>
//! ```
//!
//! Simple and error lines cannot carry CR or LF; those bytes are replaced
//! with spaces before encoding.

use std::fmt::Write as _;
use std::io::Write;

use crate::api::Reply;
use crate::error::Result;

/// Encode a reply to RESP2 bytes
pub fn encode_reply(reply: &Reply) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(reply, &mut out);
    out
}

fn encode_into(reply: &Reply, out: &mut Vec<u8>) {
    match reply {
        Reply::Simple(text) => {
            out.push(b'+');
            push_line(out, text);
        }
        Reply::Error(message) => {
            out.push(b'-');
            push_line(out, message.as_bytes());
        }
        Reply::Integer(n) => {
            out.push(b':');
            out.extend_from_slice(n.to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        Reply::Bulk(None) => out.extend_from_slice(b"$-1\r\n"),
        Reply::Bulk(Some(data)) => {
            out.push(b'$');
            out.extend_from_slice(data.len().to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(data);
            out.extend_from_slice(b"\r\n");
        }
        Reply::Array(items) => {
            out.push(b'*');
            out.extend_from_slice(items.len().to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
            for item in items {
                encode_into(item, out);
            }
        }
    }
}

fn push_line(out: &mut Vec<u8>, text: &[u8]) {
    out.extend(
        text.iter()
            .map(|&b| if b == b'\r' || b == b'\n' { b' ' } else { b }),
    );
    out.extend_from_slice(b"\r\n");
}

/// Write a reply to a stream in RESP2 form
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    writer.write_all(&encode_reply(reply))?;
    writer.flush()?;
    Ok(())
}

/// Render a reply for people, in the style of an interactive client
///
/// ```text
/// (integer) 3
/// "Hello"
/// (nil)
/// (error) ERR increment would overflow
/// 1) "a"
/// 2) "b"
/// ```
pub fn format_reply(reply: &Reply) -> String {
    let mut out = String::new();
    format_into(reply, 0, &mut out);
    out
}

fn format_into(reply: &Reply, indent: usize, out: &mut String) {
    match reply {
        Reply::Simple(text) => out.push_str(&String::from_utf8_lossy(text)),
        Reply::Error(message) => {
            let _ = write!(out, "(error) {}", message);
        }
        Reply::Integer(n) => {
            let _ = write!(out, "(integer) {}", n);
        }
        Reply::Bulk(None) => out.push_str("(nil)"),
        Reply::Bulk(Some(data)) => {
            let _ = write!(out, "\"{}\"", data.escape_ascii());
        }
        Reply::Array(items) if items.is_empty() => out.push_str("(empty array)"),
        Reply::Array(items) => {
            let width = items.len().to_string().len();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                    out.push_str(&" ".repeat(indent));
                }
                let label = format!("{:>width$}) ", i + 1, width = width);
                out.push_str(&label);
                format_into(item, indent + label.len(), out);
            }
        }
    }
}
