//! Request parsing
//!
//! Turns caller input into an argv of byte strings. Two request forms:
//! - inline: `COUNTER.INCR hits 5`, with quoting for spaces and escapes
//! - multibulk: `*3\r\n$12\r\nCOUNTER.INCR\r\n$4\r\nhits\r\n$1\r\n5\r\n`

use bytes::Bytes;

use crate::error::{KvError, Result};

/// Maximum number of arguments in one multibulk request
pub const MAX_ARGS: usize = 1024 * 1024;

/// Argument slots reserved up front for one multibulk request
const PREALLOC_ARGS: usize = 64;

/// Maximum size of one multibulk argument (512 MB)
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Split an inline request line into arguments
///
/// Double-quoted tokens understand `\"`, `\\`, `\n`, `\r`, `\t`, `\a`, `\b`
/// and `\xHH`; single-quoted tokens are literal except for `\'`. A closing
/// quote must be followed by whitespace or end of line.
pub fn parse_inline(line: &str) -> Result<Vec<Bytes>> {
    let bytes = line.as_bytes();
    let mut args = Vec::new();
    let mut i = 0;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return Ok(args);
        }

        let mut current = Vec::new();
        match bytes[i] {
            b'"' => {
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => return Err(unbalanced()),
                        Some(b'\\') if i + 3 < bytes.len()
                            && bytes[i + 1] == b'x'
                            && bytes[i + 2].is_ascii_hexdigit()
                            && bytes[i + 3].is_ascii_hexdigit() =>
                        {
                            current.push(hex_value(bytes[i + 2]) << 4 | hex_value(bytes[i + 3]));
                            i += 4;
                        }
                        Some(b'\\') if i + 1 < bytes.len() => {
                            current.push(match bytes[i + 1] {
                                b'n' => b'\n',
                                b'r' => b'\r',
                                b't' => b'\t',
                                b'b' => 0x08,
                                b'a' => 0x07,
                                other => other,
                            });
                            i += 2;
                        }
                        Some(b'"') => {
                            i += 1;
                            break;
                        }
                        Some(&b) => {
                            current.push(b);
                            i += 1;
                        }
                    }
                }
            }
            b'\'' => {
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => return Err(unbalanced()),
                        Some(b'\\') if bytes.get(i + 1) == Some(&b'\'') => {
                            current.push(b'\'');
                            i += 2;
                        }
                        Some(b'\'') => {
                            i += 1;
                            break;
                        }
                        Some(&b) => {
                            current.push(b);
                            i += 1;
                        }
                    }
                }
            }
            _ => {
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    current.push(bytes[i]);
                    i += 1;
                }
            }
        }

        if i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            return Err(KvError::Protocol(
                "closing quote must be followed by a space".to_string(),
            ));
        }
        args.push(Bytes::from(current));
    }
}

/// Decode one multibulk request from the front of `buf`
///
/// Returns `Ok(None)` when `buf` does not yet hold a complete request,
/// otherwise the argv and the number of bytes consumed.
pub fn decode_request(buf: &[u8]) -> Result<Option<(Vec<Bytes>, usize)>> {
    let Some((count, mut pos)) = read_header(buf, 0, b'*')? else {
        return Ok(None);
    };
    if count > MAX_ARGS {
        return Err(KvError::Protocol(format!(
            "too many arguments: {} (max {})",
            count, MAX_ARGS
        )));
    }

    // The declared count is untrusted until the arguments actually arrive
    let mut args = Vec::with_capacity(count.min(PREALLOC_ARGS));
    for _ in 0..count {
        let Some((len, start)) = read_header(buf, pos, b'$')? else {
            return Ok(None);
        };
        if len > MAX_BULK_LEN {
            return Err(KvError::Protocol(format!(
                "bulk length {} exceeds limit {}",
                len, MAX_BULK_LEN
            )));
        }
        let end = start + len;
        if buf.len() < end + 2 {
            return Ok(None);
        }
        if &buf[end..end + 2] != b"\r\n" {
            return Err(KvError::Protocol("bulk string not terminated by CRLF".to_string()));
        }
        args.push(Bytes::copy_from_slice(&buf[start..end]));
        pos = end + 2;
    }

    Ok(Some((args, pos)))
}

/// Read a `<marker><len>\r\n` header at `pos`
fn read_header(buf: &[u8], pos: usize, marker: u8) -> Result<Option<(usize, usize)>> {
    let Some(&first) = buf.get(pos) else {
        return Ok(None);
    };
    if first != marker {
        return Err(KvError::Protocol(format!(
            "expected '{}', got '{}'",
            marker as char,
            first.escape_ascii()
        )));
    }
    let Some(offset) = buf[pos..].windows(2).position(|w| w == b"\r\n") else {
        return Ok(None);
    };
    let digits = &buf[pos + 1..pos + offset];
    let len = std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| KvError::Protocol("invalid length".to_string()))?;
    Ok(Some((len, pos + offset + 2)))
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

fn unbalanced() -> KvError {
    KvError::Protocol("unbalanced quotes in request".to_string())
}
