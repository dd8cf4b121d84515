//! Counter value codec
//!
//! Converts between stored string bytes and `i64` counter values.
//!
//! Two parsers live here on purpose:
//! - [`decode`] reads stored values permissively, the way C `atoll` does
//! - [`parse_strict`] validates user-supplied increments and accepts only
//!   a canonical integer token

use bytes::Bytes;

/// Decode a stored counter value; `None` (absent key) is 0
///
/// Leading ASCII whitespace is skipped, an optional sign is honoured, and
/// digits are read up to the first non-digit. Anything after that is ignored.
/// Input without digits decodes to 0 and out-of-range values saturate.
pub fn decode(stored: Option<&[u8]>) -> i64 {
    let bytes = match stored {
        Some(bytes) => bytes,
        None => return 0,
    };

    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let mut rest = &bytes[start..];
    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    // Accumulate toward the sign so i64::MIN is reachable without overflow
    let mut value: i64 = 0;
    for &b in rest.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = i64::from(b - b'0');
        let next = value.checked_mul(10).and_then(|v| {
            if negative {
                v.checked_sub(digit)
            } else {
                v.checked_add(digit)
            }
        });
        match next {
            Some(v) => value = v,
            None => return if negative { i64::MIN } else { i64::MAX },
        }
    }
    value
}

/// Encode a counter value as canonical decimal
pub fn encode(value: i64) -> Bytes {
    Bytes::from(value.to_string())
}

/// Parse a command argument as an `i64`, accepting only canonical form
///
/// Optional leading `-`, then either `0` or a digit run not starting with
/// `0`. No `+`, whitespace, or trailing bytes; must fit in range.
pub fn parse_strict(arg: &[u8]) -> Option<i64> {
    let digits = arg.strip_prefix(b"-").unwrap_or(arg);
    match digits {
        [] => return None,
        [b'0'] if digits.len() == arg.len() => return Some(0),
        [b'0', ..] => return None,
        _ => {}
    }
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(arg).ok()?.parse().ok()
}
