//! Overflow-checked counter arithmetic

use thiserror::Error;

/// The sum does not fit in a signed 64-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("increment would overflow")]
pub struct Overflow;

/// Add `increment` to `value`, detecting overflow before it happens
pub fn checked_add(value: i64, increment: i64) -> Result<i64, Overflow> {
    if (increment > 0 && value > i64::MAX - increment)
        || (increment < 0 && value < i64::MIN - increment)
    {
        return Err(Overflow);
    }
    Ok(value + increment)
}
