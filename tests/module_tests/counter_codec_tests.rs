//! Counter Internals Tests
//!
//! Tests verify, below the dispatcher:
//! - Permissive decoding of stored values
//! - Strict parsing of increment arguments
//! - Overflow-checked addition
//! - Handler behavior against a bare context (handles, errors, empty argv)

use bytes::Bytes;
use modkv::api::{Context, Reply};
use modkv::error::CommandError;
use modkv::keyspace::Keyspace;
use modkv::modules::counter::{self, checked_add, codec, Overflow};
use modkv::Config;
use proptest::prelude::*;

// =============================================================================
// Helper Functions
// =============================================================================

fn argv(parts: &[&str]) -> Vec<Bytes> {
    parts.iter().map(|p| Bytes::from(p.to_string())).collect()
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_absent_is_zero() {
    assert_eq!(codec::decode(None), 0);
}

#[test]
fn test_decode_plain_values() {
    assert_eq!(codec::decode(Some(b"42")), 42);
    assert_eq!(codec::decode(Some(b"-17")), -17);
    assert_eq!(codec::decode(Some(b"0")), 0);
    assert_eq!(codec::decode(Some(b"9223372036854775807")), i64::MAX);
    assert_eq!(codec::decode(Some(b"-9223372036854775808")), i64::MIN);
}

#[test]
fn test_decode_is_permissive() {
    assert_eq!(codec::decode(Some(b"  12abc")), 12);
    assert_eq!(codec::decode(Some(b"+5")), 5);
    assert_eq!(codec::decode(Some(b"abc")), 0);
    assert_eq!(codec::decode(Some(b"-")), 0);
    assert_eq!(codec::decode(Some(b"3.9")), 3);
}

#[test]
fn test_decode_saturates() {
    assert_eq!(codec::decode(Some(b"99999999999999999999")), i64::MAX);
    assert_eq!(codec::decode(Some(b"-99999999999999999999")), i64::MIN);
}

// =============================================================================
// Encode and Strict Parse Tests
// =============================================================================

#[test]
fn test_encode_canonical() {
    assert_eq!(codec::encode(0), Bytes::from_static(b"0"));
    assert_eq!(codec::encode(-5), Bytes::from_static(b"-5"));
    assert_eq!(codec::encode(i64::MIN), Bytes::from_static(b"-9223372036854775808"));
}

#[test]
fn test_parse_strict() {
    assert_eq!(codec::parse_strict(b"10"), Some(10));
    assert_eq!(codec::parse_strict(b"-10"), Some(-10));
    assert_eq!(codec::parse_strict(b"0"), Some(0));
    assert_eq!(codec::parse_strict(b"-9223372036854775808"), Some(i64::MIN));

    assert_eq!(codec::parse_strict(b""), None);
    assert_eq!(codec::parse_strict(b"-"), None);
    assert_eq!(codec::parse_strict(b"-0"), None);
    assert_eq!(codec::parse_strict(b"007"), None);
    assert_eq!(codec::parse_strict(b"+1"), None);
    assert_eq!(codec::parse_strict(b" 1"), None);
    assert_eq!(codec::parse_strict(b"1x"), None);
    assert_eq!(codec::parse_strict(b"9223372036854775808"), None);
}

// =============================================================================
// Arithmetic Tests
// =============================================================================

#[test]
fn test_checked_add_bounds() {
    assert_eq!(checked_add(i64::MAX, 1), Err(Overflow));
    assert_eq!(checked_add(i64::MIN, -1), Err(Overflow));
    assert_eq!(checked_add(i64::MAX - 1, 1), Ok(i64::MAX));
    assert_eq!(checked_add(i64::MIN + 1, -1), Ok(i64::MIN));
    assert_eq!(checked_add(i64::MAX, i64::MIN), Ok(-1));
    assert_eq!(checked_add(5, 0), Ok(5));
}

proptest! {
    #[test]
    fn checked_add_matches_widened_arithmetic(value in any::<i64>(), increment in any::<i64>()) {
        let wide = i128::from(value) + i128::from(increment);
        match checked_add(value, increment) {
            Ok(sum) => prop_assert_eq!(i128::from(sum), wide),
            Err(Overflow) => prop_assert!(wide > i128::from(i64::MAX) || wide < i128::from(i64::MIN)),
        }
    }
}

// =============================================================================
// Handler Tests
// =============================================================================

#[test]
fn test_incr_default_amount() {
    let mut keyspace = Keyspace::new();
    let config = Config::default();
    let mut ctx = Context::new(&mut keyspace, &config);

    let reply = counter::incr_command(&mut ctx, &argv(&["counter.incr", "hits"])).unwrap();
    assert_eq!(reply, Reply::Integer(1));
    assert_eq!(ctx.open_handles(), 0);
}

#[test]
fn test_handles_released_on_error_paths() {
    let mut keyspace = Keyspace::new();
    keyspace.push_list(b"list", vec![Bytes::from_static(b"x")]);
    keyspace.set_string(b"max", codec::encode(i64::MAX));
    let config = Config::default();
    let mut ctx = Context::new(&mut keyspace, &config);

    assert_eq!(counter::incr(&mut ctx, b"list", 1), Err(CommandError::WrongType));
    assert_eq!(counter::incr(&mut ctx, b"max", 1), Err(CommandError::Overflow));
    assert_eq!(counter::get(&mut ctx, b"list"), Err(CommandError::WrongType));
    assert_eq!(ctx.open_handles(), 0);
}

#[test]
fn test_store_failure_is_write_error() {
    let mut keyspace = Keyspace::new();
    keyspace.set_string(b"n", Bytes::from_static(b"99"));
    let config = Config::builder().max_value_len(2).build().unwrap();
    let mut ctx = Context::new(&mut keyspace, &config);

    assert_eq!(counter::incr(&mut ctx, b"n", 1), Err(CommandError::Write));
    assert_eq!(counter::get(&mut ctx, b"n"), Ok(99));
}

#[test]
fn test_handlers_reject_empty_argv() {
    let mut keyspace = Keyspace::new();
    let config = Config::default();
    let mut ctx = Context::new(&mut keyspace, &config);

    assert_eq!(
        counter::incr_command(&mut ctx, &[]),
        Err(CommandError::arity_of(&[]))
    );
    assert_eq!(
        counter::get_command(&mut ctx, &[]),
        Err(CommandError::arity_of(&[]))
    );
}
