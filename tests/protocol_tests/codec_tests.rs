//! Protocol Tests
//!
//! Tests verify:
//! - Inline request tokenizing, quoting and escapes
//! - Multibulk request decoding, including partial input
//! - RESP2 reply encoding
//! - Human-readable reply rendering

use bytes::Bytes;
use modkv::protocol::{
    decode_request, encode_reply, format_reply, parse_inline, write_reply, MAX_ARGS,
};
use modkv::{KvError, Reply};

fn args(parts: &[&str]) -> Vec<Bytes> {
    parts.iter().map(|p| Bytes::from(p.to_string())).collect()
}

// =============================================================================
// Inline Request Tests
// =============================================================================

#[test]
fn test_inline_plain_tokens() {
    assert_eq!(
        parse_inline("COUNTER.INCR  hits\t5").unwrap(),
        args(&["COUNTER.INCR", "hits", "5"])
    );
}

#[test]
fn test_inline_blank_line() {
    assert!(parse_inline("").unwrap().is_empty());
    assert!(parse_inline("   \t ").unwrap().is_empty());
}

#[test]
fn test_inline_double_quotes_and_escapes() {
    assert_eq!(
        parse_inline(r#"SET "a key" "line\nnext\x41\"""#).unwrap(),
        vec![
            Bytes::from_static(b"SET"),
            Bytes::from_static(b"a key"),
            Bytes::from_static(b"line\nnextA\""),
        ]
    );
    assert_eq!(parse_inline(r#"SET k """#).unwrap()[2], Bytes::new());
}

#[test]
fn test_inline_single_quotes_are_literal() {
    assert_eq!(
        parse_inline(r"SET k 'a\nb \'c\''").unwrap()[2],
        Bytes::from_static(b"a\\nb 'c'")
    );
}

#[test]
fn test_inline_unbalanced_quotes() {
    assert!(matches!(parse_inline("SET \"k"), Err(KvError::Protocol(_))));
    assert!(matches!(parse_inline("SET 'k"), Err(KvError::Protocol(_))));
    assert!(matches!(parse_inline("SET \"k\"v"), Err(KvError::Protocol(_))));
}

// =============================================================================
// Multibulk Request Tests
// =============================================================================

#[test]
fn test_decode_complete_request() {
    let input = b"*2\r\n$11\r\nCOUNTER.GET\r\n$4\r\nhits\r\n";

    let (argv, consumed) = decode_request(input).unwrap().unwrap();

    assert_eq!(argv, args(&["COUNTER.GET", "hits"]));
    assert_eq!(consumed, input.len());
}

#[test]
fn test_decode_pipelined_requests() {
    let input = b"*1\r\n$4\r\nPING\r\n*2\r\n$3\r\nGET\r\n$1\r\nk\r\n";

    let (first, used) = decode_request(input).unwrap().unwrap();
    let (second, _) = decode_request(&input[used..]).unwrap().unwrap();

    assert_eq!(first, args(&["PING"]));
    assert_eq!(second, args(&["GET", "k"]));
}

#[test]
fn test_decode_incomplete_request() {
    let input = b"*2\r\n$11\r\nCOUNTER.GET\r\n$4\r\nhi";

    for end in 0..input.len() {
        assert!(decode_request(&input[..end]).unwrap().is_none(), "prefix {}", end);
    }
}

#[test]
fn test_decode_large_declared_count_waits_for_arguments() {
    let header = format!("*{}\r\n", MAX_ARGS);
    assert!(decode_request(header.as_bytes()).unwrap().is_none());

    let mut input = header.into_bytes();
    input.extend_from_slice(b"$4\r\nPING\r\n");
    assert!(decode_request(&input).unwrap().is_none());

    let too_many = format!("*{}\r\n", MAX_ARGS + 1);
    assert!(decode_request(too_many.as_bytes()).is_err());
}

#[test]
fn test_decode_malformed_request() {
    assert!(decode_request(b"+PING\r\n").is_err());
    assert!(decode_request(b"*x\r\n").is_err());
    assert!(decode_request(b"*1\r\n:4\r\n").is_err());
    assert!(decode_request(b"*1\r\n$2\r\nabcd\r\n").is_err());
}

// =============================================================================
// Reply Encoding Tests
// =============================================================================

#[test]
fn test_encode_replies() {
    assert_eq!(encode_reply(&Reply::ok()), b"+OK\r\n");
    assert_eq!(encode_reply(&Reply::Integer(-7)), b":-7\r\n");
    assert_eq!(encode_reply(&Reply::nil()), b"$-1\r\n");
    assert_eq!(encode_reply(&Reply::bulk("hey")), b"$3\r\nhey\r\n");
    assert_eq!(
        encode_reply(&Reply::error("ERR increment would overflow")),
        b"-ERR increment would overflow\r\n"
    );
    assert_eq!(
        encode_reply(&Reply::Array(vec![Reply::Integer(1), Reply::bulk("a")])),
        b"*2\r\n:1\r\n$1\r\na\r\n"
    );
}

#[test]
fn test_encode_strips_line_breaks_from_status() {
    assert_eq!(
        encode_reply(&Reply::simple("Hello a\r\nb")),
        b"+Hello a  b\r\n"
    );
}

#[test]
fn test_write_reply_to_stream() {
    let mut out = Vec::new();
    write_reply(&mut out, &Reply::Integer(42)).unwrap();
    assert_eq!(out, b":42\r\n");
}

// =============================================================================
// Human Rendering Tests
// =============================================================================

#[test]
fn test_format_replies() {
    assert_eq!(format_reply(&Reply::Integer(3)), "(integer) 3");
    assert_eq!(format_reply(&Reply::simple("Hello World")), "Hello World");
    assert_eq!(format_reply(&Reply::nil()), "(nil)");
    assert_eq!(format_reply(&Reply::bulk("v")), "\"v\"");
    assert_eq!(
        format_reply(&Reply::error("ERR failed to open key")),
        "(error) ERR failed to open key"
    );
    assert_eq!(format_reply(&Reply::Array(vec![])), "(empty array)");
}

#[test]
fn test_format_nested_array() {
    let reply = Reply::Array(vec![Reply::Array(vec![Reply::bulk("name"), Reply::bulk("counter")])]);

    assert_eq!(format_reply(&reply), "1) 1) \"name\"\n   2) \"counter\"");
}
