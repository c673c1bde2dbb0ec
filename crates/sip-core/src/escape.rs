//! Percent-encoding for the two SIP URI character classes this core needs:
//! the `user` production and the generic URI-parameter production.
//!
//! No other transformation is performed — in particular `+` is never
//! treated as a space, unlike `application/x-www-form-urlencoded`.

use crate::error::{Error, Result};

/// Characters that must be percent-encoded in the `user` part of a URI.
const USER_RESERVED: &[u8] = b":@ ";

/// Characters that must be percent-encoded in a URI parameter name/value.
const PARAM_RESERVED: &[u8] = b";?@=, ";

fn encode(input: &str, reserved: &[u8]) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if reserved.contains(&byte) {
            out.push_str(&format!("%{:02X}", byte));
        } else {
            out.push(byte as char);
        }
    }
    out
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn decode(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes
                .get(i + 1)
                .and_then(|b| hex_val(*b))
                .ok_or_else(|| Error::InvalidInput(format!("truncated percent-escape in {input:?}")))?;
            let lo = bytes
                .get(i + 2)
                .and_then(|b| hex_val(*b))
                .ok_or_else(|| Error::InvalidInput(format!("truncated percent-escape in {input:?}")))?;
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|e| Error::InvalidInput(e.to_string()))
}

/// Percent-encode a URI `user` component.
pub fn encode_uri_user(input: &str) -> String {
    encode(input, USER_RESERVED)
}

/// Percent-decode a URI `user` component.
pub fn decode_uri_user(input: &str) -> Result<String> {
    decode(input)
}

/// Percent-encode a URI parameter name or value.
pub fn encode_uri_param(input: &str) -> String {
    encode(input, PARAM_RESERVED)
}

/// Percent-decode a URI parameter name or value.
pub fn decode_uri_param(input: &str) -> Result<String> {
    decode(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_user_chars() {
        assert_eq!(encode_uri_user("alice:pw@host"), "alice%3Apw%40host");
        assert_eq!(encode_uri_user("a b"), "a%20b");
    }

    #[test]
    fn encodes_reserved_param_chars() {
        assert_eq!(encode_uri_param("a;b"), "a%3Bb");
        assert_eq!(encode_uri_param("a=b"), "a%3Db");
    }

    #[test]
    fn decode_accepts_upper_and_lower_hex() {
        assert_eq!(decode_uri_user("alice%3apw%40host").unwrap(), "alice:pw@host");
        assert_eq!(decode_uri_user("alice%3Apw%40host").unwrap(), "alice:pw@host");
    }

    #[test]
    fn decode_rejects_truncated_escape() {
        assert!(decode_uri_user("alice%3").is_err());
        assert!(decode_uri_user("alice%").is_err());
    }

    proptest::proptest! {
        #[test]
        fn user_round_trips(s in "[a-zA-Z0-9 :@_.-]{0,32}") {
            let encoded = encode_uri_user(&s);
            let decoded = decode_uri_user(&encoded).unwrap();
            proptest::prop_assert_eq!(decoded, s);
        }

        #[test]
        fn param_round_trips(s in "[a-zA-Z0-9;?@=, _.-]{0,32}") {
            let encoded = encode_uri_param(&s);
            let decoded = decode_uri_param(&encoded).unwrap();
            proptest::prop_assert_eq!(decoded, s);
        }
    }
}
