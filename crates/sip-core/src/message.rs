//! Byte-level message framer (spec §4.4): split a raw buffer into first
//! line, header block, and optional body before any header is typed.

use crate::error::{Error, Result};
use crate::headers::SipHeaders;

/// Hard ceiling on an acceptable input buffer.
pub const MAX_MESSAGE_BYTES: usize = 200_000;
/// No input shorter than this can possibly contain a first line.
pub const MIN_MESSAGE_BYTES: usize = 7;

/// The framed-but-not-yet-typed shape of a SIP message: first line,
/// unfolded header lines, and an optional UTF-8 body, plus a copy of the
/// bytes it was decoded from (spec §3.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedMessage {
    pub first_line: String,
    pub header_lines: Vec<String>,
    pub body: Option<String>,
    pub raw: Vec<u8>,
}

/// Split `buf` into first line / unfolded header lines / optional body
/// (spec §4.4). Lenient: a buffer with no `CRLFCRLF` is treated as an
/// all-headers, no-body message.
pub fn frame(buf: &[u8]) -> Result<FramedMessage> {
    if buf.len() > MAX_MESSAGE_BYTES {
        tracing::warn!(actual = buf.len(), max = MAX_MESSAGE_BYTES, "rejecting oversized message buffer");
        return Err(Error::MessageTooLarge { max: MAX_MESSAGE_BYTES, actual: buf.len() });
    }
    if buf.len() < MIN_MESSAGE_BYTES {
        return Err(Error::InvalidInput(format!(
            "buffer of {} bytes is shorter than the {MIN_MESSAGE_BYTES}-byte minimum",
            buf.len()
        )));
    }

    let first_crlf = find(buf, b"\r\n").unwrap_or(buf.len());
    let first_line_bytes = &buf[..first_crlf];
    if !contains_subslice(first_line_bytes, b"SIP") {
        return Err(Error::NotSip);
    }
    let first_line = String::from_utf8_lossy(first_line_bytes).into_owned();

    let after_first_line = if first_crlf < buf.len() { &buf[first_crlf + 2..] } else { &[][..] };

    let (header_block, body): (&[u8], Option<&[u8]>) = match find(after_first_line, b"\r\n\r\n") {
        Some(idx) => {
            let headers = &after_first_line[..idx];
            let rest = &after_first_line[idx + 4..];
            (headers, if rest.is_empty() { None } else { Some(rest) })
        }
        None => (after_first_line, None),
    };

    let unfolded = unfold(header_block);
    let header_lines = split_crlf(&unfolded).into_iter().filter(|l| !l.is_empty()).collect();

    let body = body.map(|b| String::from_utf8_lossy(b).into_owned());

    Ok(FramedMessage { first_line, header_lines, body, raw: buf.to_vec() })
}

/// Unfold continuation lines: any CRLF followed by one or more
/// whitespace characters collapses to a single space (spec §4.4).
fn unfold(block: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(block.len());
    let mut i = 0;
    while i < block.len() {
        if block[i] == b'\r' && block.get(i + 1) == Some(&b'\n') && matches!(block.get(i + 2), Some(b' ') | Some(b'\t'))
        {
            out.push(b' ');
            i += 2;
            while matches!(block.get(i), Some(b' ') | Some(b'\t')) {
                i += 1;
            }
        } else {
            out.push(block[i]);
            i += 1;
        }
    }
    out
}

fn split_crlf(block: &[u8]) -> Vec<String> {
    block
        .split(|&b| b == b'\n')
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8_lossy(line).into_owned()
        })
        .collect()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}

/// Parse every header line into a [`SipHeaders`] model (spec §4.5).
pub fn parse_headers(lines: &[String]) -> Result<SipHeaders> {
    let mut headers = SipHeaders::new();
    for line in lines {
        let colon = line
            .find(':')
            .ok_or_else(|| Error::InvalidInput(format!("header line missing ':': {line:?}")))?;
        let name = line[..colon].trim();
        let value = line[colon + 1..].trim();
        headers.fold_header(name, value)?;
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_first_line_headers_and_body() {
        let raw = b"INVITE sip:bob@biloxi.com SIP/2.0\r\nVia: SIP/2.0/UDP host\r\n\r\nbody-text";
        let framed = frame(raw).unwrap();
        assert_eq!(framed.first_line, "INVITE sip:bob@biloxi.com SIP/2.0");
        assert_eq!(framed.header_lines, vec!["Via: SIP/2.0/UDP host"]);
        assert_eq!(framed.body.as_deref(), Some("body-text"));
    }

    #[test]
    fn unfolds_continuation_lines() {
        let raw = b"INVITE sip:bob@biloxi.com SIP/2.0\r\nSubject: Project\r\n   X\r\n\r\n";
        let framed = frame(raw).unwrap();
        assert_eq!(framed.header_lines, vec!["Subject: Project X"]);
    }

    #[test]
    fn missing_crlfcrlf_is_lenient_all_headers_no_body() {
        let raw = b"OPTIONS sip:bob@biloxi.com SIP/2.0\r\nVia: SIP/2.0/UDP host";
        let framed = frame(raw).unwrap();
        assert_eq!(framed.header_lines, vec!["Via: SIP/2.0/UDP host"]);
        assert!(framed.body.is_none());
    }

    #[test]
    fn rejects_buffer_without_sip_in_first_line() {
        assert!(matches!(frame(b"GET / HTTP/1.1\r\n\r\n"), Err(Error::NotSip)));
    }

    #[test]
    fn rejects_undersized_buffer() {
        assert!(frame(b"a").is_err());
    }

    #[test]
    fn rejects_oversized_buffer() {
        let mut raw = b"INVITE sip:x SIP/2.0\r\n\r\n".to_vec();
        raw.extend(std::iter::repeat(b'a').take(MAX_MESSAGE_BYTES));
        assert!(matches!(frame(&raw), Err(Error::MessageTooLarge { .. })));
    }
}
