//! Response view: status-line (version, status code, reason phrase) over
//! the common message model (spec §3.4/§6.5).

use std::fmt;

use crate::error::{Error, Result};
use crate::headers::SipHeaders;
use crate::message::{frame, parse_headers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub version: String,
    pub status_code: u16,
    pub reason_phrase: String,
    pub headers: SipHeaders,
    pub body: Option<String>,
}

impl Response {
    pub fn new(status_code: u16, reason_phrase: impl Into<String>) -> Self {
        Response {
            version: "SIP/2.0".to_string(),
            status_code,
            reason_phrase: reason_phrase.into(),
            headers: SipHeaders::new(),
            body: None,
        }
    }

    /// Parse a full response message from raw bytes (spec §4.4/§4.5).
    pub fn parse(buf: &[u8]) -> Result<Response> {
        let framed = frame(buf)?;
        let mut parts = framed.first_line.splitn(3, ' ');
        let version = parts
            .next()
            .ok_or_else(|| Error::MalformedFirstLine(framed.first_line.clone()))?
            .to_string();
        let code_str = parts
            .next()
            .ok_or_else(|| Error::MalformedFirstLine(framed.first_line.clone()))?;
        let reason_phrase = parts.next().unwrap_or("").to_string();

        let status_code = code_str
            .parse::<u16>()
            .map_err(|_| Error::MalformedFirstLine(framed.first_line.clone()))?;
        let headers = parse_headers(&framed.header_lines)?;

        Ok(Response { version, status_code, reason_phrase, headers, body: framed.body })
    }

    pub fn is_provisional(&self) -> bool {
        (100..200).contains(&self.status_code)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn status_line(&self) -> String {
        format!("{} {} {}", self.version, self.status_code, self.reason_phrase)
    }
}

/// Full wire-format serialization (spec §6.5/§8.1 invariant 1): status
/// line, header block, an authoritative Content-Length computed from the
/// actual body, the blank line, then the body itself.
impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n", self.status_line())?;
        write!(f, "{}", self.headers)?;
        let body = self.body.as_deref().unwrap_or("");
        write!(f, "Content-Length: {}\r\n\r\n", body.len())?;
        f.write_str(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_line() {
        let raw = b"SIP/2.0 200 OK\r\nCSeq: 1 INVITE\r\nCall-ID: abc\r\nContent-Length: 0\r\n\r\n";
        let resp = Response::parse(raw).unwrap();
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.reason_phrase, "OK");
        assert!(resp.is_success());
        assert!(!resp.is_provisional());
    }
}
