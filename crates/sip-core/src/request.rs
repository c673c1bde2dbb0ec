//! Request view: request-line (method, Request-URI, version) over the
//! common message model (spec §3.4).

use std::fmt;

use crate::error::{Error, Result};
use crate::headers::method::Method;
use crate::headers::SipHeaders;
use crate::message::{frame, parse_headers};
use crate::uri::Uri;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub uri: Uri,
    pub version: String,
    pub headers: SipHeaders,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, uri: Uri) -> Self {
        Request { method, uri, version: "SIP/2.0".to_string(), headers: SipHeaders::new(), body: None }
    }

    /// Parse a full request message from raw bytes (spec §4.4/§4.5).
    pub fn parse(buf: &[u8]) -> Result<Request> {
        let framed = frame(buf)?;
        let mut parts = framed.first_line.splitn(3, ' ');
        let method_str = parts
            .next()
            .ok_or_else(|| Error::MalformedFirstLine(framed.first_line.clone()))?;
        let uri_str = parts
            .next()
            .ok_or_else(|| Error::MalformedFirstLine(framed.first_line.clone()))?;
        let version = parts
            .next()
            .ok_or_else(|| Error::MalformedFirstLine(framed.first_line.clone()))?
            .to_string();

        let method = method_str
            .parse::<Method>()
            .map_err(|_| Error::MalformedFirstLine(framed.first_line.clone()))?;
        let uri = Uri::parse(uri_str)?;
        let headers = parse_headers(&framed.header_lines)?;

        Ok(Request { method, uri, version, headers, body: framed.body })
    }

    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.uri, self.version)
    }
}

/// Full wire-format serialization (spec §6.5/§8.1 invariant 1): request
/// line, header block, an authoritative Content-Length computed from the
/// actual body, the blank line, then the body itself.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n", self.request_line())?;
        write!(f, "{}", self.headers)?;
        let body = self.body.as_deref().unwrap_or("");
        write!(f, "Content-Length: {}\r\n\r\n", body.len())?;
        f.write_str(body)
    }
}
