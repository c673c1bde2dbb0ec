//! SIP message model and codec: URIs, the RFC 3261 header grammar, the
//! byte-level message framer, request/response views, dialog-aware
//! request builders, and request validation.

pub mod builder;
pub mod endpoint;
pub mod error;
pub mod escape;
pub mod headers;
pub mod message;
pub mod params;
pub mod request;
pub mod response;
pub mod tokenizer;
pub mod transport;
pub mod uri;
pub mod validation;

pub mod prelude {
    pub use crate::builder::{
        build_ack, build_basic_request, build_bye, build_cancel, build_ok_to_bye_or_cancel, build_ok_to_invite,
    };
    pub use crate::endpoint::SipEndpoint;
    pub use crate::error::{Error, HeaderField, Result};
    pub use crate::headers::method::Method;
    pub use crate::headers::SipHeaders;
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use crate::transport::Protocol;
    pub use crate::uri::{parse_uri, serialize_uri, Host, Scheme, Uri};
    pub use crate::validation::validate_request;
    pub use crate::{parse_request, parse_response, serialize_request, serialize_response};
}

pub use error::{Error, Result};
pub use request::Request;
pub use response::Response;

/// Parse a request from raw bytes (spec §6.5).
pub fn parse_request(buf: &[u8]) -> Result<Request> {
    Request::parse(buf)
}

/// Parse a response from raw bytes (spec §6.5).
pub fn parse_response(buf: &[u8]) -> Result<Response> {
    Response::parse(buf)
}

/// Serialize a request to its wire bytes (spec §6.5); delegates to its
/// `Display` impl. `serialize_request(parse_request(b)) == b` for any
/// well-formed `b` this crate produced itself.
pub fn serialize_request(request: &Request) -> Vec<u8> {
    request.to_string().into_bytes()
}

/// Serialize a response to its wire bytes (spec §6.5).
pub fn serialize_response(response: &Response) -> Vec<u8> {
    response.to_string().into_bytes()
}

/// Serialize a URI (spec §6.5); delegates to its `Display` impl.
pub fn serialize_uri(uri: &uri::Uri) -> String {
    uri.to_string()
}

/// Parse a URI (spec §6.5).
pub fn parse_uri(input: &str) -> Result<uri::Uri> {
    uri::parse_uri(input)
}

/// Validate a parsed request against the mandatory-header invariants
/// (spec §3.4/§7).
pub fn validate_request(request: &Request) -> Result<()> {
    validation::validate_request(request)
}
