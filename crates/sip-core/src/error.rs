use thiserror::Error;

/// A type alias for handling `Result`s with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The field a [`Error::HeaderValidation`] failure is attributed to.
///
/// Mirrors the closed set named in the validation rules for requests: a
/// missing or malformed occurrence of any of these aborts decoding or
/// validation, while every other header is best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    Via,
    CSeq,
    CallId,
    From,
    To,
    ContentLength,
    MaxForwards,
    Expires,
    SipVersion,
    Uri,
    ContactHeader,
    RouteHeader,
    ReferToHeader,
    PAssertedIdentityHeader,
    PPreferredIdentityHeader,
    ContentType,
}

impl std::fmt::Display for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HeaderField::Via => "Via",
            HeaderField::CSeq => "CSeq",
            HeaderField::CallId => "Call-ID",
            HeaderField::From => "From",
            HeaderField::To => "To",
            HeaderField::ContentLength => "Content-Length",
            HeaderField::MaxForwards => "Max-Forwards",
            HeaderField::Expires => "Expires",
            HeaderField::SipVersion => "SIP-Version",
            HeaderField::Uri => "URI",
            HeaderField::ContactHeader => "Contact",
            HeaderField::RouteHeader => "Route",
            HeaderField::ReferToHeader => "Refer-To",
            HeaderField::PAssertedIdentityHeader => "P-Asserted-Identity",
            HeaderField::PPreferredIdentityHeader => "P-Preferred-Identity",
            HeaderField::ContentType => "Content-Type",
        };
        f.write_str(name)
    }
}

/// Errors produced while decoding, validating, or building SIP messages.
///
/// The taxonomy follows the error kinds named for this core: each variant
/// denotes a *kind* of failure, not a wrapped foreign type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Buffer exceeded the 200,000-byte wire limit.
    #[error("message exceeds the maximum buffer size of {max} bytes (got {actual})")]
    MessageTooLarge { max: usize, actual: usize },

    /// First line does not contain `SIP`.
    #[error("input is not a SIP message")]
    NotSip,

    /// Request line or status line could not be parsed.
    #[error("malformed first line: {0}")]
    MalformedFirstLine(String),

    /// A required header failed to parse or is absent when required.
    #[error("header validation failed for {field}: {reason}")]
    HeaderValidation { field: HeaderField, reason: String },

    /// URI scheme is not one of the supported schemes.
    #[error("unsupported URI scheme: {0}")]
    UnsupportedUriScheme(String),

    /// Generic malformed input, used for URI components, parameters, etc.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reserved for symmetry with the SRTP error taxonomy; SIP decoding
    /// never authenticates anything, so this is never constructed today.
    #[error("unauthenticated")]
    Unauthenticated,
}

impl Error {
    pub fn header(field: HeaderField, reason: impl Into<String>) -> Self {
        Error::HeaderValidation { field, reason: reason.into() }
    }
}
