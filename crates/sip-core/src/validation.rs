//! Request validation (spec §3.4/§7): a request is well-formed only if
//! its mandatory headers are present and mutually consistent.

use crate::error::{Error, HeaderField, Result};
use crate::request::Request;

/// Upper bound on Max-Forwards (spec §3.4).
pub const MAX_FORWARDS_CEILING: u32 = 70;

/// Validate a parsed request against spec §3.4's invariant list. Returns
/// the first violation found; callers that need every violation should
/// call the individual checks directly.
pub fn validate_request(request: &Request) -> Result<()> {
    if request.headers.via.is_empty() {
        return Err(Error::header(HeaderField::Via, "at least one Via is required".into()));
    }

    if let Some(max_forwards) = request.headers.max_forwards {
        if max_forwards > MAX_FORWARDS_CEILING {
            return Err(Error::header(
                HeaderField::MaxForwards,
                format!("Max-Forwards {max_forwards} exceeds the ceiling of {MAX_FORWARDS_CEILING}"),
            ));
        }
    }

    match &request.headers.call_id {
        Some(call_id) if !call_id.is_empty() => {}
        _ => return Err(Error::header(HeaderField::CallId, "Call-ID must be present and non-empty".into())),
    }

    if request.headers.from.is_none() {
        return Err(Error::header(HeaderField::From, "From is required".into()));
    }
    if request.headers.to.is_none() {
        return Err(Error::header(HeaderField::To, "To is required".into()));
    }

    if request.version != "SIP/2.0" {
        return Err(Error::header(
            HeaderField::SipVersion,
            format!("unsupported SIP version: {}", request.version),
        ));
    }

    let cseq = request
        .headers
        .cseq
        .as_ref()
        .ok_or_else(|| Error::header(HeaderField::CSeq, "CSeq is required".into()))?;
    if cseq.method != request.method {
        return Err(Error::header(
            HeaderField::CSeq,
            format!("CSeq method {} does not match request method {}", cseq.method, request.method),
        ));
    }

    if request.headers.content_length_or_default() > 0 && request.headers.content_type.is_none() {
        return Err(Error::header(
            HeaderField::ContentType,
            "Content-Type is required when Content-Length > 0".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_invite() -> Request {
        let raw = b"INVITE sip:bob@biloxi.com SIP/2.0\r\nVia: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\nMax-Forwards: 70\r\nTo: Bob <sip:bob@biloxi.com>\r\nFrom: Alice <sip:alice@atlanta.com>;tag=1928301774\r\nCall-ID: a84b4c76e66710@pc33.atlanta.com\r\nCSeq: 314159 INVITE\r\nContact: <sip:alice@pc33.atlanta.com>\r\nContent-Length: 0\r\n\r\n";
        Request::parse(raw).unwrap()
    }

    #[test]
    fn accepts_well_formed_request() {
        assert!(validate_request(&valid_invite()).is_ok());
    }

    #[test]
    fn rejects_max_forwards_above_ceiling() {
        let mut request = valid_invite();
        request.headers.max_forwards = Some(71);
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn rejects_cseq_method_mismatch() {
        let mut request = valid_invite();
        request.headers.cseq.as_mut().unwrap().method = crate::headers::method::Method::Bye;
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn rejects_missing_via() {
        let mut request = valid_invite();
        request.headers.via = Default::default();
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn rejects_nonzero_content_length_without_content_type() {
        let mut request = valid_invite();
        request.headers.content_length = Some(10);
        request.headers.content_type = None;
        assert!(validate_request(&request).is_err());
    }
}
