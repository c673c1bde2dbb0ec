//! The SIP header model (spec §3.4): one typed field per structured
//! header this crate names, a handful of untyped text fields for the
//! rest of RFC 3261 §20, and an `unknown` catch-all list so nothing on
//! the wire is ever silently dropped.

pub mod auth;
pub mod common;
pub mod contact;
pub mod cseq;
pub mod from_to;
pub mod header_name;
pub mod method;
pub mod route;
pub mod via;

use std::fmt;

use crate::error::{Error, HeaderField, Result};
use crate::headers::auth::{AuthKind, DigestAuth};
use crate::headers::common::{ContentType, TextHeaders};
use crate::headers::contact::{ContactList, UriWithParams};
use crate::headers::cseq::CSeq;
use crate::headers::from_to::FromTo;
use crate::headers::header_name::HeaderName;
use crate::headers::route::RouteSet;
use crate::headers::via::ViaSet;

/// One raw `name: value` header line as found on the wire, preserved for
/// headers this crate does not model structurally.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawHeader {
    pub name: String,
    pub value: String,
}

/// The full set of headers parsed from a message (spec §3.4/§4.5).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SipHeaders {
    pub via: ViaSet,
    pub from: Option<FromTo>,
    pub to: Option<FromTo>,
    pub call_id: Option<String>,
    pub cseq: Option<CSeq>,
    pub max_forwards: Option<u32>,
    pub content_length: Option<u32>,
    pub expires: Option<u32>,
    pub min_expires: Option<u32>,
    pub content_type: Option<ContentType>,
    pub contact: Option<ContactList>,
    pub route: Option<RouteSet>,
    pub record_route: Option<RouteSet>,
    pub call_info: Option<Vec<UriWithParams>>,
    pub geolocation: Option<Vec<UriWithParams>>,
    pub refer_to: Option<UriWithParams>,
    pub p_asserted_identity: Option<Vec<FromTo>>,
    pub p_preferred_identity: Option<Vec<FromTo>>,
    pub www_authenticate: Option<DigestAuth>,
    pub authorization: Option<DigestAuth>,
    pub proxy_authenticate: Option<DigestAuth>,
    pub proxy_authorization: Option<DigestAuth>,
    pub text: TextHeaders,
    /// Headers not recognized by `HeaderName::from_wire`, in wire order.
    pub unknown: Vec<RawHeader>,
}

impl SipHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decoded `name: value` line into the model, dispatching by
    /// `HeaderName` (spec §4.5). Multiplicity-respecting headers (Via,
    /// Route, Record-Route) accumulate across repeated occurrences;
    /// singleton headers are overwritten by a later occurrence, matching
    /// the teacher's last-one-wins behavior for non-list headers.
    pub fn fold_header(&mut self, name: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match HeaderName::from_wire(name) {
            Some(HeaderName::Via) => {
                for via in ViaSet::parse_header_value(value)? {
                    self.via.push_top(via);
                }
            }
            Some(HeaderName::From) => self.from = Some(FromTo::parse(value, HeaderField::From)?),
            Some(HeaderName::To) => self.to = Some(FromTo::parse(value, HeaderField::To)?),
            Some(HeaderName::CallId) => self.call_id = Some(value.to_string()),
            Some(HeaderName::CSeq) => self.cseq = Some(CSeq::parse(value)?),
            Some(HeaderName::MaxForwards) => {
                self.max_forwards = Some(value.parse().map_err(|_| {
                    Error::header(HeaderField::MaxForwards, format!("non-numeric Max-Forwards: {value}"))
                })?)
            }
            Some(HeaderName::ContentLength) => {
                self.content_length = Some(value.parse().map_err(|_| {
                    Error::header(HeaderField::ContentLength, format!("non-numeric Content-Length: {value}"))
                })?)
            }
            Some(HeaderName::ContentType) => self.content_type = Some(ContentType::parse(value)?),
            Some(HeaderName::Contact) => self.contact = Some(ContactList::parse_header_value(value)?),
            Some(HeaderName::Route) => {
                let incoming = RouteSet::parse_header_value(value)?;
                let set = self.route.get_or_insert_with(RouteSet::new);
                for entry in incoming.iter() {
                    set.push_back(entry.clone());
                }
            }
            Some(HeaderName::RecordRoute) => {
                let incoming = RouteSet::parse_header_value(value)?;
                let set = self.record_route.get_or_insert_with(RouteSet::new);
                for entry in incoming.iter() {
                    set.push_back(entry.clone());
                }
            }
            Some(HeaderName::CallInfo) => self.call_info = Some(UriWithParams::parse_list(value)?),
            Some(HeaderName::Geolocation) => self.geolocation = Some(UriWithParams::parse_list(value)?),
            Some(HeaderName::ReferTo) => {
                self.refer_to = Some(UriWithParams::parse(value).map_err(|e| {
                    Error::header(HeaderField::ReferToHeader, e.to_string())
                })?)
            }
            Some(HeaderName::PAssertedIdentity) => {
                let entries = crate::tokenizer::split_top_level(value, ',')
                    .into_iter()
                    .map(|s| FromTo::parse(s, HeaderField::PAssertedIdentityHeader))
                    .collect::<Result<Vec<_>>>()?;
                self.p_asserted_identity = Some(entries);
            }
            Some(HeaderName::PPreferredIdentity) => {
                let entries = crate::tokenizer::split_top_level(value, ',')
                    .into_iter()
                    .map(|s| FromTo::parse(s, HeaderField::PPreferredIdentityHeader))
                    .collect::<Result<Vec<_>>>()?;
                self.p_preferred_identity = Some(entries);
            }
            Some(HeaderName::WwwAuthenticate) => {
                self.www_authenticate = Some(DigestAuth::parse(value, AuthKind::WwwAuthenticate)?)
            }
            Some(HeaderName::Authorization) => {
                self.authorization = Some(DigestAuth::parse(value, AuthKind::Authorization)?)
            }
            Some(HeaderName::ProxyAuthenticate) => {
                self.proxy_authenticate = Some(DigestAuth::parse(value, AuthKind::ProxyAuthenticate)?)
            }
            Some(HeaderName::ProxyAuthorization) => {
                self.proxy_authorization = Some(DigestAuth::parse(value, AuthKind::ProxyAuthorization)?)
            }
            Some(HeaderName::Event) => self.text.event = Some(value.to_string()),
            Some(HeaderName::Subject) => self.text.subject = Some(value.to_string()),
            Some(HeaderName::Supported) => self.text.supported = Some(value.to_string()),
            Some(HeaderName::AllowEvents) => self.text.allow_events = Some(value.to_string()),
            Some(HeaderName::Expires) => {
                self.expires = Some(value.parse().map_err(|_| {
                    Error::header(HeaderField::Expires, format!("non-numeric Expires: {value}"))
                })?)
            }
            Some(HeaderName::MinExpires) => {
                self.min_expires = Some(value.parse().map_err(|_| {
                    Error::header(HeaderField::Expires, format!("non-numeric Min-Expires: {value}"))
                })?)
            }
            Some(HeaderName::ReferSub) => self.text.refer_sub = Some(value.to_string()),
            Some(HeaderName::ReferredBy) => self.text.referred_by = Some(value.to_string()),
            Some(HeaderName::Reason) => self.text.reason = Some(value.to_string()),
            Some(HeaderName::ResourcePriority) => self.text.resource_priority = Some(value.to_string()),
            Some(HeaderName::SubscriptionState) => self.text.subscription_state = Some(value.to_string()),
            Some(HeaderName::GeolocationRouting) => self.text.geolocation_routing = Some(value.to_string()),
            Some(HeaderName::GeolocationError) => self.text.geolocation_error = Some(value.to_string()),
            Some(HeaderName::Accept) => self.text.accept = Some(value.to_string()),
            Some(HeaderName::Allow) => self.text.allow = Some(value.to_string()),
            None => {
                tracing::trace!(header = name, "unrecognized header, preserved verbatim");
                self.unknown.push(RawHeader { name: name.to_string(), value: value.to_string() });
            }
        }
        Ok(())
    }

    /// Effective Content-Length: explicit header value, or 0 when absent
    /// (spec §3.4 default).
    pub fn content_length_or_default(&self) -> u32 {
        self.content_length.unwrap_or(0)
    }
}

/// Render the full header block, one canonical `Name: value` CRLF line
/// per populated field, followed by unknown headers in wire order (spec
/// §6.5/§8.1 invariant 1). Does not emit the terminating blank line.
impl fmt::Display for SipHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! line {
            ($name:expr, $val:expr) => {
                write!(f, "{}: {}\r\n", $name, $val)?;
            };
        }

        if !self.via.is_empty() {
            line!(HeaderName::Via.canonical(), self.via);
        }
        if let Some(from) = &self.from {
            line!(HeaderName::From.canonical(), from);
        }
        if let Some(to) = &self.to {
            line!(HeaderName::To.canonical(), to);
        }
        if let Some(call_id) = &self.call_id {
            line!(HeaderName::CallId.canonical(), call_id);
        }
        if let Some(cseq) = &self.cseq {
            line!(HeaderName::CSeq.canonical(), cseq);
        }
        if let Some(max_forwards) = self.max_forwards {
            line!(HeaderName::MaxForwards.canonical(), max_forwards);
        }
        if let Some(content_type) = &self.content_type {
            line!(HeaderName::ContentType.canonical(), content_type);
        }
        if let Some(contact) = &self.contact {
            line!(HeaderName::Contact.canonical(), contact);
        }
        if let Some(route) = &self.route {
            if !route.is_empty() {
                line!(HeaderName::Route.canonical(), route);
            }
        }
        if let Some(record_route) = &self.record_route {
            if !record_route.is_empty() {
                line!(HeaderName::RecordRoute.canonical(), record_route);
            }
        }
        if let Some(call_info) = &self.call_info {
            let rendered: Vec<String> = call_info.iter().map(|e| e.to_string()).collect();
            line!(HeaderName::CallInfo.canonical(), rendered.join(","));
        }
        if let Some(geolocation) = &self.geolocation {
            let rendered: Vec<String> = geolocation.iter().map(|e| e.to_string()).collect();
            line!(HeaderName::Geolocation.canonical(), rendered.join(","));
        }
        if let Some(refer_to) = &self.refer_to {
            line!(HeaderName::ReferTo.canonical(), refer_to);
        }
        if let Some(pai) = &self.p_asserted_identity {
            let rendered: Vec<String> = pai.iter().map(|e| e.to_string()).collect();
            line!(HeaderName::PAssertedIdentity.canonical(), rendered.join(","));
        }
        if let Some(ppi) = &self.p_preferred_identity {
            let rendered: Vec<String> = ppi.iter().map(|e| e.to_string()).collect();
            line!(HeaderName::PPreferredIdentity.canonical(), rendered.join(","));
        }
        if let Some(auth) = &self.www_authenticate {
            line!(auth.header_name(), auth);
        }
        if let Some(auth) = &self.authorization {
            line!(auth.header_name(), auth);
        }
        if let Some(auth) = &self.proxy_authenticate {
            line!(auth.header_name(), auth);
        }
        if let Some(auth) = &self.proxy_authorization {
            line!(auth.header_name(), auth);
        }
        if let Some(event) = &self.text.event {
            line!(HeaderName::Event.canonical(), event);
        }
        if let Some(subject) = &self.text.subject {
            line!(HeaderName::Subject.canonical(), subject);
        }
        if let Some(supported) = &self.text.supported {
            line!(HeaderName::Supported.canonical(), supported);
        }
        if let Some(allow_events) = &self.text.allow_events {
            line!(HeaderName::AllowEvents.canonical(), allow_events);
        }
        if let Some(expires) = self.expires {
            line!(HeaderName::Expires.canonical(), expires);
        }
        if let Some(min_expires) = self.min_expires {
            line!(HeaderName::MinExpires.canonical(), min_expires);
        }
        if let Some(refer_sub) = &self.text.refer_sub {
            line!(HeaderName::ReferSub.canonical(), refer_sub);
        }
        if let Some(referred_by) = &self.text.referred_by {
            line!(HeaderName::ReferredBy.canonical(), referred_by);
        }
        if let Some(reason) = &self.text.reason {
            line!(HeaderName::Reason.canonical(), reason);
        }
        if let Some(resource_priority) = &self.text.resource_priority {
            line!(HeaderName::ResourcePriority.canonical(), resource_priority);
        }
        if let Some(subscription_state) = &self.text.subscription_state {
            line!(HeaderName::SubscriptionState.canonical(), subscription_state);
        }
        if let Some(geolocation_routing) = &self.text.geolocation_routing {
            line!(HeaderName::GeolocationRouting.canonical(), geolocation_routing);
        }
        if let Some(geolocation_error) = &self.text.geolocation_error {
            line!(HeaderName::GeolocationError.canonical(), geolocation_error);
        }
        if let Some(accept) = &self.text.accept {
            line!(HeaderName::Accept.canonical(), accept);
        }
        if let Some(allow) = &self.text.allow {
            line!(HeaderName::Allow.canonical(), allow);
        }
        // Content-Length is emitted by the message serializer, after the
        // body length is known, so it is intentionally not written here.
        for raw in &self.unknown {
            line!(raw.name, raw.value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_via_alias_accumulates_into_stack() {
        let mut headers = SipHeaders::new();
        headers.fold_header("v", "SIP/2.0/UDP host1;branch=z9hG4bK1").unwrap();
        headers.fold_header("Via", "SIP/2.0/UDP host2;branch=z9hG4bK2").unwrap();
        assert_eq!(headers.via.len(), 2);
        assert_eq!(headers.via.top().unwrap().sent_by_host, "host2");
    }

    #[test]
    fn unknown_header_preserved_verbatim() {
        let mut headers = SipHeaders::new();
        headers.fold_header("X-Custom", "value").unwrap();
        assert_eq!(headers.unknown.len(), 1);
        assert_eq!(headers.unknown[0].name, "X-Custom");
    }

    #[test]
    fn content_length_defaults_to_zero() {
        let headers = SipHeaders::new();
        assert_eq!(headers.content_length_or_default(), 0);
    }

    #[test]
    fn route_header_repeated_occurrences_accumulate() {
        let mut headers = SipHeaders::new();
        headers.fold_header("Route", "<sip:p1@h1>;lr").unwrap();
        headers.fold_header("Route", "<sip:p2@h2>;lr").unwrap();
        assert_eq!(headers.route.unwrap().len(), 2);
    }

    #[test]
    fn expires_parses_as_integer() {
        let mut headers = SipHeaders::new();
        headers.fold_header("Expires", "3600").unwrap();
        headers.fold_header("Min-Expires", "60").unwrap();
        assert_eq!(headers.expires, Some(3600));
        assert_eq!(headers.min_expires, Some(60));
    }

    #[test]
    fn non_numeric_expires_is_rejected() {
        let mut headers = SipHeaders::new();
        assert!(headers.fold_header("Expires", "soon").is_err());
    }

    #[test]
    fn display_renders_populated_fields_as_header_lines() {
        let mut headers = SipHeaders::new();
        headers.fold_header("Call-ID", "abc123").unwrap();
        headers.fold_header("Expires", "3600").unwrap();
        let rendered = headers.to_string();
        assert!(rendered.contains("Call-ID: abc123\r\n"));
        assert!(rendered.contains("Expires: 3600\r\n"));
    }
}
