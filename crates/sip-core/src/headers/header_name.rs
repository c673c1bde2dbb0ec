//! Known-header table, including the compact-form aliases accepted on
//! input (spec §6.1).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderName {
    Via,
    CallId,
    Contact,
    ContentLength,
    ContentType,
    Event,
    From,
    ReferTo,
    Subject,
    Supported,
    To,
    AllowEvents,
    CSeq,
    MaxForwards,
    Expires,
    MinExpires,
    Route,
    RecordRoute,
    CallInfo,
    Geolocation,
    GeolocationRouting,
    GeolocationError,
    WwwAuthenticate,
    Authorization,
    ProxyAuthenticate,
    ProxyAuthorization,
    PAssertedIdentity,
    PPreferredIdentity,
    ReferSub,
    ReferredBy,
    Reason,
    ResourcePriority,
    SubscriptionState,
    Accept,
    Allow,
}

impl HeaderName {
    /// Look up a header name as it appears on the wire, including compact
    /// aliases (`v,i,m,l,c,o,f,r,s,k,t,u`), case-insensitively.
    pub fn from_wire(name: &str) -> Option<HeaderName> {
        let lower = name.to_ascii_lowercase();
        Some(match lower.as_str() {
            "via" | "v" => HeaderName::Via,
            "call-id" | "i" => HeaderName::CallId,
            "contact" | "m" => HeaderName::Contact,
            "content-length" | "l" => HeaderName::ContentLength,
            "content-type" | "c" => HeaderName::ContentType,
            "event" | "o" => HeaderName::Event,
            "from" | "f" => HeaderName::From,
            "refer-to" | "r" => HeaderName::ReferTo,
            "subject" | "s" => HeaderName::Subject,
            "supported" | "k" => HeaderName::Supported,
            "to" | "t" => HeaderName::To,
            "allow-events" | "u" => HeaderName::AllowEvents,
            "cseq" => HeaderName::CSeq,
            "max-forwards" => HeaderName::MaxForwards,
            "expires" => HeaderName::Expires,
            "min-expires" => HeaderName::MinExpires,
            "route" => HeaderName::Route,
            "record-route" => HeaderName::RecordRoute,
            "call-info" => HeaderName::CallInfo,
            "geolocation" => HeaderName::Geolocation,
            "geolocation-routing" => HeaderName::GeolocationRouting,
            "geolocation-error" => HeaderName::GeolocationError,
            "www-authenticate" => HeaderName::WwwAuthenticate,
            "authorization" => HeaderName::Authorization,
            "proxy-authenticate" => HeaderName::ProxyAuthenticate,
            "proxy-authorization" => HeaderName::ProxyAuthorization,
            "p-asserted-identity" => HeaderName::PAssertedIdentity,
            "p-preferred-identity" => HeaderName::PPreferredIdentity,
            "refer-sub" => HeaderName::ReferSub,
            "referred-by" => HeaderName::ReferredBy,
            "reason" => HeaderName::Reason,
            "resource-priority" => HeaderName::ResourcePriority,
            "subscription-state" => HeaderName::SubscriptionState,
            "accept" => HeaderName::Accept,
            "allow" => HeaderName::Allow,
            _ => return None,
        })
    }

    /// Canonical casing used when serializing (spec §8.1 invariant 1).
    pub fn canonical(self) -> &'static str {
        match self {
            HeaderName::Via => "Via",
            HeaderName::CallId => "Call-ID",
            HeaderName::Contact => "Contact",
            HeaderName::ContentLength => "Content-Length",
            HeaderName::ContentType => "Content-Type",
            HeaderName::Event => "Event",
            HeaderName::From => "From",
            HeaderName::ReferTo => "Refer-To",
            HeaderName::Subject => "Subject",
            HeaderName::Supported => "Supported",
            HeaderName::To => "To",
            HeaderName::AllowEvents => "Allow-Events",
            HeaderName::CSeq => "CSeq",
            HeaderName::MaxForwards => "Max-Forwards",
            HeaderName::Expires => "Expires",
            HeaderName::MinExpires => "Min-Expires",
            HeaderName::Route => "Route",
            HeaderName::RecordRoute => "Record-Route",
            HeaderName::CallInfo => "Call-Info",
            HeaderName::Geolocation => "Geolocation",
            HeaderName::GeolocationRouting => "Geolocation-Routing",
            HeaderName::GeolocationError => "Geolocation-Error",
            HeaderName::WwwAuthenticate => "WWW-Authenticate",
            HeaderName::Authorization => "Authorization",
            HeaderName::ProxyAuthenticate => "Proxy-Authenticate",
            HeaderName::ProxyAuthorization => "Proxy-Authorization",
            HeaderName::PAssertedIdentity => "P-Asserted-Identity",
            HeaderName::PPreferredIdentity => "P-Preferred-Identity",
            HeaderName::ReferSub => "Refer-Sub",
            HeaderName::ReferredBy => "Referred-By",
            HeaderName::Reason => "Reason",
            HeaderName::ResourcePriority => "Resource-Priority",
            HeaderName::SubscriptionState => "Subscription-State",
            HeaderName::Accept => "Accept",
            HeaderName::Allow => "Allow",
        }
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_aliases_resolve() {
        assert_eq!(HeaderName::from_wire("v"), Some(HeaderName::Via));
        assert_eq!(HeaderName::from_wire("i"), Some(HeaderName::CallId));
        assert_eq!(HeaderName::from_wire("m"), Some(HeaderName::Contact));
        assert_eq!(HeaderName::from_wire("l"), Some(HeaderName::ContentLength));
        assert_eq!(HeaderName::from_wire("c"), Some(HeaderName::ContentType));
        assert_eq!(HeaderName::from_wire("o"), Some(HeaderName::Event));
        assert_eq!(HeaderName::from_wire("f"), Some(HeaderName::From));
        assert_eq!(HeaderName::from_wire("r"), Some(HeaderName::ReferTo));
        assert_eq!(HeaderName::from_wire("s"), Some(HeaderName::Subject));
        assert_eq!(HeaderName::from_wire("k"), Some(HeaderName::Supported));
        assert_eq!(HeaderName::from_wire("t"), Some(HeaderName::To));
        assert_eq!(HeaderName::from_wire("u"), Some(HeaderName::AllowEvents));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(HeaderName::from_wire("ViA"), Some(HeaderName::Via));
    }
}
