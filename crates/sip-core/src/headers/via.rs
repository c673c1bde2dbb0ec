//! Via header (spec §4.7): `SIP/2.0/<TRANSPORT> sent-by[;params]`.
//!
//! The Via *set* on a message is an ordered stack; index 0 is the most
//! recently inserted (top), matching a request's path from the
//! originator outward.

use std::fmt;
use std::str::FromStr;

use crate::endpoint::SipEndpoint;
use crate::error::{Error, HeaderField, Result};
use crate::params::ParamMap;
use crate::transport::Protocol;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Via {
    pub protocol: Protocol,
    pub sent_by_host: String,
    pub sent_by_port: Option<u16>,
    pub params: ParamMap,
}

impl Via {
    pub fn new(protocol: Protocol, sent_by_host: impl Into<String>) -> Self {
        Via { protocol, sent_by_host: sent_by_host.into(), sent_by_port: None, params: ParamMap::new() }
    }

    pub fn branch(&self) -> Option<&str> {
        self.params.get("branch").flatten()
    }

    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.params.insert("branch", Some(branch.into()));
    }

    pub fn has_rport_request(&self) -> bool {
        matches!(self.params.get("rport"), Some(None))
    }

    /// Fill in `received`/`rport` from the transport-observed source
    /// address, per spec §4.7.
    pub fn fixup_received(&mut self, source: &SipEndpoint) {
        if self.sent_by_host != source.ip_address.to_string() {
            self.params.insert("received", Some(source.ip_address.to_string()));
        }
        if self.has_rport_request() {
            self.params.insert("rport", Some(source.port.to_string()));
        }
    }

    /// Parse one Via segment (already split on top-level commas by the
    /// header parser).
    pub fn parse(input: &str) -> Result<Via> {
        let input = input.trim();
        let rest = input
            .strip_prefix("SIP/2.0/")
            .ok_or_else(|| Error::header(HeaderField::Via, format!("missing SIP/2.0/<transport>: {input:?}")))?;

        let space = rest
            .find(|c: char| c.is_whitespace())
            .ok_or_else(|| Error::header(HeaderField::Via, "missing sent-by after transport".into()))?;
        let transport = &rest[..space];
        let protocol = Protocol::from_str(transport)
            .map_err(|_| Error::header(HeaderField::Via, format!("unknown Via transport: {transport}")))?;

        let remainder = rest[space..].trim_start();
        // sent-by ends at the first ';' if present. Tolerate `branch`
        // appearing after a bare space with no leading ';' by treating
        // that space as the separator too.
        let (sent_by, param_str) = match remainder.find(';') {
            Some(idx) => (&remainder[..idx], &remainder[idx + 1..]),
            None => {
                // Tolerate a bare space before "branch=..." with no ';'.
                if let Some(idx) = remainder.find(" branch=") {
                    (&remainder[..idx], &remainder[idx + 1..])
                } else {
                    (remainder, "")
                }
            }
        };
        let remainder = sent_by;

        let (host, port) = match remainder.rsplit_once(':') {
            Some((h, p)) if p.chars().all(|c| c.is_ascii_digit()) && !p.is_empty() => {
                (h.to_string(), Some(p.parse::<u16>().map_err(|_| {
                    Error::header(HeaderField::Via, format!("invalid Via port: {p}"))
                })?))
            }
            _ => (remainder.to_string(), None),
        };

        let params = ParamMap::parse_semicolon(param_str)
            .map_err(|e| Error::header(HeaderField::Via, e.to_string()))?;

        Ok(Via { protocol, sent_by_host: host, sent_by_port: port, params })
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIP/2.0/{} {}", self.protocol, self.sent_by_host)?;
        if let Some(port) = self.sent_by_port {
            write!(f, ":{port}")?;
        }
        if !self.params.is_empty() {
            write!(f, ";{}", self.params.to_semicolon_string())?;
        }
        Ok(())
    }
}

/// The ordered Via stack on a message; `top()` is index 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ViaSet {
    entries: Vec<Via>,
}

impl ViaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new Via onto the top of the set (this is what a forwarding
    /// element does when adding its own Via).
    pub fn push_top(&mut self, via: Via) {
        self.entries.insert(0, via);
    }

    pub fn top(&self) -> Option<&Via> {
        self.entries.first()
    }

    pub fn top_mut(&mut self) -> Option<&mut Via> {
        self.entries.first_mut()
    }

    pub fn pop_top(&mut self) -> Option<Via> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Via> {
        self.entries.iter()
    }

    pub fn parse_header_value(input: &str) -> Result<Vec<Via>> {
        crate::tokenizer::split_top_level(input, ',')
            .into_iter()
            .map(Via::parse)
            .collect()
    }
}

impl fmt::Display for ViaSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.entries.iter().map(|v| v.to_string()).collect();
        f.write_str(&rendered.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn parses_branch_and_transport() {
        let via = Via::parse("SIP/2.0/UDP 10.0.0.1:5060;branch=z9hG4bK-abc").unwrap();
        assert_eq!(via.protocol, Protocol::Udp);
        assert_eq!(via.sent_by_host, "10.0.0.1");
        assert_eq!(via.sent_by_port, Some(5060));
        assert_eq!(via.branch(), Some("z9hG4bK-abc"));
    }

    #[test]
    fn push_top_and_pop_reverse_order() {
        let mut set = ViaSet::new();
        for i in 0..3 {
            set.push_top(Via::new(Protocol::Udp, format!("host{i}")));
        }
        // last pushed is at the top
        assert_eq!(set.top().unwrap().sent_by_host, "host2");
        let order: Vec<_> = (0..3).map(|_| set.pop_top().unwrap().sent_by_host).collect();
        assert_eq!(order, vec!["host2", "host1", "host0"]);
    }

    #[test]
    fn rport_and_received_fixup() {
        let mut via = Via::parse("SIP/2.0/UDP 192.168.1.5:5060;branch=z9hG4bK1;rport").unwrap();
        assert!(via.has_rport_request());
        let source = SipEndpoint::new(Protocol::Udp, IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9)), 34567);
        via.fixup_received(&source);
        assert_eq!(via.params.get("received"), Some(Some("203.0.113.9")));
        assert_eq!(via.params.get("rport"), Some(Some("34567")));
    }

    #[test]
    fn display_round_trips() {
        let text = "SIP/2.0/UDP 10.0.0.1:5060;branch=z9hG4bK-abc";
        let via = Via::parse(text).unwrap();
        assert_eq!(via.to_string(), text);
    }
}
