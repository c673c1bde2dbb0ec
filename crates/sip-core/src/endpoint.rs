//! Endpoint descriptor (spec §3.3): the opaque network identity a
//! transport hands the message codec, and that the message codec hands
//! back for Via `received`/`rport` fix-up.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::transport::Protocol;

/// Protocol + address + port, with optional transport-specific channel
/// identifiers. Conceptually immutable.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SipEndpoint {
    pub protocol: Protocol,
    pub ip_address: IpAddr,
    pub port: u16,
    /// Opaque transport-layer channel identifier (e.g. a WS connection id).
    pub channel_id: Option<String>,
    /// Opaque connection identifier (e.g. a TCP socket id), distinct from
    /// `channel_id` because a single channel can outlive several
    /// connections on some transports.
    pub connection_id: Option<String>,
}

impl SipEndpoint {
    pub fn new(protocol: Protocol, ip_address: IpAddr, port: u16) -> Self {
        let ip_address = normalize_ip(ip_address);
        let port = if port == 0 { protocol.default_port() } else { port };
        SipEndpoint { protocol, ip_address, port, channel_id: None, connection_id: None }
    }

    pub fn with_channel_id(mut self, id: impl Into<String>) -> Self {
        self.channel_id = Some(id.into());
        self
    }

    pub fn with_connection_id(mut self, id: impl Into<String>) -> Self {
        self.connection_id = Some(id.into());
        self
    }
}

/// IPv4-mapped IPv6 addresses normalize to plain IPv4 (spec §3.3).
fn normalize_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        other => other,
    }
}

impl fmt::Display for SipEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip_address {
            IpAddr::V4(v4) => write!(f, "{}/{}:{}", self.protocol, v4, self.port),
            IpAddr::V6(v6) => write!(f, "{}/[{}]:{}", self.protocol, v6, self.port),
        }
    }
}

/// Equality compares protocol, address, and port; channel/connection
/// identifiers participate only when both sides set them (spec §3.3).
impl PartialEq for SipEndpoint {
    fn eq(&self, other: &Self) -> bool {
        if self.protocol != other.protocol || self.ip_address != other.ip_address || self.port != other.port {
            return false;
        }
        if let (Some(a), Some(b)) = (&self.channel_id, &other.channel_id) {
            if a != b {
                return false;
            }
        }
        if let (Some(a), Some(b)) = (&self.connection_id, &other.connection_id) {
            if a != b {
                return false;
            }
        }
        true
    }
}
impl Eq for SipEndpoint {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_port_defaults_per_protocol() {
        let ep = SipEndpoint::new(Protocol::Udp, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 0);
        assert_eq!(ep.port, 5060);
        let ep = SipEndpoint::new(Protocol::Tls, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 0);
        assert_eq!(ep.port, 5061);
    }

    #[test]
    fn ipv4_mapped_ipv6_normalizes() {
        let mapped = Ipv6Addr::new(0, 0, 0, 0, 0, 0xFFFF, 0x0A00, 0x0001);
        let ep = SipEndpoint::new(Protocol::Udp, IpAddr::V6(mapped), 5060);
        assert_eq!(ep.ip_address, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn equality_ignores_unset_channel_id() {
        let a = SipEndpoint::new(Protocol::Udp, IpAddr::V4(Ipv4Addr::LOCALHOST), 5060);
        let b = a.clone().with_channel_id("abc");
        assert_eq!(a, b);
    }

    #[test]
    fn equality_compares_channel_id_when_both_set() {
        let a = SipEndpoint::new(Protocol::Udp, IpAddr::V4(Ipv4Addr::LOCALHOST), 5060).with_channel_id("x");
        let b = SipEndpoint::new(Protocol::Udp, IpAddr::V4(Ipv4Addr::LOCALHOST), 5060).with_channel_id("y");
        assert_ne!(a, b);
    }
}
