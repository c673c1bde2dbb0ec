//! The one transport-protocol enum in this crate, shared by the URI
//! model's effective-transport resolution and the endpoint descriptor.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Protocol {
    Udp,
    Tcp,
    Tls,
    Ws,
    Wss,
}

impl Protocol {
    /// The default port for this protocol (spec §6.1).
    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Udp | Protocol::Tcp => 5060,
            Protocol::Tls => 5061,
            Protocol::Ws => 80,
            Protocol::Wss => 443,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Protocol::Udp => "UDP",
            Protocol::Tcp => "TCP",
            Protocol::Tls => "TLS",
            Protocol::Ws => "WS",
            Protocol::Wss => "WSS",
        };
        f.write_str(s)
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "UDP" => Ok(Protocol::Udp),
            "TCP" => Ok(Protocol::Tcp),
            "TLS" => Ok(Protocol::Tls),
            "WS" => Ok(Protocol::Ws),
            "WSS" => Ok(Protocol::Wss),
            other => Err(Error::InvalidInput(format!("unknown transport protocol: {other}"))),
        }
    }
}
