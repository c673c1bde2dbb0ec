//! SIP/SIPS/TEL/URN/HTTP(S)/WS(S)/MSRP(S)/IM/CID URI model, parser and
//! serializer (spec §3.1, §4.3, §6.2).

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::params::ParamMap;
use crate::transport::Protocol;

/// The URI scheme. Serializes to the exact lowercase wire token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Scheme {
    Sip,
    Sips,
    Tel,
    Urn,
    Http,
    Https,
    Cid,
    Im,
    Msrp,
    Msrps,
    Ws,
    Wss,
}

impl Scheme {
    /// Schemes whose wire form carries a leading `//` before the
    /// authority, per spec §4.3 step 2.
    fn is_slashed(self) -> bool {
        matches!(
            self,
            Scheme::Http | Scheme::Https | Scheme::Ws | Scheme::Wss | Scheme::Msrp | Scheme::Msrps
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
            Scheme::Tel => "tel",
            Scheme::Urn => "urn",
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Cid => "cid",
            Scheme::Im => "im",
            Scheme::Msrp => "msrp",
            Scheme::Msrps => "msrps",
            Scheme::Ws => "ws",
            Scheme::Wss => "wss",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sip" => Ok(Scheme::Sip),
            "sips" => Ok(Scheme::Sips),
            "tel" => Ok(Scheme::Tel),
            "urn" => Ok(Scheme::Urn),
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            "cid" => Ok(Scheme::Cid),
            "im" => Ok(Scheme::Im),
            "msrp" => Ok(Scheme::Msrp),
            "msrps" => Ok(Scheme::Msrps),
            "ws" => Ok(Scheme::Ws),
            "wss" => Ok(Scheme::Wss),
            other => Err(Error::UnsupportedUriScheme(other.to_string())),
        }
    }
}

/// The host portion of a URI: a domain name, or a literal IPv4/IPv6
/// address. IPv6 always round-trips bracketed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Host {
    Domain(String),
    IPv4(Ipv4Addr),
    IPv6(Ipv6Addr),
}

impl Host {
    pub fn domain(s: impl Into<String>) -> Self {
        Host::Domain(s.into())
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Domain(d) => f.write_str(d),
            Host::IPv4(ip) => write!(f, "{ip}"),
            Host::IPv6(ip) => write!(f, "[{ip}]"),
        }
    }
}

/// A fully parsed SIP-family or web-style URI (spec §3.1).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Uri {
    pub scheme: Scheme,
    pub user: Option<String>,
    pub host: Host,
    pub port: Option<u16>,
    pub parameters: ParamMap,
    pub headers: ParamMap,
}

impl Uri {
    pub fn new(scheme: Scheme, host: Host) -> Self {
        Uri {
            scheme,
            user: None,
            host,
            port: None,
            parameters: ParamMap::new(),
            headers: ParamMap::new(),
        }
    }

    /// Deep copy, per the lifecycle note that mutation always produces an
    /// independent value.
    pub fn copy_of(&self) -> Uri {
        self.clone()
    }

    /// Whether this is the wildcard `*` URI used for REGISTER Contact
    /// removal; the only case where `host` may be considered absent.
    pub fn is_wildcard(&self) -> bool {
        matches!(&self.host, Host::Domain(d) if d == "*") && self.user.is_none()
    }

    /// The effective transport protocol (spec §3.1 invariant / §4.3):
    /// `sips`/`msrps` force TLS, `msrp` forces TCP, otherwise the
    /// `transport` parameter if present and recognized, else UDP.
    pub fn effective_protocol(&self) -> Protocol {
        match self.scheme {
            Scheme::Sips | Scheme::Msrps => Protocol::Tls,
            Scheme::Msrp => Protocol::Tcp,
            _ => self
                .parameters
                .get("transport")
                .flatten()
                .and_then(|t| Protocol::from_str(t).ok())
                .unwrap_or(Protocol::Udp),
        }
    }

    /// Port to use when none is explicit: the scheme's implicit default
    /// adjusted for the effective transport.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.effective_protocol().default_port())
    }

    /// Canonical address used for equality: scheme + user + host +
    /// explicit-or-default port.
    fn canonical_address(&self) -> (Scheme, Option<&str>, String, u16) {
        (
            self.scheme,
            self.user.as_deref(),
            self.host.to_string().to_ascii_lowercase(),
            self.effective_port(),
        )
    }

    pub fn parse(input: &str) -> Result<Uri> {
        parse_uri(input)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if self.scheme.is_slashed() {
            write!(f, "//")?;
        }
        if self.scheme == Scheme::Tel {
            // No authority: the number sits directly after the scheme,
            // host stays empty and unwritten.
            if let Some(user) = &self.user {
                write!(f, "{user}")?;
            }
            if !self.parameters.is_empty() {
                write!(f, ";{}", self.parameters.to_semicolon_string())?;
            }
            if !self.headers.is_empty() {
                write!(f, "?{}", self.headers.to_query_string())?;
            }
            return Ok(());
        }
        if let Some(user) = &self.user {
            write!(f, "{}@", crate::escape::encode_uri_user(user))?;
        }
        write!(f, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }

        let mut params = self.parameters.clone();
        // Inject ;transport=<proto> when the effective protocol diverges
        // from the scheme's own implicit transport and the scheme cannot
        // already imply it (spec §4.3 serializer rule).
        if !matches!(self.scheme, Scheme::Sips | Scheme::Msrp | Scheme::Msrps)
            && !params.contains("transport")
        {
            let implicit = match self.scheme {
                Scheme::Ws => Protocol::Ws,
                Scheme::Wss => Protocol::Wss,
                _ => Protocol::Udp,
            };
            let effective = self.effective_protocol();
            if effective != implicit {
                params.insert("transport", Some(effective.to_string().to_ascii_lowercase()));
            }
        }
        if !params.is_empty() {
            write!(f, ";{}", params.to_semicolon_string())?;
        }
        if !self.headers.is_empty() {
            write!(f, "?{}", self.headers.to_query_string())?;
        }
        Ok(())
    }
}

/// Parse any supported URI form (spec §4.3).
pub fn parse_uri(input: &str) -> Result<Uri> {
    let colon = input
        .find(':')
        .ok_or_else(|| Error::InvalidInput("URI missing scheme separator ':'".into()))?;
    let scheme = Scheme::from_str(&input[..colon])?;
    let mut rest = &input[colon + 1..];

    if scheme.is_slashed() {
        rest = rest.strip_prefix("//").unwrap_or(rest);
    }

    if scheme == Scheme::Urn {
        // The remainder after `urn:` is the entire host; no port/user/param split.
        return Ok(Uri {
            scheme,
            user: None,
            host: Host::Domain(rest.to_string()),
            port: None,
            parameters: ParamMap::new(),
            headers: ParamMap::new(),
        });
    }

    if scheme == Scheme::Tel {
        // A tel: URI has no authority; the number lives in `user`, and
        // host stays empty. Visual separators (space, hyphen) are
        // stripped from the number but params/headers still apply.
        let first_delim = rest.find(|c| c == ';' || c == '?').unwrap_or(rest.len());
        let (number, tail) = (&rest[..first_delim], &rest[first_delim..]);
        let user = number.chars().filter(|c| *c != ' ' && *c != '-').collect();

        let mut parameters = ParamMap::new();
        let mut headers = ParamMap::new();
        if let Some(after_semi) = tail.strip_prefix(';') {
            let qpos = after_semi.find('?').unwrap_or(after_semi.len());
            parameters = ParamMap::parse_semicolon(&after_semi[..qpos])?;
            if let Some(hdrs) = after_semi[qpos..].strip_prefix('?') {
                headers = ParamMap::parse_ampersand(hdrs)?;
            }
        } else if let Some(hdrs) = tail.strip_prefix('?') {
            headers = ParamMap::parse_ampersand(hdrs)?;
        }

        return Ok(Uri {
            scheme,
            user: Some(user),
            host: Host::Domain(String::new()),
            port: None,
            parameters,
            headers,
        });
    }

    // Split off user@ if an '@' precedes any ';' or '?'.
    let at_pos = rest.find('@');
    let first_delim = rest
        .find(|c| c == ';' || c == '?')
        .unwrap_or(rest.len());
    let (user_raw, host_port_and_params) = match at_pos {
        Some(at) if at < first_delim => (Some(&rest[..at]), &rest[at + 1..]),
        _ => (None, rest),
    };

    let user = match user_raw {
        Some(u) => Some(crate::escape::decode_uri_user(u)?),
        None => None,
    };

    // Split host-port from the params/headers tail at the first ';' or '?'.
    let split_at = host_port_and_params
        .find(|c| c == ';' || c == '?')
        .unwrap_or(host_port_and_params.len());
    let host_port = &host_port_and_params[..split_at];
    let tail = &host_port_and_params[split_at..];

    let (host, port) = parse_host_port(host_port)?;

    let mut parameters = ParamMap::new();
    let mut headers = ParamMap::new();
    if let Some(after_semi) = tail.strip_prefix(';') {
        let qpos = after_semi.find('?').unwrap_or(after_semi.len());
        parameters = ParamMap::parse_semicolon(&after_semi[..qpos])?;
        if let Some(hdrs) = after_semi[qpos..].strip_prefix('?') {
            headers = ParamMap::parse_ampersand(hdrs)?;
        }
    } else if let Some(hdrs) = tail.strip_prefix('?') {
        headers = ParamMap::parse_ampersand(hdrs)?;
    }

    Ok(Uri { scheme, user, host, port, parameters, headers })
}

fn parse_host_port(input: &str) -> Result<(Host, Option<u16>)> {
    if input.is_empty() {
        return Err(Error::InvalidInput("URI host is empty".into()));
    }
    if input == "*" {
        return Ok((Host::Domain("*".to_string()), None));
    }
    if input.contains(',') || input.contains('"') {
        return Err(Error::InvalidInput(format!("invalid character in host: {input:?}")));
    }

    let colon_count = input.matches(':').count();
    if colon_count > 1 {
        // Must be a bracketed IPv6 literal, optionally with :port.
        if !input.starts_with('[') {
            return Err(Error::InvalidInput(format!("multi-colon host must be IPv6 in brackets: {input:?}")));
        }
        let close = input
            .find(']')
            .ok_or_else(|| Error::InvalidInput(format!("unterminated IPv6 literal: {input:?}")))?;
        let addr_str = &input[1..close];
        // RFC 5118 §4.10: collapse a stray '::: ' down to '::'.
        let collapsed = addr_str.replace(":::", "::");
        let addr = Ipv6Addr::from_str(&collapsed)
            .map_err(|e| Error::InvalidInput(format!("invalid IPv6 address {addr_str:?}: {e}")))?;
        let rest = &input[close + 1..];
        let port = if let Some(p) = rest.strip_prefix(':') {
            Some(p.parse::<u16>().map_err(|_| Error::InvalidInput(format!("invalid port: {p:?}")))?)
        } else if rest.is_empty() {
            None
        } else {
            return Err(Error::InvalidInput(format!("unexpected trailer after IPv6 literal: {rest:?}")));
        };
        return Ok((Host::IPv6(addr), port));
    }

    let (host_str, port) = match input.split_once(':') {
        Some((h, p)) => (
            h,
            Some(p.parse::<u16>().map_err(|_| Error::InvalidInput(format!("invalid port: {p:?}")))?),
        ),
        None => (input, None),
    };

    if let Ok(v4) = Ipv4Addr::from_str(host_str) {
        Ok((Host::IPv4(v4), port))
    } else {
        Ok((Host::Domain(host_str.to_string()), port))
    }
}

/// Serialize a URI to its wire text form.
pub fn serialize_uri(uri: &Uri) -> String {
    uri.to_string()
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_address() == other.canonical_address()
            && self.parameters == other.parameters
            && self.headers == other.headers
    }
}
impl Eq for Uri {}
