//! Digest authentication headers (spec §4.6): `WWW-Authenticate`,
//! `Authorization`, `Proxy-Authenticate`, `Proxy-Authorization`. All four
//! share the `Digest <comma-separated name=value pairs>` grammar; only
//! the header name and direction of use differ.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::tokenizer::split_top_level;

/// Which of the four digest-auth headers this challenge/credential came
/// from, kept for round-trip serialization under the right name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AuthKind {
    WwwAuthenticate,
    Authorization,
    ProxyAuthenticate,
    ProxyAuthorization,
}

/// The unquoted subset of digest parameters that callers commonly need
/// named access to; everything else lives in `extra`, preserving
/// insertion order for round-tripping unrecognized parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DigestParams {
    pub realm: Option<String>,
    pub nonce: Option<String>,
    pub username: Option<String>,
    pub uri: Option<String>,
    pub response: Option<String>,
    pub algorithm: Option<String>,
    pub cnonce: Option<String>,
    pub nc: Option<String>,
    pub qop: Option<String>,
    pub opaque: Option<String>,
    pub stale: Option<String>,
    /// Any other name=value pairs, in the order they appeared.
    pub extra: Vec<(String, String)>,
}

/// A parsed digest-auth header value of any of the four kinds.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DigestAuth {
    pub kind: AuthKind,
    pub params: DigestParams,
}

const QUOTED_FIELDS: &[&str] = &["realm", "nonce", "username", "uri", "response", "cnonce", "opaque"];

impl DigestAuth {
    pub fn parse(input: &str, kind: AuthKind) -> Result<DigestAuth> {
        let input = input.trim();
        let rest = input
            .strip_prefix("Digest")
            .ok_or_else(|| Error::InvalidInput(format!("expected Digest scheme: {input:?}")))?
            .trim_start();

        let mut map: BTreeMap<String, String> = BTreeMap::new();
        let mut order: Vec<(String, String)> = Vec::new();
        for part in split_top_level(rest, ',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let eq = part
                .find('=')
                .ok_or_else(|| Error::InvalidInput(format!("malformed digest parameter: {part:?}")))?;
            let name = part[..eq].trim().to_ascii_lowercase();
            let mut value = part[eq + 1..].trim();
            if let Some(stripped) = value.strip_prefix('"') {
                value = stripped.strip_suffix('"').unwrap_or(stripped);
            }
            map.insert(name.clone(), value.to_string());
            order.push((name, value.to_string()));
        }

        let mut params = DigestParams::default();
        for (name, value) in order {
            match name.as_str() {
                "realm" => params.realm = Some(value),
                "nonce" => params.nonce = Some(value),
                "username" => params.username = Some(value),
                "uri" => params.uri = Some(value),
                "response" => params.response = Some(value),
                "algorithm" => params.algorithm = Some(value),
                "cnonce" => params.cnonce = Some(value),
                "nc" => params.nc = Some(value),
                "qop" => params.qop = Some(value),
                "opaque" => params.opaque = Some(value),
                "stale" => params.stale = Some(value),
                other => params.extra.push((other.to_string(), value)),
            }
        }
        Ok(DigestAuth { kind, params })
    }

    pub fn header_name(&self) -> &'static str {
        match self.kind {
            AuthKind::WwwAuthenticate => "WWW-Authenticate",
            AuthKind::Authorization => "Authorization",
            AuthKind::ProxyAuthenticate => "Proxy-Authenticate",
            AuthKind::ProxyAuthorization => "Proxy-Authorization",
        }
    }
}

impl fmt::Display for DigestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Digest ")?;
        let mut first = true;
        macro_rules! field {
            ($name:literal, $val:expr, $quoted:expr) => {
                if let Some(v) = &$val {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    if $quoted {
                        write!(f, "{}=\"{}\"", $name, v)?;
                    } else {
                        write!(f, "{}={}", $name, v)?;
                    }
                }
            };
        }
        field!("realm", self.params.realm, true);
        field!("nonce", self.params.nonce, true);
        field!("username", self.params.username, true);
        field!("uri", self.params.uri, true);
        field!("response", self.params.response, true);
        field!("algorithm", self.params.algorithm, false);
        field!("cnonce", self.params.cnonce, true);
        field!("nc", self.params.nc, false);
        field!("qop", self.params.qop, false);
        field!("opaque", self.params.opaque, true);
        field!("stale", self.params.stale, false);
        for (name, value) in &self.params.extra {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            if QUOTED_FIELDS.contains(&name.as_str()) {
                write!(f, "{name}=\"{value}\"")?;
            } else {
                write!(f, "{name}={value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_challenge_fields() {
        let header = r#"Digest realm="atlanta.com", qop="auth", nonce="84a4cc6f3082121f32b42a2187831a9e", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;
        let auth = DigestAuth::parse(header, AuthKind::WwwAuthenticate).unwrap();
        assert_eq!(auth.params.realm.as_deref(), Some("atlanta.com"));
        assert_eq!(auth.params.qop.as_deref(), Some("auth"));
        assert_eq!(auth.params.opaque.as_deref(), Some("5ccc069c403ebaf9f0171e9517f40e41"));
    }

    #[test]
    fn parses_credential_fields_and_round_trips_quoting() {
        let header = r#"Digest username="alice", realm="atlanta.com", nonce="xyz", uri="sip:bob@biloxi.com", response="abc123", nc=00000001, cnonce="0a4f113b""#;
        let auth = DigestAuth::parse(header, AuthKind::Authorization).unwrap();
        assert_eq!(auth.params.username.as_deref(), Some("alice"));
        assert_eq!(auth.params.nc.as_deref(), Some("00000001"));
        let rendered = auth.to_string();
        assert!(rendered.contains(r#"nc=00000001"#));
        assert!(rendered.contains(r#"username="alice""#));
    }

    #[test]
    fn missing_digest_prefix_fails() {
        assert!(DigestAuth::parse("Basic realm=\"x\"", AuthKind::Authorization).is_err());
    }
}
