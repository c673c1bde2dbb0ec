//! SDP `crypto` attribute codec (spec §3.6/§4.17/§6.4, RFC 4568).
//! Grounded on the field layout of `other_examples`'s
//! `kbalt-ezk/media-sdp-types attributes/crypto.rs` (`SrtpCrypto`/
//! `SrtpKeyingMaterial`/`SrtpSessionParam`), hand-rolled here with plain
//! string splitting rather than `nom` since this crate's only parsing
//! dependency need is this one attribute grammar.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::context::{MasterKey, SrtpContext};
use crate::error::{Error, Result};
use crate::suite::{SrtpSuite, MASTER_SALT_LEN};

/// One `inline:` segment of a `crypto` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyingMaterial {
    pub master_key: Vec<u8>,
    pub master_salt: Vec<u8>,
    /// `2^n` or decimal, in packets (spec §3.6).
    pub lifetime: Option<u64>,
    /// `(mki, mki_len)`.
    pub mki: Option<(u32, u8)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionParam {
    Kdr(u32),
    FecOrder(String),
    FecKey(String),
    Wsh(u32),
    Ext(String),
}

impl std::fmt::Display for SessionParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionParam::Kdr(n) => write!(f, "KDR={n}"),
            SessionParam::FecOrder(v) => write!(f, "FEC_ORDER={v}"),
            SessionParam::FecKey(v) => write!(f, "FEC_KEY={v}"),
            SessionParam::Wsh(n) => write!(f, "WSH={n}"),
            SessionParam::Ext(s) => f.write_str(s),
        }
    }
}

/// A parsed `crypto:` attribute (spec §3.6/§6.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoAttribute {
    pub tag: u32,
    pub suite: SrtpSuite,
    pub keys: Vec<KeyingMaterial>,
    pub params: Vec<SessionParam>,
}

fn parse_lifetime(s: &str) -> Result<u64> {
    if let Some(exp) = s.strip_prefix("2^") {
        let n: u32 = exp.parse().map_err(|_| Error::InvalidInput(format!("malformed lifetime exponent: {s}")))?;
        if n > 48 {
            return Err(Error::InvalidInput(format!("lifetime exponent {n} exceeds the 48-bit ceiling")));
        }
        Ok(1u64 << n)
    } else {
        s.parse().map_err(|_| Error::InvalidInput(format!("malformed lifetime: {s}")))
    }
}

fn parse_keying_material(segment: &str) -> Result<KeyingMaterial> {
    let inline = segment.strip_prefix("inline:").ok_or_else(|| Error::InvalidInput(format!("keying material missing inline: prefix: {segment}")))?;
    let mut parts = inline.split('|');
    let b64 = parts.next().ok_or_else(|| Error::InvalidInput("empty keying material".into()))?;

    let blob = STANDARD.decode(b64).map_err(|e| Error::InvalidInput(format!("invalid base64 key material: {e}")))?;
    if blob.len() <= MASTER_SALT_LEN {
        return Err(Error::InvalidInput(format!("key||salt blob of {} bytes is too short to hold a {MASTER_SALT_LEN}-byte salt", blob.len())));
    }
    let split_at = blob.len() - MASTER_SALT_LEN;
    let master_key = blob[..split_at].to_vec();
    let master_salt = blob[split_at..].to_vec();

    let mut lifetime = None;
    let mut mki = None;
    for rest in parts {
        if let Some((id, len)) = rest.split_once(':') {
            let mki_val: u32 = id.parse().map_err(|_| Error::InvalidInput(format!("malformed MKI: {rest}")))?;
            let mki_len: u32 = len.parse().map_err(|_| Error::InvalidInput(format!("malformed MKI length: {rest}")))?;
            if !(1..=128).contains(&mki_len) {
                return Err(Error::InvalidInput(format!("MKI length {mki_len} outside the [1,128] grammar range")));
            }
            mki = Some((mki_val, mki_len as u8));
        } else {
            lifetime = Some(parse_lifetime(rest)?);
        }
    }

    Ok(KeyingMaterial { master_key, master_salt, lifetime, mki })
}

fn format_keying_material(km: &KeyingMaterial) -> String {
    let mut blob = km.master_key.clone();
    blob.extend_from_slice(&km.master_salt);
    let mut out = format!("inline:{}", STANDARD.encode(blob));
    if let Some(lifetime) = km.lifetime {
        if lifetime.is_power_of_two() {
            out.push_str(&format!("|2^{}", lifetime.trailing_zeros()));
        } else {
            out.push_str(&format!("|{lifetime}"));
        }
    }
    if let Some((mki, mki_len)) = km.mki {
        out.push_str(&format!("|{mki}:{mki_len}"));
    }
    out
}

fn parse_session_param(s: &str) -> SessionParam {
    if let Some(v) = s.strip_prefix("KDR=") {
        if let Ok(n) = v.parse() {
            return SessionParam::Kdr(n);
        }
    } else if let Some(v) = s.strip_prefix("FEC_ORDER=") {
        return SessionParam::FecOrder(v.to_string());
    } else if let Some(v) = s.strip_prefix("FEC_KEY=") {
        return SessionParam::FecKey(v.to_string());
    } else if let Some(v) = s.strip_prefix("WSH=") {
        if let Ok(n) = v.parse() {
            return SessionParam::Wsh(n);
        }
    }
    SessionParam::Ext(s.to_string())
}

impl CryptoAttribute {
    /// Parse a `crypto:` attribute value (the part after `a=crypto:` or
    /// `crypto:`, whichever the caller strips).
    pub fn parse(input: &str) -> Result<CryptoAttribute> {
        let input = input.strip_prefix("crypto:").unwrap_or(input);
        let mut fields = input.split_whitespace();

        let tag_str = fields.next().ok_or_else(|| Error::InvalidInput("crypto attribute missing tag".into()))?;
        let tag: u32 = tag_str.parse().map_err(|_| Error::InvalidInput(format!("malformed crypto tag: {tag_str}")))?;
        if tag == 0 {
            return Err(Error::InvalidInput("crypto tag must be >= 1".into()));
        }

        let suite_str = fields.next().ok_or_else(|| Error::InvalidInput("crypto attribute missing suite".into()))?;
        let suite = SrtpSuite::parse(suite_str)?;

        let key_field = fields.next().ok_or_else(|| Error::InvalidInput("crypto attribute missing keying material".into()))?;
        let keys = key_field.split(';').map(parse_keying_material).collect::<Result<Vec<_>>>()?;
        if keys.is_empty() {
            return Err(Error::InvalidInput("crypto attribute must carry at least one inline key".into()));
        }

        let params = fields.map(parse_session_param).collect();

        Ok(CryptoAttribute { tag, suite, keys, params })
    }
}

impl std::fmt::Display for CryptoAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.tag, self.suite)?;
        write!(f, " ")?;
        let rendered: Vec<String> = self.keys.iter().map(format_keying_material).collect();
        write!(f, "{}", rendered.join(";"))?;
        for param in &self.params {
            write!(f, " {param}")?;
        }
        Ok(())
    }
}

/// Build an [`SrtpContext`] from a parsed `crypto` attribute, using its
/// first keying-material entry (spec §9 note 3: MKI is standardized to a
/// 32-bit identifier with a [1,4]-byte wire length, stricter than the
/// [1,128] the grammar itself allows).
pub fn crypto_attr_to_context(attr: &CryptoAttribute) -> Result<SrtpContext> {
    let mut master_keys = Vec::with_capacity(attr.keys.len());
    for km in &attr.keys {
        if km.master_key.len() != attr.suite.key_len() {
            return Err(Error::InvalidInput(format!(
                "keying material carries a {}-byte key, suite {} expects {}",
                km.master_key.len(),
                attr.suite,
                attr.suite.key_len()
            )));
        }
        let mut master = MasterKey::new(km.master_key.clone(), km.master_salt.clone());
        if let Some((mki, mki_len)) = km.mki {
            if !(1..=4).contains(&mki_len) {
                return Err(Error::InvalidInput(format!("MKI length {mki_len} is outside the [1,4]-byte wire range this context supports")));
            }
            master.mki = Some(mki);
            master.mki_len = mki_len;
        }
        for param in &attr.params {
            if let SessionParam::Kdr(n) = param {
                master.kdr_exponent = (*n).min(24) as u8;
            }
        }
        master_keys.push(master);
    }

    let mki_enabled = master_keys.iter().any(|k| k.mki.is_some());
    Ok(SrtpContext {
        suite: attr.suite,
        master_keys,
        current_key_index: 0,
        roc: 0,
        s_l: 0,
        session_keys: Default::default(),
        send_rtcp_index: 0,
        mki_enabled,
    })
}

/// Render an [`SrtpContext`]'s current master key back into a `crypto`
/// attribute at the given tag (the reverse of [`crypto_attr_to_context`]).
pub fn context_to_crypto_attr(ctx: &SrtpContext, tag: u32) -> CryptoAttribute {
    let keys = ctx
        .master_keys
        .iter()
        .map(|master| KeyingMaterial {
            master_key: master.key.clone(),
            master_salt: master.salt.clone(),
            lifetime: None,
            mki: master.mki.map(|mki| (mki, master.mki_len)),
        })
        .collect();
    let params = if ctx.master_keys.iter().any(|k| k.kdr_exponent != 0) {
        vec![SessionParam::Kdr(ctx.master_keys[ctx.current_key_index].kdr_exponent as u32)]
    } else {
        Vec::new()
    };
    CryptoAttribute { tag, suite: ctx.suite, keys, params }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_f_crypto_attribute_round_trip() {
        let input = "1 AES_CM_128_HMAC_SHA1_80 inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR|2^20|1:4 KDR=0";
        let attr = CryptoAttribute::parse(input).unwrap();
        assert_eq!(attr.tag, 1);
        assert_eq!(attr.suite, SrtpSuite::AesCm128HmacSha1_80);
        assert_eq!(attr.keys.len(), 1);
        assert_eq!(attr.keys[0].lifetime, Some(1 << 20));
        assert_eq!(attr.keys[0].mki, Some((1, 4)));
        assert_eq!(attr.params, vec![SessionParam::Kdr(0)]);
        assert_eq!(attr.to_string(), input);
    }

    #[test]
    fn rejects_zero_tag() {
        assert!(CryptoAttribute::parse("0 AES_CM_128_HMAC_SHA1_80 inline:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").is_err());
    }

    #[test]
    fn rejects_unknown_suite() {
        assert!(CryptoAttribute::parse("1 NOT_A_SUITE inline:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").is_err());
    }

    #[test]
    fn crypto_attr_to_context_builds_a_usable_context() {
        let input = "1 AES_CM_128_HMAC_SHA1_80 inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR|2^20|1:4 KDR=0";
        let attr = CryptoAttribute::parse(input).unwrap();
        let ctx = crypto_attr_to_context(&attr).unwrap();
        assert_eq!(ctx.suite, SrtpSuite::AesCm128HmacSha1_80);
        assert_eq!(ctx.master_keys[0].key.len(), 16);
        assert_eq!(ctx.master_keys[0].salt.len(), 14);
        assert!(ctx.mki_enabled);
    }

    #[test]
    fn rejects_mki_length_outside_wire_range_when_building_context() {
        let input = "1 AES_CM_128_HMAC_SHA1_80 inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR|1:8";
        let attr = CryptoAttribute::parse(input).unwrap();
        assert!(crypto_attr_to_context(&attr).is_err());
    }

    #[test]
    fn multiple_inline_segments_round_trip() {
        let input = "4 AES_CM_128_HMAC_SHA1_32 inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR|2^20|1:4;inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR|2^10|2:4";
        let attr = CryptoAttribute::parse(input).unwrap();
        assert_eq!(attr.keys.len(), 2);
        assert_eq!(attr.to_string(), input);
    }
}
