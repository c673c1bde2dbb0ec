//! SRTP crypto context (spec §3.5): master-key set, KDR, ROC/`s_l`,
//! current session keys, and the send-side SRTCP index. Grounded on the
//! teacher's `SrtpCryptoKey`/`SrtpContext` naming (`api/common/srtp.rs`),
//! generalized here to hold a list of master keys keyed by MKI rather
//! than exactly one, since the SDES codec (§3.6) allows multiple
//! `inline:` segments on one `crypto` attribute.

use crate::error::{Error, Result};
use crate::kdf::{self, LABEL_RTCP_AUTHENTICATION, LABEL_RTCP_ENCRYPTION, LABEL_RTCP_SALT, LABEL_RTP_AUTHENTICATION, LABEL_RTP_ENCRYPTION, LABEL_RTP_SALT};
use crate::suite::{SrtpSuite, MASTER_SALT_LEN};

/// One master key entry (spec §3.5/§3.6): an optional MKI, a
/// KDR exponent, the master key bytes, and the 14-byte master salt.
///
/// MKI is standardized to a 32-bit unsigned identifier; the SDES
/// grammar allows a declared length up to 128 bytes, but any context
/// actually built from an attribute restricts the wire MKI length to
/// [1,4] bytes (an open question resolved this way, see design notes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterKey {
    pub mki: Option<u32>,
    pub mki_len: u8,
    pub kdr_exponent: u8,
    pub key: Vec<u8>,
    pub salt: Vec<u8>,
}

impl MasterKey {
    pub fn new(key: Vec<u8>, salt: Vec<u8>) -> Self {
        MasterKey { mki: None, mki_len: 0, kdr_exponent: 0, key, salt }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionKeys {
    pub rtp_key: Vec<u8>,
    pub rtp_salt: Vec<u8>,
    pub rtp_auth: Vec<u8>,
    pub rtcp_key: Vec<u8>,
    pub rtcp_salt: Vec<u8>,
    pub rtcp_auth: Vec<u8>,
    /// The packet index the session keys were last derived at; `None`
    /// means the keys have never been derived (spec §3.5 invariant (a)).
    pub derived_at: Option<u64>,
}

/// Per-direction, per-stream SRTP crypto state (spec §3.5).
#[derive(Debug, Clone)]
pub struct SrtpContext {
    pub suite: SrtpSuite,
    pub master_keys: Vec<MasterKey>,
    pub current_key_index: usize,
    pub roc: u32,
    pub s_l: u16,
    pub session_keys: SessionKeys,
    pub send_rtcp_index: u32,
    pub mki_enabled: bool,
}

impl SrtpContext {
    /// Construct a context around a single master key with no MKI
    /// (the common single-key case; multi-key contexts are assembled by
    /// `crypto_attr_to_context` in [`crate::sdes`]).
    pub fn new(suite: SrtpSuite, key: Vec<u8>, salt: Vec<u8>) -> Result<Self> {
        if key.len() != suite.key_len() {
            return Err(Error::InvalidInput(format!(
                "master key of {} bytes does not match suite key length {}",
                key.len(),
                suite.key_len()
            )));
        }
        if salt.len() != MASTER_SALT_LEN {
            return Err(Error::InvalidInput(format!(
                "master salt must be {MASTER_SALT_LEN} bytes, got {}",
                salt.len()
            )));
        }
        Ok(SrtpContext {
            suite,
            master_keys: vec![MasterKey::new(key, salt)],
            current_key_index: 0,
            roc: 0,
            s_l: 0,
            session_keys: SessionKeys::default(),
            send_rtcp_index: 0,
            mki_enabled: false,
        })
    }

    pub fn current_master_key(&self) -> &MasterKey {
        &self.master_keys[self.current_key_index]
    }

    /// The wire-length MKI bytes for the current master key, if MKI is
    /// enabled on this context (spec §4.15 step 6 / §4.16 steps 1-2),
    /// shared between the RTP and RTCP pipelines.
    pub fn mki_bytes(&self) -> Option<Vec<u8>> {
        if !self.mki_enabled {
            return None;
        }
        let master = self.current_master_key();
        let mki = master.mki?;
        let full = mki.to_be_bytes();
        Some(full[4 - master.mki_len as usize..].to_vec())
    }

    pub fn select_master_key_by_mki(&mut self, mki: u32) -> Result<()> {
        let idx = self
            .master_keys
            .iter()
            .position(|k| k.mki == Some(mki))
            .ok_or(Error::MasterKeyNotFound(mki))?;
        if idx != self.current_key_index {
            self.current_key_index = idx;
            self.session_keys.derived_at = None;
        }
        Ok(())
    }

    /// Whether session keys must be (re-)derived for the given packet
    /// index, per spec §3.5 invariant (a)/(b): either they are null, or
    /// KDR>0 and `packet_index mod 2^KDR == 0`.
    pub fn needs_key_derivation(&self, packet_index: u64) -> bool {
        let kdr = self.current_master_key().kdr_exponent;
        match self.session_keys.derived_at {
            None => true,
            Some(_) if kdr == 0 => false,
            Some(_) => (packet_index & ((1u64 << kdr) - 1)) == 0,
        }
    }

    /// Derive (or re-derive) all six session keys at `packet_index`
    /// (spec §4.10).
    pub fn derive_session_keys(&mut self, packet_index: u64) -> Result<()> {
        tracing::debug!(packet_index, kdr = self.current_master_key().kdr_exponent, "deriving session keys");
        let master = self.current_master_key().clone();
        let tag_len = self.suite.tag_len();
        let auth_key_len = 20; // HMAC-SHA1 key length, independent of tag truncation.

        let rtp_key = kdf::derive(LABEL_RTP_ENCRYPTION, &master.key, &master.salt, packet_index, master.kdr_exponent, master.key.len())?;
        let rtp_salt = kdf::derive(LABEL_RTP_SALT, &master.key, &master.salt, packet_index, master.kdr_exponent, MASTER_SALT_LEN)?;
        let rtp_auth = kdf::derive(LABEL_RTP_AUTHENTICATION, &master.key, &master.salt, packet_index, master.kdr_exponent, auth_key_len)?;
        let rtcp_key = kdf::derive(LABEL_RTCP_ENCRYPTION, &master.key, &master.salt, packet_index, master.kdr_exponent, master.key.len())?;
        let rtcp_salt = kdf::derive(LABEL_RTCP_SALT, &master.key, &master.salt, packet_index, master.kdr_exponent, MASTER_SALT_LEN)?;
        let rtcp_auth = kdf::derive(LABEL_RTCP_AUTHENTICATION, &master.key, &master.salt, packet_index, master.kdr_exponent, auth_key_len)?;
        let _ = tag_len;

        self.session_keys = SessionKeys {
            rtp_key,
            rtp_salt,
            rtp_auth,
            rtcp_key,
            rtcp_salt,
            rtcp_auth,
            derived_at: Some(packet_index),
        };
        Ok(())
    }

    /// Derive session keys if [`Self::needs_key_derivation`] says so.
    pub fn ensure_session_keys(&mut self, packet_index: u64) -> Result<()> {
        if self.needs_key_derivation(packet_index) {
            self.derive_session_keys(packet_index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> SrtpContext {
        SrtpContext::new(SrtpSuite::AesCm128HmacSha1_80, vec![0x01u8; 16], vec![0x02u8; 14]).unwrap()
    }

    #[test]
    fn rejects_wrong_key_length() {
        assert!(SrtpContext::new(SrtpSuite::AesCm128HmacSha1_80, vec![0u8; 10], vec![0u8; 14]).is_err());
    }

    #[test]
    fn needs_derivation_initially() {
        let ctx = test_context();
        assert!(ctx.needs_key_derivation(0));
    }

    #[test]
    fn derives_session_keys_of_correct_lengths() {
        let mut ctx = test_context();
        ctx.derive_session_keys(0).unwrap();
        assert_eq!(ctx.session_keys.rtp_key.len(), 16);
        assert_eq!(ctx.session_keys.rtp_salt.len(), 14);
        assert_eq!(ctx.session_keys.rtp_auth.len(), 20);
    }

    #[test]
    fn zero_kdr_never_requires_rederivation_once_set() {
        let mut ctx = test_context();
        ctx.derive_session_keys(0).unwrap();
        assert!(!ctx.needs_key_derivation(1000));
    }

    #[test]
    fn nonzero_kdr_requires_rederivation_at_window_boundary() {
        let mut ctx = test_context();
        ctx.master_keys[0].kdr_exponent = 4;
        ctx.derive_session_keys(0).unwrap();
        assert!(!ctx.needs_key_derivation(5));
        assert!(ctx.needs_key_derivation(16));
    }
}
