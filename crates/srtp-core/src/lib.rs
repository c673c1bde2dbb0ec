//! SRTP/SRTCP authenticated encryption (RFC 3711) and the SDES `crypto`
//! attribute codec (RFC 4568): crypto suites, AES-CM/AES-f8 keystreams,
//! session-key derivation, packet-index reconstruction, the per-stream
//! crypto context, and the RTP/RTCP encrypt-decrypt pipelines.

pub mod aes_block;
pub mod aes_cm;
pub mod aes_f8;
pub mod context;
pub mod error;
pub mod kdf;
pub mod packet_index;
pub mod rtcp;
pub mod rtp;
pub mod sdes;
pub mod suite;

pub mod prelude {
    pub use crate::context::{MasterKey, SessionKeys, SrtpContext};
    pub use crate::error::{Error, Result};
    pub use crate::sdes::{context_to_crypto_attr, crypto_attr_to_context, CryptoAttribute, KeyingMaterial, SessionParam};
    pub use crate::suite::{CipherFamily, SrtpSuite};
    pub use crate::{decrypt_rtcp, decrypt_rtp, encrypt_rtcp, encrypt_rtp};
}

pub use context::SrtpContext;
pub use error::{Error, Result};

/// Encrypt one RTP packet under `ctx` (spec §4.15 RTP branch).
pub fn encrypt_rtp(ctx: &mut SrtpContext, packet: &[u8]) -> Result<Vec<u8>> {
    rtp::encrypt(ctx, packet)
}

/// Decrypt and authenticate one RTP packet under `ctx` (spec §4.16 RTP branch).
pub fn decrypt_rtp(ctx: &mut SrtpContext, packet: &[u8]) -> Result<Vec<u8>> {
    rtp::decrypt(ctx, packet)
}

/// Encrypt one RTCP packet under `ctx` (spec §4.15 RTCP branch).
pub fn encrypt_rtcp(ctx: &mut SrtpContext, packet: &[u8]) -> Result<Vec<u8>> {
    rtcp::encrypt(ctx, packet)
}

/// Decrypt and authenticate one RTCP packet under `ctx` (spec §4.16 RTCP branch).
pub fn decrypt_rtcp(ctx: &mut SrtpContext, packet: &[u8]) -> Result<Vec<u8>> {
    rtcp::decrypt(ctx, packet)
}

/// Parse an SDP `crypto` attribute (spec §4.17/§6.4).
pub fn crypto_attr_parse(input: &str) -> Result<sdes::CryptoAttribute> {
    sdes::CryptoAttribute::parse(input)
}
