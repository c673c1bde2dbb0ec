//! SRTP encrypt/decrypt pipeline for RTP packets (spec §4.13/§4.15/§4.16
//! RTP branch). Grounded on the webrtc-rs `CipherAesCmHmacSha1::{encrypt_rtp,
//! decrypt_rtp}` shape in `other_examples`, reworked around this crate's
//! own [`SrtpContext`] and suite-dispatched cipher rather than a fixed
//! AES-128/HMAC-SHA1-80 cipher object.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::aes_cm;
use crate::aes_f8;
use crate::context::SrtpContext;
use crate::error::{Error, Result};
use crate::packet_index::{commit_index, guess_index};
use crate::suite::CipherFamily;

type HmacSha1 = Hmac<Sha1>;

pub const MIN_RTP_HEADER_LEN: usize = 12;

struct RtpHeaderView {
    marker: bool,
    payload_type: u8,
    sequence_number: u16,
    timestamp: u32,
    ssrc: u32,
}

fn parse_header(packet: &[u8]) -> Result<RtpHeaderView> {
    if packet.len() < MIN_RTP_HEADER_LEN {
        return Err(Error::InputPacketTooShort { actual: packet.len(), minimum: MIN_RTP_HEADER_LEN });
    }
    Ok(RtpHeaderView {
        marker: packet[1] & 0x80 != 0,
        payload_type: packet[1] & 0x7F,
        sequence_number: u16::from_be_bytes([packet[2], packet[3]]),
        timestamp: u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]]),
        ssrc: u32::from_be_bytes([packet[8], packet[9], packet[10], packet[11]]),
    })
}

/// AES-CM IV for RTP (spec §4.13).
fn aes_cm_iv(session_salt: &[u8], ssrc: u32, packet_index: u64) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..14].copy_from_slice(session_salt);
    let ssrc_bytes = ssrc.to_be_bytes();
    for i in 0..4 {
        iv[4 + i] ^= ssrc_bytes[i];
    }
    let pi_shifted = (packet_index as u128) << 16;
    let pi_bytes = pi_shifted.to_be_bytes();
    for i in 0..8 {
        iv[8 + i] ^= pi_bytes[16 - 8 + i];
    }
    iv
}

/// AES-f8 IV for RTP (spec §4.14).
fn aes_f8_iv(header: &RtpHeaderView, roc: u32) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[0] = 0x00;
    iv[1] = ((header.marker as u8) << 7) | (header.payload_type & 0x7F);
    iv[2..4].copy_from_slice(&header.sequence_number.to_be_bytes());
    iv[4..8].copy_from_slice(&header.timestamp.to_be_bytes());
    iv[8..12].copy_from_slice(&header.ssrc.to_be_bytes());
    iv[12..16].copy_from_slice(&roc.to_be_bytes());
    iv
}

fn transform_payload(ctx: &SrtpContext, header: &RtpHeaderView, roc: u32, packet_index: u64, payload: &mut [u8]) -> Result<()> {
    match ctx.suite.params().cipher {
        CipherFamily::AesCm => {
            let iv = aes_cm_iv(&ctx.session_keys.rtp_salt, header.ssrc, packet_index);
            aes_cm::apply_keystream(&ctx.session_keys.rtp_key, &iv, payload)
        }
        CipherFamily::AesF8 => {
            let iv = aes_f8_iv(header, roc);
            aes_f8::apply_keystream(&ctx.session_keys.rtp_key, &ctx.session_keys.rtp_salt, &iv, payload)
        }
    }
}

fn auth_tag(auth_key: &[u8], header_and_ciphertext: &[u8], roc: u32, tag_len: usize) -> Vec<u8> {
    let mut mac = HmacSha1::new_from_slice(auth_key).expect("HMAC accepts any key length");
    mac.update(header_and_ciphertext);
    mac.update(&roc.to_be_bytes());
    let full = mac.finalize().into_bytes();
    full[..tag_len].to_vec()
}

/// Encrypt one RTP packet (spec §4.15). `ctx.roc` and the packet's own
/// SEQ are used to form the packet index; the caller is responsible for
/// SEQ monotonicity (spec §5).
pub fn encrypt(ctx: &mut SrtpContext, packet: &[u8]) -> Result<Vec<u8>> {
    let header = parse_header(packet)?;
    let packet_index = ((ctx.roc as u64) << 16) | header.sequence_number as u64;
    ctx.ensure_session_keys(packet_index)?;

    let mut out = packet.to_vec();
    transform_payload(ctx, &header, ctx.roc, packet_index, &mut out[MIN_RTP_HEADER_LEN..])?;

    // The authenticated portion is header||ciphertext||ROC; MKI (if
    // present) is appended after the tag is computed, not before.
    let tag = auth_tag(&ctx.session_keys.rtp_auth, &out, ctx.roc, ctx.suite.tag_len());
    if let Some(mki) = ctx.mki_bytes() {
        out.extend(mki);
    }
    out.extend(tag);

    if header.sequence_number == u16::MAX {
        ctx.roc = ctx.roc.wrapping_add(1);
        tracing::trace!(new_roc = ctx.roc, "ROC advanced on RTP sequence wrap");
    }
    Ok(out)
}

/// Decrypt one RTP packet (spec §4.16 RTP branch). Authentication is
/// verified before ROC/`s_l` are committed and before the payload is
/// decrypted, matching the no-partial-decrypt-on-failure policy (§7).
pub fn decrypt(ctx: &mut SrtpContext, packet: &[u8]) -> Result<Vec<u8>> {
    let tag_len = ctx.suite.tag_len();
    let mki_len = if ctx.mki_enabled { ctx.current_master_key().mki_len as usize } else { 0 };
    let min_len = MIN_RTP_HEADER_LEN + mki_len + tag_len;
    if packet.len() < min_len {
        return Err(Error::InputPacketTooShort { actual: packet.len(), minimum: min_len });
    }

    let header = parse_header(packet)?;

    if ctx.mki_enabled {
        let mki_offset = packet.len() - tag_len - mki_len;
        let mki_slice = &packet[mki_offset..mki_offset + mki_len];
        let mut buf = [0u8; 4];
        buf[4 - mki_len..].copy_from_slice(mki_slice);
        ctx.select_master_key_by_mki(u32::from_be_bytes(buf))?;
    }

    let ciphertext_end = packet.len() - tag_len - mki_len;
    let authenticated_part = &packet[..ciphertext_end];
    let attached_tag = &packet[packet.len() - tag_len..];

    let packet_index = guess_index(header.sequence_number, ctx.s_l, ctx.roc);
    ctx.ensure_session_keys(packet_index)?;

    let roc_for_auth = (packet_index >> 16) as u32;
    let expected_tag = auth_tag(&ctx.session_keys.rtp_auth, authenticated_part, roc_for_auth, tag_len);
    if attached_tag.ct_eq(&expected_tag).unwrap_u8() != 1 {
        tracing::warn!(seq = header.sequence_number, ssrc = header.ssrc, "RTP authentication tag mismatch");
        return Err(Error::Unauthenticated);
    }

    commit_index(header.sequence_number, &mut ctx.s_l, &mut ctx.roc);

    let mut out = packet[..ciphertext_end].to_vec();
    transform_payload(ctx, &header, roc_for_auth, packet_index, &mut out[MIN_RTP_HEADER_LEN..])?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::SrtpSuite;

    fn rtp_packet(seq: u16, payload_len: usize) -> Vec<u8> {
        let mut packet = vec![0x80, 0x00, 0, 0, 0, 0, 0, 0, 0xDE, 0xAD, 0xBE, 0xEF];
        packet[2..4].copy_from_slice(&seq.to_be_bytes());
        packet.extend(vec![0x42u8; payload_len]);
        packet
    }

    fn context() -> SrtpContext {
        SrtpContext::new(SrtpSuite::AesCm128HmacSha1_80, vec![0x00u8; 16], (0u8..14).collect()).unwrap()
    }

    #[test]
    fn scenario_d_encrypt_decrypt_round_trip() {
        let mut tx = context();
        let mut rx = context();

        let plaintext = rtp_packet(0, 160);
        let encrypted = encrypt(&mut tx, &plaintext).unwrap();
        assert_eq!(encrypted.len(), 12 + 160 + 10);

        let decrypted = decrypt(&mut rx, &encrypted).unwrap();
        assert_eq!(decrypted, plaintext);
        assert_eq!(tx.roc, 0);
        assert_eq!(rx.roc, 0);
        assert_eq!(rx.s_l, 0);
    }

    #[test]
    fn tampered_packet_fails_authentication() {
        let mut tx = context();
        let mut rx = context();
        let plaintext = rtp_packet(1, 32);
        let mut encrypted = encrypt(&mut tx, &plaintext).unwrap();
        let last = encrypted.len() - 1;
        encrypted[last] ^= 0xFF;
        assert!(matches!(decrypt(&mut rx, &encrypted), Err(Error::Unauthenticated)));
    }

    #[test]
    fn scenario_e_roc_advances_across_65536_packets() {
        let mut tx = context();
        let mut rx = context();

        for seq in 0u32..65536 {
            let plaintext = rtp_packet(seq as u16, 16);
            let encrypted = encrypt(&mut tx, &plaintext).unwrap();
            let decrypted = decrypt(&mut rx, &encrypted).unwrap();
            assert_eq!(decrypted, plaintext);
        }
        assert_eq!(tx.roc, 1);
        assert_eq!(rx.roc, 0);
        assert_eq!(rx.s_l, 65535);

        let wrapped = rtp_packet(0, 16);
        let encrypted = encrypt(&mut tx, &wrapped).unwrap();
        let decrypted = decrypt(&mut rx, &encrypted).unwrap();
        assert_eq!(decrypted, wrapped);
        assert_eq!(rx.roc, 1);
    }

    #[test]
    fn rejects_packet_shorter_than_rtp_header() {
        let mut ctx = context();
        assert!(matches!(encrypt(&mut ctx, &[0u8; 4]), Err(Error::InputPacketTooShort { .. })));
    }
}
