//! SRTCP encrypt/decrypt pipeline (spec §4.15/§4.16 RTCP branch): a
//! parallel pipeline keyed by a 31-bit send/receive index plus an
//! encryption flag `E`, rather than RTP's ROC/SEQ pair.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::aes_cm;
use crate::aes_f8;
use crate::context::SrtpContext;
use crate::error::{Error, Result};
use crate::suite::CipherFamily;

type HmacSha1 = Hmac<Sha1>;

/// RTCP header + SSRC: the unencrypted prefix every RTCP packet carries
/// (4-byte header, 4-byte SSRC).
pub const RTCP_HEADER_AND_SSRC_LEN: usize = 8;
const SRTCP_INDEX_LEN: usize = 4;
const ENCRYPTED_FLAG: u32 = 1 << 31;

fn ssrc_of(packet: &[u8]) -> Result<u32> {
    if packet.len() < RTCP_HEADER_AND_SSRC_LEN {
        return Err(Error::InputPacketTooShort { actual: packet.len(), minimum: RTCP_HEADER_AND_SSRC_LEN });
    }
    Ok(u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]]))
}

/// AES-CM IV for RTCP (spec §4.13, same construction keyed on the
/// 31-bit SRTCP index instead of `(ROC << 16) | SEQ`).
fn aes_cm_iv(session_salt: &[u8], ssrc: u32, srtcp_index: u32) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..14].copy_from_slice(session_salt);
    let ssrc_bytes = ssrc.to_be_bytes();
    for i in 0..4 {
        iv[4 + i] ^= ssrc_bytes[i];
    }
    let pi = (srtcp_index as u64) << 16;
    let pi_bytes = pi.to_be_bytes();
    for i in 0..8 {
        iv[8 + i] ^= pi_bytes[i];
    }
    iv
}

/// AES-f8 IV for RTCP (spec §4.14): `E`+SRTCP-index at [4..8), V/P/RC at
/// [8], PT|length at [9..12), SSRC at [12..16).
fn aes_f8_iv(packet: &[u8], srtcp_index_with_flag: u32, ssrc: u32) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[0] = 0x00;
    iv[1] = 0x00;
    iv[4..8].copy_from_slice(&srtcp_index_with_flag.to_be_bytes());
    iv[8] = packet[0];
    iv[9..12].copy_from_slice(&packet[1..4]);
    iv[12..16].copy_from_slice(&ssrc.to_be_bytes());
    iv
}

fn transform(ctx: &SrtpContext, packet: &[u8], srtcp_index: u32, payload: &mut [u8]) -> Result<()> {
    let ssrc = ssrc_of(packet)?;
    match ctx.suite.params().cipher {
        CipherFamily::AesCm => {
            let iv = aes_cm_iv(&ctx.session_keys.rtcp_salt, ssrc, srtcp_index);
            aes_cm::apply_keystream(&ctx.session_keys.rtcp_key, &iv, payload)
        }
        CipherFamily::AesF8 => {
            let iv = aes_f8_iv(packet, srtcp_index | ENCRYPTED_FLAG, ssrc);
            aes_f8::apply_keystream(&ctx.session_keys.rtcp_key, &ctx.session_keys.rtcp_salt, &iv, payload)
        }
    }
}

fn auth_tag(auth_key: &[u8], authenticated_part: &[u8], tag_len: usize) -> Vec<u8> {
    let mut mac = HmacSha1::new_from_slice(auth_key).expect("HMAC accepts any key length");
    mac.update(authenticated_part);
    let full = mac.finalize().into_bytes();
    full[..tag_len].to_vec()
}

/// Encrypt one RTCP packet (spec §4.15 RTCP branch). Uses and then
/// advances `ctx.send_rtcp_index`, wrapping at `2^31`.
pub fn encrypt(ctx: &mut SrtpContext, packet: &[u8]) -> Result<Vec<u8>> {
    if packet.len() < RTCP_HEADER_AND_SSRC_LEN {
        return Err(Error::InputPacketTooShort { actual: packet.len(), minimum: RTCP_HEADER_AND_SSRC_LEN });
    }
    let index = ctx.send_rtcp_index;
    ctx.ensure_session_keys(index as u64)?;

    let mut out = packet.to_vec();
    transform(ctx, packet, index, &mut out[RTCP_HEADER_AND_SSRC_LEN..])?;

    out.extend((index | ENCRYPTED_FLAG).to_be_bytes());

    // Authenticated region is header||ciphertext||SRTCP-index; MKI (if
    // present) is appended after the tag is computed, not before.
    let tag = auth_tag(&ctx.session_keys.rtcp_auth, &out, ctx.suite.tag_len());
    if let Some(mki) = ctx.mki_bytes() {
        out.extend(mki);
    }
    out.extend(tag);

    ctx.send_rtcp_index = (index + 1) & !ENCRYPTED_FLAG;
    Ok(out)
}

/// Decrypt one RTCP packet (spec §4.16 RTCP branch). If the packet's
/// `E` flag is clear the payload was sent unencrypted and is returned
/// as-is (after authentication, per spec).
pub fn decrypt(ctx: &mut SrtpContext, packet: &[u8]) -> Result<Vec<u8>> {
    let tag_len = ctx.suite.tag_len();
    let mki_len = if ctx.mki_enabled { ctx.current_master_key().mki_len as usize } else { 0 };
    let min_len = RTCP_HEADER_AND_SSRC_LEN + SRTCP_INDEX_LEN + mki_len + tag_len;
    if packet.len() < min_len {
        return Err(Error::InputPacketTooShort { actual: packet.len(), minimum: min_len });
    }

    if ctx.mki_enabled {
        let mki_offset = packet.len() - tag_len - mki_len;
        let mki_slice = &packet[mki_offset..mki_offset + mki_len];
        let mut buf = [0u8; 4];
        buf[4 - mki_len..].copy_from_slice(mki_slice);
        ctx.select_master_key_by_mki(u32::from_be_bytes(buf))?;
    }

    let tail_offset = packet.len() - tag_len - mki_len - SRTCP_INDEX_LEN;
    let index_with_flag = u32::from_be_bytes([
        packet[tail_offset],
        packet[tail_offset + 1],
        packet[tail_offset + 2],
        packet[tail_offset + 3],
    ]);
    let is_encrypted = index_with_flag & ENCRYPTED_FLAG != 0;
    let index = index_with_flag & !ENCRYPTED_FLAG;

    let authenticated_end = packet.len() - tag_len - mki_len;
    let authenticated_part = &packet[..authenticated_end];
    let attached_tag = &packet[packet.len() - tag_len..];

    ctx.ensure_session_keys(index as u64)?;
    let expected_tag = auth_tag(&ctx.session_keys.rtcp_auth, authenticated_part, tag_len);
    if attached_tag.ct_eq(&expected_tag).unwrap_u8() != 1 {
        tracing::warn!(srtcp_index = index, "RTCP authentication tag mismatch");
        return Err(Error::Unauthenticated);
    }

    let mut out = packet[..tail_offset].to_vec();
    if is_encrypted {
        transform(ctx, &out, index, &mut out[RTCP_HEADER_AND_SSRC_LEN..])?;
    }
    Ok(out)
}
