//! AES-f8 keystream (spec §4.12, RFC 3711 §4.1.2.1), 128-bit keys only.
//!
//! `m = (salt || 0x55…) XOR key`; `IV' = AES-ECB(m, IV)`; `S0 =
//! AES-ECB(key, IV')`; each subsequent block XORs a big-endian block
//! counter with the previous output and `IV'` before encrypting again.

use crate::aes_block::encrypt_block;
use crate::error::{Error, Result};

const BLOCK_LEN: usize = 16;

fn f8_mask_key(key: &[u8], salt: &[u8]) -> Result<[u8; 16]> {
    if key.len() != 16 {
        return Err(Error::InvalidInput("AES-f8 requires a 128-bit key".into()));
    }
    let mut m = [0x55u8; 16];
    for (i, byte) in salt.iter().enumerate().take(16) {
        m[i] = *byte;
    }
    for i in 0..16 {
        m[i] ^= key[i];
    }
    Ok(m)
}

/// XOR `data` in place with the AES-f8 keystream for the given `iv`
/// (spec §4.12). `salt` is the session salt (zero-padded/truncated to
/// 16 bytes as RFC 3711 describes for the f8 mask).
pub fn apply_keystream(key: &[u8], salt: &[u8], iv: &[u8; 16], data: &mut [u8]) -> Result<()> {
    let m = f8_mask_key(key, salt)?;
    let mut iv_prime = *iv;
    encrypt_block(&m, &mut iv_prime)?;

    let mut s_prev = iv_prime;
    encrypt_block(key, &mut s_prev)?; // S0

    let mut counter: u128 = 0;
    let mut offset = 0;
    while offset < data.len() {
        let take = BLOCK_LEN.min(data.len() - offset);
        for (i, byte) in data[offset..offset + take].iter_mut().enumerate() {
            *byte ^= s_prev[i];
        }
        offset += take;
        if offset >= data.len() {
            break;
        }
        counter += 1;
        let counter_bytes = counter.to_be_bytes();
        let mut next_block = [0u8; 16];
        for i in 0..16 {
            next_block[i] = s_prev[i] ^ counter_bytes[i] ^ iv_prime[i];
        }
        encrypt_block(key, &mut next_block)?;
        s_prev = next_block;
    }
    Ok(())
}
