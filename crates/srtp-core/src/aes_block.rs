//! Single 16-byte-block AES-ECB encryption, dispatched by key length.
//! AES-f8 (§4.12) and session-key derivation (§4.10) both need raw
//! single-block ECB rather than a streaming mode, so this is kept
//! separate from the CTR keystream in [`crate::aes_cm`].

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::cipher::generic_array::GenericArray;

use crate::error::{Error, Result};

/// Encrypt one 16-byte block in place under ECB, with `key` dispatched
/// to AES-128/192/256 by its length (16/24/32 bytes).
pub fn encrypt_block(key: &[u8], block: &mut [u8; 16]) -> Result<()> {
    let mut ga = GenericArray::clone_from_slice(block);
    match key.len() {
        16 => {
            let cipher = aes::Aes128::new(GenericArray::from_slice(key));
            cipher.encrypt_block(&mut ga);
        }
        24 => {
            let cipher = aes::Aes192::new(GenericArray::from_slice(key));
            cipher.encrypt_block(&mut ga);
        }
        32 => {
            let cipher = aes::Aes256::new(GenericArray::from_slice(key));
            cipher.encrypt_block(&mut ga);
        }
        other => return Err(Error::InvalidInput(format!("unsupported AES key length: {other}"))),
    }
    block.copy_from_slice(&ga);
    Ok(())
}
