//! AES-CM keystream (spec §4.11): a counter-mode cipher over 128-bit
//! blocks, the IV incremented as a big-endian 128-bit integer. Grounded
//! on `other_examples`'s webrtc-rs `CipherAesCmHmacSha1`, which builds
//! this the same way on top of the `ctr` crate's `Ctr128BE<AesNNN>`.

use aes::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};
use ctr::Ctr128BE;

use crate::error::{Error, Result};

type Aes128Ctr = Ctr128BE<aes::Aes128>;
type Aes192Ctr = Ctr128BE<aes::Aes192>;
type Aes256Ctr = Ctr128BE<aes::Aes256>;

/// XOR `data` in place with the AES-CM keystream starting at `iv`,
/// beginning at `block_offset` 128-bit blocks into the stream. Offset
/// support is what lets RTCP skip the unencrypted 8-byte header/SSRC
/// prefix without materializing it (spec §4.11).
pub fn apply_keystream_at_offset(key: &[u8], iv: &[u8; 16], data: &mut [u8], block_offset: u64) -> Result<()> {
    macro_rules! run {
        ($cipher_ty:ty) => {{
            let mut cipher = <$cipher_ty>::new(key.into(), iv.into());
            cipher
                .seek(block_offset * 16);
            cipher.apply_keystream(data);
        }};
    }
    match key.len() {
        16 => run!(Aes128Ctr),
        24 => run!(Aes192Ctr),
        32 => run!(Aes256Ctr),
        other => return Err(Error::InvalidInput(format!("unsupported AES-CM key length: {other}"))),
    }
    Ok(())
}

/// XOR `data` in place with the AES-CM keystream starting at `iv`
/// (block offset 0).
pub fn apply_keystream(key: &[u8], iv: &[u8; 16], data: &mut [u8]) -> Result<()> {
    apply_keystream_at_offset(key, iv, data, 0)
}

/// Generate `len` bytes of AES-CM keystream (equivalent to XOR-ing a
/// zero buffer), used by session-key derivation (spec §4.10).
pub fn keystream(key: &[u8], iv: &[u8; 16], len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    apply_keystream(key, iv, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystream_is_deterministic_for_a_given_key_and_iv() {
        let key = [0x2bu8; 16];
        let iv = [0u8; 16];
        let a = keystream(&key, &iv, 32).unwrap();
        let b = keystream(&key, &iv, 32).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn aligned_and_unaligned_application_agree() {
        let key = [0x2bu8; 16];
        let iv = [0u8; 16];
        let plaintext = vec![0x41u8; 37];

        let mut whole = plaintext.clone();
        apply_keystream(&key, &iv, &mut whole).unwrap();

        let mut split_a = plaintext[..16].to_vec();
        apply_keystream(&key, &iv, &mut split_a).unwrap();
        let mut split_b = plaintext[16..].to_vec();
        apply_keystream_at_offset(&key, &iv, &mut split_b, 1).unwrap();

        assert_eq!(whole[..16], split_a[..]);
        assert_eq!(whole[16..], split_b[..]);
    }

    #[test]
    fn encrypt_then_decrypt_recovers_plaintext() {
        let key = [0x7fu8; 24];
        let iv = [0x11u8; 16];
        let plaintext = b"hello srtp world, this is a test payload".to_vec();
        let mut ciphertext = plaintext.clone();
        apply_keystream(&key, &iv, &mut ciphertext).unwrap();
        assert_ne!(ciphertext, plaintext);
        let mut roundtrip = ciphertext.clone();
        apply_keystream(&key, &iv, &mut roundtrip).unwrap();
        assert_eq!(roundtrip, plaintext);
    }
}
