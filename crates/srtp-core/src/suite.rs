//! SRTP crypto suites (spec §6.3): key length, authentication tag
//! length, and cipher family bundled as one closed enum, grounded on the
//! teacher's `SrtpCryptoSuite`/`SrtpEncryptionAlgorithm` split
//! (`api/common/srtp.rs`, `security/mod.rs`) but unified into a single
//! type since every suite this crate supports pairs exactly one cipher
//! family with one key size and one tag length.

use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherFamily {
    AesCm,
    AesF8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrtpSuite {
    AesCm128HmacSha1_80,
    AesCm128HmacSha1_32,
    F8_128HmacSha1_80,
    Aes192CmHmacSha1_80,
    Aes192CmHmacSha1_32,
    Aes256CmHmacSha1_80,
    Aes256CmHmacSha1_32,
}

/// Per-suite associated constants (spec §6.3). Master salt is always 14
/// bytes for every defined suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteParams {
    pub key_len: usize,
    pub tag_len: usize,
    pub cipher: CipherFamily,
}

pub const MASTER_SALT_LEN: usize = 14;

impl SrtpSuite {
    pub fn params(self) -> SuiteParams {
        match self {
            SrtpSuite::AesCm128HmacSha1_80 => SuiteParams { key_len: 16, tag_len: 10, cipher: CipherFamily::AesCm },
            SrtpSuite::AesCm128HmacSha1_32 => SuiteParams { key_len: 16, tag_len: 4, cipher: CipherFamily::AesCm },
            SrtpSuite::F8_128HmacSha1_80 => SuiteParams { key_len: 16, tag_len: 10, cipher: CipherFamily::AesF8 },
            SrtpSuite::Aes192CmHmacSha1_80 => SuiteParams { key_len: 24, tag_len: 10, cipher: CipherFamily::AesCm },
            SrtpSuite::Aes192CmHmacSha1_32 => SuiteParams { key_len: 24, tag_len: 4, cipher: CipherFamily::AesCm },
            SrtpSuite::Aes256CmHmacSha1_80 => SuiteParams { key_len: 32, tag_len: 10, cipher: CipherFamily::AesCm },
            SrtpSuite::Aes256CmHmacSha1_32 => SuiteParams { key_len: 32, tag_len: 4, cipher: CipherFamily::AesCm },
        }
    }

    pub fn key_len(self) -> usize {
        self.params().key_len
    }

    pub fn tag_len(self) -> usize {
        self.params().tag_len
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SrtpSuite::AesCm128HmacSha1_80 => "AES_CM_128_HMAC_SHA1_80",
            SrtpSuite::AesCm128HmacSha1_32 => "AES_CM_128_HMAC_SHA1_32",
            SrtpSuite::F8_128HmacSha1_80 => "F8_128_HMAC_SHA1_80",
            SrtpSuite::Aes192CmHmacSha1_80 => "AES_192_CM_HMAC_SHA1_80",
            SrtpSuite::Aes192CmHmacSha1_32 => "AES_192_CM_HMAC_SHA1_32",
            SrtpSuite::Aes256CmHmacSha1_80 => "AES_256_CM_HMAC_SHA1_80",
            SrtpSuite::Aes256CmHmacSha1_32 => "AES_256_CM_HMAC_SHA1_32",
        }
    }

    pub fn parse(name: &str) -> Result<SrtpSuite> {
        Ok(match name {
            "AES_CM_128_HMAC_SHA1_80" => SrtpSuite::AesCm128HmacSha1_80,
            "AES_CM_128_HMAC_SHA1_32" => SrtpSuite::AesCm128HmacSha1_32,
            "F8_128_HMAC_SHA1_80" => SrtpSuite::F8_128HmacSha1_80,
            "AES_192_CM_HMAC_SHA1_80" => SrtpSuite::Aes192CmHmacSha1_80,
            "AES_192_CM_HMAC_SHA1_32" => SrtpSuite::Aes192CmHmacSha1_32,
            "AES_256_CM_HMAC_SHA1_80" => SrtpSuite::Aes256CmHmacSha1_80,
            "AES_256_CM_HMAC_SHA1_32" => SrtpSuite::Aes256CmHmacSha1_32,
            other => return Err(Error::InvalidInput(format!("unsupported SRTP suite: {other}"))),
        })
    }
}

impl fmt::Display for SrtpSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
