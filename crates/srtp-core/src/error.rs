use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the SRTP/SRTCP pipeline and the SDES codec (spec §7).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// HMAC-SHA1 verification failed on decrypt.
    #[error("authentication failed")]
    Unauthenticated,

    /// Packet carries an MKI with no matching master key in the context.
    #[error("no master key registered for MKI {0}")]
    MasterKeyNotFound(u32),

    /// Packet is too short to contain its expected trailer.
    #[error("packet of {actual} bytes is shorter than the expected minimum of {minimum} bytes")]
    InputPacketTooShort { actual: usize, minimum: usize },

    /// Packet has no room for an authentication tag of the configured length.
    #[error("packet has no authentication tag")]
    NoAuthenticationTag,

    /// Malformed SDES attribute, suite name, or key material.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
