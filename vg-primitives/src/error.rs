//! Error types for the vg-primitives crate.

/// Errors reported by a crypto provider.
///
/// These describe why a single operation could not be completed. The
/// verification engine turns them into failed observations; they are never
/// fatal on their own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The algorithm or parameter combination is not implemented.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The key has a length the algorithm cannot use.
    #[error("Invalid key length: {0} bytes")]
    InvalidKeyLength(usize),

    /// The nonce or IV has a length the algorithm cannot use.
    #[error("Invalid nonce length: {0} bytes")]
    InvalidNonceLength(usize),

    /// The tag has a length the algorithm cannot use.
    #[error("Invalid tag length: {0} bytes")]
    InvalidTagLength(usize),

    /// A cipher context was driven out of order.
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// Key material could not be parsed or failed validation.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A signature could not be decoded.
    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),

    /// Authentication tag or padding check failed on decryption.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Encryption operation failed.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption operation failed.
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Key agreement did not produce a shared secret.
    #[error("Key agreement failed: {0}")]
    AgreementFailed(String),

    /// The requested output length cannot be produced.
    #[error("Invalid output length: {0} bytes")]
    InvalidOutputLength(usize),

    /// A power-up known-answer test did not reproduce its expected value.
    #[error("Self-test failed: {0}")]
    SelfTestFailed(String),
}

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
