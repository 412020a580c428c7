//! AES key wrap (RFC 3394) and key wrap with padding (RFC 5649).

use crate::error::{ProviderError, Result};
use aes_kw::{KekAes128, KekAes192, KekAes256};

/// Key wrap algorithms known to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyWrapAlgorithm {
    /// AES-KW, RFC 3394.
    AesKw,
    /// AES-KWP, RFC 5649.
    AesKwp,
}

impl std::fmt::Display for KeyWrapAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AesKw => f.write_str("KW"),
            Self::AesKwp => f.write_str("KWP"),
        }
    }
}

/// Provider capability: key wrapping.
pub trait KeyWrapProvider {
    /// Wraps `plaintext` under the key-encryption key `key`.
    ///
    /// # Errors
    /// Fails for unsupported KEK sizes or plaintext lengths the mode rejects.
    fn wrap(&self, algorithm: KeyWrapAlgorithm, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Unwraps `ciphertext` and checks its integrity value.
    ///
    /// # Errors
    /// Returns [`ProviderError::AuthenticationFailed`] on an integrity check failure.
    fn unwrap(&self, algorithm: KeyWrapAlgorithm, key: &[u8], ciphertext: &[u8])
        -> Result<Vec<u8>>;
}

enum Kek {
    Aes128(KekAes128),
    Aes192(KekAes192),
    Aes256(KekAes256),
}

impl Kek {
    fn new(key: &[u8]) -> Result<Self> {
        let invalid = |_| ProviderError::InvalidKeyLength(key.len());
        match key.len() {
            16 => KekAes128::try_from(key).map(Self::Aes128).map_err(invalid),
            24 => KekAes192::try_from(key).map(Self::Aes192).map_err(invalid),
            32 => KekAes256::try_from(key).map(Self::Aes256).map_err(invalid),
            other => Err(ProviderError::InvalidKeyLength(other)),
        }
    }

    fn wrap(&self, algorithm: KeyWrapAlgorithm, data: &[u8]) -> std::result::Result<Vec<u8>, aes_kw::Error> {
        match (self, algorithm) {
            (Self::Aes128(kek), KeyWrapAlgorithm::AesKw) => kek.wrap_vec(data),
            (Self::Aes192(kek), KeyWrapAlgorithm::AesKw) => kek.wrap_vec(data),
            (Self::Aes256(kek), KeyWrapAlgorithm::AesKw) => kek.wrap_vec(data),
            (Self::Aes128(kek), KeyWrapAlgorithm::AesKwp) => kek.wrap_with_padding_vec(data),
            (Self::Aes192(kek), KeyWrapAlgorithm::AesKwp) => kek.wrap_with_padding_vec(data),
            (Self::Aes256(kek), KeyWrapAlgorithm::AesKwp) => kek.wrap_with_padding_vec(data),
        }
    }

    fn unwrap(&self, algorithm: KeyWrapAlgorithm, data: &[u8]) -> std::result::Result<Vec<u8>, aes_kw::Error> {
        match (self, algorithm) {
            (Self::Aes128(kek), KeyWrapAlgorithm::AesKw) => kek.unwrap_vec(data),
            (Self::Aes192(kek), KeyWrapAlgorithm::AesKw) => kek.unwrap_vec(data),
            (Self::Aes256(kek), KeyWrapAlgorithm::AesKw) => kek.unwrap_vec(data),
            (Self::Aes128(kek), KeyWrapAlgorithm::AesKwp) => kek.unwrap_with_padding_vec(data),
            (Self::Aes192(kek), KeyWrapAlgorithm::AesKwp) => kek.unwrap_with_padding_vec(data),
            (Self::Aes256(kek), KeyWrapAlgorithm::AesKwp) => kek.unwrap_with_padding_vec(data),
        }
    }
}

fn map_kw_error(error: aes_kw::Error) -> ProviderError {
    match error {
        aes_kw::Error::IntegrityCheckFailed => ProviderError::AuthenticationFailed,
        other => ProviderError::DecryptionFailed(other.to_string()),
    }
}

/// RustCrypto backed implementation of [`KeyWrapProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoKeyWrap;

impl KeyWrapProvider for RustCryptoKeyWrap {
    fn wrap(&self, algorithm: KeyWrapAlgorithm, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        // RFC 3394 needs at least two 64-bit blocks.
        if algorithm == KeyWrapAlgorithm::AesKw && (plaintext.len() < 16 || plaintext.len() % 8 != 0)
        {
            return Err(ProviderError::EncryptionFailed(format!(
                "{}-byte input cannot be wrapped with {algorithm}",
                plaintext.len()
            )));
        }
        if algorithm == KeyWrapAlgorithm::AesKwp && plaintext.is_empty() {
            return Err(ProviderError::EncryptionFailed(
                "empty input cannot be wrapped with KWP".to_string(),
            ));
        }
        Kek::new(key)?
            .wrap(algorithm, plaintext)
            .map_err(|e| ProviderError::EncryptionFailed(e.to_string()))
    }

    fn unwrap(
        &self,
        algorithm: KeyWrapAlgorithm,
        key: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        if ciphertext.len() < 16 || ciphertext.len() % 8 != 0 {
            return Err(ProviderError::DecryptionFailed(format!(
                "{}-byte input is not a valid wrapped key",
                ciphertext.len()
            )));
        }
        if algorithm == KeyWrapAlgorithm::AesKw && ciphertext.len() < 24 {
            return Err(ProviderError::DecryptionFailed(
                "RFC 3394 output is at least 24 bytes".to_string(),
            ));
        }
        Kek::new(key)?.unwrap(algorithm, ciphertext).map_err(map_kw_error)
    }
}
