#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Atomic AEAD interface.
//!
//! One-shot seal and open backed by aws-lc-rs. This is deliberately a
//! separate code path from the streaming [`crate::cipher`] contexts, so the
//! two can be cross-checked against the same vectors.
//!
//! aws-lc-rs only exposes 96-bit nonces and full 128-bit tags for these
//! algorithms; every other parameter set is reported as unsupported through
//! [`AeadProvider::aead_supported`].

use crate::error::{ProviderError, Result};
use aws_lc_rs::aead::{
    Aad, LessSafeKey, Nonce as AwsNonce, UnboundKey, AES_128_GCM, AES_256_GCM, CHACHA20_POLY1305,
};
use tracing::instrument;

/// Nonce length used by the atomic interface.
pub const ATOMIC_NONCE_LEN: usize = 12;

/// Tag length used by the atomic interface.
pub const ATOMIC_TAG_LEN: usize = 16;

/// AEAD algorithms known to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AeadAlgorithm {
    /// AES in counter mode with CBC-MAC.
    AesCcm,
    /// AES in Galois/counter mode.
    AesGcm,
    /// ChaCha20-Poly1305 (RFC 8439).
    ChaCha20Poly1305,
    /// XChaCha20-Poly1305 with 192-bit nonces.
    XChaCha20Poly1305,
}

impl AeadAlgorithm {
    /// Nonce length used when none is configured.
    #[must_use]
    pub fn default_nonce_len(self) -> usize {
        match self {
            Self::XChaCha20Poly1305 => 24,
            Self::AesCcm | Self::AesGcm | Self::ChaCha20Poly1305 => 12,
        }
    }

    /// Tag length used when none is configured.
    #[must_use]
    pub fn default_tag_len(self) -> usize {
        16
    }
}

impl std::fmt::Display for AeadAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AesCcm => "AES-CCM",
            Self::AesGcm => "AES-GCM",
            Self::ChaCha20Poly1305 => "CHACHA20-POLY1305",
            Self::XChaCha20Poly1305 => "XCHACHA20-POLY1305",
        };
        f.write_str(name)
    }
}

/// Output of [`AeadProvider::seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Ciphertext, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Authentication tag.
    pub tag: Vec<u8>,
}

/// Provider capability: one-shot AEAD.
pub trait AeadProvider {
    /// Whether `seal`/`open` can handle this key and tag length.
    fn aead_supported(&self, algorithm: AeadAlgorithm, key_len: usize, tag_len: usize) -> bool;

    /// Encrypts `plaintext` and authenticates it together with `aad`.
    ///
    /// # Errors
    /// Fails for unsupported parameters or invalid key/nonce lengths.
    fn seal(
        &self,
        algorithm: AeadAlgorithm,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        tag_len: usize,
        plaintext: &[u8],
    ) -> Result<Sealed>;

    /// Verifies `tag` over `ciphertext` and `aad` and decrypts.
    ///
    /// # Errors
    /// Returns [`ProviderError::AuthenticationFailed`] when the tag does not verify.
    #[allow(clippy::too_many_arguments)]
    fn open(
        &self,
        algorithm: AeadAlgorithm,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        tag_len: usize,
        ciphertext: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>>;
}

fn aws_algorithm(
    algorithm: AeadAlgorithm,
    key_len: usize,
) -> Option<&'static aws_lc_rs::aead::Algorithm> {
    match (algorithm, key_len) {
        (AeadAlgorithm::AesGcm, 16) => Some(&AES_128_GCM),
        (AeadAlgorithm::AesGcm, 32) => Some(&AES_256_GCM),
        (AeadAlgorithm::ChaCha20Poly1305, 32) => Some(&CHACHA20_POLY1305),
        _ => None,
    }
}

/// aws-lc-rs backed implementation of [`AeadProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsLcAead;

impl AwsLcAead {
    fn key(algorithm: AeadAlgorithm, key: &[u8], tag_len: usize) -> Result<LessSafeKey> {
        if tag_len != ATOMIC_TAG_LEN {
            return Err(ProviderError::InvalidTagLength(tag_len));
        }
        let aws = aws_algorithm(algorithm, key.len()).ok_or_else(|| {
            ProviderError::Unsupported(format!(
                "atomic {algorithm} with a {}-byte key",
                key.len()
            ))
        })?;
        let unbound =
            UnboundKey::new(aws, key).map_err(|_| ProviderError::InvalidKeyLength(key.len()))?;
        Ok(LessSafeKey::new(unbound))
    }

    fn nonce(nonce: &[u8]) -> Result<AwsNonce> {
        AwsNonce::try_assume_unique_for_key(nonce)
            .map_err(|_| ProviderError::InvalidNonceLength(nonce.len()))
    }
}

impl AeadProvider for AwsLcAead {
    fn aead_supported(&self, algorithm: AeadAlgorithm, key_len: usize, tag_len: usize) -> bool {
        tag_len == ATOMIC_TAG_LEN && aws_algorithm(algorithm, key_len).is_some()
    }

    #[instrument(level = "trace", skip_all, fields(%algorithm, nonce_len = nonce.len()))]
    fn seal(
        &self,
        algorithm: AeadAlgorithm,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        tag_len: usize,
        plaintext: &[u8],
    ) -> Result<Sealed> {
        let key = Self::key(algorithm, key, tag_len)?;
        let nonce = Self::nonce(nonce)?;
        let mut in_out = plaintext.to_vec();
        let tag = key
            .seal_in_place_separate_tag(nonce, Aad::from(aad), &mut in_out)
            .map_err(|_| ProviderError::EncryptionFailed("aws-lc-rs seal failed".to_string()))?;
        Ok(Sealed { ciphertext: in_out, tag: tag.as_ref().to_vec() })
    }

    #[instrument(level = "trace", skip_all, fields(%algorithm, nonce_len = nonce.len()))]
    fn open(
        &self,
        algorithm: AeadAlgorithm,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        tag_len: usize,
        ciphertext: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>> {
        let key = Self::key(algorithm, key, tag_len)?;
        let nonce = Self::nonce(nonce)?;
        let mut in_out = Vec::with_capacity(ciphertext.len() + tag.len());
        in_out.extend_from_slice(ciphertext);
        in_out.extend_from_slice(tag);
        let plaintext = key
            .open_in_place(nonce, Aad::from(aad), &mut in_out)
            .map_err(|_| ProviderError::AuthenticationFailed)?;
        Ok(plaintext.to_vec())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gcm_zero_vector() {
        // McGrew-Viega test case 1: empty plaintext, zero key and IV.
        let sealed = AwsLcAead
            .seal(AeadAlgorithm::AesGcm, &[0u8; 16], &[0u8; 12], &[], 16, &[])
            .unwrap();
        assert!(sealed.ciphertext.is_empty());
        assert_eq!(hex::encode(sealed.tag), "58e2fccefa7e3061367f1d57a4e7455a");
    }

    #[test]
    fn test_open_rejects_modified_tag() {
        let key = [0x42u8; 32];
        let nonce = [1u8; 12];
        let sealed = AwsLcAead
            .seal(AeadAlgorithm::ChaCha20Poly1305, &key, &nonce, b"aad", 16, b"message")
            .unwrap();
        let opened = AwsLcAead
            .open(AeadAlgorithm::ChaCha20Poly1305, &key, &nonce, b"aad", 16, &sealed.ciphertext, &sealed.tag)
            .unwrap();
        assert_eq!(opened, b"message");

        let mut tag = sealed.tag.clone();
        tag[15] ^= 1;
        let result = AwsLcAead.open(
            AeadAlgorithm::ChaCha20Poly1305,
            &key,
            &nonce,
            b"aad",
            16,
            &sealed.ciphertext,
            &tag,
        );
        assert_eq!(result, Err(ProviderError::AuthenticationFailed));
    }

    #[test]
    fn test_support_matrix() {
        assert!(AwsLcAead.aead_supported(AeadAlgorithm::AesGcm, 16, 16));
        assert!(AwsLcAead.aead_supported(AeadAlgorithm::AesGcm, 32, 16));
        assert!(!AwsLcAead.aead_supported(AeadAlgorithm::AesGcm, 24, 16));
        assert!(!AwsLcAead.aead_supported(AeadAlgorithm::AesGcm, 16, 12));
        assert!(!AwsLcAead.aead_supported(AeadAlgorithm::AesCcm, 16, 16));
        assert!(!AwsLcAead.aead_supported(AeadAlgorithm::XChaCha20Poly1305, 32, 16));
    }

    #[test]
    fn test_wrong_nonce_length_is_reported() {
        let result = AwsLcAead.seal(AeadAlgorithm::AesGcm, &[0u8; 16], &[0u8; 8], &[], 16, b"x");
        assert_eq!(result, Err(ProviderError::InvalidNonceLength(8)));
    }
}
