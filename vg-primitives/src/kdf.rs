//! HKDF (RFC 5869).

use crate::digest::DigestAlgorithm;
use crate::error::{ProviderError, Result};
use hkdf::Hkdf;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

/// Provider capability: key derivation.
pub trait KdfProvider {
    /// Extract-then-expand HKDF producing `length` bytes.
    ///
    /// An empty `salt` is the RFC 5869 default of a zero-filled block.
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidOutputLength`] when `length` exceeds
    /// 255 digest blocks, or [`ProviderError::Unsupported`] for digests without
    /// an HKDF instantiation.
    fn hkdf(
        &self,
        digest: DigestAlgorithm,
        ikm: &[u8],
        salt: &[u8],
        info: &[u8],
        length: usize,
    ) -> Result<Vec<u8>>;
}

macro_rules! hkdf_expand {
    ($hash:ty, $ikm:expr, $salt:expr, $info:expr, $length:expr) => {{
        let hk = Hkdf::<$hash>::new(Some($salt), $ikm);
        let mut okm = vec![0u8; $length];
        hk.expand($info, &mut okm)
            .map_err(|_| ProviderError::InvalidOutputLength($length))?;
        Ok(okm)
    }};
}

/// RustCrypto backed implementation of [`KdfProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoKdf;

impl KdfProvider for RustCryptoKdf {
    fn hkdf(
        &self,
        digest: DigestAlgorithm,
        ikm: &[u8],
        salt: &[u8],
        info: &[u8],
        length: usize,
    ) -> Result<Vec<u8>> {
        if length > 255 * digest.output_len() {
            return Err(ProviderError::InvalidOutputLength(length));
        }
        match digest {
            DigestAlgorithm::Sha1 => hkdf_expand!(Sha1, ikm, salt, info, length),
            DigestAlgorithm::Sha224 => hkdf_expand!(Sha224, ikm, salt, info, length),
            DigestAlgorithm::Sha256 => hkdf_expand!(Sha256, ikm, salt, info, length),
            DigestAlgorithm::Sha384 => hkdf_expand!(Sha384, ikm, salt, info, length),
            DigestAlgorithm::Sha512 => hkdf_expand!(Sha512, ikm, salt, info, length),
            other => Err(ProviderError::Unsupported(format!("HKDF-{other}"))),
        }
    }
}
