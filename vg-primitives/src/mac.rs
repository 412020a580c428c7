#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Message authentication codes: AES-CMAC (SP 800-38B) and HMAC (RFC 2104).
//!
//! Contexts follow the init/update/final shape; truncation to the tag size
//! under test is left to the caller.

use crate::digest::DigestAlgorithm;
use crate::error::{ProviderError, Result};
use aes::{Aes128, Aes192, Aes256};
use cmac::Cmac;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

/// MAC algorithms known to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgorithm {
    /// AES-CMAC with a 128, 192 or 256-bit key.
    AesCmac,
    /// HMAC over the given digest.
    Hmac(DigestAlgorithm),
}

impl std::fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AesCmac => f.write_str("AES-CMAC"),
            Self::Hmac(digest) => write!(f, "HMAC-{digest}"),
        }
    }
}

/// An initialised MAC computation.
pub trait MacContext: Send {
    /// Absorbs more message bytes.
    fn update(&mut self, data: &[u8]);

    /// Returns the full-length tag.
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

/// Provider capability: MAC contexts.
pub trait MacProvider {
    /// Initialises a MAC context with `key`.
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidKeyLength`] when the key does not fit the algorithm.
    fn mac(&self, algorithm: MacAlgorithm, key: &[u8]) -> Result<Box<dyn MacContext>>;
}

struct MacState<M>(M);

impl<M: Mac + Send> MacContext for MacState<M> {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().into_bytes().to_vec()
    }
}

fn keyed<M>(key: &[u8]) -> Result<Box<dyn MacContext>>
where
    M: Mac + hmac::digest::KeyInit + Send + 'static,
{
    let mac = <M as hmac::digest::KeyInit>::new_from_slice(key)
        .map_err(|_| ProviderError::InvalidKeyLength(key.len()))?;
    Ok(Box::new(MacState(mac)))
}

/// RustCrypto backed implementation of [`MacProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoMac;

impl MacProvider for RustCryptoMac {
    fn mac(&self, algorithm: MacAlgorithm, key: &[u8]) -> Result<Box<dyn MacContext>> {
        match algorithm {
            MacAlgorithm::AesCmac => match key.len() {
                16 => keyed::<Cmac<Aes128>>(key),
                24 => keyed::<Cmac<Aes192>>(key),
                32 => keyed::<Cmac<Aes256>>(key),
                other => Err(ProviderError::InvalidKeyLength(other)),
            },
            MacAlgorithm::Hmac(digest) => match digest {
                DigestAlgorithm::Sha1 => keyed::<Hmac<Sha1>>(key),
                DigestAlgorithm::Sha224 => keyed::<Hmac<Sha224>>(key),
                DigestAlgorithm::Sha256 => keyed::<Hmac<Sha256>>(key),
                DigestAlgorithm::Sha384 => keyed::<Hmac<Sha384>>(key),
                DigestAlgorithm::Sha512 => keyed::<Hmac<Sha512>>(key),
                DigestAlgorithm::Sha512_224 => keyed::<Hmac<Sha512_224>>(key),
                DigestAlgorithm::Sha512_256 => keyed::<Hmac<Sha512_256>>(key),
                DigestAlgorithm::Sha3_224 => keyed::<Hmac<Sha3_224>>(key),
                DigestAlgorithm::Sha3_256 => keyed::<Hmac<Sha3_256>>(key),
                DigestAlgorithm::Sha3_384 => keyed::<Hmac<Sha3_384>>(key),
                DigestAlgorithm::Sha3_512 => keyed::<Hmac<Sha3_512>>(key),
            },
        }
    }
}
