#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Signature verification.
//!
//! Public keys are parsed once into a boxed [`SignatureVerifier`] and then
//! used for every case of a group. Malformed signature encodings are reported
//! as [`ProviderError::InvalidSignature`]; a well-formed signature that does
//! not verify yields `Ok(false)`.

mod dsa;
mod ecdsa;
mod eddsa;
mod rsa;

use crate::digest::DigestAlgorithm;
use crate::error::{ProviderError, Result};
pub use crate::keys::{Curve, Jwk, PublicKeyMaterial};

/// Signature schemes known to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// RSASSA-PKCS1-v1_5.
    RsaPkcs1v15,
    /// RSASSA-PSS with MGF1.
    RsaPss {
        /// Digest used by MGF1.
        mgf_digest: DigestAlgorithm,
        /// Salt length in bytes.
        salt_len: usize,
    },
    /// DSA (FIPS 186-4) with DER signatures.
    Dsa,
    /// ECDSA with DER signatures.
    Ecdsa(Curve),
    /// Ed25519 (RFC 8032).
    Ed25519,
}

impl std::fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RsaPkcs1v15 => f.write_str("RSASSA-PKCS1-v1_5"),
            Self::RsaPss { mgf_digest, salt_len } => {
                write!(f, "RSASSA-PSS (MGF1 {mgf_digest}, salt {salt_len})")
            }
            Self::Dsa => f.write_str("DSA"),
            Self::Ecdsa(curve) => write!(f, "ECDSA {curve}"),
            Self::Ed25519 => f.write_str("Ed25519"),
        }
    }
}

/// Data a signature is checked against.
#[derive(Debug, Clone, Copy)]
pub enum SignedData<'a> {
    /// Digest of the message, computed with the group's hash function.
    Prehashed {
        /// Hash function that produced `hash`.
        digest: DigestAlgorithm,
        /// Message digest.
        hash: &'a [u8],
    },
    /// The message itself, for schemes that hash internally.
    Message(&'a [u8]),
}

/// A parsed public key.
pub trait SignatureVerifier: Send + Sync {
    /// Checks `signature` over `data`.
    ///
    /// # Errors
    /// Fails when the signature cannot be decoded or `data` has the wrong shape
    /// for the scheme.
    fn verify(&self, data: SignedData<'_>, signature: &[u8]) -> Result<bool>;
}

/// Provider capability: signature verification.
pub trait SignatureProvider {
    /// Parses `material` as a public key for `scheme`.
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidKey`] for malformed or invalid keys and
    /// [`ProviderError::Unsupported`] for encodings or parameters the provider
    /// does not handle.
    fn parse_public_key(
        &self,
        scheme: SignatureScheme,
        material: PublicKeyMaterial<'_>,
    ) -> Result<Box<dyn SignatureVerifier>>;
}

pub(crate) fn invalid_key(error: impl std::fmt::Display) -> ProviderError {
    ProviderError::InvalidKey(error.to_string())
}

pub(crate) fn unsupported_encoding(scheme: SignatureScheme, material: &PublicKeyMaterial<'_>) -> ProviderError {
    ProviderError::Unsupported(format!("{} key encoding for {scheme}", material.encoding()))
}

pub(crate) fn expect_prehashed(data: SignedData<'_>) -> Result<(DigestAlgorithm, &[u8])> {
    match data {
        SignedData::Prehashed { digest, hash } => Ok((digest, hash)),
        SignedData::Message(_) => Err(ProviderError::Unsupported(
            "this scheme verifies message digests".to_string(),
        )),
    }
}

/// RustCrypto backed implementation of [`SignatureProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoSignatures;

impl SignatureProvider for RustCryptoSignatures {
    fn parse_public_key(
        &self,
        scheme: SignatureScheme,
        material: PublicKeyMaterial<'_>,
    ) -> Result<Box<dyn SignatureVerifier>> {
        match scheme {
            SignatureScheme::RsaPkcs1v15 => {
                Ok(Box::new(rsa::RsaVerifier::pkcs1v15(rsa::parse(scheme, material)?)))
            }
            SignatureScheme::RsaPss { mgf_digest, salt_len } => Ok(Box::new(
                rsa::RsaVerifier::pss(rsa::parse(scheme, material)?, mgf_digest, salt_len),
            )),
            SignatureScheme::Dsa => Ok(Box::new(dsa::parse(scheme, material)?)),
            SignatureScheme::Ecdsa(curve) => Ok(Box::new(ecdsa::parse(scheme, curve, material)?)),
            SignatureScheme::Ed25519 => Ok(Box::new(eddsa::parse(scheme, material)?)),
        }
    }
}
