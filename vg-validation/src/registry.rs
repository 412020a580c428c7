//! Algorithm Registry.
//!
//! A corpus file's `algorithm` tag, together with the [`Variant`] chosen by the
//! driver, resolves once per file to a [`Suite`]: a closed set of
//! schema-and-verifier pairs. Everything after resolution is statically typed.

use crate::classify::Family;
use crate::error::{ConfigError, DecodeError, RegistryError};
use crate::report::GroupOutcome;
use crate::verify::aead::AeadVerifier;
use crate::verify::cbc::CbcVerifier;
use crate::verify::kdf::HkdfVerifier;
use crate::verify::key_agreement::{EcdhVerifier, EcdhWebCryptoVerifier, X25519Verifier};
use crate::verify::key_wrap::KeyWrapVerifier;
use crate::verify::mac::MacVerifier;
use crate::verify::signature::{
    DsaVerifier, EcdsaVerifier, EcdsaWebCryptoVerifier, EdDsaVerifier, RsaPkcs1Verifier,
    RsaPssVerifier, SigEncoding,
};
use crate::verify::{run_groups, VerifyEnv};
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use vg_primitives::{AeadAlgorithm, DigestAlgorithm, KeyWrapAlgorithm, MacAlgorithm};

/// Flavor of a corpus file that shares its algorithm tag with other files but
/// needs a different verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Native key and signature encodings.
    #[default]
    Normal,
    /// JSON Web Key material and raw `r || s` signatures.
    WebCrypto,
    /// IEEE P1363 (`r || s`) ECDSA signatures with DER keys.
    P1363,
}

impl Variant {
    /// Infers the variant of a corpus file from its name.
    #[must_use]
    pub fn infer_from_path(path: &Path) -> Self {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if name.contains("webcrypto") {
            Self::WebCrypto
        } else if name.contains("_p1363_") {
            Self::P1363
        } else {
            Self::Normal
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::WebCrypto => "webcrypto",
            Self::P1363 => "p1363",
        })
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "webcrypto" | "web-crypto" => Ok(Self::WebCrypto),
            "p1363" => Ok(Self::P1363),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

/// A resolved algorithm: the group schema and the verifier that runs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    /// AES-CBC with PKCS#5 padding.
    Cbc,
    /// AES-CCM, AES-GCM, ChaCha20-Poly1305 and XChaCha20-Poly1305.
    Aead(AeadAlgorithm),
    /// AES-CMAC and HMAC.
    Mac(MacAlgorithm),
    /// HKDF over the given digest.
    Hkdf(DigestAlgorithm),
    /// RSASSA-PKCS1-v1_5.
    RsaPkcs1,
    /// RSASSA-PSS.
    RsaPss,
    /// DSA.
    Dsa,
    /// ECDSA with DER or P1363 signatures.
    Ecdsa(SigEncoding),
    /// ECDSA with JWK keys and P1363 signatures.
    EcdsaWebCrypto,
    /// EdDSA.
    EdDsa,
    /// ECDH with DER or SEC1 point peer keys.
    Ecdh,
    /// ECDH with JWK keys.
    EcdhWebCrypto,
    /// X25519.
    X25519,
    /// AES-KW and AES-KWP.
    KeyWrap(KeyWrapAlgorithm),
}

fn hmac(tag: &str) -> Option<DigestAlgorithm> {
    let digest = match tag {
        "HMACSHA1" => DigestAlgorithm::Sha1,
        "HMACSHA224" => DigestAlgorithm::Sha224,
        "HMACSHA256" => DigestAlgorithm::Sha256,
        "HMACSHA384" => DigestAlgorithm::Sha384,
        "HMACSHA512" => DigestAlgorithm::Sha512,
        "HMACSHA512/224" => DigestAlgorithm::Sha512_224,
        "HMACSHA512/256" => DigestAlgorithm::Sha512_256,
        "HMACSHA3-224" => DigestAlgorithm::Sha3_224,
        "HMACSHA3-256" => DigestAlgorithm::Sha3_256,
        "HMACSHA3-384" => DigestAlgorithm::Sha3_384,
        "HMACSHA3-512" => DigestAlgorithm::Sha3_512,
        _ => return None,
    };
    Some(digest)
}

impl Suite {
    /// Resolves an algorithm tag for `variant`.
    ///
    /// # Errors
    /// [`RegistryError::UnknownAlgorithm`] for a tag no verifier handles, and
    /// [`RegistryError::UnsupportedVariant`] for a known tag requested in a
    /// variant it has no verifier for.
    pub fn resolve(algorithm: &str, variant: Variant) -> Result<Self, RegistryError> {
        let suite = match (algorithm, variant) {
            ("ECDSA", Variant::Normal) => Self::Ecdsa(SigEncoding::Native),
            ("ECDSA", Variant::P1363) => Self::Ecdsa(SigEncoding::P1363),
            ("ECDSA", Variant::WebCrypto) => Self::EcdsaWebCrypto,
            ("ECDH", Variant::Normal) => Self::Ecdh,
            ("ECDH", Variant::WebCrypto) => Self::EcdhWebCrypto,
            (tag, Variant::Normal) => Self::resolve_normal(tag)
                .ok_or_else(|| RegistryError::UnknownAlgorithm(tag.to_string()))?,
            (tag, variant) => {
                let known = tag == "ECDH" || Self::resolve_normal(tag).is_some();
                return Err(if known {
                    RegistryError::UnsupportedVariant { algorithm: tag.to_string(), variant }
                } else {
                    RegistryError::UnknownAlgorithm(tag.to_string())
                });
            }
        };
        Ok(suite)
    }

    fn resolve_normal(tag: &str) -> Option<Self> {
        let suite = match tag {
            "AES-CBC-PKCS5" => Self::Cbc,
            "AES-CCM" => Self::Aead(AeadAlgorithm::AesCcm),
            "AES-GCM" => Self::Aead(AeadAlgorithm::AesGcm),
            "CHACHA20-POLY1305" => Self::Aead(AeadAlgorithm::ChaCha20Poly1305),
            "XCHACHA20-POLY1305" => Self::Aead(AeadAlgorithm::XChaCha20Poly1305),
            "AES-CMAC" => Self::Mac(MacAlgorithm::AesCmac),
            "HKDF-SHA-1" => Self::Hkdf(DigestAlgorithm::Sha1),
            "HKDF-SHA-256" => Self::Hkdf(DigestAlgorithm::Sha256),
            "HKDF-SHA-384" => Self::Hkdf(DigestAlgorithm::Sha384),
            "HKDF-SHA-512" => Self::Hkdf(DigestAlgorithm::Sha512),
            "RSASig" | "RSASSA-PKCS1-v1_5" => Self::RsaPkcs1,
            "RSASSA-PSS" => Self::RsaPss,
            "DSA" => Self::Dsa,
            "EDDSA" => Self::EdDsa,
            "X25519" | "XDH" => Self::X25519,
            "KW" | "AES-WRAP" => Self::KeyWrap(KeyWrapAlgorithm::AesKw),
            "KWP" | "AES-KWP" => Self::KeyWrap(KeyWrapAlgorithm::AesKwp),
            tag => Self::Mac(MacAlgorithm::Hmac(hmac(tag)?)),
        };
        Some(suite)
    }

    /// The algorithm family, which fixes the acceptable policy.
    #[must_use]
    pub fn family(self) -> Family {
        match self {
            Self::Cbc => Family::BlockCipher,
            Self::Aead(_) => Family::Aead,
            Self::Mac(_) => Family::Mac,
            Self::Hkdf(_) => Family::Kdf,
            Self::RsaPkcs1
            | Self::RsaPss
            | Self::Dsa
            | Self::Ecdsa(_)
            | Self::EcdsaWebCrypto
            | Self::EdDsa => Family::Signature,
            Self::Ecdh | Self::EcdhWebCrypto | Self::X25519 => Family::KeyAgreement,
            Self::KeyWrap(_) => Family::KeyWrap,
        }
    }

    /// Decodes and verifies the raw `testGroups` of a file.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] if any group does not fit the suite's schema.
    pub fn execute(
        self,
        groups: &[Value],
        env: &VerifyEnv<'_>,
        parallel: bool,
    ) -> Result<Vec<GroupOutcome>, DecodeError> {
        match self {
            Self::Cbc => run_groups(&CbcVerifier, groups, env, parallel),
            Self::Aead(algorithm) => run_groups(&AeadVerifier { algorithm }, groups, env, parallel),
            Self::Mac(algorithm) => run_groups(&MacVerifier { algorithm }, groups, env, parallel),
            Self::Hkdf(digest) => run_groups(&HkdfVerifier { digest }, groups, env, parallel),
            Self::RsaPkcs1 => run_groups(&RsaPkcs1Verifier, groups, env, parallel),
            Self::RsaPss => run_groups(&RsaPssVerifier, groups, env, parallel),
            Self::Dsa => run_groups(&DsaVerifier, groups, env, parallel),
            Self::Ecdsa(encoding) => run_groups(&EcdsaVerifier { encoding }, groups, env, parallel),
            Self::EcdsaWebCrypto => run_groups(&EcdsaWebCryptoVerifier, groups, env, parallel),
            Self::EdDsa => run_groups(&EdDsaVerifier, groups, env, parallel),
            Self::Ecdh => run_groups(&EcdhVerifier, groups, env, parallel),
            Self::EcdhWebCrypto => run_groups(&EcdhWebCryptoVerifier, groups, env, parallel),
            Self::X25519 => run_groups(&X25519Verifier, groups, env, parallel),
            Self::KeyWrap(algorithm) => {
                run_groups(&KeyWrapVerifier { algorithm }, groups, env, parallel)
            }
        }
    }
}
