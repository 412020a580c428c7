//! RSASSA-PKCS1-v1_5 and RSASSA-PSS.
//!
//! All three key encodings are reduced to `(n, e)` by independent decoders
//! and then go through one constructor, so an encoding-specific parsing bug
//! shows up as a disagreement between them.
//!
//! The rsa crate ties the MGF1 digest to the message digest. PSS parameter
//! sets where the two differ are checked by [`emsa_pss_verify`] on top of the
//! raw public-key operation.

use super::{expect_prehashed, invalid_key, unsupported_encoding, SignatureScheme, SignatureVerifier, SignedData};
use crate::digest::{digest, DigestAlgorithm};
use crate::error::{ProviderError, Result};
use crate::keys::PublicKeyMaterial;
use pkcs8::der::{Decode, Document};
use pkcs8::SubjectPublicKeyInfoRef;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Sign, Pss, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};
use subtle::ConstantTimeEq;

/// Largest modulus accepted, in bits.
pub const MAX_MODULUS_BITS: usize = 8192;

fn spki_components(der: &[u8]) -> Result<(BigUint, BigUint)> {
    let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(invalid_key)?;
    if spki.algorithm.oid != rsa::pkcs1::ALGORITHM_OID {
        return Err(ProviderError::InvalidKey(format!(
            "algorithm {} is not rsaEncryption",
            spki.algorithm.oid
        )));
    }
    let bits = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| ProviderError::InvalidKey("public key bit string has unused bits".to_string()))?;
    let key = rsa::pkcs1::RsaPublicKey::from_der(bits).map_err(invalid_key)?;
    Ok((
        BigUint::from_bytes_be(key.modulus.as_bytes()),
        BigUint::from_bytes_be(key.public_exponent.as_bytes()),
    ))
}

pub(super) fn parse(scheme: SignatureScheme, material: PublicKeyMaterial<'_>) -> Result<RsaPublicKey> {
    let (n, e) = match material {
        PublicKeyMaterial::RsaComponents { n, e } => {
            (BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
        }
        PublicKeyMaterial::Der(der) => spki_components(der)?,
        PublicKeyMaterial::Pem(pem) => {
            let (label, document) = Document::from_pem(pem).map_err(invalid_key)?;
            if label != "PUBLIC KEY" {
                return Err(ProviderError::InvalidKey(format!("unexpected PEM label {label:?}")));
            }
            spki_components(document.as_bytes())?
        }
        other => return Err(unsupported_encoding(scheme, &other)),
    };
    if n.bits() > MAX_MODULUS_BITS {
        return Err(ProviderError::Unsupported(format!("{}-bit RSA modulus", n.bits())));
    }
    RsaPublicKey::new_with_max_size(n, e, MAX_MODULUS_BITS).map_err(invalid_key)
}

macro_rules! with_digest {
    ($digest:expr, $make:ident) => {
        match $digest {
            DigestAlgorithm::Sha1 => $make!(Sha1),
            DigestAlgorithm::Sha224 => $make!(Sha224),
            DigestAlgorithm::Sha256 => $make!(Sha256),
            DigestAlgorithm::Sha384 => $make!(Sha384),
            DigestAlgorithm::Sha512 => $make!(Sha512),
            DigestAlgorithm::Sha512_224 => $make!(Sha512_224),
            DigestAlgorithm::Sha512_256 => $make!(Sha512_256),
            DigestAlgorithm::Sha3_224 => $make!(Sha3_224),
            DigestAlgorithm::Sha3_256 => $make!(Sha3_256),
            DigestAlgorithm::Sha3_384 => $make!(Sha3_384),
            DigestAlgorithm::Sha3_512 => $make!(Sha3_512),
        }
    };
}

#[derive(Debug, Clone, Copy)]
enum Padding {
    Pkcs1v15,
    Pss { mgf_digest: DigestAlgorithm, salt_len: usize },
}

pub(super) struct RsaVerifier {
    key: RsaPublicKey,
    padding: Padding,
}

impl RsaVerifier {
    pub(super) fn pkcs1v15(key: RsaPublicKey) -> Self {
        Self { key, padding: Padding::Pkcs1v15 }
    }

    pub(super) fn pss(key: RsaPublicKey, mgf_digest: DigestAlgorithm, salt_len: usize) -> Self {
        Self { key, padding: Padding::Pss { mgf_digest, salt_len } }
    }
}

impl SignatureVerifier for RsaVerifier {
    fn verify(&self, data: SignedData<'_>, signature: &[u8]) -> Result<bool> {
        let (digest, hash) = expect_prehashed(data)?;
        if hash.len() != digest.output_len() {
            return Err(ProviderError::Unsupported(format!(
                "{}-byte hash for {digest}",
                hash.len()
            )));
        }
        let verified = match self.padding {
            Padding::Pkcs1v15 => {
                macro_rules! pkcs1v15 {
                    ($hash:ty) => {
                        Pkcs1v15Sign::new::<$hash>()
                    };
                }
                let scheme = with_digest!(digest, pkcs1v15);
                self.key.verify(scheme, hash, signature).is_ok()
            }
            Padding::Pss { mgf_digest, salt_len } if mgf_digest != digest => {
                emsa_pss_verify(&self.key, digest, mgf_digest, salt_len, hash, signature)
            }
            Padding::Pss { salt_len, .. } => {
                macro_rules! pss {
                    ($hash:ty) => {
                        Pss::new_with_salt::<$hash>(salt_len)
                    };
                }
                let scheme = with_digest!(digest, pss);
                self.key.verify(scheme, hash, signature).is_ok()
            }
        };
        Ok(verified)
    }
}

/// MGF1 (RFC 8017 B.2.1).
fn mgf1(algorithm: DigestAlgorithm, seed: &[u8], len: usize) -> Vec<u8> {
    let mut mask = Vec::with_capacity(len + algorithm.output_len());
    let mut counter = 0u32;
    while mask.len() < len {
        let mut block = seed.to_vec();
        block.extend_from_slice(&counter.to_be_bytes());
        mask.extend(digest(algorithm, &block));
        counter = counter.wrapping_add(1);
    }
    mask.truncate(len);
    mask
}

/// RSASSA-PSS verification (RFC 8017 8.1.2 and 9.1.2) with independent
/// message and MGF1 digests. `hash` is the message digest.
fn emsa_pss_verify(
    key: &RsaPublicKey,
    digest_algorithm: DigestAlgorithm,
    mgf_digest: DigestAlgorithm,
    salt_len: usize,
    hash: &[u8],
    signature: &[u8],
) -> bool {
    if signature.len() != key.size() {
        return false;
    }
    let s = BigUint::from_bytes_be(signature);
    if &s >= key.n() {
        return false;
    }
    let m = s.modpow(key.e(), key.n()).to_bytes_be();
    let em_bits = key.n().bits().saturating_sub(1);
    let em_len = em_bits.div_ceil(8);
    if m.len() > em_len {
        return false;
    }
    let mut em = vec![0u8; em_len - m.len()];
    em.extend_from_slice(&m);

    let h_len = digest_algorithm.output_len();
    if em_len < h_len + salt_len + 2 {
        return false;
    }
    let Some((&0xbc, rest)) = em.split_last() else {
        return false;
    };
    let (masked_db, h) = rest.split_at(em_len - h_len - 1);
    let top_bits = 0xffu8 >> (8 * em_len - em_bits);
    if masked_db.first().is_some_and(|b| b & !top_bits != 0) {
        return false;
    }
    let mut db: Vec<u8> =
        masked_db.iter().zip(mgf1(mgf_digest, h, masked_db.len())).map(|(m, k)| m ^ k).collect();
    if let Some(first) = db.first_mut() {
        *first &= top_bits;
    }
    let (padding, rest) = db.split_at(em_len - h_len - salt_len - 2);
    let Some((&0x01, salt)) = rest.split_first() else {
        return false;
    };
    if padding.iter().any(|&b| b != 0) {
        return false;
    }
    let mut m_prime = vec![0u8; 8];
    m_prime.extend_from_slice(hash);
    m_prime.extend_from_slice(salt);
    bool::from(digest(digest_algorithm, &m_prime).ct_eq(h))
}
