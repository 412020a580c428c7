//! ECDSA with DER-encoded signatures over P-256, P-384 and secp256k1.

use super::{expect_prehashed, invalid_key, unsupported_encoding, SignatureScheme, SignatureVerifier, SignedData};
use crate::error::{ProviderError, Result};
use crate::keys::{Curve, PublicKeyMaterial};
use ecdsa::signature::hazmat::PrehashVerifier;
use pkcs8::DecodePublicKey;

enum EcdsaKey {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
    Secp256k1(k256::ecdsa::VerifyingKey),
}

pub(super) struct EcdsaVerifier {
    key: EcdsaKey,
}

macro_rules! parse_key {
    ($krate:ident, $scheme:expr, $curve:expr, $material:expr) => {
        match $material {
            PublicKeyMaterial::Der(der) => {
                $krate::ecdsa::VerifyingKey::from_public_key_der(der).map_err(invalid_key)
            }
            PublicKeyMaterial::Pem(pem) => {
                $krate::ecdsa::VerifyingKey::from_public_key_pem(pem).map_err(invalid_key)
            }
            PublicKeyMaterial::Sec1Point(point) => {
                $krate::ecdsa::VerifyingKey::from_sec1_bytes(point).map_err(invalid_key)
            }
            PublicKeyMaterial::Jwk(jwk) => jwk.uncompressed_point($curve).and_then(|point| {
                $krate::ecdsa::VerifyingKey::from_sec1_bytes(&point).map_err(invalid_key)
            }),
            other => Err(unsupported_encoding($scheme, &other)),
        }
    };
}

pub(super) fn parse(
    scheme: SignatureScheme,
    curve: Curve,
    material: PublicKeyMaterial<'_>,
) -> Result<EcdsaVerifier> {
    let key = match curve {
        Curve::P256 => EcdsaKey::P256(parse_key!(p256, scheme, curve, material)?),
        Curve::P384 => EcdsaKey::P384(parse_key!(p384, scheme, curve, material)?),
        Curve::Secp256k1 => EcdsaKey::Secp256k1(parse_key!(k256, scheme, curve, material)?),
        Curve::P521 | Curve::X25519 => {
            return Err(ProviderError::Unsupported(format!("ECDSA over {curve}")));
        }
    };
    Ok(EcdsaVerifier { key })
}

fn malformed(error: impl std::fmt::Display) -> ProviderError {
    ProviderError::InvalidSignature(error.to_string())
}

impl SignatureVerifier for EcdsaVerifier {
    fn verify(&self, data: SignedData<'_>, signature: &[u8]) -> Result<bool> {
        let (_, hash) = expect_prehashed(data)?;
        let verified = match &self.key {
            EcdsaKey::P256(key) => {
                let signature = p256::ecdsa::Signature::from_der(signature).map_err(malformed)?;
                key.verify_prehash(hash, &signature).is_ok()
            }
            EcdsaKey::P384(key) => {
                let signature = p384::ecdsa::Signature::from_der(signature).map_err(malformed)?;
                key.verify_prehash(hash, &signature).is_ok()
            }
            EcdsaKey::Secp256k1(key) => {
                let signature = k256::ecdsa::Signature::from_der(signature).map_err(malformed)?;
                // k256 only accepts low-S signatures; plain ECDSA allows both.
                let signature = signature.normalize_s().unwrap_or(signature);
                key.verify_prehash(hash, &signature).is_ok()
            }
        };
        Ok(verified)
    }
}
