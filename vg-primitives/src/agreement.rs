#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Key agreement: ECDH over the NIST curves and secp256k1, and X25519.
//!
//! Parsing the peer key and computing the shared secret are separate steps
//! so that a caller can tell a rejected public key apart from a failed
//! agreement. A parsed [`PeerPublicKey`] holds a validated, canonical
//! encoding (uncompressed SEC1 point, or the raw u-coordinate for X25519).

use crate::error::{ProviderError, Result};
pub use crate::keys::Curve;
use crate::keys::PublicKeyMaterial;
use elliptic_curve::sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint};
use elliptic_curve::{AffinePoint, CurveArithmetic, FieldBytesSize, PublicKey, SecretKey};
use pkcs8::{AssociatedOid, DecodePublicKey};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroizing;

/// X25519 scalar and u-coordinate length.
pub const X25519_KEY_LEN: usize = 32;

/// A validated peer public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerPublicKey {
    curve: Curve,
    encoded: Vec<u8>,
}

impl PeerPublicKey {
    /// Curve the key lies on.
    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Canonical encoding of the key.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }
}

/// A private key ready for key agreement.
pub trait AgreementPrivateKey: Send + Sync {
    /// Curve of the private key.
    fn curve(&self) -> Curve;

    /// Computes the shared secret with `peer`; its length is the curve's field width.
    ///
    /// # Errors
    /// Fails when the peer key is on another curve or the result is degenerate.
    fn compute_shared(&self, peer: &PeerPublicKey) -> Result<Vec<u8>>;
}

/// Provider capability: key agreement.
pub trait KeyAgreementProvider {
    /// Builds a private key from a big-endian scalar (X25519: the raw 32 bytes).
    ///
    /// # Errors
    /// Fails when the scalar is out of range for the curve.
    fn private_key(&self, curve: Curve, scalar: &[u8]) -> Result<Box<dyn AgreementPrivateKey>>;

    /// Parses and validates a peer public key.
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidKey`] for malformed encodings, points
    /// not on the curve and keys that name a different curve.
    fn peer_public_key(&self, curve: Curve, material: PublicKeyMaterial<'_>)
        -> Result<PeerPublicKey>;
}

fn invalid_key(error: impl std::fmt::Display) -> ProviderError {
    ProviderError::InvalidKey(error.to_string())
}

/// Left-pads a big-endian scalar to the field width after dropping leading zeros.
fn normalized_scalar(scalar: &[u8], field_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let start = scalar.iter().position(|&b| b != 0).unwrap_or(scalar.len());
    let trimmed = &scalar[start..];
    if trimmed.len() > field_len {
        return Err(ProviderError::InvalidKey(format!(
            "{}-byte scalar does not fit a {field_len}-byte field",
            trimmed.len()
        )));
    }
    let mut padded = Zeroizing::new(vec![0u8; field_len]);
    padded[field_len - trimmed.len()..].copy_from_slice(trimmed);
    Ok(padded)
}

fn ec_secret<C>(scalar: &[u8], field_len: usize) -> Result<SecretKey<C>>
where
    C: CurveArithmetic,
{
    let padded = normalized_scalar(scalar, field_len)?;
    SecretKey::<C>::from_slice(&padded).map_err(invalid_key)
}

fn ec_peer<C>(curve: Curve, material: PublicKeyMaterial<'_>) -> Result<Vec<u8>>
where
    C: CurveArithmetic + AssociatedOid,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let key = match material {
        PublicKeyMaterial::Der(der) => PublicKey::<C>::from_public_key_der(der).map_err(invalid_key)?,
        PublicKeyMaterial::Pem(pem) => PublicKey::<C>::from_public_key_pem(pem).map_err(invalid_key)?,
        PublicKeyMaterial::Sec1Point(point) => {
            PublicKey::<C>::from_sec1_bytes(point).map_err(invalid_key)?
        }
        PublicKeyMaterial::Jwk(jwk) => {
            let point = jwk.uncompressed_point(curve)?;
            PublicKey::<C>::from_sec1_bytes(&point).map_err(invalid_key)?
        }
        other => {
            return Err(ProviderError::Unsupported(format!(
                "{} encoding for an ECDH public key",
                other.encoding()
            )));
        }
    };
    Ok(key.to_encoded_point(false).as_bytes().to_vec())
}

fn ec_shared<C>(secret: &SecretKey<C>, peer: &[u8]) -> Result<Vec<u8>>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let public = PublicKey::<C>::from_sec1_bytes(peer).map_err(invalid_key)?;
    let shared = elliptic_curve::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
    Ok(shared.raw_secret_bytes().to_vec())
}

enum EcdhSecret {
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
    Secp256k1(k256::SecretKey),
}

struct EcdhPrivateKey {
    curve: Curve,
    secret: EcdhSecret,
}

impl AgreementPrivateKey for EcdhPrivateKey {
    fn curve(&self) -> Curve {
        self.curve
    }

    fn compute_shared(&self, peer: &PeerPublicKey) -> Result<Vec<u8>> {
        if peer.curve != self.curve {
            return Err(ProviderError::AgreementFailed(format!(
                "peer key is on {}, private key on {}",
                peer.curve, self.curve
            )));
        }
        match &self.secret {
            EcdhSecret::P256(secret) => ec_shared(secret, &peer.encoded),
            EcdhSecret::P384(secret) => ec_shared(secret, &peer.encoded),
            EcdhSecret::P521(secret) => ec_shared(secret, &peer.encoded),
            EcdhSecret::Secp256k1(secret) => ec_shared(secret, &peer.encoded),
        }
    }
}

struct X25519PrivateKey {
    scalar: Zeroizing<[u8; X25519_KEY_LEN]>,
}

impl AgreementPrivateKey for X25519PrivateKey {
    fn curve(&self) -> Curve {
        Curve::X25519
    }

    fn compute_shared(&self, peer: &PeerPublicKey) -> Result<Vec<u8>> {
        let u: [u8; X25519_KEY_LEN] = peer
            .encoded
            .as_slice()
            .try_into()
            .map_err(|_| ProviderError::AgreementFailed("peer key is not an X25519 key".to_string()))?;
        let secret = StaticSecret::from(*self.scalar);
        let shared = secret.diffie_hellman(&X25519PublicKey::from(u));
        // An all-zero output means the peer sent a low-order point.
        if !shared.was_contributory() {
            return Err(ProviderError::AgreementFailed(
                "shared secret is all zero".to_string(),
            ));
        }
        Ok(shared.as_bytes().to_vec())
    }
}

/// RustCrypto backed implementation of [`KeyAgreementProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoAgreement;

impl KeyAgreementProvider for RustCryptoAgreement {
    fn private_key(&self, curve: Curve, scalar: &[u8]) -> Result<Box<dyn AgreementPrivateKey>> {
        let field_len = curve.field_len();
        let secret = match curve {
            Curve::P256 => EcdhSecret::P256(ec_secret(scalar, field_len)?),
            Curve::P384 => EcdhSecret::P384(ec_secret(scalar, field_len)?),
            Curve::P521 => EcdhSecret::P521(ec_secret(scalar, field_len)?),
            Curve::Secp256k1 => EcdhSecret::Secp256k1(ec_secret(scalar, field_len)?),
            Curve::X25519 => {
                let raw: [u8; X25519_KEY_LEN] = scalar
                    .try_into()
                    .map_err(|_| ProviderError::InvalidKeyLength(scalar.len()))?;
                return Ok(Box::new(X25519PrivateKey { scalar: Zeroizing::new(raw) }));
            }
        };
        Ok(Box::new(EcdhPrivateKey { curve, secret }))
    }

    fn peer_public_key(
        &self,
        curve: Curve,
        material: PublicKeyMaterial<'_>,
    ) -> Result<PeerPublicKey> {
        let encoded = match curve {
            Curve::P256 => ec_peer::<p256::NistP256>(curve, material)?,
            Curve::P384 => ec_peer::<p384::NistP384>(curve, material)?,
            Curve::P521 => ec_peer::<p521::NistP521>(curve, material)?,
            Curve::Secp256k1 => ec_peer::<k256::Secp256k1>(curve, material)?,
            Curve::X25519 => match material {
                PublicKeyMaterial::Raw(raw) if raw.len() == X25519_KEY_LEN => raw.to_vec(),
                PublicKeyMaterial::Raw(raw) => {
                    return Err(ProviderError::InvalidKeyLength(raw.len()));
                }
                other => {
                    return Err(ProviderError::Unsupported(format!(
                        "{} encoding for an X25519 public key",
                        other.encoding()
                    )));
                }
            },
        };
        Ok(PeerPublicKey { curve, encoded })
    }
}
