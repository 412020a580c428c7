//! Curve identifiers and public key material shared by the signature and
//! key agreement capabilities.

use crate::error::{ProviderError, Result};

/// Elliptic curves known to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256 (secp256r1).
    P256,
    /// NIST P-384 (secp384r1).
    P384,
    /// NIST P-521 (secp521r1).
    P521,
    /// secp256k1.
    Secp256k1,
    /// Curve25519 in Montgomery form.
    X25519,
}

impl Curve {
    /// Looks up a curve by its SEC, NIST or JWK name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let curve = match name {
            "secp256r1" | "prime256v1" | "P-256" => Self::P256,
            "secp384r1" | "P-384" => Self::P384,
            "secp521r1" | "P-521" => Self::P521,
            "secp256k1" | "P-256K" => Self::Secp256k1,
            "curve25519" | "X25519" => Self::X25519,
            _ => return None,
        };
        Some(curve)
    }

    /// Name used in JWK `crv` members.
    #[must_use]
    pub fn jwk_name(self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
            Self::Secp256k1 => "P-256K",
            Self::X25519 => "X25519",
        }
    }

    /// Length in bytes of a field element, and so of an ECDH shared secret.
    #[must_use]
    pub fn field_len(self) -> usize {
        match self {
            Self::P256 | Self::Secp256k1 | Self::X25519 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::P256 => "secp256r1",
            Self::P384 => "secp384r1",
            Self::P521 => "secp521r1",
            Self::Secp256k1 => "secp256k1",
            Self::X25519 => "curve25519",
        };
        f.write_str(name)
    }
}

/// Decoded members of an elliptic-curve JSON Web Key.
#[derive(Debug, Clone, Copy)]
pub struct Jwk<'a> {
    /// Key type, `EC` for the keys handled here.
    pub kty: &'a str,
    /// Curve name.
    pub crv: &'a str,
    /// X coordinate, big-endian.
    pub x: &'a [u8],
    /// Y coordinate, big-endian.
    pub y: Option<&'a [u8]>,
}

impl Jwk<'_> {
    /// Uncompressed SEC1 encoding of the point, checking `kty`, `crv` and
    /// that both coordinates have the full field length (RFC 7518 6.2.1).
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidKey`] when any of those checks fails.
    pub fn uncompressed_point(&self, curve: Curve) -> Result<Vec<u8>> {
        if self.kty != "EC" {
            return Err(ProviderError::InvalidKey(format!("JWK kty {:?} is not EC", self.kty)));
        }
        if self.crv != curve.jwk_name() {
            return Err(ProviderError::InvalidKey(format!(
                "JWK crv {:?} does not name {curve}",
                self.crv
            )));
        }
        let y = self.y.ok_or_else(|| ProviderError::InvalidKey("JWK has no y".to_string()))?;
        let field_len = curve.field_len();
        if self.x.len() != field_len || y.len() != field_len {
            return Err(ProviderError::InvalidKey(format!(
                "JWK coordinates must be {field_len} bytes, got {} and {}",
                self.x.len(),
                y.len()
            )));
        }
        let mut point = Vec::with_capacity(1 + 2 * field_len);
        point.push(0x04);
        point.extend_from_slice(self.x);
        point.extend_from_slice(y);
        Ok(point)
    }
}

/// Public key in one of the encodings found in test vector groups.
#[derive(Debug, Clone, Copy)]
pub enum PublicKeyMaterial<'a> {
    /// DER `SubjectPublicKeyInfo`.
    Der(&'a [u8]),
    /// PEM `PUBLIC KEY` document.
    Pem(&'a str),
    /// RSA modulus and public exponent, big-endian.
    RsaComponents {
        /// Modulus.
        n: &'a [u8],
        /// Public exponent.
        e: &'a [u8],
    },
    /// DSA domain parameters and public value, big-endian.
    DsaComponents {
        /// Prime modulus.
        p: &'a [u8],
        /// Subgroup order.
        q: &'a [u8],
        /// Generator.
        g: &'a [u8],
        /// Public value.
        y: &'a [u8],
    },
    /// SEC1 elliptic-curve point, compressed or not.
    Sec1Point(&'a [u8]),
    /// Raw public key bytes (Ed25519, X25519).
    Raw(&'a [u8]),
    /// JSON Web Key.
    Jwk(Jwk<'a>),
}

impl PublicKeyMaterial<'_> {
    /// Short label for diagnostics.
    #[must_use]
    pub fn encoding(&self) -> &'static str {
        match self {
            Self::Der(_) => "DER",
            Self::Pem(_) => "PEM",
            Self::RsaComponents { .. } | Self::DsaComponents { .. } => "components",
            Self::Sec1Point(_) => "EC point",
            Self::Raw(_) => "raw",
            Self::Jwk(_) => "JWK",
        }
    }
}
