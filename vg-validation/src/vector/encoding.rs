//! Byte-field encodings used by corpus files.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use std::ops::Deref;

/// A hex-encoded byte field. The empty string decodes to an empty buffer.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexBytes(Vec<u8>);

impl TryFrom<String> for HexBytes {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        hex::decode(value).map(Self)
    }
}

impl From<Vec<u8>> for HexBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Deref for HexBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for HexBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for HexBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HexBytes({})", hex::encode(&self.0))
    }
}

/// A base64url field without padding, as used by JSON Web Keys.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Base64UrlBytes(Vec<u8>);

impl TryFrom<String> for Base64UrlBytes {
    type Error = base64::DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        URL_SAFE_NO_PAD.decode(value.trim_end_matches('=')).map(Self)
    }
}

impl Deref for Base64UrlBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Base64UrlBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Base64UrlBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Base64UrlBytes({})", URL_SAFE_NO_PAD.encode(&self.0))
    }
}

/// An elliptic-curve JSON Web Key as it appears in web-crypto vectors.
///
/// Members are optional because invalid cases deliberately omit them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Jwk {
    /// Key type.
    #[serde(default)]
    pub kty: String,
    /// Curve name.
    #[serde(default)]
    pub crv: String,
    /// X coordinate.
    #[serde(default)]
    pub x: Option<Base64UrlBytes>,
    /// Y coordinate.
    #[serde(default)]
    pub y: Option<Base64UrlBytes>,
    /// Private scalar.
    #[serde(default)]
    pub d: Option<Base64UrlBytes>,
    /// Key identifier.
    #[serde(default)]
    pub kid: Option<String>,
}

impl Jwk {
    /// Borrows the public members in the provider's JWK form.
    ///
    /// Returns `None` when the x coordinate is missing.
    #[must_use]
    pub fn public_material(&self) -> Option<vg_primitives::Jwk<'_>> {
        Some(vg_primitives::Jwk {
            kty: &self.kty,
            crv: &self.crv,
            x: self.x.as_deref()?,
            y: self.y.as_deref(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hex_is_empty_buffer() {
        let bytes: HexBytes = serde_json::from_str("\"\"").unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_hex_decoding() {
        let bytes: HexBytes = serde_json::from_str("\"00ff10\"").unwrap();
        assert_eq!(&*bytes, &[0x00, 0xff, 0x10]);
        assert!(serde_json::from_str::<HexBytes>("\"0g\"").is_err());
        assert!(serde_json::from_str::<HexBytes>("\"abc\"").is_err());
    }

    #[test]
    fn test_base64url_without_padding() {
        let bytes: Base64UrlBytes = serde_json::from_str("\"_-8\"").unwrap();
        assert_eq!(&*bytes, &[0xff, 0xef]);
        assert!(serde_json::from_str::<Base64UrlBytes>("\"+/8\"").is_err());
    }

    #[test]
    fn test_jwk_with_missing_members() {
        let jwk: Jwk = serde_json::from_str(r#"{"kty":"EC","crv":"P-256"}"#).unwrap();
        assert!(jwk.public_material().is_none());
        let jwk: Jwk = serde_json::from_str(r#"{"kty":"EC","crv":"P-256","x":"AQ"}"#).unwrap();
        let material = jwk.public_material().unwrap();
        assert_eq!(material.x, &[1]);
        assert!(material.y.is_none());
    }
}
