//! Per-family group parameters and case fields.
//!
//! Group parameters that only describe the vectors (`type`, `keySize` of an
//! embedded key) are decoded when a verifier needs them and ignored otherwise.
//!
//! Signature groups come in two layouts. Older corpora name the embedded key
//! `key`, `keyDer`, `keyPem` and `jwk` and spell RSA components as `n` and
//! `e`; current corpora use `publicKey`, `publicKeyDer`, `publicKeyPem` and
//! `publicKeyJwk`, with RSA components nested under `publicKey`. Both decode
//! into the same structs.

use super::encoding::{HexBytes, Jwk};
use serde::Deserialize;

// =============================================================================
// Symmetric families
// =============================================================================

/// AES-CBC-PKCS5 group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbcParams {
    /// IV size in bits.
    pub iv_size: usize,
    /// Key size in bits.
    pub key_size: usize,
}

/// AES-CBC-PKCS5 case.
#[derive(Debug, Clone, Deserialize)]
pub struct CbcFields {
    /// Key.
    pub key: HexBytes,
    /// IV.
    pub iv: HexBytes,
    /// Plaintext.
    pub msg: HexBytes,
    /// Ciphertext including padding.
    pub ct: HexBytes,
}

/// AEAD group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AeadParams {
    /// Nonce size in bits.
    pub iv_size: usize,
    /// Key size in bits.
    pub key_size: usize,
    /// Tag size in bits.
    pub tag_size: usize,
}

/// AEAD case.
#[derive(Debug, Clone, Deserialize)]
pub struct AeadFields {
    /// Key.
    pub key: HexBytes,
    /// Nonce.
    pub iv: HexBytes,
    /// Associated data.
    pub aad: HexBytes,
    /// Plaintext.
    pub msg: HexBytes,
    /// Ciphertext without the tag.
    pub ct: HexBytes,
    /// Tag.
    pub tag: HexBytes,
}

/// MAC group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacParams {
    /// Key size in bits.
    pub key_size: usize,
    /// Tag size in bits; tags are truncated to this length.
    pub tag_size: usize,
}

/// MAC case.
#[derive(Debug, Clone, Deserialize)]
pub struct MacFields {
    /// Key.
    pub key: HexBytes,
    /// Message.
    pub msg: HexBytes,
    /// Expected (truncated) tag.
    pub tag: HexBytes,
}

/// Key wrap group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyWrapParams {
    /// Key-encryption key size in bits.
    pub key_size: usize,
}

/// Key wrap case.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyWrapFields {
    /// Key-encryption key.
    pub key: HexBytes,
    /// Key data.
    pub msg: HexBytes,
    /// Wrapped key data.
    pub ct: HexBytes,
}

/// HKDF group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HkdfParams {
    /// Input keying material size in bits.
    pub key_size: usize,
}

/// HKDF case.
#[derive(Debug, Clone, Deserialize)]
pub struct HkdfFields {
    /// Input keying material.
    pub ikm: HexBytes,
    /// Salt; empty selects the default salt.
    pub salt: HexBytes,
    /// Context information.
    pub info: HexBytes,
    /// Requested output length in bytes.
    pub size: usize,
    /// Expected output keying material.
    pub okm: HexBytes,
}

// =============================================================================
// Signatures
// =============================================================================

/// Signature case; every signature family shares it.
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureFields {
    /// Signed message.
    pub msg: HexBytes,
    /// Signature in the encoding of the variant.
    pub sig: HexBytes,
}

/// RSA public key components as nested in current corpora.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaPublicComponents {
    /// Modulus.
    pub modulus: HexBytes,
    /// Public exponent.
    pub public_exponent: HexBytes,
}

/// RSASSA-PKCS1-v1_5 group, with the key in three encodings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaSignatureParams {
    /// Public exponent, older layout.
    #[serde(default)]
    pub e: Option<HexBytes>,
    /// Modulus, older layout.
    #[serde(default)]
    pub n: Option<HexBytes>,
    /// Components, current layout.
    #[serde(default)]
    pub public_key: Option<RsaPublicComponents>,
    /// SubjectPublicKeyInfo DER.
    #[serde(default, alias = "publicKeyDer")]
    pub key_der: Option<HexBytes>,
    /// SubjectPublicKeyInfo PEM.
    #[serde(default, alias = "publicKeyPem")]
    pub key_pem: Option<String>,
    /// Modulus size in bits.
    #[serde(default, alias = "keysize")]
    pub key_size: usize,
    /// Message digest.
    pub sha: String,
}

impl RsaSignatureParams {
    /// `(n, e)` from whichever layout the group uses.
    #[must_use]
    pub fn components(&self) -> Option<(&[u8], &[u8])> {
        match &self.public_key {
            Some(key) => Some((&key.modulus, &key.public_exponent)),
            None => self.n.as_deref().zip(self.e.as_deref()),
        }
    }
}

/// RSASSA-PSS group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaPssParams {
    /// Key and digest, as for PKCS#1 v1.5.
    #[serde(flatten)]
    pub rsa: RsaSignatureParams,
    /// Mask generation function, `MGF1`.
    pub mgf: String,
    /// Digest used by MGF1.
    pub mgf_sha: String,
    /// Salt length in bytes.
    pub s_len: usize,
}

/// DSA public key components.
#[derive(Debug, Clone, Deserialize)]
pub struct DsaKey {
    /// Prime modulus.
    pub p: HexBytes,
    /// Subgroup order.
    pub q: HexBytes,
    /// Generator.
    pub g: HexBytes,
    /// Public value.
    pub y: HexBytes,
}

/// DSA group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsaParams {
    /// Public key components.
    #[serde(alias = "publicKey")]
    pub key: DsaKey,
    /// SubjectPublicKeyInfo DER.
    #[serde(default, alias = "publicKeyDer")]
    pub key_der: Option<HexBytes>,
    /// SubjectPublicKeyInfo PEM.
    #[serde(default, alias = "publicKeyPem")]
    pub key_pem: Option<String>,
    /// Message digest.
    pub sha: String,
}

/// ECDSA public key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcPublicKey {
    /// Curve name.
    pub curve: String,
    /// Uncompressed SEC1 point.
    #[serde(default)]
    pub uncompressed: Option<HexBytes>,
}

/// ECDSA group, for the normal and P1363 variants.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcdsaParams {
    /// Public key.
    #[serde(alias = "publicKey")]
    pub key: EcPublicKey,
    /// SubjectPublicKeyInfo DER.
    #[serde(default, alias = "publicKeyDer")]
    pub key_der: Option<HexBytes>,
    /// SubjectPublicKeyInfo PEM.
    #[serde(default, alias = "publicKeyPem")]
    pub key_pem: Option<String>,
    /// Message digest.
    pub sha: String,
}

/// ECDSA web-crypto group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcdsaWebCryptoParams {
    /// Public key.
    #[serde(alias = "publicKey")]
    pub key: EcPublicKey,
    /// Public key as a JSON Web Key.
    #[serde(alias = "publicKeyJwk")]
    pub jwk: Jwk,
    /// Message digest.
    pub sha: String,
}

/// EdDSA public key.
#[derive(Debug, Clone, Deserialize)]
pub struct EdDsaKey {
    /// Curve name, `edwards25519` or `edwards448`.
    pub curve: String,
    /// Raw public key.
    pub pk: HexBytes,
}

/// EdDSA group.
#[derive(Debug, Clone, Deserialize)]
pub struct EdDsaParams {
    /// Public key.
    #[serde(alias = "publicKey")]
    pub key: EdDsaKey,
}

// =============================================================================
// Key agreement
// =============================================================================

/// ECDH group.
#[derive(Debug, Clone, Deserialize)]
pub struct EcdhParams {
    /// Curve name.
    pub curve: String,
    /// Peer key encoding: `asn` (DER) or `ecpoint` (SEC1 point).
    #[serde(default = "default_ecdh_encoding")]
    pub encoding: String,
}

fn default_ecdh_encoding() -> String {
    "asn".to_string()
}

/// ECDH case.
#[derive(Debug, Clone, Deserialize)]
pub struct EcdhFields {
    /// Peer public key.
    pub public: HexBytes,
    /// Private scalar, big-endian, possibly with a leading zero byte.
    pub private: HexBytes,
    /// Expected shared secret.
    pub shared: HexBytes,
}

/// ECDH web-crypto group.
#[derive(Debug, Clone, Deserialize)]
pub struct EcdhWebCryptoParams {
    /// Curve name.
    pub curve: String,
}

/// ECDH web-crypto case.
#[derive(Debug, Clone, Deserialize)]
pub struct EcdhWebCryptoFields {
    /// Peer public key.
    pub public: Jwk,
    /// Private key; the scalar is in `d`.
    pub private: Jwk,
    /// Expected shared secret.
    pub shared: HexBytes,
}

/// X25519 group.
#[derive(Debug, Clone, Deserialize)]
pub struct XdhParams {
    /// Curve name, `curve25519`.
    pub curve: String,
}

/// X25519 case; keys are raw 32-byte strings.
pub type XdhFields = EcdhFields;
