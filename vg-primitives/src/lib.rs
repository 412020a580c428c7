#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # vg-primitives
//!
//! The crypto provider capability interface consumed by the vectorgate
//! verification engine, plus [`StandardProvider`], the provider backed by
//! aws-lc-rs and the RustCrypto crates.
//!
//! ## Capabilities
//!
//! - **Cipher contexts**: AES-CBC with PKCS#7 padding, AES-GCM, AES-CCM,
//!   ChaCha20-Poly1305 and XChaCha20-Poly1305 behind a streaming,
//!   control-driven context ([`cipher`])
//! - **Atomic AEAD**: one-shot seal/open through aws-lc-rs ([`aead`])
//! - **MAC**: AES-CMAC and HMAC over SHA-1, SHA-2 and SHA-3 ([`mac`])
//! - **Signatures**: RSASSA-PKCS1-v1_5, RSASSA-PSS, DSA, ECDSA and Ed25519,
//!   with keys parsed from components, DER, PEM, SEC1 points and JWK ([`sig`])
//! - **Key agreement**: ECDH over P-256, P-384, P-521, secp256k1 and X25519
//!   ([`agreement`])
//! - **Key wrap**: AES-KW and AES-KWP ([`key_wrap`])
//! - **KDF**: HKDF ([`kdf`])
//! - **Digests**: the standard digest provider used before signature
//!   verification ([`digest`])

pub mod aead;
pub mod agreement;
pub mod cipher;
pub mod digest;
pub mod error;
pub mod kdf;
pub mod key_wrap;
pub mod keys;
pub mod mac;
pub mod provider;
pub mod sig;

pub use aead::{AeadAlgorithm, AeadProvider, Sealed};
pub use agreement::{AgreementPrivateKey, KeyAgreementProvider, PeerPublicKey};
pub use cipher::{CipherAlgorithm, CipherContext, CipherProvider, Direction};
pub use digest::{digest, DigestAlgorithm};
pub use error::{ProviderError, Result};
pub use kdf::KdfProvider;
pub use key_wrap::{KeyWrapAlgorithm, KeyWrapProvider};
pub use keys::Curve;
pub use mac::{MacAlgorithm, MacContext, MacProvider};
pub use provider::{CryptoProvider, StandardProvider};
pub use sig::{
    Jwk, PublicKeyMaterial, SignatureProvider, SignatureScheme, SignatureVerifier, SignedData,
};
