//! The composed crypto provider.
//!
//! The verification engine only ever talks to a [`CryptoProvider`]: one
//! object exposing every capability it drives. [`StandardProvider`] builds
//! that object from the aws-lc-rs and RustCrypto backends in this crate.

use crate::aead::{AeadAlgorithm, AeadProvider, AwsLcAead, Sealed};
use crate::agreement::{AgreementPrivateKey, Curve, KeyAgreementProvider, PeerPublicKey, RustCryptoAgreement};
use crate::cipher::{BufferedCipher, CipherAlgorithm, CipherContext, CipherProvider};
use crate::digest::DigestAlgorithm;
use crate::error::Result;
use crate::kdf::{KdfProvider, RustCryptoKdf};
use crate::key_wrap::{KeyWrapAlgorithm, KeyWrapProvider, RustCryptoKeyWrap};
use crate::keys::PublicKeyMaterial;
use crate::mac::{MacAlgorithm, MacContext, MacProvider, RustCryptoMac};
use crate::self_test::run_power_up_tests;
use crate::sig::{RustCryptoSignatures, SignatureProvider, SignatureScheme, SignatureVerifier};

/// Every capability the verification engine needs, behind one object.
///
/// Implementations must be shareable across the worker threads that verify
/// groups in parallel.
pub trait CryptoProvider:
    CipherProvider
    + AeadProvider
    + MacProvider
    + SignatureProvider
    + KeyAgreementProvider
    + KeyWrapProvider
    + KdfProvider
    + Send
    + Sync
{
    /// Human-readable provider name, used in logs.
    fn name(&self) -> &str;
}

/// Provider backed by aws-lc-rs (atomic AEAD) and the RustCrypto crates
/// (everything else).
#[derive(Debug, Clone, Copy)]
pub struct StandardProvider {
    aead: AwsLcAead,
    mac: RustCryptoMac,
    signatures: RustCryptoSignatures,
    agreement: RustCryptoAgreement,
    key_wrap: RustCryptoKeyWrap,
    kdf: RustCryptoKdf,
}

impl StandardProvider {
    /// Runs the power-up self-tests and returns the provider.
    ///
    /// # Errors
    /// Returns [`ProviderError::SelfTestFailed`](crate::error::ProviderError::SelfTestFailed)
    /// if any Known Answer Test fails.
    pub fn new() -> Result<Self> {
        run_power_up_tests().to_result()?;
        tracing::debug!("standard provider self-tests passed");
        Ok(Self {
            aead: AwsLcAead,
            mac: RustCryptoMac,
            signatures: RustCryptoSignatures,
            agreement: RustCryptoAgreement,
            key_wrap: RustCryptoKeyWrap,
            kdf: RustCryptoKdf,
        })
    }
}

impl CipherProvider for StandardProvider {
    fn cipher(&self, algorithm: CipherAlgorithm) -> Result<Box<dyn CipherContext>> {
        Ok(Box::new(BufferedCipher::new(algorithm)))
    }
}

impl AeadProvider for StandardProvider {
    fn aead_supported(&self, algorithm: AeadAlgorithm, key_len: usize, tag_len: usize) -> bool {
        self.aead.aead_supported(algorithm, key_len, tag_len)
    }

    fn seal(
        &self,
        algorithm: AeadAlgorithm,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        tag_len: usize,
        plaintext: &[u8],
    ) -> Result<Sealed> {
        self.aead.seal(algorithm, key, nonce, aad, tag_len, plaintext)
    }

    fn open(
        &self,
        algorithm: AeadAlgorithm,
        key: &[u8],
        nonce: &[u8],
        aad: &[u8],
        tag_len: usize,
        ciphertext: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>> {
        self.aead.open(algorithm, key, nonce, aad, tag_len, ciphertext, tag)
    }
}

impl MacProvider for StandardProvider {
    fn mac(&self, algorithm: MacAlgorithm, key: &[u8]) -> Result<Box<dyn MacContext>> {
        self.mac.mac(algorithm, key)
    }
}

impl SignatureProvider for StandardProvider {
    fn parse_public_key(
        &self,
        scheme: SignatureScheme,
        material: PublicKeyMaterial<'_>,
    ) -> Result<Box<dyn SignatureVerifier>> {
        self.signatures.parse_public_key(scheme, material)
    }
}

impl KeyAgreementProvider for StandardProvider {
    fn private_key(&self, curve: Curve, scalar: &[u8]) -> Result<Box<dyn AgreementPrivateKey>> {
        self.agreement.private_key(curve, scalar)
    }

    fn peer_public_key(
        &self,
        curve: Curve,
        material: PublicKeyMaterial<'_>,
    ) -> Result<PeerPublicKey> {
        self.agreement.peer_public_key(curve, material)
    }
}

impl KeyWrapProvider for StandardProvider {
    fn wrap(&self, algorithm: KeyWrapAlgorithm, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.key_wrap.wrap(algorithm, key, plaintext)
    }

    fn unwrap(&self, algorithm: KeyWrapAlgorithm, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.key_wrap.unwrap(algorithm, key, ciphertext)
    }
}

impl KdfProvider for StandardProvider {
    fn hkdf(
        &self,
        digest: DigestAlgorithm,
        ikm: &[u8],
        salt: &[u8],
        info: &[u8],
        length: usize,
    ) -> Result<Vec<u8>> {
        self.kdf.hkdf(digest, ikm, salt, info, length)
    }
}

impl CryptoProvider for StandardProvider {
    fn name(&self) -> &str {
        "standard (aws-lc-rs + RustCrypto)"
    }
}
