//! Shared helpers for the engine integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vg_primitives::{
    AeadAlgorithm, AeadProvider, AgreementPrivateKey, CipherAlgorithm, CipherContext,
    CipherProvider, CryptoProvider, Curve, DigestAlgorithm, KdfProvider, KeyAgreementProvider,
    KeyWrapAlgorithm, KeyWrapProvider, MacAlgorithm, MacContext, MacProvider, PeerPublicKey,
    PublicKeyMaterial, Result, Sealed, SignatureProvider, SignatureScheme, SignatureVerifier,
    SignedData, StandardProvider,
};
use vg_validation::{
    AuditCollector, FileOutcome, Harness, HarnessConfig, HarnessError, Variant,
};

/// The standard provider, with a counter of signature verifications.
pub struct CountingProvider {
    inner: StandardProvider,
    verifications: Arc<AtomicUsize>,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self { inner: StandardProvider::new().unwrap(), verifications: Arc::default() }
    }

    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

struct CountingVerifier {
    inner: Box<dyn SignatureVerifier>,
    verifications: Arc<AtomicUsize>,
}

impl SignatureVerifier for CountingVerifier {
    fn verify(&self, data: SignedData<'_>, signature: &[u8]) -> Result<bool> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(data, signature)
    }
}

impl CipherProvider for CountingProvider {
    fn cipher(&self, algorithm: CipherAlgorithm) -> Result<Box<dyn CipherContext>> {
        self.inner.cipher(algorithm)
    }
}

impl AeadProvider for CountingProvider {
    fn aead_supported(&self, algorithm: AeadAlgorithm, key_len: usize, tag_len: usize) -> bool {
        self.inner.aead_supported(algorithm, key_len, tag_len)
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
        self.inner.seal(algorithm, key, nonce, aad, tag_len, plaintext)
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
        self.inner.open(algorithm, key, nonce, aad, tag_len, ciphertext, tag)
    }
}

impl MacProvider for CountingProvider {
    fn mac(&self, algorithm: MacAlgorithm, key: &[u8]) -> Result<Box<dyn MacContext>> {
        self.inner.mac(algorithm, key)
    }
}

impl SignatureProvider for CountingProvider {
    fn parse_public_key(
        &self,
        scheme: SignatureScheme,
        material: PublicKeyMaterial<'_>,
    ) -> Result<Box<dyn SignatureVerifier>> {
        let inner = self.inner.parse_public_key(scheme, material)?;
        Ok(Box::new(CountingVerifier { inner, verifications: Arc::clone(&self.verifications) }))
    }
}

impl KeyAgreementProvider for CountingProvider {
    fn private_key(&self, curve: Curve, scalar: &[u8]) -> Result<Box<dyn AgreementPrivateKey>> {
        self.inner.private_key(curve, scalar)
    }

    fn peer_public_key(
        &self,
        curve: Curve,
        material: PublicKeyMaterial<'_>,
    ) -> Result<PeerPublicKey> {
        self.inner.peer_public_key(curve, material)
    }
}

impl KeyWrapProvider for CountingProvider {
    fn wrap(&self, algorithm: KeyWrapAlgorithm, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.inner.wrap(algorithm, key, plaintext)
    }

    fn unwrap(&self, algorithm: KeyWrapAlgorithm, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.inner.unwrap(algorithm, key, ciphertext)
    }
}

impl KdfProvider for CountingProvider {
    fn hkdf(
        &self,
        digest: DigestAlgorithm,
        ikm: &[u8],
        salt: &[u8],
        info: &[u8],
        length: usize,
    ) -> Result<Vec<u8>> {
        self.inner.hkdf(digest, ikm, salt, info, length)
    }
}

impl CryptoProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }
}

/// A corpus document with the given groups.
pub fn corpus(algorithm: &str, groups: Value) -> Vec<u8> {
    let number_of_tests: usize = groups
        .as_array()
        .map(|groups| groups.iter().filter_map(|g| g["tests"].as_array()).map(Vec::len).sum())
        .unwrap_or(0);
    serde_json::to_vec(&json!({
        "algorithm": algorithm,
        "generatorVersion": "0.8",
        "numberOfTests": number_of_tests,
        "header": [],
        "notes": {},
        "testGroups": groups,
    }))
    .unwrap()
}

/// Cuts the cases with the given ids out of a published corpus.
///
/// Groups keep their parameters; groups left without cases are dropped.
pub fn excerpt(json: &str, tc_ids: &[u64]) -> Value {
    let mut doc: Value = serde_json::from_str(json).unwrap();
    let groups = doc["testGroups"].as_array_mut().unwrap();
    for group in groups.iter_mut() {
        group["tests"]
            .as_array_mut()
            .unwrap()
            .retain(|case| tc_ids.contains(&case["tcId"].as_u64().unwrap()));
    }
    groups.retain(|group| group["tests"].as_array().is_some_and(|tests| !tests.is_empty()));
    doc["numberOfTests"] = json!(tc_ids.len());
    doc
}

/// Mutable access to the case with the given id in an excerpt.
pub fn case_mut(doc: &mut Value, tc_id: u64) -> &mut Value {
    doc["testGroups"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .flat_map(|group| group["tests"].as_array_mut().unwrap().iter_mut())
        .find(|case| case["tcId"].as_u64() == Some(tc_id))
        .unwrap()
}

/// Runs one document in the given variant.
pub fn run_document(
    provider: &dyn CryptoProvider,
    document: &[u8],
    variant: Variant,
) -> std::result::Result<FileOutcome, HarnessError> {
    let harness = Harness::new(HarnessConfig::new().with_parallel(false), provider)?;
    let audit = AuditCollector::new(false);
    harness.run_document(Path::new("inline_test.json"), document, variant, &audit)
}

/// Runs one document in the normal variant and expects it to decode.
pub fn run_normal(provider: &dyn CryptoProvider, document: &[u8]) -> FileOutcome {
    run_document(provider, document, Variant::Normal).unwrap()
}

/// Computes a MAC through the provider.
pub fn mac(provider: &dyn CryptoProvider, algorithm: MacAlgorithm, key: &[u8], msg: &[u8]) -> Vec<u8> {
    let mut ctx = provider.mac(algorithm, key).unwrap();
    ctx.update(msg);
    ctx.finalize()
}
