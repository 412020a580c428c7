//! Digital signatures: RSASSA-PKCS1-v1_5, RSASSA-PSS, DSA, ECDSA and EdDSA.
//!
//! The public key of a group is parsed once per encoding the group carries,
//! and every case is verified against each parsed key. A key that does not
//! parse makes the cases judged against it fail without calling the
//! verifier. Web-crypto and IEEE P1363 signatures are the raw `r || s`
//! concatenation and are re-encoded as DER before verification.

use super::{verify_cases, GroupVerifier, Observed, Step, VerifyEnv};
use crate::report::{CaseOutcome, GroupOutcome};
use crate::vector::schema::{
    DsaParams, EcdsaParams, EcdsaWebCryptoParams, EdDsaParams, RsaPssParams, RsaSignatureParams,
    SignatureFields,
};
use crate::vector::{HexBytes, TestCase, TestGroup};
use der::asn1::UintRef;
use der::{Encode, Sequence};
use tracing::{debug, warn};
use vg_primitives::{
    digest, Curve, DigestAlgorithm, ProviderError, PublicKeyMaterial, SignatureScheme,
    SignatureVerifier, SignedData,
};

/// Signature encoding used by a family variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigEncoding {
    /// Passed to the provider unchanged: DER for DSA and ECDSA, raw for EdDSA.
    Native,
    /// Fixed-length big-endian `r || s` (IEEE P1363, web crypto).
    P1363,
}

#[derive(Sequence)]
struct DerSignature<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

/// Re-encodes a fixed-length `r || s` signature as DER.
///
/// # Errors
/// Fails when the signature is not exactly two scalars of `scalar_len` bytes.
pub fn raw_to_der(signature: &[u8], scalar_len: usize) -> Result<Vec<u8>, String> {
    if signature.len() != 2 * scalar_len {
        return Err(format!(
            "raw signature is {} bytes, expected {}",
            signature.len(),
            2 * scalar_len
        ));
    }
    let (r, s) = signature.split_at(scalar_len);
    let encoded = DerSignature {
        r: UintRef::new(r).map_err(|e| e.to_string())?,
        s: UintRef::new(s).map_err(|e| e.to_string())?,
    };
    encoded.to_der().map_err(|e| e.to_string())
}

/// How the signed data is presented to the provider.
#[derive(Debug, Clone, Copy)]
enum Hashing {
    Prehash(DigestAlgorithm),
    Message,
}

/// One verification setup shared by every case of a group.
struct SignatureGroup {
    scheme: SignatureScheme,
    hashing: Hashing,
    encoding: SigEncoding,
    scalar_len: usize,
    keys: Vec<(&'static str, Result<Box<dyn SignatureVerifier>, ProviderError>)>,
}

impl SignatureGroup {
    /// Parses every key encoding. `Err` carries the reason to skip the group.
    fn parse(
        env: &VerifyEnv<'_>,
        scheme: SignatureScheme,
        hashing: Hashing,
        encoding: SigEncoding,
        materials: Vec<PublicKeyMaterial<'_>>,
    ) -> Result<Self, String> {
        if materials.is_empty() {
            return Err("group carries no public key".to_string());
        }
        let mut keys = Vec::with_capacity(materials.len());
        for material in materials {
            let name = material.encoding();
            match env.provider.parse_public_key(scheme, material) {
                Err(ProviderError::Unsupported(reason)) => return Err(reason),
                Err(error) => {
                    warn!(algorithm = env.algorithm, %scheme, encoding = name, %error, "public key rejected");
                    keys.push((name, Err(error)));
                }
                Ok(verifier) => keys.push((name, Ok(verifier))),
            }
        }
        Ok(Self { scheme, hashing, encoding, scalar_len: 0, keys })
    }

    fn with_scalar_len(mut self, scalar_len: usize) -> Self {
        self.scalar_len = scalar_len;
        self
    }

    fn verify_case(&self, env: &VerifyEnv<'_>, case: &TestCase<SignatureFields>) -> CaseOutcome {
        let f = &case.fields;
        let hash;
        let data = match self.hashing {
            Hashing::Prehash(algorithm) => {
                hash = digest(algorithm, &f.msg);
                SignedData::Prehashed { digest: algorithm, hash: &hash }
            }
            Hashing::Message => SignedData::Message(&f.msg),
        };
        let signature = match self.encoding {
            SigEncoding::Native => Ok(f.sig.to_vec()),
            SigEncoding::P1363 => raw_to_der(&f.sig, self.scalar_len),
        };
        self.keys
            .iter()
            .map(|(name, key)| {
                let observed = match (key, &signature) {
                    (Err(error), _) => Observed::failed(error),
                    (_, Err(error)) => Observed::failed(error),
                    (Ok(verifier), Ok(signature)) => Observed::verified(verifier.verify(data, signature)),
                };
                env.judge(&case.meta, Step::Verify(*name), observed)
            })
            .reduce(CaseOutcome::and)
            .unwrap_or_else(CaseOutcome::pass)
    }

    fn run(self, env: &VerifyEnv<'_>, tests: &[TestCase<SignatureFields>]) -> GroupOutcome {
        debug!(
            algorithm = env.algorithm,
            scheme = %self.scheme,
            keys = self.keys.len(),
            cases = tests.len(),
            "verifying test group"
        );
        verify_cases(env, tests, |case| self.verify_case(env, case))
    }
}

fn group_digest(env: &VerifyEnv<'_>, sha: &str) -> Option<DigestAlgorithm> {
    let digest = DigestAlgorithm::from_name(sha);
    if digest.is_none() {
        debug!(algorithm = env.algorithm, sha, "unknown digest");
    }
    digest
}

fn spki_materials<'a>(der: Option<&'a HexBytes>, pem: Option<&'a str>) -> Vec<PublicKeyMaterial<'a>> {
    let mut materials = Vec::with_capacity(2);
    if let Some(der) = der {
        materials.push(PublicKeyMaterial::Der(der));
    }
    if let Some(pem) = pem {
        materials.push(PublicKeyMaterial::Pem(pem));
    }
    materials
}

fn run_group(
    env: &VerifyEnv<'_>,
    tests: &[TestCase<SignatureFields>],
    setup: Result<SignatureGroup, String>,
) -> GroupOutcome {
    match setup {
        Ok(group) => group.run(env, tests),
        Err(reason) => env.skip_group(reason, tests.len()),
    }
}

// =============================================================================
// RSA
// =============================================================================

fn rsa_materials(params: &RsaSignatureParams) -> Vec<PublicKeyMaterial<'_>> {
    let mut materials: Vec<_> = params
        .components()
        .map(|(n, e)| PublicKeyMaterial::RsaComponents { n, e })
        .into_iter()
        .collect();
    materials.extend(spki_materials(params.key_der.as_ref(), params.key_pem.as_deref()));
    materials
}

/// Verifier for `RSASSA-PKCS1-v1_5` groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaPkcs1Verifier;

impl GroupVerifier for RsaPkcs1Verifier {
    type Params = RsaSignatureParams;
    type Fields = SignatureFields;

    fn verify_group(
        &self,
        group: &TestGroup<RsaSignatureParams, SignatureFields>,
        env: &VerifyEnv<'_>,
    ) -> GroupOutcome {
        let params = &group.params;
        let Some(digest) = group_digest(env, &params.sha) else {
            return env.skip_group(format!("unsupported digest {}", params.sha), group.tests.len());
        };
        let setup = SignatureGroup::parse(
            env,
            SignatureScheme::RsaPkcs1v15,
            Hashing::Prehash(digest),
            SigEncoding::Native,
            rsa_materials(params),
        );
        run_group(env, &group.tests, setup)
    }
}

/// Verifier for `RSASSA-PSS` groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaPssVerifier;

impl GroupVerifier for RsaPssVerifier {
    type Params = RsaPssParams;
    type Fields = SignatureFields;

    fn verify_group(
        &self,
        group: &TestGroup<RsaPssParams, SignatureFields>,
        env: &VerifyEnv<'_>,
    ) -> GroupOutcome {
        let params = &group.params;
        let cases = group.tests.len();
        if params.mgf != "MGF1" {
            return env.skip_group(format!("unsupported mask function {}", params.mgf), cases);
        }
        let (Some(digest), Some(mgf_digest)) =
            (group_digest(env, &params.rsa.sha), group_digest(env, &params.mgf_sha))
        else {
            return env.skip_group(
                format!("unsupported digests {}/{}", params.rsa.sha, params.mgf_sha),
                cases,
            );
        };
        let scheme = SignatureScheme::RsaPss { mgf_digest, salt_len: params.s_len };
        let setup = SignatureGroup::parse(
            env,
            scheme,
            Hashing::Prehash(digest),
            SigEncoding::Native,
            rsa_materials(&params.rsa),
        );
        run_group(env, &group.tests, setup)
    }
}

// =============================================================================
// DSA
// =============================================================================

/// Verifier for `DSA` groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct DsaVerifier;

impl GroupVerifier for DsaVerifier {
    type Params = DsaParams;
    type Fields = SignatureFields;

    fn verify_group(&self, group: &TestGroup<DsaParams, SignatureFields>, env: &VerifyEnv<'_>) -> GroupOutcome {
        let params = &group.params;
        let Some(digest) = group_digest(env, &params.sha) else {
            return env.skip_group(format!("unsupported digest {}", params.sha), group.tests.len());
        };
        let key = &params.key;
        let mut materials =
            vec![PublicKeyMaterial::DsaComponents { p: &key.p, q: &key.q, g: &key.g, y: &key.y }];
        materials.extend(spki_materials(params.key_der.as_ref(), params.key_pem.as_deref()));
        let setup = SignatureGroup::parse(
            env,
            SignatureScheme::Dsa,
            Hashing::Prehash(digest),
            SigEncoding::Native,
            materials,
        );
        run_group(env, &group.tests, setup)
    }
}

// =============================================================================
// ECDSA
// =============================================================================

/// Verifier for `ECDSA` groups with DER or P1363 signatures.
#[derive(Debug, Clone, Copy)]
pub struct EcdsaVerifier {
    /// Signature encoding of the variant.
    pub encoding: SigEncoding,
}

impl GroupVerifier for EcdsaVerifier {
    type Params = EcdsaParams;
    type Fields = SignatureFields;

    fn verify_group(&self, group: &TestGroup<EcdsaParams, SignatureFields>, env: &VerifyEnv<'_>) -> GroupOutcome {
        let params = &group.params;
        let cases = group.tests.len();
        let Some(curve) = Curve::from_name(&params.key.curve) else {
            return env.skip_group(format!("unsupported curve {}", params.key.curve), cases);
        };
        let Some(digest) = group_digest(env, &params.sha) else {
            return env.skip_group(format!("unsupported digest {}", params.sha), cases);
        };
        let mut materials = spki_materials(params.key_der.as_ref(), params.key_pem.as_deref());
        if let Some(point) = &params.key.uncompressed {
            materials.push(PublicKeyMaterial::Sec1Point(point));
        }
        let setup = SignatureGroup::parse(
            env,
            SignatureScheme::Ecdsa(curve),
            Hashing::Prehash(digest),
            self.encoding,
            materials,
        )
        .map(|group| group.with_scalar_len(curve.field_len()));
        run_group(env, &group.tests, setup)
    }
}

/// Verifier for web-crypto ECDSA groups: JWK keys and raw signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaWebCryptoVerifier;

impl GroupVerifier for EcdsaWebCryptoVerifier {
    type Params = EcdsaWebCryptoParams;
    type Fields = SignatureFields;

    fn verify_group(
        &self,
        group: &TestGroup<EcdsaWebCryptoParams, SignatureFields>,
        env: &VerifyEnv<'_>,
    ) -> GroupOutcome {
        let params = &group.params;
        let cases = group.tests.len();
        let Some(curve) = Curve::from_name(&params.key.curve) else {
            return env.skip_group(format!("unsupported curve {}", params.key.curve), cases);
        };
        let Some(digest) = group_digest(env, &params.sha) else {
            return env.skip_group(format!("unsupported digest {}", params.sha), cases);
        };
        let Some(jwk) = params.jwk.public_material() else {
            return verify_cases(env, &group.tests, |case| {
                env.judge(&case.meta, Step::Verify("JWK"), Observed::failed(&"JWK has no x coordinate"))
            });
        };
        let setup = SignatureGroup::parse(
            env,
            SignatureScheme::Ecdsa(curve),
            Hashing::Prehash(digest),
            SigEncoding::P1363,
            vec![PublicKeyMaterial::Jwk(jwk)],
        )
        .map(|group| group.with_scalar_len(curve.field_len()));
        run_group(env, &group.tests, setup)
    }
}

// =============================================================================
// EdDSA
// =============================================================================

/// Verifier for `EDDSA` groups; only Ed25519 is supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdDsaVerifier;

impl GroupVerifier for EdDsaVerifier {
    type Params = EdDsaParams;
    type Fields = SignatureFields;

    fn verify_group(&self, group: &TestGroup<EdDsaParams, SignatureFields>, env: &VerifyEnv<'_>) -> GroupOutcome {
        let key = &group.params.key;
        if key.curve != "edwards25519" {
            return env.skip_group(format!("unsupported curve {}", key.curve), group.tests.len());
        }
        let setup = SignatureGroup::parse(
            env,
            SignatureScheme::Ed25519,
            Hashing::Message,
            SigEncoding::Native,
            vec![PublicKeyMaterial::Raw(&key.pk)],
        );
        run_group(env, &group.tests, setup)
    }
}
