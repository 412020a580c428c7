//! Key agreement: ECDH (DER, SEC1 point or JWK peer keys) and X25519.
//!
//! The private key and the peer key are parsed per case, so a rejected peer
//! key is an ordinary failed observation. The shared secret must equal the
//! expected value exactly.

use super::{verify_cases, GroupVerifier, Observed, Step, VerifyEnv};
use crate::report::GroupOutcome;
use crate::vector::schema::{
    EcdhFields, EcdhParams, EcdhWebCryptoFields, EcdhWebCryptoParams, XdhFields, XdhParams,
};
use crate::vector::TestGroup;
use tracing::debug;
use vg_primitives::{Curve, CryptoProvider, ProviderError, PublicKeyMaterial};

fn agree(
    provider: &dyn CryptoProvider,
    curve: Curve,
    private: &[u8],
    public: PublicKeyMaterial<'_>,
) -> vg_primitives::Result<Vec<u8>> {
    let private = provider.private_key(curve, private)?;
    let peer = provider.peer_public_key(curve, public)?;
    private.compute_shared(&peer)
}

/// Verifier for `ECDH` groups with DER or SEC1 point peer keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdhVerifier;

impl GroupVerifier for EcdhVerifier {
    type Params = EcdhParams;
    type Fields = EcdhFields;

    fn verify_group(&self, group: &TestGroup<EcdhParams, EcdhFields>, env: &VerifyEnv<'_>) -> GroupOutcome {
        let params = &group.params;
        let cases = group.tests.len();
        let curve = match Curve::from_name(&params.curve) {
            Some(Curve::X25519) | None => {
                return env.skip_group(format!("unsupported curve {}", params.curve), cases);
            }
            Some(curve) => curve,
        };
        let ecpoint = match params.encoding.as_str() {
            "asn" => false,
            "ecpoint" => true,
            other => return env.skip_group(format!("unsupported key encoding {other}"), cases),
        };
        debug!(algorithm = env.algorithm, %curve, encoding = %params.encoding, cases, "verifying test group");
        verify_cases(env, &group.tests, |case| {
            let f = &case.fields;
            let public = if ecpoint {
                PublicKeyMaterial::Sec1Point(&f.public)
            } else {
                PublicKeyMaterial::Der(&f.public)
            };
            let shared = agree(env.provider, curve, &f.private, public);
            env.judge(&case.meta, Step::Agreement, Observed::bytes(shared, &f.shared))
        })
    }
}

/// Verifier for web-crypto ECDH groups: both keys are JSON Web Keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdhWebCryptoVerifier;

impl GroupVerifier for EcdhWebCryptoVerifier {
    type Params = EcdhWebCryptoParams;
    type Fields = EcdhWebCryptoFields;

    fn verify_group(
        &self,
        group: &TestGroup<EcdhWebCryptoParams, EcdhWebCryptoFields>,
        env: &VerifyEnv<'_>,
    ) -> GroupOutcome {
        let cases = group.tests.len();
        let curve = match Curve::from_name(&group.params.curve) {
            Some(Curve::X25519) | None => {
                return env.skip_group(format!("unsupported curve {}", group.params.curve), cases);
            }
            Some(curve) => curve,
        };
        debug!(algorithm = env.algorithm, %curve, cases, "verifying test group");
        verify_cases(env, &group.tests, |case| {
            let f = &case.fields;
            let shared = match (f.private.d.as_deref(), f.public.public_material()) {
                (Some(scalar), Some(jwk)) => {
                    agree(env.provider, curve, scalar, PublicKeyMaterial::Jwk(jwk))
                }
                (None, _) => Err(ProviderError::InvalidKey("private JWK has no d".to_string())),
                (_, None) => Err(ProviderError::InvalidKey("public JWK has no x".to_string())),
            };
            env.judge(&case.meta, Step::Agreement, Observed::bytes(shared, &f.shared))
        })
    }
}

/// Verifier for `X25519` groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct X25519Verifier;

impl GroupVerifier for X25519Verifier {
    type Params = XdhParams;
    type Fields = XdhFields;

    fn verify_group(&self, group: &TestGroup<XdhParams, XdhFields>, env: &VerifyEnv<'_>) -> GroupOutcome {
        let cases = group.tests.len();
        if Curve::from_name(&group.params.curve) != Some(Curve::X25519) {
            return env.skip_group(format!("unsupported curve {}", group.params.curve), cases);
        }
        debug!(algorithm = env.algorithm, cases, "verifying test group");
        verify_cases(env, &group.tests, |case| {
            let f = &case.fields;
            let shared = agree(env.provider, Curve::X25519, &f.private, PublicKeyMaterial::Raw(&f.public));
            env.judge(&case.meta, Step::Agreement, Observed::bytes(shared, &f.shared))
        })
    }
}
