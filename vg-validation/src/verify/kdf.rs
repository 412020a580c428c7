//! HKDF.

use super::{verify_cases, GroupVerifier, Observed, Step, VerifyEnv};
use crate::report::GroupOutcome;
use crate::vector::schema::{HkdfFields, HkdfParams};
use crate::vector::TestGroup;
use tracing::debug;
use vg_primitives::DigestAlgorithm;

/// Verifier for `HKDF-SHA-*` groups.
#[derive(Debug, Clone, Copy)]
pub struct HkdfVerifier {
    /// Digest the HMAC is built on.
    pub digest: DigestAlgorithm,
}

impl GroupVerifier for HkdfVerifier {
    type Params = HkdfParams;
    type Fields = HkdfFields;

    fn verify_group(&self, group: &TestGroup<HkdfParams, HkdfFields>, env: &VerifyEnv<'_>) -> GroupOutcome {
        debug!(
            algorithm = env.algorithm,
            key_size = group.params.key_size,
            cases = group.tests.len(),
            "verifying test group"
        );
        verify_cases(env, &group.tests, |case| {
            let f = &case.fields;
            let okm = env.provider.hkdf(self.digest, &f.ikm, &f.salt, &f.info, f.size);
            env.judge(&case.meta, Step::Derive, Observed::bytes(okm, &f.okm))
        })
    }
}
