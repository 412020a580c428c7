//! AES-KW and AES-KWP.

use super::{verify_cases, GroupVerifier, Observed, Step, VerifyEnv};
use crate::report::GroupOutcome;
use crate::vector::schema::{KeyWrapFields, KeyWrapParams};
use crate::vector::TestGroup;
use tracing::debug;
use vg_primitives::KeyWrapAlgorithm;

/// Verifier for key wrap groups.
///
/// Wrapping must reproduce the ciphertext and unwrapping must recover the key
/// data; the two halves are judged as one combined observation.
#[derive(Debug, Clone, Copy)]
pub struct KeyWrapVerifier {
    /// Wrap mode under test.
    pub algorithm: KeyWrapAlgorithm,
}

impl GroupVerifier for KeyWrapVerifier {
    type Params = KeyWrapParams;
    type Fields = KeyWrapFields;

    fn verify_group(
        &self,
        group: &TestGroup<KeyWrapParams, KeyWrapFields>,
        env: &VerifyEnv<'_>,
    ) -> GroupOutcome {
        debug!(
            algorithm = env.algorithm,
            key_size = group.params.key_size,
            cases = group.tests.len(),
            "verifying test group"
        );
        verify_cases(env, &group.tests, |case| {
            let f = &case.fields;
            let wrapped = env.provider.wrap(self.algorithm, &f.key, &f.msg);
            let unwrapped = env.provider.unwrap(self.algorithm, &f.key, &f.ct);
            let observed = Observed::bytes(wrapped, &f.ct).combine(Observed::bytes(unwrapped, &f.msg));
            env.judge(&case.meta, Step::KeyWrap, observed)
        })
    }
}
