//! AES-CMAC and HMAC.

use super::{verify_cases, GroupVerifier, Observed, Step, VerifyEnv};
use crate::report::GroupOutcome;
use crate::vector::schema::{MacFields, MacParams};
use crate::vector::TestGroup;
use tracing::debug;
use vg_primitives::MacAlgorithm;

/// Verifier for MAC groups. Tags are truncated to the group's tag size.
#[derive(Debug, Clone, Copy)]
pub struct MacVerifier {
    /// MAC under test.
    pub algorithm: MacAlgorithm,
}

impl GroupVerifier for MacVerifier {
    type Params = MacParams;
    type Fields = MacFields;

    fn verify_group(&self, group: &TestGroup<MacParams, MacFields>, env: &VerifyEnv<'_>) -> GroupOutcome {
        let tag_len = group.params.tag_size / 8;
        debug!(
            algorithm = env.algorithm,
            key_size = group.params.key_size,
            tag_size = group.params.tag_size,
            cases = group.tests.len(),
            "verifying test group"
        );
        verify_cases(env, &group.tests, |case| {
            let f = &case.fields;
            let tag = env.provider.mac(self.algorithm, &f.key).map(|mut mac| {
                mac.update(&f.msg);
                let mut tag = mac.finalize();
                tag.truncate(tag_len);
                tag
            });
            env.judge(&case.meta, Step::Mac, Observed::bytes(tag, &f.tag))
        })
    }
}
