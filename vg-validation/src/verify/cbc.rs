//! AES-CBC with PKCS#5 padding.
//!
//! Every case runs in both directions. Padding rejection surfaces as a failed
//! update or finalize, which is an ordinary observation.

use super::{verify_cases, GroupVerifier, Observed, Step, VerifyEnv};
use crate::report::GroupOutcome;
use crate::vector::schema::{CbcFields, CbcParams};
use crate::vector::TestGroup;
use tracing::debug;
use vg_primitives::{CipherAlgorithm, CryptoProvider, Direction};

/// Verifier for `AES-CBC-PKCS5` groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct CbcVerifier;

fn crypt(
    provider: &dyn CryptoProvider,
    direction: Direction,
    key: &[u8],
    iv: &[u8],
    input: &[u8],
) -> vg_primitives::Result<Vec<u8>> {
    let mut ctx = provider.cipher(CipherAlgorithm::AesCbcPkcs5)?;
    ctx.init(key, iv, direction)?;
    let mut output = ctx.update(input)?;
    output.extend(ctx.finalize()?);
    Ok(output)
}

impl GroupVerifier for CbcVerifier {
    type Params = CbcParams;
    type Fields = CbcFields;

    fn verify_group(&self, group: &TestGroup<CbcParams, CbcFields>, env: &VerifyEnv<'_>) -> GroupOutcome {
        debug!(
            algorithm = env.algorithm,
            key_size = group.params.key_size,
            iv_size = group.params.iv_size,
            cases = group.tests.len(),
            "verifying test group"
        );
        verify_cases(env, &group.tests, |case| {
            let f = &case.fields;
            let decrypted = crypt(env.provider, Direction::Decrypt, &f.key, &f.iv, &f.ct);
            let encrypted = crypt(env.provider, Direction::Encrypt, &f.key, &f.iv, &f.msg);
            env.judge(&case.meta, Step::Decrypt, Observed::bytes(decrypted, &f.msg))
                .and(env.judge(&case.meta, Step::Encrypt, Observed::bytes(encrypted, &f.ct)))
        })
    }
}
