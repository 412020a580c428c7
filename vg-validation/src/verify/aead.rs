//! Authenticated encryption: AES-CCM, AES-GCM, ChaCha20-Poly1305 and
//! XChaCha20-Poly1305.
//!
//! Each case is decrypted and encrypted through the streaming cipher context
//! and, where the provider's atomic interface supports the parameters, opened
//! and sealed through it as well. The two paths are judged independently.

use super::{verify_cases, GroupVerifier, Observed, Step, VerifyEnv};
use crate::report::{CaseOutcome, GroupOutcome};
use crate::vector::schema::{AeadFields, AeadParams};
use crate::vector::{TestCase, TestGroup};
use tracing::debug;
use vg_primitives::aead::ATOMIC_NONCE_LEN;
use vg_primitives::{AeadAlgorithm, CipherAlgorithm, CipherContext, Direction};

/// Comments of cases whose nonce length the provider may reject.
pub const TOLERATED_NONCE_COMMENTS: &[&str] =
    &["Nonce is too long", "Invalid nonce size", "0 size IV is not valid", "Very long nonce"];

/// Comments of cases whose tag length the provider may reject.
pub const TOLERATED_TAG_COMMENTS: &[&str] = &["Invalid tag size"];

/// Verifier for AEAD groups.
#[derive(Debug, Clone, Copy)]
pub struct AeadVerifier {
    /// Mode under test.
    pub algorithm: AeadAlgorithm,
}

fn run(
    ctx: &mut dyn CipherContext,
    key: &[u8],
    iv: &[u8],
    direction: Direction,
    aad: &[u8],
    input: &[u8],
) -> vg_primitives::Result<Vec<u8>> {
    ctx.init(key, iv, direction)?;
    ctx.update_aad(aad)?;
    let mut output = ctx.update(input)?;
    output.extend(ctx.finalize()?);
    Ok(output)
}

impl AeadVerifier {
    fn context(&self, env: &VerifyEnv<'_>) -> vg_primitives::Result<Box<dyn CipherContext>> {
        env.provider.cipher(CipherAlgorithm::Aead(self.algorithm))
    }

    fn streaming_decrypt(&self, env: &VerifyEnv<'_>, case: &TestCase<AeadFields>) -> CaseOutcome {
        let f = &case.fields;
        let mut ctx = match self.context(env) {
            Ok(ctx) => ctx,
            Err(e) => return env.judge(&case.meta, Step::Decrypt, Observed::failed(&e)),
        };
        if let Err(e) = ctx.set_iv_len(f.iv.len()) {
            return env.control_failure(&case.meta, Step::SetIvLen, &e, TOLERATED_NONCE_COMMENTS);
        }
        if let Err(e) = ctx.set_tag(&f.tag) {
            return env.control_failure(&case.meta, Step::SetTag, &e, TOLERATED_TAG_COMMENTS);
        }
        let plaintext = run(ctx.as_mut(), &f.key, &f.iv, Direction::Decrypt, &f.aad, &f.ct);
        env.judge(&case.meta, Step::Decrypt, Observed::bytes(plaintext, &f.msg))
    }

    fn streaming_encrypt(
        &self,
        env: &VerifyEnv<'_>,
        case: &TestCase<AeadFields>,
        tag_len: usize,
    ) -> CaseOutcome {
        let f = &case.fields;
        let mut ctx = match self.context(env) {
            Ok(ctx) => ctx,
            Err(e) => return env.judge(&case.meta, Step::Encrypt, Observed::failed(&e)),
        };
        if let Err(e) = ctx.set_iv_len(f.iv.len()) {
            return env.control_failure(&case.meta, Step::SetIvLen, &e, TOLERATED_NONCE_COMMENTS);
        }
        if let Err(e) = ctx.set_tag_len(tag_len) {
            return env.control_failure(&case.meta, Step::SetTag, &e, TOLERATED_TAG_COMMENTS);
        }
        let observed = match run(ctx.as_mut(), &f.key, &f.iv, Direction::Encrypt, &f.aad, &f.msg)
            .and_then(|ciphertext| Ok((ciphertext, ctx.tag()?)))
        {
            Ok((ciphertext, tag)) => {
                Observed::output(&ciphertext, &f.ct).combine(Observed::output(&tag, &f.tag))
            }
            Err(e) => Observed::failed(&e),
        };
        env.judge(&case.meta, Step::Encrypt, observed)
    }

    fn atomic(&self, env: &VerifyEnv<'_>, case: &TestCase<AeadFields>, tag_len: usize) -> CaseOutcome {
        let f = &case.fields;
        let opened =
            env.provider.open(self.algorithm, &f.key, &f.iv, &f.aad, tag_len, &f.ct, &f.tag);
        let open = env.judge(&case.meta, Step::AtomicOpen, Observed::bytes(opened, &f.msg));

        let sealed = match env.provider.seal(self.algorithm, &f.key, &f.iv, &f.aad, tag_len, &f.msg)
        {
            Ok(sealed) => Observed::output(&sealed.ciphertext, &f.ct)
                .combine(Observed::output(&sealed.tag, &f.tag)),
            Err(e) => Observed::failed(&e),
        };
        open.and(env.judge(&case.meta, Step::AtomicSeal, sealed))
    }
}

impl GroupVerifier for AeadVerifier {
    type Params = AeadParams;
    type Fields = AeadFields;

    fn verify_group(&self, group: &TestGroup<AeadParams, AeadFields>, env: &VerifyEnv<'_>) -> GroupOutcome {
        let params = &group.params;
        let tag_len = params.tag_size / 8;
        let atomic = env.provider.aead_supported(self.algorithm, params.key_size / 8, tag_len)
            && params.iv_size == ATOMIC_NONCE_LEN * 8;
        debug!(
            algorithm = env.algorithm,
            key_size = params.key_size,
            iv_size = params.iv_size,
            tag_size = params.tag_size,
            atomic,
            cases = group.tests.len(),
            "verifying test group"
        );
        verify_cases(env, &group.tests, |case| {
            let outcome = self
                .streaming_decrypt(env, case)
                .and(self.streaming_encrypt(env, case, tag_len));
            if atomic && case.fields.iv.len() == ATOMIC_NONCE_LEN {
                outcome.and(self.atomic(env, case, tag_len))
            } else {
                outcome
            }
        })
    }
}
