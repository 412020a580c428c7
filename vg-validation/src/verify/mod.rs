//! Family Verifiers.
//!
//! Each family implements [`GroupVerifier`] over its own group schema. A
//! verifier reduces every provider call to an [`Observed`] value and hands it
//! to [`VerifyEnv::judge`]; [`verify_cases`] folds the case outcomes of a group,
//! logs each failing case once and feeds the audit collector.

pub mod aead;
pub mod cbc;
pub mod kdf;
pub mod key_agreement;
pub mod key_wrap;
pub mod mac;
pub mod signature;

use crate::audit::AuditCollector;
use crate::classify::{classify, AcceptablePolicy, Observation};
use crate::error::DecodeError;
use crate::report::{CaseOutcome, GroupOutcome};
use crate::vector::{decode_groups, CaseMeta, TestCase, TestGroup};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use vg_primitives::{CryptoProvider, ProviderError};

/// Verifies the groups of one algorithm family.
pub trait GroupVerifier: Sync {
    /// Group parameters.
    type Params: DeserializeOwned + Send + Sync;
    /// Case fields.
    type Fields: DeserializeOwned + Send + Sync;

    /// Verifies every case of `group`.
    fn verify_group(
        &self,
        group: &TestGroup<Self::Params, Self::Fields>,
        env: &VerifyEnv<'_>,
    ) -> GroupOutcome;
}

/// Everything a verifier needs besides the group itself.
#[derive(Clone, Copy)]
pub struct VerifyEnv<'a> {
    /// The provider under test.
    pub provider: &'a dyn CryptoProvider,
    /// Run-wide audit sink.
    pub audit: &'a AuditCollector,
    /// Algorithm tag of the file, for diagnostics.
    pub algorithm: &'a str,
    /// Policy for `acceptable` cases of this family.
    pub policy: AcceptablePolicy,
}

impl std::fmt::Debug for VerifyEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyEnv")
            .field("provider", &self.provider.name())
            .field("algorithm", &self.algorithm)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// The operation a judgement is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Configuring the nonce length of a cipher context.
    SetIvLen,
    /// Configuring the tag or tag length of a cipher context.
    SetTag,
    /// Streaming decryption.
    Decrypt,
    /// Streaming encryption.
    Encrypt,
    /// Atomic AEAD open.
    AtomicOpen,
    /// Atomic AEAD seal.
    AtomicSeal,
    /// MAC computation.
    Mac,
    /// Signature verification with the key from the named encoding.
    Verify(&'static str),
    /// Shared secret computation.
    Agreement,
    /// Wrap followed by unwrap.
    KeyWrap,
    /// Key derivation.
    Derive,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetIvLen => f.write_str("set IV length"),
            Self::SetTag => f.write_str("set tag"),
            Self::Decrypt => f.write_str("decrypt"),
            Self::Encrypt => f.write_str("encrypt"),
            Self::AtomicOpen => f.write_str("atomic open"),
            Self::AtomicSeal => f.write_str("atomic seal"),
            Self::Mac => f.write_str("MAC"),
            Self::Verify(encoding) => write!(f, "verify ({encoding} key)"),
            Self::Agreement => f.write_str("key agreement"),
            Self::KeyWrap => f.write_str("wrap/unwrap"),
            Self::Derive => f.write_str("derive"),
        }
    }
}

/// An observation together with the detail shown if it fails its case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    /// What happened.
    pub observation: Observation,
    /// Provider error or expected/actual bytes.
    pub detail: String,
}

impl Observed {
    /// A failed operation.
    #[must_use]
    pub fn failed(error: &impl std::fmt::Display) -> Self {
        Self { observation: Observation::Failed, detail: error.to_string() }
    }

    /// A completed operation whose output is compared with `expected`.
    #[must_use]
    pub fn output(actual: &[u8], expected: &[u8]) -> Self {
        let observation = Observation::compare(actual, expected);
        let detail = match observation {
            Observation::Match => abbreviate(actual),
            _ => format!("expected {}, got {}", abbreviate(expected), abbreviate(actual)),
        };
        Self { observation, detail }
    }

    /// Result of an operation producing bytes.
    #[must_use]
    pub fn bytes(result: vg_primitives::Result<Vec<u8>>, expected: &[u8]) -> Self {
        match result {
            Ok(actual) => Self::output(&actual, expected),
            Err(e) => Self::failed(&e),
        }
    }

    /// Result of a signature verification; a verified signature is a match.
    #[must_use]
    pub fn verified(result: vg_primitives::Result<bool>) -> Self {
        match result {
            Ok(true) => Self { observation: Observation::Match, detail: "signature verified".into() },
            Ok(false) => {
                Self { observation: Observation::Mismatch, detail: "signature rejected".into() }
            }
            Err(e) => Self::failed(&e),
        }
    }

    /// Combines two halves of one case, see [`Observation::combine`].
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            observation: self.observation.combine(other.observation),
            detail: format!("{}; {}", self.detail, other.detail),
        }
    }
}

impl VerifyEnv<'_> {
    /// Judges one operation of a case.
    #[must_use]
    pub fn judge(&self, case: &CaseMeta, step: Step, observed: Observed) -> CaseOutcome {
        let verdict = classify(case.result, observed.observation, self.policy);
        CaseOutcome::from_verdict(verdict, || {
            format!("{step}: {} ({})", observed.observation, observed.detail)
        })
    }

    /// Passes a case whose control step failed when its comment says the
    /// failure is expected; `None` otherwise.
    #[must_use]
    pub fn tolerate(
        &self,
        case: &CaseMeta,
        step: Step,
        error: &ProviderError,
        comments: &[&str],
    ) -> Option<CaseOutcome> {
        comments.contains(&case.comment.as_str()).then(|| {
            debug!(algorithm = self.algorithm, %step, %error, "{case}: tolerated failure");
            CaseOutcome::pass()
        })
    }

    /// Judges a failed control step, unless the case tolerates it.
    #[must_use]
    pub fn control_failure(
        &self,
        case: &CaseMeta,
        step: Step,
        error: &ProviderError,
        comments: &[&str],
    ) -> CaseOutcome {
        self.tolerate(case, step, error, comments)
            .unwrap_or_else(|| self.judge(case, step, Observed::failed(error)))
    }

    /// Skips a group the provider does not support.
    #[must_use]
    pub fn skip_group(&self, reason: impl std::fmt::Display, cases: usize) -> GroupOutcome {
        info!(algorithm = self.algorithm, cases, "skipping test group: {reason}");
        GroupOutcome::skipped()
    }
}

/// Verifies every case of a group in order.
///
/// Each failing case is logged once with all of its failed operations.
pub fn verify_cases<F, C>(env: &VerifyEnv<'_>, tests: &[TestCase<F>], mut verify: C) -> GroupOutcome
where
    C: FnMut(&TestCase<F>) -> CaseOutcome,
{
    let mut group = GroupOutcome::new();
    for case in tests {
        let outcome = verify(case);
        if !outcome.passed {
            warn!(algorithm = env.algorithm, "{} failed: {}", case.meta, outcome.failures.join("; "));
        } else if outcome.auditable {
            env.audit.record(&case.meta);
        }
        group.add_case(&outcome);
    }
    group
}

/// Decodes `groups` into the schema of `verifier` and verifies them.
///
/// # Errors
/// Returns [`DecodeError::Group`] when a group does not fit the schema;
/// nothing is verified in that case.
pub fn run_groups<V: GroupVerifier>(
    verifier: &V,
    groups: &[Value],
    env: &VerifyEnv<'_>,
    parallel: bool,
) -> Result<Vec<GroupOutcome>, DecodeError> {
    let groups: Vec<TestGroup<V::Params, V::Fields>> = decode_groups(groups)?;
    let outcomes = if parallel {
        groups.par_iter().map(|group| verifier.verify_group(group, env)).collect()
    } else {
        groups.iter().map(|group| verifier.verify_group(group, env)).collect()
    };
    Ok(outcomes)
}

const ABBREVIATE_OVER: usize = 32;

/// Hex for diagnostics; long buffers keep their head and tail.
#[must_use]
pub fn abbreviate(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }
    if bytes.len() <= ABBREVIATE_OVER {
        return hex::encode(bytes);
    }
    let (head, rest) = bytes.split_at(12);
    let tail = rest.get(rest.len().saturating_sub(4)..).unwrap_or(rest);
    format!("{}..{} ({} bytes)", hex::encode(head), hex::encode(tail), bytes.len())
}
