//! Result Classifier.
//!
//! Every verifier reduces what the provider did to an [`Observation`] and asks
//! [`classify`] for the verdict, so the tri-state policy lives in one place.

use crate::vector::ExpectedResult;

/// What the provider did for one operation of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Observation {
    /// The operation reported failure.
    Failed,
    /// The operation succeeded with output that differs from the vector.
    Mismatch,
    /// The operation succeeded with the expected output.
    Match,
}

impl Observation {
    /// Observation for a comparison of produced and expected output.
    #[must_use]
    pub fn compare(actual: &[u8], expected: &[u8]) -> Self {
        if actual == expected { Self::Match } else { Self::Mismatch }
    }

    /// Combines two halves of one case: a match needs both halves to match,
    /// and a failure of either half is a failure.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Match, Self::Match) => Self::Match,
            (Self::Failed, _) | (_, Self::Failed) => Self::Failed,
            _ => Self::Mismatch,
        }
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Failed => "operation failed",
            Self::Mismatch => "output mismatch",
            Self::Match => "output matched",
        })
    }
}

/// How an `acceptable` case is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcceptablePolicy {
    /// Any outcome passes.
    Lenient,
    /// The operation must succeed and match.
    RequireMatch,
    /// The operation may fail, but output it does produce must match.
    MatchIfCompleted,
}

/// Algorithm families, each with its own acceptable policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Block cipher with padding.
    BlockCipher,
    /// Authenticated encryption.
    Aead,
    /// Message authentication codes.
    Mac,
    /// Digital signatures.
    Signature,
    /// ECDH and X25519.
    KeyAgreement,
    /// AES-KW and AES-KWP.
    KeyWrap,
    /// HKDF.
    Kdf,
}

impl Family {
    /// The policy applied to `acceptable` cases of this family.
    #[must_use]
    pub fn acceptable_policy(self) -> AcceptablePolicy {
        match self {
            Self::BlockCipher | Self::Mac | Self::Signature | Self::KeyWrap => {
                AcceptablePolicy::Lenient
            }
            Self::Aead => AcceptablePolicy::RequireMatch,
            Self::KeyAgreement | Self::Kdf => AcceptablePolicy::MatchIfCompleted,
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::BlockCipher => "block cipher",
            Self::Aead => "AEAD",
            Self::Mac => "MAC",
            Self::Signature => "signature",
            Self::KeyAgreement => "key agreement",
            Self::KeyWrap => "key wrap",
            Self::Kdf => "KDF",
        })
    }
}

/// Verdict for one judged operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// The operation met the expectation.
    pub passed: bool,
    /// An `acceptable` case whose output matched; audit mode tallies these.
    pub auditable: bool,
}

/// Judges an observation against the expected result.
#[must_use]
pub fn classify(
    expected: ExpectedResult,
    observation: Observation,
    policy: AcceptablePolicy,
) -> Verdict {
    let matched = observation == Observation::Match;
    match expected {
        ExpectedResult::Valid => Verdict { passed: matched, auditable: false },
        ExpectedResult::Invalid => Verdict { passed: !matched, auditable: false },
        ExpectedResult::Acceptable => {
            let passed = match policy {
                AcceptablePolicy::Lenient => true,
                AcceptablePolicy::RequireMatch => matched,
                AcceptablePolicy::MatchIfCompleted => observation != Observation::Mismatch,
            };
            Verdict { passed, auditable: passed && matched }
        }
    }
}
