//! Vector Model & Decoder.
//!
//! A corpus file is decoded in two stages. [`CorpusFile::decode`] checks the
//! top-level shape and keeps each test group as raw JSON; once the algorithm
//! tag has been resolved, the groups are decoded into the family schema with
//! [`CorpusFile::decode_groups`]. Fields shared by every test case live in
//! [`CaseMeta`]; family fields are flattened in beside them.

pub mod encoding;
pub mod schema;

use crate::error::DecodeError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

pub use encoding::{Base64UrlBytes, HexBytes, Jwk};

/// Tri-state expected result of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedResult {
    /// The operation must succeed and match.
    Valid,
    /// The operation must not succeed with matching output.
    Invalid,
    /// Borderline; the family policy decides.
    Acceptable,
}

impl std::fmt::Display for ExpectedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Acceptable => "acceptable",
        })
    }
}

/// Members every test case carries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseMeta {
    /// Case identifier, unique within the file.
    pub tc_id: u64,
    /// Free-text description.
    #[serde(default)]
    pub comment: String,
    /// Expected verdict.
    pub result: ExpectedResult,
    /// Semantic flags; their meaning is listed in the file notes.
    #[serde(default)]
    pub flags: BTreeSet<String>,
}

impl std::fmt::Display for CaseMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Test case {} ({})", self.tc_id, self.comment)?;
        if !self.flags.is_empty() {
            let flags: Vec<&str> = self.flags.iter().map(String::as_str).collect();
            write!(f, " [{}]", flags.join(","))?;
        }
        write!(f, " {}", self.result)
    }
}

/// One test case: the shared members plus family-specific fields.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase<F> {
    /// Shared members.
    #[serde(flatten)]
    pub meta: CaseMeta,
    /// Family fields.
    #[serde(flatten)]
    pub fields: F,
}

/// One test group: family parameters and its cases.
#[derive(Debug, Clone, Deserialize)]
pub struct TestGroup<P, F> {
    /// Parameters shared by every case of the group.
    #[serde(flatten)]
    pub params: P,
    /// The cases, in file order.
    pub tests: Vec<TestCase<F>>,
}

/// A note from the file header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Note {
    /// Plain text, used by older corpora.
    Text(String),
    /// Structured note.
    Detailed {
        /// Flag classification such as `BasicAttack` or `Legacy`.
        #[serde(default, rename = "bugType")]
        bug_type: Option<String>,
        /// Explanation.
        #[serde(default)]
        description: Option<String>,
    },
}

/// A decoded corpus file with groups still in raw form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusFile {
    /// Algorithm tag that selects the verifier.
    pub algorithm: String,
    /// Generator version, when recorded.
    #[serde(default)]
    pub generator_version: Option<String>,
    /// Declared number of test cases.
    #[serde(default)]
    pub number_of_tests: usize,
    /// Header lines.
    #[serde(default)]
    pub header: Vec<String>,
    /// Flag descriptions.
    #[serde(default)]
    pub notes: BTreeMap<String, Note>,
    /// Raw test groups.
    pub test_groups: Vec<Value>,
}

impl CorpusFile {
    /// Decodes the top level of a corpus document.
    ///
    /// # Errors
    /// Returns [`DecodeError::Json`] for malformed JSON or a missing
    /// `algorithm` or `testGroups` member.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decodes every group into the schema `G`.
    ///
    /// # Errors
    /// Returns [`DecodeError::Group`] naming the first group that does not fit.
    pub fn decode_groups<G: DeserializeOwned>(&self) -> Result<Vec<G>, DecodeError> {
        decode_groups(&self.test_groups)
    }
}

/// Decodes raw groups into the schema `G`.
///
/// # Errors
/// Returns [`DecodeError::Group`] naming the first group that does not fit.
pub fn decode_groups<G: DeserializeOwned>(groups: &[Value]) -> Result<Vec<G>, DecodeError> {
    groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            G::deserialize(group).map_err(|source| DecodeError::Group { index, source })
        })
        .collect()
}
