#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # vg-validation
//!
//! The dispatch-and-verification engine for Wycheproof-style test vector
//! corpora.
//!
//! ## Modules
//!
//! - **vector**: typed corpus model and decoder
//! - **registry**: algorithm tag to verifier resolution
//! - **verify**: one verifier per algorithm family
//! - **classify**: the tri-state acceptance policy
//! - **report**: case, group, file and run outcomes
//! - **audit**: comment and flag tallies for matching `acceptable` cases
//! - **driver**: corpus discovery and the top-level run
//! - **config**: harness configuration

pub mod audit;
pub mod classify;
pub mod config;
pub mod driver;
pub mod error;
pub mod registry;
pub mod report;
pub mod vector;
pub mod verify;

pub use audit::{AuditCollector, AuditStatistics};
pub use classify::{classify, AcceptablePolicy, Family, Observation, Verdict};
pub use config::HarnessConfig;
pub use driver::{Harness, SuiteSpec, VectorFile, DEFAULT_SUITES};
pub use error::{ConfigError, DecodeError, HarnessError, RegistryError};
pub use registry::{Suite, Variant};
pub use report::{CaseOutcome, FileOutcome, GroupOutcome, RunOutcome};
pub use vector::{CaseMeta, CorpusFile, ExpectedResult, TestCase, TestGroup};
