#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # vectorgate
//!
//! Cryptographic conformance testing against Wycheproof-style test vector
//! corpora.
//!
//! This crate ties the workspace together: it re-exports the provider
//! interface from [`vg_primitives`] and the verification engine from
//! [`vg_validation`], and hosts the command-line front end.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vectorgate::{Harness, HarnessConfig, StandardProvider};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = StandardProvider::new()?;
//! let config = HarnessConfig::new()
//!     .with_vectors_dir("testvectors")
//!     .with_suites(["aes_gcm", "ecdsa"]);
//! let run = Harness::new(config, &provider)?.run()?;
//! run.print();
//! assert!(run.passed());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod logging;

pub use vg_primitives::{CryptoProvider, ProviderError, StandardProvider};
pub use vg_validation::{
    AcceptablePolicy, AuditStatistics, CaseOutcome, ConfigError, FileOutcome, GroupOutcome,
    Harness, HarnessConfig, HarnessError, RunOutcome, Variant, VectorFile, DEFAULT_SUITES,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
