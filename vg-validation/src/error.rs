//! Fatal error tier.
//!
//! Everything here aborts a run: these errors mean the harness or its
//! environment is broken. A provider that disagrees with a vector is never an
//! error, only a failed outcome.
//!
//! Messages name only their own layer; the cause is reachable through
//! [`std::error::Error::source`], so `{:#}` in `anyhow` prints each layer once.

use crate::registry::Variant;
use std::path::PathBuf;
use thiserror::Error;
use vg_primitives::ProviderError;

/// Errors decoding a corpus document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document is not valid JSON or lacks a required top-level member.
    #[error("malformed corpus document")]
    Json(#[from] serde_json::Error),

    /// A test group does not match the schema of its algorithm.
    #[error("test group {index}")]
    Group {
        /// Position of the group in `testGroups`.
        index: usize,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors resolving an algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No verifier handles this algorithm.
    #[error("unknown algorithm {0:?}")]
    UnknownAlgorithm(String),

    /// The algorithm is known but has no verifier for the requested variant.
    #[error("algorithm {algorithm:?} has no {variant} variant")]
    UnsupportedVariant {
        /// Algorithm tag from the corpus file.
        algorithm: String,
        /// Requested variant.
        variant: Variant,
    },
}

/// Invalid harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A worker count of zero was requested.
    #[error("worker count must be at least 1")]
    ZeroJobs,

    /// A suite filter names no known suite.
    #[error("unknown suite {0:?}")]
    UnknownSuite(String),

    /// A variant name is not one of `normal`, `webcrypto` or `p1363`.
    #[error("unknown variant {0:?}")]
    UnknownVariant(String),
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A corpus file or the vectors directory could not be read.
    #[error("cannot read {}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A corpus file could not be decoded.
    #[error("{}", path.display())]
    Decode {
        /// Offending file.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: DecodeError,
    },

    /// A corpus file names an algorithm the harness does not know.
    #[error("{}", path.display())]
    Registry {
        /// Offending file.
        path: PathBuf,
        /// Underlying registry failure.
        #[source]
        source: RegistryError,
    },

    /// A selected suite matched no file in the vectors directory.
    #[error("suite {suite}: no file matching {pattern} in {}", dir.display())]
    NoVectors {
        /// Suite name.
        suite: String,
        /// Glob pattern of the suite.
        pattern: String,
        /// Directory searched.
        dir: PathBuf,
    },

    /// A suite glob pattern is malformed.
    #[error("invalid suite pattern")]
    Pattern(#[from] glob::PatternError),

    /// The file-skip expression is malformed.
    #[error("invalid skip expression")]
    Regex(#[from] regex::Error),

    /// Invalid configuration.
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// The worker pool could not be created.
    #[error("cannot start worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The crypto provider failed to initialise.
    #[error("crypto provider initialisation failed")]
    Provider(#[from] ProviderError),
}
