//! Harness configuration.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Where the Wycheproof corpus is installed by default.
pub const DEFAULT_VECTORS_DIR: &str = "/usr/local/share/wycheproof/testvectors";

/// Configuration for a [`Harness`](crate::driver::Harness) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory searched for corpus files.
    pub vectors_dir: PathBuf,
    /// Tally comments and flags of matching `acceptable` cases.
    pub audit_acceptable: bool,
    /// Verify files and groups in parallel.
    pub parallel: bool,
    /// Worker count; `None` lets the pool pick one per CPU.
    pub jobs: Option<usize>,
    /// Suites to run; empty runs every suite.
    pub suites: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            vectors_dir: PathBuf::from(DEFAULT_VECTORS_DIR),
            audit_acceptable: false,
            parallel: true,
            jobs: None,
            suites: Vec::new(),
        }
    }
}

impl HarnessConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vectors directory.
    #[must_use]
    pub fn with_vectors_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.vectors_dir = dir.into();
        self
    }

    /// Enable or disable audit mode.
    #[must_use]
    pub fn with_audit_acceptable(mut self, enabled: bool) -> Self {
        self.audit_acceptable = enabled;
        self
    }

    /// Enable or disable parallel verification.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Bound the worker pool.
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Restrict the run to the named suites.
    #[must_use]
    pub fn with_suites<I, S>(mut self, suites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suites = suites.into_iter().map(Into::into).collect();
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroJobs`] for a zero worker count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == Some(0) {
            return Err(ConfigError::ZeroJobs);
        }
        Ok(())
    }
}
