//! Command-line interface.

use crate::{CryptoProvider, Harness, HarnessConfig, RunOutcome, StandardProvider, Variant, VectorFile};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use vg_validation::config::DEFAULT_VECTORS_DIR;

/// Exit status of a run in which every case passed.
pub const EXIT_PASSED: u8 = 0;
/// Exit status of a run with failing cases.
pub const EXIT_FAILED: u8 = 1;
/// Exit status of a run aborted by a fatal error.
pub const EXIT_FATAL: u8 = 2;

/// Verify a crypto provider against Wycheproof-style test vectors.
#[derive(Parser, Debug)]
#[command(name = "vectorgate", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the corpus files
    #[arg(short = 'd', long = "vectors", default_value = DEFAULT_VECTORS_DIR)]
    pub vectors: PathBuf,

    /// Tally comments and flags of matching `acceptable` cases
    #[arg(short = 'v', long = "audit-acceptable")]
    pub audit_acceptable: bool,

    /// Worker threads; defaults to one per CPU
    #[arg(short = 'j', long = "jobs")]
    pub jobs: Option<usize>,

    /// Verify files and groups one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Run only the named suite; repeatable
    #[arg(short = 's', long = "suite")]
    pub suites: Vec<String>,

    /// Variant of the files given on the command line (normal, webcrypto, p1363)
    #[arg(long, value_parser = parse_variant)]
    pub variant: Option<Variant>,

    /// Corpus files to run instead of discovering the suites
    pub files: Vec<PathBuf>,
}

fn parse_variant(value: &str) -> Result<Variant, String> {
    value.parse().map_err(|e: vg_validation::ConfigError| e.to_string())
}

impl Cli {
    /// The harness configuration selected by the flags.
    #[must_use]
    pub fn config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new()
            .with_vectors_dir(self.vectors.clone())
            .with_audit_acceptable(self.audit_acceptable)
            .with_parallel(!self.sequential)
            .with_suites(self.suites.iter().cloned());
        if let Some(jobs) = self.jobs {
            config = config.with_jobs(jobs);
        }
        config
    }

    /// Runs the harness.
    ///
    /// # Errors
    /// Any fatal error: provider self-test failure, invalid configuration,
    /// unreadable or malformed corpus, unknown algorithm.
    pub fn run(&self) -> anyhow::Result<RunOutcome> {
        let provider = StandardProvider::new().context("provider self-test failed")?;
        let harness = Harness::new(self.config(), &provider).context("invalid configuration")?;
        tracing::info!(provider = provider.name(), "starting run");
        let outcome = if self.files.is_empty() {
            harness.run().context("test run aborted")?
        } else {
            let files: Vec<VectorFile> =
                self.files.iter().map(|path| VectorFile::explicit(path, self.variant)).collect();
            harness.run_files(&files).context("test run aborted")?
        };
        Ok(outcome)
    }
}

/// Maps a run result to the process exit status.
#[must_use]
pub fn exit_status(result: &anyhow::Result<RunOutcome>) -> u8 {
    match result {
        Ok(run) if run.passed() => EXIT_PASSED,
        Ok(_) => EXIT_FAILED,
        Err(_) => EXIT_FATAL,
    }
}
