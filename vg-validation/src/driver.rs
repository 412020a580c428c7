//! Harness Driver.
//!
//! Discovers corpus files, decodes each one, resolves its suite and folds the
//! group outcomes into a [`RunOutcome`]. Fatal errors abort the run; failing
//! cases never do.

use crate::audit::AuditCollector;
use crate::config::HarnessConfig;
use crate::error::{ConfigError, HarnessError};
use crate::registry::{Suite, Variant};
use crate::report::{FileOutcome, RunOutcome};
use crate::vector::CorpusFile;
use crate::verify::VerifyEnv;
use glob::Pattern;
use rayon::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vg_primitives::CryptoProvider;

/// Files skipped for the normal variant: P1363 encodings, the low-S bitcoin
/// profile and curves below the supported security level.
const SKIP_NORMAL: &str = r"_(p1363|bitcoin|sect\d{3}[rk]1|secp(160|192)[rk]1)_";

/// A family of corpus files selected by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteSpec {
    /// Suite name, as accepted by `--suite`.
    pub name: &'static str,
    /// Glob matched against file names in the vectors directory.
    pub pattern: &'static str,
    /// Variant the files are verified in.
    pub variant: Variant,
}

const fn suite(name: &'static str, pattern: &'static str, variant: Variant) -> SuiteSpec {
    SuiteSpec { name, pattern, variant }
}

/// Every suite the harness runs by default.
pub const DEFAULT_SUITES: &[SuiteSpec] = &[
    suite("aes_cbc_pkcs5", "aes_cbc_pkcs5_test.json", Variant::Normal),
    suite("aes_ccm", "aes_ccm_test.json", Variant::Normal),
    suite("aes_gcm", "aes_gcm_test.json", Variant::Normal),
    suite("chacha20_poly1305", "chacha20_poly1305_test.json", Variant::Normal),
    suite("xchacha20_poly1305", "xchacha20_poly1305_test.json", Variant::Normal),
    suite("aes_cmac", "aes_cmac_test.json", Variant::Normal),
    suite("hmac", "hmac_sha*_test.json", Variant::Normal),
    suite("hkdf", "hkdf_sha*_test.json", Variant::Normal),
    suite("dsa", "dsa_*test.json", Variant::Normal),
    suite("ecdsa", "ecdsa_*test.json", Variant::Normal),
    suite("ecdsa_p1363", "ecdsa_*_p1363_test.json", Variant::P1363),
    suite("ecdsa_webcrypto", "ecdsa_*webcrypto_test.json", Variant::WebCrypto),
    suite("eddsa", "eddsa_test.json", Variant::Normal),
    suite("rsa_signature", "rsa_signature_*test.json", Variant::Normal),
    suite("rsa_pss", "rsa_pss_*_test.json", Variant::Normal),
    suite("ecdh", "ecdh_*test.json", Variant::Normal),
    suite("ecdh_webcrypto", "ecdh_*webcrypto_test.json", Variant::WebCrypto),
    suite("x25519", "x25519_test.json", Variant::Normal),
    suite("kw", "kw_test.json", Variant::Normal),
    suite("kwp", "kwp_test.json", Variant::Normal),
];

/// A corpus file scheduled for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorFile {
    /// Location of the file.
    pub path: PathBuf,
    /// Variant the file is verified in.
    pub variant: Variant,
    /// Suite that selected the file, if it was discovered.
    pub suite: Option<&'static str>,
}

impl VectorFile {
    /// An explicitly named file; the variant is inferred from its name unless
    /// given.
    #[must_use]
    pub fn explicit(path: impl Into<PathBuf>, variant: Option<Variant>) -> Self {
        let path = path.into();
        let variant = variant.unwrap_or_else(|| Variant::infer_from_path(&path));
        Self { path, variant, suite: None }
    }
}

/// Runs corpora against one provider.
pub struct Harness<'p> {
    config: HarnessConfig,
    provider: &'p dyn CryptoProvider,
}

impl std::fmt::Debug for Harness<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl<'p> Harness<'p> {
    /// Creates a harness.
    ///
    /// # Errors
    /// Returns [`HarnessError::Config`] if the configuration is invalid.
    pub fn new(config: HarnessConfig, provider: &'p dyn CryptoProvider) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self { config, provider })
    }

    /// The harness configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    fn selected_suites(&self) -> Result<Vec<&'static SuiteSpec>, HarnessError> {
        if self.config.suites.is_empty() {
            return Ok(DEFAULT_SUITES.iter().collect());
        }
        self.config
            .suites
            .iter()
            .map(|name| {
                DEFAULT_SUITES.iter().find(|spec| spec.name == name.as_str()).ok_or_else(|| {
                    HarnessError::Config(ConfigError::UnknownSuite(name.clone()))
                })
            })
            .collect()
    }

    /// Lists the files of the selected suites in the vectors directory.
    ///
    /// Files come in suite order and by name within a suite; a file claimed
    /// by more than one suite is scheduled once, for the first suite.
    ///
    /// # Errors
    /// Fails if the directory cannot be read, a suite filter is unknown, or a
    /// selected suite matches no file.
    pub fn discover(&self) -> Result<Vec<VectorFile>, HarnessError> {
        let suites = self.selected_suites()?;
        let dir = &self.config.vectors_dir;
        let io_error = |source| HarnessError::Io { path: dir.clone(), source };
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            if entry.file_type().map_err(io_error)?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        let skip_normal = Regex::new(SKIP_NORMAL)?;
        let mut files: Vec<VectorFile> = Vec::new();
        for spec in suites {
            let pattern = Pattern::new(spec.pattern)?;
            let mut matched = 0usize;
            for name in names.iter().filter(|name| pattern.matches(name)) {
                let path = dir.join(name);
                if Variant::infer_from_path(&path) != spec.variant
                    || (spec.variant == Variant::Normal && skip_normal.is_match(name))
                {
                    debug!(suite = spec.name, file = %name, "skipping file");
                    continue;
                }
                matched += 1;
                if files.iter().any(|file| file.path == path) {
                    continue;
                }
                files.push(VectorFile { path, variant: spec.variant, suite: Some(spec.name) });
            }
            if matched == 0 {
                return Err(HarnessError::NoVectors {
                    suite: spec.name.to_string(),
                    pattern: spec.pattern.to_string(),
                    dir: dir.clone(),
                });
            }
        }
        Ok(files)
    }

    /// Discovers and runs every selected suite.
    ///
    /// # Errors
    /// Any fatal error from discovery or from a file; see [`Harness::run_files`].
    pub fn run(&self) -> Result<RunOutcome, HarnessError> {
        let files = self.discover()?;
        info!(files = files.len(), dir = %self.config.vectors_dir.display(), "discovered corpus files");
        self.run_files(&files)
    }

    /// Runs the given files and aggregates their outcomes.
    ///
    /// Files run in parallel on a pool of `jobs` workers unless the
    /// configuration is sequential.
    ///
    /// # Errors
    /// The first fatal error of any file: unreadable file, malformed
    /// document or unknown algorithm.
    pub fn run_files(&self, files: &[VectorFile]) -> Result<RunOutcome, HarnessError> {
        let audit = AuditCollector::new(self.config.audit_acceptable);
        let outcomes = if self.config.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs.unwrap_or(0))
                .build()?;
            pool.install(|| {
                files
                    .par_iter()
                    .map(|file| self.run_file(file, &audit))
                    .collect::<Result<Vec<_>, _>>()
            })?
        } else {
            files.iter().map(|file| self.run_file(file, &audit)).collect::<Result<Vec<_>, _>>()?
        };
        Ok(RunOutcome { files: outcomes, audit: audit.finish() })
    }

    /// Reads and runs one file.
    ///
    /// # Errors
    /// [`HarnessError::Io`] if the file cannot be read, or any error of
    /// [`Harness::run_document`].
    pub fn run_file(&self, file: &VectorFile, audit: &AuditCollector) -> Result<FileOutcome, HarnessError> {
        let bytes = std::fs::read(&file.path)
            .map_err(|source| HarnessError::Io { path: file.path.clone(), source })?;
        self.run_document(&file.path, &bytes, file.variant, audit)
    }

    /// Decodes and runs one corpus document.
    ///
    /// # Errors
    /// [`HarnessError::Decode`] for a malformed document or group and
    /// [`HarnessError::Registry`] for an unknown algorithm.
    pub fn run_document(
        &self,
        path: &Path,
        bytes: &[u8],
        variant: Variant,
        audit: &AuditCollector,
    ) -> Result<FileOutcome, HarnessError> {
        let decode_error = |source| HarnessError::Decode { path: path.to_path_buf(), source };
        let corpus = CorpusFile::decode(bytes).map_err(decode_error)?;
        let suite = Suite::resolve(&corpus.algorithm, variant)
            .map_err(|source| HarnessError::Registry { path: path.to_path_buf(), source })?;
        info!(
            file = %path.display(),
            algorithm = %corpus.algorithm,
            %variant,
            groups = corpus.test_groups.len(),
            tests = corpus.number_of_tests,
            "loaded corpus file"
        );

        let env = VerifyEnv {
            provider: self.provider,
            audit,
            algorithm: &corpus.algorithm,
            policy: suite.family().acceptable_policy(),
        };
        let groups = suite
            .execute(&corpus.test_groups, &env, self.config.parallel)
            .map_err(decode_error)?;
        let outcome = FileOutcome::from_groups(path.to_path_buf(), corpus.algorithm.clone(), &groups);
        debug!(
            file = %path.display(),
            passed = outcome.passed,
            cases = outcome.cases,
            failures = outcome.failures,
            "finished corpus file"
        );
        Ok(outcome)
    }
}
