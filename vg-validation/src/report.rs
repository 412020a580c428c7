#![allow(clippy::print_stdout)] // JUSTIFICATION: the run summary is the harness's console output
#![allow(clippy::arithmetic_side_effects)] // JUSTIFICATION: case counters cannot overflow for realistic corpora

//! Aggregator / Reporter.
//!
//! Outcomes fold upward with logical AND: case, group, file, run. Folding
//! never short-circuits, so a run reports every failure it finds.

use crate::audit::AuditStatistics;
use crate::classify::Verdict;
use std::path::PathBuf;

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    /// Every judged operation met its expectation.
    pub passed: bool,
    /// Every judged operation was an `acceptable` match.
    pub auditable: bool,
    /// One line per failed operation.
    pub failures: Vec<String>,
}

impl CaseOutcome {
    /// A pass that is not auditable, for tolerated failures.
    #[must_use]
    pub fn pass() -> Self {
        Self { passed: true, auditable: false, failures: Vec::new() }
    }

    /// A failure with one reason.
    #[must_use]
    pub fn fail(reason: impl Into<String>) -> Self {
        Self { passed: false, auditable: false, failures: vec![reason.into()] }
    }

    /// Outcome of one judged operation; `reason` is only rendered on failure.
    #[must_use]
    pub fn from_verdict(verdict: Verdict, reason: impl FnOnce() -> String) -> Self {
        if verdict.passed {
            Self { passed: true, auditable: verdict.auditable, failures: Vec::new() }
        } else {
            Self::fail(reason())
        }
    }

    /// Conjunction of two operations of the same case.
    #[must_use]
    pub fn and(mut self, other: Self) -> Self {
        self.passed &= other.passed;
        self.auditable &= other.auditable;
        self.failures.extend(other.failures);
        self
    }
}

/// Outcome of one test group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupOutcome {
    /// Every case passed.
    pub passed: bool,
    /// Cases evaluated.
    pub cases: usize,
    /// Cases that failed.
    pub failures: usize,
    /// The group was skipped as unsupported.
    pub skipped: bool,
}

impl GroupOutcome {
    /// An empty, passing group to fold cases into.
    #[must_use]
    pub fn new() -> Self {
        Self { passed: true, ..Self::default() }
    }

    /// A skipped group. Skipped groups pass.
    #[must_use]
    pub fn skipped() -> Self {
        Self { passed: true, skipped: true, ..Self::default() }
    }

    /// Folds one case in.
    pub fn add_case(&mut self, outcome: &CaseOutcome) {
        self.cases += 1;
        if !outcome.passed {
            self.passed = false;
            self.failures += 1;
        }
    }
}

/// Outcome of one corpus file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// The file.
    pub path: PathBuf,
    /// Algorithm tag from the file.
    pub algorithm: String,
    /// Every group passed.
    pub passed: bool,
    /// Groups verified.
    pub groups: usize,
    /// Groups skipped as unsupported.
    pub skipped_groups: usize,
    /// Cases evaluated.
    pub cases: usize,
    /// Cases that failed.
    pub failures: usize,
}

impl FileOutcome {
    /// Folds the groups of a file.
    #[must_use]
    pub fn from_groups(path: PathBuf, algorithm: String, groups: &[GroupOutcome]) -> Self {
        let mut outcome = Self {
            path,
            algorithm,
            passed: true,
            groups: 0,
            skipped_groups: 0,
            cases: 0,
            failures: 0,
        };
        for group in groups {
            outcome.passed &= group.passed;
            outcome.cases += group.cases;
            outcome.failures += group.failures;
            if group.skipped {
                outcome.skipped_groups += 1;
            } else {
                outcome.groups += 1;
            }
        }
        outcome
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Per-file outcomes, in the order files were selected.
    pub files: Vec<FileOutcome>,
    /// Audit tables, when audit mode was on.
    pub audit: Option<AuditStatistics>,
}

impl RunOutcome {
    /// Every file passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.files.iter().all(|file| file.passed)
    }

    /// Total cases evaluated.
    #[must_use]
    pub fn cases(&self) -> usize {
        self.files.iter().map(|file| file.cases).sum()
    }

    /// Total failing cases.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.files.iter().map(|file| file.failures).sum()
    }

    /// Print the summary, and the audit tables when present, to stdout.
    pub fn print(&self) {
        println!("\n========================================");
        println!("Test Vector Summary");
        println!("========================================");
        println!("Files:          {}", self.files.len());
        println!("Cases:          {}", self.cases());
        println!("Failed:         {}", self.failures());
        println!(
            "Skipped groups: {}",
            self.files.iter().map(|file| file.skipped_groups).sum::<usize>()
        );

        if !self.files.is_empty() {
            println!("\nPer-File Breakdown:");
            println!("----------------------------------------");
            for file in &self.files {
                let name = file.path.file_name().map_or_else(
                    || file.path.display().to_string(),
                    |name| name.to_string_lossy().into_owned(),
                );
                let status = if file.passed { "PASS" } else { "FAIL" };
                println!(
                    "  {status}  {name:<48} {:<22} {}/{} cases",
                    file.algorithm,
                    file.cases - file.failures,
                    file.cases
                );
            }
        }
        println!("========================================\n");

        if let Some(audit) = &self.audit {
            audit.print();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conjunction() {
        let audited = CaseOutcome { passed: true, auditable: true, failures: Vec::new() };
        let failed = CaseOutcome::fail("streaming decrypt: output mismatch");
        let both = audited.clone().and(failed);
        assert!(!both.passed);
        assert!(!both.auditable);
        assert_eq!(both.failures.len(), 1);

        assert!(audited.clone().and(audited.clone()).auditable);
        assert!(!audited.and(CaseOutcome::pass()).auditable);
    }

    #[test]
    fn test_failure_reason_is_lazy() {
        let verdict = Verdict { passed: true, auditable: false };
        let outcome = CaseOutcome::from_verdict(verdict, || unreachable!());
        assert!(outcome.passed);
    }

    #[test]
    fn test_folding_never_short_circuits() {
        let mut group = GroupOutcome::new();
        for i in 0..10_000 {
            let case = if i == 17 { CaseOutcome::fail("x") } else { CaseOutcome::pass() };
            group.add_case(&case);
        }
        assert!(!group.passed);
        assert_eq!(group.cases, 10_000);
        assert_eq!(group.failures, 1);

        let file = FileOutcome::from_groups(
            PathBuf::from("a.json"),
            "KW".to_string(),
            &[group, GroupOutcome::skipped()],
        );
        assert!(!file.passed);
        assert_eq!(file.groups, 1);
        assert_eq!(file.skipped_groups, 1);

        let run = RunOutcome { files: vec![file], audit: None };
        assert!(!run.passed());
        assert_eq!(run.cases(), 10_000);
        assert_eq!(run.failures(), 1);
    }

    #[test]
    fn test_empty_run_passes() {
        assert!(RunOutcome::default().passed());
    }
}
