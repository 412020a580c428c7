#![allow(clippy::print_stdout)] // JUSTIFICATION: audit tables are printed once at the end of a run

//! Audit statistics for `acceptable` cases.
//!
//! An [`AuditCollector`] is created at run start, shared by reference with
//! every verifier and consumed at run end. When audit mode is off it records
//! nothing.

use crate::vector::CaseMeta;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Frequency tables of comments and flags among matching `acceptable` cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditStatistics {
    /// Comment to count.
    pub comments: BTreeMap<String, usize>,
    /// Flag to count.
    pub flags: BTreeMap<String, usize>,
}

impl AuditStatistics {
    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty() && self.flags.is_empty()
    }

    fn record(&mut self, meta: &CaseMeta) {
        *self.comments.entry(meta.comment.clone()).or_default() += 1;
        for flag in &meta.flags {
            *self.flags.entry(flag.clone()).or_default() += 1;
        }
    }

    /// Renders both tables, most frequent entries first.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (title, table) in [("Comments", &self.comments), ("Flags", &self.flags)] {
            let mut rows: Vec<(&String, &usize)> = table.iter().collect();
            rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            let _ = writeln!(out, "{title}:");
            for (key, count) in rows {
                let _ = writeln!(out, "  {count:>6}  {key}");
            }
        }
        out
    }

    /// Prints the tables to stdout.
    pub fn print(&self) {
        println!("\n========================================");
        println!("Acceptable cases that matched");
        println!("========================================");
        print!("{}", self.render());
        println!("========================================\n");
    }
}

/// Run-wide audit sink.
#[derive(Debug, Default)]
pub struct AuditCollector {
    enabled: bool,
    stats: Mutex<AuditStatistics>,
}

impl AuditCollector {
    /// Creates a collector; a disabled one ignores every record.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled, stats: Mutex::new(AuditStatistics::default()) }
    }

    /// Whether audit mode is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records one matching `acceptable` case.
    pub fn record(&self, meta: &CaseMeta) {
        if self.enabled {
            self.stats.lock().record(meta);
        }
    }

    /// Ends the run, returning the tables when audit mode is on.
    #[must_use]
    pub fn finish(self) -> Option<AuditStatistics> {
        self.enabled.then(|| self.stats.into_inner())
    }
}
