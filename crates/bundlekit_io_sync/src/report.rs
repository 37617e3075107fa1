//! Sync report model and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and timing for one `sync_tree` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSync {
    /// Number of files whose bytes were copied to the destination.
    pub cnt_files_copied: u64,
    /// Number of files skipped by overwrite/incremental policy.
    pub cnt_files_skipped: u64,
    /// Number of enumerated directory entries (informational).
    pub cnt_dirs_copied: u64,
    /// Wall-clock run time in milliseconds.
    pub ms_execution: u64,
}

impl ReportSync {
    /// Total file entries the run decided on.
    pub fn file_total(&self) -> u64 {
        self.cnt_files_copied + self.cnt_files_skipped
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_files_copied".to_string(), self.cnt_files_copied);
        dict_counts.insert("cnt_files_skipped".to_string(), self.cnt_files_skipped);
        dict_counts.insert("cnt_dirs_copied".to_string(), self.cnt_dirs_copied);
        dict_counts.insert("ms_execution".to_string(), self.ms_execution);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} copied={} skipped={} dirs={} elapsed_ms={}",
            self.cnt_files_copied, self.cnt_files_skipped, self.cnt_dirs_copied, self.ms_execution
        )
    }
}

impl fmt::Display for ReportSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SYNC]"))
    }
}

/// Mutable accumulator for sync statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportSyncBuilder {
    /// See [`ReportSync::cnt_files_copied`].
    pub cnt_files_copied: u64,
    /// See [`ReportSync::cnt_files_skipped`].
    pub cnt_files_skipped: u64,
    /// See [`ReportSync::cnt_dirs_copied`].
    pub cnt_dirs_copied: u64,
}

impl ReportSyncBuilder {
    /// Increment copied-file count by one.
    pub fn add_file_copied(&mut self) {
        self.cnt_files_copied += 1;
    }

    /// Increment skipped-file count by one.
    pub fn add_file_skipped(&mut self) {
        self.cnt_files_skipped += 1;
    }

    /// Add `value` enumerated directory entries.
    pub fn add_dirs(&mut self, value: u64) {
        self.cnt_dirs_copied += value;
    }

    /// Finalize builder into an immutable report with elapsed time attached.
    pub fn build(self, ms_execution: u64) -> ReportSync {
        ReportSync {
            cnt_files_copied: self.cnt_files_copied,
            cnt_files_skipped: self.cnt_files_skipped,
            cnt_dirs_copied: self.cnt_dirs_copied,
            ms_execution,
        }
    }
}
