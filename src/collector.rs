//! Budgeted collection of file records.
//!
//! The collector walks the sorted selection once. Every file is turned into
//! a [`FileRecord`] by [`Collector::collect_one`], which charges it against a
//! [`Tally`] passed in by the caller. The first record that would push the
//! tally past the token budget is kept as an omission marker and ends the
//! pass.

use crate::{
    document::Summary,
    file::{language_hint, read_window, FileRecord},
    scanner::relative_to,
    token::TokenEstimator,
};
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, trace};

/// Running totals carried from one file to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) total_tokens: usize,
    pub(crate) total_lines: usize,
    pub(crate) binary_files: usize,
    pub(crate) skipped_by_limit: usize,
}

impl Tally {
    /// Assembles the summary for `total_files` collected records.
    pub(crate) const fn summary(self, total_files: usize) -> Summary {
        Summary {
            total_files,
            total_lines: self.total_lines,
            estimated_tokens: self.total_tokens,
            skipped_by_limit: self.skipped_by_limit,
            binary_files: self.binary_files,
        }
    }
}

/// What happened to a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Not a file (directory or the root itself); nothing is recorded
    Skipped,
    /// Record to append; collection continues
    Collected(FileRecord),
    /// Budget-omission record to append; collection stops
    OverBudget(FileRecord),
}

/// Reads files into records under a per-file window and a global token budget.
pub(crate) struct Collector<'a> {
    root: &'a Path,
    max_file_size: usize,
    max_tokens: usize,
    tokenizer: &'a dyn TokenEstimator,
}

impl<'a> Collector<'a> {
    pub(crate) const fn new(
        root: &'a Path,
        max_file_size: usize,
        max_tokens: usize,
        tokenizer: &'a dyn TokenEstimator,
    ) -> Self {
        Self {
            root,
            max_file_size,
            max_tokens,
            tokenizer,
        }
    }

    /// Collects records for `files` in order and summarizes them.
    pub(crate) fn collect<P: AsRef<Path>>(&self, files: &[P]) -> (Vec<FileRecord>, Summary) {
        let mut tally = Tally::default();
        let mut records = Vec::with_capacity(files.len());

        for path in files {
            match self.collect_one(path.as_ref(), &mut tally) {
                Outcome::Skipped => {}
                Outcome::Collected(record) => records.push(record),
                Outcome::OverBudget(record) => {
                    debug!(
                        "Token budget of {} reached at {}; stopping",
                        self.max_tokens, record.path
                    );
                    records.push(record);
                    break;
                }
            }
        }

        let summary = tally.summary(records.len());
        debug!(
            "Collected {} records ({} lines, ~{} tokens, {} binary)",
            summary.total_files, summary.total_lines, summary.estimated_tokens, summary.binary_files
        );
        (records, summary)
    }

    /// Builds the record for one path and charges it to `tally`.
    ///
    /// Stat and open failures are recorded in the record, never returned.
    pub(crate) fn collect_one(&self, path: &Path, tally: &mut Tally) -> Outcome {
        let rel = relative_to(self.root, path);
        if rel.is_empty() {
            return Outcome::Skipped;
        }

        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                trace!("stat failed for {}: {}", rel, e);
                let mut record = FileRecord::new(rel);
                record.read_error_message = Some(e.to_string());
                return Outcome::Collected(record);
            }
        };

        if metadata.is_dir() {
            return Outcome::Skipped;
        }

        let mut record = FileRecord::new(rel);
        record.size = metadata.len();

        let window = match File::open(path) {
            Ok(file) => read_window(file, self.max_file_size),
            Err(e) => {
                trace!("open failed for {}: {}", record.path, e);
                record.read_error_message = Some(e.to_string());
                return Outcome::Collected(record);
            }
        };

        record.is_binary = window.is_binary;
        record.truncated = window.truncated;

        let mut lines = 0;
        if window.is_binary {
            tally.binary_files += 1;
        } else {
            record.content = Some(String::from_utf8_lossy(&window.data).into_owned());
            record.language_hint = language_hint(&record.path).map(str::to_string);
            lines = window.lines;
        }

        let cost = self.tokenizer.estimate(record.content_str());
        if self.max_tokens > 0 && tally.total_tokens + cost > self.max_tokens {
            record.content = None;
            record.truncated = true;
            record.read_error_message = Some(format!(
                "omitted due to --max-tokens budget (would add ~{cost} tokens)"
            ));
            tally.total_lines += lines;
            tally.skipped_by_limit += 1;
            return Outcome::OverBudget(record);
        }

        tally.total_lines += lines;
        tally.total_tokens += cost;
        Outcome::Collected(record)
    }
}
