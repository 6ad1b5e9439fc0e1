use crate::file::FileRecord;
use serde::Serialize;

/// Version-control metadata for the root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VcsMetadata {
    /// Full id of the latest commit
    pub commit: String,

    /// Current branch name
    pub branch: String,

    /// Author of the latest commit as `name <email>`
    pub author: String,

    /// Commit date in RFC 2822 form
    pub date: String,
}

/// Aggregate counters over the collected records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of records in the document
    pub total_files: usize,

    /// Newlines counted across all text records
    pub total_lines: usize,

    /// Tokens charged against the budget
    pub estimated_tokens: usize,

    /// Records cut by the token budget (0 or 1)
    #[serde(rename = "skipped_by_token_limit")]
    pub skipped_by_limit: usize,

    /// Records classified as binary
    pub binary_files: usize,
}

/// The complete result of one run, handed whole to the writer.
#[derive(Debug, Clone, Serialize)]
pub struct OutputDocument {
    /// Absolute root directory
    pub location: String,

    /// Version-control metadata, if the root is inside a repository
    #[serde(rename = "git", skip_serializing_if = "Option::is_none")]
    pub vcs: Option<VcsMetadata>,

    /// Fenced tree of the selected paths
    pub structure: String,

    /// Records in canonical path order
    pub files: Vec<FileRecord>,

    /// Counters derived from `files`
    pub summary: Summary,
}
