//! Version-control metadata via the `git` command line.

use crate::document::VcsMetadata;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, trace};

/// Source of commit metadata for a root directory.
///
/// Returns `None` whenever metadata is unavailable; callers never treat
/// that as an error.
pub trait VcsProvider {
    /// Looks up metadata for the repository containing `root`.
    fn metadata(&self, root: &Path) -> Option<VcsMetadata>;
}

/// Provider backed by the system `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    fn run(root: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .current_dir(root)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| trace!("git {}: {}", args.join(" "), e))
            .ok()?;

        if !output.status.success() {
            trace!("git {} exited with {}", args.join(" "), output.status);
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl VcsProvider for GitCli {
    fn metadata(&self, root: &Path) -> Option<VcsMetadata> {
        if !root.join(".git").exists() && Self::run(root, &["rev-parse", "--git-dir"]).is_none() {
            debug!("{} is not inside a git repository", root.display());
            return None;
        }

        let commit = Self::run(root, &["rev-parse", "HEAD"])?;
        let branch = Self::run(root, &["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or_default();
        let name = Self::run(root, &["log", "-1", "--pretty=%an"]).unwrap_or_default();
        let email = Self::run(root, &["log", "-1", "--pretty=%ae"]).unwrap_or_default();
        let date = Self::run(root, &["log", "-1", "--pretty=%ad", "--date=rfc"])
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| chrono::Local::now().to_rfc2822());

        Some(VcsMetadata {
            commit,
            branch,
            author: format!("{name} <{email}>"),
            date,
        })
    }
}

/// Provider that never reports metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVcs;

impl VcsProvider for NoVcs {
    fn metadata(&self, _root: &Path) -> Option<VcsMetadata> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_vcs() {
        assert!(NoVcs.metadata(Path::new(".")).is_none());
    }

    #[test]
    fn test_git_cli_outside_repository() {
        let temp = assert_fs::TempDir::new().unwrap();
        // a fresh temp dir is not a repository; git may also be missing entirely
        let nested = temp.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        if GitCli::run(&nested, &["rev-parse", "--git-dir"]).is_none() {
            assert!(GitCli.metadata(&nested).is_none());
        }
    }

    #[test]
    fn test_git_cli_missing_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        assert!(GitCli.metadata(&temp.path().join("missing")).is_none());
    }
}
