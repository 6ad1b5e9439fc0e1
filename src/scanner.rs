use crate::{
    error::{Error, Result},
    filter::FileFilter,
    tree::PathTree,
};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::{env, fs};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Sorted, deduplicated selection produced by [`Scanner::scan`].
#[derive(Debug, Clone, Default)]
pub(crate) struct ScanResult {
    /// Absolute paths in byte order of their full path string
    pub(crate) files: Vec<PathBuf>,

    /// Fenced tree of the selected paths, relative to the root
    pub(crate) structure: String,
}

/// Walks the inputs and applies the include/exclude filter.
pub(crate) struct Scanner<'a> {
    root: &'a Path,
    filter: &'a FileFilter,
}

impl<'a> Scanner<'a> {
    pub(crate) const fn new(root: &'a Path, filter: &'a FileFilter) -> Self {
        Self { root, filter }
    }

    /// Scans every input in order.
    ///
    /// Inputs that cannot be resolved or stat'd are logged and skipped.
    /// A directory that fails the filter is pruned with its whole subtree;
    /// a file that fails it is skipped on its own. A path reachable from
    /// several inputs is selected once.
    pub(crate) fn scan(&self, inputs: &[PathBuf]) -> ScanResult {
        let mut seen = HashSet::new();
        let mut selected: Vec<(PathBuf, bool)> = Vec::new();

        for input in inputs {
            let abs = match absolutize(input) {
                Ok(abs) => abs,
                Err(e) => {
                    warn!("skip {}: {}", input.display(), e);
                    continue;
                }
            };

            let metadata = match fs::metadata(&abs) {
                Ok(m) => m,
                Err(e) => {
                    warn!("skip {}: {}", input.display(), e);
                    continue;
                }
            };

            if metadata.is_dir() {
                self.walk_dir(&abs, &mut seen, &mut selected);
            } else if self.filter.should_keep(&self.relative(&abs)) {
                if seen.insert(abs.clone()) {
                    selected.push((abs, false));
                }
            } else {
                trace!("Filtered out input {}", abs.display());
            }
        }

        selected.sort_by(|(a, _), (b, _)| a.as_os_str().cmp(b.as_os_str()));

        let mut tree = PathTree::new();
        for (path, is_dir) in &selected {
            tree.insert(&self.relative(path), *is_dir);
        }

        debug!("Selected {} paths under {}", selected.len(), self.root.display());

        ScanResult {
            files: selected.into_iter().map(|(path, _)| path).collect(),
            structure: tree.render(),
        }
    }

    fn walk_dir(
        &self,
        dir: &Path,
        seen: &mut HashSet<PathBuf>,
        selected: &mut Vec<(PathBuf, bool)>,
    ) {
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let rel = self.relative(entry.path());
                rel.is_empty() || self.filter.should_keep(&rel)
            });

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("walk error {}: {}", e.path().unwrap_or(dir).display(), e);
                    continue;
                }
            };

            if self.relative(entry.path()).is_empty() {
                continue;
            }

            let is_dir = entry.file_type().is_dir();
            let path = entry.into_path();
            if seen.insert(path.clone()) {
                selected.push((path, is_dir));
            }
        }
    }

    /// Root-relative, `/`-separated form of `path`; empty for the root itself.
    pub(crate) fn relative(&self, path: &Path) -> String {
        relative_to(self.root, path)
    }
}

/// Root-relative, `/`-separated form of `path`; empty for the root itself.
pub(crate) fn relative_to(root: &Path, path: &Path) -> String {
    let rel = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    rel.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Chooses the single root directory for a set of inputs.
///
/// The first input that is a directory wins. Otherwise the root is the
/// deepest directory containing every input's parent.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub(crate) fn resolve_root(inputs: &[PathBuf]) -> Result<PathBuf> {
    let mut parents = Vec::with_capacity(inputs.len());

    for input in inputs {
        let abs = absolutize(input)?;
        if abs.is_dir() {
            return Ok(abs);
        }
        parents.push(abs.parent().map_or_else(|| abs.clone(), Path::to_path_buf));
    }

    let Some((first, rest)) = parents.split_first() else {
        return absolutize(Path::new("."));
    };

    Ok(rest
        .iter()
        .fold(first.clone(), |base, dir| common_base(&base, dir)))
}

fn common_base(a: &Path, b: &Path) -> PathBuf {
    a.components()
        .zip(b.components())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect()
}

/// Makes `path` absolute against the current directory and removes `.`
/// and `..` components lexically. Symlinks are not resolved.
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|e| Error::io(path, e))?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
