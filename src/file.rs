use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

static LANGUAGE_HINTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("go", "go"),
        ("js", "javascript"),
        ("mjs", "javascript"),
        ("cjs", "javascript"),
        ("jsx", "javascript"),
        ("ts", "typescript"),
        ("tsx", "typescript"),
        ("json", "json"),
        ("md", "markdown"),
        ("py", "python"),
        ("rb", "ruby"),
        ("java", "java"),
        ("cs", "csharp"),
        ("c", "c"),
        ("h", "c"),
        ("cpp", "cpp"),
        ("cc", "cpp"),
        ("cxx", "cpp"),
        ("hpp", "cpp"),
        ("hh", "cpp"),
        ("sh", "bash"),
        ("bash", "bash"),
        ("zsh", "bash"),
        ("yml", "yaml"),
        ("yaml", "yaml"),
        ("sql", "sql"),
        ("html", "html"),
        ("htm", "html"),
        ("css", "css"),
        ("scss", "css"),
    ]
    .into_iter()
    .collect()
});

/// One entry of the output document.
///
/// Field names are part of the JSON output format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path relative to the root, always `/`-separated
    pub path: String,

    /// Size on disk in bytes
    pub size: u64,

    /// True if the read window contained a NUL byte
    pub is_binary: bool,

    /// True if the read window was filled, or the record was cut by the token budget
    pub truncated: bool,

    /// Fence label derived from the extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,

    /// Decoded read window; absent for binary, unreadable or budget-omitted files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Open/stat failure or budget-omission note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_error_message: Option<String>,
}

impl FileRecord {
    /// Creates an empty record for the given relative path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Returns the text content, or `""` when there is none.
    #[must_use]
    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Returns true if the file could not be read at all.
    ///
    /// Budget-omitted records also satisfy this, which is how they render.
    #[must_use]
    pub fn is_read_error(&self) -> bool {
        self.read_error_message.is_some() && self.content_str().is_empty() && !self.is_binary
    }
}

/// Result of classifying the leading window of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FileWindow {
    /// Bytes read from the start of the file
    pub(crate) data: Vec<u8>,

    /// A NUL byte was found in `data`
    pub(crate) is_binary: bool,

    /// The read filled the whole window
    pub(crate) truncated: bool,

    /// Number of `\n` bytes in `data`
    pub(crate) lines: usize,
}

/// Reads at most `max_bytes` from `reader` and classifies them.
///
/// The window is binary when it contains a NUL byte. It is reported as
/// truncated when the read fills the window exactly; whether more bytes
/// follow is never checked. Only terminated lines are counted.
///
/// A read error yields an empty, non-binary window.
pub(crate) fn read_window<R: Read>(reader: R, max_bytes: usize) -> FileWindow {
    let mut data = Vec::with_capacity(max_bytes.min(64 * 1024));
    if reader.take(max_bytes as u64).read_to_end(&mut data).is_err() {
        return FileWindow::default();
    }

    let is_binary = memchr::memchr(0, &data).is_some();
    let truncated = max_bytes > 0 && data.len() == max_bytes;
    let lines = memchr::memchr_iter(b'\n', &data).count();

    FileWindow {
        data,
        is_binary,
        truncated,
        lines,
    }
}

/// Returns the fence label for a path, keyed by lowercased extension.
#[must_use]
pub fn language_hint(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    LANGUAGE_HINTS.get(ext.as_str()).copied()
}
