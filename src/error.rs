use std::path::PathBuf;
use thiserror::Error;

/// Result alias for run-level failures.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a run.
///
/// Per-file problems never show up here; they are recorded in
/// [`crate::FileRecord::read_error_message`].
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Reading the working directory or writing the output failed.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error text
        message: String,
    },

    /// The built-in Markdown template failed to parse or render.
    #[error("Failed to render template '{template}': {message}")]
    Template {
        /// Template name
        template: String,
        /// Underlying error text
        message: String,
    },

    /// Rejected by `Config::validate`.
    #[error("Invalid configuration: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// JSON output could not be produced.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Underlying error text
        message: String,
    },

    /// Include or exclude glob that cannot be compiled.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Pattern as given
        pattern: String,
        /// Compiler message
        reason: String,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn template(template: impl Into<String>, source: tera::Error) -> Self {
        Self::Template {
            template: template.into(),
            message: source.to_string(),
        }
    }

    pub(crate) fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
