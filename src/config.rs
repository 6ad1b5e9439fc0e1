use crate::error::{Error, Result};
use crate::filter::FileFilter;
use std::path::PathBuf;

const DEFAULT_MAX_FILE_SIZE: usize = 16 * 1024;
const DEFAULT_MAX_TOKENS: usize = 0;

/// Output format of the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable report with fenced code blocks
    #[default]
    Markdown,
    /// Pretty-printed JSON mirroring the document fields
    Json,
}

/// Configuration for one repopack run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Files and directories to pack, in the order given
    pub inputs: Vec<PathBuf>,

    /// Glob patterns a path must match to be kept (empty keeps everything)
    pub includes: Vec<String>,

    /// Glob patterns that drop a path (and prune a directory)
    pub excludes: Vec<String>,

    /// Bytes read from the start of each file
    pub max_file_size: usize,

    /// Global token budget, 0 for unlimited
    pub max_tokens: usize,

    /// Output format
    pub format: OutputFormat,

    /// Destination file; stdout when `None`
    pub output: Option<PathBuf>,

    /// Append an `Estimated tokens` line after the document
    pub show_tokens: bool,

    /// Query version control for commit metadata
    pub vcs: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use repopack::Config;
    ///
    /// let config = Config::builder()
    ///     .input("./src")
    ///     .max_tokens(50_000)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// Inputs are not checked for existence here: a missing input is a
    /// diagnostic during the scan, not a configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No inputs are configured
    /// - An include or exclude pattern is not a valid glob
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::config("at least one input path is required"));
        }

        self.file_filter()?;

        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                return Err(Error::config("output path must not be empty"));
            }
        }

        Ok(())
    }

    /// Compiles the include/exclude patterns.
    pub(crate) fn file_filter(&self) -> Result<FileFilter> {
        FileFilter::new(&self.includes, &self.excludes)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: vec![PathBuf::from(".")],
            includes: Vec::new(),
            excludes: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_tokens: DEFAULT_MAX_TOKENS,
            format: OutputFormat::Markdown,
            output: None,
            show_tokens: false,
            vcs: true,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    inputs: Vec<PathBuf>,
    includes: Vec<String>,
    excludes: Vec<String>,
    max_file_size: Option<usize>,
    max_tokens: Option<usize>,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    show_tokens: bool,
    vcs: Option<bool>,
}

impl ConfigBuilder {
    /// Adds one input path.
    #[must_use]
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.inputs.push(path.into());
        self
    }

    /// Adds several input paths.
    #[must_use]
    pub fn inputs<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.inputs.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the include patterns.
    #[must_use]
    pub fn includes(mut self, patterns: Vec<String>) -> Self {
        self.includes = patterns;
        self
    }

    /// Sets the exclude patterns.
    #[must_use]
    pub fn excludes(mut self, patterns: Vec<String>) -> Self {
        self.excludes = patterns;
        self
    }

    /// Sets the per-file read window in bytes.
    #[must_use]
    pub fn max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Sets the global token budget (0 disables it).
    #[must_use]
    pub fn max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Writes the document to a file instead of stdout.
    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Appends the estimated token count after the document.
    #[must_use]
    pub fn show_tokens(mut self, enabled: bool) -> Self {
        self.show_tokens = enabled;
        self
    }

    /// Enables or disables version-control metadata lookup.
    #[must_use]
    pub fn vcs(mut self, enabled: bool) -> Self {
        self.vcs = Some(enabled);
        self
    }

    /// Builds the configuration.
    ///
    /// With no inputs the current directory is used.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let inputs = if self.inputs.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.inputs
        };

        let config = Config {
            inputs,
            includes: self.includes,
            excludes: self.excludes,
            max_file_size: self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            format: self.format.unwrap_or_default(),
            output: self.output,
            show_tokens: self.show_tokens,
            vcs: self.vcs.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Splits a comma-separated pattern list.
///
/// Entries are trimmed and empty entries dropped, so `" , "` yields no
/// patterns at all.
#[must_use]
pub fn split_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
