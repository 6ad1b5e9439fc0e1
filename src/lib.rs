//! # repopack
//!
//! Packs a repository into a single context document for LLM prompts.
//!
//! ## Features
//!
//! - Include/exclude globs with directory pruning
//! - Deterministic, byte-ordered file selection and tree rendering
//! - NUL-byte binary detection and a per-file read window
//! - Global token budget with a hard stop
//! - Markdown and JSON output, optional git commit metadata
//!
//! ## Quick Start
//!
//! ```no_run
//! use repopack::{Config, OutputFormat, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .input("./src")
//!     .includes(vec!["*.rs".to_string()])
//!     .format(OutputFormat::Markdown)
//!     .max_tokens(100_000)
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Scanner**: resolves the root and selects paths through the filter
//! 2. **Collector**: reads each file's window and applies the token budget
//! 3. **Writer**: renders Markdown or JSON and writes it out

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod collector;
mod config;
mod document;
mod error;
mod file;
mod filter;
mod pipeline;
mod scanner;
mod template;
mod token;
mod tree;
mod vcs;
mod writer;

pub use config::{split_list, Config, ConfigBuilder, OutputFormat};
pub use document::{OutputDocument, Summary, VcsMetadata};
pub use error::{Error, Result};
pub use file::{language_hint, FileRecord};
pub use pipeline::Pipeline;
pub use token::{SimpleTokenizer, TokenEstimator};
pub use vcs::{GitCli, NoVcs, VcsProvider};

/// Runs the complete pipeline with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The root directory cannot be determined
/// - The output cannot be written
///
/// # Examples
///
/// ```no_run
/// use repopack::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .input(".")
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<OutputDocument> {
    Pipeline::new(config)?.run()
}
