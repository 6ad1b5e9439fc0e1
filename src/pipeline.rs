use crate::{
    collector::Collector,
    config::Config,
    document::OutputDocument,
    error::Result,
    filter::FileFilter,
    scanner::{resolve_root, Scanner},
    token::{SimpleTokenizer, TokenEstimator},
    vcs::{GitCli, NoVcs, VcsProvider},
    writer::Writer,
};
use std::time::Instant;
use tracing::{info, instrument};

/// Main orchestrator: resolves the root, scans, collects and writes.
pub struct Pipeline {
    config: Config,
    filter: FileFilter,
    writer: Writer,
    vcs: Box<dyn VcsProvider>,
    tokenizer: Box<dyn TokenEstimator>,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - Writer initialization fails
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let filter = config.file_filter()?;
        let writer = Writer::new(&config)?;
        let vcs: Box<dyn VcsProvider> = if config.vcs {
            Box::new(GitCli)
        } else {
            Box::new(NoVcs)
        };

        Ok(Self {
            config,
            filter,
            writer,
            vcs,
            tokenizer: Box::new(SimpleTokenizer),
        })
    }

    /// Replaces the version-control metadata provider.
    #[must_use]
    pub fn with_vcs(mut self, vcs: impl VcsProvider + 'static) -> Self {
        self.vcs = Box::new(vcs);
        self
    }

    /// Replaces the token estimator used for budgeting.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: impl TokenEstimator + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Builds the output document without writing it.
    ///
    /// # Process
    ///
    /// 1. **Root**: picks the base directory for all relative paths
    /// 2. **VCS**: looks up commit metadata once; absence is not an error
    /// 3. **Scan**: selects and sorts paths, and renders the tree
    /// 4. **Collect**: reads files in order under the token budget
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be determined.
    pub fn build_document(&self) -> Result<OutputDocument> {
        let root = resolve_root(&self.config.inputs)?;
        info!("Root directory: {}", root.display());

        let vcs = self.vcs.metadata(&root);

        let scan_start = Instant::now();
        let scan = Scanner::new(&root, &self.filter).scan(&self.config.inputs);
        info!(
            "✓ Selected {} paths in {:.2}s",
            scan.files.len(),
            scan_start.elapsed().as_secs_f64()
        );

        let collector = Collector::new(
            &root,
            self.config.max_file_size,
            self.config.max_tokens,
            self.tokenizer.as_ref(),
        );
        let (files, summary) = collector.collect(&scan.files);
        info!(
            "✓ Collected {} files (~{} tokens)",
            summary.total_files, summary.estimated_tokens
        );

        Ok(OutputDocument {
            location: root.display().to_string(),
            vcs,
            structure: scan.structure,
            files,
            summary,
        })
    }

    /// Builds the document and writes it to the configured destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be built or written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use repopack::{Config, OutputFormat, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .input(".")
    ///     .format(OutputFormat::Json)
    ///     .output("context.json")
    ///     .build()?;
    ///
    /// let doc = Pipeline::new(config)?.run()?;
    /// println!("{} files", doc.summary.total_files);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(inputs = self.config.inputs.len()))]
    pub fn run(self) -> Result<OutputDocument> {
        let start_time = Instant::now();

        let doc = self.build_document()?;
        self.writer.write(&doc)?;

        info!(
            "✓ Pipeline completed in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(doc)
    }
}
