use anyhow::Context;
use clap::Parser;
use repopack::{split_list, Config, OutputFormat, Pipeline};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "repopack",
    version,
    about = "Pack a repository into one Markdown or JSON context document",
    long_about = "Pack a repository into one Markdown or JSON context document.\n\n\
    Walks the given paths, applies include/exclude globs, reads the start of \
    every file and renders a tree, per-file contents and summary counters. \
    Git commit metadata is added when the root is inside a repository.\n\n\
    USAGE EXAMPLES:\n  \
      repopack .\n  \
      repopack src main.go\n  \
      repopack . -o context.md\n  \
      repopack . --include \"*.go,*.md\" --exclude \"*_test.go,vendor\"\n  \
      repopack . --format json --max-tokens 50000"
)]
struct Cli {
    /// Files or directories to pack
    #[arg(value_name = "PATHS", default_value = ".")]
    paths: Vec<PathBuf>,

    /// Comma-separated globs to include (supports *, ?, [class])
    #[arg(long, value_name = "GLOBS", default_value = "")]
    include: String,

    /// Comma-separated globs to exclude (supports *, ?, [class])
    #[arg(long, value_name = "GLOBS", default_value = "")]
    exclude: String,

    /// Bytes read from the start of each file
    #[arg(long, default_value_t = 16 * 1024, value_name = "BYTES")]
    max_file_size: usize,

    /// Stop once the estimated token total would exceed this (0 = no limit)
    #[arg(long, default_value_t = 0)]
    max_tokens: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    format: CliFormat,

    /// Output file (default stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the estimated token count after the document
    #[arg(long)]
    tokens: bool,

    /// Skip the git metadata lookup
    #[arg(long)]
    no_git: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliFormat {
    Markdown,
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(f: CliFormat) -> Self {
        match f {
            CliFormat::Markdown => Self::Markdown,
            CliFormat::Json => Self::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let mut builder = Config::builder()
        .inputs(cli.paths)
        .includes(split_list(&cli.include))
        .excludes(split_list(&cli.exclude))
        .max_file_size(cli.max_file_size)
        .max_tokens(cli.max_tokens)
        .format(cli.format.into())
        .show_tokens(cli.tokens)
        .vcs(!cli.no_git);

    if let Some(output) = cli.output {
        builder = builder.output(output);
    }

    let config = builder.build().context("Failed to build configuration")?;

    Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Failed to write output")?;

    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("repopack=warn"),
        1 => EnvFilter::new("repopack=info"),
        2 => EnvFilter::new("repopack=debug"),
        _ => EnvFilter::new("repopack=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();
}
