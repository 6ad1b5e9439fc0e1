use crate::{
    config::{Config, OutputFormat},
    document::OutputDocument,
    error::{Error, Result},
    template::TemplateEngine,
};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Renders a document and writes it to stdout or a file.
pub(crate) struct Writer {
    format: OutputFormat,
    output: Option<PathBuf>,
    show_tokens: bool,
    template_engine: TemplateEngine,
}

impl Writer {
    /// Creates a new writer from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if template engine initialization fails.
    pub(crate) fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            format: config.format,
            output: config.output.clone(),
            show_tokens: config.show_tokens,
            template_engine: TemplateEngine::new()?,
        })
    }

    /// Renders `doc` in the configured format, with the token trailer if enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or serialization fails.
    pub(crate) fn render(&self, doc: &OutputDocument) -> Result<String> {
        let mut out = match self.format {
            OutputFormat::Markdown => self.template_engine.render_markdown(doc)?,
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(doc)?;
                json.push('\n');
                json
            }
        };

        if self.show_tokens {
            out.push_str(&format!(
                "\nEstimated tokens: {}\n",
                doc.summary.estimated_tokens
            ));
        }

        Ok(out)
    }

    /// Renders and writes `doc` to its destination.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the destination cannot be written.
    pub(crate) fn write(&self, doc: &OutputDocument) -> Result<()> {
        let content = self.render(doc)?;

        match self.output {
            Some(ref path) => {
                Self::write_file_atomic(path, &content)?;
                info!("Wrote {} bytes to {}", content.len(), path.display());
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(content.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|e| Error::io("<stdout>", e))?;
                debug!("Wrote {} bytes to stdout", content.len());
            }
        }

        Ok(())
    }

    /// Writes a file atomically.
    ///
    /// # Process
    ///
    /// 1. Writes content to a temporary sibling file
    /// 2. Syncs the temporary file to disk
    /// 3. Renames it over the target path
    fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .sync_all()
            .map_err(|e| Error::io(&temp_path, e))?;

        drop(temp_file);

        fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Summary;
    use crate::file::FileRecord;
    use assert_fs::prelude::*;

    fn sample_doc() -> OutputDocument {
        let mut record = FileRecord::new("a.go");
        record.size = 13;
        record.content = Some("package main\n".to_string());
        record.language_hint = Some("go".to_string());

        OutputDocument {
            location: "/repo".to_string(),
            vcs: None,
            structure: "```\na.go\n```".to_string(),
            files: vec![record],
            summary: Summary {
                total_files: 1,
                total_lines: 1,
                estimated_tokens: 4,
                skipped_by_limit: 0,
                binary_files: 0,
            },
        }
    }

    fn writer(format: OutputFormat, output: Option<PathBuf>, show_tokens: bool) -> Writer {
        let mut builder = Config::builder()
            .format(format)
            .show_tokens(show_tokens)
            .vcs(false);
        if let Some(output) = output {
            builder = builder.output(output);
        }
        Writer::new(&builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_render_json() {
        let rendered = writer(OutputFormat::Json, None, false)
            .render(&sample_doc())
            .unwrap();

        assert!(rendered.starts_with("{\n  \"location\": \"/repo\""));
        assert!(rendered.ends_with("}\n"));

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["files"][0]["language_hint"], "go");
        assert_eq!(value["summary"]["estimated_tokens"], 4);
        assert!(value.get("git").is_none());
    }

    #[test]
    fn test_render_markdown() {
        let rendered = writer(OutputFormat::Markdown, None, false)
            .render(&sample_doc())
            .unwrap();

        assert!(rendered.starts_with("# Repository Context\n"));
        assert!(!rendered.contains("\nEstimated tokens:"));
    }

    #[test]
    fn test_token_trailer() {
        let markdown = writer(OutputFormat::Markdown, None, true)
            .render(&sample_doc())
            .unwrap();
        assert!(markdown.ends_with("- Estimated tokens: 4\n\nEstimated tokens: 4\n"));

        let json = writer(OutputFormat::Json, None, true)
            .render(&sample_doc())
            .unwrap();
        assert!(json.ends_with("}\n\nEstimated tokens: 4\n"));
    }

    #[test]
    fn test_write_to_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("context.md");

        writer(OutputFormat::Markdown, Some(target.path().to_path_buf()), false)
            .write(&sample_doc())
            .unwrap();

        let written = fs::read_to_string(target.path()).unwrap();
        assert!(written.starts_with("# Repository Context"));
        temp.child("context.md.tmp").assert(predicates::path::missing());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.path().join("no/such/dir/out.json");

        let err = writer(OutputFormat::Json, Some(target), false)
            .write(&sample_doc())
            .unwrap_err();

        assert!(err.is_io());
    }
}
