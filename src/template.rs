use crate::{
    document::{OutputDocument, Summary, VcsMetadata},
    error::{Error, Result},
    file::FileRecord,
};
use serde::Serialize;
use tera::{Context, Tera};

const MARKDOWN_TEMPLATE: &str = "markdown";

#[derive(Serialize)]
struct TemplateContext<'a> {
    location: &'a str,
    git: Option<&'a VcsMetadata>,
    structure: &'a str,
    files: Vec<FileView<'a>>,
    summary: &'a Summary,
}

#[derive(Serialize)]
struct FileView<'a> {
    path: &'a str,
    kind: &'static str,
    size: u64,
    truncated: bool,
    language: &'a str,
    content: &'a str,
    message: Option<&'a str>,
}

impl<'a> From<&'a FileRecord> for FileView<'a> {
    fn from(record: &'a FileRecord) -> Self {
        let kind = if record.is_read_error() {
            "error"
        } else if record.is_binary {
            "binary"
        } else {
            "text"
        };

        Self {
            path: &record.path,
            kind,
            size: record.size,
            truncated: record.truncated,
            language: record.language_hint.as_deref().unwrap_or(""),
            content: record.content_str(),
            message: record.read_error_message.as_deref(),
        }
    }
}

/// Renders documents through the built-in Markdown template.
pub(crate) struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Creates a new template engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in template fails to parse.
    pub(crate) fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(MARKDOWN_TEMPLATE, include_str!("../templates/markdown.tera"))
            .map_err(|e| Error::template(MARKDOWN_TEMPLATE, e))?;

        Ok(Self { tera })
    }

    /// Renders the Markdown report for `doc`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub(crate) fn render_markdown(&self, doc: &OutputDocument) -> Result<String> {
        let view = TemplateContext {
            location: &doc.location,
            git: doc.vcs.as_ref(),
            structure: &doc.structure,
            files: doc.files.iter().map(FileView::from).collect(),
            summary: &doc.summary,
        };

        let context = Context::from_serialize(&view)
            .map_err(|e| Error::template(MARKDOWN_TEMPLATE, e))?;

        self.tera
            .render(MARKDOWN_TEMPLATE, &context)
            .map_err(|e| Error::template(MARKDOWN_TEMPLATE, e))
    }
}
