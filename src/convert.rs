//! Eager (whole-batch) conversion entry points.
//!
//! ## Why eager vs. streaming?
//!
//! This module provides the simpler API: process every document, then
//! return one [`BatchOutput`]. It is a thin collector over
//! [`crate::stream::convert_stream`]; use the stream directly when you want
//! results one by one (e.g. to print each file as it is written).
//!
//! The per-document pipeline lives here too ([`convert_document`],
//! [`convert_from_bytes`]) so single documents can be converted fully in
//! memory without touching the output directory.

use crate::config::{ConversionConfig, OutputFormat};
use crate::error::{DocumentError, RenderError};
use crate::output::{BatchOutput, BatchStats, InspectedDocument, OutputArtifact};
use crate::pipeline::extract::{self, DocxReader, ParagraphReader};
use crate::pipeline::input::{self, DocumentKind, SourceDocument};
use crate::pipeline::metadata::{self, DocumentMetadata};
use crate::pipeline::normalize::normalize;
use crate::pipeline::pdf::{CommandPdfEngine, PdfEngine};
use crate::pipeline::template::{self, RenderMode, RenderRequest, RenderedDocument, UNTITLED_DISPLAY};
use crate::pipeline::theme;
use crate::stream::convert_stream;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a document or a directory of documents.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — a document, or a directory whose matching files are converted
///   in file-name order
/// * `output` — a directory (file names derived from metadata), or, for a
///   single input file, an explicit output file path
/// * `config` — conversion configuration
///
/// # Returns
/// `Ok(BatchOutput)` whenever the batch could run, even if some or all
/// documents failed (check `output.stats.failed`).
///
/// # Errors
/// Returns `Err(RenderError)` only for fatal errors:
/// - Input not found / permission denied
/// - Output directory cannot be created
/// - Explicit output file with a directory input
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchOutput, RenderError> {
    let start = Instant::now();
    let documents: Vec<_> = convert_stream(input, output, config)?.collect();
    let stats = BatchStats::from_results(&documents, start.elapsed().as_millis() as u64);

    info!(
        "Conversion complete: {} documents converted ({} failed), {}ms total",
        stats.summary(),
        stats.failed,
        stats.duration_ms
    );

    Ok(BatchOutput { documents, stats })
}

/// Convert one document on disk fully in memory.
///
/// Nothing is written; the caller decides where the artifact goes (see
/// [`OutputArtifact::write_to`]).
pub fn convert_document(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<OutputArtifact, DocumentError> {
    let source = SourceDocument::read(path.as_ref())?;
    Pipeline::new(config).run(&source)
}

/// Convert document bytes held in memory.
///
/// `file_name` selects the source kind (`.docx` vs Markdown) and feeds the
/// date and title fallbacks, exactly as a file of that name would.
///
/// # Example
/// ```rust
/// use docrender::{convert_from_bytes, ConversionConfig};
///
/// let config = ConversionConfig::default();
/// let artifact = convert_from_bytes(b"# Hello\n\nWorld", "notes-2025-01-02.md", &config).unwrap();
/// assert_eq!(artifact.file_name, "Hello_2025-01-02.html");
/// ```
pub fn convert_from_bytes(
    bytes: &[u8],
    file_name: &str,
    config: &ConversionConfig,
) -> Result<OutputArtifact, DocumentError> {
    let source = SourceDocument::from_bytes(bytes.to_vec(), file_name);
    Pipeline::new(config).run(&source)
}

/// Render Markdown text to an HTML page using the configured theme and mode.
///
/// Pure: no I/O, no PDF engine. An empty source still yields a complete page.
pub fn render_markdown(markdown: &str, file_name: &str, config: &ConversionConfig) -> RenderedDocument {
    let metadata = metadata::derive(
        file_name,
        markdown,
        config.title_max_chars,
        &config.filename_noise,
    );
    template::render(&render_request(markdown, metadata, config, config.mode))
}

/// Derive metadata and planned output names without rendering or writing.
///
/// Unreadable documents are reported in their entry rather than failing the
/// whole call.
pub fn inspect(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<Vec<InspectedDocument>, RenderError> {
    let paths = input::enumerate(input.as_ref(), &config.extensions)?;
    let pipeline = Pipeline::new(config);

    let inspected = paths
        .into_iter()
        .map(|path| {
            let prepared = SourceDocument::read(&path).and_then(|s| pipeline.prepare(&s));
            match prepared {
                Ok((_, meta)) => InspectedDocument {
                    output_name: Some(metadata::output_file_name(&meta, config.format.extension())),
                    metadata: Some(meta),
                    error: None,
                    source: path,
                },
                Err(e) => InspectedDocument {
                    source: path,
                    metadata: None,
                    output_name: None,
                    error: Some(e),
                },
            }
        })
        .collect();
    Ok(inspected)
}

// ── Per-document pipeline ────────────────────────────────────────────────

/// Configuration plus the reader and PDF engine it resolves to.
pub(crate) struct Pipeline<'a> {
    config: &'a ConversionConfig,
    reader: Arc<dyn ParagraphReader>,
    pdf: Arc<dyn PdfEngine>,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(config: &'a ConversionConfig) -> Self {
        let reader = config
            .paragraph_reader
            .clone()
            .unwrap_or_else(|| Arc::new(DocxReader));
        let pdf = config.pdf_engine.clone().unwrap_or_else(|| {
            Arc::new(CommandPdfEngine::new(
                config.pdf_command.clone(),
                config.pdf_args.clone(),
            ))
        });
        Self { config, reader, pdf }
    }

    /// Source → Markdown text + metadata. Fails on unreadable or empty sources.
    pub(crate) fn prepare(
        &self,
        source: &SourceDocument,
    ) -> Result<(String, DocumentMetadata), DocumentError> {
        let markdown = match source.kind {
            DocumentKind::WordBinary => {
                let blocks = extract::extract(source, self.reader.as_ref())?;
                extract::blocks_to_markdown(&blocks)
            }
            DocumentKind::MarkdownText => source.text()?,
        };
        if markdown.trim().is_empty() {
            return Err(DocumentError::EmptyContent {
                path: source.path.clone(),
            });
        }
        let meta = metadata::derive(
            &source.file_name(),
            &markdown,
            self.config.title_max_chars,
            &self.config.filename_noise,
        );
        debug!(
            "{}: theme='{}' date={}",
            meta.source_name, meta.theme, meta.date
        );
        Ok((markdown, meta))
    }

    /// Full pipeline for one source, in memory.
    pub(crate) fn run(&self, source: &SourceDocument) -> Result<OutputArtifact, DocumentError> {
        let (markdown, meta) = self.prepare(source)?;
        let format = self.config.format;

        let bytes = match format {
            OutputFormat::Markdown => {
                let body = markdown.replace("\r\n", "\n");
                if self.config.include_header {
                    format!("{}{}", markdown_header(&meta), body).into_bytes()
                } else {
                    body.into_bytes()
                }
            }
            OutputFormat::Html => {
                let request = render_request(&markdown, meta.clone(), self.config, self.config.mode);
                template::render(&request).content.into_bytes()
            }
            OutputFormat::Pdf => {
                let request = render_request(&markdown, meta.clone(), self.config, RenderMode::Print);
                let html = template::render(&request).content;
                self.pdf
                    .html_to_pdf(&html)
                    .map_err(|detail| DocumentError::PdfEngineFailed {
                        path: source.path.clone(),
                        detail,
                    })?
            }
        };

        Ok(OutputArtifact {
            file_name: metadata::output_file_name(&meta, format.extension()),
            bytes,
            mime_type: format.mime_type(),
            metadata: meta,
        })
    }
}

fn render_request(
    markdown: &str,
    metadata: DocumentMetadata,
    config: &ConversionConfig,
    mode: RenderMode,
) -> RenderRequest {
    RenderRequest {
        source_markdown: normalize(markdown),
        metadata,
        style: theme::resolve(config.theme),
        mode,
        extensions: config.markdown,
    }
}

/// Title, date and source file block prepended to Markdown output.
fn markdown_header(meta: &DocumentMetadata) -> String {
    format!(
        "# {}\n\n**Date**: {}\n**Source**: {}\n\n---\n\n",
        meta.display_theme().unwrap_or(UNTITLED_DISPLAY),
        meta.date,
        meta.source_name
    )
}
