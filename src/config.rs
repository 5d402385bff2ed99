//! Configuration types for document rendering.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The library reads no environment
//! variables and no config files: the CLI maps its flags (and their
//! `DOCRENDER_*` env fallbacks) onto the builder, and library callers do the
//! same in code.
//!
//! # Design choice: builder over constructor
//! Most callers change one or two knobs (theme, output format). The builder
//! lets them set only those and rely on documented defaults for the rest, and
//! [`ConversionConfigBuilder::build`] is the single place where combinations
//! are validated.

use crate::error::RenderError;
use crate::pipeline::extract::ParagraphReader;
use crate::pipeline::markdown::MarkdownExtensions;
use crate::pipeline::pdf::PdfEngine;
use crate::pipeline::template::RenderMode;
use crate::pipeline::theme::ThemeId;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Accepted range for [`ConversionConfig::title_max_chars`].
pub const TITLE_MAX_CHARS_RANGE: std::ops::RangeInclusive<usize> = 1..=200;

/// Configuration for a rendering run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use docrender::{ConversionConfig, OutputFormat, RenderMode, ThemeId};
///
/// let config = ConversionConfig::builder()
///     .theme(ThemeId::Moon)
///     .mode(RenderMode::Print)
///     .format(OutputFormat::Pdf)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Palette for HTML output. Default: [`ThemeId::Cyan`].
    pub theme: ThemeId,

    /// Page shell for HTML output. Default: [`RenderMode::Interactive`].
    pub mode: RenderMode,

    /// Artifact type written per document. Default: [`OutputFormat::Html`].
    pub format: OutputFormat,

    /// Extensions picked up when the input is a directory (case-insensitive,
    /// without the dot). Default: `docx`, `md`, `markdown`, `txt`.
    pub extensions: Vec<String>,

    /// Markdown engine extensions. Default: all enabled.
    pub markdown: MarkdownExtensions,

    /// Maximum characters of the first line used as a title. Range 1–200. Default: 30.
    ///
    /// Titles end up in file names, so long first sentences are cut rather
    /// than producing 200-character names.
    pub title_max_chars: usize,

    /// Literals removed from file names before a title is derived from them.
    /// Default: `["微信"]`.
    pub filename_noise: Vec<String>,

    /// Prefix Markdown output with a title/date/source header. Default: true.
    pub include_header: bool,

    /// Program used by the default PDF engine. Default: `weasyprint`.
    pub pdf_command: String,

    /// Arguments for [`Self::pdf_command`]. Default: `["-", "-"]` (stdin → stdout).
    pub pdf_args: Vec<String>,

    /// Pre-constructed PDF engine. Takes precedence over `pdf_command`.
    pub pdf_engine: Option<Arc<dyn PdfEngine>>,

    /// Pre-constructed paragraph reader for `.docx` sources.
    /// If None, uses [`DocxReader`](crate::pipeline::extract::DocxReader).
    pub paragraph_reader: Option<Arc<dyn ParagraphReader>>,

    /// Per-document progress events. If None, no events are emitted.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            theme: ThemeId::default(),
            mode: RenderMode::default(),
            format: OutputFormat::default(),
            extensions: ["docx", "md", "markdown", "txt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            markdown: MarkdownExtensions::default(),
            title_max_chars: 30,
            filename_noise: vec!["微信".to_string()],
            include_header: true,
            pdf_command: "weasyprint".to_string(),
            pdf_args: vec!["-".to_string(), "-".to_string()],
            pdf_engine: None,
            paragraph_reader: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("theme", &self.theme)
            .field("mode", &self.mode)
            .field("format", &self.format)
            .field("extensions", &self.extensions)
            .field("markdown", &self.markdown)
            .field("title_max_chars", &self.title_max_chars)
            .field("filename_noise", &self.filename_noise)
            .field("include_header", &self.include_header)
            .field("pdf_command", &self.pdf_command)
            .field("pdf_args", &self.pdf_args)
            .field("pdf_engine", &self.pdf_engine.as_ref().map(|_| "<dyn PdfEngine>"))
            .field(
                "paragraph_reader",
                &self.paragraph_reader.as_ref().map(|_| "<dyn ParagraphReader>"),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn theme(mut self, theme: ThemeId) -> Self {
        self.config.theme = theme;
        self
    }

    /// Lenient: unknown names select the default theme.
    pub fn theme_name(mut self, name: &str) -> Self {
        self.config.theme = ThemeId::from_name(name);
        self
    }

    pub fn mode(mut self, mode: RenderMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn markdown(mut self, extensions: MarkdownExtensions) -> Self {
        self.config.markdown = extensions;
        self
    }

    pub fn title_max_chars(mut self, n: usize) -> Self {
        self.config.title_max_chars = n;
        self
    }

    pub fn filename_noise<I, S>(mut self, noise: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.filename_noise = noise.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_header(mut self, v: bool) -> Self {
        self.config.include_header = v;
        self
    }

    pub fn pdf_command(mut self, program: impl Into<String>) -> Self {
        self.config.pdf_command = program.into();
        self
    }

    pub fn pdf_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.pdf_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn pdf_engine(mut self, engine: Arc<dyn PdfEngine>) -> Self {
        self.config.pdf_engine = Some(engine);
        self
    }

    pub fn paragraph_reader(mut self, reader: Arc<dyn ParagraphReader>) -> Self {
        self.config.paragraph_reader = Some(reader);
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, RenderError> {
        let c = &self.config;
        if !TITLE_MAX_CHARS_RANGE.contains(&c.title_max_chars) {
            return Err(RenderError::InvalidConfig(format!(
                "title_max_chars must be {}–{}, got {}",
                TITLE_MAX_CHARS_RANGE.start(),
                TITLE_MAX_CHARS_RANGE.end(),
                c.title_max_chars
            )));
        }
        if c.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            return Err(RenderError::InvalidConfig(
                "At least one input extension is required".into(),
            ));
        }
        if c.format == OutputFormat::Pdf && c.mode != RenderMode::Print {
            return Err(RenderError::InvalidConfig(
                "PDF output requires print mode".into(),
            ));
        }
        if c.format == OutputFormat::Pdf && c.pdf_engine.is_none() && c.pdf_command.trim().is_empty() {
            return Err(RenderError::InvalidConfig(
                "PDF output needs a pdf_command or a pdf_engine".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Artifact written for each document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Extracted/normalised Markdown with an optional metadata header.
    Markdown,
    /// Themed HTML page. (default)
    #[default]
    Html,
    /// Print-mode HTML converted by the PDF engine.
    Pdf,
}

impl OutputFormat {
    /// File extension for the artifact, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "text/markdown; charset=utf-8",
            OutputFormat::Html => crate::pipeline::template::HTML_MIME,
            OutputFormat::Pdf => "application/pdf",
        }
    }
}
