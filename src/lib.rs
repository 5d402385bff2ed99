//! # docrender
//!
//! Convert Word (`.docx`) and Markdown documents into themed HTML pages,
//! and optionally into PDF through an external HTML-to-PDF engine.
//!
//! ## Why this crate?
//!
//! Notes exported from chat tools and word processors tend to arrive as a
//! pile of `.docx` and `.md` files with useless names. This crate turns each
//! of them into a readable page (print layout, or an interactive page with a
//! sidebar outline, search and a theme toggle) named after its own title and
//! date, and keeps going when one file in the batch is broken.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Document (.docx / .md)
//!  │
//!  ├─ 1. Input      enumerate + read bytes (sorted, lock files skipped)
//!  ├─ 2. Extract    docx paragraphs → headings / body → Markdown
//!  ├─ 3. Metadata   title from first line, date from file name
//!  ├─ 4. Normalise  image-placeholder runs → styled blocks
//!  ├─ 5. Render     pulldown-cmark body + theme + print/interactive shell
//!  ├─ 6. PDF        optional: print HTML → external engine → PDF bytes
//!  └─ 7. Output     {title}_{date}.{ext}, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docrender::{convert, ConversionConfig, RenderMode, ThemeId};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .theme(ThemeId::Moon)
//!         .mode(RenderMode::Interactive)
//!         .build()?;
//!     let output = convert("notes/", "site/", &config)?;
//!     eprintln!("converted {}", output.stats.summary());
//!     for failed in output.failures() {
//!         eprintln!("  {}: {:?}", failed.source.display(), failed.error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docrender` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! docrender = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod chrome;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, OutputFormat};
pub use convert::{convert, convert_document, convert_from_bytes, inspect, render_markdown};
pub use error::{DocumentError, RenderError};
pub use output::{BatchOutput, BatchStats, DocumentResult, InspectedDocument, OutputArtifact};
pub use pipeline::extract::{DocxReader, ParagraphReader};
pub use pipeline::markdown::MarkdownExtensions;
pub use pipeline::metadata::DocumentMetadata;
pub use pipeline::pdf::{CommandPdfEngine, PdfEngine};
pub use pipeline::template::{RenderMode, RenderRequest, RenderedDocument};
pub use pipeline::theme::{StyleConfig, ThemeId};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{convert_stream, DocumentStream};
