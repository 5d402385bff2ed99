//! Error types for the docrender library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RenderError`] — **Fatal**: the run cannot start at all (input path
//!   missing, output directory cannot be created, invalid configuration).
//!   Returned as `Err(RenderError)` from the top-level `convert*` functions
//!   before any document is touched.
//!
//! * [`DocumentError`] — **Non-fatal**: a single document failed (corrupt
//!   source, nothing to render, destination not writable) but the rest of the
//!   batch is fine. Stored inside [`crate::output::DocumentResult`] so callers
//!   see partial success instead of losing the whole batch to one bad file.
//!
//! An unknown theme name is not an error at all: it resolves to the default
//! palette (see [`crate::pipeline::theme`]).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docrender library.
///
/// Document-level failures use [`DocumentError`] and are stored in
/// [`crate::output::DocumentResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum RenderError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file or directory does not exist.
    #[error("Input not found: '{}'\nCheck the path exists and is readable.", path.display())]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the input.
    #[error("Permission denied reading '{}'\nTry: chmod +r {path:?}", path.display())]
    PermissionDenied { path: PathBuf },

    /// Listing the input directory failed.
    #[error("Failed to list input directory '{}': {source}", path.display())]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output directory could not be created.
    #[error("Failed to create output directory '{}': {source}", path.display())]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An explicit output file was given for a directory of inputs.
    #[error(
        "Output '{}' looks like a file, but the input is a directory of documents",
        path.display()
    )]
    InvalidOutput { path: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single document.
///
/// Stored alongside [`crate::output::DocumentResult`] when a document fails.
/// The batch continues with the next document.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DocumentError {
    /// The source could not be read or decoded (corrupt or unsupported).
    #[error("{}: unreadable source: {detail}", path.display())]
    UnreadableSource { path: PathBuf, detail: String },

    /// Extraction produced no text.
    #[error("{}: no content to convert", path.display())]
    EmptyContent { path: PathBuf },

    /// The destination could not be written.
    #[error("{}: write failed: {detail}", path.display())]
    WriteFailure { path: PathBuf, detail: String },

    /// The HTML-to-PDF engine failed for this document.
    #[error("{}: PDF engine failed: {detail}", path.display())]
    PdfEngineFailed { path: PathBuf, detail: String },
}

impl DocumentError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentError::UnreadableSource { .. } => "unreadable_source",
            DocumentError::EmptyContent { .. } => "empty_content",
            DocumentError::WriteFailure { .. } => "write_failure",
            DocumentError::PdfEngineFailed { .. } => "pdf_engine_failed",
        }
    }
}
