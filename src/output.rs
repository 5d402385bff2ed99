//! Result types: per-document outcomes, batch statistics and artifacts.
//!
//! A batch never fails half-way: every document gets a [`DocumentResult`],
//! successful or not, and [`BatchStats`] summarises them. All types are
//! `Serialize` so the CLI's `--json` mode can print them directly.

use crate::error::DocumentError;
use crate::pipeline::metadata::DocumentMetadata;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Bytes ready to be written, with the name derived for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    /// Derived file name (`{theme}_{date}.{ext}`), no directory.
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    /// Metadata the name and header were derived from.
    pub metadata: DocumentMetadata,
}

impl OutputArtifact {
    /// Write to `path` atomically: a temp file in the same directory is
    /// renamed over the destination, so readers never see a partial file and
    /// an existing file is replaced as a whole.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        write_atomic(path, &self.bytes)
    }
}

/// Atomic write via temp file + rename. Overwrites `path` if it exists.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Outcome for one document of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    /// 1-indexed position in the batch.
    pub index: usize,
    pub source: PathBuf,
    /// Written file; `None` on failure.
    pub output: Option<PathBuf>,
    /// `None` when the document failed before metadata was derived.
    pub metadata: Option<DocumentMetadata>,
    pub bytes_written: usize,
    pub duration_ms: u64,
    pub error: Option<DocumentError>,
}

impl DocumentResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate statistics for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl BatchStats {
    /// `converted/total`, e.g. `2/3`.
    pub fn summary(&self) -> String {
        format!("{}/{}", self.converted, self.total)
    }

    /// Tally a finished list of results.
    pub fn from_results(documents: &[DocumentResult], duration_ms: u64) -> Self {
        let converted = documents.iter().filter(|d| d.is_success()).count();
        Self {
            total: documents.len(),
            converted,
            failed: documents.len() - converted,
            duration_ms,
        }
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutput {
    /// One entry per enumerated document, in processing order.
    pub documents: Vec<DocumentResult>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Documents that failed, in order.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentResult> {
        self.documents.iter().filter(|d| !d.is_success())
    }
}

/// Dry-run view of one document: what would be written, and under which name.
#[derive(Debug, Clone, Serialize)]
pub struct InspectedDocument {
    pub source: PathBuf,
    /// `None` when the source could not be read.
    pub metadata: Option<DocumentMetadata>,
    /// Derived output file name (`{title}_{date}.{ext}`); `None` on error.
    pub output_name: Option<String>,
    pub error: Option<DocumentError>,
}
