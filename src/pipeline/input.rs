//! Input resolution: turn the user-supplied path into an ordered list of
//! documents, and the output path into a concrete target.
//!
//! ## Why sort?
//!
//! `read_dir` order is filesystem-dependent. Sorting by file name makes batch
//! order, log order and progress indices the same on every machine, which
//! keeps runs reproducible and easy to diff.

use crate::error::{DocumentError, RenderError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source format, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// `.docx` container.
    WordBinary,
    /// `.md`, `.markdown`, `.txt` and anything else treated as UTF-8 text.
    MarkdownText,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        match extension_of(path).as_deref() {
            Some("docx") => DocumentKind::WordBinary,
            _ => DocumentKind::MarkdownText,
        }
    }
}

/// One input document, read fully into memory.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub kind: DocumentKind,
}

impl SourceDocument {
    /// Build from in-memory bytes; `file_name` decides the kind.
    pub fn from_bytes(bytes: Vec<u8>, file_name: &str) -> Self {
        let path = PathBuf::from(file_name);
        let kind = DocumentKind::from_path(&path);
        Self { path, bytes, kind }
    }

    /// Read a file from disk.
    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path).map_err(|e| DocumentError::UnreadableSource {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            kind: DocumentKind::from_path(path),
            bytes,
        })
    }

    /// File name without directories, used for metadata and logs.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Decode a Markdown source. Invalid UTF-8 is an unreadable source,
    /// and a leading BOM is dropped.
    pub fn text(&self) -> Result<String, DocumentError> {
        let text = std::str::from_utf8(&self.bytes).map_err(|e| DocumentError::UnreadableSource {
            path: self.path.clone(),
            detail: format!("not valid UTF-8: {e}"),
        })?;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
    }
}

/// Lower-cased extension without the dot.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Word keeps `~$name.docx` lock files next to open documents.
fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"))
}

fn check_readable(path: &Path) -> Result<(), RenderError> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(RenderError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(RenderError::InputNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Enumerate the documents to process.
///
/// A file is returned as-is, whatever its extension. A directory yields its
/// direct children whose extension is in `extensions` (case-insensitive),
/// skipping Word lock files, sorted by file name. An empty result is not an
/// error.
pub fn enumerate(input: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, RenderError> {
    check_readable(input)?;

    if !input.is_dir() {
        debug!("Single input document: {}", input.display());
        return Ok(vec![input.to_path_buf()]);
    }

    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let entries = std::fs::read_dir(input).map_err(|source| {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            RenderError::PermissionDenied {
                path: input.to_path_buf(),
            }
        } else {
            RenderError::ListFailed {
                path: input.to_path_buf(),
                source,
            }
        }
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RenderError::ListFailed {
            path: input.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || is_lock_file(&path) {
            continue;
        }
        let matches = extension_of(&path).is_some_and(|ext| wanted.iter().any(|w| *w == ext));
        if matches {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!(
        "Found {} document(s) in {} (extensions: {})",
        paths.len(),
        input.display(),
        wanted.join(",")
    );
    Ok(paths)
}

// ── Output target ────────────────────────────────────────────────────────────

/// Where converted documents are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Directory; file names are derived from metadata.
    Directory(PathBuf),
    /// Explicit file path, only valid for a single input file.
    File(PathBuf),
}

impl OutputTarget {
    /// Directory that must exist before writing.
    pub fn dir(&self) -> &Path {
        match self {
            OutputTarget::Directory(dir) => dir,
            OutputTarget::File(file) => file.parent().unwrap_or_else(|| Path::new(".")),
        }
    }

    /// Destination for a document whose derived name is `derived_name`.
    pub fn path_for(&self, derived_name: &str) -> PathBuf {
        match self {
            OutputTarget::Directory(dir) => dir.join(derived_name),
            OutputTarget::File(file) => file.clone(),
        }
    }
}

/// Decide whether `output` names a directory or a file.
///
/// It is a file when it has an extension and is not an existing directory.
/// A file target for a directory input is rejected.
pub fn resolve_output(input: &Path, output: &Path) -> Result<OutputTarget, RenderError> {
    let looks_like_file = output.extension().is_some() && !output.is_dir();
    if !looks_like_file {
        return Ok(OutputTarget::Directory(output.to_path_buf()));
    }
    if input.is_dir() {
        return Err(RenderError::InvalidOutput {
            path: output.to_path_buf(),
        });
    }
    Ok(OutputTarget::File(output.to_path_buf()))
}

/// Create the target directory (and parents) if absent.
pub fn ensure_output_dir(target: &OutputTarget) -> Result<(), RenderError> {
    let dir = target.dir();
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| RenderError::OutputDirFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    debug!("Created output directory {}", dir.display());
    Ok(())
}
