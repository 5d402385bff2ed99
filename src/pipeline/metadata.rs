//! Metadata derivation: theme, date and output file name for a document.
//!
//! Everything here is a pure string function. Nothing fails: a file name
//! without a date yields [`DATE_UNSPECIFIED`], and a document with no usable
//! title yields an empty theme, which [`output_file_name`] renders as
//! `untitled`.
//!
//! ## Theme sources
//!
//! The content wins over the file name. Exported chat documents tend to have
//! names like `微信-2025-09-16 1430.docx`, which carry a date but no topic,
//! while their first line usually names the subject.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sentinel date used when the file name carries no `YYYY-MM-DD` token.
pub const DATE_UNSPECIFIED: &str = "unspecified";

/// Theme used in file names when a document has no derivable title.
pub const UNTITLED: &str = "untitled";

/// Metadata derived once per document, before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Human-readable title. May be empty.
    pub theme: String,
    /// `YYYY-MM-DD` or [`DATE_UNSPECIFIED`].
    pub date: String,
    /// File name of the source document (no directory component).
    pub source_name: String,
}

impl DocumentMetadata {
    /// Theme for display; `None` when no title could be derived.
    pub fn display_theme(&self) -> Option<&str> {
        if self.theme.is_empty() {
            None
        } else {
            Some(&self.theme)
        }
    }
}

static RE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

static RE_HEADING_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"#+ ").unwrap());

// `\w` in the regex crate is already Unicode-aware; the CJK block is listed
// explicitly so the intent survives a switch to an ASCII-only class.
static RE_TITLE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\x{4e00}-\x{9fff}]").unwrap());

static RE_NAME_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d\-\s]+").unwrap());

/// Return the first `YYYY-MM-DD` token in `file_name`, verbatim.
///
/// The token is not validated as a calendar date.
pub fn extract_date(file_name: &str) -> String {
    RE_DATE
        .find(file_name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DATE_UNSPECIFIED.to_string())
}

/// Derive a title from the first non-empty line of `text`.
pub fn theme_from_content(text: &str, max_chars: usize) -> String {
    let stripped = RE_HEADING_MARKER.replace_all(text, "");
    let first_line = stripped
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    let truncated: String = first_line.chars().take(max_chars).collect();
    RE_TITLE_NOISE
        .replace_all(&truncated, "")
        .trim()
        .to_string()
}

/// Derive a title from a file name by dropping its extension, the `noise`
/// literals, digits, dashes and whitespace.
pub fn theme_from_file_name(file_name: &str, noise: &[String]) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let mut name = stem.to_string();
    for literal in noise.iter().filter(|n| !n.is_empty()) {
        name = name.replace(literal.as_str(), "");
    }
    RE_NAME_NOISE.replace_all(&name, "").trim().to_string()
}

/// Derive the full metadata for one document.
///
/// `content` is the extracted or source Markdown text.
pub fn derive(
    file_name: &str,
    content: &str,
    title_max_chars: usize,
    noise: &[String],
) -> DocumentMetadata {
    let mut theme = theme_from_content(content, title_max_chars);
    if theme.is_empty() {
        theme = theme_from_file_name(file_name, noise);
    }
    DocumentMetadata {
        theme,
        date: extract_date(file_name),
        source_name: file_name.to_string(),
    }
}

/// Build a filesystem-safe output file name: `{theme}_{date}.{ext}`.
pub fn output_file_name(metadata: &DocumentMetadata, ext: &str) -> String {
    let theme = metadata.display_theme().unwrap_or(UNTITLED);
    let date = if metadata.date.is_empty() {
        DATE_UNSPECIFIED
    } else {
        metadata.date.as_str()
    };
    let stem = sanitize_file_component(&format!("{}_{}", theme, date));
    format!("{}.{}", stem, ext.trim_start_matches('.'))
}

/// Replace path separators, reserved characters and control characters.
pub fn sanitize_file_component(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
