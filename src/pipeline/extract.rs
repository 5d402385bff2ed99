//! Word extraction: `.docx` bytes → ordered, classified text blocks → Markdown.
//!
//! ## Why a trait in front of the reader?
//!
//! The document-model reader is the one stage whose behaviour depends on a
//! file format we do not control. [`ParagraphReader`] reduces it to "bytes in,
//! paragraph strings out" so the classification heuristic can be tested with
//! plain string slices, and callers can plug in another reader (e.g. one that
//! also walks tables) through
//! [`ConversionConfigBuilder::paragraph_reader`](crate::config::ConversionConfigBuilder::paragraph_reader).
//!
//! ## Heading heuristic
//!
//! Word documents exported from chat tools rarely use real heading styles, so
//! the structure is guessed from text alone: a short paragraph (fewer than 50
//! characters) without a full-width period `。` is a heading, everything else
//! is body text. This misclassifies short sentences without `。`, which is
//! acceptable for the notes this pipeline targets.

use crate::error::DocumentError;
use crate::pipeline::input::SourceDocument;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use tracing::debug;

/// Paragraphs at or above this many characters are always body text.
pub const HEADING_MAX_CHARS: usize = 50;

/// Full-width period; its presence marks a sentence, i.e. body text.
pub const FULL_WIDTH_PERIOD: char = '。';

const DOCUMENT_PART: &str = "word/document.xml";

// ── Types ────────────────────────────────────────────────────────────────

/// Role assigned to an extracted paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockRole {
    Heading,
    Body,
}

/// One non-empty paragraph of a Word document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedBlock {
    /// Trimmed paragraph text; never empty.
    pub text: String,
    pub role: BlockRole,
}

/// Reads the paragraph texts of a document, in document order.
///
/// Returning `Err(String)` marks the source as unreadable; the message is
/// carried into [`DocumentError::UnreadableSource`].
pub trait ParagraphReader: Send + Sync {
    fn read_paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, String>;
}

// ── Default reader ───────────────────────────────────────────────────────

/// `.docx` reader: unzips the container and walks `word/document.xml`.
///
/// Only body-level paragraphs are returned. Paragraphs inside tables and
/// text boxes are skipped, and the paragraph that anchors a text box keeps
/// its own runs on both sides of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxReader;

impl ParagraphReader for DocxReader {
    fn read_paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| format!("not a .docx container: {e}"))?;
        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| format!("missing {DOCUMENT_PART}: {e}"))?
            .read_to_string(&mut xml)
            .map_err(|e| format!("failed to read {DOCUMENT_PART}: {e}"))?;
        parse_document_xml(&xml)
    }
}

/// Walk WordprocessingML and collect paragraph texts.
fn parse_document_xml(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut buf = Vec::new();
    // Tables and text boxes: paragraphs inside them are not body paragraphs.
    let mut nested_depth = 0usize;
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"tbl" | b"txbxContent" => nested_depth += 1,
                b"p" if nested_depth == 0 && current.is_none() => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if nested_depth == 0 => {
                let qname = e.name();
                let name = local_name(qname.as_ref());
                if let Some(text) = current.as_mut() {
                    match name {
                        b"tab" => text.push('\t'),
                        b"br" | b"cr" => text.push('\n'),
                        _ => {}
                    }
                } else if name == b"p" {
                    paragraphs.push(String::new());
                }
            }
            Ok(Event::Text(e)) => {
                if in_text && nested_depth == 0 {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text && nested_depth == 0 {
                    if let Some(text) = current.as_mut() {
                        let entity = String::from_utf8_lossy(e.as_ref());
                        if let Some(resolved) = resolve_entity(&entity) {
                            text.push_str(&resolved);
                        }
                    }
                }
            }
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"tbl" | b"txbxContent" => nested_depth = nested_depth.saturating_sub(1),
                b"p" if nested_depth == 0 => {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed {DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    debug!("Read {} paragraphs from {}", paragraphs.len(), DOCUMENT_PART);
    Ok(paragraphs)
}

/// Strip a namespace prefix (`w:p` → `p`).
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve a predefined or numeric XML entity.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }
    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code).map(|c| c.to_string())
}

// ── Classification ───────────────────────────────────────────────────────

/// Whether a trimmed, non-empty paragraph reads as a heading.
pub fn is_heading(text: &str) -> bool {
    text.chars().count() < HEADING_MAX_CHARS && !text.contains(FULL_WIDTH_PERIOD)
}

/// Trim paragraphs, drop empty ones and classify the rest.
pub fn classify_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Vec<ExtractedBlock> {
    paragraphs
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(|text| ExtractedBlock {
            role: if is_heading(text) {
                BlockRole::Heading
            } else {
                BlockRole::Body
            },
            text: text.to_string(),
        })
        .collect()
}

/// Serialise blocks as Markdown: headings become `## text`, and every block
/// is followed by a blank line.
pub fn blocks_to_markdown(blocks: &[ExtractedBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        if block.role == BlockRole::Heading {
            out.push_str("## ");
        }
        out.push_str(&block.text);
        out.push_str("\n\n");
    }
    out
}

/// Extract classified blocks from a Word source.
pub fn extract(
    source: &SourceDocument,
    reader: &dyn ParagraphReader,
) -> Result<Vec<ExtractedBlock>, DocumentError> {
    let paragraphs = reader
        .read_paragraphs(&source.bytes)
        .map_err(|detail| DocumentError::UnreadableSource {
            path: source.path.clone(),
            detail,
        })?;
    let blocks = classify_paragraphs(&paragraphs);
    debug!(
        "{}: {} paragraphs → {} blocks ({} headings)",
        source.file_name(),
        paragraphs.len(),
        blocks.len(),
        blocks.iter().filter(|b| b.role == BlockRole::Heading).count()
    );
    Ok(blocks)
}
