//! Markdown normalisation: rewrite image-placeholder blockquotes into styled
//! HTML blocks before the Markdown engine sees them.
//!
//! Research notes mark where a figure should go with a quoted block:
//!
//! ```text
//! > 📌 **图片位置: System architecture**
//! > Three services behind one gateway
//! > Arrows show request flow
//! ```
//!
//! Rendered as a plain blockquote this is easy to miss in print, so the run is
//! replaced by a `div.image-placeholder` block with an icon, a title and a
//! description. Any other blockquote passes through untouched.
//!
//! ## Idempotence
//!
//! The generated block contains no `> ` lines, so a second pass finds nothing
//! to rewrite: `normalize(normalize(x)) == normalize(x)`.

use crate::pipeline::template::escape_html;

/// Markers that identify a placeholder blockquote (matched on its first line).
pub const PLACEHOLDER_MARKERS: [&str; 2] = ["图片位置", "image placeholder"];

const QUOTE_PREFIX: &str = "> ";

/// Normalise line endings and rewrite placeholder blockquotes.
pub fn normalize(markdown: &str) -> String {
    let text = normalise_line_endings(markdown);
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut pad_next = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if line.starts_with(QUOTE_PREFIX) {
            // A blockquote is the maximal run of quoted lines; only its first
            // line decides whether it is a placeholder.
            let start = i;
            while i < lines.len() && lines[i].starts_with(QUOTE_PREFIX) {
                i += 1;
            }
            let run = &lines[start..i];
            if !is_placeholder_start(run[0]) {
                if pad_next {
                    out.push(String::new());
                }
                pad_next = false;
                out.extend(run.iter().map(|l| l.to_string()));
                continue;
            }
            if out.last().is_some_and(|l| !l.is_empty()) {
                out.push(String::new());
            }
            out.push(placeholder_html(run));
            pad_next = true;
            continue;
        }
        if pad_next && !line.is_empty() {
            out.push(String::new());
        }
        pad_next = false;
        out.push(line.to_string());
        i += 1;
    }

    out.join("\n")
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Placeholder blockquotes ──────────────────────────────────────────

fn is_placeholder_start(line: &str) -> bool {
    if !line.starts_with(QUOTE_PREFIX) {
        return false;
    }
    let lower = line.to_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
}

fn strip_quote(line: &str) -> &str {
    line.strip_prefix(QUOTE_PREFIX).unwrap_or(line)
}

/// Render one placeholder run (first line is the title) as an HTML block.
///
/// The block has no blank lines inside, so the Markdown engine treats it as a
/// single raw HTML block.
fn placeholder_html(run: &[&str]) -> String {
    let title = run
        .first()
        .map(|l| strip_quote(l).replace("**", "").replace('📌', ""))
        .unwrap_or_default();
    let description: Vec<String> = run
        .iter()
        .skip(1)
        .map(|l| strip_quote(l).trim())
        .filter(|l| !l.is_empty())
        .map(escape_html)
        .collect();

    let mut html = String::from("<div class=\"image-placeholder\">\n");
    html.push_str("<div class=\"image-icon\">🖼️</div>\n");
    html.push_str(&format!(
        "<div class=\"image-title\">{}</div>\n",
        escape_html(title.trim())
    ));
    if !description.is_empty() {
        html.push_str(&format!(
            "<div class=\"image-desc\">{}</div>\n",
            description.join("<br>")
        ));
    }
    html.push_str("</div>");
    html
}
