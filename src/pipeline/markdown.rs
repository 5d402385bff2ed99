//! Markdown engine adapter: Markdown text → HTML fragment + heading outline.
//!
//! pulldown-cmark does the parsing; this module only fixes the extension set
//! and rewrites the event stream in two places:
//!
//! - headings get unique slug ids (`intro`, `intro-2`, …) and are recorded in
//!   the outline the template uses to build its table of contents;
//! - soft breaks become hard breaks when `break_on_newline` is on, so a single
//!   newline in the source is a line break in the page, as notes expect.
//!
//! Every render uses the same [`MarkdownExtensions`] value taken from the
//! configuration, so two runs over the same text produce the same bytes.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Extension flags passed to the Markdown engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownExtensions {
    pub tables: bool,
    /// When off, fenced blocks render without a `language-*` class.
    pub fenced_code_blocks: bool,
    pub header_ids: bool,
    pub strike: bool,
    pub task_list: bool,
    pub break_on_newline: bool,
    pub footnotes: bool,
}

impl Default for MarkdownExtensions {
    fn default() -> Self {
        Self {
            tables: true,
            fenced_code_blocks: true,
            header_ids: true,
            strike: true,
            task_list: true,
            break_on_newline: true,
            footnotes: true,
        }
    }
}

impl MarkdownExtensions {
    /// Parser options for the enabled extensions.
    pub fn options(&self) -> Options {
        let mut options = Options::empty();
        if self.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.strike {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_list {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if self.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        options
    }
}

/// One heading of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    /// 1–6.
    pub level: u8,
    /// Anchor id assigned to the heading element.
    pub id: String,
    /// Plain heading text (inline markup dropped).
    pub text: String,
}

/// HTML fragment and outline produced from one Markdown source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderedBody {
    pub html: String,
    /// Every heading, in document order. Empty when `header_ids` is off,
    /// since there would be nothing to link to.
    pub outline: Vec<HeadingEntry>,
}

impl RenderedBody {
    /// Headings at `min..=max` levels.
    pub fn outline_levels(&self, min: u8, max: u8) -> impl Iterator<Item = &HeadingEntry> {
        self.outline
            .iter()
            .filter(move |h| h.level >= min && h.level <= max)
    }
}

/// Convert Markdown to an HTML fragment with the given extensions.
pub fn to_html(markdown: &str, ext: &MarkdownExtensions) -> RenderedBody {
    let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, ext.options()).collect();
    let mut outline = Vec::new();

    if ext.header_ids {
        let mut used = HashSet::new();
        let mut i = 0;
        while i < events.len() {
            if let Event::Start(Tag::Heading { level, .. }) = &events[i] {
                let level = *level;
                let text = heading_text(&events[i + 1..]);
                let id = unique_slug(&text, &mut used);
                if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[i] {
                    *slot = Some(CowStr::from(id.clone()));
                }
                outline.push(HeadingEntry {
                    level: heading_level_to_num(level),
                    id,
                    text,
                });
            }
            i += 1;
        }
    }

    let events = events.into_iter().map(|event| match event {
        Event::SoftBreak if ext.break_on_newline => Event::HardBreak,
        Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) if !ext.fenced_code_blocks => {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Indented))
        }
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    RenderedBody { html: out, outline }
}

/// Concatenate the text events up to the end of the current heading.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

// ── Slugs ────────────────────────────────────────────────────────────────────

/// Anchor slug: lowercase, letters and digits of any script kept, runs of
/// anything else collapsed to a single `-`. Empty input yields `section`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// Slug not yet in `used`; repeats get `-2`, `-3`, … suffixes.
fn unique_slug(text: &str, used: &mut HashSet<String>) -> String {
    let base = slugify(text);
    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate) {
        candidate = format!("{base}-{n}");
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(md: &str) -> RenderedBody {
        to_html(md, &MarkdownExtensions::default())
    }

    #[test]
    fn default_options_enable_all_extensions() {
        let options = MarkdownExtensions::default().options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_STRIKETHROUGH));
        assert!(options.contains(Options::ENABLE_TASKLISTS));
        assert!(options.contains(Options::ENABLE_FOOTNOTES));
    }

    #[test]
    fn headings_get_ids_and_outline() {
        let body = render("# Title\n\n## Intro\n\ntext\n\n### Details\n");
        assert!(body.html.contains("<h2 id=\"intro\">Intro</h2>"), "got: {}", body.html);
        assert!(body.html.contains("<h3 id=\"details\">Details</h3>"));
        let levels: Vec<u8> = body.outline.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(body.outline_levels(2, 3).count(), 2);
    }

    #[test]
    fn duplicate_headings_get_suffixes() {
        let body = render("## Notes\n\n## Notes\n\n## Notes\n");
        let ids: Vec<&str> = body.outline.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "notes-2", "notes-3"]);
    }

    #[test]
    fn header_ids_off_leaves_headings_bare() {
        let ext = MarkdownExtensions {
            header_ids: false,
            ..Default::default()
        };
        let body = to_html("## Intro\n", &ext);
        assert!(body.html.contains("<h2>Intro</h2>"));
        assert!(body.outline.is_empty());
    }

    #[test]
    fn newline_becomes_line_break() {
        let body = render("line one\nline two\n");
        assert!(body.html.contains("line one<br />"), "got: {}", body.html);

        let ext = MarkdownExtensions {
            break_on_newline: false,
            ..Default::default()
        };
        assert!(!to_html("line one\nline two\n", &ext).html.contains("<br"));
    }

    #[test]
    fn tables_strike_and_tasks() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done\n";
        let html = render(md).html;
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn fenced_code_language_class_follows_flag() {
        let md = "```rust\nfn main() {}\n```\n";
        assert!(render(md).html.contains("language-rust"));
        let ext = MarkdownExtensions {
            fenced_code_blocks: false,
            ..Default::default()
        };
        let html = to_html(md, &ext).html;
        assert!(html.contains("<pre><code>"));
        assert!(!html.contains("language-rust"));
    }

    #[test]
    fn slugify_keeps_cjk_and_collapses_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("项目 复盘"), "项目-复盘");
        assert_eq!(slugify("  --  "), "section");
        assert_eq!(slugify("v2.0 release"), "v2-0-release");
    }

    #[test]
    fn heading_text_includes_inline_code() {
        let body = render("## Using `cargo`\n");
        assert_eq!(body.outline[0].text, "Using cargo");
        assert_eq!(body.outline[0].id, "using-cargo");
    }
}
