//! Template rendering: Markdown + metadata + style → a complete HTML page.
//!
//! ## Two modes, one renderer
//!
//! [`RenderMode::Print`] produces a quiet, script-free page meant to be fed
//! to an HTML-to-PDF engine or printed from a browser. [`RenderMode::Interactive`]
//! wraps the same body in reading chrome: navbar, progress bar, sidebar table
//! of contents, heading search, copy buttons and a light/dark toggle.
//!
//! Both modes share the body HTML, the palette block and the base stylesheet;
//! only the shell differs. The shell is pure string assembly over its inputs
//! (no clock, no randomness, no environment), so identical requests always
//! produce identical bytes.

use crate::chrome;
use crate::pipeline::markdown::{self, MarkdownExtensions, RenderedBody};
use crate::pipeline::metadata::{DocumentMetadata, DATE_UNSPECIFIED};
use crate::pipeline::theme::{BackgroundEffect, StyleConfig};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// MIME type of every rendered page.
pub const HTML_MIME: &str = "text/html; charset=utf-8";

/// Title shown when a document has no derivable theme.
pub const UNTITLED_DISPLAY: &str = "Untitled";

/// Which shell wraps the rendered body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Script-free page with print CSS.
    Print,
    /// Single-page reader with navigation chrome. (default)
    #[default]
    Interactive,
}

/// Everything needed to render one page.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Normalised Markdown source.
    pub source_markdown: String,
    pub metadata: DocumentMetadata,
    pub style: StyleConfig,
    pub mode: RenderMode,
    pub extensions: MarkdownExtensions,
}

/// A complete page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub content: String,
    pub mime_type: &'static str,
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render Markdown to a body fragment plus heading outline.
pub fn render_body(markdown: &str, extensions: &MarkdownExtensions) -> RenderedBody {
    markdown::to_html(markdown, extensions)
}

/// Full pipeline for one request: body, then shell.
pub fn render(request: &RenderRequest) -> RenderedDocument {
    let body = render_body(&request.source_markdown, &request.extensions);
    render_shell(&body, &request.metadata, &request.style, request.mode)
}

/// Wrap an already rendered body in the page shell for `mode`.
pub fn render_shell(
    body: &RenderedBody,
    metadata: &DocumentMetadata,
    style: &StyleConfig,
    mode: RenderMode,
) -> RenderedDocument {
    let content = match mode {
        RenderMode::Print => print_shell(body, metadata, style),
        RenderMode::Interactive => interactive_shell(body, metadata, style),
    };
    RenderedDocument {
        content,
        mime_type: HTML_MIME,
    }
}

// ── Shared pieces ────────────────────────────────────────────────────────────

fn display_title(metadata: &DocumentMetadata) -> String {
    escape_html(metadata.display_theme().unwrap_or(UNTITLED_DISPLAY))
}

fn display_date(metadata: &DocumentMetadata) -> Option<String> {
    if metadata.date.is_empty() || metadata.date == DATE_UNSPECIFIED {
        None
    } else {
        Some(escape_html(&metadata.date))
    }
}

/// `:root` block binding the palette to the custom properties the
/// stylesheets reference.
fn palette_css(style: &StyleConfig) -> String {
    format!(
        r#":root {{
    --primary: {primary};
    --primary-dark: {dark};
    --primary-light: {light};
    --secondary: {secondary};
    --accent: {accent};
    --gold: {gold};
    --text: #1f2937;
    --heading: #111827;
    --bg: #ffffff;
    --surface: #f8fafc;
    --border: #e2e8f0;
    --muted: #6b7280;
    --code-bg: #1e293b;
    --code-text: #e2e8f0;
}}"#,
        primary = style.primary_color,
        dark = style.primary_dark,
        light = style.primary_light,
        secondary = style.secondary_color,
        accent = style.accent_color,
        gold = style.gold_color,
    )
}

fn head(title: &str, style: &StyleConfig, css: &[&str]) -> String {
    let mut head = String::new();
    head.push_str("<head>\n<meta charset=\"UTF-8\">\n");
    head.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    head.push_str("<meta name=\"generator\" content=\"docrender\">\n");
    let _ = writeln!(head, "<title>{} · {}</title>", title, style.theme_name);
    head.push_str("<style>\n");
    head.push_str(&palette_css(style));
    for sheet in css {
        head.push_str(sheet);
    }
    head.push_str("</style>\n</head>\n");
    head
}

// ── Print ────────────────────────────────────────────────────────────────────

fn print_shell(body: &RenderedBody, metadata: &DocumentMetadata, style: &StyleConfig) -> String {
    let title = display_title(metadata);
    let mut page = String::with_capacity(body.html.len() + 8 * 1024);
    page.push_str("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n");
    page.push_str(&head(&title, style, &[chrome::BASE_CSS, chrome::PRINT_CSS]));
    page.push_str("<body class=\"print\">\n<header class=\"print-header\">\n");
    let _ = writeln!(page, "<h1>{}</h1>", title);
    if let Some(date) = display_date(metadata) {
        let _ = writeln!(page, "<p class=\"doc-meta\">{}</p>", date);
    }
    page.push_str("</header>\n<main class=\"content\">\n");
    page.push_str(&body.html);
    page.push_str("</main>\n</body>\n</html>\n");
    page
}

// ── Interactive ──────────────────────────────────────────────────────────────

/// Sidebar list: h2 entries with their h3 children nested below them.
/// An h3 that precedes every h2 is listed at the top level.
fn toc_html(body: &RenderedBody) -> String {
    let mut toc = String::from("<ul class=\"toc\">\n");
    let mut item_open = false;
    let mut sub_open = false;

    for entry in body.outline_levels(2, 3) {
        let link = format!(
            "<a href=\"#{}\">{}</a>",
            escape_html(&entry.id),
            escape_html(&entry.text)
        );
        if entry.level == 3 && item_open {
            if !sub_open {
                toc.push_str("<ul>\n");
                sub_open = true;
            }
            let _ = writeln!(toc, "<li>{}</li>", link);
            continue;
        }
        if sub_open {
            toc.push_str("</ul>\n");
            sub_open = false;
        }
        if item_open {
            toc.push_str("</li>\n");
            item_open = false;
        }
        if entry.level == 2 {
            let _ = write!(toc, "<li>{}\n", link);
            item_open = true;
        } else {
            let _ = writeln!(toc, "<li>{}</li>", link);
        }
    }
    if sub_open {
        toc.push_str("</ul>\n");
    }
    if item_open {
        toc.push_str("</li>\n");
    }
    toc.push_str("</ul>\n");
    toc
}

/// Settings object read by [`chrome::INTERACTIVE_JS`].
fn script_settings() -> String {
    let settings = serde_json::json!({
        "debounceMs": chrome::SEARCH_DEBOUNCE_MS,
        "minQuery": chrome::SEARCH_MIN_QUERY_CHARS,
        "breakpoint": chrome::SIDEBAR_BREAKPOINT_PX,
        "scrollOffset": chrome::SCROLL_OFFSET_PX,
        "backToTopAfter": chrome::BACK_TO_TOP_AFTER_PX,
        "themeKey": chrome::THEME_STORAGE_KEY,
    });
    format!("window.DOCRENDER = {};", settings)
}

fn interactive_shell(
    body: &RenderedBody,
    metadata: &DocumentMetadata,
    style: &StyleConfig,
) -> String {
    let title = display_title(metadata);
    let background = match style.background {
        BackgroundEffect::Starfield => chrome::STARFIELD_CSS,
        BackgroundEffect::Gradient => chrome::GRADIENT_CSS,
    };

    let mut page = String::with_capacity(body.html.len() + 24 * 1024);
    page.push_str("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n");
    page.push_str(&head(
        &title,
        style,
        &[chrome::BASE_CSS, chrome::INTERACTIVE_CSS, background],
    ));
    page.push_str("<body class=\"interactive\">\n");
    page.push_str("<div class=\"loader\" id=\"loader\"><div class=\"spinner\"></div></div>\n");
    page.push_str("<div class=\"progress-bar\" id=\"progress-bar\"></div>\n");

    page.push_str("<nav class=\"navbar\">\n");
    let _ = writeln!(
        page,
        "<div class=\"brand\"><button type=\"button\" class=\"sidebar-toggle\" id=\"sidebar-toggle\" aria-label=\"Contents\">☰</button> {} {}</div>",
        style.brand_glyph, title
    );
    page.push_str("<div class=\"actions\">\n");
    page.push_str("<button type=\"button\" id=\"search-toggle\" title=\"Search (Ctrl+K)\">🔍</button>\n");
    page.push_str("<button type=\"button\" id=\"theme-toggle\" title=\"Toggle theme\">🌓</button>\n");
    page.push_str("<button type=\"button\" id=\"print-button\" title=\"Print\">🖨️</button>\n");
    page.push_str("</div>\n</nav>\n");

    page.push_str("<div class=\"search-container\" id=\"search-container\">\n");
    page.push_str("<input type=\"search\" id=\"search-input\" placeholder=\"Search headings…\" autocomplete=\"off\">\n");
    page.push_str("<div class=\"search-results\" id=\"search-results\"></div>\n</div>\n");

    page.push_str("<div class=\"layout\">\n<aside class=\"sidebar\" id=\"sidebar\">\n<h2>Contents</h2>\n");
    page.push_str(&toc_html(body));
    page.push_str("</aside>\n<main class=\"main\">\n<article class=\"content\">\n");
    page.push_str("<header class=\"doc-header\">\n");
    let _ = writeln!(page, "<h1>{}</h1>", title);
    if let Some(date) = display_date(metadata) {
        let _ = writeln!(page, "<p class=\"doc-meta\">{}</p>", date);
    }
    page.push_str("</header>\n");
    page.push_str(&body.html);
    page.push_str("</article>\n</main>\n</div>\n");
    page.push_str("<button type=\"button\" class=\"back-to-top\" id=\"back-to-top\" aria-label=\"Back to top\">↑</button>\n");

    page.push_str("<script>\n");
    page.push_str(&script_settings());
    page.push_str(chrome::INTERACTIVE_JS);
    page.push_str("</script>\n</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::theme::{resolve, ThemeId};

    fn meta(theme: &str, date: &str) -> DocumentMetadata {
        DocumentMetadata {
            theme: theme.into(),
            date: date.into(),
            source_name: "notes.md".into(),
        }
    }

    fn request(md: &str, mode: RenderMode, theme: ThemeId) -> RenderRequest {
        RenderRequest {
            source_markdown: md.into(),
            metadata: meta("Weekly Notes", "2025-09-16"),
            style: resolve(theme),
            mode,
            extensions: MarkdownExtensions::default(),
        }
    }

    const DOC: &str = "## Plan\n\nSome text.\n\n### Step one\n\n### Step two\n\n## Risks\n\n```sh\nls\n```\n";

    #[test]
    fn render_is_deterministic() {
        for mode in [RenderMode::Print, RenderMode::Interactive] {
            let a = render(&request(DOC, mode, ThemeId::Moon));
            let b = render(&request(DOC, mode, ThemeId::Moon));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn print_mode_has_no_script_and_has_page_css() {
        let doc = render(&request(DOC, RenderMode::Print, ThemeId::Cyan));
        assert_eq!(doc.mime_type, HTML_MIME);
        assert!(!doc.content.contains("<script"));
        assert!(doc.content.contains("@page"));
        assert!(doc.content.contains("<h1>Weekly Notes</h1>"));
        assert!(doc.content.contains("2025-09-16"));
    }

    #[test]
    fn interactive_mode_has_full_chrome() {
        let html = render(&request(DOC, RenderMode::Interactive, ThemeId::Cyan)).content;
        for id in [
            "id=\"loader\"",
            "id=\"progress-bar\"",
            "id=\"search-toggle\"",
            "id=\"theme-toggle\"",
            "id=\"print-button\"",
            "id=\"search-input\"",
            "id=\"sidebar\"",
            "id=\"back-to-top\"",
        ] {
            assert!(html.contains(id), "missing {id}");
        }
        assert!(html.contains("\"debounceMs\":250"));
        assert!(html.contains("📄 Weekly Notes"));
    }

    #[test]
    fn toc_nests_h3_under_h2() {
        let body = render_body(DOC, &MarkdownExtensions::default());
        let toc = toc_html(&body);
        assert_eq!(
            toc,
            "<ul class=\"toc\">\n\
             <li><a href=\"#plan\">Plan</a>\n\
             <ul>\n\
             <li><a href=\"#step-one\">Step one</a></li>\n\
             <li><a href=\"#step-two\">Step two</a></li>\n\
             </ul>\n\
             </li>\n\
             <li><a href=\"#risks\">Risks</a>\n\
             </li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn leading_h3_is_top_level() {
        let body = render_body("### Orphan\n\n## Parent\n", &MarkdownExtensions::default());
        let toc = toc_html(&body);
        assert!(toc.starts_with("<ul class=\"toc\">\n<li><a href=\"#orphan\">Orphan</a></li>\n<li>"));
    }

    #[test]
    fn empty_body_still_renders_valid_shell() {
        for mode in [RenderMode::Print, RenderMode::Interactive] {
            let html = render(&request("", mode, ThemeId::Cyan)).content;
            assert!(html.starts_with("<!DOCTYPE html>"));
            assert!(html.trim_end().ends_with("</html>"));
        }
        let html = render(&request("", RenderMode::Interactive, ThemeId::Cyan)).content;
        assert!(html.contains("<ul class=\"toc\">\n</ul>"));
    }

    #[test]
    fn title_is_escaped_and_untitled_fallback() {
        let mut req = request("x", RenderMode::Print, ThemeId::Cyan);
        req.metadata = meta("<b>A & B</b>", DATE_UNSPECIFIED);
        let html = render(&req).content;
        assert!(html.contains("<h1>&lt;b&gt;A &amp; B&lt;/b&gt;</h1>"));
        assert!(!html.contains(DATE_UNSPECIFIED));

        req.metadata = meta("", DATE_UNSPECIFIED);
        assert!(render(&req).content.contains("<h1>Untitled</h1>"));
    }

    #[test]
    fn palette_and_background_follow_style() {
        let moon = render(&request(DOC, RenderMode::Interactive, ThemeId::Moon)).content;
        assert!(moon.contains("--primary: #6366f1;"));
        assert!(moon.contains("@keyframes twinkle"));
        assert!(moon.contains("Moonlight"));

        let cyan = render(&request(DOC, RenderMode::Interactive, ThemeId::Cyan)).content;
        assert!(cyan.contains("--primary: #00bcd4;"));
        assert!(!cyan.contains("@keyframes twinkle"));
    }

    #[test]
    fn escape_html_covers_attribute_quotes() {
        assert_eq!(escape_html("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
