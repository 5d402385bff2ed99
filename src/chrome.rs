//! Static page assets (CSS and client script) used by the template renderer.
//!
//! Keeping the stylesheet and script text here, away from the assembly logic
//! in [`crate::pipeline::template`], means the renderer reads as structure
//! only and tests can assert against the constants directly.
//!
//! Colours are never written literally: every rule refers to the CSS custom
//! properties (`--primary`, `--accent`, …) that the renderer emits from the
//! resolved [`StyleConfig`](crate::pipeline::theme::StyleConfig).

/// Debounce applied to search input before filtering headings.
pub const SEARCH_DEBOUNCE_MS: u32 = 250;

/// Queries shorter than this (in characters) clear the result list.
pub const SEARCH_MIN_QUERY_CHARS: u32 = 2;

/// Below this viewport width the sidebar collapses behind a toggle.
pub const SIDEBAR_BREAKPOINT_PX: u32 = 1024;

/// Navbar height compensated for when scrolling to an anchor.
pub const SCROLL_OFFSET_PX: u32 = 80;

/// Scroll distance after which the back-to-top button appears.
pub const BACK_TO_TOP_AFTER_PX: u32 = 300;

/// `localStorage` key holding the reader's light/dark choice.
pub const THEME_STORAGE_KEY: &str = "docrender-theme";

/// Typography, tables, code and placeholder blocks shared by both modes.
pub const BASE_CSS: &str = r#"
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", "PingFang SC", "Microsoft YaHei", Roboto, sans-serif;
    font-size: 16px;
    line-height: 1.75;
    color: var(--text);
    background: var(--bg);
}
.content h1, .content h2, .content h3, .content h4 { line-height: 1.3; color: var(--heading); }
.content h2 { border-bottom: 2px solid var(--primary-light); padding-bottom: .3em; margin-top: 2em; }
.content h3 { color: var(--primary-dark); }
.content a { color: var(--primary-dark); }
.content blockquote {
    margin: 1em 0;
    padding: .5em 1em;
    border-left: 4px solid var(--primary);
    background: var(--surface);
}
.content code {
    font-family: "JetBrains Mono", "Fira Code", Consolas, monospace;
    font-size: .9em;
    background: var(--surface);
    padding: .1em .35em;
    border-radius: 4px;
}
.content pre { position: relative; background: var(--code-bg); color: var(--code-text); padding: 1em; border-radius: 8px; overflow-x: auto; }
.content pre code { background: none; padding: 0; color: inherit; }
.content table { border-collapse: collapse; width: 100%; margin: 1em 0; }
.content th, .content td { border: 1px solid var(--border); padding: .5em .75em; text-align: left; }
.content th { background: var(--primary); color: #fff; }
.content tr:nth-child(even) td { background: var(--surface); }
.content img { max-width: 100%; }
.content del { opacity: .6; }
.content .footnote-definition { font-size: .9em; color: var(--muted); }
.image-placeholder {
    margin: 1.5em 0;
    padding: 1.5em;
    border: 2px dashed var(--primary-light);
    border-radius: 12px;
    background: var(--surface);
    text-align: center;
}
.image-placeholder .image-icon { font-size: 2.5em; }
.image-placeholder .image-title { font-weight: 700; color: var(--primary-dark); margin-top: .5em; }
.image-placeholder .image-desc { color: var(--muted); font-size: .95em; margin-top: .5em; }
.doc-meta { color: var(--muted); font-size: .9em; }
.highlight { background: var(--gold); color: #000; border-radius: 3px; }
"#;

/// Print-mode layout: page box, page breaks, no decoration.
pub const PRINT_CSS: &str = r#"
@page {
    size: A4;
    margin: 2cm 1.8cm;
    @bottom-center { content: counter(page) " / " counter(pages); font-size: 9pt; color: #888; }
}
body { background: #fff; font-size: 11pt; }
.print-header { border-bottom: 3px solid var(--primary); margin-bottom: 1.5em; padding-bottom: .5em; }
.print-header h1 { margin: 0; color: var(--primary-dark); }
.content { max-width: none; }
.content h2, .content h3 { page-break-after: avoid; break-after: avoid; }
.content pre, .content table, .image-placeholder { page-break-inside: avoid; break-inside: avoid; }
"#;

/// Interactive-mode chrome: navbar, progress bar, sidebar, search, buttons.
pub const INTERACTIVE_CSS: &str = r#"
html { scroll-behavior: smooth; }
body.dark {
    --text: #e2e8f0;
    --heading: #f8fafc;
    --bg: #0f172a;
    --surface: #1e293b;
    --border: #334155;
    --muted: #94a3b8;
}
.loader {
    position: fixed; inset: 0; z-index: 1000;
    display: flex; align-items: center; justify-content: center;
    background: var(--bg);
    transition: opacity .4s;
}
.loader.hidden { opacity: 0; pointer-events: none; }
.loader .spinner {
    width: 48px; height: 48px;
    border: 4px solid var(--primary-light);
    border-top-color: var(--primary);
    border-radius: 50%;
    animation: spin 1s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
.progress-bar {
    position: fixed; top: 0; left: 0; height: 3px; width: 0; z-index: 200;
    background: linear-gradient(90deg, var(--primary), var(--accent));
}
.navbar {
    position: fixed; top: 0; left: 0; right: 0; height: 60px; z-index: 100;
    display: flex; align-items: center; justify-content: space-between;
    padding: 0 1.5em;
    background: var(--primary-dark);
    color: #fff;
    box-shadow: 0 2px 12px rgba(0,0,0,.15);
}
.navbar .brand { font-weight: 700; font-size: 1.1em; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
.navbar .actions button {
    margin-left: .5em; padding: .4em .8em;
    border: 1px solid rgba(255,255,255,.4); border-radius: 6px;
    background: transparent; color: #fff; cursor: pointer;
}
.navbar .actions button:hover { background: rgba(255,255,255,.15); }
.sidebar-toggle { display: none; }
.search-container {
    position: fixed; top: 70px; left: 50%; transform: translateX(-50%);
    width: min(600px, 90vw); z-index: 150;
    display: none;
    background: var(--bg); border: 1px solid var(--border); border-radius: 10px;
    box-shadow: 0 8px 30px rgba(0,0,0,.2);
}
.search-container.open { display: block; }
.search-container input { width: 100%; padding: .8em 1em; border: none; border-radius: 10px; font-size: 1em; background: transparent; color: var(--text); }
.search-results { max-height: 50vh; overflow-y: auto; }
.search-results a { display: block; padding: .5em 1em; color: var(--text); text-decoration: none; border-top: 1px solid var(--border); }
.search-results a:hover { background: var(--surface); }
.layout { display: flex; padding-top: 60px; }
.sidebar {
    position: fixed; top: 60px; bottom: 0; left: 0; width: 280px;
    overflow-y: auto; padding: 1.5em 1em;
    background: var(--surface); border-right: 1px solid var(--border);
}
.sidebar h2 { font-size: .85em; text-transform: uppercase; letter-spacing: .08em; color: var(--muted); margin-top: 0; }
.toc, .toc ul { list-style: none; margin: 0; padding: 0; }
.toc ul { padding-left: 1em; }
.toc a { display: block; padding: .25em .5em; border-radius: 4px; color: var(--text); text-decoration: none; font-size: .92em; }
.toc a:hover, .toc a.active { background: var(--primary-light); color: #000; }
.main { margin-left: 280px; flex: 1; min-width: 0; }
.content { max-width: 900px; margin: 0 auto; padding: 2em 2.5em 4em; }
.doc-header { margin-bottom: 2em; }
.doc-header h1 { margin-bottom: .2em; color: var(--primary-dark); }
.copy-button {
    position: absolute; top: .5em; right: .5em;
    padding: .2em .6em; font-size: .8em;
    border: none; border-radius: 4px;
    background: var(--primary); color: #fff; cursor: pointer;
    opacity: .8;
}
.copy-button:hover { opacity: 1; }
.back-to-top {
    position: fixed; right: 2em; bottom: 2em;
    width: 44px; height: 44px; border: none; border-radius: 50%;
    background: var(--primary); color: #fff; font-size: 1.2em; cursor: pointer;
    opacity: 0; pointer-events: none; transition: opacity .3s;
}
.back-to-top.visible { opacity: 1; pointer-events: auto; }
@media (max-width: 1024px) {
    .sidebar { transform: translateX(-100%); transition: transform .3s; z-index: 90; }
    .sidebar.open { transform: none; }
    .sidebar-toggle { display: inline-block; }
    .main { margin-left: 0; }
    .content { padding: 1.5em 1.2em 3em; }
}
@media print {
    .loader, .progress-bar, .navbar, .sidebar, .search-container, .back-to-top, .copy-button { display: none !important; }
    .layout { padding-top: 0; }
    .main { margin-left: 0; }
}
"#;

/// Static gradient background (cyan theme).
pub const GRADIENT_CSS: &str = r#"
body:not(.dark) {
    background: linear-gradient(135deg, var(--bg) 0%, var(--surface) 50%, var(--bg) 100%);
    background-attachment: fixed;
}
"#;

/// Animated starfield background (moon theme).
pub const STARFIELD_CSS: &str = r#"
body::before {
    content: "";
    position: fixed; inset: 0; z-index: -1; pointer-events: none;
    background-image:
        radial-gradient(1px 1px at 20px 30px, var(--primary-light), transparent),
        radial-gradient(1px 1px at 90px 120px, var(--accent), transparent),
        radial-gradient(1.5px 1.5px at 160px 60px, var(--gold), transparent),
        radial-gradient(1px 1px at 230px 180px, var(--secondary), transparent);
    background-size: 260px 220px;
    opacity: .35;
    animation: twinkle 6s ease-in-out infinite alternate;
}
@keyframes twinkle { from { opacity: .2; } to { opacity: .45; } }
"#;

/// Client behaviour. Expects a `DOCRENDER` settings object defined before it.
pub const INTERACTIVE_JS: &str = r##"
(function () {
    'use strict';
    const cfg = window.DOCRENDER;
    const body = document.body;

    // Theme toggle
    const stored = localStorage.getItem(cfg.themeKey);
    if (stored === 'dark') body.classList.add('dark');
    document.getElementById('theme-toggle').addEventListener('click', function () {
        body.classList.toggle('dark');
        localStorage.setItem(cfg.themeKey, body.classList.contains('dark') ? 'dark' : 'light');
    });

    document.getElementById('print-button').addEventListener('click', function () { window.print(); });

    // Loader
    window.addEventListener('load', function () {
        document.getElementById('loader').classList.add('hidden');
    });

    // Sidebar
    const sidebar = document.getElementById('sidebar');
    document.getElementById('sidebar-toggle').addEventListener('click', function () {
        sidebar.classList.toggle('open');
    });

    // Smooth anchor scrolling with navbar offset
    function scrollToId(id) {
        const target = document.getElementById(id);
        if (!target) return;
        const top = target.getBoundingClientRect().top + window.pageYOffset - cfg.scrollOffset;
        window.scrollTo({ top: top, behavior: 'smooth' });
        if (window.innerWidth <= cfg.breakpoint) sidebar.classList.remove('open');
    }
    document.querySelectorAll('a[href^="#"]').forEach(function (link) {
        link.addEventListener('click', function (e) {
            const id = decodeURIComponent(link.getAttribute('href').slice(1));
            if (!id) return;
            e.preventDefault();
            scrollToId(id);
        });
    });

    // Reading progress, back-to-top, active TOC entry
    const progress = document.getElementById('progress-bar');
    const backToTop = document.getElementById('back-to-top');
    const tocLinks = Array.from(document.querySelectorAll('.toc a'));
    const headings = tocLinks
        .map(function (a) { return document.getElementById(decodeURIComponent(a.getAttribute('href').slice(1))); })
        .filter(Boolean);
    function onScroll() {
        const max = document.documentElement.scrollHeight - window.innerHeight;
        const ratio = max > 0 ? window.pageYOffset / max : 0;
        progress.style.width = (ratio * 100) + '%';
        backToTop.classList.toggle('visible', window.pageYOffset > cfg.backToTopAfter);
        let current = null;
        headings.forEach(function (h) {
            if (h.getBoundingClientRect().top - cfg.scrollOffset - 10 <= 0) current = h.id;
        });
        tocLinks.forEach(function (a) {
            a.classList.toggle('active', current !== null && a.getAttribute('href') === '#' + encodeURIComponent(current));
        });
    }
    window.addEventListener('scroll', onScroll, { passive: true });
    backToTop.addEventListener('click', function () { window.scrollTo({ top: 0, behavior: 'smooth' }); });
    onScroll();

    // Copy buttons on code blocks
    document.querySelectorAll('.content pre').forEach(function (pre) {
        const button = document.createElement('button');
        button.className = 'copy-button';
        button.type = 'button';
        button.textContent = 'Copy';
        button.addEventListener('click', function () {
            const code = pre.querySelector('code') || pre;
            navigator.clipboard.writeText(code.innerText).then(function () {
                button.textContent = 'Copied';
                setTimeout(function () { button.textContent = 'Copy'; }, 1500);
            });
        });
        pre.appendChild(button);
    });

    // Heading search
    const searchBox = document.getElementById('search-container');
    const input = document.getElementById('search-input');
    const results = document.getElementById('search-results');
    const searchable = Array.from(document.querySelectorAll('.content h2, .content h3, .content h4'));
    function openSearch() { searchBox.classList.add('open'); input.focus(); }
    function closeSearch() { searchBox.classList.remove('open'); input.value = ''; results.innerHTML = ''; }
    function runSearch() {
        const q = input.value.trim().toLowerCase();
        results.innerHTML = '';
        if (q.length < cfg.minQuery) return;
        searchable
            .filter(function (h) { return h.id && h.textContent.toLowerCase().includes(q); })
            .forEach(function (h) {
                const a = document.createElement('a');
                a.href = '#' + encodeURIComponent(h.id);
                a.textContent = h.textContent;
                a.addEventListener('click', function (e) {
                    e.preventDefault();
                    closeSearch();
                    scrollToId(h.id);
                });
                results.appendChild(a);
            });
    }
    let timer = null;
    input.addEventListener('input', function () {
        clearTimeout(timer);
        timer = setTimeout(runSearch, cfg.debounceMs);
    });
    document.getElementById('search-toggle').addEventListener('click', function () {
        searchBox.classList.contains('open') ? closeSearch() : openSearch();
    });

    // Keyboard shortcuts
    document.addEventListener('keydown', function (e) {
        if ((e.ctrlKey || e.metaKey) && e.key.toLowerCase() === 'k') {
            e.preventDefault();
            openSearch();
        } else if (e.key === 'Escape') {
            closeSearch();
            sidebar.classList.remove('open');
        }
    });
})();
"##;
