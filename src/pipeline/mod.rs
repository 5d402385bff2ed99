//! Pipeline stages for document rendering.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. another PDF engine) without touching the
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ metadata ──▶ normalize ──▶ template ──▶ pdf
//! (paths)   (.docx)     (title/date)  (placeholders) (HTML)    (optional)
//!                                          │
//!                                       markdown + theme
//! ```
//!
//! 1. [`input`]     — enumerate documents in a stable order, resolve the output target
//! 2. [`extract`]   — `.docx` paragraphs → heading/body blocks → Markdown
//! 3. [`metadata`]  — theme, date and a filesystem-safe output name
//! 4. [`normalize`] — rewrite image-placeholder blockquotes into HTML blocks
//! 5. [`markdown`]  — pulldown-cmark with a fixed extension set, heading ids
//! 6. [`theme`]     — theme identifier → complete palette
//! 7. [`template`]  — print or interactive page shell
//! 8. [`pdf`]       — external HTML-to-PDF engine; the only stage that
//!    spawns a process

pub mod extract;
pub mod input;
pub mod markdown;
pub mod metadata;
pub mod normalize;
pub mod pdf;
pub mod template;
pub mod theme;
