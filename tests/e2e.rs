//! End-to-end integration tests for docrender.
//!
//! Everything here runs against temporary directories with generated
//! documents; PDF output uses an in-process fake engine. The one test that
//! shells out to a real HTML-to-PDF engine is gated behind `E2E_ENABLED`.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture
//!
//! Include the WeasyPrint test:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use docrender::{
    convert, convert_stream, inspect, ConversionConfig, ConversionProgressCallback, DocumentError,
    NoopProgressCallback, OutputFormat, PdfEngine, RenderError, RenderMode, ThemeId,
};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Minimal `.docx`: a zip holding only `word/document.xml`.
fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

fn write(dir: &Path, name: &str, bytes: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn read_string(path: &Path) -> String {
    String::from_utf8(std::fs::read(path).unwrap()).unwrap()
}

/// Engine that records the HTML it was given and returns a fixed PDF.
#[derive(Default)]
struct FakePdf {
    seen: Mutex<Vec<String>>,
}

impl PdfEngine for FakePdf {
    fn html_to_pdf(&self, html: &str) -> Result<Vec<u8>, String> {
        self.seen.lock().unwrap().push(html.to_string());
        Ok(b"%PDF-1.7\n%fake\n".to_vec())
    }
}

/// Skip unless E2E_ENABLED is set and `program` is on PATH.
macro_rules! e2e_skip_unless_ready {
    ($program:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let available = std::process::Command::new($program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !available {
            println!("SKIP — {} not found on PATH", $program);
            return;
        }
    }};
}

// ── Batch behaviour ──────────────────────────────────────────────────────────

#[test]
fn test_bad_document_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("notes");
    std::fs::create_dir(&src).unwrap();
    write(&src, "a-2025-01-01.md", "# Alpha\n\nfirst");
    write(&src, "b-2025-01-02.docx", b"this is not a zip");
    write(&src, "c-2025-01-03.md", "# Gamma\n\nthird");

    let out = dir.path().join("site");
    let output = convert(&src, &out, &ConversionConfig::default()).unwrap();

    assert_eq!(output.stats.summary(), "2/3");
    assert_eq!(output.stats.failed, 1);
    let failed: Vec<_> = output.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].index, 2);
    assert!(matches!(
        failed[0].error,
        Some(DocumentError::UnreadableSource { .. })
    ));
    assert_eq!(
        listing(&out),
        vec!["Alpha_2025-01-01.html", "Gamma_2025-01-03.html"]
    );
}

#[test]
fn test_unwritable_destination_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("notes");
    std::fs::create_dir(&src).unwrap();
    write(&src, "a.md", "# Alpha\n\nfirst");
    write(&src, "b.md", "# Beta\n\nsecond");

    // A directory already sits where the first page would be written.
    let out = dir.path().join("site");
    std::fs::create_dir_all(out.join("Alpha_unspecified.html")).unwrap();

    let output = convert(&src, &out, &ConversionConfig::default()).unwrap();

    assert_eq!(output.stats.summary(), "1/2");
    assert_eq!(output.documents[0].index, 1);
    assert!(
        matches!(
            output.documents[0].error,
            Some(DocumentError::WriteFailure { .. })
        ),
        "got: {:?}",
        output.documents[0].error
    );
    assert!(output.documents[1].is_success());
    assert!(out.join("Alpha_unspecified.html").is_dir());
    assert!(read_string(&out.join("Beta_unspecified.html")).contains("second"));
}

#[test]
fn test_word_document_with_text_box_keeps_outer_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "memo.docx",
        docx(&[
            "Status</w:t></w:r><w:r><w:drawing><w:txbxContent><w:p><w:r><w:t>Callout</w:t></w:r></w:p></w:txbxContent></w:drawing></w:r><w:r><w:t> update",
            "Everything shipped on time。",
        ]),
    );

    let config = ConversionConfig::builder()
        .format(OutputFormat::Markdown)
        .include_header(false)
        .build()
        .unwrap();
    let out = dir.path().join("out");
    convert(&input, &out, &config).unwrap();

    let text = read_string(&out.join("Status update_unspecified.md"));
    assert_eq!(text, "## Status update\n\nEverything shipped on time。\n\n");
}

#[test]
fn test_word_document_to_interactive_html() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "微信-2025-09-16.docx",
        docx(&[
            "季度复盘",
            "",
            "本季度完成了三个版本的发布，用户反馈整体积极。",
            "下一步计划",
            "继续优化首屏加载时间，目标降低百分之三十。",
        ]),
    );

    let config = ConversionConfig::builder()
        .theme(ThemeId::Moon)
        .mode(RenderMode::Interactive)
        .build()
        .unwrap();
    let out = dir.path().join("out");
    let output = convert(&input, &out, &config).unwrap();
    assert_eq!(output.stats.summary(), "1/1");

    let page = out.join("季度复盘_2025-09-16.html");
    let html = read_string(&page);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>季度复盘 · Moonlight</title>"));
    assert!(html.contains("<h2"));
    assert!(html.contains("下一步计划"));
    assert!(html.contains("<p>本季度完成了三个版本的发布，用户反馈整体积极。</p>"));

    let meta = output.documents[0].metadata.as_ref().unwrap();
    assert_eq!(meta.theme, "季度复盘");
    assert_eq!(meta.date, "2025-09-16");
}

#[test]
fn test_word_document_to_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chat_2024-12-31.docx", docx(&["Retro", "Went well."]));

    let config = ConversionConfig::builder()
        .format(OutputFormat::Markdown)
        .build()
        .unwrap();
    let out = dir.path().join("md");
    convert(&input, &out, &config).unwrap();

    let text = read_string(&out.join("Retro_2024-12-31.md"));
    assert!(text.starts_with("# Retro\n\n**Date**: 2024-12-31\n**Source**: chat_2024-12-31.docx\n"));
    assert!(text.contains("## Retro\n\n"));
    assert!(text.contains("## Went well.\n\n"));
}

#[test]
fn test_pdf_output_uses_print_html() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "plan-2025-05-05.md", "# Launch plan\n\n## Risks\n\nnone");

    let engine = Arc::new(FakePdf::default());
    let config = ConversionConfig::builder()
        .format(OutputFormat::Pdf)
        .mode(RenderMode::Print)
        .pdf_engine(engine.clone())
        .build()
        .unwrap();
    let out = dir.path().join("pdf");
    let output = convert(&input, &out, &config).unwrap();
    assert_eq!(output.stats.summary(), "1/1");

    let pdf = std::fs::read(out.join("Launch plan_2025-05-05.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    let seen = engine.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("@page"));
    assert!(!seen[0].contains("<script"));
}

#[test]
fn test_pdf_requires_print_mode() {
    let err = ConversionConfig::builder()
        .format(OutputFormat::Pdf)
        .mode(RenderMode::Interactive)
        .build()
        .unwrap_err();
    assert!(matches!(err, RenderError::InvalidConfig(_)));
}

// ── File names ───────────────────────────────────────────────────────────────

#[test]
fn test_output_name_never_escapes_directory() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "x.md", "a/b:c\\d\n\nbody");

    let out = dir.path().join("out");
    let output = convert(&input, &out, &ConversionConfig::default()).unwrap();
    let written = output.documents[0].output.clone().unwrap();

    assert_eq!(written.parent().unwrap(), out.as_path());
    let name = written.file_name().unwrap().to_string_lossy().into_owned();
    assert!(!name.contains('/'));
    assert!(!name.contains(':'));
    assert!(!name.contains('\\'));
    assert_eq!(listing(&out).len(), 1);
}

#[test]
fn test_untitled_and_undated_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "2025.md", "!!!\n\nonly punctuation above");

    let out = dir.path().join("out");
    convert(&input, &out, &ConversionConfig::default()).unwrap();
    assert_eq!(listing(&out), vec!["untitled_unspecified.html"]);
    assert!(read_string(&out.join("untitled_unspecified.html")).contains("<title>Untitled · Cyan</title>"));
}

#[test]
fn test_same_title_and_date_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir(&src).unwrap();
    write(&src, "one-2025-02-02.md", "# Standup\n\nfirst");
    write(&src, "two-2025-02-02.md", "# Standup\n\nsecond");

    let out = dir.path().join("out");
    let output = convert(&src, &out, &ConversionConfig::default()).unwrap();

    assert_eq!(output.stats.summary(), "2/2");
    assert_eq!(listing(&out), vec!["Standup_2025-02-02.html"]);
    // last in file-name order wins
    assert!(read_string(&out.join("Standup_2025-02-02.html")).contains("second"));
}

#[test]
fn test_explicit_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "notes.md", "# Notes\n\ntext");
    let target = dir.path().join("nested/custom.html");

    let output = convert(&input, &target, &ConversionConfig::default()).unwrap();
    assert_eq!(output.documents[0].output.as_deref(), Some(target.as_path()));
    assert!(target.is_file());
}

#[test]
fn test_explicit_output_file_rejected_for_directory_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = convert(dir.path(), dir.path().join("one.html"), &ConversionConfig::default())
        .unwrap_err();
    assert!(matches!(err, RenderError::InvalidOutput { .. }));
}

// ── Fatal errors and edge cases ──────────────────────────────────────────────

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = convert(
        dir.path().join("does-not-exist"),
        dir.path().join("out"),
        &ConversionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::InputNotFound { .. }));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_empty_directory_is_zero_of_zero() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("empty");
    std::fs::create_dir(&src).unwrap();
    write(&src, "ignored.pdf", b"%PDF");

    let output = convert(&src, dir.path().join("out"), &ConversionConfig::default()).unwrap();
    assert_eq!(output.stats.summary(), "0/0");
    assert!(output.documents.is_empty());
}

#[test]
fn test_conversion_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "design-2025-07-07.md",
        "# Design\n\n## Goals\n\n- fast\n- small\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n图片位置: 架构图\n",
    );
    let config = ConversionConfig::default();

    convert(&input, dir.path().join("one"), &config).unwrap();
    convert(&input, dir.path().join("two"), &config).unwrap();

    let name = "Design_2025-07-07.html";
    assert_eq!(
        std::fs::read(dir.path().join("one").join(name)).unwrap(),
        std::fs::read(dir.path().join("two").join(name)).unwrap()
    );
}

// ── Inspect and stream ───────────────────────────────────────────────────────

#[test]
fn test_inspect_reports_names_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a-2025-03-03.md", "# Kickoff\n");
    write(dir.path(), "b.docx", b"broken");
    write(dir.path(), "~$lock.docx", b"lock file");

    let docs = inspect(dir.path(), &ConversionConfig::default()).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].output_name.as_deref(), Some("Kickoff_2025-03-03.html"));
    assert!(docs[1].error.is_some());
    assert_eq!(listing(dir.path()).len(), 3);
}

#[test]
fn test_stream_callbacks_report_every_document() {
    #[derive(Default)]
    struct Tally(Mutex<(usize, usize, Option<(usize, usize)>)>);

    impl ConversionProgressCallback for Tally {
        fn on_document_complete(&self, _index: usize, _total: usize, _output: &Path) {
            self.0.lock().unwrap().0 += 1;
        }
        fn on_document_error(&self, _index: usize, _total: usize, _error: &str) {
            self.0.lock().unwrap().1 += 1;
        }
        fn on_batch_complete(&self, total: usize, converted: usize) {
            self.0.lock().unwrap().2 = Some((total, converted));
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir(&src).unwrap();
    write(&src, "1.md", "# One");
    write(&src, "2.md", "");
    write(&src, "3.md", "# Three");

    let tally = Arc::new(Tally::default());
    let config = ConversionConfig::builder()
        .progress_callback(tally.clone())
        .build()
        .unwrap();

    let mut stream = convert_stream(&src, dir.path().join("out"), &config).unwrap();
    let first = stream.next().unwrap();
    assert!(first.is_success());
    let rest: Vec<_> = stream.collect();
    assert_eq!(rest.len(), 2);

    assert_eq!(*tally.0.lock().unwrap(), (2, 1, Some((3, 2))));
}

#[test]
fn test_noop_callback_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NoopProgressCallback>();
    assert_send_sync::<ConversionConfig>();
}

// ── Real PDF engine (gated) ──────────────────────────────────────────────────

#[test]
fn test_weasyprint_pdf() {
    e2e_skip_unless_ready!("weasyprint");

    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "report-2025-08-08.md", "# Report\n\nHello PDF.");
    let config = ConversionConfig::builder()
        .format(OutputFormat::Pdf)
        .mode(RenderMode::Print)
        .build()
        .unwrap();

    let out = dir.path().join("out");
    let output = convert(&input, &out, &config).unwrap();
    assert_eq!(output.stats.summary(), "1/1", "{:?}", output.documents[0].error);
    let pdf = std::fs::read(out.join("Report_2025-08-08.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    println!("✓ {} bytes of PDF", pdf.len());
}
