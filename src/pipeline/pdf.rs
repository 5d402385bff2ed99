//! HTML → PDF via an external engine.
//!
//! ## Why a child process?
//!
//! Faithful HTML/CSS paged layout (`@page` boxes, page counters, web fonts)
//! is a browser-engine problem. Tools like WeasyPrint already solve it, so the
//! crate drives one as a subprocess: HTML on stdin, PDF on stdout. The
//! [`PdfEngine`] trait keeps that seam narrow enough to swap engines or fake
//! them in tests.
//!
//! stdin is fed from a separate thread. Writing a large page synchronously
//! before reading stdout can deadlock once the engine fills its stdout pipe
//! while we are still blocked on its stdin.

use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// PDF magic bytes; any successful engine output must start with them.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Converts a complete HTML page to PDF bytes.
///
/// The error string becomes the detail of
/// [`DocumentError::PdfEngineFailed`](crate::error::DocumentError::PdfEngineFailed).
pub trait PdfEngine: Send + Sync {
    fn html_to_pdf(&self, html: &str) -> Result<Vec<u8>, String>;
}

/// Runs `program args…`, writing HTML to stdin and reading PDF from stdout.
#[derive(Debug, Clone)]
pub struct CommandPdfEngine {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for CommandPdfEngine {
    /// `weasyprint - -`: read HTML from stdin, write PDF to stdout.
    fn default() -> Self {
        Self {
            program: "weasyprint".to_string(),
            args: vec!["-".to_string(), "-".to_string()],
        }
    }
}

impl CommandPdfEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl PdfEngine for CommandPdfEngine {
    fn html_to_pdf(&self, html: &str) -> Result<Vec<u8>, String> {
        debug!("Running PDF engine: {} {}", self.program, self.args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("failed to start '{}': {}", self.program, e))?;

        let feeder = child.stdin.take().map(|mut stdin| {
            let input = html.as_bytes().to_vec();
            std::thread::spawn(move || stdin.write_all(&input))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| format!("failed to wait for '{}': {}", self.program, e))?;

        if let Some(handle) = feeder {
            match handle.join() {
                Ok(Ok(())) => {}
                // A broken pipe means the engine exited early; its status and
                // stderr below say why.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(format!("failed to write HTML to '{}': {}", self.program, e)),
                Err(_) => return Err("stdin writer thread panicked".to_string()),
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ));
        }
        if !output.stdout.starts_with(PDF_MAGIC) {
            return Err(format!(
                "'{}' produced {} bytes that are not a PDF",
                self.program,
                output.stdout.len()
            ));
        }

        debug!("PDF engine produced {} bytes", output.stdout.len());
        Ok(output.stdout)
    }
}
