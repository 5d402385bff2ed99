//! Streaming conversion API: yield documents as they complete.
//!
//! ## Why stream?
//!
//! A batch with a PDF engine in the loop can take minutes. An iterator lets
//! callers print each result as soon as its file is written, stop early, or
//! feed results to their own reporting, instead of waiting for the whole
//! batch.
//!
//! Unlike the eager [`crate::convert::convert`] which returns only after
//! every document was attempted, [`convert_stream`] does the fatal checks up
//! front (input exists, output directory created) and then converts one
//! document per call to [`Iterator::next`]. Documents come out in the same
//! sorted order they were enumerated in.

use crate::config::ConversionConfig;
use crate::convert::Pipeline;
use crate::error::{DocumentError, RenderError};
use crate::output::DocumentResult;
use crate::pipeline::input::{self, OutputTarget, SourceDocument};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lazy batch: each `next()` converts and writes one document.
pub struct DocumentStream {
    config: ConversionConfig,
    target: OutputTarget,
    paths: std::vec::IntoIter<PathBuf>,
    total: usize,
    index: usize,
    converted: usize,
    finished: bool,
}

/// Convert a document or directory, yielding one [`DocumentResult`] per
/// document.
///
/// # Returns
/// - `Ok(DocumentStream)` — an iterator over per-document outcomes
/// - `Err(RenderError)` — fatal error (input missing, output directory
///   cannot be created, file output for a directory input)
pub fn convert_stream(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DocumentStream, RenderError> {
    let input = input.as_ref();
    let output = output.as_ref();
    info!("Starting conversion: {} → {}", input.display(), output.display());

    // ── Enumerate ────────────────────────────────────────────────────────
    let paths = input::enumerate(input, &config.extensions)?;

    // ── Prepare output ───────────────────────────────────────────────────
    let target = input::resolve_output(input, output)?;
    input::ensure_output_dir(&target)?;

    let total = paths.len();
    if total == 0 {
        warn!("No matching documents in {}", input.display());
    } else {
        info!("Found {} document(s)", total);
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    Ok(DocumentStream {
        config: config.clone(),
        target,
        paths: paths.into_iter(),
        total,
        index: 0,
        converted: 0,
        finished: false,
    })
}

impl DocumentStream {
    /// Number of documents in the batch.
    pub fn total(&self) -> usize {
        self.total
    }

    fn process(&mut self, path: PathBuf) -> DocumentResult {
        self.index += 1;
        let (index, total) = (self.index, self.total);
        let start = Instant::now();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_document_start(index, total, &name);
        }

        let outcome = SourceDocument::read(&path)
            .and_then(|source| Pipeline::new(&self.config).run(&source))
            .and_then(|artifact| {
                let dest = self.target.path_for(&artifact.file_name);
                if dest.exists() {
                    debug!("Overwriting existing {}", dest.display());
                }
                artifact
                    .write_to(&dest)
                    .map_err(|e| DocumentError::WriteFailure {
                        path: dest.clone(),
                        detail: e.to_string(),
                    })?;
                Ok((artifact, dest))
            });

        let duration_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok((artifact, dest)) => {
                self.converted += 1;
                info!("[{}/{}] {} → {}", index, total, name, dest.display());
                if let Some(ref cb) = self.config.progress_callback {
                    cb.on_document_complete(index, total, &dest);
                }
                DocumentResult {
                    index,
                    source: path,
                    output: Some(dest),
                    metadata: Some(artifact.metadata),
                    bytes_written: artifact.bytes.len(),
                    duration_ms,
                    error: None,
                }
            }
            Err(e) => {
                warn!("[{}/{}] {} failed: {}", index, total, name, e);
                if let Some(ref cb) = self.config.progress_callback {
                    cb.on_document_error(index, total, &e.to_string());
                }
                DocumentResult {
                    index,
                    source: path,
                    output: None,
                    metadata: None,
                    bytes_written: 0,
                    duration_ms,
                    error: Some(e),
                }
            }
        }
    }
}

impl Iterator for DocumentStream {
    type Item = DocumentResult;

    fn next(&mut self) -> Option<DocumentResult> {
        if let Some(path) = self.paths.next() {
            return Some(self.process(path));
        }
        if !self.finished {
            self.finished = true;
            info!("Converted {}/{} documents", self.converted, self.total);
            if let Some(ref cb) = self.config.progress_callback {
                cb.on_batch_complete(self.total, self.converted);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ConversionProgressCallback;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Events(Mutex<Vec<String>>);

    impl ConversionProgressCallback for Events {
        fn on_batch_start(&self, total: usize) {
            self.0.lock().unwrap().push(format!("start {total}"));
        }
        fn on_document_start(&self, index: usize, _total: usize, name: &str) {
            self.0.lock().unwrap().push(format!("doc {index} {name}"));
        }
        fn on_document_complete(&self, index: usize, _total: usize, _output: &Path) {
            self.0.lock().unwrap().push(format!("ok {index}"));
        }
        fn on_document_error(&self, index: usize, _total: usize, _error: &str) {
            self.0.lock().unwrap().push(format!("err {index}"));
        }
        fn on_batch_complete(&self, total: usize, converted: usize) {
            self.0.lock().unwrap().push(format!("done {converted}/{total}"));
        }
    }

    #[test]
    fn stream_yields_in_order_and_fires_callbacks() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir(&src).unwrap();
        std::fs::write(src.join("b.md"), "# Beta\n").unwrap();
        std::fs::write(src.join("a.md"), "# Alpha\n").unwrap();
        std::fs::write(src.join("c.md"), "   \n").unwrap();

        let events = Arc::new(Events::default());
        let config = ConversionConfig::builder()
            .progress_callback(events.clone())
            .build()
            .unwrap();

        let stream = convert_stream(&src, dir.path().join("out"), &config).unwrap();
        assert_eq!(stream.total(), 3);
        let results: Vec<DocumentResult> = stream.collect();

        let names: Vec<String> = results
            .iter()
            .map(|r| r.source.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "c.md"]);
        assert!(results[0].is_success());
        assert!(matches!(results[2].error, Some(DocumentError::EmptyContent { .. })));

        assert_eq!(
            *events.0.lock().unwrap(),
            vec![
                "start 3", "doc 1 a.md", "ok 1", "doc 2 b.md", "ok 2", "doc 3 c.md", "err 3",
                "done 2/3",
            ]
        );
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_stream(dir.path().join("nope"), dir.path().join("out"), &ConversionConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::InputNotFound { .. }));
    }
}
