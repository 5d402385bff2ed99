//! CLI binary for docrender.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docrender::{
    convert, inspect, ConversionConfig, ConversionProgressCallback, OutputFormat,
    ProgressCallback, RenderMode, ThemeId,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Shorten to `max` characters, appending an ellipsis when cut.
fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('\u{2026}');
        out
    }
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch plus a log line per
/// document printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start time of the document currently being processed.
    current_start: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Rendering");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            current_start: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.current_start
            .lock()
            .ok()
            .and_then(|mut g| g.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Rendering {total} document(s)…"))
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, name: &str) {
        if let Ok(mut g) = self.current_start.lock() {
            *g = Some(Instant::now());
        }
        self.bar.set_message(name.to_string());
    }

    fn on_document_complete(&self, index: usize, total: usize, output: &Path) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            output.display(),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs();
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            red(&truncate_chars(error, 100)),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, converted: usize) {
        let failed = self.errors.load(Ordering::SeqCst);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} document(s) converted successfully",
                green("✔"),
                bold(&converted.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents converted  ({} failed)",
                if converted == 0 { red("✘") } else { cyan("⚠") },
                bold(&converted.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Word notes → interactive HTML pages (one per document)
  docrender convert notes/ site/

  # Moon theme, print layout
  docrender convert --theme moon --mode print report.md out/

  # Print-ready PDF through WeasyPrint (must be installed)
  docrender convert --format pdf research.md out/research.pdf

  # Word → Markdown with a title/date header
  docrender convert --format markdown --ext docx chats/ markdown/

  # Preview derived titles and file names without writing anything
  docrender inspect chats/

  # Machine-readable batch report
  docrender convert --json notes/ site/ > report.json

OUTPUT NAMES:
  {title}_{date}.{ext}, where the title is the first line of the document
  (or the file name without digits and noise words) and the date is the first
  YYYY-MM-DD in the file name ("unspecified" otherwise).

ENVIRONMENT VARIABLES:
  DOCRENDER_THEME        Default for --theme
  DOCRENDER_MODE         Default for --mode
  DOCRENDER_FORMAT       Default for --format
  DOCRENDER_PDF_COMMAND  Default for --pdf-command
  DOCRENDER_EXT          Default for --ext
  RUST_LOG               Override log filtering (e.g. docrender=debug)
"#;

/// Convert Word and Markdown documents to themed HTML and PDF.
#[derive(Parser, Debug)]
#[command(
    name = "docrender",
    version,
    about = "Convert Word and Markdown documents to themed HTML and PDF",
    long_about = "Convert Word (.docx) and Markdown documents into themed print or interactive \
HTML pages, optionally turned into PDF by an external HTML-to-PDF engine. One bad document never \
stops a batch.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DOCRENDER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "DOCRENDER_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a document or a directory of documents.
    Convert(ConvertArgs),
    /// Show derived titles, dates and output names without converting.
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Document or directory of documents.
    input: PathBuf,

    /// Output directory, or an output file when the input is a single document.
    output: PathBuf,

    /// Colour theme: cyan, moon. Unknown names fall back to cyan.
    #[arg(long, env = "DOCRENDER_THEME", default_value = "cyan")]
    theme: String,

    /// Page shell for HTML output (PDF always uses print).
    #[arg(long, env = "DOCRENDER_MODE", value_enum, default_value = "interactive")]
    mode: ModeArg,

    /// Artifact written per document.
    #[arg(long, env = "DOCRENDER_FORMAT", value_enum, default_value = "html")]
    format: FormatArg,

    /// HTML-to-PDF program (reads HTML on stdin, writes PDF to stdout).
    #[arg(long, env = "DOCRENDER_PDF_COMMAND", default_value = "weasyprint")]
    pdf_command: String,

    /// Extra arguments for --pdf-command, space separated.
    #[arg(long, env = "DOCRENDER_PDF_ARGS", default_value = "- -", allow_hyphen_values = true)]
    pdf_args: String,

    /// Extensions picked from an input directory, comma separated.
    #[arg(long, env = "DOCRENDER_EXT", value_delimiter = ',', default_value = "docx,md,markdown,txt")]
    ext: Vec<String>,

    /// Characters of the first line used as a title (1–200).
    #[arg(long, env = "DOCRENDER_TITLE_CHARS", default_value_t = 30,
          value_parser = clap::value_parser!(u16).range(1..=200))]
    title_chars: u16,

    /// Omit the title/date/source header from Markdown output.
    #[arg(long, env = "DOCRENDER_NO_HEADER")]
    no_header: bool,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "DOCRENDER_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOCRENDER_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(clap::Args, Debug)]
struct InspectArgs {
    /// Document or directory of documents.
    input: PathBuf,

    /// Extensions picked from an input directory, comma separated.
    #[arg(long, env = "DOCRENDER_EXT", value_delimiter = ',', default_value = "docx,md,markdown,txt")]
    ext: Vec<String>,

    /// Extension used for the planned output names.
    #[arg(long, env = "DOCRENDER_FORMAT", value_enum, default_value = "html")]
    format: FormatArg,

    /// Print as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Print,
    Interactive,
}

impl From<ModeArg> for RenderMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Print => RenderMode::Print,
            ModeArg::Interactive => RenderMode::Interactive,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Html,
    Pdf,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = match &cli.command {
        Command::Convert(args) => !cli.quiet && !args.no_progress && !args.json,
        Command::Inspect(_) => false,
    };
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Convert(args) => run_convert(&cli, args, show_progress),
        Command::Inspect(args) => run_inspect(args),
    }
}

fn run_convert(cli: &Cli, args: &ConvertArgs, show_progress: bool) -> Result<()> {
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(args, progress_cb)?;
    let started = Instant::now();
    let output = convert(&args.input, &args.output, &config).with_context(|| {
        format!(
            "Conversion of {} failed",
            args.input.display()
        )
    })?;

    if args.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if !cli.quiet && !show_progress {
        // Only print inline results when the progress callback is disabled.
        for doc in &output.documents {
            match (&doc.output, &doc.error) {
                (Some(path), _) => eprintln!("{} {}", green("✓"), path.display()),
                (_, Some(e)) => eprintln!("{} {}", red("✗"), e),
                _ => {}
            }
        }
    }
    if !cli.quiet {
        eprintln!(
            "{}  converted {}  {}  →  {}",
            if output.stats.failed == 0 { green("✔") } else { cyan("⚠") },
            bold(&output.stats.summary()),
            dim(&format!("{}ms", started.elapsed().as_millis())),
            bold(&args.output.display().to_string()),
        );
    }

    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let config = ConversionConfig::builder()
        .extensions(args.ext.iter().map(|e| e.trim().to_string()))
        .format(args.format.into())
        .mode(RenderMode::Print)
        .build()
        .context("Invalid configuration")?;
    let docs = inspect(&args.input, &config)
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&docs).context("Failed to serialize metadata")?
        );
        return Ok(());
    }

    for doc in &docs {
        println!("File:    {}", doc.source.display());
        match (&doc.metadata, &doc.error) {
            (Some(meta), _) => {
                let title = if meta.theme.is_empty() {
                    dim("(untitled)")
                } else {
                    meta.theme.clone()
                };
                println!("Title:   {}", title);
                println!("Date:    {}", meta.date);
                if let Some(ref name) = doc.output_name {
                    println!("Output:  {}", name);
                }
            }
            (_, Some(e)) => println!("Error:   {}", red(&e.to_string())),
            _ => {}
        }
        println!();
    }
    println!("{} document(s)", docs.len());
    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(args: &ConvertArgs, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let theme = ThemeId::from_name(&args.theme);
    if !theme.as_str().eq_ignore_ascii_case(args.theme.trim()) {
        tracing::warn!("Unknown theme '{}', using {}", args.theme, theme);
    }

    // PDF is always produced from the print layout.
    let format: OutputFormat = args.format.into();
    let mode = if format == OutputFormat::Pdf {
        RenderMode::Print
    } else {
        args.mode.into()
    };

    let mut builder = ConversionConfig::builder()
        .theme(theme)
        .mode(mode)
        .format(format)
        .extensions(args.ext.iter().map(|e| e.trim().to_string()))
        .title_max_chars(args.title_chars as usize)
        .include_header(!args.no_header)
        .pdf_command(args.pdf_command.clone())
        .pdf_args(args.pdf_args.split_whitespace());

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
