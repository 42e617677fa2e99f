//! CLI binary for kb-ingest.
//!
//! A thin shim over the library crate: maps flags to `IngestConfig`, fills
//! an `UploadForm`, submits once and prints the status line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use kb_ingest::config::{DEFAULT_BASE_URL, DEFAULT_PDF_PATH, DEFAULT_VIDEO_PATH};
use kb_ingest::input::is_url;
use kb_ingest::{
    read_text, HttpTransport, IngestConfig, IngestReceipt, Mode, SubmissionObserver, TextSource,
    Tone, UploadForm,
};
use std::io;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;
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

// ── Spinner observer using indicatif ─────────────────────────────────────────

/// Shows a spinner while the request is in flight and clears it when the
/// backend answers. The status line itself is printed by `main`.
struct SpinnerObserver {
    bar: ProgressBar,
    started: Mutex<Option<Instant>>,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        Arc::new(Self {
            bar,
            started: Mutex::new(None),
        })
    }

    fn elapsed(&self) -> String {
        let secs = self
            .started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        format!("{secs:.1}s")
    }
}

impl SubmissionObserver for SpinnerObserver {
    fn on_submit_start(&self, mode: Mode) {
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_prefix("Uploading");
        self.bar.set_message(format!("{} → knowledge base…", mode.label()));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_submit_success(&self, _mode: Mode, receipt: &IngestReceipt) {
        let elapsed = self.elapsed();
        self.bar.finish_and_clear();
        if let Some(msg) = receipt.message() {
            eprintln!("  {}  {}", dim(msg), dim(&elapsed));
        }
    }

    fn on_submit_failure(&self, _mode: Mode, _message: &str) {
        let elapsed = self.elapsed();
        self.bar.finish_and_clear();
        eprintln!("  {}", dim(&format!("failed after {elapsed}")));
    }

    fn on_submit_abandoned(&self, _mode: Mode) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Ingest a video transcript
  kb-ingest video https://www.youtube.com/watch?v=dQw4w9WgXcQ

  # Ingest PDF text from a file
  kb-ingest pdf --file contract.txt

  # Pipe text in
  pdftotext handbook.pdf - | kb-ingest pdf -

  # Against a remote backend, machine-readable output
  kb-ingest --base-url https://kb.example.com --json video https://youtu.be/abc

  # How-to notes for a mode
  kb-ingest guide pdf

ENVIRONMENT VARIABLES:
  KB_INGEST_BASE_URL      Backend base URL (default: http://localhost:3000)
  KB_INGEST_PDF_PATH      PDF-text route (default: /api/chat/upload-pdf)
  KB_INGEST_VIDEO_PATH    Video-URL route (default: /api/chat/upload-youtube)
  KB_INGEST_TOKEN         Bearer token sent with every request
  RUST_LOG                Override log filter (e.g. kb_ingest=debug)
"#;

/// Upload PDF text and video URLs to a knowledge-base ingestion backend.
#[derive(Parser, Debug)]
#[command(
    name = "kb-ingest",
    version,
    about = "Upload PDF text and video URLs to a knowledge-base ingestion backend",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL.
    #[arg(long, global = true, env = "KB_INGEST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Route for PDF text uploads.
    #[arg(long, global = true, env = "KB_INGEST_PDF_PATH", default_value = DEFAULT_PDF_PATH)]
    pdf_path: String,

    /// Route for video URL uploads.
    #[arg(long, global = true, env = "KB_INGEST_VIDEO_PATH", default_value = DEFAULT_VIDEO_PATH)]
    video_path: String,

    /// Bearer token for the backend session.
    #[arg(long, global = true, env = "KB_INGEST_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print the outcome as JSON on stdout.
    #[arg(long, global = true, env = "KB_INGEST_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, global = true)]
    no_progress: bool,

    /// Debug logging.
    #[arg(short, long, global = true, env = "KB_INGEST_VERBOSE")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true, env = "KB_INGEST_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload text copied out of a PDF.
    Pdf {
        /// Read the text from this file ("-" for stdin).
        #[arg(value_name = "FILE", conflicts_with = "text")]
        file: Option<String>,

        /// Pass the text inline.
        #[arg(long)]
        text: Option<String>,
    },

    /// Upload a video URL; the backend extracts the transcript.
    Video {
        /// Video URL, e.g. https://www.youtube.com/watch?v=...
        url: String,
    },

    /// Print usage notes for a mode.
    Guide {
        /// pdf or video (default: both).
        mode: Option<Mode>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters; keep INFO logs out
    // of its way unless the user asked for them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Guide-only mode ──────────────────────────────────────────────────
    let (mode, content) = match &cli.command {
        Command::Guide { mode } => {
            print_guide(*mode);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Pdf { file, text } => {
            let source = match (text, file) {
                (Some(t), _) => TextSource::Inline(t.clone()),
                (None, Some(f)) => TextSource::from_path_arg(f),
                (None, None) => TextSource::Stdin,
            };
            let text = read_text(&source).context("Failed to read PDF text")?;
            (Mode::Pdf, text)
        }
        Command::Video { url } => {
            if !url.trim().is_empty() && !is_url(url) {
                warn!("'{}' does not look like an http(s) URL; sending anyway", url);
            }
            (Mode::Video, url.clone())
        }
    };

    // ── Build form ───────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let transport = HttpTransport::new(config).context("Failed to set up HTTP client")?;
    let mut form = UploadForm::new(Arc::new(transport));
    if show_progress {
        form = form.with_observer(SpinnerObserver::new());
    }
    form.set_mode(mode);
    form.set_buffer(content);

    // ── Submit ───────────────────────────────────────────────────────────
    let result = form.submit().await;

    if cli.json {
        let out = serde_json::json!({
            "mode": mode,
            "ok": result.is_ok(),
            "status": form.status().map(|s| s.text()),
            "receipt": result.as_ref().ok(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("Failed to serialise outcome")?
        );
    } else if let Some(status) = form.status() {
        let line = match status.tone() {
            Tone::Success => green(status.text()),
            Tone::Failure => red(status.text()),
            Tone::Info => cyan(status.text()),
        };
        if shows_status(cli.quiet, result.is_err()) {
            eprintln!("{line}");
        }
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// `--quiet` hides the status line unless the run is exiting with failure.
fn shows_status(quiet: bool, failed: bool) -> bool {
    !quiet || failed
}

/// Map CLI args to `IngestConfig`.
fn build_config(cli: &Cli) -> Result<IngestConfig> {
    let mut builder = IngestConfig::builder()
        .base_url(&cli.base_url)
        .pdf_path(&cli.pdf_path)
        .video_path(&cli.video_path);
    if let Some(ref token) = cli.token {
        builder = builder.auth_token(token);
    }
    builder.build().context("Invalid configuration")
}

fn print_guide(mode: Option<Mode>) {
    let modes: Vec<Mode> = match mode {
        Some(m) => vec![m],
        None => Mode::ALL.to_vec(),
    };
    for (i, m) in modes.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", bold(&format!("How to use ({}):", m.label())));
        for (n, step) in m.instructions().iter().enumerate() {
            println!("  {}. {}", n + 1, step);
        }
    }
}
