//! CLI binary for agent-dossier.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `DossierConfig`, prints the run summary and sets the exit status.

use agent_dossier::{
    generate_dossiers, DossierConfig, DossierProgressCallback, ProgressCallback, RunSummary,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Skipped records under `--strict`.
const EXIT_SKIPPED: u8 = 2;

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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar at the bottom, one log line per
/// record above it.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-record wall-clock start times.
    start_times: Mutex<HashMap<usize, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_run_start` tells us how many records there are.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading roster…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} records  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Generating");
        self.bar.reset_eta();
    }

    fn elapsed_secs(&self, row: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&row))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl DossierProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_records: usize) {
        self.activate_bar(total_records);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating {total_records} dossiers…"))
        ));
    }

    fn on_record_start(&self, row: usize, _total: usize, name: &str) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(row, Instant::now());
        }
        self.bar.set_message(name.to_string());
    }

    fn on_record_complete(&self, row: usize, total: usize, path: &Path) {
        let secs = self.elapsed_secs(row);
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.bar.println(format!(
            "  {} Row {:>3}/{:<3}  {}  {}",
            green("✓"),
            row,
            total,
            file,
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_record_error(&self, row: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs(row);
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Row {:>3}/{:<3}  {}  {}",
            red("✗"),
            row,
            total,
            red(&msg),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_records: usize, written: usize) {
        let failed = total_records.saturating_sub(written);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} dossiers generated",
                green("✔"),
                bold(&written.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} dossiers generated  ({} skipped)",
                if written == 0 { red("✘") } else { cyan("⚠") },
                bold(&written.to_string()),
                total_records,
                red(&self.errors.load(Ordering::SeqCst).to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Roster spreadsheet, default template, photos and output directory
  dossier agents.xlsx

  # CSV roster with an explicit template
  dossier agents.csv -t templates/field_agent.html

  # Custom photo and output directories
  dossier agents.ods -p headshots -o build/dossiers

  # Fail the run (exit 2) if any row had to be skipped
  dossier --strict agents.csv

  # Machine-readable summary
  dossier --json agents.xlsx > summary.json

INPUT FORMATS:
  .xlsx .xlsm   Excel workbook, first sheet
  .xls          Legacy Excel (256-character cell limit)
  .ods          OpenDocument spreadsheet, first sheet
  anything else CSV, decoded as UTF-8, ISO-8859-1 or Windows-1252

  The first row holds column names: Name, Looks, Anomaly, Reality,
  Competency, Anomaly_Contact, Agency_Contact, Power_Visual, Annual_Salary,
  Coffee, Collaboration, Work_Experience, Primary_Contact, First_Connection,
  Second_Connection, Third_Connection.

TEMPLATE PLACEHOLDERS:
  {name} {looks} {anomaly} … {third_connection}   column values
  {timestamp}                                     generation time
  {photo}                                         150×200 embedded photo

PHOTOS:
  <photos>/<sanitized name>.jpg, e.g. "O'Brien, Pat" → O_Brien_Pat.jpg

EXIT STATUS:
  0  all dossiers written
  1  template, roster or output directory problem
  2  --strict and at least one row was skipped
"#;

/// Generate HTML agent dossiers from a roster spreadsheet.
#[derive(Parser, Debug)]
#[command(
    name = "dossier",
    version,
    about = "Generate HTML agent dossiers from a roster spreadsheet",
    long_about = "Generate one self-contained HTML dossier per row of a CSV, XLSX, XLS or ODS \
roster. Column values fill the template's {placeholder} tokens and the agent's photo is \
center-cropped, resized to 150×200 and embedded inline.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Roster file: .csv, .xlsx, .xlsm, .xls or .ods.
    input: PathBuf,

    /// HTML template with {placeholder} tokens.
    #[arg(short, long, env = "DOSSIER_TEMPLATE", default_value = agent_dossier::config::DEFAULT_TEMPLATE_PATH)]
    template: PathBuf,

    /// Directory the dossiers are written into (created if missing).
    #[arg(short, long, env = "DOSSIER_OUTPUT", default_value = agent_dossier::config::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Directory holding <sanitized name>.jpg photos.
    #[arg(short, long, env = "DOSSIER_PHOTOS", default_value = agent_dossier::config::DEFAULT_PHOTOS_DIR)]
    photos: PathBuf,

    /// JPEG quality for embedded photos (1–100).
    #[arg(long, env = "DOSSIER_JPEG_QUALITY", default_value_t = agent_dossier::config::JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Exit with status 2 if any record was skipped.
    #[arg(long, env = "DOSSIER_STRICT")]
    strict: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long, env = "DOSSIER_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOSSIER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOSSIER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOSSIER_QUIET")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; --verbose always wins.
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

    match run(&cli, show_progress) {
        Ok(summary) => {
            if cli.strict && summary.skipped > 0 {
                ExitCode::from(EXIT_SKIPPED)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", red("✘"), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, show_progress: bool) -> Result<RunSummary> {
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn DossierProgressCallback>)
    } else {
        None
    };

    let config = build_config(cli, progress_cb)?;

    let summary = generate_dossiers(&cli.input, &config).context("Dossier generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&summary, show_progress);
    }

    Ok(summary)
}

/// Map CLI args to `DossierConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<DossierConfig> {
    let mut builder = DossierConfig::builder()
        .template_path(&cli.template)
        .output_dir(&cli.output)
        .photos_dir(&cli.photos)
        .jpeg_quality(cli.jpeg_quality);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(summary: &RunSummary, show_progress: bool) {
    // The progress callback already printed the per-record lines.
    if !show_progress {
        eprintln!(
            "Generated {}/{} dossiers in {}ms",
            summary.written, summary.total_records, summary.duration_ms
        );
        for err in summary.errors() {
            eprintln!("  {} {}", red("✗"), err);
        }
    }

    eprintln!(
        "   {} with photos  →  {}",
        dim(&summary.photos_embedded.to_string()),
        bold(&summary.output_dir.display().to_string()),
    );
}
