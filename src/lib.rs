//! # agent-dossier
//!
//! Generate one self-contained HTML dossier per agent from a roster
//! spreadsheet and an HTML template.
//!
//! Each roster row is resolved against a fixed sixteen-column schema
//! (missing cells get documented default text), the agent's photo is
//! center-cropped to a 150×200 portrait and embedded inline as a JPEG
//! `data:` URI, and the template's `{placeholder}` tokens are substituted
//! in a single pass.
//!
//! ## Pipeline Overview
//!
//! ```text
//! roster (.csv / .xlsx / .xls / .ods)
//!  │
//!  ├─ 1. Template  load once, decode with fallbacks
//!  ├─ 2. Load      rows → AgentRecord (defaults applied)
//!  ├─ 3. Photo     <photos>/<name>.jpg → crop → resize → JPEG → base64
//!  ├─ 4. Render    {name} {looks} … {timestamp} {photo}
//!  └─ 5. Write     <output>/Agent_<name>_Dossier.html (atomic)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_dossier::{generate_dossiers, DossierConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DossierConfig::builder()
//!         .template_path("dossier_template.html")
//!         .output_dir("dossiers")
//!         .photos_dir("photos")
//!         .build()?;
//!     let summary = generate_dossiers("agents.xlsx", &config)?;
//!     eprintln!("{}/{} dossiers written", summary.written, summary.total_records);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `dossier` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! agent-dossier = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod record;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DossierConfig, DossierConfigBuilder, PhotoSpec};
pub use error::{DossierError, PhotoError, RecordError};
pub use generate::{generate_dossiers, render_record, write_dossier};
pub use output::{RecordOutcome, RenderedDossier, RunSummary};
pub use pipeline::decode::TextEncoding;
pub use pipeline::input::SourceFormat;
pub use pipeline::template::{load_template, Template};
pub use progress::{DossierProgressCallback, NoopProgressCallback, ProgressCallback};
pub use record::{AgentField, AgentRecord};
