//! Error types for the agent-dossier library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`DossierError`] - **Fatal**: the run cannot proceed at all (template
//!   missing, data file unreadable or undecodable, output directory cannot be
//!   created). Returned as `Err(DossierError)` from
//!   [`crate::generate::generate_dossiers`].
//!
//! * [`RecordError`] - **Non-fatal**: a single record could not be rendered
//!   or written, but every other record is fine. Stored inside
//!   [`crate::output::RecordOutcome`] so callers can inspect partial success
//!   rather than losing the whole batch to one bad row.
//!
//! * [`PhotoError`] - **Non-fatal, never surfaced**: the photo for a record
//!   could not be loaded. The normaliser logs it and the dossier is rendered
//!   with the pending-photo placeholder instead.

use crate::pipeline::decode::TextEncoding;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the agent-dossier library.
///
/// Record-level failures use [`RecordError`] and are stored in
/// [`crate::output::RecordOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum DossierError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Data file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Template file was not found.
    #[error("Template file not found: '{path}'\nPass --template <PATH> or place dossier_template.html in the working directory.")]
    TemplateNotFound { path: PathBuf },

    /// Template file exists but could not be read.
    #[error("Failed to read template '{path}': {source}")]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Data errors ───────────────────────────────────────────────────────
    /// Delimited text could not be decoded under any attempted encoding.
    #[error("Could not decode '{path}' with any of: {}", format_encodings(.tried))]
    Decode {
        path: PathBuf,
        tried: Vec<TextEncoding>,
    },

    /// calamine failed to open or read the workbook.
    #[error("Failed to read spreadsheet '{path}': {detail}")]
    Spreadsheet { path: PathBuf, detail: String },

    /// The csv reader rejected the file.
    #[error("Failed to parse CSV '{path}': {detail}")]
    Csv { path: PathBuf, detail: String },

    /// The file has no header row (or no worksheet at all).
    #[error("'{path}' contains no header row")]
    EmptyDataset { path: PathBuf },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some records were written but at least one was skipped.
    ///
    /// Returned by [`crate::output::RunSummary::into_result`] when the
    /// caller wants to treat any skipped record as an error.
    #[error("{skipped}/{total} records were skipped")]
    PartialFailure {
        written: usize,
        skipped: usize,
        total: usize,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn format_encodings(tried: &[TextEncoding]) -> String {
    tried
        .iter()
        .map(|e| e.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A non-fatal error for a single record.
///
/// Stored alongside [`crate::output::RecordOutcome`] when a record fails.
/// The run continues with the next record.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum RecordError {
    /// The record has no usable `Name`, so no output path can be derived.
    #[error("Row {row}: no agent name, cannot derive an output file name")]
    MissingName { row: usize },

    /// The rendered dossier could not be written.
    #[error("Row {row}: failed to write '{path}': {detail}")]
    WriteFailed {
        row: usize,
        path: PathBuf,
        detail: String,
    },
}

impl RecordError {
    /// 1-based data row the error belongs to.
    pub fn row(&self) -> usize {
        match self {
            RecordError::MissingName { row } | RecordError::WriteFailed { row, .. } => *row,
        }
    }
}

/// Why a photo could not be embedded.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("cannot open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
