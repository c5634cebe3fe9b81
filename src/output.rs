//! Result types returned by a generation run.

use crate::error::{DossierError, RecordError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One rendered document, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDossier {
    /// `Agent_<sanitized name>_Dossier.html`
    pub file_name: String,
    pub html: String,
    /// Whether a photo was embedded rather than the pending placeholder.
    pub photo_embedded: bool,
}

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// 1-based roster position.
    pub row: usize,
    /// Agent name as supplied, `None` when the row had none.
    pub name: Option<String>,
    /// Written file, `None` when the record was skipped.
    pub path: Option<PathBuf>,
    pub photo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RecordError>,
}

impl RecordOutcome {
    pub fn is_written(&self) -> bool {
        self.error.is_none() && self.path.is_some()
    }
}

/// Aggregate report for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_records: usize,
    pub written: usize,
    pub skipped: usize,
    pub photos_embedded: usize,
    pub output_dir: PathBuf,
    pub duration_ms: u64,
    pub records: Vec<RecordOutcome>,
}

impl RunSummary {
    pub(crate) fn from_outcomes(output_dir: PathBuf, records: Vec<RecordOutcome>, duration_ms: u64) -> Self {
        let written = records.iter().filter(|r| r.is_written()).count();
        Self {
            total_records: records.len(),
            written,
            skipped: records.len() - written,
            photos_embedded: records.iter().filter(|r| r.is_written() && r.photo).count(),
            output_dir,
            duration_ms,
            records,
        }
    }

    /// Record-level errors, in roster order.
    pub fn errors(&self) -> impl Iterator<Item = &RecordError> {
        self.records.iter().filter_map(|r| r.error.as_ref())
    }

    /// Treat any skipped record as a failure of the whole run.
    pub fn into_result(self) -> Result<RunSummary, DossierError> {
        if self.skipped > 0 {
            Err(DossierError::PartialFailure {
                written: self.written,
                skipped: self.skipped,
                total: self.total_records,
            })
        } else {
            Ok(self)
        }
    }
}
