//! Input resolution: validate the data file and pick its reader by extension.
//!
//! Checking existence and read permission up front means callers get a
//! meaningful [`DossierError`] rather than a reader-specific failure deep in
//! calamine or the csv crate.

use crate::error::DossierError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which reader a data file is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// OpenDocument spreadsheet (`.ods`).
    Ods,
    /// Office Open XML workbook (`.xlsx`, `.xlsm`).
    Xlsx,
    /// Legacy Excel binary (`.xls`); 256 characters per cell.
    Xls,
    /// Delimited text. Anything with an unrecognised extension lands here.
    Csv,
}

impl SourceFormat {
    /// Detect the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("ods") => SourceFormat::Ods,
            Some("xlsx") | Some("xlsm") => SourceFormat::Xlsx,
            Some("xls") => SourceFormat::Xls,
            _ => SourceFormat::Csv,
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        !matches!(self, SourceFormat::Csv)
    }
}

/// A data file that exists and can be opened.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub path: PathBuf,
    pub format: SourceFormat,
}

/// Resolve a local data file, validating existence and read permission.
pub fn resolve_input(path: impl AsRef<Path>) -> Result<ResolvedInput, DossierError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
        return Err(DossierError::InputNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DossierError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(DossierError::InputNotFound { path });
        }
    }

    let format = SourceFormat::from_path(&path);
    debug!("Resolved input {} as {:?}", path.display(), format);
    Ok(ResolvedInput { path, format })
}
