//! Tabular loading: spreadsheet or CSV → [`AgentRecord`]s.
//!
//! Spreadsheets go through calamine (first worksheet, first row is the
//! header). Delimited text is decoded with the configured encoding chain and
//! parsed by the csv crate. Both paths meet at the same `column → cell` map
//! per row, which [`AgentRecord::from_row`] resolves against the fixed
//! schema.
//!
//! Loading is all-or-nothing: any failure is returned as a [`DossierError`]
//! and no partial dataset is produced.

use crate::config::{LONG_FIELD_THRESHOLD, XLS_CELL_LIMIT};
use crate::error::DossierError;
use crate::pipeline::decode::{self, TextEncoding};
use crate::pipeline::input::{self, SourceFormat};
use crate::record::{AgentField, AgentRecord};
use calamine::{open_workbook, Data, Ods, Range, Reader, Xls, Xlsx};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A cell whose length suggests an upstream tool cut it short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWarning {
    /// 1-based roster position of the row.
    pub row: usize,
    pub column: String,
    pub chars: usize,
}

/// Everything read from one data file.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub path: PathBuf,
    pub format: SourceFormat,
    /// Encoding that decoded the file (delimited text only).
    pub encoding: Option<TextEncoding>,
    /// Header row, in file order.
    pub columns: Vec<String>,
    pub records: Vec<AgentRecord>,
    /// Cells of exactly [`XLS_CELL_LIMIT`] characters.
    pub warnings: Vec<FieldWarning>,
}

impl Dataset {
    /// Known columns the header row does not contain.
    pub fn missing_columns(&self) -> Vec<AgentField> {
        AgentField::ALL
            .into_iter()
            .filter(|f| !self.columns.iter().any(|c| c == f.column()))
            .collect()
    }
}

/// Header plus raw rows, before schema resolution.
struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Load every record from `path`.
///
/// `encodings` is the attempt order for delimited text; spreadsheets
/// ignore it.
pub fn load_dataset(
    path: impl AsRef<Path>,
    encodings: &[TextEncoding],
) -> Result<Dataset, DossierError> {
    let resolved = input::resolve_input(path)?;
    let path = resolved.path;
    let format = resolved.format;

    let (table, encoding) = match format {
        SourceFormat::Csv => {
            let (table, enc) = read_csv(&path, encodings)?;
            (table, Some(enc))
        }
        SourceFormat::Xlsx => {
            let wb: Xlsx<BufReader<File>> =
                open_workbook(&path).map_err(|e| spreadsheet_error(&path, e))?;
            (read_first_sheet(wb, &path)?, None)
        }
        SourceFormat::Xls => {
            warn!(
                ".xls format has a {} character limit per cell. Consider using .ods or .xlsx format.",
                XLS_CELL_LIMIT
            );
            let wb: Xls<BufReader<File>> =
                open_workbook(&path).map_err(|e| spreadsheet_error(&path, e))?;
            (read_first_sheet(wb, &path)?, None)
        }
        SourceFormat::Ods => {
            let wb: Ods<BufReader<File>> =
                open_workbook(&path).map_err(|e| spreadsheet_error(&path, e))?;
            (read_first_sheet(wb, &path)?, None)
        }
    };

    if table.columns.iter().all(|c| c.is_empty()) {
        return Err(DossierError::EmptyDataset { path });
    }

    let warnings = scan_field_lengths(&table);
    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, cells)| AgentRecord::from_row(i + 1, &zip_row(&table.columns, cells)))
        .collect::<Vec<_>>();

    let dataset = Dataset {
        path,
        format,
        encoding,
        columns: table.columns,
        records,
        warnings,
    };

    for field in dataset.missing_columns() {
        warn!(
            "Column '{}' not found; every dossier will show {}",
            field.column(),
            field.default_value()
        );
    }

    info!(
        "Loaded {} records from {} ({:?})",
        dataset.records.len(),
        dataset.path.display(),
        dataset.format
    );
    Ok(dataset)
}

// ── Delimited text ───────────────────────────────────────────────────────────

fn read_csv(path: &Path, encodings: &[TextEncoding]) -> Result<(RawTable, TextEncoding), DossierError> {
    let bytes = std::fs::read(path).map_err(|e| DossierError::Csv {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let (text, encoding) = decode::decode(&bytes, encodings).map_err(|e| DossierError::Decode {
        path: path.to_path_buf(),
        tried: e.tried,
    })?;
    if encodings.first() != Some(&encoding) {
        info!("Loaded CSV with {} encoding (fallback): {}", encoding, path.display());
    } else {
        debug!("Loaded CSV with {} encoding: {}", encoding, path.display());
    }

    let csv_error = |e: csv::Error| DossierError::Csv {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        rows.push(cells);
    }

    Ok((RawTable { columns, rows }, encoding))
}

// ── Spreadsheets ─────────────────────────────────────────────────────────────

fn spreadsheet_error(path: &Path, e: impl fmt::Display) -> DossierError {
    DossierError::Spreadsheet {
        path: path.to_path_buf(),
        detail: e.to_string(),
    }
}

fn read_first_sheet<R>(mut workbook: R, path: &Path) -> Result<RawTable, DossierError>
where
    R: Reader<BufReader<File>>,
    R::Error: fmt::Display,
{
    let range: Range<Data> = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DossierError::EmptyDataset {
            path: path.to_path_buf(),
        })?
        .map_err(|e| spreadsheet_error(path, e))?;

    let mut rows_iter = range.rows();
    let columns: Vec<String> = match rows_iter.next() {
        Some(header) => header.iter().map(|c| cell_to_string(c).trim().to_string()).collect(),
        None => {
            return Err(DossierError::EmptyDataset {
                path: path.to_path_buf(),
            })
        }
    };

    let rows = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|cells| !cells.iter().all(|c| c.trim().is_empty()))
        .collect();

    Ok(RawTable { columns, rows })
}

/// Render a spreadsheet cell as the text a person would read in it.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_else(|| format_float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// Whole numbers lose the trailing `.0` spreadsheets store them with.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

// ── Shared ───────────────────────────────────────────────────────────────────

/// Pair header names with cells; the first of duplicate headers wins.
fn zip_row(columns: &[String], cells: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(columns.len());
    for (col, cell) in columns.iter().zip(cells) {
        if col.is_empty() {
            continue;
        }
        map.entry(col.clone()).or_insert_with(|| cell.clone());
    }
    map
}

fn scan_field_lengths(table: &RawTable) -> Vec<FieldWarning> {
    let mut warnings = Vec::new();
    for (i, cells) in table.rows.iter().enumerate() {
        for (col, cell) in table.columns.iter().zip(cells) {
            let chars = cell.chars().count();
            if chars == XLS_CELL_LIMIT {
                warn!(
                    "Field '{}' in row {} is exactly {} characters - may be truncated!",
                    col,
                    i + 1,
                    chars
                );
                warnings.push(FieldWarning {
                    row: i + 1,
                    column: col.clone(),
                    chars,
                });
            } else if chars > LONG_FIELD_THRESHOLD {
                debug!(
                    "Field '{}' in row {} has {} characters (looks complete)",
                    col,
                    i + 1,
                    chars
                );
            }
        }
    }
    warnings
}
