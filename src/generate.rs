//! Batch generation entry points.
//!
//! One template, one roster, one HTML file per record. Records are
//! processed strictly in roster order; a record that cannot be rendered or
//! written is reported in the [`RunSummary`] and the run moves on.

use crate::config::DossierConfig;
use crate::error::{DossierError, RecordError};
use crate::naming;
use crate::output::{RecordOutcome, RenderedDossier, RunSummary};
use crate::pipeline::load::{self, Dataset};
use crate::pipeline::photo;
use crate::pipeline::template::{self, PhotoMarkup, RenderContext, Template};
use crate::record::AgentRecord;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Generate one dossier per record of `input`.
///
/// # Errors
/// Returns `Err(DossierError)` only when the run cannot start: the template
/// is missing or unreadable, the data file cannot be loaded, or the output
/// directory cannot be created. The template is checked first, so a bad
/// template never creates the output directory.
///
/// Per-record failures land in [`RunSummary::records`]; use
/// [`RunSummary::into_result`] to treat them as fatal.
pub fn generate_dossiers(
    input: impl AsRef<Path>,
    config: &DossierConfig,
) -> Result<RunSummary, DossierError> {
    let start = Instant::now();
    let input = input.as_ref();
    info!("Starting dossier generation: {}", input.display());

    // ── Step 1: Template ─────────────────────────────────────────────────
    let template = template::load_template(&config.template_path, &config.encodings)?;
    info!("Loaded template {}", config.template_path.display());

    // ── Step 2: Records ──────────────────────────────────────────────────
    let dataset = load::load_dataset(input, &config.encodings)?;

    // ── Step 3: Output directory ─────────────────────────────────────────
    std::fs::create_dir_all(&config.output_dir).map_err(|source| DossierError::OutputDirFailed {
        path: config.output_dir.clone(),
        source,
    })?;

    // ── Step 4: Photos directory ─────────────────────────────────────────
    if !config.photos_dir.is_dir() {
        warn!(
            "Photos directory {} not found, dossiers will use the pending placeholder",
            config.photos_dir.display()
        );
    }

    // ── Step 5: Render and write each record ─────────────────────────────
    let outcomes = process_records(&dataset, &template, config);

    // ── Step 6: Summary ──────────────────────────────────────────────────
    let summary = RunSummary::from_outcomes(
        config.output_dir.clone(),
        outcomes,
        start.elapsed().as_millis() as u64,
    );

    info!(
        "Generated {}/{} dossiers ({} with photos) in {} in {}ms",
        summary.written,
        summary.total_records,
        summary.photos_embedded,
        summary.output_dir.display(),
        summary.duration_ms
    );
    if summary.skipped > 0 {
        warn!("{} records were skipped", summary.skipped);
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(summary.total_records, summary.written);
    }

    Ok(summary)
}

/// Render one record against `template`.
///
/// Looks up the record's photo in `config.photos_dir` and stamps the
/// current local time. Fails only when the record carries no name.
pub fn render_record(
    record: &AgentRecord,
    template: &Template,
    config: &DossierConfig,
) -> Result<RenderedDossier, RecordError> {
    let name = record
        .provided_name()
        .ok_or(RecordError::MissingName { row: record.row })?;

    let photo = PhotoMarkup::from_data_uri(photo::load_photo(name, &config.photos_dir, &config.photo));
    let ctx = RenderContext::now(photo);

    Ok(RenderedDossier {
        file_name: naming::dossier_file_name(name),
        html: template.render(record, &ctx, &config.photo),
        photo_embedded: ctx.photo.is_embedded(),
    })
}

/// Write `html` to `path`, replacing any existing file.
///
/// The document goes to a temporary file next to the target first and is
/// then persisted over it, so a failed write never leaves a half-written
/// dossier behind.
pub fn write_dossier(path: &Path, html: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(html.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn process_records(dataset: &Dataset, template: &Template, config: &DossierConfig) -> Vec<RecordOutcome> {
    let total = dataset.records.len();
    let cb = config.progress_callback.as_ref();

    if let Some(cb) = cb {
        cb.on_run_start(total);
    }

    let mut outcomes = Vec::with_capacity(total);
    for record in &dataset.records {
        let name = record.provided_name().map(str::to_owned);
        if let Some(cb) = cb {
            cb.on_record_start(record.row, total, name.as_deref().unwrap_or(""));
        }

        let result = render_record(record, template, config).and_then(|doc| {
            let path = config.output_dir.join(&doc.file_name);
            if path.exists() {
                debug!("Overwriting existing {}", path.display());
            }
            write_dossier(&path, &doc.html).map_err(|e| RecordError::WriteFailed {
                row: record.row,
                path: path.clone(),
                detail: e.to_string(),
            })?;
            Ok((path, doc.photo_embedded))
        });

        let outcome = match result {
            Ok((path, photo)) => {
                info!("Generated dossier for {}: {}", name.as_deref().unwrap_or(""), path.display());
                if let Some(cb) = cb {
                    cb.on_record_complete(record.row, total, &path);
                }
                RecordOutcome {
                    row: record.row,
                    name,
                    path: Some(path),
                    photo,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Skipping record: {}", e);
                if let Some(cb) = cb {
                    cb.on_record_error(record.row, total, &e.to_string());
                }
                RecordOutcome {
                    row: record.row,
                    name,
                    path: None,
                    photo: false,
                    error: Some(e),
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}
