//! End-to-end tests for agent-dossier.
//!
//! Each test builds a roster, template and photos directory inside a fresh
//! temporary directory and runs the full pipeline against it.

use agent_dossier::{
    generate_dossiers, DossierConfig, DossierError, DossierProgressCallback, RecordError,
    TextEncoding,
};
use image::{Rgb, RgbImage};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

const BASIC_TEMPLATE: &str = "<p>{name}</p><p>{looks}</p><p>{anomaly}</p>{photo}";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(template: &str) -> Self {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("template.html"), template).unwrap();
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn write(&self, rel: &str, bytes: impl AsRef<[u8]>) -> PathBuf {
        let p = self.path(rel);
        std::fs::write(&p, bytes).unwrap();
        p
    }

    fn photo(&self, file_name: &str, w: u32, h: u32) {
        std::fs::create_dir_all(self.path("photos")).unwrap();
        RgbImage::from_pixel(w, h, Rgb([120, 90, 60]))
            .save(self.path("photos").join(file_name))
            .unwrap();
    }

    fn config(&self) -> DossierConfig {
        DossierConfig::builder()
            .template_path(self.path("template.html"))
            .output_dir(self.path("dossiers"))
            .photos_dir(self.path("photos"))
            .build()
            .unwrap()
    }

    fn read_output(&self, file_name: &str) -> String {
        std::fs::read_to_string(self.path("dossiers").join(file_name))
            .unwrap_or_else(|e| panic!("{file_name}: {e}"))
    }

    fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path("dossiers"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

// ── Rendering ────────────────────────────────────────────────────────────────

#[test]
fn test_single_record_without_photo() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", "Name,Looks\nJane Doe,Tall\n");

    let summary = generate_dossiers(&csv, &ws.config()).expect("run should succeed");

    assert_eq!(summary.total_records, 1);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.photos_embedded, 0);
    assert_eq!(ws.output_files(), vec!["Agent_Jane_Doe_Dossier.html"]);
    assert_eq!(
        ws.read_output("Agent_Jane_Doe_Dossier.html"),
        "<p>Jane Doe</p><p>Tall</p><p>[ANOMALY TYPE]</p>PHOTO<br>[PENDING]"
    );
}

#[test]
fn test_photo_is_embedded() {
    let ws = Workspace::new("<div>{photo}</div>");
    ws.photo("Jane_Doe.jpg", 640, 480);
    let csv = ws.write("agents.csv", "Name\nJane Doe\nJohn Roe\n");

    let summary = generate_dossiers(&csv, &ws.config()).unwrap();
    assert_eq!(summary.written, 2);
    assert_eq!(summary.photos_embedded, 1);
    assert!(summary.records[0].photo);
    assert!(!summary.records[1].photo);

    let jane = ws.read_output("Agent_Jane_Doe_Dossier.html");
    assert!(jane.contains(r#"<img src="data:image/jpeg;base64,"#), "{jane}");
    assert!(jane.contains("width: 150px; height: 200px; object-fit: cover;"));
    assert!(ws.read_output("Agent_John_Roe_Dossier.html").contains("PHOTO<br>[PENDING]"));
}

#[test]
fn test_timestamp_filled() {
    let ws = Workspace::new("generated {timestamp}");
    let csv = ws.write("agents.csv", "Name\nA\n");
    generate_dossiers(&csv, &ws.config()).unwrap();

    let html = ws.read_output("Agent_A_Dossier.html");
    let stamp = html.strip_prefix("generated ").unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok(), "{stamp}");
}

#[test]
fn test_duplicate_names_last_wins() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", "Name,Looks\nJane Doe,First\n Jane  Doe ,Second\n");

    let summary = generate_dossiers(&csv, &ws.config()).unwrap();
    assert_eq!(summary.written, 2);
    assert_eq!(ws.output_files(), vec!["Agent_Jane_Doe_Dossier.html"]);
    assert!(ws.read_output("Agent_Jane_Doe_Dossier.html").contains("<p>Second</p>"));
}

#[test]
fn test_rerun_overwrites_previous_output() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", "Name,Looks\nJane Doe,Tall\n");
    generate_dossiers(&csv, &ws.config()).unwrap();

    ws.write("agents.csv", "Name,Looks\nJane Doe,Short\n");
    generate_dossiers(&csv, &ws.config()).unwrap();

    assert!(ws.read_output("Agent_Jane_Doe_Dossier.html").contains("<p>Short</p>"));
    assert_eq!(ws.output_files().len(), 1);
}

// ── Input handling ───────────────────────────────────────────────────────────

#[test]
fn test_latin1_roster() {
    let ws = Workspace::new("{name}|{coffee}");
    let csv = ws.write("agents.csv", b"Name,Coffee\nJos\xE9,Caf\xE9 au lait\n");

    let summary = generate_dossiers(&csv, &ws.config()).unwrap();
    assert_eq!(summary.written, 1);
    assert_eq!(ws.read_output("Agent_José_Dossier.html"), "José|Café au lait");
}

#[test]
fn test_missing_name_is_skipped() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", "Name,Looks\nJane Doe,Tall\n,Invisible\nJohn Roe,Short\n");

    let summary = generate_dossiers(&csv, &ws.config()).unwrap();
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.records[1].error, Some(RecordError::MissingName { row: 2 }));
    assert_eq!(summary.records[1].name, None);

    match summary.into_result() {
        Err(DossierError::PartialFailure { written, skipped, total }) => {
            assert_eq!((written, skipped, total), (2, 1, 3));
        }
        other => panic!("expected PartialFailure, got {other:?}"),
    }
}

#[test]
fn test_header_only_roster_writes_nothing() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", "Name,Looks\n");

    let summary = generate_dossiers(&csv, &ws.config()).unwrap();
    assert_eq!(summary.total_records, 0);
    assert!(ws.path("dossiers").is_dir());
    assert!(ws.output_files().is_empty());
}

#[test]
fn test_xlsx_roster() {
    let ws = Workspace::new("{name}|{annual_salary}|{looks}");
    let xlsx = ws.path("agents.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Name").unwrap();
    sheet.write_string(0, 1, "Annual_Salary").unwrap();
    sheet.write_string(0, 2, "Looks").unwrap();
    sheet.write_string(1, 0, "Jane Doe").unwrap();
    sheet.write_number(1, 1, 50000.0).unwrap();
    sheet.write_string(1, 2, "Tall").unwrap();
    // row 3 left blank
    sheet.write_string(3, 0, "John Roe").unwrap();
    sheet.write_number(3, 1, 1234.5).unwrap();
    workbook.save(&xlsx).unwrap();

    let summary = generate_dossiers(&xlsx, &ws.config()).unwrap();
    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.records[1].row, 2);
    assert_eq!(ws.read_output("Agent_Jane_Doe_Dossier.html"), "Jane Doe|50000|Tall");
    assert_eq!(
        ws.read_output("Agent_John_Roe_Dossier.html"),
        "John Roe|1234.5|[DATA NOT PROVIDED]"
    );
}

// ── Abort conditions ─────────────────────────────────────────────────────────

#[test]
fn test_missing_template_aborts_before_output() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", "Name\nJane Doe\n");
    let config = DossierConfig::builder()
        .template_path(ws.path("missing.html"))
        .output_dir(ws.path("dossiers"))
        .build()
        .unwrap();

    let err = generate_dossiers(&csv, &config).unwrap_err();
    assert!(matches!(err, DossierError::TemplateNotFound { .. }), "{err}");
    assert!(!ws.path("dossiers").exists());
}

#[test]
fn test_undecodable_roster_aborts() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", b"Name\nZo\xEB\n");
    let config = DossierConfig::builder()
        .template_path(ws.path("template.html"))
        .output_dir(ws.path("dossiers"))
        .encodings(vec![TextEncoding::Utf8])
        .build()
        .unwrap();

    let err = generate_dossiers(&csv, &config).unwrap_err();
    assert!(matches!(err, DossierError::Decode { .. }), "{err}");
    assert!(!ws.path("dossiers").exists());
}

#[test]
fn test_output_dir_blocked_by_file() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", "Name\nJane Doe\n");
    ws.write("dossiers", "not a directory");

    let err = generate_dossiers(&csv, &ws.config()).unwrap_err();
    assert!(matches!(err, DossierError::OutputDirFailed { .. }), "{err}");
}

// ── Progress callback ────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    started: AtomicUsize,
    completed: AtomicUsize,
    errors: AtomicUsize,
    names: Mutex<Vec<String>>,
    finished: Mutex<Option<(usize, usize)>>,
}

impl DossierProgressCallback for Recorder {
    fn on_run_start(&self, total_records: usize) {
        self.started.store(total_records, Ordering::SeqCst);
    }

    fn on_record_start(&self, _row: usize, _total: usize, name: &str) {
        self.names.lock().unwrap().push(name.to_string());
    }

    fn on_record_complete(&self, _row: usize, _total: usize, path: &Path) {
        assert!(path.is_file());
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_record_error(&self, _row: usize, _total: usize, _error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }

    fn on_run_complete(&self, total_records: usize, written: usize) {
        *self.finished.lock().unwrap() = Some((total_records, written));
    }
}

#[test]
fn test_progress_events() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", "Name,Looks\nA,x\n\nB,y\n,ghost\nC,z\n");
    let recorder = Arc::new(Recorder::default());
    let config = DossierConfig::builder()
        .template_path(ws.path("template.html"))
        .output_dir(ws.path("dossiers"))
        .photos_dir(ws.path("photos"))
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    generate_dossiers(&csv, &config).unwrap();

    assert_eq!(recorder.started.load(Ordering::SeqCst), 4);
    assert_eq!(recorder.completed.load(Ordering::SeqCst), 3);
    assert_eq!(recorder.errors.load(Ordering::SeqCst), 1);
    assert_eq!(*recorder.names.lock().unwrap(), vec!["A", "B", "", "C"]);
    assert_eq!(*recorder.finished.lock().unwrap(), Some((4, 3)));
}

#[test]
fn test_summary_is_json_serialisable() {
    let ws = Workspace::new(BASIC_TEMPLATE);
    let csv = ws.write("agents.csv", "Name\nJane Doe\n");
    let summary = generate_dossiers(&csv, &ws.config()).unwrap();

    let json = serde_json::to_string(&summary).expect("serialise");
    assert!(json.contains("Agent_Jane_Doe_Dossier.html"));
    assert!(json.contains("\"written\":1"));
}
