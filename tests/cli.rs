use assert_cmd::Command;
use predicates::str::contains;
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE: &str = "<h1>{name}</h1><p>{looks}</p>{photo}";

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dossier").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG").arg("--no-progress");
    cmd
}

fn workspace(roster: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("dossier_template.html"), TEMPLATE).unwrap();
    std::fs::write(dir.path().join("agents.csv"), roster).unwrap();
    dir
}

#[test]
fn default_paths_write_dossier() {
    let dir = workspace("Name,Looks\nJane Doe,Tall\n");
    cmd(dir.path())
        .arg("agents.csv")
        .assert()
        .success()
        .stderr(contains("Generated 1/1 dossiers"));

    let html = std::fs::read_to_string(dir.path().join("dossiers/Agent_Jane_Doe_Dossier.html")).unwrap();
    assert_eq!(html, "<h1>Jane Doe</h1><p>Tall</p>PHOTO<br>[PENDING]");
}

#[test]
fn explicit_template_and_output() {
    let dir = workspace("Name\nJohn Roe\n");
    std::fs::write(dir.path().join("alt.html"), "agent={name}").unwrap();
    cmd(dir.path())
        .args(["agents.csv", "-t", "alt.html", "-o", "out/nested", "-p", "pics"])
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join("out/nested/Agent_John_Roe_Dossier.html")).unwrap();
    assert_eq!(html, "agent=John Roe");
}

#[test]
fn missing_template_fails_without_output_dir() {
    let dir = workspace("Name\nJane Doe\n");
    cmd(dir.path())
        .args(["agents.csv", "--template", "nope.html"])
        .assert()
        .code(1)
        .stderr(contains("Template file not found"));
    assert!(!dir.path().join("dossiers").exists());
}

#[test]
fn missing_input_fails() {
    let dir = workspace("Name\n");
    cmd(dir.path())
        .arg("missing.csv")
        .assert()
        .code(1)
        .stderr(contains("Input file not found"));
}

#[test]
fn skipped_record_exit_status() {
    let dir = workspace("Name,Looks\nJane Doe,Tall\n,Nameless\n");
    cmd(dir.path()).arg("agents.csv").assert().success();
    cmd(dir.path()).args(["--strict", "agents.csv"]).assert().code(2);
}

#[test]
fn json_summary() {
    let dir = workspace("Name\nJane Doe\n");
    cmd(dir.path())
        .args(["--json", "agents.csv"])
        .assert()
        .success()
        .stdout(contains("\"total_records\": 1"))
        .stdout(contains("Agent_Jane_Doe_Dossier.html"));
}

#[test]
fn env_var_sets_template() {
    let dir = workspace("Name\nJane Doe\n");
    std::fs::write(dir.path().join("env.html"), "env {name}").unwrap();
    cmd(dir.path())
        .env("DOSSIER_TEMPLATE", "env.html")
        .arg("agents.csv")
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join("dossiers/Agent_Jane_Doe_Dossier.html")).unwrap();
    assert_eq!(html, "env Jane Doe");
}

#[test]
fn jpeg_quality_out_of_range_rejected() {
    let dir = workspace("Name\nJane Doe\n");
    cmd(dir.path())
        .args(["--jpeg-quality", "0", "agents.csv"])
        .assert()
        .failure();
}

#[test]
fn help_lists_placeholders() {
    Command::cargo_bin("dossier")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("{timestamp}"));
}
