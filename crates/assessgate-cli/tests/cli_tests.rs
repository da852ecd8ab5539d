//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BACKEND: &str = "../../assessments/backend-engineer.json";
const BACKEND_COMPLETE: &str = "../../assessments/backend-engineer-responses.json";
const BACKEND_INCOMPLETE: &str = "../../assessments/backend-engineer-incomplete.json";
const FRONTEND: &str = "../../assessments/frontend-engineer.toml";

fn assessgate() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("assessgate").unwrap();
    cmd.env_remove("ASSESSGATE_FORMAT");
    cmd
}

#[test]
fn validate_json_assessment() {
    assessgate()
        .arg("validate")
        .arg("--assessment")
        .arg(BACKEND)
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend Engineer Screen (8 questions)"))
        .stdout(predicate::str::contains("All assessments valid"));
}

#[test]
fn validate_toml_assessment() {
    assessgate()
        .arg("validate")
        .arg("--assessment")
        .arg(FRONTEND)
        .assert()
        .success()
        .stdout(predicate::str::contains("Frontend Engineer Screen (3 questions)"));
}

#[test]
fn validate_directory() {
    assessgate()
        .arg("validate")
        .arg("--assessment")
        .arg("../../assessments")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend Engineer Screen"))
        .stdout(predicate::str::contains("Frontend Engineer Screen"));
}

#[test]
fn validate_reports_lint_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{
          "id": "broken", "title": "Broken",
          "sections": [{ "id": "s", "title": "S", "questions": [
            { "id": "pick", "title": "Pick", "type": "single-choice" }
          ]}]
        }"#,
    )
    .unwrap();

    assessgate()
        .arg("validate")
        .arg("--assessment")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[pick] WARNING"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    assessgate()
        .arg("validate")
        .arg("--assessment")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn evaluate_complete_responses() {
    assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(BACKEND)
        .arg("--responses")
        .arg(BACKEND_COMPLETE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 7/8 answered (87.5%)"))
        .stdout(predicate::str::contains("Ready to submit: yes"));
}

#[test]
fn evaluate_json_output() {
    let output = assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(BACKEND)
        .arg("--responses")
        .arg(BACKEND_INCOMPLETE)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let state = &report["state"];
    assert_eq!(state["can_submit"], false);
    assert_eq!(state["total_count"], 7);
    assert_eq!(state["answered_count"], 5);

    let errors = state["errors_by_question"].as_object().unwrap();
    assert!(!errors.contains_key("rust-years"));
    assert_eq!(errors["full-name"][0]["type"], "minLength");
    assert_eq!(errors["email"][0]["message"], "Enter a valid email address");
    assert_eq!(errors["resume"][0]["type"], "required");
    assert_eq!(errors["languages"].as_array().unwrap().len(), 2);
    assert_eq!(
        errors["relocation-notes"][0]["message"],
        "Tell us where you would move"
    );
}

#[test]
fn evaluate_markdown_output() {
    assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(BACKEND)
        .arg("--responses")
        .arg(BACKEND_INCOMPLETE)
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("### Errors"))
        .stdout(predicate::str::contains("**Ready to submit:** no"));
}

#[test]
fn evaluate_without_responses_lists_required() {
    assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(FRONTEND)
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 0/2 answered (0.0%)"));
}

#[test]
fn evaluate_fail_on_errors() {
    assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(BACKEND)
        .arg("--responses")
        .arg(BACKEND_INCOMPLETE)
        .arg("--fail-on-errors")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be submitted"));
}

#[test]
fn evaluate_fail_on_errors_passes_when_complete() {
    assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(BACKEND)
        .arg("--responses")
        .arg(BACKEND_COMPLETE)
        .arg("--fail-on-errors")
        .assert()
        .success();
}

#[test]
fn evaluate_writes_report_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reports").join("backend.json");

    assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(BACKEND)
        .arg("--responses")
        .arg(BACKEND_COMPLETE)
        .arg("--output")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Report saved to"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(report["assessment"]["id"], "backend-engineer");
    assert_eq!(report["state"]["can_submit"], true);
}

#[test]
fn evaluate_save_writes_into_configured_output_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("assessgate.toml"), "output_dir = \"reports\"\n").unwrap();
    let assessment = std::fs::canonicalize(BACKEND).unwrap();
    let responses = std::fs::canonicalize(BACKEND_COMPLETE).unwrap();

    assessgate()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--assessment")
        .arg(&assessment)
        .arg("--responses")
        .arg(&responses)
        .arg("--save")
        .assert()
        .success()
        .stderr(predicate::str::contains("Report saved to"));

    let saved: Vec<_> = std::fs::read_dir(dir.path().join("reports"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(saved.len(), 1);
    let name = saved[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("backend-engineer-"), "{name}");
    assert!(name.ends_with(".json"), "{name}");

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&saved[0]).unwrap()).unwrap();
    assert_eq!(report["state"]["answered_count"], 7);
}

#[test]
fn format_env_var_overrides_config_default() {
    let output = assessgate()
        .env("ASSESSGATE_FORMAT", "json")
        .arg("evaluate")
        .arg("--assessment")
        .arg(FRONTEND)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["assessment"]["id"], "frontend-engineer");
    assert_eq!(report["state"]["total_count"], 2);
}

#[test]
fn fail_on_errors_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("strict.toml");
    std::fs::write(&config, "fail_on_errors = true\n").unwrap();

    assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(BACKEND)
        .arg("--responses")
        .arg(BACKEND_INCOMPLETE)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be submitted"));
}

#[test]
fn evaluate_rejects_unknown_format() {
    assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(BACKEND)
        .arg("--format")
        .arg("xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn evaluate_rejects_non_object_responses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("responses.json");
    std::fs::write(&path, "[\"yes\"]").unwrap();

    assessgate()
        .arg("evaluate")
        .arg("--assessment")
        .arg(BACKEND)
        .arg("--responses")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON object"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    assessgate()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created assessgate.toml"))
        .stdout(predicate::str::contains("Created assessments/example.json"));

    assert!(dir.path().join("assessgate.toml").exists());
    assert!(dir.path().join("assessments/example-responses.json").exists());

    assessgate()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--assessment")
        .arg("assessments/example.json")
        .arg("--responses")
        .arg("assessments/example-responses.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready to submit: no"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    assessgate()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    assessgate()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    assessgate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Assessment conditional-logic and validation engine",
        ));
}

#[test]
fn version_output() {
    assessgate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("assessgate"));
}
