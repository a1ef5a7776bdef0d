use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn scout_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("scout");
    path
}

const HEADER: &str = "name,full_name,URL,desc.,search_term";

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let raw_dir = root.join("raw");
    fs::create_dir_all(&raw_dir).unwrap();
    fs::write(
        raw_dir.join("RAW_tinyml_repos_2025-01-01_10:00:00.csv"),
        format!(
            "{HEADER}\n\
             runtime,octo/runtime,https://github.com/octo/runtime,Inference runtime for microcontrollers,tinyml\n\
             lessons,octo/lessons,https://github.com/octo/lessons,Course notes on embedded learning,tinyml\n"
        ),
    )
    .unwrap();
    fs::write(
        raw_dir.join("RAW_edge ai_repos_2025-01-01_10:05:00.csv"),
        format!(
            "{HEADER}\n\
             runtime,octo/runtime,https://github.com/octo/runtime,Inference runtime for microcontrollers,edge ai\n\
             gateway,octo/gateway,https://github.com/octo/gateway,Sensor gateway firmware,edge ai\n"
        ),
    )
    .unwrap();
    fs::write(raw_dir.join("notes.txt"), "not a dataset").unwrap();

    let config_content = format!(
        r#"[github]
page_delay_ms = 0

[collect]
output_dir = "{root}/raw"

[curate]
processed_dir = "{root}/processed"
include_globs = ["*.csv"]
"#,
        root = root.display()
    );

    let config_path = config_dir.join("scout.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_scout(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = scout_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run scout binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn processed_files(root: &Path, prefix: &str) -> Vec<PathBuf> {
    let dir = root.join("processed");
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with(prefix))
        .collect();
    files.sort();
    files
}

#[test]
fn test_merge_command() {
    let (tmp, config) = setup_test_env();
    let raw = tmp.path().join("raw");
    let (stdout, stderr, success) = run_scout(&config, &["merge", raw.to_str().unwrap()]);
    assert!(success, "merge failed: {}", stderr);
    assert!(stdout.contains("rows out: 4"));
    assert!(stdout.contains("ok"));

    let merged = processed_files(tmp.path(), "[CONCATENATED]-raw-");
    assert_eq!(merged.len(), 1);
    let content = fs::read_to_string(&merged[0]).unwrap();
    assert!(content.starts_with(HEADER));
    assert_eq!(content.lines().count(), 5);
}

#[test]
fn test_dedup_command() {
    let (tmp, config) = setup_test_env();
    let raw = tmp.path().join("raw");
    run_scout(&config, &["merge", raw.to_str().unwrap()]);
    let merged = processed_files(tmp.path(), "[CONCATENATED]");

    let (stdout, stderr, success) = run_scout(&config, &["dedup", merged[0].to_str().unwrap()]);
    assert!(success, "dedup failed: {}", stderr);
    assert!(stdout.contains("rows in: 4"));
    assert!(stdout.contains("rows out: 3"));
    assert_eq!(processed_files(tmp.path(), "[NO-DUPLICATED]_repo-files_").len(), 1);
}

#[test]
fn test_exclude_command_infers_label() {
    let (tmp, config) = setup_test_env();
    let input = tmp
        .path()
        .join("raw")
        .join("RAW_tinyml_repos_2025-01-01_10:00:00.csv");

    let (stdout, stderr, success) = run_scout(&config, &["exclude", input.to_str().unwrap()]);
    assert!(success, "exclude failed: {}", stderr);
    assert!(stdout.contains("rows out: 1"));

    let out = processed_files(tmp.path(), "[EXCLUSION-TERM]_tinyml_");
    assert_eq!(out.len(), 1);
    let content = fs::read_to_string(&out[0]).unwrap();
    assert!(content.contains("octo/runtime"));
    assert!(!content.contains("octo/lessons"));
}

#[test]
fn test_exclude_command_explicit_label() {
    let (tmp, config) = setup_test_env();
    let input = tmp
        .path()
        .join("raw")
        .join("RAW_tinyml_repos_2025-01-01_10:00:00.csv");

    let (_, stderr, success) = run_scout(
        &config,
        &["exclude", input.to_str().unwrap(), "--label", "batch1"],
    );
    assert!(success, "exclude failed: {}", stderr);
    assert_eq!(processed_files(tmp.path(), "[EXCLUSION-TERM]_batch1_").len(), 1);
}

#[test]
fn test_curate_command_runs_every_stage() {
    let (tmp, config) = setup_test_env();
    let raw = tmp.path().join("raw");
    let (stdout, stderr, success) = run_scout(&config, &["curate", raw.to_str().unwrap()]);
    assert!(success, "curate failed: {}", stderr);

    for stage in ["merge", "dedup", "language", "exclusion"] {
        assert!(stdout.contains(stage), "missing stage {} in {}", stage, stdout);
    }
    assert!(stdout.trim_end().ends_with("ok"));
    assert_eq!(processed_files(tmp.path(), "[CONCATENATED]").len(), 1);
    assert_eq!(processed_files(tmp.path(), "[NO-DUPLICATED]").len(), 1);
    assert_eq!(processed_files(tmp.path(), "[ENGLISH-DESC]").len(), 1);
}

#[test]
fn test_missing_input_fails() {
    let (tmp, config) = setup_test_env();
    let missing = tmp.path().join("nope.csv");
    let (_, stderr, success) = run_scout(&config, &["dedup", missing.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("nope.csv"));
}

#[test]
fn test_missing_folder_fails() {
    let (tmp, config) = setup_test_env();
    let missing = tmp.path().join("no-such-folder");
    let (_, _, success) = run_scout(&config, &["merge", missing.to_str().unwrap()]);
    assert!(!success);
}

#[test]
fn test_config_command_prints_effective_settings() {
    let (_tmp, config) = setup_test_env();
    let (stdout, stderr, success) = run_scout(&config, &["config"]);
    assert!(success, "config failed: {}", stderr);
    assert!(stdout.contains("[github]"));
    assert!(stdout.contains("page_delay_ms = 0"));
    assert!(stdout.contains("commit_sentinel = 100"));
    assert!(stdout.contains("language = \"eng\""));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_tmp, config) = setup_test_env();
    fs::write(&config, "[github]\npage_size = 500\n").unwrap();
    let (_, stderr, success) = run_scout(&config, &["config"]);
    assert!(!success);
    assert!(stderr.contains("page_size"));
}
