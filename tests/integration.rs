use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn pdd_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("pdd");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    // Two near-duplicate poems (punctuation apart), one distinct prompt.
    // poem-new has the later updated_at and must survive.
    let prompts = r#"[
  {
    "id": "poem-old",
    "title": "Write a poem",
    "body": "Compose a short poem about the sea.",
    "created_at": 90,
    "updated_at": 100
  },
  {
    "id": "poem-new",
    "title": "Write a poem!",
    "body": "Compose a short poem about the sea.",
    "created_at": 190,
    "updated_at": 200
  },
  {
    "id": "summarize",
    "title": "Summarize text",
    "body": "Summarize the given article in two sentences.",
    "created_at": 140,
    "updated_at": 150
  }
]"#;
    fs::write(root.join("prompts.json"), prompts).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/pdd.sqlite"

[dedupe]
threshold = 0.8

[reports]
dir = "{}/reports"
"#,
        root.display(),
        root.display()
    );

    let config_path = config_dir.join("pdd.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_pdd(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = pdd_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run pdd binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn import_fixture(tmp: &TempDir, config_path: &Path) {
    run_pdd(config_path, &["init"]);
    let file = tmp.path().join("prompts.json");
    let (stdout, stderr, success) = run_pdd(config_path, &["import", file.to_str().unwrap()]);
    assert!(success, "import failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("prompts imported: 3"));
}

fn report_files(tmp: &TempDir) -> Vec<PathBuf> {
    let dir = tmp.path().join("reports");
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("reports dir missing at {:?}: {}", dir, e))
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_pdd(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_pdd(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_pdd(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_import_upserts_without_duplicates() {
    let (tmp, config_path) = setup_test_env();
    import_fixture(&tmp, &config_path);

    // Importing again updates in place instead of duplicating.
    let file = tmp.path().join("prompts.json");
    let (stdout, _, success) = run_pdd(&config_path, &["import", file.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("prompts imported: 3"));

    let (stdout, _, _) = run_pdd(&config_path, &["stats"]);
    assert!(stdout.contains("Records:       3"), "stats: {}", stdout);
}

#[test]
fn test_dedupe_dry_run_plans_but_keeps_everything() {
    let (tmp, config_path) = setup_test_env();
    import_fixture(&tmp, &config_path);

    let (stdout, stderr, success) =
        run_pdd(&config_path, &["dedupe", "--progress", "off"]);
    assert!(success, "dedupe failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("dedupe (dry-run)"));
    assert!(stdout.contains("clusters: 1"));
    assert!(stdout.contains("marked for deletion: 1"));
    assert!(stdout.contains("ok"));

    // Report written, store untouched.
    let reports = report_files(&tmp);
    assert_eq!(reports.len(), 1);
    let (stdout, _, _) = run_pdd(&config_path, &["stats"]);
    assert!(stdout.contains("Records:       3"), "stats: {}", stdout);

    // The later-updated poem is the keeper, the older one is marked.
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&reports[0]).unwrap()).unwrap();
    assert_eq!(report["mode"], "dry_run");
    assert_eq!(report["cluster_count"], 1);
    assert_eq!(report["clusters"][0]["keeper_id"], "poem-new");
    let members = report["clusters"][0]["members"].as_array().unwrap();
    let deleted: Vec<&str> = members
        .iter()
        .filter(|m| m["deleted"] == true)
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(deleted, vec!["poem-old"]);
}

#[test]
fn test_dedupe_execute_deletes_marked_records() {
    let (tmp, config_path) = setup_test_env();
    import_fixture(&tmp, &config_path);

    let (stdout, stderr, success) = run_pdd(
        &config_path,
        &["dedupe", "--execute", "--progress", "off"],
    );
    assert!(success, "dedupe failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("dedupe (execute)"));
    assert!(stdout.contains("deleted: 1"));

    let (stdout, _, _) = run_pdd(&config_path, &["stats"]);
    assert!(stdout.contains("Records:       2"), "stats: {}", stdout);
}

#[test]
fn test_strict_threshold_finds_nothing() {
    let (tmp, config_path) = setup_test_env();
    import_fixture(&tmp, &config_path);

    let (stdout, _, success) = run_pdd(
        &config_path,
        &["dedupe", "--threshold", "0.99", "--progress", "off"],
    );
    assert!(success);
    assert!(stdout.contains("clusters: 0"));
    assert!(stdout.contains("marked for deletion: 0"));
}

#[test]
fn test_invalid_threshold_rejected() {
    let (tmp, config_path) = setup_test_env();
    import_fixture(&tmp, &config_path);

    let (_, stderr, success) = run_pdd(
        &config_path,
        &["dedupe", "--threshold", "1.5", "--progress", "off"],
    );
    assert!(!success);
    assert!(stderr.contains("threshold"), "stderr: {}", stderr);

    // Rejected before any work: no report written.
    assert!(!tmp.path().join("reports").exists());
}

#[test]
fn test_replay_applies_dry_run_report() {
    let (tmp, config_path) = setup_test_env();
    import_fixture(&tmp, &config_path);

    // Dry-run writes the report but deletes nothing.
    run_pdd(&config_path, &["dedupe", "--progress", "off"]);
    let reports = report_files(&tmp);
    assert_eq!(reports.len(), 1);
    let report_path = reports[0].to_str().unwrap();

    // Replay without --execute only lists the ids.
    let (stdout, _, success) = run_pdd(&config_path, &["replay", report_path]);
    assert!(success);
    assert!(stdout.contains("deletions in report: 1"));
    assert!(stdout.contains("poem-old"));
    let (stdout, _, _) = run_pdd(&config_path, &["stats"]);
    assert!(stdout.contains("Records:       3"), "stats: {}", stdout);

    // Replay with --execute deletes exactly the marked ids.
    let (stdout, stderr, success) =
        run_pdd(&config_path, &["replay", report_path, "--execute"]);
    assert!(success, "replay failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("deleted: 1"));
    let (stdout, _, _) = run_pdd(&config_path, &["stats"]);
    assert!(stdout.contains("Records:       2"), "stats: {}", stdout);
}

#[test]
fn test_replay_missing_report_fails() {
    let (tmp, config_path) = setup_test_env();
    import_fixture(&tmp, &config_path);

    let missing = tmp.path().join("reports/nope.json");
    let (_, stderr, success) = run_pdd(
        &config_path,
        &["replay", missing.to_str().unwrap(), "--execute"],
    );
    assert!(!success);
    assert!(stderr.contains("report"), "stderr: {}", stderr);

    // Nothing was deleted on the failed replay.
    let (stdout, _, _) = run_pdd(&config_path, &["stats"]);
    assert!(stdout.contains("Records:       3"), "stats: {}", stdout);
}

#[test]
fn test_empty_store_run_still_writes_report() {
    let (tmp, config_path) = setup_test_env();
    run_pdd(&config_path, &["init"]);

    let (stdout, stderr, success) =
        run_pdd(&config_path, &["dedupe", "--progress", "off"]);
    assert!(success, "dedupe failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("records: 0"));
    assert!(stdout.contains("clusters: 0"));

    let reports = report_files(&tmp);
    assert_eq!(reports.len(), 1);
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&reports[0]).unwrap()).unwrap();
    assert_eq!(report["cluster_count"], 0);
}
