use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn rdock_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("rdock");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    // Create test resumes
    let files_dir = root.join("files");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(files_dir.join("r1.txt"), "Jane Doe, Software Engineer").unwrap();
    fs::write(
        files_dir.join("r2.txt"),
        "Jane Smith, Account Manager with ten years in enterprise sales.",
    )
    .unwrap();
    fs::write(files_dir.join("r3.txt"), "Bob Stone, Software Engineer").unwrap();
    fs::write(files_dir.join("broken.xyz"), "unsupported format bytes").unwrap();

    // The hash provider keeps the whole flow offline and deterministic
    let config_content = format!(
        r#"[meta_db]
path = "{root}/data/resumes.sqlite"

[vector_db]
path = "{root}/data/vectors.sqlite"

[embedding]
provider = "hash"

[server]
bind = "127.0.0.1:7831"
"#,
        root = root.display()
    );

    let config_path = config_dir.join("rdock.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_rdock(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = rdock_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run rdock binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn ingest_samples(tmp: &TempDir, config_path: &Path) {
    let files = tmp.path().join("files");
    let r1 = files.join("r1.txt");
    let r2 = files.join("r2.txt");
    let r3 = files.join("r3.txt");

    for (file, name, resume_type, occupation) in [
        (&r1, "Jane Doe", "Engineering", "Software Engineer"),
        (&r2, "Jane Smith", "Sales", "Account Manager"),
        (&r3, "Bob Stone", "Engineering", "Software Engineer"),
    ] {
        let (stdout, stderr, success) = run_rdock(
            config_path,
            &[
                "ingest",
                file.to_str().unwrap(),
                "--name",
                name,
                "--resume-type",
                resume_type,
                "--occupation",
                occupation,
            ],
        );
        assert!(
            success,
            "ingest failed: stdout={}, stderr={}",
            stdout, stderr
        );
    }
}

#[test]
fn test_init_creates_databases() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_rdock(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/resumes.sqlite").exists());
    assert!(tmp.path().join("data/vectors.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_rdock(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_rdock(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_ingest_reports_stored_record() {
    let (tmp, config_path) = setup_test_env();
    run_rdock(&config_path, &["init"]);

    let r1 = tmp.path().join("files/r1.txt");
    let (stdout, stderr, success) = run_rdock(
        &config_path,
        &[
            "ingest",
            r1.to_str().unwrap(),
            "--name",
            "Jane Doe",
            "--resume-type",
            "Engineering",
            "--occupation",
            "Software Engineer",
        ],
    );
    assert!(
        success,
        "ingest failed: stdout={}, stderr={}",
        stdout, stderr
    );
    // Short document: the snippet is the full text
    assert!(stdout.contains("snippet: \"Jane Doe, Software Engineer\""));
    assert!(stdout.contains("vector id: "));
    assert!(stdout.contains("ok"));
}

#[test]
fn test_search_by_name_returns_all_matching_names() {
    let (tmp, config_path) = setup_test_env();
    run_rdock(&config_path, &["init"]);
    ingest_samples(&tmp, &config_path);

    let (stdout, _, success) = run_rdock(&config_path, &["search", "--name", "Jane"]);
    assert!(success);
    assert!(stdout.contains("Jane Doe"));
    assert!(stdout.contains("Jane Smith"));
    assert!(!stdout.contains("Bob Stone"));
}

#[test]
fn test_name_search_ignores_other_filters() {
    let (tmp, config_path) = setup_test_env();
    run_rdock(&config_path, &["init"]);
    ingest_samples(&tmp, &config_path);

    // resume_type "Sales" would exclude Jane Doe, but name wins
    let (stdout, _, success) = run_rdock(
        &config_path,
        &["search", "--name", "Jane Doe", "--resume-type", "Sales"],
    );
    assert!(success);
    assert!(stdout.contains("Jane Doe"));
    assert!(!stdout.contains("Jane Smith"));
}

#[test]
fn test_search_unknown_name_is_empty() {
    let (tmp, config_path) = setup_test_env();
    run_rdock(&config_path, &["init"]);
    ingest_samples(&tmp, &config_path);

    let (stdout, _, success) = run_rdock(&config_path, &["search", "--name", "NoSuchPerson"]);
    assert!(success);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_search_is_case_insensitive() {
    let (tmp, config_path) = setup_test_env();
    run_rdock(&config_path, &["init"]);
    ingest_samples(&tmp, &config_path);

    let (stdout, _, success) = run_rdock(&config_path, &["search", "--name", "jane doe"]);
    assert!(success);
    assert!(stdout.contains("Jane Doe"));
}

#[test]
fn test_flexible_search_combines_filters() {
    let (tmp, config_path) = setup_test_env();
    run_rdock(&config_path, &["init"]);
    ingest_samples(&tmp, &config_path);

    let (stdout, _, success) = run_rdock(
        &config_path,
        &[
            "search",
            "--resume-type",
            "engineering",
            "--occupation",
            "software",
        ],
    );
    assert!(success);
    assert!(stdout.contains("Jane Doe"));
    assert!(stdout.contains("Bob Stone"));
    assert!(!stdout.contains("Jane Smith"));
}

#[test]
fn test_unsupported_format_fails_before_any_write() {
    let (tmp, config_path) = setup_test_env();
    run_rdock(&config_path, &["init"]);

    let broken = tmp.path().join("files/broken.xyz");
    let (_, stderr, success) = run_rdock(&config_path, &["ingest", broken.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("unsupported"), "stderr={}", stderr);

    // Nothing was stored
    let (stdout, _, success) = run_rdock(&config_path, &["search"]);
    assert!(success);
    assert!(stdout.contains("No results."));
}
