//! Command-line tests run against a temporary data directory

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lumina(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lumina").unwrap();
    cmd.env("LUMINA_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

/// Add an entry and return its short ID
fn add_entry(dir: &TempDir, text: &str) -> String {
    let output = lumina(dir)
        .args(["entry", "add", text])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .find_map(|l| l.strip_prefix("Saved entry "))
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn init_and_config() {
    let dir = TempDir::new().unwrap();

    lumina(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));
    assert!(dir.path().join("config.json").exists());

    lumina(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Analysis window:    14 entries"));
}

#[test]
fn add_list_show_entry() {
    let dir = TempDir::new().unwrap();
    let id = add_entry(&dir, "Walked by the river");

    lumina(&dir)
        .args(["entry", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Walked by the river"))
        .stdout(predicate::str::contains(id.as_str()));

    lumina(&dir)
        .args(["entry", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Walked by the river"));
}

#[test]
fn entry_from_stdin_with_analysis() {
    let dir = TempDir::new().unwrap();

    lumina(&dir)
        .args(["entry", "add", "--analyze"])
        .write_stdin("So happy and grateful today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mood:"));
}

#[test]
fn empty_entry_is_rejected() {
    let dir = TempDir::new().unwrap();

    lumina(&dir)
        .args(["entry", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn delete_needs_force() {
    let dir = TempDir::new().unwrap();
    let id = add_entry(&dir, "Temporary thought");

    lumina(&dir)
        .args(["entry", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    lumina(&dir)
        .args(["entry", "delete", &id, "--force"])
        .assert()
        .success();

    lumina(&dir)
        .args(["entry", "show", &id])
        .assert()
        .failure();
}

#[test]
fn media_attach_and_extract() {
    let dir = TempDir::new().unwrap();
    let id = add_entry(&dir, "Doodled on the train");

    let sketch = dir.path().join("sketch.png");
    std::fs::write(&sketch, b"not really a png").unwrap();

    let output = lumina(&dir)
        .args(["media", "attach", &id])
        .arg(&sketch)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let media_id = stdout.trim().rsplit(' ').next().unwrap().to_string();

    let out = dir.path().join("copy.png");
    lumina(&dir)
        .args(["media", "extract", &id, &media_id])
        .arg(&out)
        .assert()
        .success();
    assert_eq!(std::fs::read(&out).unwrap(), b"not really a png");
}

#[test]
fn export_inspect_import() {
    let source = TempDir::new().unwrap();
    add_entry(&source, "Packed for the trip");
    let archive = source.path().join("journal.tar.gz");

    lumina(&source)
        .arg("export")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 entries"));

    lumina(&source)
        .arg("inspect")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:        1"));

    let target = TempDir::new().unwrap();
    lumina(&target)
        .arg("import")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    lumina(&target)
        .arg("import")
        .arg(&archive)
        .arg("--force")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored: 1 entries"));

    lumina(&target)
        .args(["entry", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packed for the trip"));
}

#[test]
fn import_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.tar.gz");
    std::fs::write(&bogus, b"this is not an archive").unwrap();

    lumina(&dir)
        .arg("import")
        .arg(&bogus)
        .arg("--force")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Archive format error"));
}

#[test]
fn streak_and_reports() {
    let dir = TempDir::new().unwrap();
    add_entry(&dir, "Morning run, felt great");

    lumina(&dir)
        .arg("streak")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 day streak"));

    lumina(&dir)
        .args(["report", "patterns"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries analysed: 1"));

    lumina(&dir)
        .args(["streak", "--boundary", "sideways"])
        .assert()
        .failure();
}

#[test]
fn draft_cleared_by_save() {
    let dir = TempDir::new().unwrap();

    lumina(&dir)
        .args(["draft", "save", "half finished"])
        .assert()
        .success();
    lumina(&dir)
        .args(["draft", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("half finished"));

    add_entry(&dir, "all finished");

    lumina(&dir)
        .args(["draft", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved draft."));
}

#[test]
fn gc_dry_run_then_sweep() {
    let dir = TempDir::new().unwrap();
    let id = add_entry(&dir, "Photo that will be orphaned");
    let photo = dir.path().join("pic.jpg");
    std::fs::write(&photo, b"jpeg").unwrap();

    lumina(&dir)
        .args(["media", "attach", &id])
        .arg(&photo)
        .assert()
        .success();
    lumina(&dir)
        .args(["entry", "delete", &id, "--force"])
        .assert()
        .success();

    lumina(&dir)
        .args(["gc", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would remove 1"));
    lumina(&dir)
        .arg("gc")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1"));
    lumina(&dir)
        .arg("gc")
        .assert()
        .success()
        .stdout(predicate::str::contains("No orphaned media found."));
}
