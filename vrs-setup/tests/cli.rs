//! End-to-end tests driving the `vrs-setup` binary against a sandboxed
//! project and Claude config directory.
//!
//! Package installation is skipped throughout (`--skip-package`); the
//! external scanner and pip are not part of this test environment.

mod common;

use common::{SetupFixture, assert_contains, assert_path_exists, init_test_logging};
use std::fs;

const HOOK_COMMAND_FRAGMENT: &str = "hooks/ptuh.py";

fn run_install(fixture: &SetupFixture) -> std::process::Output {
    fixture
        .command("install")
        .arg("--skip-package")
        .output()
        .expect("Failed to run vrs-setup install")
}

#[test]
fn test_install_creates_files_and_registers_hook() {
    init_test_logging();
    crate::test_log!("TEST START: test_install_creates_files_and_registers_hook");

    let fixture = SetupFixture::new();
    let output = run_install(&fixture);
    assert!(
        output.status.success(),
        "install failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_path_exists(&fixture.project.join("vibesrails.yaml"));
    assert_path_exists(&fixture.project.join("CLAUDE.md"));
    assert_path_exists(&fixture.project.join(".claude/hooks.json"));
    assert_path_exists(&fixture.precommit_path());
    assert_path_exists(&fixture.hook_script_path());

    let settings = fixture.read_settings();
    let groups = settings["hooks"]["PreToolUse"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["matcher"], "Edit|Write|Bash");
    let command = groups[0]["hooks"][0]["command"].as_str().unwrap();
    assert_contains(command, HOOK_COMMAND_FRAGMENT);

    crate::test_log!("TEST PASS: test_install_creates_files_and_registers_hook");
}

#[test]
fn test_install_is_idempotent() {
    init_test_logging();

    let fixture = SetupFixture::new();
    assert!(run_install(&fixture).status.success());

    let settings_before = fs::read(fixture.settings_path()).unwrap();
    let precommit_before = fs::read(fixture.precommit_path()).unwrap();

    let output = run_install(&fixture);
    assert!(output.status.success());

    assert_eq!(
        fs::read(fixture.settings_path()).unwrap(),
        settings_before,
        "Second install must not rewrite settings.json"
    );
    assert_eq!(fs::read(fixture.precommit_path()).unwrap(), precommit_before);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "up to date");
}

#[test]
fn test_install_dry_run_changes_nothing() {
    init_test_logging();

    let fixture = SetupFixture::new();
    let output = fixture
        .command("install")
        .arg("--skip-package")
        .arg("--dry-run")
        .output()
        .expect("Failed to run vrs-setup install --dry-run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "would change");

    assert!(!fixture.project.join("vibesrails.yaml").exists());
    assert!(!fixture.precommit_path().exists());
    assert!(!fixture.settings_path().exists());
    assert!(!fixture.hook_script_path().exists());
}

#[test]
fn test_install_aborts_on_malformed_settings() {
    init_test_logging();

    let fixture = SetupFixture::new();
    fs::write(fixture.settings_path(), "{ invalid json }").unwrap();
    let before = fs::read(fixture.settings_path()).unwrap();

    let output = run_install(&fixture);
    assert!(!output.status.success(), "install should fail on malformed settings");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_contains(&stderr, "VRS-E001");

    assert_eq!(
        fs::read(fixture.settings_path()).unwrap(),
        before,
        "Malformed settings must stay byte-for-byte intact"
    );
}

#[test]
fn test_install_preserves_existing_settings_content() {
    init_test_logging();

    let fixture = SetupFixture::new();
    fs::write(
        fixture.settings_path(),
        serde_json::to_string_pretty(&serde_json::json!({
            "appearance": { "theme": "dark" },
            "hooks": {
                "PreToolUse": [
                    { "matcher": "Bash", "hooks": [{ "type": "command", "command": "other-guard" }] }
                ]
            }
        }))
        .unwrap(),
    )
    .unwrap();

    assert!(run_install(&fixture).status.success());

    let settings = fixture.read_settings();
    assert_eq!(settings["appearance"]["theme"], "dark");
    let groups = settings["hooks"]["PreToolUse"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["hooks"][0]["command"], "other-guard");
}

#[test]
fn test_install_without_claude_dir_skips_hook_registration() {
    init_test_logging();

    let fixture = SetupFixture::new();
    fs::remove_dir_all(&fixture.claude_dir).unwrap();

    let output = run_install(&fixture);
    assert!(
        output.status.success(),
        "install should succeed without Claude Code: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "skipped");

    // No config dir fabricated, but project-level files still installed.
    assert!(!fixture.claude_dir.exists());
    assert_path_exists(&fixture.project.join("vibesrails.yaml"));
    assert_path_exists(&fixture.precommit_path());
}

#[test]
fn test_uninstall_removes_registrations_keeps_project_files() {
    init_test_logging();

    let fixture = SetupFixture::new();
    assert!(run_install(&fixture).status.success());

    let output = fixture
        .command("uninstall")
        .output()
        .expect("Failed to run vrs-setup uninstall");
    assert!(
        output.status.success(),
        "uninstall failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(!fixture.precommit_path().exists());
    assert!(!fixture.hook_script_path().exists());

    let settings = fixture.read_settings();
    let groups = settings["hooks"]["PreToolUse"].as_array().unwrap();
    assert!(groups.is_empty(), "hook registration should be gone: {groups:?}");

    // Project content stays.
    assert_path_exists(&fixture.project.join("vibesrails.yaml"));
    assert_path_exists(&fixture.project.join("CLAUDE.md"));
    assert_path_exists(&fixture.project.join(".claude/hooks.json"));
}

#[test]
fn test_uninstall_dry_run_matches_real_run_on_converged_state() {
    init_test_logging();

    // An empty-but-present settings document has nothing to unregister; the
    // dry run must say so instead of predicting a change the real run would
    // not make.
    let fixture = SetupFixture::new();
    fs::write(fixture.settings_path(), "{}").unwrap();

    let output = fixture.command("uninstall").arg("--dry-run").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        !stdout.contains("would change: unregister"),
        "dry run predicted a change on converged settings: {stdout}"
    );
    assert_contains(&stdout, "up to date");

    // After an install the same dry run does predict the unregistration,
    // and still changes nothing.
    assert!(run_install(&fixture).status.success());
    let before = fs::read(fixture.settings_path()).unwrap();

    let output = fixture.command("uninstall").arg("--dry-run").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "would change: unregister");
    assert_eq!(fs::read(fixture.settings_path()).unwrap(), before);
}

#[test]
fn test_install_dry_run_predicts_abort_on_wrong_shaped_settings() {
    init_test_logging();

    let fixture = SetupFixture::new();
    fs::write(fixture.settings_path(), r#"{ "hooks": "nope" }"#).unwrap();
    let before = fs::read(fixture.settings_path()).unwrap();

    let output = fixture
        .command("install")
        .arg("--skip-package")
        .arg("--dry-run")
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "dry run should fail where the real run would abort"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_contains(&stderr, "VRS-E001");
    assert_eq!(fs::read(fixture.settings_path()).unwrap(), before);
}

#[test]
fn test_uninstall_on_clean_sandbox_is_a_noop() {
    init_test_logging();

    let fixture = SetupFixture::new();
    let output = fixture
        .command("uninstall")
        .output()
        .expect("Failed to run vrs-setup uninstall");
    assert!(output.status.success());
}

#[test]
fn test_status_reflects_install_state() {
    init_test_logging();

    let fixture = SetupFixture::new();

    let output = fixture.command("status").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "missing");

    assert!(run_install(&fixture).status.success());

    let output = fixture.command("status").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "vibesrails.yaml: present");
    assert_contains(&stdout, "registered");
    assert_contains(&stdout, ".git/hooks/pre-commit: installed");
}

#[test]
fn test_install_rejects_missing_project_directory() {
    init_test_logging();

    let fixture = SetupFixture::new();
    let missing = fixture.dir.path().join("does-not-exist");
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_vrs-setup"))
        .env("CLAUDE_CONFIG_DIR", &fixture.claude_dir)
        .arg("install")
        .arg("--skip-package")
        .arg("--project")
        .arg(&missing)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_contains(&stderr, "does not exist");
}
