use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// A sandboxed project plus Claude config directory.
///
/// `CLAUDE_CONFIG_DIR` points the binary at the sandbox, so nothing under
/// the real `~/.claude` is ever touched.
pub struct SetupFixture {
    pub dir: TempDir,
    pub project: PathBuf,
    pub claude_dir: PathBuf,
}

impl SetupFixture {
    pub fn new() -> Self {
        crate::test_log!("FIXTURE: Creating sandboxed project and claude dir");

        let dir = TempDir::new().expect("Failed to create temp dir");
        let project = dir.path().join("project");
        let claude_dir = dir.path().join("claude");

        fs::create_dir_all(project.join(".git")).expect("Failed to create .git");
        fs::create_dir_all(&claude_dir).expect("Failed to create claude dir");

        Self {
            dir,
            project,
            claude_dir,
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.claude_dir.join("settings.json")
    }

    pub fn hook_script_path(&self) -> PathBuf {
        self.claude_dir.join("hooks").join("ptuh.py")
    }

    pub fn precommit_path(&self) -> PathBuf {
        self.project.join(".git").join("hooks").join("pre-commit")
    }

    pub fn read_settings(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.settings_path()).expect("Failed to read settings");
        serde_json::from_str(&content).expect("Settings are not valid JSON")
    }

    /// A `vrs-setup <subcommand>` invocation pointed at this sandbox.
    pub fn command(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_vrs-setup"));
        cmd.env("CLAUDE_CONFIG_DIR", &self.claude_dir)
            .arg(subcommand)
            .arg("--project")
            .arg(&self.project);
        cmd
    }
}
