//! Common test utilities and fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path of the compiled binary under test.
pub fn tokbudget_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tokbudget"))
}

/// Creates a temporary directory for test fixtures.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Creates a project tree from `(relative path, contents)` pairs.
pub fn create_mock_project(dir: &TempDir, files: &[(&str, &[u8])]) -> PathBuf {
    let root = dir.path().to_path_buf();

    for (path, content) in files {
        let file_path = root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    root
}

/// The four-file tree used by the end-to-end scenarios.
pub fn mixed_project_files() -> Vec<(&'static str, &'static [u8])> {
    vec![
        (
            "a.py",
            &b"def greet(name):\n    return f\"Hello, {name}! Welcome to the project.\"\n"[..],
        ),
        ("b.md", &b"# Title\n\nShort note.\n"[..]),
        (".hidden/c.py", &b"SECRET_VALUE = 'do not count me'\n"[..]),
        ("d.bin", &b"\x00\x01\x02\xff binary payload"[..]),
    ]
}

/// Runs the CLI from `cwd` with an isolated config environment.
///
/// `config_home` stands in for the user config directory so a developer's
/// own `~/.config/tokbudget/config.toml` cannot leak into the test.
pub fn run_cli(cwd: &Path, config_home: &Path, args: &[&str]) -> Output {
    run_cli_with_env(cwd, config_home, args, &[])
}

/// Like [`run_cli`], with extra environment variables set for the child.
pub fn run_cli_with_env(
    cwd: &Path,
    config_home: &Path,
    args: &[&str],
    envs: &[(&str, &str)],
) -> Output {
    Command::new(tokbudget_bin())
        .args(args)
        .current_dir(cwd)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG")
        .env_remove("TOKBUDGET_MODEL")
        .env_remove("TOKBUDGET_INCLUDE_HIDDEN")
        .env_remove("TOKBUDGET_CONFIG")
        .env_remove("TOKBUDGET_GENERAL__MODEL")
        .envs(envs.iter().copied())
        .output()
        .expect("Failed to execute command")
}

/// Expected listing line for one file.
pub fn listing_line(tokens: usize, path: &Path) -> String {
    format!("{:>8}  {}", tokens, path.display())
}
