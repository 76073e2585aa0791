//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const CHANGE_ID: &str = "I0123456789abcdef0123456789abcdef01234567";

/// A throwaway git repository
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestRepo {
  /// Create an empty repository with a committer identity
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;

    Ok(Self { _root: root, path })
  }

  /// Record an empty commit with exactly this message
  pub fn commit(&self, message: &str) -> Result<String> {
    git(
      &self.path,
      &["commit", "--allow-empty", "--cleanup=verbatim", "-m", message],
    )?;
    self.rev_parse("HEAD")
  }

  /// Resolve a revision to its full id
  pub fn rev_parse(&self, rev: &str) -> Result<String> {
    let output = git(&self.path, &["rev-parse", rev])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Write a file relative to the repository root
  pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
    let file = self.path.join(path);
    if let Some(parent) = file.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file, content)?;
    Ok(file)
  }

  /// Read a file relative to the repository root
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// A valid Gerrit-style message
pub fn gerrit_message(subject: &str) -> String {
  format!("{}\n\nExplain the change.\n\nBug: T12345\nChange-Id: {}", subject, CHANGE_ID)
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the validator binary; non-zero exits are returned, not turned into errors
pub fn run_validator(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_commit-message-validator");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("COMMIT_VALIDATOR_LOG")
    .env_remove("NO_COLOR")
    .output()
    .context("Failed to run commit-message-validator")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
