//! System git backend
//!
//! Every call spawns `git -C <repo>` with an isolated environment so that hook
//! variables (`GIT_DIR`, `GIT_INDEX_FILE`, ...) and user aliases cannot change
//! what is read.

use crate::core::error::{GitError, ResultExt, ValidatorError, ValidatorResult};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using the system `git` binary
#[derive(Debug)]
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  pub fn open(path: &Path) -> ValidatorResult<Self> {
    let output = match Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
    {
      Ok(output) => output,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ValidatorError::Git(GitError::NotInstalled)),
      Err(e) => return Err(ValidatorError::from(e).context("Failed to execute git rev-parse")),
    };

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ValidatorError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ValidatorError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = PathBuf::from(stdout.trim());
    tracing::debug!(work_tree = %work_tree.display(), "opened repository");

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree,
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Absolute path of the `.git` directory
  pub fn git_dir(&self) -> ValidatorResult<PathBuf> {
    let stdout = self.run(&["rev-parse", "--absolute-git-dir"])?;
    Ok(PathBuf::from(stdout.trim()))
  }

  /// Read a config value, optionally from a specific file
  ///
  /// Returns `None` when the key (or the file) does not exist.
  pub fn config_get(&self, file: Option<&Path>, key: &str) -> ValidatorResult<Option<String>> {
    let mut cmd = self.git_cmd();
    cmd.arg("config");
    if let Some(file) = file {
      cmd.arg("--file").arg(file);
    }
    cmd.args(["--get", key]);

    let output = cmd.output().context("Failed to run git config")?;
    // Exit status 1 means the key is not set
    if output.status.code() == Some(1) {
      return Ok(None);
    }
    if !output.status.success() {
      return Err(command_failed("git config --get", &output.stderr));
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(Some(value))
  }

  /// Whether git would color output for a `color.*` setting
  ///
  /// `auto` (and an unset key, through `color.ui`) resolves against
  /// `stdout_is_tty`.
  pub fn config_colorbool(&self, name: &str, stdout_is_tty: bool) -> ValidatorResult<bool> {
    let mut cmd = self.git_cmd();
    // git treats a missing TERM as a dumb terminal
    if let Ok(term) = std::env::var("TERM") {
      cmd.env("TERM", term);
    }
    cmd.args(["config", "--get-colorbool", name, if stdout_is_tty { "true" } else { "false" }]);

    let output = cmd.output().context("Failed to run git config")?;
    if !output.status.success() {
      return Err(command_failed("git config --get-colorbool", &output.stderr));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim() == "true")
  }

  /// Configured remotes as `(name, url)` pairs
  pub fn remote_urls(&self) -> ValidatorResult<Vec<(String, String)>> {
    let output = self
      .git_cmd()
      .args(["config", "--get-regexp", r"^remote\..*\.url$"])
      .output()
      .context("Failed to list remotes")?;

    if output.status.code() == Some(1) {
      return Ok(Vec::new());
    }
    if !output.status.success() {
      return Err(command_failed("git config --get-regexp", &output.stderr));
    }

    Ok(parse_remote_urls(&String::from_utf8_lossy(&output.stdout)))
  }

  /// Run a git command and return stdout
  pub(crate) fn run(&self, args: &[&str]) -> ValidatorResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
      return Err(command_failed(&format!("git {}", args.join(" ")), &output.stderr));
    }

    Ok(String::from_utf8(output.stdout)?)
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false");
    cmd.arg("-c").arg("log.showSignature=false");
    cmd.arg("-c").arg("i18n.logOutputEncoding=UTF-8");

    cmd
  }
}

pub(crate) fn command_failed(command: &str, stderr: &[u8]) -> ValidatorError {
  ValidatorError::Git(GitError::CommandFailed {
    command: command.to_string(),
    stderr: String::from_utf8_lossy(stderr).trim().to_string(),
  })
}

/// Parse `git config --get-regexp` output (`remote.<name>.url <url>` per line)
fn parse_remote_urls(output: &str) -> Vec<(String, String)> {
  output
    .lines()
    .filter_map(|line| {
      let (label, url) = line.split_once(' ')?;
      let name = label.strip_prefix("remote.")?.strip_suffix(".url")?;
      Some((name.to_string(), url.trim().to_string()))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_remote_urls() {
    let output = "remote.origin.url https://github.com/example/project.git\n\
                  remote.gerrit.url ssh://user@gerrit.wikimedia.org:29418/mediawiki/core\n\
                  remote.with.dots.url /srv/mirror\n\
                  garbage\n";
    let remotes = parse_remote_urls(output);
    assert_eq!(
      remotes,
      vec![
        (
          "origin".to_string(),
          "https://github.com/example/project.git".to_string()
        ),
        (
          "gerrit".to_string(),
          "ssh://user@gerrit.wikimedia.org:29418/mediawiki/core".to_string()
        ),
        ("with.dots".to_string(), "/srv/mirror".to_string()),
      ]
    );
  }

  #[test]
  fn test_parse_remote_urls_empty() {
    assert!(parse_remote_urls("").is_empty());
  }
}
