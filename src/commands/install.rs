//! Install the validator as a git hook

use crate::core::error::{ValidationError, ValidatorError, ValidatorResult};
use crate::core::vcs::SystemGit;
use crate::utils::{path_to_git_format, shell_quote};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Markers that identify a hook line written by this tool
const HOOK_MARKERS: [&str; 2] = ["commit-message-validator", "commit_message_validator"];

/// Which hook to install
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HookKind {
  /// Check HEAD after every commit
  #[default]
  PostCommit,
  /// Check the message before the commit is recorded
  CommitMsg,
}

impl HookKind {
  pub fn file_name(self) -> &'static str {
    match self {
      HookKind::PostCommit => "post-commit",
      HookKind::CommitMsg => "commit-msg",
    }
  }

  /// Shell command the hook runs for the given executable
  pub fn command_line(self, exe: &Path) -> String {
    let exe = shell_quote(&path_to_git_format(exe));
    match self {
      HookKind::PostCommit => format!("{} validate", exe),
      HookKind::CommitMsg => format!("{} validate --file \"$1\"", exe),
    }
  }
}

/// What happened to the hook file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
  Created(PathBuf),
  Appended(PathBuf),
  AlreadyInstalled(PathBuf),
}

/// Run the install-hook command
pub fn run_install(hook: HookKind) -> ValidatorResult<()> {
  let git = SystemGit::open(&std::env::current_dir()?)?;
  let hooks_dir = git.git_dir()?.join("hooks");
  let exe = std::env::current_exe()?;
  let command = hook.command_line(&exe);

  println!("Will install a git hook that runs: {}", command);

  match install_hook(&hooks_dir, hook, &command)? {
    HookOutcome::Created(path) | HookOutcome::Appended(path) => {
      println!("Installed commit-message-validator in {}", path.display());
      Ok(())
    }
    HookOutcome::AlreadyInstalled(path) => Err(ValidatorError::Validation(
      ValidationError::HookAlreadyInstalled { path },
    )),
  }
}

/// Write `command` into `<hooks_dir>/<hook>`
pub fn install_hook(hooks_dir: &Path, hook: HookKind, command: &str) -> anyhow::Result<HookOutcome> {
  let path = hooks_dir.join(hook.file_name());

  if path.exists() {
    let existing =
      fs::read_to_string(&path).with_context(|| format!("Failed to read existing hook {}", path.display()))?;
    if HOOK_MARKERS.iter().any(|marker| existing.contains(marker)) {
      tracing::debug!(path = %path.display(), "hook already runs the validator");
      return Ok(HookOutcome::AlreadyInstalled(path));
    }

    let mut content = existing;
    if !content.ends_with('\n') {
      content.push('\n');
    }
    content.push_str(command);
    content.push('\n');
    fs::write(&path, content).with_context(|| format!("Failed to append to hook {}", path.display()))?;
    return Ok(HookOutcome::Appended(path));
  }

  fs::create_dir_all(hooks_dir).with_context(|| format!("Failed to create {}", hooks_dir.display()))?;
  fs::write(&path, format!("#!/bin/sh\n{}\n", command))
    .with_context(|| format!("Failed to write hook {}", path.display()))?;
  make_executable(&path)?;

  Ok(HookOutcome::Created(path))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> anyhow::Result<()> {
  use std::os::unix::fs::PermissionsExt;

  fs::set_permissions(path, fs::Permissions::from_mode(0o755))
    .with_context(|| format!("Failed to make {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> anyhow::Result<()> {
  Ok(())
}
