//! Tests for the `install-hook` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_install_creates_post_commit_hook() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_validator(&repo.path, &["install-hook"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let out = stdout(&output);
  assert!(out.contains("Will install a git hook that runs:"));
  assert!(out.contains("Installed commit-message-validator in"));

  let hook = repo.read_file(".git/hooks/post-commit")?;
  assert!(hook.starts_with("#!/bin/sh\n"));
  assert!(hook.contains("commit-message-validator"));
  assert!(hook.trim_end().ends_with(" validate"));

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    let mode = std::fs::metadata(repo.path.join(".git/hooks/post-commit"))?
      .permissions()
      .mode();
    assert_eq!(mode & 0o111, 0o111);
  }

  Ok(())
}

#[test]
fn test_install_commit_msg_hook() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_validator(&repo.path, &["install", "--hook", "commit-msg"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let hook = repo.read_file(".git/hooks/commit-msg")?;
  assert!(hook.contains("validate --file \"$1\""));

  Ok(())
}

#[test]
fn test_install_appends_to_existing_hook() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file(".git/hooks/post-commit", "#!/bin/sh\necho committed\n")?;

  let output = run_validator(&repo.path, &["install-hook"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let hook = repo.read_file(".git/hooks/post-commit")?;
  assert!(hook.starts_with("#!/bin/sh\necho committed\n"));
  assert!(hook.contains("commit-message-validator"));

  Ok(())
}

#[test]
fn test_install_twice_reports_existing_hook() -> Result<()> {
  let repo = TestRepo::new()?;

  let first = run_validator(&repo.path, &["install-hook"])?;
  assert!(first.status.success());
  let before = repo.read_file(".git/hooks/post-commit")?;

  let second = run_validator(&repo.path, &["install-hook"])?;
  assert_eq!(second.status.code(), Some(1));
  assert!(stderr(&second).contains("commit-message-validator git hook is already installed"));
  assert_eq!(repo.read_file(".git/hooks/post-commit")?, before);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_installed_commit_msg_hook_rejects_bad_message() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file(".commit-validator.toml", "[validator]\nplatform = \"github\"\n")?;
  run_validator(&repo.path, &["install-hook", "--hook", "commit-msg"])?;

  let rejected = std::process::Command::new("git")
    .current_dir(&repo.path)
    .args(["commit", "--allow-empty", "-m", "Bad subject\nno blank line"])
    .output()?;
  assert!(!rejected.status.success());

  git(
    &repo.path,
    &["commit", "--allow-empty", "-m", "Good subject\n\nWith a body"],
  )?;

  Ok(())
}
