//! Tests for the `validate` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_valid_head_passes() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit(&gerrit_message("Add the widget parser"))?;

  let output = run_validator(&repo.path, &["--platform", "gerrit"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let out = stdout(&output);
  assert!(out.contains("Using Gerrit rules to check the commit message"));
  assert!(out.contains("Commit message is formatted properly! Keep up the good work!"));

  Ok(())
}

#[test]
fn test_invalid_head_fails_with_exit_one() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit("Fix stuff")?;

  let output = run_validator(&repo.path, &["validate", "--platform", "gerrit", "--color", "never"])?;
  assert_eq!(output.status.code(), Some(1));

  let out = stdout(&output);
  assert!(out.contains("The following errors were found:"));
  assert!(out.contains("Line 0: Expected a blank line after the subject"));
  assert!(out.contains("Line 0: Expected at least 3 lines"));

  let err = stderr(&output);
  assert!(err.contains("1 commit message does not follow the Gerrit conventions"));
  assert!(err.contains("https://www.mediawiki.org/wiki/Gerrit/Commit_message_guidelines"));

  Ok(())
}

#[test]
fn test_lint_alias_and_rev() -> Result<()> {
  let repo = TestRepo::new()?;
  let first = repo.commit("Broken first commit")?;
  repo.commit("Second commit\n\nBody text")?;

  let head = run_validator(&repo.path, &["lint", "--platform", "github"])?;
  assert!(head.status.success(), "stdout: {}", stdout(&head));

  let older = run_validator(&repo.path, &["lint", "--platform", "github", "--rev", &first])?;
  assert_eq!(older.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
  let repo = TestRepo::new()?;
  let id = repo.commit("Subject\nnot blank\n\nBody")?;

  let output = run_validator(&repo.path, &["--platform", "github", "--json"])?;
  assert_eq!(output.status.code(), Some(1));

  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(report["platform"], "github");
  assert_eq!(report["passed"], false);
  assert_eq!(report["commits"][0]["id"], id.as_str());
  assert_eq!(report["commits"][0]["violations"][0]["rule_id"], "C1");
  assert_eq!(report["commits"][0]["violations"][0]["line"], 2);

  Ok(())
}

#[test]
fn test_range_skips_merges() -> Result<()> {
  let repo = TestRepo::new()?;
  let base = repo.commit("Initial commit\n\nSet up the repository")?;

  git(&repo.path, &["checkout", "-b", "topic"])?;
  repo.commit("Topic change\n\nDo the topic thing")?;
  git(&repo.path, &["checkout", "main"])?;
  repo.commit("Main change\n\nDo the main thing")?;
  git(
    &repo.path,
    &["merge", "--no-ff", "--no-edit", "-m", "Merge branch 'topic'", "topic"],
  )?;

  let range = format!("{}..HEAD", base);
  let output = run_validator(&repo.path, &["--platform", "github", "--range", &range])?;
  assert!(output.status.success(), "stdout: {}", stdout(&output));

  let out = stdout(&output);
  assert!(out.contains("All 2 commit messages are formatted properly!"), "{out}");
  assert!(out.contains("Skipped 1 merge commit(s)"), "{out}");

  Ok(())
}

#[test]
fn test_merge_head_validates_merged_commit() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit("Initial commit\n\nSet up the repository")?;

  git(&repo.path, &["checkout", "-b", "topic"])?;
  repo.commit("Bad topic commit")?;
  git(&repo.path, &["checkout", "main"])?;
  repo.commit("Main change\n\nDo the main thing")?;
  git(
    &repo.path,
    &["merge", "--no-ff", "--no-edit", "-m", "Merge branch 'topic'", "topic"],
  )?;

  let output = run_validator(&repo.path, &["--platform", "github"])?;
  assert_eq!(output.status.code(), Some(1), "stdout: {}", stdout(&output));
  assert!(stdout(&output).contains("Expected a blank line after the subject"));

  Ok(())
}

#[test]
fn test_unknown_revision() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit("Initial commit\n\nBody")?;

  let output = run_validator(&repo.path, &["--rev", "does-not-exist"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Revision not found: does-not-exist"));

  Ok(())
}

#[test]
fn test_message_file_mode() -> Result<()> {
  let repo = TestRepo::new()?;
  let good = repo.write_file(
    "COMMIT_EDITMSG",
    "Add the widget parser\n\n# Please enter the commit message for your changes.\nExplain it.\n",
  )?;

  let output = run_validator(
    &repo.path,
    &["--platform", "github", "--file", &good.to_string_lossy()],
  )?;
  assert!(output.status.success(), "stdout: {}", stdout(&output));

  let bad = repo.write_file("BAD_MSG", "Close other/repo#12 in subject\nsecond line\n")?;
  let output = run_validator(&repo.path, &["--platform", "github", "--file", &bad.to_string_lossy()])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).contains("Line 2: Second line should be empty"));

  Ok(())
}

#[test]
fn test_missing_message_file() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_validator(&repo.path, &["--file", "nope.txt", "--platform", "gerrit"])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("Commit message file not found"));

  Ok(())
}

#[test]
fn test_platform_from_config_file() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file(".commit-validator.toml", "[validator]\nplatform = \"generic\"\n")?;
  repo.commit("Short subject\n\nAny: trailer is fine here")?;

  let output = run_validator(&repo.path, &[])?;
  assert!(output.status.success(), "stdout: {}", stdout(&output));
  assert!(stdout(&output).contains("Using Generic rules"));

  Ok(())
}

#[test]
fn test_invalid_config_file() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file("commit-validator.toml", "[validator]\nplatform = \"bitbucket\"\n")?;
  repo.commit("Short subject\n\nBody")?;

  let output = run_validator(&repo.path, &[])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("Invalid configuration"));

  Ok(())
}

#[test]
fn test_platform_detected_from_remote() -> Result<()> {
  let repo = TestRepo::new()?;
  git(
    &repo.path,
    &["remote", "add", "origin", "https://github.com/example/project.git"],
  )?;
  repo.commit("Add feature\n\nCo-authored-by: Someone <someone@example.com>")?;

  let output = run_validator(&repo.path, &[])?;
  assert!(output.status.success(), "stdout: {}", stdout(&output));
  assert!(stdout(&output).contains("Using GitHub rules"));

  Ok(())
}

#[test]
fn test_platform_detected_from_gitreview() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_file(
    ".gitreview",
    "[gerrit]\nhost=gerrit.wikimedia.org\nport=29418\nproject=mediawiki/core.git\n",
  )?;
  repo.commit(&gerrit_message("Add the widget parser"))?;

  let output = run_validator(&repo.path, &["--json"])?;
  assert!(output.status.success(), "stdout: {}", stdout(&output));

  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(report["platform"], "gerrit");

  Ok(())
}

#[test]
fn test_outside_repository() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_validator(dir.path(), &["--platform", "gerrit"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Git repository not found"));

  Ok(())
}

#[test]
fn test_trailing_blank_line_keeps_footer() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit(&format!("Fix bug\n\nBug: T12345\nChange-Id: {}\n\n", CHANGE_ID))?;

  let output = run_validator(&repo.path, &["--platform", "gerrit"])?;
  assert!(output.status.success(), "stdout: {}", stdout(&output));

  Ok(())
}

#[test]
fn test_git_color_config() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit("Fix stuff")?;

  let plain = run_validator(&repo.path, &["--platform", "github"])?;
  assert!(!stdout(&plain).contains("\u{1b}["));

  git(&repo.path, &["config", "color.commit_message_validator", "always"])?;
  let red = run_validator(&repo.path, &["--platform", "github"])?;
  assert_eq!(red.status.code(), Some(1));
  assert!(stdout(&red).contains("\u{1b}[31mThe following errors were found:"));

  git(&repo.path, &["config", "color.commit_message_validator.error", "blue"])?;
  let blue = run_validator(&repo.path, &["--platform", "github"])?;
  assert!(stdout(&blue).contains("\u{1b}[34mThe following errors were found:"));

  let never = run_validator(&repo.path, &["--platform", "github", "--color", "never"])?;
  assert!(!stdout(&never).contains("\u{1b}["));

  Ok(())
}
