//! Tests for the `sample` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_sample_reports_failure_rate() -> Result<()> {
  let repo = TestRepo::new()?;
  let good = repo.commit("Add the parser\n\nWith a body")?;
  let bad = repo.commit("No body here")?;
  let also_good = repo.commit("Tune the parser\n\nWith another body")?;
  let elsewhere = tempfile::TempDir::new()?;

  let repo_arg = repo.path.to_string_lossy().to_string();
  let output = run_validator(elsewhere.path(), &["sample", &repo_arg, "3", "--platform", "github"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let out = stdout(&output);
  assert!(out.starts_with("Checking the last 3 commits to "), "{out}");
  assert!(out.contains(&format!("Pass: {}\n", good)));
  assert!(out.contains(&format!("Fail: {}\nThe following errors were found:\n", bad)));
  assert!(out.contains(&format!("Pass: {}\n", also_good)));
  assert!(out.ends_with("33.33% commits failed validation.\n"), "{out}");

  Ok(())
}

#[test]
fn test_sample_skips_merges_and_limits_count() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit("Initial commit\n\nSet up")?;
  git(&repo.path, &["checkout", "-b", "topic"])?;
  repo.commit("Topic work\n\nDetails")?;
  git(&repo.path, &["checkout", "main"])?;
  repo.commit("Main work\n\nDetails")?;
  git(
    &repo.path,
    &["merge", "--no-ff", "--no-edit", "-m", "Merge branch 'topic'", "topic"],
  )?;

  let output = run_validator(&repo.path, &["sample", ".", "1", "--platform", "github"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let out = stdout(&output);
  let results: Vec<&str> = out.lines().filter(|l| l.starts_with("Pass:") || l.starts_with("Fail:")).collect();
  assert_eq!(results.len(), 1, "{out}");
  assert!(!out.contains("Merge branch"));
  assert!(out.ends_with("0.00% commits failed validation.\n"));

  Ok(())
}
