//! Sample recent commits of a repository

use super::validate::resolve_platform;
use crate::core::config::ValidatorSettings;
use crate::core::error::ValidatorResult;
use crate::core::vcs::{CommitSelection, SystemGit};
use crate::rules::{Platform, RangeReport, validate_range};
use crate::ui::{Palette, render_commit_errors};
use std::fmt::Write;
use std::path::Path;

/// Run the sample command
///
/// Sampling is informational: failing commits do not make the command fail.
pub fn run_sample(repo: &Path, count: usize, platform: Option<Platform>) -> ValidatorResult<()> {
  let git = SystemGit::open(repo)?;
  let settings = ValidatorSettings::load(git.work_tree())?;
  let platform = resolve_platform(platform, &settings, Some(&git))?;

  println!("Checking the last {} commits to {}", count, git.work_tree().display());

  let commits = git.commits(CommitSelection::RecentNonMerge(count))?;
  let report = validate_range(&commits, platform);
  print!("{}", render_sample(&report));
  Ok(())
}

/// `Pass:`/`Fail:` lines per commit followed by the failure rate
pub fn render_sample(report: &RangeReport) -> String {
  let mut out = String::new();
  if report.commits.is_empty() {
    let _ = writeln!(out, "No commits to sample.");
    return out;
  }

  let mut failed = 0usize;
  for commit in &report.commits {
    if commit.result.passed {
      let _ = writeln!(out, "Pass: {}", commit.id);
    } else {
      failed += 1;
      let _ = writeln!(out, "Fail: {}", commit.id);
      let _ = writeln!(out, "{}", render_commit_errors(commit, Palette::new(false)));
    }
  }

  let rate = failed as f64 / report.commits.len() as f64 * 100.0;
  let _ = writeln!(out, "{:.2}% commits failed validation.", rate);
  out
}
