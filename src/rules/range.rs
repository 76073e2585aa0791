//! Multi-commit validation

use super::platform::Platform;
use super::{CommitContext, ValidationResult, Violation, validate};
use crate::message::RawMessage;
use rayon::prelude::*;
use serde::Serialize;

/// One commit to validate
#[derive(Debug, Clone)]
pub struct CommitInput {
  /// Commit id or any label the caller wants reported back
  pub id: String,
  pub message: RawMessage,
  pub context: CommitContext,
}

/// Result for one commit
#[derive(Debug, Clone, Serialize)]
pub struct CommitReport {
  pub id: String,
  pub skipped: bool,
  #[serde(flatten)]
  pub result: ValidationResult,
}

/// Result for a range of commits
#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
  pub platform: Platform,
  pub passed: bool,
  /// Commits evaluated (merges excluded)
  pub checked: usize,
  pub skipped_merges: usize,
  pub commits: Vec<CommitReport>,
}

impl RangeReport {
  /// Violations tagged with their commit id, in commit order
  pub fn violations(&self) -> impl Iterator<Item = (&str, &Violation)> {
    self
      .commits
      .iter()
      .flat_map(|c| c.result.violations.iter().map(move |v| (c.id.as_str(), v)))
  }

  pub fn failed(&self) -> impl Iterator<Item = &CommitReport> {
    self.commits.iter().filter(|c| !c.result.passed)
  }
}

/// Validate every commit independently, preserving input order
pub fn validate_range(commits: &[CommitInput], platform: Platform) -> RangeReport {
  let commits: Vec<CommitReport> = commits
    .par_iter()
    .map(|commit| {
      let result = validate(&commit.message, &commit.context, platform);
      tracing::debug!(commit = %commit.id, passed = result.passed, "validated commit");
      CommitReport {
        id: commit.id.clone(),
        skipped: commit.context.is_merge,
        result,
      }
    })
    .collect();

  let skipped_merges = commits.iter().filter(|c| c.skipped).count();

  RangeReport {
    platform,
    passed: commits.iter().all(|c| c.result.passed),
    checked: commits.len() - skipped_merges,
    skipped_merges,
    commits,
  }
}
