//! Commit walking for SystemGit

use super::system_git::{SystemGit, command_failed};
use crate::core::error::{GitError, ResultExt, ValidatorError, ValidatorResult};
use crate::message::RawMessage;
use crate::rules::{CommitContext, CommitInput};

/// `%H` (hash), `%P` (parent hashes), `%B` (raw body); records are NUL separated with `-z`
const LOG_FORMAT: &str = "--format=%H%n%P%n%B";

/// Which commits to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitSelection<'a> {
  /// One revision
  Single(&'a str),
  /// A revision range such as `origin/main..HEAD`
  Range(&'a str),
  /// The most recent `count` non-merge commits reachable from `HEAD`
  RecentNonMerge(usize),
}

impl SystemGit {
  /// Read commits with their messages and merge/revert context in one `git log`
  ///
  /// Commits are returned newest first, as `git log` lists them.
  pub fn commits(&self, selection: CommitSelection<'_>) -> ValidatorResult<Vec<CommitInput>> {
    let mut cmd = self.git_cmd();
    cmd.args(["log", "-z", LOG_FORMAT]);

    let label = match selection {
      CommitSelection::Single(rev) => {
        self.verify_revision(rev)?;
        cmd.args(["-1", rev, "--"]);
        rev.to_string()
      }
      CommitSelection::Range(range) => {
        cmd.args([range, "--"]);
        range.to_string()
      }
      CommitSelection::RecentNonMerge(count) => {
        cmd.arg("--no-merges").arg(format!("--max-count={}", count));
        cmd.args(["HEAD", "--"]);
        "HEAD".to_string()
      }
    };

    let output = cmd.output().context("Failed to run git log")?;
    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("unknown revision") || stderr.contains("bad revision") {
        return Err(ValidatorError::Git(GitError::RevisionNotFound { rev: label }));
      }
      return Err(command_failed("git log", &output.stderr));
    }

    let stdout = String::from_utf8(output.stdout)?;
    let commits = parse_log(&stdout);
    tracing::debug!(selection = %label, count = commits.len(), "read commits");
    Ok(commits)
  }

  /// Read a single commit
  pub fn commit_input(&self, rev: &str) -> ValidatorResult<CommitInput> {
    self
      .commits(CommitSelection::Single(rev))?
      .into_iter()
      .next()
      .ok_or_else(|| ValidatorError::Git(GitError::RevisionNotFound { rev: rev.to_string() }))
  }

  /// Right-most parent of a merge commit, `None` for ordinary commits
  pub fn last_parent(&self, rev: &str) -> ValidatorResult<Option<String>> {
    self.verify_revision(rev)?;
    let parents = self.run(&["log", "-1", "--format=%P", rev, "--"])?;
    Ok(last_merge_parent(&parents))
  }

  /// Ensure a revision names a commit
  fn verify_revision(&self, rev: &str) -> ValidatorResult<()> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet"])
      .arg(format!("{}^{{commit}}", rev))
      .output()
      .context("Failed to run git rev-parse")?;

    if !output.status.success() {
      return Err(ValidatorError::Git(GitError::RevisionNotFound { rev: rev.to_string() }));
    }
    Ok(())
  }
}

fn last_merge_parent(parents: &str) -> Option<String> {
  let parents: Vec<&str> = parents.split_whitespace().collect();
  if parents.len() > 1 {
    parents.last().map(|p| p.to_string())
  } else {
    None
  }
}

/// Parse `git log -z --format=%H%n%P%n%B` output
fn parse_log(stdout: &str) -> Vec<CommitInput> {
  stdout
    .split('\0')
    .filter(|record| !record.trim().is_empty())
    .filter_map(|record| {
      let record = record.trim_start_matches('\n');
      let mut parts = record.splitn(3, '\n');
      let id = parts.next()?.trim().to_string();
      let parent_count = parts.next()?.split_whitespace().count();
      let message = RawMessage::from_text(parts.next().unwrap_or(""));
      let context = CommitContext::detect(&message, parent_count);

      Some(CommitInput { id, message, context })
    })
    .collect()
}
