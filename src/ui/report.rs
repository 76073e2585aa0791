//! Text and JSON rendering of validation reports

use crate::core::error::ValidatorResult;
use crate::rules::{CommitReport, RangeReport};
use anstyle::{AnsiColor, Style};
use std::fmt::Write;

const SUCCESS_MESSAGE: &str = "Commit message is formatted properly! Keep up the good work!";

/// Styles for text output; all plain when color is off
#[derive(Debug, Clone, Copy)]
pub struct Palette {
  error: Style,
  header: Style,
}

impl Palette {
  pub fn new(color: bool) -> Self {
    if color {
      Self {
        error: Style::new().fg_color(Some(AnsiColor::Red.into())),
        header: Style::new().bold(),
      }
    } else {
      Self {
        error: Style::new(),
        header: Style::new(),
      }
    }
  }

  /// Replace the error style; no effect when color is off
  pub fn with_error(self, error: Style) -> Self {
    if self.is_plain() {
      return self;
    }
    Self { error, ..self }
  }

  fn is_plain(&self) -> bool {
    self.error.is_plain() && self.header.is_plain()
  }

  fn paint(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
  }
}

/// Render a report the way the validator prints it on stdout
pub fn render_text(report: &RangeReport, palette: Palette) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", Palette::paint(palette.header, "commit-message-validator"));
  let _ = writeln!(out, "Using {} rules to check the commit message", report.platform);

  if report.passed {
    if report.checked > 1 {
      let _ = writeln!(out, "All {} commit messages are formatted properly! Keep up the good work!", report.checked);
    } else {
      let _ = writeln!(out, "{}", SUCCESS_MESSAGE);
    }
  } else {
    let label_commits = report.commits.len() > 1;
    for commit in report.failed() {
      render_failure(&mut out, commit, label_commits, palette);
    }
  }

  if report.skipped_merges > 0 {
    let _ = writeln!(out, "Skipped {} merge commit(s)", report.skipped_merges);
  }

  out
}

fn render_failure(out: &mut String, commit: &CommitReport, label: bool, palette: Palette) {
  if label {
    let _ = writeln!(out, "{}", Palette::paint(palette.header, &format!("Commit {}:", commit.id)));
  }
  let _ = writeln!(out, "{}", Palette::paint(palette.error, "The following errors were found:"));
  for violation in commit.result.sorted_by_line() {
    let _ = writeln!(out, "{}", Palette::paint(palette.error, &violation.to_string()));
  }
}

/// Render the errors of one failed commit without the report header
pub fn render_commit_errors(commit: &CommitReport, palette: Palette) -> String {
  let mut out = String::new();
  render_failure(&mut out, commit, false, palette);
  out
}

/// Render a report as pretty JSON
pub fn render_json(report: &RangeReport) -> ValidatorResult<String> {
  Ok(serde_json::to_string_pretty(report)?)
}
