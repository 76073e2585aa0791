//! Commit message model
//!
//! - **RawMessage**: the captured lines of a commit message
//! - **trailer**: the `Key: value` trailer grammar and key classification
//! - **tokenizer**: splits a message into subject, body and trailer block

pub mod tokenizer;
pub mod trailer;

pub use tokenizer::{TokenizedMessage, TrailerEntry, tokenize};
pub use trailer::{TrailerKeyClass, TrailerLine};

/// Marker git writes above the diff in `git commit --verbose`
const SCISSORS_LINE: &str = "# ------------------------ >8 ------------------------";

/// A commit message as an ordered list of lines
///
/// Line terminators are not stored. The message is never rewritten in place;
/// [`RawMessage::cleanup`] returns a new message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
  lines: Vec<String>,
}

/// A borrowed line of a [`RawMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
  /// 1-based line number
  pub number: usize,
  pub text: &'a str,
}

impl Line<'_> {
  /// Empty or whitespace-only
  pub fn is_blank(&self) -> bool {
    self.text.trim().is_empty()
  }

  /// Length in characters (not bytes)
  pub fn char_len(&self) -> usize {
    self.text.chars().count()
  }
}

impl RawMessage {
  /// Capture lines as given, minus one trailing empty line
  pub fn new(lines: Vec<String>) -> Self {
    Self {
      lines: without_split_artifact(lines),
    }
  }

  /// Split message text into lines (`\n` and `\r\n` terminators)
  ///
  /// A message ending in a blank line (`git log --format=%B` of a commit
  /// recorded with `--cleanup=verbatim`) loses that one empty line.
  pub fn from_text(text: &str) -> Self {
    Self::new(text.lines().map(String::from).collect())
  }

  /// Iterate over numbered lines
  pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
    self.lines.iter().enumerate().map(|(idx, text)| Line {
      number: idx + 1,
      text: text.as_str(),
    })
  }

  /// Get a line by 1-based line number
  pub fn line(&self, number: usize) -> Option<Line<'_>> {
    let idx = number.checked_sub(1)?;
    self.lines.get(idx).map(|text| Line {
      number,
      text: text.as_str(),
    })
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn as_lines(&self) -> &[String] {
    &self.lines
  }

  /// First line, if any
  pub fn subject(&self) -> Option<&str> {
    self.lines.first().map(String::as_str)
  }

  /// Apply `git commit --cleanup=strip` semantics
  ///
  /// Comment lines (`#`) are dropped, everything below the verbose-commit
  /// scissors line is discarded, trailing whitespace is stripped, runs of blank
  /// lines collapse into one and leading/trailing blank lines are removed.
  pub fn cleanup(&self) -> Self {
    let mut lines: Vec<String> = Vec::with_capacity(self.lines.len());

    for line in &self.lines {
      if line == SCISSORS_LINE {
        break;
      }
      if line.starts_with('#') {
        continue;
      }

      let trimmed = line.trim_end();
      if trimmed.is_empty() && lines.last().is_none_or(|prev| prev.is_empty()) {
        continue;
      }
      lines.push(trimmed.to_string());
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
      lines.pop();
    }

    Self { lines }
  }
}

fn without_split_artifact(mut lines: Vec<String>) -> Vec<String> {
  if lines.last().is_some_and(|l| l.is_empty()) {
    lines.pop();
  }
  lines
}

impl From<&str> for RawMessage {
  fn from(text: &str) -> Self {
    Self::from_text(text)
  }
}
