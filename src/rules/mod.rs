//! Rule engine and platform variants
//!
//! - **config**: per-platform tables ([`ValidatorConfig`]) and the check bitset
//! - **platform**: the four [`Platform`] variants and their static configs
//! - **engine**: ordered checks over a tokenized message
//! - **range**: parallel validation of many commits

pub mod config;
pub mod engine;
pub mod platform;
pub mod range;

pub use config::{Check, CheckSet, ValidatorConfig, ValueShape};
pub use engine::{evaluate, validate};
pub use platform::Platform;
pub use range::{CommitInput, CommitReport, RangeReport, validate_range};

use crate::message::RawMessage;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static RE_REVERT_SUBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^Revert ".*"$"#).expect("valid regex"));

/// Stable identifier of a rule, as shown in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RuleId {
  #[serde(rename = "S1")]
  SubjectMaxLength,
  #[serde(rename = "S2")]
  SubjectNoReference,
  #[serde(rename = "B1")]
  BodyMaxLength,
  #[serde(rename = "B2")]
  BodyCrossRepoClose,
  #[serde(rename = "C1")]
  SecondLineEmpty,
  #[serde(rename = "C2")]
  MinLines,
  #[serde(rename = "C3")]
  CherryPickLast,
  #[serde(rename = "C4")]
  ExtraTrailer,
  #[serde(rename = "C5")]
  TrailerOrder,
  #[serde(rename = "C6")]
  RequiredTrailer,
  #[serde(rename = "C7")]
  SecondLineMissing,
  #[serde(rename = "F1")]
  FooterNoBlanks,
  #[serde(rename = "F2")]
  FooterInBody,
  #[serde(rename = "F3")]
  UnexpectedFooter,
  #[serde(rename = "F4")]
  FooterSpelling,
  #[serde(rename = "F5")]
  FooterSeparator,
  #[serde(rename = "F6")]
  TaskIdExpected,
  #[serde(rename = "F7")]
  ChangeIdExpected,
  #[serde(rename = "F8")]
  FooterFormat,
}

impl RuleId {
  /// Short code (`S1`, `F3`, ...)
  pub fn code(self) -> &'static str {
    match self {
      RuleId::SubjectMaxLength => "S1",
      RuleId::SubjectNoReference => "S2",
      RuleId::BodyMaxLength => "B1",
      RuleId::BodyCrossRepoClose => "B2",
      RuleId::SecondLineEmpty => "C1",
      RuleId::MinLines => "C2",
      RuleId::CherryPickLast => "C3",
      RuleId::ExtraTrailer => "C4",
      RuleId::TrailerOrder => "C5",
      RuleId::RequiredTrailer => "C6",
      RuleId::SecondLineMissing => "C7",
      RuleId::FooterNoBlanks => "F1",
      RuleId::FooterInBody => "F2",
      RuleId::UnexpectedFooter => "F3",
      RuleId::FooterSpelling => "F4",
      RuleId::FooterSeparator => "F5",
      RuleId::TaskIdExpected => "F6",
      RuleId::ChangeIdExpected => "F7",
      RuleId::FooterFormat => "F8",
    }
  }

  /// Descriptive name (`subject-max-length`, ...)
  pub fn name(self) -> &'static str {
    match self {
      RuleId::SubjectMaxLength => "subject-max-length",
      RuleId::SubjectNoReference => "subject-no-bug-or-task",
      RuleId::BodyMaxLength => "body-max-length",
      RuleId::BodyCrossRepoClose => "body-no-cross-repo-close",
      RuleId::SecondLineEmpty => "commit-second-line-empty",
      RuleId::MinLines => "commit-min-lines",
      RuleId::CherryPickLast => "cherry-pick-last-line",
      RuleId::ExtraTrailer => "extra-footer",
      RuleId::TrailerOrder => "footer-order",
      RuleId::RequiredTrailer => "footer-required",
      RuleId::SecondLineMissing => "commit-second-line-missing",
      RuleId::FooterNoBlanks => "footer-no-blanks",
      RuleId::FooterInBody => "footer-in-body",
      RuleId::UnexpectedFooter => "expected-footer-format",
      RuleId::FooterSpelling => "footer-spelling",
      RuleId::FooterSeparator => "footer-separator",
      RuleId::TaskIdExpected => "phabricator-task-id-expected",
      RuleId::ChangeIdExpected => "change-id-value-expected",
      RuleId::FooterFormat => "footer-format",
    }
  }
}

impl fmt::Display for RuleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

/// One broken rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
  pub rule_id: RuleId,
  /// 1-based line number, 0 for rules about the whole message
  pub line: usize,
  pub message: String,
}

impl Violation {
  pub fn new(rule_id: RuleId, line: usize, message: impl Into<String>) -> Self {
    Self {
      rule_id,
      line,
      message: message.into(),
    }
  }
}

/// Serialized with both the short code and the descriptive rule name
impl Serialize for Violation {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("Violation", 4)?;
    state.serialize_field("rule_id", &self.rule_id)?;
    state.serialize_field("rule", self.rule_id.name())?;
    state.serialize_field("line", &self.line)?;
    state.serialize_field("message", &self.message)?;
    state.end()
  }
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Line {}: {}", self.line, self.message)
  }
}

/// Outcome of validating one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
  pub passed: bool,
  pub violations: Vec<Violation>,
}

impl ValidationResult {
  pub fn from_violations(violations: Vec<Violation>) -> Self {
    Self {
      passed: violations.is_empty(),
      violations,
    }
  }

  pub fn pass() -> Self {
    Self::from_violations(Vec::new())
  }

  /// Violations ordered by line, then rule id
  pub fn sorted_by_line(&self) -> Vec<&Violation> {
    let mut sorted: Vec<&Violation> = self.violations.iter().collect();
    sorted.sort_by_key(|v| (v.line, v.rule_id.code()));
    sorted
  }
}

/// Facts about the commit that carry the message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitContext {
  pub is_merge: bool,
  pub is_revert: bool,
}

impl CommitContext {
  /// Derive the context from the message and the commit's parent count
  pub fn detect(message: &RawMessage, parent_count: usize) -> Self {
    Self {
      is_merge: parent_count > 1,
      is_revert: message.subject().is_some_and(is_revert_subject),
    }
  }
}

/// `Revert "..."` subjects produced by `git revert`
pub fn is_revert_subject(subject: &str) -> bool {
  RE_REVERT_SUBJECT.is_match(subject)
}
