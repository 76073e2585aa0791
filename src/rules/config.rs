//! Static validator configuration
//!
//! A [`ValidatorConfig`] is pure data: which trailer keys exist, how alternate
//! spellings map onto them, which value grammar each key follows, and which
//! checks are active. Platforms differ only in this data; the check logic in
//! [`super::engine`] is shared.

use crate::message::TrailerKeyClass;
use regex::Regex;
use std::sync::LazyLock;

static RE_TASK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^T[0-9]+$").expect("valid regex"));
static RE_CHANGE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^I[a-f0-9]{40}$").expect("valid regex"));
static RE_PULL_REQUEST: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(?:[\w.-]+/[\w.-]+)?#[0-9]+$").expect("valid regex"));
static RE_MERGE_REQUEST: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(?:[\w.-]+(?:/[\w.-]+)+)?![0-9]+$").expect("valid regex"));

/// One rule-engine check, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
  SubjectLength,
  SubjectReference,
  SecondLine,
  MinLines,
  BodyLength,
  CrossRepoClose,
  TrailerFormat,
  KeySpelling,
  KeyAllowList,
  ValueShape,
  Cardinality,
  Ordering,
  TrailerBlankLines,
  FooterInBody,
  CherryPickLast,
}

impl Check {
  /// Every check in the order the engine evaluates them
  pub const ALL: [Check; 15] = [
    Check::SubjectLength,
    Check::SubjectReference,
    Check::SecondLine,
    Check::MinLines,
    Check::BodyLength,
    Check::CrossRepoClose,
    Check::TrailerFormat,
    Check::KeySpelling,
    Check::KeyAllowList,
    Check::ValueShape,
    Check::Cardinality,
    Check::Ordering,
    Check::TrailerBlankLines,
    Check::FooterInBody,
    Check::CherryPickLast,
  ];

  fn bit(self) -> u32 {
    1 << (self as u32)
  }
}

/// Bitset of active checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSet(u32);

impl CheckSet {
  pub const fn empty() -> Self {
    Self(0)
  }

  pub fn all() -> Self {
    Check::ALL.iter().fold(Self::empty(), |set, check| set.with(*check))
  }

  /// Structural checks only: subject, second line, minimum length, body wrapping
  pub fn structural() -> Self {
    Self::empty()
      .with(Check::SubjectLength)
      .with(Check::SecondLine)
      .with(Check::MinLines)
      .with(Check::BodyLength)
  }

  pub fn with(self, check: Check) -> Self {
    Self(self.0 | check.bit())
  }

  pub fn without(self, check: Check) -> Self {
    Self(self.0 & !check.bit())
  }

  pub fn contains(self, check: Check) -> bool {
    self.0 & check.bit() != 0
  }
}

/// How an alternate key spelling relates to its canonical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynonymKind {
  /// Wrong spelling; reported and then treated as the canonical key
  Disallowed,
  /// Legitimate key that behaves like the canonical key for value and ordering rules
  Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySynonym {
  pub spelling: &'static str,
  pub canonical: &'static str,
  pub kind: SynonymKind,
}

/// Grammar a trailer value must follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
  /// A single Phabricator task id (`T12345`)
  TaskId,
  /// A single Gerrit change id (`I` + 40 hex)
  ChangeId,
  /// A change id or a GitHub reference (`#12`, `owner/repo#12`)
  ChangeIdOrPullRequest,
  /// A change id or a GitLab merge request reference (`!12`, `group/project!12`)
  ChangeIdOrMergeRequest,
}

impl ValueShape {
  /// Check a value, allowing up to two trailing spaces (markdown line break)
  pub fn matches(self, value: &str) -> bool {
    let token = value
      .strip_suffix("  ")
      .or_else(|| value.strip_suffix(' '))
      .unwrap_or(value);

    match self {
      ValueShape::TaskId => RE_TASK_ID.is_match(token),
      ValueShape::ChangeId => RE_CHANGE_ID.is_match(token),
      ValueShape::ChangeIdOrPullRequest => RE_CHANGE_ID.is_match(token) || RE_PULL_REQUEST.is_match(token),
      ValueShape::ChangeIdOrMergeRequest => RE_CHANGE_ID.is_match(token) || RE_MERGE_REQUEST.is_match(token),
    }
  }

  pub fn describe(self) -> &'static str {
    match self {
      ValueShape::TaskId => "a single phabricator task ID",
      ValueShape::ChangeId => "a single Gerrit change id",
      ValueShape::ChangeIdOrPullRequest => "a single Gerrit change id or GitHub reference",
      ValueShape::ChangeIdOrMergeRequest => "a single Gerrit change id or GitLab merge request reference",
    }
  }
}

/// Immutable per-platform validation tables
#[derive(Debug)]
pub struct ValidatorConfig {
  /// Documented trailer keys, in the documented spelling
  pub allowed_keys: Vec<&'static str>,
  pub key_synonyms: Vec<KeySynonym>,
  /// Report keys outside `allowed_keys`
  pub closed_key_set: bool,
  pub value_shapes: Vec<(&'static str, ValueShape)>,
  /// `(before, after)`: every `before` trailer must precede every `after` trailer
  pub ordering: Vec<(&'static str, &'static str)>,
  pub required_keys: Vec<&'static str>,
  pub max_occurrences: Vec<(&'static str, usize)>,
  /// Subject lines matching this carry a task reference that belongs in the trailers
  pub subject_reference: Option<Regex>,
  /// Closing keywords aimed at another repository
  pub cross_repo_close: Option<Regex>,
  pub checks: CheckSet,
}

impl ValidatorConfig {
  /// Verify the tables reference only allowed keys
  ///
  /// # Panics
  ///
  /// Panics on an inconsistent table. Tables are compiled into the binary, so
  /// this is a programming error rather than a runtime condition.
  pub fn build(self) -> Self {
    let known = |key: &str| self.allowed_keys.iter().any(|k| *k == key);

    for synonym in &self.key_synonyms {
      assert!(
        known(synonym.canonical),
        "synonym '{}' maps to unknown key '{}'",
        synonym.spelling,
        synonym.canonical
      );
    }
    for (key, _) in &self.value_shapes {
      assert!(known(*key), "value shape for unknown key '{}'", key);
    }
    for (before, after) in &self.ordering {
      assert!(
        known(*before) && known(*after),
        "ordering constraint references unknown key ('{}', '{}')",
        before,
        after
      );
    }
    for key in &self.required_keys {
      assert!(known(*key), "required key '{}' is not allowed", key);
    }
    for (key, max) in &self.max_occurrences {
      assert!(known(*key), "cardinality for unknown key '{}'", key);
      assert!(*max > 0, "cardinality for '{}' must be positive", key);
    }

    self
  }

  /// Classify a raw trailer key
  ///
  /// Lookup ignores case so that `bug:` can be reported as a spelling mistake
  /// of `Bug:` instead of an unknown key.
  pub fn classify_key(&self, raw: &str) -> TrailerKeyClass {
    if let Some(synonym) = self
      .key_synonyms
      .iter()
      .find(|s| s.spelling.eq_ignore_ascii_case(raw))
    {
      return match synonym.kind {
        SynonymKind::Disallowed => TrailerKeyClass::Disallowed {
          canonical: synonym.canonical,
        },
        SynonymKind::Reverse => TrailerKeyClass::Allowed {
          spelling: synonym.spelling,
          canonical: synonym.canonical,
        },
      };
    }

    match self.allowed_keys.iter().find(|k| k.eq_ignore_ascii_case(raw)) {
      Some(key) => TrailerKeyClass::Allowed {
        spelling: *key,
        canonical: *key,
      },
      None => TrailerKeyClass::Unrecognized,
    }
  }

  pub fn value_shape(&self, canonical: &str) -> Option<ValueShape> {
    self
      .value_shapes
      .iter()
      .find(|(key, _)| *key == canonical)
      .map(|(_, shape)| *shape)
  }

  /// Comma separated list of documented keys, for error messages
  pub fn supported_keys(&self) -> String {
    self.allowed_keys.join(", ")
  }
}
