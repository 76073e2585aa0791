//! Trailer grammar
//!
//! A trailer is a `Key: value` line at the end of a commit message. Parsing is
//! deliberately loose (`Bug:T1`, `Bug:\tT1` and `Bug:: T1` all parse) so that
//! the rule engine can report malformed trailers precisely instead of treating
//! them as body text. [`TrailerLine::is_well_formed`] is the strict form.

use super::Line;
use crate::rules::config::ValidatorConfig;
use regex::Regex;
use std::sync::LazyLock;

static RE_TRAILER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(?P<key>[A-Za-z][^\s:]+):(?P<ws>\s*)(?P<value>.*)$").expect("valid regex"));

static RE_CHERRY_PICK: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\(cherry picked from commit [0-9a-fA-F]{40}\)$").expect("valid regex"));

/// Classification of a trailer key against a validator config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerKeyClass {
  /// A documented key. `spelling` is how it must be written, `canonical` is the
  /// key it counts as for value, ordering and cardinality rules.
  Allowed {
    spelling: &'static str,
    canonical: &'static str,
  },
  /// A known wrong spelling of `canonical` (e.g. `Task:` for `Bug:`)
  Disallowed { canonical: &'static str },
  Unrecognized,
}

impl TrailerKeyClass {
  pub fn is_recognized(&self) -> bool {
    !matches!(self, TrailerKeyClass::Unrecognized)
  }
}

/// A parsed trailer line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerLine<'a> {
  /// 1-based line number in the message
  pub line: usize,
  /// Full line text
  pub text: &'a str,
  /// Key as written
  pub key: &'a str,
  /// Canonical key, or `key` itself when unrecognized
  pub normalized_key: &'a str,
  pub class: TrailerKeyClass,
  /// Whitespace between the colon and the value, as written
  pub separator: &'a str,
  pub value: &'a str,
}

impl<'a> TrailerLine<'a> {
  pub fn as_line(&self) -> Line<'a> {
    Line {
      number: self.line,
      text: self.text,
    }
  }

  /// Exactly one space between the colon and the value
  pub fn is_well_formed(&self) -> bool {
    self.separator == " " && !self.value.starts_with(':')
  }
}

/// Whether a line has the `Key: value` shape, ignoring key vocabulary
pub fn is_trailer_like(text: &str) -> bool {
  RE_TRAILER.is_match(text)
}

/// Whether a line is the `git cherry-pick -x` marker
pub fn is_cherry_pick(text: &str) -> bool {
  RE_CHERRY_PICK.is_match(text)
}

/// Parse a line as a trailer and classify its key
pub fn parse<'a>(line: Line<'a>, config: &ValidatorConfig) -> Option<TrailerLine<'a>> {
  let caps = RE_TRAILER.captures(line.text)?;
  let key = caps.name("key")?.as_str();
  let separator = caps.name("ws")?.as_str();
  let value = caps.name("value")?.as_str();

  let class = config.classify_key(key);
  let normalized_key = match class {
    TrailerKeyClass::Allowed { canonical, .. } | TrailerKeyClass::Disallowed { canonical } => canonical,
    TrailerKeyClass::Unrecognized => key,
  };

  Some(TrailerLine {
    line: line.number,
    text: line.text,
    key,
    normalized_key,
    class,
    separator,
    value,
  })
}
