//! Rule engine
//!
//! Runs the active [`Check`]s of a [`ValidatorConfig`] over a tokenized
//! message. Checks are independent; each appends its violations in line order,
//! so a result lists violations by check, then by line.
//!
//! # Example
//!
//! ```rust
//! use commit_message_validator::message::RawMessage;
//! use commit_message_validator::rules::{CommitContext, Platform, validate};
//!
//! let message = RawMessage::from_text(
//!   "Fix bug\n\nBug: T12345\nChange-Id: I0123456789abcdef0123456789abcdef01234567",
//! );
//! let result = validate(&message, &CommitContext::default(), Platform::Gerrit);
//! assert!(result.passed);
//! ```

use super::config::{Check, ValidatorConfig, ValueShape};
use super::platform::Platform;
use super::{CommitContext, RuleId, ValidationResult, Violation};
use crate::message::trailer;
use crate::message::{RawMessage, TokenizedMessage, TrailerEntry, TrailerKeyClass, tokenize};
use regex::Regex;
use std::sync::LazyLock;

const SUBJECT_MAX_LEN: usize = 80;
const BODY_MAX_LEN: usize = 100;
const MIN_LINES: usize = 3;

static RE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^<?https?://\S+>?$").expect("valid regex"));

/// Tokenize and evaluate a message against a platform
pub fn validate(message: &RawMessage, context: &CommitContext, platform: Platform) -> ValidationResult {
  let config = platform.config();
  let tokens = tokenize(message, config);
  evaluate(&tokens, context, config)
}

/// Evaluate a tokenized message
///
/// Merge commits pass without running any check.
pub fn evaluate(tokens: &TokenizedMessage<'_>, context: &CommitContext, config: &ValidatorConfig) -> ValidationResult {
  if context.is_merge {
    tracing::trace!("merge commit, skipping checks");
    return ValidationResult::pass();
  }

  let mut violations = Vec::new();

  for check in Check::ALL {
    if !config.checks.contains(check) {
      continue;
    }

    let first = violations.len();
    run_check(check, tokens, context, config, &mut violations);
    violations[first..].sort_by_key(|v: &Violation| v.line);

    if violations.len() > first {
      tracing::trace!(?check, count = violations.len() - first, "check reported violations");
    }
  }

  ValidationResult::from_violations(violations)
}

fn run_check(
  check: Check,
  tokens: &TokenizedMessage<'_>,
  context: &CommitContext,
  config: &ValidatorConfig,
  out: &mut Vec<Violation>,
) {
  match check {
    Check::SubjectLength => subject_length(tokens, context, out),
    Check::SubjectReference => subject_reference(tokens, config, out),
    Check::SecondLine => second_line(tokens, out),
    Check::MinLines => min_lines(tokens, out),
    Check::BodyLength => body_length(tokens, out),
    Check::CrossRepoClose => cross_repo_close(tokens, config, out),
    Check::TrailerFormat => trailer_format(tokens, out),
    Check::KeySpelling => key_spelling(tokens, out),
    Check::KeyAllowList => key_allow_list(tokens, config, out),
    Check::ValueShape => value_shape(tokens, config, out),
    Check::Cardinality => cardinality(tokens, config, out),
    Check::Ordering => ordering(tokens, config, out),
    Check::TrailerBlankLines => trailer_blank_lines(tokens, out),
    Check::FooterInBody => footer_in_body(tokens, config, out),
    Check::CherryPickLast => cherry_pick_last(tokens, out),
  }
}

fn subject_length(tokens: &TokenizedMessage<'_>, context: &CommitContext, out: &mut Vec<Violation>) {
  if context.is_revert {
    return;
  }
  if let Some(subject) = tokens.subject
    && subject.char_len() > SUBJECT_MAX_LEN
  {
    out.push(Violation::new(
      RuleId::SubjectMaxLength,
      subject.number,
      format!("Subject must be <={} characters", SUBJECT_MAX_LEN),
    ));
  }
}

fn subject_reference(tokens: &TokenizedMessage<'_>, config: &ValidatorConfig, out: &mut Vec<Violation>) {
  if let (Some(pattern), Some(subject)) = (&config.subject_reference, tokens.subject)
    && pattern.is_match(subject.text)
  {
    out.push(Violation::new(
      RuleId::SubjectNoReference,
      subject.number,
      "Do not define bug in the subject",
    ));
  }
}

fn second_line(tokens: &TokenizedMessage<'_>, out: &mut Vec<Violation>) {
  match tokens.second_line {
    Some(line) if !line.text.is_empty() => {
      out.push(Violation::new(RuleId::SecondLineEmpty, line.number, "Second line should be empty"));
    }
    Some(_) => {}
    None => {
      out.push(Violation::new(
        RuleId::SecondLineMissing,
        0,
        "Expected a blank line after the subject",
      ));
    }
  }
}

fn min_lines(tokens: &TokenizedMessage<'_>, out: &mut Vec<Violation>) {
  if tokens.line_count < MIN_LINES {
    out.push(Violation::new(
      RuleId::MinLines,
      0,
      format!("Expected at least {} lines", MIN_LINES),
    ));
  }
}

fn body_length(tokens: &TokenizedMessage<'_>, out: &mut Vec<Violation>) {
  // A non-blank second line is body text that lost its blank line
  let second = tokens.second_line.iter().filter(|l| !l.is_blank());
  for line in second.chain(tokens.body.iter()) {
    let len = line.char_len();
    if len > BODY_MAX_LEN && !RE_URL.is_match(line.text) {
      out.push(Violation::new(
        RuleId::BodyMaxLength,
        line.number,
        format!("Line exceeds max length ({}>{})", len, BODY_MAX_LEN),
      ));
    }
  }
}

fn cross_repo_close(tokens: &TokenizedMessage<'_>, config: &ValidatorConfig, out: &mut Vec<Violation>) {
  let Some(pattern) = &config.cross_repo_close else {
    return;
  };
  for line in tokens.lines().filter(|l| pattern.is_match(l.text)) {
    out.push(Violation::new(
      RuleId::BodyCrossRepoClose,
      line.number,
      "Do not write \"closing issue keywords\" for closing an issue that is in another repository",
    ));
  }
}

fn trailer_format(tokens: &TokenizedMessage<'_>, out: &mut Vec<Violation>) {
  for trailer in tokens.all_trailers().filter(|t| !t.is_well_formed()) {
    out.push(Violation::new(
      RuleId::FooterSeparator,
      trailer.line,
      format!("Expected one space after '{}:'", trailer.key),
    ));
  }

  for entry in &tokens.trailers {
    if let TrailerEntry::Malformed(line) = entry {
      out.push(Violation::new(
        RuleId::FooterFormat,
        line.number,
        "Expected footer line to follow format of 'Name: ...'",
      ));
    }
  }
}

fn key_spelling(tokens: &TokenizedMessage<'_>, out: &mut Vec<Violation>) {
  for trailer in tokens.all_trailers() {
    let expected = match trailer.class {
      TrailerKeyClass::Allowed { spelling, .. } if spelling != trailer.key => spelling,
      TrailerKeyClass::Disallowed { canonical } => canonical,
      _ => continue,
    };
    out.push(Violation::new(
      RuleId::FooterSpelling,
      trailer.line,
      format!("Use '{}:' not '{}:'", expected, trailer.key),
    ));
  }
}

fn key_allow_list(tokens: &TokenizedMessage<'_>, config: &ValidatorConfig, out: &mut Vec<Violation>) {
  if !config.closed_key_set {
    return;
  }
  for trailer in tokens.all_trailers().filter(|t| !t.class.is_recognized()) {
    out.push(Violation::new(
      RuleId::UnexpectedFooter,
      trailer.line,
      format!(
        "Unexpected footer '{}'. Supported footers: {}",
        trailer.key,
        config.supported_keys()
      ),
    ));
  }
}

fn value_shape(tokens: &TokenizedMessage<'_>, config: &ValidatorConfig, out: &mut Vec<Violation>) {
  for trailer in tokens.all_trailers() {
    let Some(shape) = config.value_shape(trailer.normalized_key) else {
      continue;
    };
    if shape.matches(trailer.value) {
      continue;
    }
    let rule = match shape {
      ValueShape::TaskId => RuleId::TaskIdExpected,
      _ => RuleId::ChangeIdExpected,
    };
    out.push(Violation::new(
      rule,
      trailer.line,
      format!("{}: value must be {}", trailer.key, shape.describe()),
    ));
  }
}

fn cardinality(tokens: &TokenizedMessage<'_>, config: &ValidatorConfig, out: &mut Vec<Violation>) {
  for (key, max) in &config.max_occurrences {
    let occurrences: Vec<usize> = tokens
      .all_trailers()
      .filter(|t| t.normalized_key == *key)
      .map(|t| t.line)
      .collect();

    if let Some(first) = occurrences.first() {
      for line in occurrences.iter().skip(*max) {
        out.push(Violation::new(
          RuleId::ExtraTrailer,
          *line,
          format!("Extra {} found, first at {}", key, first),
        ));
      }
    }
  }

  for key in &config.required_keys {
    if !tokens.all_trailers().any(|t| t.normalized_key == *key) {
      out.push(Violation::new(RuleId::RequiredTrailer, 0, format!("Expected {}", key)));
    }
  }
}

fn ordering(tokens: &TokenizedMessage<'_>, config: &ValidatorConfig, out: &mut Vec<Violation>) {
  for (before, after) in &config.ordering {
    let Some(first_after) = tokens
      .all_trailers()
      .filter(|t| t.normalized_key == *after)
      .map(|t| t.line)
      .min()
    else {
      continue;
    };

    for trailer in tokens
      .all_trailers()
      .filter(|t| t.normalized_key == *before && t.line > first_after)
    {
      out.push(Violation::new(
        RuleId::TrailerOrder,
        trailer.line,
        format!(
          "Expected '{}:' to come before {} on line {}",
          trailer.key, after, first_after
        ),
      ));
    }
  }
}

fn trailer_blank_lines(tokens: &TokenizedMessage<'_>, out: &mut Vec<Violation>) {
  if tokens.detached_from.is_none() {
    return;
  }
  let blanks = tokens
    .detached()
    .iter()
    .chain(tokens.separator.iter())
    .filter(|l| l.is_blank());
  for line in blanks {
    out.push(Violation::new(RuleId::FooterNoBlanks, line.number, "Unexpected blank line"));
  }
}

fn footer_in_body(tokens: &TokenizedMessage<'_>, config: &ValidatorConfig, out: &mut Vec<Violation>) {
  if tokens.separator.is_none()
    && let Some(start) = tokens.block_start()
    && start > MIN_LINES
  {
    out.push(Violation::new(
      RuleId::FooterInBody,
      start,
      "Expected a blank line before the footer",
    ));
  }

  let candidates = tokens.second_line.iter().chain(tokens.prose().iter());
  for found in candidates.filter_map(|line| trailer::parse(*line, config)) {
    if found.class.is_recognized() {
      out.push(Violation::new(
        RuleId::FooterInBody,
        found.line,
        format!("Expected '{}:' to be in footer", found.key),
      ));
    }
  }
}

fn cherry_pick_last(tokens: &TokenizedMessage<'_>, out: &mut Vec<Violation>) {
  let last = tokens.line_count;
  for line in tokens.lines().filter(|l| l.number != last) {
    if trailer::is_cherry_pick(line.text) {
      out.push(Violation::new(
        RuleId::CherryPickLast,
        line.number,
        "Cherry pick line is not the last line",
      ));
    }
  }
}
