//! Message tokenizer
//!
//! Splits a [`RawMessage`] into subject, second line, body, separator and
//! trailer block. The block is found by scanning backward from the last line
//! with an index cursor; the scan never crosses into the subject or the second
//! line.

use super::trailer::{self, TrailerLine};
use super::{Line, RawMessage};
use crate::rules::config::ValidatorConfig;

/// One line of the trailer block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerEntry<'a> {
  Trailer(TrailerLine<'a>),
  /// `(cherry picked from commit ...)`
  CherryPick(Line<'a>),
  /// A line inside the block that does not have the `Key: value` shape
  Malformed(Line<'a>),
}

impl<'a> TrailerEntry<'a> {
  pub fn as_line(&self) -> Line<'a> {
    match self {
      TrailerEntry::Trailer(trailer) => trailer.as_line(),
      TrailerEntry::CherryPick(line) | TrailerEntry::Malformed(line) => *line,
    }
  }

  pub fn line(&self) -> usize {
    self.as_line().number
  }

  pub fn trailer(&self) -> Option<&TrailerLine<'a>> {
    match self {
      TrailerEntry::Trailer(trailer) => Some(trailer),
      TrailerEntry::CherryPick(_) | TrailerEntry::Malformed(_) => None,
    }
  }
}

/// A message split into its regions
///
/// `subject ++ second_line ++ body ++ separator ++ trailers` reproduces the
/// original lines in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedMessage<'a> {
  pub subject: Option<Line<'a>>,
  pub second_line: Option<Line<'a>>,
  pub body: Vec<Line<'a>>,
  /// Blank line between the body and the trailer block
  pub separator: Option<Line<'a>>,
  pub trailers: Vec<TrailerEntry<'a>>,
  /// Index into `body` where trailer-only paragraphs split off from the block
  /// by blank lines begin
  pub detached_from: Option<usize>,
  /// Parsed trailers of those paragraphs
  pub detached_trailers: Vec<TrailerLine<'a>>,
  pub line_count: usize,
}

impl<'a> TokenizedMessage<'a> {
  /// All lines, in message order
  pub fn lines(&self) -> impl Iterator<Item = Line<'a>> + '_ {
    self
      .subject
      .iter()
      .chain(self.second_line.iter())
      .chain(self.body.iter())
      .chain(self.separator.iter())
      .copied()
      .chain(self.trailers.iter().map(TrailerEntry::as_line))
  }

  /// Parsed trailers of the block, skipping the cherry-pick marker and
  /// malformed lines
  pub fn trailer_lines(&self) -> impl Iterator<Item = &TrailerLine<'a>> {
    self.trailers.iter().filter_map(TrailerEntry::trailer)
  }

  /// Detached and block trailers, in line order
  pub fn all_trailers(&self) -> impl Iterator<Item = &TrailerLine<'a>> {
    self.detached_trailers.iter().chain(self.trailer_lines())
  }

  /// Body lines before any detached trailer paragraph
  pub fn prose(&self) -> &[Line<'a>] {
    let end = self.detached_from.unwrap_or(self.body.len());
    &self.body[..end]
  }

  /// Body lines from the first detached trailer paragraph on
  pub fn detached(&self) -> &[Line<'a>] {
    let start = self.detached_from.unwrap_or(self.body.len());
    &self.body[start..]
  }

  /// 1-based line number of the first block line
  pub fn block_start(&self) -> Option<usize> {
    self.trailers.first().map(TrailerEntry::line)
  }
}

/// Split a message into regions
pub fn tokenize<'a>(message: &'a RawMessage, config: &ValidatorConfig) -> TokenizedMessage<'a> {
  let lines: Vec<Line<'a>> = message.lines().collect();
  let count = lines.len();

  let mut tokens = TokenizedMessage {
    subject: lines.first().copied(),
    second_line: lines.get(1).copied(),
    line_count: count,
    ..Default::default()
  };
  if count <= 2 {
    return tokens;
  }

  // Backward scan; `start` is the index of the first block line
  let mut start = count;
  while start > 2 {
    let text = lines[start - 1].text;
    let joins = trailer::is_trailer_like(text) || (start == count && trailer::is_cherry_pick(text));
    if !joins {
      break;
    }
    start -= 1;
  }

  if !is_anchored(&lines[start..], config) {
    start = count;
  }

  // A block glued to the paragraph above it, where that paragraph opens with
  // a recognized trailer, is one block with malformed lines in it
  if start < count && start > 2 && !lines[start - 1].is_blank() {
    let mut top = start - 1;
    while top > 2 && !lines[top - 1].is_blank() {
      top -= 1;
    }
    if lines[top - 1].is_blank() && starts_with_recognized(lines[top], config) {
      start = top;
    }
  }

  let mut body_end = start;
  if start < count && start > 2 && lines[start - 1].is_blank() {
    body_end = start - 1;
    tokens.separator = Some(lines[body_end]);
  }

  tokens.trailers = lines[start..]
    .iter()
    .map(|line| match trailer::parse(*line, config) {
      Some(parsed) => TrailerEntry::Trailer(parsed),
      None if trailer::is_cherry_pick(line.text) => TrailerEntry::CherryPick(*line),
      None => TrailerEntry::Malformed(*line),
    })
    .collect();
  tokens.body = lines[2..body_end].to_vec();

  if tokens.separator.is_some()
    && let Some(from) = find_detached(&tokens.body, config)
  {
    tokens.detached_from = Some(from);
    tokens.detached_trailers = tokens.body[from..]
      .iter()
      .filter_map(|line| trailer::parse(*line, config))
      .collect();
  }

  tokens
}

/// A run of lines is a trailer block only if something in it is recognized
fn is_anchored(run: &[Line<'_>], config: &ValidatorConfig) -> bool {
  run.iter().any(|line| {
    trailer::is_cherry_pick(line.text) || trailer::parse(*line, config).is_some_and(|t| t.class.is_recognized())
  })
}

fn starts_with_recognized(line: Line<'_>, config: &ValidatorConfig) -> bool {
  trailer::parse(line, config).is_some_and(|t| t.class.is_recognized())
}

/// Walk backward over blank-separated paragraphs at the end of the body,
/// returning the start of the earliest one made only of trailers
fn find_detached(body: &[Line<'_>], config: &ValidatorConfig) -> Option<usize> {
  let mut detached = None;
  let mut cursor = body.len();

  loop {
    while cursor > 0 && body[cursor - 1].is_blank() {
      cursor -= 1;
    }
    if cursor == 0 {
      break;
    }

    let end = cursor;
    while cursor > 0 && !body[cursor - 1].is_blank() {
      cursor -= 1;
    }
    let paragraph = &body[cursor..end];

    let all_trailers = paragraph.iter().all(|line| trailer::is_trailer_like(line.text));
    if !all_trailers || !is_anchored(paragraph, config) {
      break;
    }
    detached = Some(cursor);
  }

  detached
}
