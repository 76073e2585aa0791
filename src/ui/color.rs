//! Git color values (`color.*` config) as terminal styles
//!
//! Accepts the grammar `git config --get-color` understands: up to two colors
//! (foreground, then background) and any number of attributes, separated by
//! whitespace.

use anstyle::{Ansi256Color, AnsiColor, Color, RgbColor, Style};

/// Parse a git color value such as `bold red`, `yellow blue ul` or `#ff8800`
///
/// Returns `None` when a word is not part of the grammar or more than two
/// colors are given.
pub fn parse_git_color(spec: &str) -> Option<Style> {
  let mut style = Style::new();
  let mut slots = 0usize;

  for word in spec.split_whitespace() {
    let word = word.to_ascii_lowercase();

    if let Some(color) = parse_color(&word) {
      style = match slots {
        0 => style.fg_color(color),
        1 => style.bg_color(color),
        _ => return None,
      };
      slots += 1;
      continue;
    }

    style = match word.as_str() {
      "bold" => style.bold(),
      "dim" => style.dimmed(),
      "italic" => style.italic(),
      "ul" => style.underline(),
      "blink" => style.blink(),
      "reverse" => style.invert(),
      "strike" => style.strikethrough(),
      "reset" => style,
      other => {
        // `nobold` and `no-bold` switch an attribute off; styles start plain
        let negated = other.strip_prefix("no-").or_else(|| other.strip_prefix("no"))?;
        if !is_attribute(negated) {
          return None;
        }
        style
      }
    };
  }

  Some(style)
}

/// One color slot; `Some(None)` is `normal`/`default`, which leave it unset
fn parse_color(word: &str) -> Option<Option<Color>> {
  match word {
    "normal" | "default" => return Some(None),
    _ => {}
  }

  if let Some(hex) = word.strip_prefix('#') {
    return parse_rgb(hex).map(|rgb| Some(Color::Rgb(rgb)));
  }

  if let Ok(index) = word.parse::<i16>() {
    return match index {
      -1 => Some(None),
      0..=255 => {
        let indexed = Ansi256Color(index as u8);
        Some(Some(indexed.into_ansi().map_or(Color::Ansi256(indexed), Color::Ansi)))
      }
      _ => None,
    };
  }

  let (bright, name) = match word.strip_prefix("bright") {
    Some(name) => (true, name),
    None => (false, word),
  };
  let ansi = match name {
    "black" => AnsiColor::Black,
    "red" => AnsiColor::Red,
    "green" => AnsiColor::Green,
    "yellow" => AnsiColor::Yellow,
    "blue" => AnsiColor::Blue,
    "magenta" => AnsiColor::Magenta,
    "cyan" => AnsiColor::Cyan,
    "white" => AnsiColor::White,
    _ => return None,
  };
  Some(Some(Color::Ansi(ansi.bright(bright))))
}

fn parse_rgb(hex: &str) -> Option<RgbColor> {
  if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
    return None;
  }
  let channel = |s: &str| u8::from_str_radix(s, 16).ok();
  match hex.len() {
    6 => Some(RgbColor(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
    // #rgb doubles each digit
    3 => {
      let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
      Some(RgbColor(short(0)?, short(1)?, short(2)?))
    }
    _ => None,
  }
}

fn is_attribute(word: &str) -> bool {
  matches!(word, "bold" | "dim" | "italic" | "ul" | "blink" | "reverse" | "strike")
}
