//! Helpers for writing paths into shell scripts

use std::path::Path;

/// Convert a path to Git format (always forward slashes)
///
/// Hook scripts run under `sh`, even with Git for Windows, so backslashes must
/// become forward slashes.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Quote a word for `sh` if it contains anything outside a safe set
pub fn shell_quote(word: &str) -> String {
  let safe = !word.is_empty()
    && word
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | ':' | '+' | '='));
  if safe {
    word.to_string()
  } else {
    format!("'{}'", word.replace('\'', r"'\''"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  #[test]
  fn test_path_to_git_format_unix() {
    #[cfg(not(target_os = "windows"))]
    {
      let path = PathBuf::from("/home/user/.cargo/bin/commit-message-validator");
      assert_eq!(
        path_to_git_format(&path),
        "/home/user/.cargo/bin/commit-message-validator"
      );

      let path = PathBuf::from("./relative/bin");
      assert_eq!(path_to_git_format(&path), "./relative/bin");
    }
  }

  #[test]
  fn test_path_to_git_format_windows() {
    #[cfg(target_os = "windows")]
    {
      let path = PathBuf::from("C:\\Users\\test\\.cargo\\bin\\commit-message-validator.exe");
      assert_eq!(
        path_to_git_format(&path),
        "C:/Users/test/.cargo/bin/commit-message-validator.exe"
      );
    }
  }

  #[test]
  fn test_shell_quote() {
    assert_eq!(shell_quote("/usr/bin/tool"), "/usr/bin/tool");
    assert_eq!(shell_quote("C:/Program Files/tool.exe"), "'C:/Program Files/tool.exe'");
    assert_eq!(shell_quote("it's"), r"'it'\''s'");
    assert_eq!(shell_quote(""), "''");
  }
}
