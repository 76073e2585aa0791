//! Error types with contextual messages and exit codes
//!
//! Content problems in a commit message are not errors; they are
//! [`crate::rules::Violation`]s. This module covers everything around the
//! engine: git, config files, I/O, and the final "commits were rejected" outcome
//! that maps to a non-zero exit status.

use crate::rules::Platform;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Guidelines linked from failure output for Wikimedia-hosted repositories
pub const GUIDELINES_URL: &str = "https://www.mediawiki.org/wiki/Gerrit/Commit_message_guidelines";

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// One or more commit messages failed validation
  Violations = 1,
  /// User error (config, invalid args, missing files)
  User = 2,
  /// System error (git, I/O)
  System = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type
#[derive(Debug)]
pub enum ValidatorError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Commit messages were rejected
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ValidatorError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ValidatorError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors are folded into a message so the context is not lost.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ValidatorError::Message { message, context, help } => ValidatorError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ValidatorError::Io(err) => ValidatorError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ValidatorError::Config(_) => ExitCode::User,
      ValidatorError::Git(_) => ExitCode::System,
      ValidatorError::Validation(_) => ExitCode::Violations,
      ValidatorError::Io(_) => ExitCode::System,
      ValidatorError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ValidatorError::Config(e) => e.help_message(),
      ValidatorError::Git(e) => e.help_message(),
      ValidatorError::Validation(e) => e.help_message(),
      ValidatorError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ValidatorError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidatorError::Config(e) => write!(f, "{}", e),
      ValidatorError::Git(e) => write!(f, "{}", e),
      ValidatorError::Validation(e) => write!(f, "{}", e),
      ValidatorError::Io(e) => write!(f, "I/O error: {}", e),
      ValidatorError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ValidatorError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ValidatorError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ValidatorError {
  fn from(err: io::Error) -> Self {
    ValidatorError::Io(err)
  }
}

impl From<String> for ValidatorError {
  fn from(msg: String) -> Self {
    ValidatorError::message(msg)
  }
}

impl From<&str> for ValidatorError {
  fn from(msg: &str) -> Self {
    ValidatorError::message(msg)
  }
}

impl From<toml_edit::de::Error> for ValidatorError {
  fn from(err: toml_edit::de::Error) -> Self {
    ValidatorError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ValidatorError {
  fn from(err: serde_json::Error) -> Self {
    ValidatorError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ValidatorError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ValidatorError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<anyhow::Error> for ValidatorError {
  fn from(err: anyhow::Error) -> Self {
    ValidatorError::message(format!("{:#}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file exists but does not parse
  Invalid { path: PathBuf, reason: String },

  /// `--file` points at a missing commit message file
  MessageFileNotFound { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { .. } => {
        let platforms: Vec<&str> = Platform::ALL.iter().map(|p| p.as_str()).collect();
        Some(format!(
          "Supported keys are [validator] platform ({}) and [output] color, json.",
          platforms.join(", ")
        ))
      }
      ConfigError::MessageFileNotFound { .. } => {
        Some("In a commit-msg hook, git passes the message file path as the first argument.".to_string())
      }
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}\n{}", path.display(), reason)
      }
      ConfigError::MessageFileNotFound { path } => {
        write!(f, "Commit message file not found: {}", path.display())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// `git` could not be spawned
  NotInstalled,

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Revision does not resolve to a commit
  RevisionNotFound { rev: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::NotInstalled => Some("Install git and make sure it is on PATH.".to_string()),
      GitError::RepoNotFound { path } => Some(format!(
        "Run the validator inside a git repository or check the path: {}",
        path.display()
      )),
      GitError::RevisionNotFound { .. } => {
        Some("Use a commit id, branch, tag or a range such as origin/main..HEAD.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::NotInstalled => write!(f, "Unable to run git"),
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::RevisionNotFound { rev } => {
        write!(f, "Revision not found: {}", rev)
      }
    }
  }
}

/// Validation outcome errors
#[derive(Debug)]
pub enum ValidationError {
  /// At least one checked commit had violations
  Rejected { failed: usize, platform: Platform },

  /// The hook file already runs the validator
  HookAlreadyInstalled { path: PathBuf },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::Rejected { platform, .. } if platform.has_guidelines() => {
        Some(format!("Please review <{}>", GUIDELINES_URL))
      }
      ValidationError::Rejected { .. } => {
        Some("Reword the message with `git commit --amend` (or `git rebase -i` for older commits).".to_string())
      }
      ValidationError::HookAlreadyInstalled { path } => {
        Some(format!("Remove the validator line from {} to reinstall.", path.display()))
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::Rejected { failed: 1, platform } => {
        write!(f, "1 commit message does not follow the {} conventions", platform)
      }
      ValidationError::Rejected { failed, platform } => {
        write!(f, "{} commit messages do not follow the {} conventions", failed, platform)
      }
      ValidationError::HookAlreadyInstalled { .. } => {
        write!(f, "commit-message-validator git hook is already installed")
      }
    }
  }
}

/// Result type alias
pub type ValidatorResult<T> = Result<T, ValidatorError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ValidatorResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ValidatorResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ValidatorError>,
{
  fn context(self, ctx: impl Into<String>) -> ValidatorResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ValidatorResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ValidatorError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
