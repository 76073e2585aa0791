//! Validate commit messages from git history or from a message file

use crate::core::config::{ColorChoice, ValidatorSettings};
use crate::core::detect;
use crate::core::error::{ConfigError, ResultExt, ValidationError, ValidatorError, ValidatorResult};
use crate::core::vcs::{CommitSelection, SystemGit};
use crate::message::RawMessage;
use crate::rules::{CommitContext, CommitInput, Platform, RangeReport, validate_range};
use crate::ui::{Palette, parse_git_color, render_json, render_text};
use std::env;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Git setting that turns colors on or off, like `color.diff`
const GIT_COLOR_KEY: &str = "color.commit_message_validator";

/// Git setting for the color of error lines
const GIT_ERROR_COLOR_KEY: &str = "color.commit_message_validator.error";

/// What a validation run produced, plus the repository it ran in
type Validated = (RangeReport, ValidatorSettings, Option<SystemGit>);

/// Arguments shared by `validate` and the bare invocation
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ValidateArgs {
  /// Commit to validate (default: HEAD)
  #[arg(long, value_name = "REV", conflicts_with_all = ["range", "file"])]
  pub rev: Option<String>,

  /// Validate every commit in a range such as origin/main..HEAD
  #[arg(long, value_name = "A..B", conflicts_with = "file")]
  pub range: Option<String>,

  /// Validate a message file instead of a commit (commit-msg hook mode)
  #[arg(long, value_name = "PATH")]
  pub file: Option<PathBuf>,

  /// Rule set to apply (default: config file, then detection)
  #[arg(long, value_enum)]
  pub platform: Option<Platform>,

  /// Print a JSON report instead of text
  #[arg(long)]
  pub json: bool,

  /// When to colorize text output
  #[arg(long, value_enum)]
  pub color: Option<ColorChoice>,
}

/// Run the validate command
pub fn run_validate(args: &ValidateArgs) -> ValidatorResult<()> {
  let current_dir = env::current_dir()?;

  let (report, settings, git) = match &args.file {
    Some(path) => validate_file(args, path, &current_dir)?,
    None => validate_commits(args, &current_dir)?,
  };

  if args.json || settings.output.json {
    println!("{}", render_json(&report)?);
  } else {
    let color = args.color.unwrap_or(settings.output.color);
    let palette = resolve_palette(color, git.as_ref(), std::io::stdout().is_terminal())?;
    print!("{}", render_text(&report, palette));
  }

  if report.passed {
    Ok(())
  } else {
    Err(ValidatorError::Validation(ValidationError::Rejected {
      failed: report.failed().count(),
      platform: report.platform,
    }))
  }
}

fn validate_commits(args: &ValidateArgs, current_dir: &Path) -> ValidatorResult<Validated> {
  let git = SystemGit::open(current_dir)?;
  let settings = ValidatorSettings::load(git.work_tree())?;
  let platform = resolve_platform(args.platform, &settings, Some(&git))?;

  let commits = match &args.range {
    Some(range) => git.commits(CommitSelection::Range(range))?,
    None => {
      let rev = args.rev.as_deref().unwrap_or("HEAD");
      // A merge just made by a post-commit hook carries no message of its own
      // worth checking; the merged-in commit does.
      match git.last_parent(rev)? {
        Some(parent) => {
          tracing::debug!(%rev, %parent, "merge commit, validating its last parent");
          vec![git.commit_input(&parent)?]
        }
        None => vec![git.commit_input(rev)?],
      }
    }
  };

  Ok((validate_range(&commits, platform), settings, Some(git)))
}

fn validate_file(args: &ValidateArgs, path: &Path, current_dir: &Path) -> ValidatorResult<Validated> {
  if !path.is_file() {
    return Err(ValidatorError::Config(ConfigError::MessageFileNotFound {
      path: path.to_path_buf(),
    }));
  }

  // The repository is optional here: a message file can be checked anywhere
  let git = match SystemGit::open(current_dir) {
    Ok(git) => Some(git),
    Err(err) => {
      tracing::debug!(error = %err, "no repository for message file");
      None
    }
  };
  let root = git.as_ref().map(|g| g.work_tree()).unwrap_or(current_dir);
  let settings = ValidatorSettings::load(root)?;
  let platform = resolve_platform(args.platform, &settings, git.as_ref())?;

  let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let message = RawMessage::from_text(&text).cleanup();
  let parent_count = match &git {
    Some(git) if merge_in_progress(git) => 2,
    _ => 0,
  };
  let context = CommitContext::detect(&message, parent_count);

  let commit = CommitInput {
    id: path.display().to_string(),
    message,
    context,
  };
  Ok((validate_range(&[commit], platform), settings, git))
}

/// Text styles for the report
///
/// `auto` defers to git's `color.commit_message_validator` (falling back to
/// `color.ui`) when a repository is open. The error color comes from
/// `color.commit_message_validator.error`.
fn resolve_palette(choice: ColorChoice, git: Option<&SystemGit>, is_tty: bool) -> ValidatorResult<Palette> {
  let enabled = match (choice, git) {
    (ColorChoice::Auto, Some(git)) if env::var_os("NO_COLOR").is_none() => git.config_colorbool(GIT_COLOR_KEY, is_tty)?,
    _ => choice.enabled(is_tty),
  };

  let palette = Palette::new(enabled);
  let Some(git) = git.filter(|_| enabled) else {
    return Ok(palette);
  };

  match git.config_get(None, GIT_ERROR_COLOR_KEY)? {
    Some(spec) => match parse_git_color(&spec) {
      Some(style) => Ok(palette.with_error(style)),
      None => {
        tracing::warn!(%spec, "ignoring invalid {}", GIT_ERROR_COLOR_KEY);
        Ok(palette)
      }
    },
    None => Ok(palette),
  }
}

/// `MERGE_HEAD` exists while `git merge` is recording its commit
fn merge_in_progress(git: &SystemGit) -> bool {
  git
    .git_dir()
    .map(|dir| dir.join("MERGE_HEAD").is_file())
    .unwrap_or(false)
}

/// CLI flag, then config file, then detection from the repository
pub(crate) fn resolve_platform(
  flag: Option<Platform>,
  settings: &ValidatorSettings,
  git: Option<&SystemGit>,
) -> ValidatorResult<Platform> {
  if let Some(platform) = flag.or(settings.validator.platform) {
    return Ok(platform);
  }
  match git {
    Some(git) => detect::detect(git),
    None => Ok(Platform::Gerrit),
  }
}
