use crate::core::error::{ConfigError, ResultExt, ValidatorError, ValidatorResult};
use crate::rules::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Optional per-repository settings
/// Searched in order: commit-validator.toml, .commit-validator.toml, .config/commit-validator.toml
///
/// ```toml
/// [validator]
/// platform = "gerrit"
///
/// [output]
/// color = "auto"
/// json = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorSettings {
  #[serde(default)]
  pub validator: ValidatorSection,
  #[serde(default)]
  pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorSection {
  /// Fixed platform; detected from `.gitreview` and remotes when absent
  #[serde(default)]
  pub platform: Option<Platform>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
  #[serde(default)]
  pub color: ColorChoice,
  /// Emit JSON reports instead of text
  #[serde(default)]
  pub json: bool,
}

/// When to colorize text output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
  #[default]
  Auto,
  Always,
  Never,
}

impl ColorChoice {
  /// Resolve against the output stream; `auto` honours `NO_COLOR`
  pub fn enabled(self, is_terminal: bool) -> bool {
    match self {
      ColorChoice::Always => true,
      ColorChoice::Never => false,
      ColorChoice::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none(),
    }
  }
}

impl ValidatorSettings {
  /// Find config file in search order
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("commit-validator.toml"),
      path.join(".commit-validator.toml"),
      path.join(".config").join("commit-validator.toml"),
    ];

    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load settings, falling back to defaults when no file exists
  pub fn load(path: &Path) -> ValidatorResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      tracing::debug!(root = %path.display(), "no config file, using defaults");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let settings = Self::parse(&content).map_err(|reason| {
      ValidatorError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        reason,
      })
    })?;

    tracing::debug!(path = %config_path.display(), ?settings, "loaded config");
    Ok(settings)
  }

  /// Parse settings from TOML text
  pub fn parse(content: &str) -> Result<Self, String> {
    toml_edit::de::from_str(content).map_err(|e| e.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_full() {
    let settings = ValidatorSettings::parse(
      r#"
[validator]
platform = "gitlab"

[output]
color = "never"
json = true
"#,
    )
    .unwrap();
    assert_eq!(settings.validator.platform, Some(Platform::GitLab));
    assert_eq!(settings.output.color, ColorChoice::Never);
    assert!(settings.output.json);
  }

  #[test]
  fn test_parse_empty_is_default() {
    assert_eq!(ValidatorSettings::parse("").unwrap(), ValidatorSettings::default());
  }

  #[test]
  fn test_parse_rejects_unknown_platform() {
    let err = ValidatorSettings::parse("[validator]\nplatform = \"bitbucket\"\n").unwrap_err();
    assert!(err.contains("bitbucket"), "{err}");
  }

  #[test]
  fn test_parse_rejects_unknown_keys() {
    assert!(ValidatorSettings::parse("[validator]\nplatfrom = \"gerrit\"\n").is_err());
  }

  #[test]
  fn test_color_choice() {
    assert!(ColorChoice::Always.enabled(false));
    assert!(!ColorChoice::Never.enabled(true));
    assert!(!ColorChoice::Auto.enabled(false));
  }

  #[test]
  fn test_load_search_order() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(ValidatorSettings::load(dir.path()).unwrap(), ValidatorSettings::default());

    fs::create_dir_all(dir.path().join(".config")).unwrap();
    fs::write(
      dir.path().join(".config/commit-validator.toml"),
      "[validator]\nplatform = \"github\"\n",
    )
    .unwrap();
    fs::write(
      dir.path().join(".commit-validator.toml"),
      "[validator]\nplatform = \"generic\"\n",
    )
    .unwrap();

    let settings = ValidatorSettings::load(dir.path()).unwrap();
    assert_eq!(settings.validator.platform, Some(Platform::Generic));
  }

  #[test]
  fn test_load_reports_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("commit-validator.toml"), "[output]\ncolor = 3\n").unwrap();
    let err = ValidatorSettings::load(dir.path()).unwrap_err();
    assert!(matches!(err, ValidatorError::Config(ConfigError::Invalid { .. })));
  }
}
