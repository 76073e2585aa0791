//! Platform variants
//!
//! Each [`Platform`] resolves to one static [`ValidatorConfig`], built once on
//! first use.

use super::config::{Check, CheckSet, KeySynonym, SynonymKind, ValidatorConfig, ValueShape};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Review platform whose conventions a message is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  Gerrit,
  #[value(name = "github")]
  GitHub,
  #[value(name = "gitlab")]
  GitLab,
  Generic,
}

/// Trailer keys documented for Gerrit and GitLab hosted repositories
const WIKIMEDIA_KEYS: &[&str] = &[
  "Acked-by",
  "Bug",
  "Cc",
  "Change-Id",
  "Co-Authored-by",
  "Depends-On",
  "Hosts",
  "Change-Private",
  "Needed-By",
  "Reported-by",
  "Requested-by",
  "Reviewed-by",
  "Signed-off-by",
  "Suggested-by",
  "Tested-by",
  "Thanks",
];

/// GitHub spells co-authorship in lower case and has no puppet-compiler keys
const GITHUB_KEYS: &[&str] = &[
  "Acked-by",
  "Bug",
  "Cc",
  "Change-Id",
  "Co-authored-by",
  "Depends-On",
  "Needed-By",
  "Reported-by",
  "Requested-by",
  "Reviewed-by",
  "Signed-off-by",
  "Suggested-by",
  "Tested-by",
  "Thanks",
];

const SUBJECT_TASK_PATTERN: &str = r"(?i)^(bug|T?\d+)";
const SUBJECT_ISSUE_PATTERN: &str = r"#\d+";
const CROSS_REPO_CLOSE_PATTERN: &str = r"(?i)^(?:close[sd]?|fix(?:e[sd])?|resolve[sd]?)\s+\S+/\S+#\d+";

static GERRIT: LazyLock<ValidatorConfig> = LazyLock::new(|| {
  ValidatorConfig {
    allowed_keys: WIKIMEDIA_KEYS.to_vec(),
    key_synonyms: synonyms(),
    closed_key_set: true,
    value_shapes: vec![
      ("Bug", ValueShape::TaskId),
      ("Change-Id", ValueShape::ChangeId),
      ("Depends-On", ValueShape::ChangeId),
    ],
    ordering: vec![("Bug", "Change-Id"), ("Depends-On", "Change-Id")],
    required_keys: vec!["Change-Id"],
    max_occurrences: vec![("Change-Id", 1)],
    subject_reference: Some(pattern(SUBJECT_TASK_PATTERN)),
    cross_repo_close: None,
    checks: CheckSet::all().without(Check::CrossRepoClose),
  }
  .build()
});

static GITHUB: LazyLock<ValidatorConfig> = LazyLock::new(|| {
  ValidatorConfig {
    allowed_keys: GITHUB_KEYS.to_vec(),
    key_synonyms: synonyms(),
    closed_key_set: false,
    value_shapes: vec![
      ("Bug", ValueShape::TaskId),
      ("Change-Id", ValueShape::ChangeId),
      ("Depends-On", ValueShape::ChangeIdOrPullRequest),
    ],
    ordering: Vec::new(),
    required_keys: Vec::new(),
    max_occurrences: Vec::new(),
    subject_reference: Some(pattern(SUBJECT_ISSUE_PATTERN)),
    cross_repo_close: Some(pattern(CROSS_REPO_CLOSE_PATTERN)),
    checks: CheckSet::all().without(Check::MinLines),
  }
  .build()
});

static GITLAB: LazyLock<ValidatorConfig> = LazyLock::new(|| {
  ValidatorConfig {
    allowed_keys: WIKIMEDIA_KEYS.to_vec(),
    key_synonyms: synonyms(),
    closed_key_set: true,
    value_shapes: vec![
      ("Bug", ValueShape::TaskId),
      ("Change-Id", ValueShape::ChangeId),
      ("Depends-On", ValueShape::ChangeIdOrMergeRequest),
    ],
    ordering: Vec::new(),
    required_keys: Vec::new(),
    max_occurrences: Vec::new(),
    subject_reference: Some(pattern(SUBJECT_TASK_PATTERN)),
    cross_repo_close: None,
    checks: CheckSet::all().without(Check::MinLines).without(Check::CrossRepoClose),
  }
  .build()
});

static GENERIC: LazyLock<ValidatorConfig> = LazyLock::new(|| {
  ValidatorConfig {
    allowed_keys: Vec::new(),
    key_synonyms: Vec::new(),
    closed_key_set: false,
    value_shapes: Vec::new(),
    ordering: Vec::new(),
    required_keys: Vec::new(),
    max_occurrences: Vec::new(),
    subject_reference: None,
    cross_repo_close: None,
    checks: CheckSet::structural().without(Check::MinLines),
  }
  .build()
});

fn synonyms() -> Vec<KeySynonym> {
  let disallowed = |spelling| KeySynonym {
    spelling,
    canonical: "Bug",
    kind: SynonymKind::Disallowed,
  };
  vec![
    disallowed("Task"),
    disallowed("Fixes"),
    disallowed("Closes"),
    KeySynonym {
      spelling: "Needed-By",
      canonical: "Depends-On",
      kind: SynonymKind::Reverse,
    },
  ]
}

fn pattern(source: &str) -> Regex {
  Regex::new(source).expect("valid regex")
}

impl Platform {
  pub const ALL: [Platform; 4] = [Platform::Gerrit, Platform::GitHub, Platform::GitLab, Platform::Generic];

  /// Static validation tables for this platform
  pub fn config(self) -> &'static ValidatorConfig {
    match self {
      Platform::Gerrit => &GERRIT,
      Platform::GitHub => &GITHUB,
      Platform::GitLab => &GITLAB,
      Platform::Generic => &GENERIC,
    }
  }

  /// Lowercase identifier used in config files and on the command line
  pub fn as_str(self) -> &'static str {
    match self {
      Platform::Gerrit => "gerrit",
      Platform::GitHub => "github",
      Platform::GitLab => "gitlab",
      Platform::Generic => "generic",
    }
  }

  /// Whether failures should point at the Gerrit commit message guidelines
  pub fn has_guidelines(self) -> bool {
    matches!(self, Platform::Gerrit | Platform::GitLab)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Platform::Gerrit => "Gerrit",
      Platform::GitHub => "GitHub",
      Platform::GitLab => "GitLab",
      Platform::Generic => "Generic",
    };
    f.write_str(name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::message::TrailerKeyClass;

  #[test]
  fn test_all_configs_build() {
    for platform in Platform::ALL {
      let _ = platform.config();
    }
  }

  #[test]
  fn test_gerrit_tables() {
    let config = Platform::Gerrit.config();
    assert!(config.closed_key_set);
    assert!(config.checks.contains(Check::MinLines));
    assert!(!config.checks.contains(Check::CrossRepoClose));
    assert_eq!(config.required_keys, vec!["Change-Id"]);
    assert_eq!(config.value_shape("Depends-On"), Some(ValueShape::ChangeId));
    assert!(config.supported_keys().contains("Change-Private"));
  }

  #[test]
  fn test_github_spelling() {
    let config = Platform::GitHub.config();
    assert_eq!(
      config.classify_key("Co-Authored-by"),
      TrailerKeyClass::Allowed {
        spelling: "Co-authored-by",
        canonical: "Co-authored-by"
      }
    );
    assert_eq!(config.classify_key("Hosts"), TrailerKeyClass::Unrecognized);
    assert!(!config.checks.contains(Check::MinLines));
  }

  #[test]
  fn test_generic_is_structural() {
    let config = Platform::Generic.config();
    assert!(config.checks.contains(Check::SubjectLength));
    assert!(config.checks.contains(Check::SecondLine));
    assert!(config.checks.contains(Check::BodyLength));
    assert!(!config.checks.contains(Check::MinLines));
    assert!(!config.checks.contains(Check::KeyAllowList));
    assert_eq!(config.classify_key("Bug"), TrailerKeyClass::Unrecognized);
  }

  #[test]
  fn test_serde_names() {
    let platform: Platform = serde_json::from_str("\"github\"").unwrap();
    assert_eq!(platform, Platform::GitHub);
    assert_eq!(serde_json::to_string(&Platform::GitLab).unwrap(), "\"gitlab\"");
    assert!(serde_json::from_str::<Platform>("\"bitbucket\"").is_err());
  }
}
