//! Platform detection from `.gitreview` and remote URLs

use crate::core::error::ValidatorResult;
use crate::core::vcs::SystemGit;
use crate::rules::Platform;

const GERRIT_HOST: &str = "gerrit.wikimedia.org";
const GITLAB_HOST: &str = "gitlab.wikimedia.org";
const GITHUB_HOST: &str = "github.com";

/// Remotes that push to Gerrit in Wikimedia checkouts
const GERRIT_REMOTES: &[&str] = &["wikimedia", "gerrit", "origin"];

/// Guess the review platform of a repository
///
/// `gitreview_host` is `gerrit.host` from `.gitreview`, if present; `remotes`
/// are `(name, url)` pairs. Anything unrecognized is treated as Gerrit.
pub fn detect_platform(gitreview_host: Option<&str>, remotes: &[(String, String)]) -> Platform {
  if let Some(host) = gitreview_host {
    if host.contains(GERRIT_HOST) {
      return Platform::Gerrit;
    }
    if host.contains(GITLAB_HOST) {
      return Platform::GitLab;
    }
  }

  let url_of = |name: &str| {
    remotes
      .iter()
      .find(|(remote, _)| remote == name)
      .map(|(_, url)| url.as_str())
  };

  if GERRIT_REMOTES
    .iter()
    .filter_map(|name| url_of(name))
    .any(|url| url.contains(GERRIT_HOST))
  {
    return Platform::Gerrit;
  }

  match url_of("origin") {
    Some(url) if url.contains(GITLAB_HOST) => Platform::GitLab,
    Some(url) if url.contains(GITHUB_HOST) => Platform::GitHub,
    _ => Platform::Gerrit,
  }
}

/// Detect the platform of an open repository
pub fn detect(git: &SystemGit) -> ValidatorResult<Platform> {
  let gitreview = git.work_tree().join(".gitreview");
  let host = if gitreview.is_file() {
    git.config_get(Some(&gitreview), "gerrit.host")?
  } else {
    None
  };
  let remotes = git.remote_urls()?;

  let platform = detect_platform(host.as_deref(), &remotes);
  tracing::debug!(gitreview_host = ?host, remotes = remotes.len(), %platform, "detected platform");
  Ok(platform)
}
