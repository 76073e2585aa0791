//! Building blocks around the validation engine
//!
//! - **config**: optional `commit-validator.toml` settings
//! - **detect**: review platform detection from `.gitreview` and remotes
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: git operations (SystemGit)

pub mod config;
pub mod detect;
pub mod error;
pub mod vcs;
