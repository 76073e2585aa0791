//! CLI commands
//!
//! - **validate**: check HEAD, a revision, a range or a message file
//! - **install**: add the validator to a post-commit or commit-msg hook
//! - **sample**: report pass/fail for a repository's recent commits

pub mod install;
pub mod sample;
pub mod validate;

pub use install::{HookKind, run_install};
pub use sample::run_sample;
pub use validate::{ValidateArgs, run_validate};
