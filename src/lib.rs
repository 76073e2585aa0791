//! Commit message validation for Gerrit, GitHub, GitLab and plain git repositories
//!
//! - **message**: raw messages, tokenizer and trailer grammar
//! - **rules**: platform rule tables, the validation engine and range aggregation
//! - **core**: errors, settings, git access and platform detection
//! - **ui**: text and JSON reports
//! - **commands**: CLI command implementations

pub mod commands;
pub mod core;
pub mod message;
pub mod rules;
pub mod ui;
pub mod utils;
