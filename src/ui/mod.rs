//! Terminal output
//!
//! - **report**: text and JSON rendering of validation reports
//! - **color**: git `color.*` values as terminal styles

pub mod color;
pub mod report;

pub use color::parse_git_color;
pub use report::{Palette, render_commit_errors, render_json, render_text};
