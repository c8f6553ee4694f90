//! Output module for audit reports
//!
//! This module handles:
//! - Rendering markdown audit reports
//! - Exporting reports as JSON
//! - Printing the terminal summary

mod json;
mod markdown;
mod summary;

pub use json::{export_json, write_json_report};
pub use markdown::{format_markdown_report, write_markdown_report};
pub use summary::{format_summary, print_history, print_summary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Creates the parent directory of `path` when it is missing
fn ensure_parent_dir(path: &std::path::Path) -> OutputResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::Write(format!("cannot create {}: {}", parent.display(), e))
            })
        }
        _ => Ok(()),
    }
}
