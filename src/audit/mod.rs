//! Audit pipeline
//!
//! This module ties the crawler and the check registry together:
//! - The audit status machine
//! - Score aggregation and run metadata
//! - The runner and its progress observer

mod runner;
mod score;
mod status;

pub use runner::{run_audit, AuditObserver, AuditReport, AuditRunner, NoopObserver};
pub use score::{summarize_by_category, AuditMetadata, AuditOutcome, CategorySummary};
pub use status::AuditStatus;
