//! Storage module for persisting audits
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Audit status tracking
//! - Storing and loading check results

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteAuditStore;
pub use traits::{AuditStore, StorageError, StorageResult};

use crate::audit::AuditStatus;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Initializes or opens an audit database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteAuditStore)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to open the database
pub fn open_storage(path: &Path) -> StorageResult<SqliteAuditStore> {
    SqliteAuditStore::new(path)
}

/// Represents an audit in the database
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub id: i64,
    pub seed_url: String,
    pub max_pages: usize,
    pub config_hash: String,
    pub status: AuditStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub pages_crawled: usize,
    pub total_checks: usize,
    pub checks_passed: usize,
    pub checks_failed: usize,
    pub checks_warning: usize,
    /// Set once a report was saved
    pub overall_score: Option<f64>,
    pub crawl_time: Option<f64>,
    pub avg_load_time: Option<f64>,
    pub error_message: Option<String>,
}
