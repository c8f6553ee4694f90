//! Storage traits and error types
//!
//! This module defines the trait interface for audit stores and the
//! associated error types.

use crate::audit::{AuditReport, AuditStatus};
use crate::checks::CheckResult;
use crate::storage::AuditRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Audit not found: {0}")]
    NotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence of audits and their check results
///
/// The audit core never touches a store; the caller records progress and
/// the final report through this trait.
pub trait AuditStore {
    /// Creates a pending audit
    ///
    /// # Returns
    ///
    /// The ID of the new audit
    fn create_audit(
        &mut self,
        seed_url: &str,
        max_pages: usize,
        config_hash: &str,
    ) -> StorageResult<i64>;

    /// Records a status change and, for failures, the error message
    fn update_status(
        &mut self,
        audit_id: i64,
        status: AuditStatus,
        error: Option<&str>,
    ) -> StorageResult<()>;

    /// Stores the outcome, metadata and results of a finished audit
    ///
    /// Replaces any results stored earlier for the same audit.
    fn save_report(&mut self, audit_id: i64, report: &AuditReport) -> StorageResult<()>;

    /// Gets an audit by ID
    fn get_audit(&self, audit_id: i64) -> StorageResult<AuditRecord>;

    /// Most recent audits first
    fn list_audits(&self, limit: usize) -> StorageResult<Vec<AuditRecord>>;

    /// Check results of an audit in registry order
    fn load_results(&self, audit_id: i64) -> StorageResult<Vec<CheckResult>>;
}
