//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the AuditStore trait.

use crate::audit::{AuditReport, AuditStatus};
use crate::checks::{Category, CheckResult, CheckStatus};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{AuditStore, StorageError, StorageResult};
use crate::storage::AuditRecord;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const AUDIT_COLUMNS: &str = "id, seed_url, max_pages, config_hash, status, created_at, \
     started_at, finished_at, pages_crawled, total_checks, checks_passed, checks_failed, \
     checks_warning, overall_score, crawl_time, avg_load_time, error_message";

/// SQLite audit store
pub struct SqliteAuditStore {
    conn: Connection,
}

impl SqliteAuditStore {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteAuditStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn ensure_exists(&self, audit_id: i64) -> StorageResult<()> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM audits WHERE id = ?1", params![audit_id], |_| {
                Ok(())
            })
            .optional()?;
        found.ok_or(StorageError::NotFound(audit_id))
    }
}

impl AuditStore for SqliteAuditStore {
    fn create_audit(
        &mut self,
        seed_url: &str,
        max_pages: usize,
        config_hash: &str,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO audits (seed_url, max_pages, config_hash, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                seed_url,
                max_pages as i64,
                config_hash,
                AuditStatus::Pending.to_db_string(),
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_status(
        &mut self,
        audit_id: i64,
        status: AuditStatus,
        error: Option<&str>,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE audits SET
                status = ?1,
                error_message = COALESCE(?2, error_message),
                started_at = CASE WHEN ?1 = 'crawling' THEN COALESCE(started_at, ?3) ELSE started_at END,
                finished_at = CASE WHEN ?1 IN ('completed', 'failed') THEN ?3 ELSE finished_at END
             WHERE id = ?4",
            params![status.to_db_string(), error, now, audit_id],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound(audit_id));
        }
        Ok(())
    }

    fn save_report(&mut self, audit_id: i64, report: &AuditReport) -> StorageResult<()> {
        self.ensure_exists(audit_id)?;

        let tx = self.conn.transaction()?;
        let outcome = &report.outcome;
        let meta = &report.metadata;
        tx.execute(
            "UPDATE audits SET
                status = ?1, started_at = ?2, finished_at = ?3,
                pages_crawled = ?4, total_checks = ?5, checks_passed = ?6,
                checks_failed = ?7, checks_warning = ?8, overall_score = ?9,
                crawl_time = ?10, avg_load_time = ?11, error_message = ?12
             WHERE id = ?13",
            params![
                report.status.to_db_string(),
                meta.started_at.to_rfc3339(),
                meta.finished_at.to_rfc3339(),
                outcome.pages_crawled as i64,
                outcome.total_checks_run as i64,
                outcome.checks_passed as i64,
                outcome.checks_failed as i64,
                outcome.checks_warning as i64,
                outcome.overall_score,
                meta.crawl_time,
                meta.avg_load_time,
                report.error_message,
                audit_id
            ],
        )?;

        tx.execute(
            "DELETE FROM audit_results WHERE audit_id = ?1",
            params![audit_id],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO audit_results (
                    audit_id, position, check_name, category, status, impact_score,
                    current_value, recommended_value, pros, cons, ranking_impact,
                    solution, enhancements, details
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for (position, result) in report.results.iter().enumerate() {
                let details = result
                    .details
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?;
                stmt.execute(params![
                    audit_id,
                    position as i64,
                    result.check_name,
                    result.category.name(),
                    result.status.as_str(),
                    result.impact_score,
                    result.current_value,
                    result.recommended_value,
                    serde_json::to_string(&result.pros)?,
                    serde_json::to_string(&result.cons)?,
                    result.ranking_impact,
                    result.solution,
                    serde_json::to_string(&result.enhancements)?,
                    details,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!(
            "Saved audit {} with {} results",
            audit_id,
            report.results.len()
        );
        Ok(())
    }

    fn get_audit(&self, audit_id: i64) -> StorageResult<AuditRecord> {
        let sql = format!("SELECT {AUDIT_COLUMNS} FROM audits WHERE id = ?1");
        let raw = self
            .conn
            .query_row(&sql, params![audit_id], RawAudit::from_row)
            .optional()?
            .ok_or(StorageError::NotFound(audit_id))?;
        raw.into_record()
    }

    fn list_audits(&self, limit: usize) -> StorageResult<Vec<AuditRecord>> {
        let sql = format!("SELECT {AUDIT_COLUMNS} FROM audits ORDER BY id DESC LIMIT ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit as i64], RawAudit::from_row)?;

        let mut audits = Vec::new();
        for row in rows {
            audits.push(row?.into_record()?);
        }
        Ok(audits)
    }

    fn load_results(&self, audit_id: i64) -> StorageResult<Vec<CheckResult>> {
        self.ensure_exists(audit_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT check_name, category, status, impact_score, current_value,
                    recommended_value, pros, cons, ranking_impact, solution,
                    enhancements, details
             FROM audit_results WHERE audit_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![audit_id], RawResult::from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?.into_result()?);
        }
        Ok(results)
    }
}

/// Column values of an `audits` row before validation
struct RawAudit {
    id: i64,
    seed_url: String,
    max_pages: i64,
    config_hash: String,
    status: String,
    created_at: String,
    started_at: Option<String>,
    finished_at: Option<String>,
    pages_crawled: i64,
    total_checks: i64,
    checks_passed: i64,
    checks_failed: i64,
    checks_warning: i64,
    overall_score: Option<f64>,
    crawl_time: Option<f64>,
    avg_load_time: Option<f64>,
    error_message: Option<String>,
}

impl RawAudit {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            seed_url: row.get(1)?,
            max_pages: row.get(2)?,
            config_hash: row.get(3)?,
            status: row.get(4)?,
            created_at: row.get(5)?,
            started_at: row.get(6)?,
            finished_at: row.get(7)?,
            pages_crawled: row.get(8)?,
            total_checks: row.get(9)?,
            checks_passed: row.get(10)?,
            checks_failed: row.get(11)?,
            checks_warning: row.get(12)?,
            overall_score: row.get(13)?,
            crawl_time: row.get(14)?,
            avg_load_time: row.get(15)?,
            error_message: row.get(16)?,
        })
    }

    fn into_record(self) -> StorageResult<AuditRecord> {
        let status = AuditStatus::from_db_string(&self.status).ok_or_else(|| {
            StorageError::CorruptRow(format!("audit {}: unknown status '{}'", self.id, self.status))
        })?;
        Ok(AuditRecord {
            id: self.id,
            seed_url: self.seed_url,
            max_pages: count(self.max_pages),
            config_hash: self.config_hash,
            status,
            created_at: parse_time(&self.created_at)?,
            started_at: self.started_at.as_deref().map(parse_time).transpose()?,
            finished_at: self.finished_at.as_deref().map(parse_time).transpose()?,
            pages_crawled: count(self.pages_crawled),
            total_checks: count(self.total_checks),
            checks_passed: count(self.checks_passed),
            checks_failed: count(self.checks_failed),
            checks_warning: count(self.checks_warning),
            overall_score: self.overall_score,
            crawl_time: self.crawl_time,
            avg_load_time: self.avg_load_time,
            error_message: self.error_message,
        })
    }
}

/// Column values of an `audit_results` row before validation
struct RawResult {
    check_name: String,
    category: String,
    status: String,
    impact_score: i64,
    current_value: String,
    recommended_value: String,
    pros: String,
    cons: String,
    ranking_impact: String,
    solution: String,
    enhancements: String,
    details: Option<String>,
}

impl RawResult {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            check_name: row.get(0)?,
            category: row.get(1)?,
            status: row.get(2)?,
            impact_score: row.get(3)?,
            current_value: row.get(4)?,
            recommended_value: row.get(5)?,
            pros: row.get(6)?,
            cons: row.get(7)?,
            ranking_impact: row.get(8)?,
            solution: row.get(9)?,
            enhancements: row.get(10)?,
            details: row.get(11)?,
        })
    }

    fn into_result(self) -> StorageResult<CheckResult> {
        let corrupt = |what: &str| {
            StorageError::CorruptRow(format!("result '{}': {}", self.check_name, what))
        };
        let category = Category::from_name(&self.category)
            .ok_or_else(|| corrupt(&format!("unknown category '{}'", self.category)))?;
        let status = CheckStatus::parse(&self.status)
            .ok_or_else(|| corrupt(&format!("unknown status '{}'", self.status)))?;
        let impact_score = u8::try_from(self.impact_score)
            .map_err(|_| corrupt(&format!("impact {} out of range", self.impact_score)))?;
        let details = self
            .details
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(CheckResult {
            category,
            status,
            impact_score,
            pros: serde_json::from_str(&self.pros)?,
            cons: serde_json::from_str(&self.cons)?,
            enhancements: serde_json::from_str(&self.enhancements)?,
            details,
            current_value: self.current_value,
            recommended_value: self.recommended_value,
            ranking_impact: self.ranking_impact,
            solution: self.solution,
            check_name: self.check_name,
        })
    }
}

fn count(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

fn parse_time(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRow(format!("bad timestamp '{}': {}", value, e)))
}
