//! Database schema definitions
//!
//! This module contains the SQL schema for stored audits and their check
//! results.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per audit run
CREATE TABLE IF NOT EXISTS audits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seed_url TEXT NOT NULL,
    max_pages INTEGER NOT NULL,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    started_at TEXT,
    finished_at TEXT,
    pages_crawled INTEGER NOT NULL DEFAULT 0,
    total_checks INTEGER NOT NULL DEFAULT 0,
    checks_passed INTEGER NOT NULL DEFAULT 0,
    checks_failed INTEGER NOT NULL DEFAULT 0,
    checks_warning INTEGER NOT NULL DEFAULT 0,
    overall_score REAL,
    crawl_time REAL,
    avg_load_time REAL,
    error_message TEXT
);

CREATE INDEX IF NOT EXISTS idx_audits_status ON audits(status);

-- Check results of an audit, in registry order
CREATE TABLE IF NOT EXISTS audit_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    audit_id INTEGER NOT NULL REFERENCES audits(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    check_name TEXT NOT NULL,
    category TEXT NOT NULL,
    status TEXT NOT NULL,
    impact_score INTEGER NOT NULL,
    current_value TEXT NOT NULL,
    recommended_value TEXT NOT NULL,
    pros TEXT NOT NULL,
    cons TEXT NOT NULL,
    ranking_impact TEXT NOT NULL,
    solution TEXT NOT NULL,
    enhancements TEXT NOT NULL,
    details TEXT,
    UNIQUE(audit_id, check_name)
);

CREATE INDEX IF NOT EXISTS idx_audit_results_audit ON audit_results(audit_id);
CREATE INDEX IF NOT EXISTS idx_audit_results_status ON audit_results(audit_id, status);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
