//! seo-audit: a crawl-and-score SEO audit engine
//!
//! This crate crawls a single website breadth-first, extracts per-page SEO
//! signals, runs a registry of independent rule-based checks over them and
//! rolls the results into one audit score.

pub mod audit;
pub mod checks;
pub mod config;
pub mod crawler;
pub mod output;
pub mod page;
pub mod robots;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: audit::AuditStatus,
        to: audit::AuditStatus,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised before a crawl starts
///
/// Failures of individual pages never surface here; they are logged and
/// the page is dropped.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("Page budget must be at least 1, got {0}")]
    InvalidBudget(usize),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use audit::{run_audit, AuditOutcome, AuditReport, AuditRunner, AuditStatus};
pub use checks::{run_all_checks, Category, CheckRegistry, CheckResult, CheckStatus};
pub use config::Config;
pub use crawler::{crawl, Crawler};
pub use page::{ImageInfo, PageRecord, ResourceProbe, SiteContext};
pub use url::{is_same_domain, normalize_url};
