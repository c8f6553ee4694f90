//! seo-audit main entry point
//!
//! This is the command-line interface for the SEO audit engine.

use anyhow::{bail, Context, Result};
use clap::Parser;
use seo_audit::audit::{AuditObserver, AuditReport, AuditRunner, AuditStatus};
use seo_audit::config::{load_config_with_hash, validate, Config};
use seo_audit::output::{print_history, print_summary, write_json_report, write_markdown_report};
use seo_audit::storage::{open_storage, AuditStore, SqliteAuditStore};
use seo_audit::AuditError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// seo-audit: crawl a website and score it against SEO best practices
///
/// The audit crawls the site breadth-first from the given URL, runs every
/// registered check over the collected pages and reports a 0-100 score.
#[derive(Parser, Debug)]
#[command(name = "seo-audit")]
#[command(version)]
#[command(about = "Crawl a website and score it against SEO checks", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Site to audit; overrides [target] url
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Page budget; overrides [crawler] max-pages
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Also write the report as JSON to this path
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Validate config and show the resolved settings without auditing
    #[arg(long, conflicts_with = "history")]
    dry_run: bool,

    /// List the N most recent stored audits and exit
    #[arg(long, value_name = "N", conflicts_with = "dry_run")]
    history: Option<usize>,

    /// Do not record the audit in the database
    #[arg(long)]
    no_store: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, hash)
        }
        None => (Config::default(), "default".to_string()),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(url) = &cli.url {
        config.target.url = Some(url.clone());
    }
    validate(&config).context("invalid configuration")?;

    if let Some(limit) = cli.history {
        return handle_history(&config, limit);
    }

    let Some(seed_url) = config.target.url.clone() else {
        bail!("no site to audit: pass --url or set [target] url in the config");
    };

    if cli.dry_run {
        handle_dry_run(&config, &seed_url, &config_hash);
        return Ok(());
    }

    handle_audit(&config, &seed_url, &config_hash, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_audit=info,warn"),
            1 => EnvFilter::new("seo_audit=debug,info"),
            _ => EnvFilter::new("seo_audit=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved settings
fn handle_dry_run(config: &Config, seed_url: &str, config_hash: &str) {
    println!("=== seo-audit Dry Run ===\n");

    println!("Target: {}", seed_url);
    println!("Config hash: {}", config_hash);

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!(
        "  Politeness delay: {}ms",
        config.crawler.politeness_delay_ms
    );
    println!(
        "  Request timeout: {}s (connect {}s)",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );
    println!("  Respect robots.txt: {}", config.crawler.respect_robots_txt);
    println!("  Probe site files: {}", config.crawler.probe_site_files);
    match config.crawler.audit_timeout_secs {
        0 => println!("  Audit timeout: none"),
        secs => println!("  Audit timeout: {}s", secs),
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Report: {}", config.output.report_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --history mode: lists stored audits
fn handle_history(config: &Config, limit: usize) -> Result<()> {
    let store = open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("failed to open {}", config.output.database_path))?;
    let audits = store.list_audits(limit)?;
    print_history(&audits);
    Ok(())
}

/// Mirrors audit status changes into the database
struct StoreObserver {
    store: Arc<Mutex<SqliteAuditStore>>,
    audit_id: i64,
}

impl AuditObserver for StoreObserver {
    fn on_status(&self, status: AuditStatus) {
        let Ok(mut store) = self.store.lock() else {
            tracing::warn!("Audit store lock poisoned, status {} not recorded", status);
            return;
        };
        if let Err(e) = store.update_status(self.audit_id, status, None) {
            tracing::warn!("Failed to record status {}: {}", status, e);
        }
    }

    fn on_page(&self, url: &str, crawled: usize, budget: usize) {
        tracing::debug!("[{}/{}] {}", crawled, budget, url);
    }
}

/// Writes the markdown report and, when requested, the JSON report
fn write_reports(
    seed_url: &str,
    report: &AuditReport,
    report_path: &Path,
    json_path: Option<&Path>,
) -> Result<(), AuditError> {
    write_markdown_report(seed_url, report, report_path)?;
    tracing::info!("Report written to {}", report_path.display());

    if let Some(json_path) = json_path {
        write_json_report(report, json_path)?;
        tracing::info!("JSON report written to {}", json_path.display());
    }
    Ok(())
}

/// Handles the main audit operation
async fn handle_audit(config: &Config, seed_url: &str, config_hash: &str, cli: &Cli) -> Result<()> {
    let mut runner = AuditRunner::from_config(config).context("failed to build crawler")?;

    let store = if cli.no_store {
        None
    } else {
        let mut store = open_storage(Path::new(&config.output.database_path))
            .with_context(|| format!("failed to open {}", config.output.database_path))?;
        let audit_id = store.create_audit(seed_url, config.crawler.max_pages, config_hash)?;
        tracing::info!("Recording audit {} in {}", audit_id, config.output.database_path);
        let store = Arc::new(Mutex::new(store));
        runner = runner.with_observer(Arc::new(StoreObserver {
            store: Arc::clone(&store),
            audit_id,
        }));
        Some((store, audit_id))
    };

    let report_path = Path::new(&config.output.report_path);
    let report = runner
        .run_audit_with_report(seed_url, config.crawler.max_pages, |report| {
            write_reports(seed_url, report, report_path, cli.json.as_deref())
        })
        .await;

    // Audits that fail before scoring skip the report stage
    if report.results.is_empty() && !report.is_completed() {
        if let Err(e) = write_markdown_report(seed_url, &report, report_path) {
            tracing::warn!("Failed to write {}: {}", report_path.display(), e);
        }
    }

    if let Some((store, audit_id)) = &store {
        let mut store = store
            .lock()
            .map_err(|_| anyhow::anyhow!("audit store lock poisoned"))?;
        store
            .save_report(*audit_id, &report)
            .context("failed to save audit")?;
    }

    if !cli.quiet {
        print_summary(&report);
    }

    if let Some(error) = &report.error_message {
        bail!("audit of {} failed: {}", seed_url, error);
    }
    Ok(())
}
