//! Terminal summaries of audits

use std::fmt::Write as _;

use crate::audit::{summarize_by_category, AuditReport};
use crate::checks::CheckStatus;
use crate::storage::AuditRecord;

/// Number of top issues listed in the terminal summary
const TOP_ISSUES: usize = 5;

/// Formats the terminal summary of an audit
pub fn format_summary(report: &AuditReport) -> String {
    let mut out = String::new();
    let outcome = &report.outcome;

    let _ = writeln!(out, "=== SEO Audit: {} ===\n", report.seed_url);
    let _ = writeln!(out, "Status: {}", report.status);

    if let Some(error) = &report.error_message {
        let _ = writeln!(out, "Error: {}", error);
        return out;
    }

    let _ = writeln!(out, "Overall score: {:.1} / 100", outcome.overall_score);
    let _ = writeln!(
        out,
        "Pages crawled: {} (avg load {:.2}s)",
        outcome.pages_crawled, report.metadata.avg_load_time
    );
    let _ = writeln!(
        out,
        "Checks: {} total, {} passed, {} failed, {} warnings, {} info\n",
        outcome.total_checks_run,
        outcome.checks_passed,
        outcome.checks_failed,
        outcome.checks_warning,
        outcome.checks_info()
    );

    let _ = writeln!(out, "By category:");
    for (category, summary) in summarize_by_category(&report.results) {
        let _ = writeln!(
            out,
            "  {:<32} {:>3} pass {:>3} fail {:>3} warn",
            category.name(),
            summary.passed,
            summary.failed,
            summary.warning
        );
    }

    let mut issues: Vec<_> = report
        .results
        .iter()
        .filter(|r| r.is_scored_issue())
        .collect();
    issues.sort_by(|a, b| {
        b.impact_score
            .cmp(&a.impact_score)
            .then_with(|| (a.status == CheckStatus::Warning).cmp(&(b.status == CheckStatus::Warning)))
    });
    if !issues.is_empty() {
        let _ = writeln!(out, "\nTop issues:");
        for issue in issues.into_iter().take(TOP_ISSUES) {
            let _ = writeln!(
                out,
                "  [{}] {} (impact {}): {}",
                issue.status, issue.check_name, issue.impact_score, issue.current_value
            );
        }
    }

    out
}

/// Prints the terminal summary of an audit
pub fn print_summary(report: &AuditReport) {
    print!("{}", format_summary(report));
}

/// Prints stored audits, one per line
pub fn print_history(audits: &[AuditRecord]) {
    if audits.is_empty() {
        println!("No audits stored yet");
        return;
    }

    println!("{:>5}  {:<25}  {:<10}  {:>6}  {:>5}  URL", "ID", "Created", "Status", "Score", "Pages");
    for audit in audits {
        let score = audit
            .overall_score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<25}  {:<10}  {:>6}  {:>5}  {}",
            audit.id,
            audit.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            audit.status,
            score,
            audit.pages_crawled,
            audit.seed_url
        );
    }
}
