//! Markdown report generation
//!
//! This module renders an audit report as markdown: run information, the
//! score, per-category tables and remediation notes for every failed or
//! warning check.

use crate::audit::{summarize_by_category, AuditReport};
use crate::checks::{CheckResult, CheckStatus};
use crate::output::{ensure_parent_dir, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for `report` to `output_path`
///
/// # Arguments
///
/// * `seed_url` - The audited site, as given by the user
/// * `report` - The finished audit
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_markdown_report(
    seed_url: &str,
    report: &AuditReport,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(seed_url, report);

    ensure_parent_dir(output_path)?;
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats an audit report as markdown
pub fn format_markdown_report(seed_url: &str, report: &AuditReport) -> String {
    let mut md = String::new();
    let outcome = &report.outcome;
    let meta = &report.metadata;

    md.push_str(&format!("# SEO Audit Report: {}\n\n", seed_url));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Status**: {}\n", report.status));
    md.push_str(&format!("- **Started**: {}\n", meta.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", meta.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Duration**: {:.1} seconds\n", meta.elapsed_secs()));
    md.push_str(&format!("- **Pages Crawled**: {}\n", outcome.pages_crawled));
    md.push_str(&format!(
        "- **Average Load Time**: {:.2}s\n\n",
        meta.avg_load_time
    ));

    if let Some(error) = &report.error_message {
        md.push_str("## Error\n\n");
        md.push_str(&format!("The audit failed: {}\n", error));
        return md;
    }

    md.push_str("## Score\n\n");
    md.push_str(&format!(
        "**Overall score: {:.1} / 100**\n\n",
        outcome.overall_score
    ));
    md.push_str("| Result | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Passed | {} |\n", outcome.checks_passed));
    md.push_str(&format!("| Failed | {} |\n", outcome.checks_failed));
    md.push_str(&format!("| Warnings | {} |\n", outcome.checks_warning));
    md.push_str(&format!("| Informational | {} |\n", outcome.checks_info()));
    md.push_str(&format!("| **Total** | {} |\n\n", outcome.total_checks_run));

    md.push_str("## Categories\n\n");
    md.push_str("| Category | Passed | Failed | Warnings | Info |\n");
    md.push_str("|----------|--------|--------|----------|------|\n");
    for (category, summary) in summarize_by_category(&report.results) {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            category, summary.passed, summary.failed, summary.warning, summary.info
        ));
    }
    md.push('\n');

    push_issue_section(&mut md, "Failed Checks", report, CheckStatus::Fail);
    push_issue_section(&mut md, "Warnings", report, CheckStatus::Warning);

    md
}

/// Appends one section per result with `status`, highest impact first
fn push_issue_section(md: &mut String, title: &str, report: &AuditReport, status: CheckStatus) {
    let mut issues: Vec<&CheckResult> = report
        .results
        .iter()
        .filter(|r| r.status == status)
        .collect();
    if issues.is_empty() {
        return;
    }
    issues.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));

    md.push_str(&format!("## {} ({})\n\n", title, issues.len()));
    for issue in issues {
        md.push_str(&format!(
            "### {} (impact {})\n\n",
            issue.check_name, issue.impact_score
        ));
        md.push_str(&format!("- **Category**: {}\n", issue.category));
        md.push_str(&format!("- **Current**: {}\n", escape_cell(&issue.current_value)));
        md.push_str(&format!("- **Recommended**: {}\n", issue.recommended_value));
        md.push_str(&format!("- **Solution**: {}\n", issue.solution));
        for con in &issue.cons {
            md.push_str(&format!("  - {}\n", con));
        }
        md.push('\n');
    }
}

/// Keeps user-supplied text from breaking markdown lines
fn escape_cell(text: &str) -> String {
    text.replace('\n', " ").replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditMetadata, AuditOutcome, AuditStatus};
    use crate::checks::Category;
    use chrono::Utc;

    fn result(name: &str, status: CheckStatus, impact: u8) -> CheckResult {
        CheckResult {
            check_name: name.to_string(),
            category: Category::Technical,
            status,
            impact_score: impact,
            current_value: "measured".to_string(),
            recommended_value: "target".to_string(),
            pros: vec![],
            cons: vec![format!("{name} con")],
            ranking_impact: String::new(),
            solution: format!("fix {name}"),
            enhancements: vec![],
            details: None,
        }
    }

    fn report(results: Vec<CheckResult>) -> AuditReport {
        let now = Utc::now();
        AuditReport {
            seed_url: "https://x.com".to_string(),
            status: AuditStatus::Completed,
            outcome: AuditOutcome::from_results(4, &results),
            results,
            metadata: AuditMetadata::from_pages(now, now, &[]),
            error_message: None,
        }
    }

    #[test]
    fn test_report_contains_score_and_categories() {
        let md = format_markdown_report(
            "https://x.com",
            &report(vec![
                result("HTTPS not enforced", CheckStatus::Pass, 95),
                result("Missing canonical tags", CheckStatus::Warning, 80),
            ]),
        );

        assert!(md.starts_with("# SEO Audit Report: https://x.com"));
        assert!(md.contains("**Overall score: 44.0 / 100**"));
        assert!(md.contains("| Technical SEO | 1 | 0 | 1 | 0 |"));
        assert!(md.contains("## Warnings (1)"));
        assert!(md.contains("- **Solution**: fix Missing canonical tags"));
        assert!(!md.contains("## Failed Checks"));
    }

    #[test]
    fn test_failures_sorted_by_impact() {
        let md = format_markdown_report(
            "https://x.com",
            &report(vec![
                result("Low", CheckStatus::Fail, 10),
                result("High", CheckStatus::Fail, 90),
            ]),
        );
        let high = md.find("### High").unwrap();
        let low = md.find("### Low").unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_failed_audit_shows_error() {
        let mut failed = report(vec![]);
        failed.status = AuditStatus::Failed;
        failed.error_message =
            Some("Invalid seed URL 'x': relative URL without a base".to_string());

        let md = format_markdown_report("https://x.com", &failed);
        assert!(md.contains("## Error"));
        assert!(md.contains("Invalid seed URL"));
        assert!(!md.contains("## Score"));
    }

    #[test]
    fn test_write_markdown_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        write_markdown_report("https://x.com", &report(vec![]), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("## Run Information"));
    }
}
