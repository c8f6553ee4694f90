//! Aggregation of check results into the audit score

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checks::{Category, CheckResult, CheckStatus};
use crate::page::PageRecord;

/// Share of the averaged impact subtracted from the pass rate
const PENALTY_FACTOR: f64 = 0.3;

/// Weight of a warning relative to a failure
const WARNING_WEIGHT: f64 = 0.5;

/// Top-level counts and score of one audit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub pages_crawled: usize,
    pub total_checks_run: usize,
    pub checks_passed: usize,
    pub checks_failed: usize,
    pub checks_warning: usize,
    /// 0-100, rounded to one decimal
    pub overall_score: f64,
}

impl AuditOutcome {
    /// Scores a result list
    ///
    /// `info` results count toward the total but neither pass nor add
    /// impact, so they dilute the score.
    pub fn from_results(pages_crawled: usize, results: &[CheckResult]) -> Self {
        let total = results.len();
        let count = |status: CheckStatus| results.iter().filter(|r| r.status == status).count();
        let impact = |status: CheckStatus| {
            results
                .iter()
                .filter(|r| r.status == status)
                .map(|r| f64::from(r.impact_score))
                .sum::<f64>()
        };

        let passed = count(CheckStatus::Pass);
        let failed = count(CheckStatus::Fail);
        let warning = count(CheckStatus::Warning);

        let overall_score = if total == 0 {
            0.0
        } else {
            let total_impact =
                impact(CheckStatus::Fail) + WARNING_WEIGHT * impact(CheckStatus::Warning);
            let base = passed as f64 / total as f64 * 100.0;
            let penalty = total_impact / total as f64 * PENALTY_FACTOR;
            round_one_decimal((base - penalty).clamp(0.0, 100.0))
        };

        Self {
            pages_crawled,
            total_checks_run: total,
            checks_passed: passed,
            checks_failed: failed,
            checks_warning: warning,
            overall_score,
        }
    }

    /// Results that were neither pass, fail nor warning
    pub fn checks_info(&self) -> usize {
        self.total_checks_run - self.checks_passed - self.checks_failed - self.checks_warning
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Per-category status counts for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategorySummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warning: usize,
    pub info: usize,
}

/// Status counts for each category present in `results`, in category order
pub fn summarize_by_category(results: &[CheckResult]) -> Vec<(Category, CategorySummary)> {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let mut summary = CategorySummary::default();
            for result in results.iter().filter(|r| r.category == category) {
                summary.total += 1;
                match result.status {
                    CheckStatus::Pass => summary.passed += 1,
                    CheckStatus::Fail => summary.failed += 1,
                    CheckStatus::Warning => summary.warning += 1,
                    CheckStatus::Info => summary.info += 1,
                }
            }
            (summary.total > 0).then_some((category, summary))
        })
        .collect()
}

/// Timing facts about one audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditMetadata {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Sum of page load times in seconds
    pub crawl_time: f64,
    /// Mean page load time in seconds, 0 without pages
    pub avg_load_time: f64,
}

impl AuditMetadata {
    pub fn from_pages(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        pages: &[PageRecord],
    ) -> Self {
        let crawl_time: f64 = pages.iter().map(|p| p.load_time).sum();
        let avg_load_time = if pages.is_empty() {
            0.0
        } else {
            crawl_time / pages.len() as f64
        };
        Self {
            started_at,
            finished_at,
            crawl_time,
            avg_load_time,
        }
    }

    /// Wall-clock duration of the run in seconds
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
