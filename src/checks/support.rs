//! Building blocks shared by every rule module

use std::collections::{HashMap, HashSet};

use serde_json::json;

use super::result::{Category, CheckResult, CheckStatus};
use crate::page::{ImageInfo, PageRecord, SiteContext};
use crate::url::normalize_url;

/// Number of offending URLs kept in a result's `details`
pub const MAX_DETAIL_URLS: usize = 10;

/// Number of example URLs spelled out in a result's cons
const MAX_EXAMPLE_URLS: usize = 3;

/// The fixed, measurement-independent part of a rule
#[derive(Debug, Clone, Copy)]
pub struct CheckInfo {
    pub name: &'static str,
    pub category: Category,
    /// Weight used by the aggregate score on fail or warning
    pub impact: u8,
    pub recommended: &'static str,
    pub ranking_impact: &'static str,
    pub solution: &'static str,
    pub enhancements: &'static [&'static str],
}

impl CheckInfo {
    /// Starts a result for this rule with the given measurement
    pub fn result(&self, status: CheckStatus, current: impl Into<String>) -> CheckResult {
        CheckResult {
            check_name: self.name.to_string(),
            category: self.category,
            status,
            impact_score: self.impact,
            current_value: current.into(),
            recommended_value: self.recommended.to_string(),
            pros: Vec::new(),
            cons: Vec::new(),
            ranking_impact: self.ranking_impact.to_string(),
            solution: self.solution.to_string(),
            enhancements: self.enhancements.iter().map(|e| e.to_string()).collect(),
            details: None,
        }
    }
}

/// Read-only view over the crawled pages and the site context
#[derive(Debug, Clone, Copy)]
pub struct PageSet<'a> {
    pages: &'a [PageRecord],
    site: &'a SiteContext,
}

impl<'a> PageSet<'a> {
    pub fn new(pages: &'a [PageRecord], site: &'a SiteContext) -> Self {
        Self { pages, site }
    }

    pub fn pages(&self) -> &'a [PageRecord] {
        self.pages
    }

    pub fn site(&self) -> &'a SiteContext {
        self.site
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, PageRecord> {
        self.pages.iter()
    }

    /// Pages matching `pred`, in crawl order
    pub fn flagged<F>(&self, pred: F) -> Vec<&'a PageRecord>
    where
        F: Fn(&PageRecord) -> bool,
    {
        self.pages.iter().filter(|p| pred(p)).collect()
    }

    pub fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&PageRecord) -> bool,
    {
        self.pages.iter().filter(|p| pred(p)).count()
    }

    /// Share of pages matching `pred`, as a percentage
    pub fn pct<F>(&self, pred: F) -> f64
    where
        F: Fn(&PageRecord) -> bool,
    {
        percent(self.count(pred), self.len())
    }

    pub fn avg_load_time(&self) -> f64 {
        if self.pages.is_empty() {
            return 0.0;
        }
        self.pages.iter().map(|p| p.load_time).sum::<f64>() / self.len() as f64
    }

    pub fn images(&self) -> impl Iterator<Item = &'a ImageInfo> + 'a {
        self.pages.iter().flat_map(|p| p.images.iter())
    }

    pub fn total_images(&self) -> usize {
        self.pages.iter().map(|p| p.images.len()).sum()
    }

    /// Crawled pages indexed by their normalized URL
    pub fn by_url(&self) -> HashMap<&'a str, &'a PageRecord> {
        self.pages.iter().map(|p| (p.url.as_str(), p)).collect()
    }
}

/// `part / whole * 100`, zero when `whole` is zero
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Pass at or above `pass_at` percent, warning at or above `warn_at`, else fail
pub fn coverage_status(pct: f64, pass_at: f64, warn_at: f64) -> CheckStatus {
    if pct >= pass_at {
        CheckStatus::Pass
    } else if pct >= warn_at {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    }
}

/// Pass when nothing is flagged, fail when more than `fail_share` of the
/// pages are, warning in between
pub fn share_status(flagged: usize, total: usize, fail_share: f64) -> CheckStatus {
    if flagged == 0 {
        CheckStatus::Pass
    } else if flagged as f64 > total as f64 * fail_share {
        CheckStatus::Fail
    } else {
        CheckStatus::Warning
    }
}

/// Pass when nothing is flagged, warning above `warn_pct` percent, info in between
pub fn soft_status(pct: f64, warn_pct: f64) -> CheckStatus {
    if pct == 0.0 {
        CheckStatus::Pass
    } else if pct > warn_pct {
        CheckStatus::Warning
    } else {
        CheckStatus::Info
    }
}

/// Number of entries that repeat an earlier one
pub fn duplicate_count<'s, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'s str>,
{
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| !seen.insert(*v)).count()
}

/// Normalized form of an absolute link, for matching against crawled pages
pub fn link_key(link: &str) -> Option<String> {
    normalize_url(link).ok().map(|u| u.to_string())
}

/// Lists the offending pages in the cons and in `details`
///
/// `what` completes "pages ..." (e.g. "missing a canonical tag").
pub fn with_offenders(
    mut result: CheckResult,
    offenders: &[&PageRecord],
    total: usize,
    what: &str,
) -> CheckResult {
    if offenders.is_empty() {
        return result;
    }

    result.cons.push(format!(
        "Found {} out of {} pages {}",
        offenders.len(),
        total,
        what
    ));

    let examples: Vec<&str> = offenders
        .iter()
        .take(MAX_EXAMPLE_URLS)
        .map(|p| p.url.as_str())
        .collect();
    result.cons.push(format!("Examples: {}", examples.join(", ")));
    if offenders.len() > MAX_EXAMPLE_URLS {
        result.cons.push(format!(
            "...and {} more pages",
            offenders.len() - MAX_EXAMPLE_URLS
        ));
    }

    let urls: Vec<&str> = offenders
        .iter()
        .take(MAX_DETAIL_URLS)
        .map(|p| p.url.as_str())
        .collect();
    result.details(json!({ "count": offenders.len(), "urls": urls }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: CheckInfo = CheckInfo {
        name: "Example rule",
        category: Category::Technical,
        impact: 40,
        recommended: "Everything fixed",
        ranking_impact: "Minor",
        solution: "Fix it",
        enhancements: &["Keep it fixed"],
    };

    fn page(url: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_info_result_carries_fixed_fields() {
        let result = INFO.result(CheckStatus::Info, "Unknown");
        assert_eq!(result.check_name, "Example rule");
        assert_eq!(result.impact_score, 40);
        assert_eq!(result.enhancements, vec!["Keep it fixed".to_string()]);
        assert!(result.details.is_none());
    }

    #[test]
    fn test_percent_guards_zero() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }

    #[test]
    fn test_share_status_thresholds() {
        assert_eq!(share_status(0, 10, 0.5), CheckStatus::Pass);
        assert_eq!(share_status(5, 10, 0.5), CheckStatus::Warning);
        assert_eq!(share_status(6, 10, 0.5), CheckStatus::Fail);
    }

    #[test]
    fn test_coverage_and_soft_status() {
        assert_eq!(coverage_status(80.0, 80.0, 50.0), CheckStatus::Pass);
        assert_eq!(coverage_status(50.0, 80.0, 50.0), CheckStatus::Warning);
        assert_eq!(coverage_status(49.9, 80.0, 50.0), CheckStatus::Fail);
        assert_eq!(soft_status(0.0, 20.0), CheckStatus::Pass);
        assert_eq!(soft_status(10.0, 20.0), CheckStatus::Info);
        assert_eq!(soft_status(25.0, 20.0), CheckStatus::Warning);
    }

    #[test]
    fn test_duplicate_count() {
        assert_eq!(duplicate_count(["a", "b", "a", "a"]), 2);
        assert_eq!(duplicate_count(Vec::<&str>::new()), 0);
    }

    #[test]
    fn test_with_offenders_truncates() {
        let pages: Vec<PageRecord> = (0..12)
            .map(|i| page(&format!("https://x.com/p{i}")))
            .collect();
        let refs: Vec<&PageRecord> = pages.iter().collect();

        let result = with_offenders(INFO.result(CheckStatus::Fail, "bad"), &refs, 20, "broken");

        assert_eq!(result.cons[0], "Found 12 out of 20 pages broken");
        assert!(result.cons[1].starts_with("Examples: https://x.com/p0, "));
        assert_eq!(result.cons[2], "...and 9 more pages");
        let details = result.details.unwrap();
        assert_eq!(details["count"], 12);
        assert_eq!(details["urls"].as_array().unwrap().len(), MAX_DETAIL_URLS);
    }

    #[test]
    fn test_link_key_normalizes() {
        assert_eq!(
            link_key("https://X.com/a/#top").as_deref(),
            Some("https://x.com/a")
        );
        assert_eq!(link_key("not a url"), None);
    }
}
