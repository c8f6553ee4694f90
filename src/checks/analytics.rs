//! Analytics and reporting rules

use super::registry::CheckRule;
use super::result::{Category, CheckResult, CheckStatus};
use super::support::{with_offenders, CheckInfo, PageSet};
use crate::page::PageRecord;

const CATEGORY: Category = Category::Analytics;

pub(super) fn rules() -> Vec<CheckRule> {
    vec![
        CheckRule::pages(GOOGLE_ANALYTICS, google_analytics),
        CheckRule::pages(TAG_MANAGER, tag_manager),
        CheckRule::pages(SEARCH_CONSOLE, search_console),
        CheckRule::unmeasured(
            CONVERSIONS,
            "Requires GA4 configuration review",
            "Goal configuration lives in the analytics account",
        ),
        CheckRule::unmeasured(
            DATA_QUALITY,
            "Data audit required",
            "Collected data is only visible in the analytics account",
        ),
        CheckRule::unmeasured(
            CUSTOM_EVENTS,
            "Event tracking review needed",
            "Event configuration lives in the analytics account",
        ),
    ]
}

const GOOGLE_ANALYTICS: CheckInfo = CheckInfo {
    name: "Google Analytics 4 (GA4) not found",
    category: CATEGORY,
    impact: 75,
    recommended: "GA4 on all pages",
    ranking_impact: "Without analytics there is no way to measure SEO results",
    solution: "Install the GA4 gtag snippet or load GA4 through Tag Manager on every page",
    enhancements: &["Link GA4 with Search Console"],
};

fn has_google_analytics(page: &PageRecord) -> bool {
    page.html_contains("google-analytics.com")
        || page.html_contains("gtag")
        || page.html_contains("ga(")
}

fn google_analytics(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(has_google_analytics);
    let status = if pct < 50.0 {
        CheckStatus::Fail
    } else if pct < 100.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    let untracked = pages.flagged(|p| !has_google_analytics(p));
    let result = info.result(status, format!("{pct:.0}% pages have GA tracking"));
    with_offenders(result, &untracked, pages.len(), "without Google Analytics")
}

const TAG_MANAGER: CheckInfo = CheckInfo {
    name: "Google Tag Manager not implemented",
    category: CATEGORY,
    impact: 65,
    recommended: "GTM on all pages",
    ranking_impact: "A tag manager keeps tracking changes out of deploys",
    solution: "Add the GTM container snippet to the shared page template",
    enhancements: &[],
};

fn tag_manager(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(|p| p.html_contains("googletagmanager.com"));
    let status = if pct < 100.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    info.result(status, format!("{pct:.0}% pages have GTM"))
}

const SEARCH_CONSOLE: CheckInfo = CheckInfo {
    name: "Google Search Console not verified",
    category: CATEGORY,
    impact: 85,
    recommended: "Verified and monitored weekly",
    ranking_impact: "Search Console reports indexing problems and search performance",
    solution: "Verify the domain in Search Console via DNS or the verification meta tag",
    enhancements: &[],
};

fn search_console(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    if pages.iter().any(|p| p.html_contains("google-site-verification")) {
        return info
            .result(CheckStatus::Pass, "Verification meta tag found")
            .pro("Site ownership verification tag is in place");
    }
    info.result(CheckStatus::Info, "Manual verification required")
        .con("DNS or file verification cannot be seen from the pages")
}

const CONVERSIONS: CheckInfo = CheckInfo {
    name: "Conversion tracking not set up",
    category: CATEGORY,
    impact: 78,
    recommended: "All key conversions tracked",
    ranking_impact: "Conversion data shows which rankings actually pay off",
    solution: "Mark key events as conversions in GA4",
    enhancements: &[],
};

const DATA_QUALITY: CheckInfo = CheckInfo {
    name: "Analytics data gaps or inconsistencies",
    category: CATEGORY,
    impact: 70,
    recommended: "Clean, consistent data collection",
    ranking_impact: "Bad data leads to wrong SEO decisions",
    solution: "Filter internal traffic and bots and check for duplicate tags",
    enhancements: &[],
};

const CUSTOM_EVENTS: CheckInfo = CheckInfo {
    name: "No custom event tracking",
    category: CATEGORY,
    impact: 60,
    recommended: "Custom events for all important interactions",
    ranking_impact: "Engagement events reveal how organic visitors use the site",
    solution: "Track form submits, downloads and key clicks as events",
    enhancements: &[],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::{page, run};

    fn with_html(url: &str, html: &str) -> PageRecord {
        PageRecord {
            html: html.to_string(),
            ..page(url)
        }
    }

    #[test]
    fn test_google_analytics_coverage() {
        let tracked = with_html("https://x.com/", "<script>gtag('config', 'G-1');</script>");
        let bare = with_html("https://x.com/a", "<p>hi</p>");

        assert_eq!(
            run(&GOOGLE_ANALYTICS, google_analytics, &[tracked.clone()]).status,
            CheckStatus::Pass
        );
        assert_eq!(
            run(&GOOGLE_ANALYTICS, google_analytics, &[tracked.clone(), bare.clone()]).status,
            CheckStatus::Warning
        );
        assert_eq!(
            run(&GOOGLE_ANALYTICS, google_analytics, &[tracked, bare.clone(), bare]).status,
            CheckStatus::Fail
        );
    }

    #[test]
    fn test_search_console_meta_tag() {
        let verified = with_html(
            "https://x.com/",
            r#"<meta name="google-site-verification" content="abc">"#,
        );
        assert_eq!(
            run(&SEARCH_CONSOLE, search_console, &[verified]).status,
            CheckStatus::Pass
        );
        assert_eq!(
            run(&SEARCH_CONSOLE, search_console, &[page("https://x.com/")]).status,
            CheckStatus::Info
        );
    }
}
