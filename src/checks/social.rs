//! Social media rules

use super::registry::CheckRule;
use super::result::{Category, CheckResult, CheckStatus};
use super::support::{coverage_status, CheckInfo, PageSet};
use crate::page::PageRecord;

const CATEGORY: Category = Category::Social;

const SOCIAL_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "instagram.com",
    "youtube.com",
];

pub(super) fn rules() -> Vec<CheckRule> {
    vec![
        CheckRule::pages(PRESENCE, social_presence),
        CheckRule::pages(SHARING, social_sharing),
        CheckRule::unmeasured(
            PROMINENCE,
            "Visibility assessment needed",
            "Link placement needs a rendered page",
        ),
        CheckRule::unmeasured(
            BRANDING,
            "Cross-platform audit needed",
            "Social profiles are outside the crawled site",
        ),
        CheckRule::pages(SOCIAL_PROOF, social_proof),
    ]
}

const PRESENCE: CheckInfo = CheckInfo {
    name: "Limited social media presence",
    category: CATEGORY,
    impact: 55,
    recommended: "Social media links visible site-wide",
    ranking_impact: "Social profiles reinforce brand entity signals",
    solution: "Link the brand's social profiles from the site header or footer",
    enhancements: &["Add sameAs links to the Organization schema"],
};

fn links_to_social(page: &PageRecord) -> bool {
    page.external_links
        .iter()
        .any(|link| SOCIAL_DOMAINS.iter().any(|domain| link.contains(domain)))
}

fn social_presence(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(links_to_social);
    info.result(
        coverage_status(pct, 50.0, 20.0),
        format!("{pct:.0}% pages link to social profiles"),
    )
}

const SHARING: CheckInfo = CheckInfo {
    name: "Low social sharing indicators",
    category: CATEGORY,
    impact: 50,
    recommended: "All content pages should have share buttons",
    ranking_impact: "Easy sharing extends reach and earns links",
    solution: "Add lightweight share buttons to articles and products",
    enhancements: &[],
};

fn social_sharing(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(|p| p.html_contains_any(&["share", "social"]));
    let status = if pct >= 50.0 {
        CheckStatus::Pass
    } else if pct >= 20.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{pct:.0}% pages have sharing elements"))
}

const PROMINENCE: CheckInfo = CheckInfo {
    name: "Social media links not prominent",
    category: CATEGORY,
    impact: 52,
    recommended: "Social links in header or footer",
    ranking_impact: "Visible links make profiles easy to find",
    solution: "Place social icons in the global header or footer",
    enhancements: &[],
};

const BRANDING: CheckInfo = CheckInfo {
    name: "Inconsistent branding across platforms",
    category: CATEGORY,
    impact: 58,
    recommended: "Consistent branding across all platforms",
    ranking_impact: "Consistent naming helps search engines tie profiles to the brand",
    solution: "Use the same name, logo and description everywhere",
    enhancements: &[],
};

const SOCIAL_PROOF: CheckInfo = CheckInfo {
    name: "No social proof elements",
    category: CATEGORY,
    impact: 68,
    recommended: "Social proof on key pages (home, products, services)",
    ranking_impact: "Reviews and testimonials raise trust and conversion",
    solution: "Show testimonials, ratings and review counts with Review markup",
    enhancements: &[],
};

fn social_proof(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(|p| p.html_contains_any(&["testimonial", "review", "rating"]));
    let status = if pct > 30.0 {
        CheckStatus::Pass
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{pct:.0}% pages with social proof"))
}
