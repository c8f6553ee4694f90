//! Generative and answer engine optimization rules

use super::registry::CheckRule;
use super::result::{Category, CheckResult, CheckStatus};
use super::support::{CheckInfo, PageSet};
use crate::page::PageRecord;

const CATEGORY: Category = Category::Geo;

const QUESTION_WORDS: &[&str] = &["what", "who", "where", "when", "why", "how"];

pub(super) fn rules() -> Vec<CheckRule> {
    vec![
        CheckRule::pages(FAQ_SCHEMA, faq_schema),
        CheckRule::pages(HOWTO_SCHEMA, howto_schema),
        CheckRule::unmeasured(
            AI_OVERVIEW,
            "AI Overview monitoring required",
            "AI answer visibility needs query monitoring",
        ),
        CheckRule::pages(VOICE_SEARCH, voice_search),
        CheckRule::pages(ORGANIZATION_SCHEMA, organization_schema),
        CheckRule::pages(LOCAL_BUSINESS_SCHEMA, local_business_schema),
        CheckRule::unmeasured(
            BUSINESS_PROFILE,
            "Manual verification required",
            "Business profiles live outside the site",
        ),
        CheckRule::unmeasured(
            NAP_CONSISTENCY,
            "Citation audit required",
            "Listings across directories need a citation audit",
        ),
    ]
}

const FAQ_SCHEMA: CheckInfo = CheckInfo {
    name: "FAQ schema markup missing",
    category: CATEGORY,
    impact: 82,
    recommended: "FAQ schema on relevant pages",
    ranking_impact: "Question-and-answer markup is readily quoted by AI answers",
    solution: "Add FAQPage JSON-LD to pages with question-and-answer content",
    enhancements: &["Keep answers under 50 words"],
};

fn faq_schema(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(|p| p.html_contains("FAQPage") || p.html_contains("Question"));
    let status = if pct < 20.0 {
        CheckStatus::Warning
    } else if pct > 50.0 {
        CheckStatus::Pass
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{pct:.0}% pages with FAQ schema"))
}

const HOWTO_SCHEMA: CheckInfo = CheckInfo {
    name: "HowTo schema markup missing",
    category: CATEGORY,
    impact: 75,
    recommended: "HowTo schema on tutorial/guide pages",
    ranking_impact: "Step markup helps engines lift instructions into answers",
    solution: "Add HowTo JSON-LD to step-by-step guides",
    enhancements: &[],
};

fn howto_schema(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(|p| p.html_contains("HowTo"));
    let status = if pct > 10.0 {
        CheckStatus::Pass
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{pct:.0}% pages with HowTo schema"))
}

const AI_OVERVIEW: CheckInfo = CheckInfo {
    name: "Not ranking in AI Overview/SGE",
    category: CATEGORY,
    impact: 88,
    recommended: "Appearing in AI Overviews for target queries",
    ranking_impact: "AI Overviews take clicks from the classic results",
    solution: "Answer target questions directly and cite sources",
    enhancements: &[],
};

const VOICE_SEARCH: CheckInfo = CheckInfo {
    name: "Content not optimized for voice search",
    category: CATEGORY,
    impact: 70,
    recommended: "Natural language Q&A on all pages",
    ranking_impact: "Voice assistants read out concise answers to spoken questions",
    solution: "Phrase headings as questions and answer them in the first sentence",
    enhancements: &[],
};

fn has_question_content(page: &PageRecord) -> bool {
    page.text.contains('?')
        || page
            .text
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| QUESTION_WORDS.iter().any(|q| word.eq_ignore_ascii_case(q)))
}

fn voice_search(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(has_question_content);
    let status = if pct > 60.0 {
        CheckStatus::Pass
    } else if pct > 30.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    info.result(status, format!("{pct:.0}% pages with question-based content"))
}

const ORGANIZATION_SCHEMA: CheckInfo = CheckInfo {
    name: "Organization schema missing",
    category: CATEGORY,
    impact: 80,
    recommended: "Organization schema on homepage",
    ranking_impact: "Organization markup anchors the brand entity for knowledge panels",
    solution: "Add Organization JSON-LD with name, logo, url and sameAs to the home page",
    enhancements: &[],
};

fn organization_schema(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let found = pages.count(|p| p.html_contains("Organization") && p.html_contains("schema.org"));
    if found == 0 {
        info.result(CheckStatus::Fail, "Missing")
            .con("No page declares the organization behind the site")
    } else {
        info.result(CheckStatus::Pass, "Organization schema present")
            .pro(format!("Found on {found} pages"))
    }
}

const LOCAL_BUSINESS_SCHEMA: CheckInfo = CheckInfo {
    name: "LocalBusiness schema missing",
    category: CATEGORY,
    impact: 85,
    recommended: "LocalBusiness schema if applicable",
    ranking_impact: "LocalBusiness markup feeds local pack and map results",
    solution: "Add LocalBusiness JSON-LD with address, hours and phone",
    enhancements: &[],
};

fn local_business_schema(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let found = pages.iter().any(|p| p.html_contains("LocalBusiness"));
    let current = if found {
        "LocalBusiness schema present"
    } else {
        "Not detected"
    };
    info.result(CheckStatus::Info, current)
}

const BUSINESS_PROFILE: CheckInfo = CheckInfo {
    name: "No Google Business Profile integration",
    category: CATEGORY,
    impact: 90,
    recommended: "Claimed and optimized GBP",
    ranking_impact: "The business profile drives local visibility",
    solution: "Claim and complete the Google Business Profile",
    enhancements: &[],
};

const NAP_CONSISTENCY: CheckInfo = CheckInfo {
    name: "Missing NAP (Name, Address, Phone) consistency",
    category: CATEGORY,
    impact: 75,
    recommended: "100% NAP consistency across all listings",
    ranking_impact: "Inconsistent listings weaken local ranking signals",
    solution: "Use identical name, address and phone across site and listings",
    enhancements: &[],
};
