//! Content quality rules

use super::registry::CheckRule;
use super::result::{Category, CheckResult, CheckStatus};
use super::support::{duplicate_count, with_offenders, CheckInfo, PageSet};
use crate::page::PageRecord;

const CATEGORY: Category = Category::Content;

/// Pages under this many words count as thin
const THIN_WORDS: usize = 300;

/// Average sentence length above which text reads as complex
const MAX_WORDS_PER_SENTENCE: f64 = 25.0;

pub(super) fn rules() -> Vec<CheckRule> {
    vec![
        CheckRule::pages(CONTENT_LENGTH, content_length),
        CheckRule::unmeasured(
            FRESHNESS,
            "Requires publication date analysis",
            "Publication history is not available from a single crawl",
        ),
        CheckRule::pages(DUPLICATE_CONTENT, duplicate_content),
        CheckRule::pages(READABILITY, readability),
        CheckRule::unmeasured(
            COMPREHENSIVE,
            "Competitive content analysis needed",
            "Topic coverage needs competitor data",
        ),
        CheckRule::unmeasured(
            AI_GENERATED,
            "Content authenticity assessment needed",
            "Authorship review is manual",
        ),
        CheckRule::unmeasured(
            KEYWORD_DENSITY,
            "Keyword analysis required",
            "Target keywords are not known to the audit",
        ),
        CheckRule::unmeasured(
            SEMANTIC_KEYWORDS,
            "LSI keyword analysis required",
            "Semantic coverage needs keyword research",
        ),
        CheckRule::unmeasured(
            SEARCH_INTENT,
            "Intent analysis required",
            "Intent matching needs query data",
        ),
        CheckRule::unmeasured(
            UPDATE_SCHEDULE,
            "Content maintenance review needed",
            "Editorial schedules are not visible on the site",
        ),
    ]
}

const CONTENT_LENGTH: CheckInfo = CheckInfo {
    name: "Thin content - insufficient word count (<800 words)",
    category: CATEGORY,
    impact: 85,
    recommended: "800+ words for main pages, 300+ minimum",
    ranking_impact: "Thin pages rarely rank and can drag down site-wide quality signals",
    solution: "Expand thin pages with useful detail, or merge and noindex them",
    enhancements: &["Answer the follow-up questions readers ask", "Add examples and data"],
};

fn content_length(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let thin = pages.flagged(|p| p.word_count < THIN_WORDS);
    let avg = if pages.is_empty() {
        0.0
    } else {
        pages.iter().map(|p| p.word_count).sum::<usize>() as f64 / pages.len() as f64
    };
    let status = if thin.len() as f64 > pages.len() as f64 * 0.4 {
        CheckStatus::Fail
    } else if !thin.is_empty() {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    let result = info.result(
        status,
        format!(
            "{avg:.0} words average, {} thin pages (<300 words)",
            thin.len()
        ),
    );
    with_offenders(result, &thin, pages.len(), "under 300 words")
}

const FRESHNESS: CheckInfo = CheckInfo {
    name: "Content not updated recently (>1 year)",
    category: CATEGORY,
    impact: 70,
    recommended: "Regular content updates, especially for time-sensitive topics",
    ranking_impact: "Fresh content ranks better for time-sensitive queries",
    solution: "Review and refresh key pages at least yearly",
    enhancements: &[],
};

const DUPLICATE_CONTENT: CheckInfo = CheckInfo {
    name: "Duplicate content across pages",
    category: CATEGORY,
    impact: 80,
    recommended: "All pages should have unique content and titles",
    ranking_impact: "Duplicate pages split ranking signals and waste crawl budget",
    solution: "Differentiate or consolidate duplicate pages and canonicalize the rest",
    enhancements: &[],
};

fn duplicate_content(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let duplicates = duplicate_count(
        pages
            .iter()
            .filter_map(|p| p.title.as_deref())
            .filter(|t| !t.is_empty()),
    );
    let status = if duplicates > 0 {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    };
    info.result(status, format!("{duplicates} duplicate titles found"))
}

const READABILITY: CheckInfo = CheckInfo {
    name: "Readability score too complex (>12th grade)",
    category: CATEGORY,
    impact: 65,
    recommended: "8th-10th grade reading level for most content",
    ranking_impact: "Readable content keeps visitors engaged longer",
    solution: "Shorten sentences, use plain words and break up long paragraphs",
    enhancements: &[],
};

fn words_per_sentence(page: &PageRecord) -> Option<f64> {
    let words = page.text.split_whitespace().count();
    if words == 0 {
        return None;
    }
    let sentences = page.text.split('.').count();
    Some(words as f64 / sentences as f64)
}

fn is_complex(page: &PageRecord) -> bool {
    words_per_sentence(page).is_some_and(|avg| avg > MAX_WORDS_PER_SENTENCE)
}

fn readability(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let complex = pages.flagged(is_complex);
    let status = if complex.is_empty() {
        CheckStatus::Pass
    } else if (complex.len() as f64) < pages.len() as f64 * 0.5 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    let result = info.result(
        status,
        format!("{} pages with complex readability", complex.len()),
    );
    with_offenders(result, &complex, pages.len(), "averaging over 25 words per sentence")
}

const COMPREHENSIVE: CheckInfo = CheckInfo {
    name: "Content could be more comprehensive",
    category: CATEGORY,
    impact: 83,
    recommended: "More comprehensive than competitors",
    ranking_impact: "Thorough coverage wins long-tail queries",
    solution: "Compare against the top results and fill the gaps",
    enhancements: &[],
};

const AI_GENERATED: CheckInfo = CheckInfo {
    name: "Content may be AI-generated without human review",
    category: CATEGORY,
    impact: 80,
    recommended: "Human-reviewed, original content",
    ranking_impact: "Unreviewed generated text tends to be generic and low in expertise",
    solution: "Have subject experts review and enrich generated drafts",
    enhancements: &[],
};

const KEYWORD_DENSITY: CheckInfo = CheckInfo {
    name: "Primary keyword density too low",
    category: CATEGORY,
    impact: 75,
    recommended: "1-2% keyword density (natural usage)",
    ranking_impact: "Pages need to mention their topic clearly to rank for it",
    solution: "Use the primary keyword naturally in headings and body text",
    enhancements: &[],
};

const SEMANTIC_KEYWORDS: CheckInfo = CheckInfo {
    name: "No semantic keywords (LSI)",
    category: CATEGORY,
    impact: 78,
    recommended: "Rich semantic keyword coverage",
    ranking_impact: "Related terms help search engines understand topical depth",
    solution: "Cover related entities and subtopics of the main keyword",
    enhancements: &[],
};

const SEARCH_INTENT: CheckInfo = CheckInfo {
    name: "Content doesn't match search intent",
    category: CATEGORY,
    impact: 92,
    recommended: "Content aligned with user search intent",
    ranking_impact: "Mismatched intent is one of the main reasons good pages fail to rank",
    solution: "Match the format and depth of the pages already ranking for the query",
    enhancements: &[],
};

const UPDATE_SCHEDULE: CheckInfo = CheckInfo {
    name: "No content update schedule",
    category: CATEGORY,
    impact: 70,
    recommended: "Regular content updates (quarterly minimum)",
    ranking_impact: "A maintenance cadence keeps content accurate and fresh",
    solution: "Set a quarterly review calendar for important pages",
    enhancements: &[],
};
