//! On-page SEO rules: titles, descriptions, headings, images and linking

use std::collections::{HashMap, VecDeque};

use super::registry::CheckRule;
use super::result::{Category, CheckResult, CheckStatus};
use super::support::{
    coverage_status, duplicate_count, link_key, percent, with_offenders, CheckInfo, PageSet,
};
use crate::page::PageRecord;

const CATEGORY: Category = Category::OnPage;

const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
const DESCRIPTION_MIN: usize = 120;
const DESCRIPTION_MAX: usize = 160;

/// Clicks from the first crawled page beyond which a page counts as deep
const MAX_CLICK_DEPTH: usize = 3;

const CTA_WORDS: &[&str] = &[
    "click", "learn", "discover", "find", "get", "try", "download", "buy", "shop", "read",
];

pub(super) fn rules() -> Vec<CheckRule> {
    vec![
        CheckRule::pages(TITLE, titles),
        CheckRule::pages(DESCRIPTION, descriptions),
        CheckRule::pages(H1, h1_tags),
        CheckRule::pages(HIERARCHY, heading_hierarchy),
        CheckRule::pages(ALT_TEXT, alt_text),
        CheckRule::pages(INTERNAL_LINKING, internal_linking),
        CheckRule::pages(BROKEN_LINKS, broken_links),
        CheckRule::pages(BREADCRUMBS, breadcrumbs),
        CheckRule::pages(DUPLICATE_TITLES, duplicate_titles),
        CheckRule::pages(DUPLICATE_DESCRIPTIONS, duplicate_descriptions),
        CheckRule::pages(DUPLICATE_H1, duplicate_h1),
        CheckRule::unmeasured(
            KEYWORD_IN_TITLE,
            "Keyword analysis required",
            "Target keywords are not known to the audit",
        ),
        CheckRule::unmeasured(
            TITLE_INTENT,
            "Search intent analysis required",
            "Intent matching needs query data",
        ),
        CheckRule::pages(DESCRIPTION_CTA, description_cta),
        CheckRule::unmeasured(
            KEYWORD_IN_H1,
            "Keyword analysis required",
            "Target keywords are not known to the audit",
        ),
        CheckRule::pages(MISSING_H2, missing_h2),
        CheckRule::unmeasured(
            HEADING_FORMATTING,
            "Visual heading audit needed",
            "Heading styles need a rendered page",
        ),
        CheckRule::pages(ALT_QUALITY, alt_quality),
        CheckRule::unmeasured(
            ALT_STUFFING,
            "Alt text keyword analysis required",
            "Keyword stuffing needs target keywords",
        ),
        CheckRule::unmeasured(
            DECORATIVE_ALT,
            "Image role assessment needed",
            "Whether an image is decorative needs manual review",
        ),
        CheckRule::unmeasured(
            ANCHOR_TEXT,
            "Anchor text analysis required",
            "Anchor wording needs manual review",
        ),
        CheckRule::unmeasured(
            ORPHAN_PAGES,
            "Full site crawl needed",
            "Every crawled page was reached through a link",
        ),
        CheckRule::pages(DEEP_PAGES, deep_pages),
        CheckRule::pages(TABLE_OF_CONTENTS, table_of_contents),
        CheckRule::pages(AUTHOR, author_info),
        CheckRule::pages(PUBLISH_DATE, publish_date),
        CheckRule::pages(RELATED_CONTENT, related_content),
        CheckRule::pages(JUMP_LINKS, jump_links),
        CheckRule::pages(IMAGE_DIMENSIONS, image_dimensions),
        CheckRule::pages(H1_EQUALS_TITLE, h1_equals_title),
    ]
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

const TITLE: CheckInfo = CheckInfo {
    name: "Meta title issues",
    category: CATEGORY,
    impact: 100,
    recommended: "30-60 characters, unique per page",
    ranking_impact: "The title is the strongest on-page relevance signal and the headline in search results",
    solution: "Write a unique 30-60 character title per page with the main keyword near the start",
    enhancements: &["Put the brand at the end", "Avoid pipes stuffed with keywords"],
};

fn titles(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let mut missing = 0;
    let mut short = 0;
    let mut long = 0;
    let mut offenders = Vec::new();

    for page in pages.iter() {
        match page.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => missing += 1,
            Some(t) if char_len(t) < TITLE_MIN => short += 1,
            Some(t) if char_len(t) > TITLE_MAX => long += 1,
            Some(_) => continue,
        }
        offenders.push(page);
    }

    let status = if missing > 0 {
        CheckStatus::Fail
    } else if !offenders.is_empty() {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    let result = info.result(
        status,
        format!(
            "{} issues ({missing} missing, {short} too short, {long} too long)",
            offenders.len()
        ),
    );
    with_offenders(result, &offenders, pages.len(), "with a missing or badly sized title")
}

const DESCRIPTION: CheckInfo = CheckInfo {
    name: "Meta description issues",
    category: CATEGORY,
    impact: 85,
    recommended: "120-160 characters, unique per page",
    ranking_impact: "Descriptions are the snippet text and drive click-through",
    solution: "Write a unique 120-160 character description summarizing each page",
    enhancements: &["End with a call to action"],
};

fn descriptions(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let mut missing = 0;
    let mut short = 0;
    let mut long = 0;
    let mut offenders = Vec::new();

    for page in pages.iter() {
        match page
            .meta_description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            None => missing += 1,
            Some(d) if char_len(d) < DESCRIPTION_MIN => short += 1,
            Some(d) if char_len(d) > DESCRIPTION_MAX => long += 1,
            Some(_) => continue,
        }
        offenders.push(page);
    }

    let status = if missing > 0 {
        CheckStatus::Fail
    } else if !offenders.is_empty() {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    let result = info.result(
        status,
        format!(
            "{} issues ({missing} missing, {short} too short, {long} too long)",
            offenders.len()
        ),
    );
    with_offenders(result, &offenders, pages.len(), "with a missing or badly sized description")
}

const H1: CheckInfo = CheckInfo {
    name: "H1 heading issues",
    category: CATEGORY,
    impact: 90,
    recommended: "One H1 per page with primary keyword",
    ranking_impact: "The H1 tells search engines and readers what the page is about",
    solution: "Give every page exactly one descriptive H1",
    enhancements: &[],
};

fn h1_tags(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.count(|p| p.h1_tags.is_empty());
    let multiple = pages.count(|p| p.h1_tags.len() > 1);
    let status = if missing > 0 {
        CheckStatus::Fail
    } else if multiple > 0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    let offenders = pages.flagged(|p| p.h1_tags.len() != 1);
    let result = info.result(
        status,
        format!(
            "{} issues ({missing} missing, {multiple} multiple H1s)",
            missing + multiple
        ),
    );
    with_offenders(result, &offenders, pages.len(), "without exactly one H1")
}

const HIERARCHY: CheckInfo = CheckInfo {
    name: "Weak heading hierarchy (skipping levels)",
    category: CATEGORY,
    impact: 65,
    recommended: "Proper H1-H6 hierarchy without skipping",
    ranking_impact: "A clean outline helps crawlers and screen readers understand structure",
    solution: "Nest headings in order; do not jump from H1 to H3",
    enhancements: &[],
};

/// True if a heading is more than one level deeper than the one before it
fn skips_heading_level(page: &PageRecord) -> bool {
    page.heading_levels
        .windows(2)
        .any(|pair| pair[1] > pair[0] + 1)
}

fn heading_hierarchy(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let skipped = pages.flagged(skips_heading_level);
    let status = if skipped.is_empty() {
        CheckStatus::Pass
    } else if (skipped.len() as f64) < pages.len() as f64 * 0.5 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    let result = info.result(
        status,
        format!("{} pages with heading hierarchy issues", skipped.len()),
    );
    with_offenders(result, &skipped, pages.len(), "skipping heading levels")
}

const ALT_TEXT: CheckInfo = CheckInfo {
    name: "Images missing alt attributes",
    category: CATEGORY,
    impact: 75,
    recommended: "All images should have descriptive alt text",
    ranking_impact: "Alt text is how image search and screen readers understand images",
    solution: "Describe every meaningful image in its alt attribute",
    enhancements: &[],
};

fn alt_text(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let total = pages.total_images();
    let missing = pages.images().filter(|i| !i.has_alt()).count();
    let coverage = if total == 0 {
        100.0
    } else {
        percent(total - missing, total)
    };
    let offenders = pages.flagged(|p| p.images.iter().any(|i| !i.has_alt()));
    let result = info.result(
        coverage_status(coverage, 90.0, 70.0),
        format!("{missing}/{total} images missing alt ({coverage:.0}% coverage)"),
    );
    with_offenders(result, &offenders, pages.len(), "with images lacking alt text")
}

const INTERNAL_LINKING: CheckInfo = CheckInfo {
    name: "Insufficient internal linking",
    category: CATEGORY,
    impact: 80,
    recommended: "5-10 contextual internal links per page",
    ranking_impact: "Internal links spread authority and help crawlers find pages",
    solution: "Link related pages to each other from within body content",
    enhancements: &[],
};

fn internal_linking(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let total: usize = pages.iter().map(|p| p.internal_links.len()).sum();
    let avg = if pages.is_empty() {
        0.0
    } else {
        total as f64 / pages.len() as f64
    };
    let few = pages.flagged(|p| p.internal_links.len() < 3);
    let status = if avg >= 5.0 && few.is_empty() {
        CheckStatus::Pass
    } else if avg >= 3.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    let result = info.result(status, format!("{avg:.1} avg internal links per page"));
    with_offenders(result, &few, pages.len(), "with fewer than 3 internal links")
}

const BROKEN_LINKS: CheckInfo = CheckInfo {
    name: "Broken internal links",
    category: CATEGORY,
    impact: 70,
    recommended: "Zero broken links",
    ranking_impact: "Broken links waste crawl budget and frustrate visitors",
    solution: "Update or remove links pointing at missing pages",
    enhancements: &[],
};

fn broken_links(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let by_url = pages.by_url();
    let links_to_error = |page: &PageRecord| {
        page.internal_links.iter().any(|link| {
            link_key(link)
                .and_then(|key| by_url.get(key.as_str()).copied())
                .is_some_and(|target| target.status_code >= 400)
        })
    };
    let offenders = pages.flagged(links_to_error);
    if offenders.is_empty() {
        return info.result(CheckStatus::Info, "Requires link validation");
    }
    let result = info.result(
        CheckStatus::Fail,
        format!("{} pages link to error pages", offenders.len()),
    );
    with_offenders(result, &offenders, pages.len(), "linking to pages that return errors")
}

const BREADCRUMBS: CheckInfo = CheckInfo {
    name: "Missing breadcrumb navigation",
    category: CATEGORY,
    impact: 60,
    recommended: "All deep pages should have breadcrumbs",
    ranking_impact: "Breadcrumbs show up in results and clarify site structure",
    solution: "Add breadcrumb navigation with BreadcrumbList markup",
    enhancements: &[],
};

fn has_breadcrumbs(page: &PageRecord) -> bool {
    page.has_breadcrumb_markup || page.html_contains("BreadcrumbList")
}

fn breadcrumbs(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(has_breadcrumbs);
    let status = if pct >= 50.0 {
        CheckStatus::Pass
    } else if pct >= 20.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{pct:.0}% pages have breadcrumbs"))
}

const DUPLICATE_TITLES: CheckInfo = CheckInfo {
    name: "Duplicate meta titles across pages",
    category: CATEGORY,
    impact: 85,
    recommended: "All titles should be unique",
    ranking_impact: "Duplicate titles make pages compete for the same queries",
    solution: "Give every page a distinct title describing its own content",
    enhancements: &[],
};

fn present_titles<'a>(pages: &PageSet<'a>) -> Vec<&'a str> {
    pages
        .pages()
        .iter()
        .filter_map(|p| p.title.as_deref())
        .filter(|t| !t.is_empty())
        .collect()
}

fn duplicate_titles(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let titles = present_titles(pages);
    let duplicates = duplicate_count(titles.iter().copied());
    let pct = percent(duplicates, titles.len());
    let status = if pct > 10.0 {
        CheckStatus::Fail
    } else if pct > 0.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    info.result(status, format!("{duplicates} duplicate titles ({pct:.0}%)"))
}

const DUPLICATE_DESCRIPTIONS: CheckInfo = CheckInfo {
    name: "Duplicate meta descriptions",
    category: CATEGORY,
    impact: 75,
    recommended: "All descriptions should be unique",
    ranking_impact: "Repeated descriptions are often replaced by auto-generated snippets",
    solution: "Write a distinct description for every page",
    enhancements: &[],
};

fn duplicate_descriptions(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let descriptions: Vec<&str> = pages
        .iter()
        .filter_map(|p| p.meta_description.as_deref())
        .filter(|d| !d.is_empty())
        .collect();
    let duplicates = duplicate_count(descriptions.iter().copied());
    let pct = percent(duplicates, descriptions.len());
    let status = if pct > 10.0 {
        CheckStatus::Warning
    } else if pct == 0.0 {
        CheckStatus::Pass
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{duplicates} duplicate descriptions ({pct:.0}%)"))
}

const DUPLICATE_H1: CheckInfo = CheckInfo {
    name: "Duplicate H1 tags across pages",
    category: CATEGORY,
    impact: 70,
    recommended: "Unique H1 on each page",
    ranking_impact: "Identical H1s blur which page should rank for a topic",
    solution: "Write a page-specific H1 for every page",
    enhancements: &[],
};

fn duplicate_h1(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let duplicates = duplicate_count(
        pages
            .iter()
            .filter_map(PageRecord::first_h1)
            .filter(|h| !h.is_empty()),
    );
    let status = if duplicates > 0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    info.result(status, format!("{duplicates} duplicate H1s"))
}

const KEYWORD_IN_TITLE: CheckInfo = CheckInfo {
    name: "Primary keyword missing from title",
    category: CATEGORY,
    impact: 90,
    recommended: "Primary keyword in first 30 characters of title",
    ranking_impact: "Keywords early in the title weigh more for relevance",
    solution: "Lead each title with the page's main keyword",
    enhancements: &[],
};

const TITLE_INTENT: CheckInfo = CheckInfo {
    name: "Title doesn't match search intent",
    category: CATEGORY,
    impact: 82,
    recommended: "Titles aligned with user search intent",
    ranking_impact: "Titles that match intent earn more clicks for the same position",
    solution: "Review top-ranking titles for the target query and match their framing",
    enhancements: &[],
};

const DESCRIPTION_CTA: CheckInfo = CheckInfo {
    name: "No call-to-action in description",
    category: CATEGORY,
    impact: 65,
    recommended: "CTA in 80%+ of descriptions",
    ranking_impact: "Action-oriented snippets lift click-through",
    solution: "Close descriptions with a short action such as 'Learn more' or 'Shop now'",
    enhancements: &[],
};

fn has_cta(page: &PageRecord) -> bool {
    page.meta_description.as_deref().is_some_and(|d| {
        d.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| CTA_WORDS.iter().any(|cta| word.starts_with(cta)))
    })
}

fn description_cta(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(has_cta);
    let status = if pct > 60.0 {
        CheckStatus::Pass
    } else if pct > 30.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    info.result(status, format!("{pct:.0}% descriptions have CTA"))
}

const KEYWORD_IN_H1: CheckInfo = CheckInfo {
    name: "H1 doesn't include primary keyword",
    category: CATEGORY,
    impact: 80,
    recommended: "Primary keyword in H1",
    ranking_impact: "The H1 reinforces the page topic",
    solution: "Work the main keyword naturally into the H1",
    enhancements: &[],
};

const MISSING_H2: CheckInfo = CheckInfo {
    name: "Missing H2 subheadings",
    category: CATEGORY,
    impact: 70,
    recommended: "H2 subheadings on all content pages",
    ranking_impact: "Subheadings structure content and can earn featured snippets",
    solution: "Break content into sections with descriptive H2s",
    enhancements: &[],
};

fn missing_h2(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.flagged(|p| p.h2_tags.is_empty());
    let pct = percent(missing.len(), pages.len());
    let status = if pct > 30.0 {
        CheckStatus::Warning
    } else if pct == 0.0 {
        CheckStatus::Pass
    } else {
        CheckStatus::Info
    };
    let result = info.result(status, format!("{pct:.0}% pages missing H2s"));
    with_offenders(result, &missing, pages.len(), "without H2 subheadings")
}

const HEADING_FORMATTING: CheckInfo = CheckInfo {
    name: "Inconsistent heading formatting",
    category: CATEGORY,
    impact: 55,
    recommended: "Consistent styling across all headings",
    ranking_impact: "Consistent headings make pages easier to scan",
    solution: "Style headings from one shared stylesheet",
    enhancements: &[],
};

const ALT_QUALITY: CheckInfo = CheckInfo {
    name: "Alt text too short or generic",
    category: CATEGORY,
    impact: 72,
    recommended: "Descriptive alt text (5-15 words) for all images",
    ranking_impact: "Generic alt text gives image search nothing to rank",
    solution: "Replace alt values like 'image' or file names with real descriptions",
    enhancements: &[],
};

fn alt_quality(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    info.result(
        CheckStatus::Info,
        format!("{} total images detected", pages.total_images()),
    )
    .con("Alt text quality needs manual review")
}

const ALT_STUFFING: CheckInfo = CheckInfo {
    name: "Alt text keyword stuffing",
    category: CATEGORY,
    impact: 68,
    recommended: "Natural, descriptive alt text",
    ranking_impact: "Stuffed alt text can be treated as spam",
    solution: "Describe the image plainly; one keyword at most",
    enhancements: &[],
};

const DECORATIVE_ALT: CheckInfo = CheckInfo {
    name: "Decorative images with descriptive alt",
    category: CATEGORY,
    impact: 50,
    recommended: "Empty alt for purely decorative images",
    ranking_impact: "Describing decorations adds noise for screen readers",
    solution: "Use alt=\"\" on spacers, dividers and background flourishes",
    enhancements: &[],
};

const ANCHOR_TEXT: CheckInfo = CheckInfo {
    name: "No contextual anchor text",
    category: CATEGORY,
    impact: 75,
    recommended: "Descriptive anchor text for all internal links",
    ranking_impact: "Anchor text tells search engines what the target page is about",
    solution: "Replace 'click here' links with descriptive phrases",
    enhancements: &[],
};

const ORPHAN_PAGES: CheckInfo = CheckInfo {
    name: "Orphan pages (no internal links)",
    category: CATEGORY,
    impact: 82,
    recommended: "All pages accessible via internal links",
    ranking_impact: "Pages with no internal links are rarely crawled or ranked",
    solution: "Link every page from at least one relevant page and the sitemap",
    enhancements: &[],
};

const DEEP_PAGES: CheckInfo = CheckInfo {
    name: "Deep pages (>3 clicks from home)",
    category: CATEGORY,
    impact: 73,
    recommended: "Important pages within 3 clicks of homepage",
    ranking_impact: "Deeply buried pages get less crawl attention and authority",
    solution: "Flatten navigation and add hub pages linking to deep content",
    enhancements: &[],
};

/// Click depth of each crawled page from the first one, following internal
/// links between crawled pages only
fn click_depths(pages: &[PageRecord]) -> HashMap<&str, usize> {
    let index: HashMap<&str, &PageRecord> = pages.iter().map(|p| (p.url.as_str(), p)).collect();
    let mut depths = HashMap::new();
    let Some(home) = pages.first() else {
        return depths;
    };

    let mut queue = VecDeque::from([(home, 0usize)]);
    depths.insert(home.url.as_str(), 0);
    while let Some((page, depth)) = queue.pop_front() {
        for link in &page.internal_links {
            let Some(key) = link_key(link) else {
                continue;
            };
            let Some((url, target)) = index.get_key_value(key.as_str()) else {
                continue;
            };
            if !depths.contains_key(url) {
                depths.insert(*url, depth + 1);
                queue.push_back((*target, depth + 1));
            }
        }
    }
    depths
}

fn deep_pages(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let depths = click_depths(pages.pages());
    let deep = pages.flagged(|p| {
        depths
            .get(p.url.as_str())
            .is_some_and(|d| *d > MAX_CLICK_DEPTH)
    });
    let max = depths.values().copied().max().unwrap_or(0);
    let status = if deep.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Warning
    };
    let result = info.result(
        status,
        format!("{} pages deeper than 3 clicks, max depth {max}", deep.len()),
    );
    with_offenders(result, &deep, pages.len(), "more than 3 clicks from the home page")
}

const TABLE_OF_CONTENTS: CheckInfo = CheckInfo {
    name: "Table of Contents (TOC) missing",
    category: CATEGORY,
    impact: 65,
    recommended: "TOC on long-form content (1500+ words)",
    ranking_impact: "A TOC can earn jump-to links in results",
    solution: "Add a linked table of contents to long articles",
    enhancements: &[],
};

fn has_toc(page: &PageRecord) -> bool {
    page.html_contains_any(&[
        "table-of-contents",
        "table of contents",
        "id=\"toc\"",
        "class=\"toc",
    ])
}

fn table_of_contents(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(has_toc);
    let status = if pct > 30.0 {
        CheckStatus::Pass
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{pct:.0}% pages have TOC"))
}

const AUTHOR: CheckInfo = CheckInfo {
    name: "Author information missing",
    category: CATEGORY,
    impact: 78,
    recommended: "Author byline on all content pages",
    ranking_impact: "Visible authorship supports E-E-A-T",
    solution: "Show an author byline linked to an author bio page",
    enhancements: &[],
};

fn author_info(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(|p| p.html_contains_any(&["author", "byline"]));
    let status = if pct > 50.0 {
        CheckStatus::Pass
    } else if pct > 20.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{pct:.0}% pages show author info"))
}

const PUBLISH_DATE: CheckInfo = CheckInfo {
    name: "Published/updated date missing",
    category: CATEGORY,
    impact: 75,
    recommended: "Dates on all time-sensitive content",
    ranking_impact: "Dates signal freshness to readers and search engines",
    solution: "Show published and updated dates and mark them up with datePublished",
    enhancements: &[],
};

fn has_date(page: &PageRecord) -> bool {
    page.html_contains_any(&[
        "datepublished",
        "datemodified",
        "published_time",
        "<time",
        "published",
        "updated on",
    ])
}

fn publish_date(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(has_date);
    let status = if pct > 60.0 {
        CheckStatus::Pass
    } else if pct > 30.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    info.result(status, format!("{pct:.0}% pages show dates"))
}

const RELATED_CONTENT: CheckInfo = CheckInfo {
    name: "Related articles/content section missing",
    category: CATEGORY,
    impact: 68,
    recommended: "Related content on 80%+ of pages",
    ranking_impact: "Related links keep visitors on site and spread internal authority",
    solution: "Add a related content block at the end of articles and products",
    enhancements: &[],
};

fn related_content(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(|p| p.html_contains_any(&["related", "similar", "recommended"]));
    let status = if pct > 50.0 {
        CheckStatus::Pass
    } else if pct > 20.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{pct:.0}% pages have related content"))
}

const JUMP_LINKS: CheckInfo = CheckInfo {
    name: "No jump links for long content",
    category: CATEGORY,
    impact: 60,
    recommended: "Jump links on long pages (2000+ words)",
    ranking_impact: "Jump links can appear as sitelinks under the result",
    solution: "Link to section anchors from the top of long pages",
    enhancements: &[],
};

fn jump_links(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(|p| p.html_contains("href=\"#"));
    let status = if pct > 30.0 {
        CheckStatus::Pass
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{pct:.0}% pages use jump links"))
}

const IMAGE_DIMENSIONS: CheckInfo = CheckInfo {
    name: "Images missing explicit dimensions",
    category: CATEGORY,
    impact: 62,
    recommended: "width and height attributes on 80%+ of images",
    ranking_impact: "Images without dimensions shift the layout as they load, hurting CLS",
    solution: "Set width and height on every <img> so the browser can reserve space",
    enhancements: &["Use CSS aspect-ratio for responsive images"],
};

fn image_dimensions(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let total = pages.total_images();
    if total == 0 {
        return info.result(CheckStatus::Pass, "No images found");
    }
    let sized = pages.images().filter(|i| i.has_dimensions()).count();
    let pct = percent(sized, total);
    let offenders = pages.flagged(|p| p.images.iter().any(|i| !i.has_dimensions()));
    let result = info.result(
        coverage_status(pct, 80.0, 50.0),
        format!("{sized}/{total} images with width and height ({pct:.0}%)"),
    );
    with_offenders(result, &offenders, pages.len(), "with unsized images")
}

const H1_EQUALS_TITLE: CheckInfo = CheckInfo {
    name: "H1 identical to title tag",
    category: CATEGORY,
    impact: 55,
    recommended: "H1 complements the title rather than repeating it",
    ranking_impact: "A distinct H1 lets the page target a wider set of related phrases",
    solution: "Vary the H1 wording so it supports the title with a related phrase",
    enhancements: &[],
};

fn h1_matches_title(page: &PageRecord) -> bool {
    match (page.title.as_deref(), page.first_h1()) {
        (Some(title), Some(h1)) => !title.trim().is_empty() && title.trim() == h1.trim(),
        _ => false,
    }
}

fn h1_equals_title(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let same = pages.flagged(h1_matches_title);
    let status = if same.is_empty() {
        CheckStatus::Pass
    } else if same.len() as f64 > pages.len() as f64 * 0.5 {
        CheckStatus::Warning
    } else {
        CheckStatus::Info
    };
    let result = info.result(
        status,
        format!("{}/{} pages repeat the title in the H1", same.len(), pages.len()),
    );
    with_offenders(result, &same, pages.len(), "whose H1 repeats the title")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::{page, run};
    use crate::page::ImageInfo;

    fn titled(url: &str, title: &str) -> PageRecord {
        PageRecord {
            title: Some(title.to_string()),
            ..page(url)
        }
    }

    #[test]
    fn test_title_of_exactly_thirty_chars_not_flagged() {
        let title = "a".repeat(30);
        let result = run(&TITLE, titles, &[titled("https://x.com/", &title)]);
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.current_value, "0 issues (0 missing, 0 too short, 0 too long)");
    }

    #[test]
    fn test_title_missing_fails_and_short_warns() {
        let short = run(&TITLE, titles, &[titled("https://x.com/", "Home")]);
        assert_eq!(short.status, CheckStatus::Warning);

        let missing = run(
            &TITLE,
            titles,
            &[titled("https://x.com/", "Home"), page("https://x.com/a")],
        );
        assert_eq!(missing.status, CheckStatus::Fail);
        assert_eq!(missing.current_value, "2 issues (1 missing, 1 too short, 0 too long)");
    }

    #[test]
    fn test_description_bounds() {
        let mut p = page("https://x.com/");
        p.meta_description = Some("d".repeat(160));
        assert_eq!(run(&DESCRIPTION, descriptions, &[p.clone()]).status, CheckStatus::Pass);
        p.meta_description = Some("d".repeat(161));
        assert_eq!(run(&DESCRIPTION, descriptions, &[p]).status, CheckStatus::Warning);
    }

    #[test]
    fn test_heading_skip_detection() {
        let mut p = page("https://x.com/");
        p.heading_levels = vec![1, 2, 3, 2, 3];
        assert!(!skips_heading_level(&p));
        p.heading_levels = vec![1, 3];
        assert!(skips_heading_level(&p));
        p.heading_levels = vec![2, 1, 2];
        assert!(!skips_heading_level(&p));
    }

    #[test]
    fn test_alt_text_blank_counts_as_missing() {
        let mut p = page("https://x.com/");
        p.images = vec![
            ImageInfo {
                src: "/a.png".to_string(),
                alt: Some(" ".to_string()),
                ..Default::default()
            },
            ImageInfo {
                src: "/b.png".to_string(),
                alt: Some("A bike".to_string()),
                ..Default::default()
            },
        ];
        let result = run(&ALT_TEXT, alt_text, &[p]);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.current_value, "1/2 images missing alt (50% coverage)");
    }

    #[test]
    fn test_alt_text_passes_without_images() {
        let result = run(&ALT_TEXT, alt_text, &[page("https://x.com/")]);
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[test]
    fn test_duplicate_titles_fail_above_ten_percent() {
        let pages = [
            titled("https://x.com/", "Same"),
            titled("https://x.com/a", "Same"),
            titled("https://x.com/b", "Other"),
        ];
        let result = run(&DUPLICATE_TITLES, duplicate_titles, &pages);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.current_value, "1 duplicate titles (33%)");
    }

    #[test]
    fn test_cta_matches_word_starts() {
        let mut p = page("https://x.com/");
        p.meta_description = Some("Discover our range. Shopping made easy.".to_string());
        assert!(has_cta(&p));
        p.meta_description = Some("Our target audience".to_string());
        assert!(!has_cta(&p));
    }

    #[test]
    fn test_click_depth_follows_crawled_links() {
        let urls = ["https://x.com/", "https://x.com/1", "https://x.com/2", "https://x.com/3", "https://x.com/4"];
        let pages: Vec<PageRecord> = urls
            .iter()
            .enumerate()
            .map(|(i, url)| {
                let mut p = page(url);
                if let Some(next) = urls.get(i + 1) {
                    p.internal_links.push(format!("{next}/"));
                }
                p
            })
            .collect();

        let depths = click_depths(&pages);
        assert_eq!(depths["https://x.com/4"], 4);

        let result = run(&DEEP_PAGES, deep_pages, &pages);
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.details.unwrap()["urls"][0], "https://x.com/4");
    }

    #[test]
    fn test_broken_links_found_among_crawled_pages() {
        let mut home = page("https://x.com/");
        home.internal_links.push("https://x.com/gone".to_string());
        let mut gone = page("https://x.com/gone");
        gone.status_code = 404;

        let result = run(&BROKEN_LINKS, broken_links, &[home, gone]);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.details.unwrap()["urls"][0], "https://x.com/");
    }

    #[test]
    fn test_image_dimensions_thresholds() {
        let sized = ImageInfo {
            src: "/a.png".to_string(),
            width: Some("10".to_string()),
            height: Some("10".to_string()),
            ..Default::default()
        };
        let unsized_img = ImageInfo {
            src: "/b.png".to_string(),
            ..Default::default()
        };
        let mut p = page("https://x.com/");
        p.images = vec![sized.clone(), unsized_img.clone()];
        assert_eq!(run(&IMAGE_DIMENSIONS, image_dimensions, &[p.clone()]).status, CheckStatus::Warning);

        p.images = vec![unsized_img];
        assert_eq!(run(&IMAGE_DIMENSIONS, image_dimensions, &[p.clone()]).status, CheckStatus::Fail);

        p.images = vec![sized];
        assert_eq!(run(&IMAGE_DIMENSIONS, image_dimensions, &[p]).status, CheckStatus::Pass);
    }

    #[test]
    fn test_h1_equals_title_statuses() {
        let mut same = titled("https://x.com/", "Welcome");
        same.h1_tags = vec!["Welcome".to_string()];
        let mut different = titled("https://x.com/a", "Welcome");
        different.h1_tags = vec!["Hello there".to_string()];

        assert_eq!(
            run(&H1_EQUALS_TITLE, h1_equals_title, &[same.clone()]).status,
            CheckStatus::Warning
        );
        assert_eq!(
            run(&H1_EQUALS_TITLE, h1_equals_title, &[same, different.clone()]).status,
            CheckStatus::Info
        );
        assert_eq!(
            run(&H1_EQUALS_TITLE, h1_equals_title, &[different]).status,
            CheckStatus::Pass
        );
    }
}
