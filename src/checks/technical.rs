//! Technical SEO rules

use serde_json::json;

use super::registry::CheckRule;
use super::result::{Category, CheckResult, CheckStatus};
use super::support::{
    coverage_status, link_key, percent, share_status, soft_status, with_offenders, CheckInfo,
    PageSet,
};
use crate::page::{PageRecord, ResourceProbe};
use crate::robots::ParsedRobots;

const CATEGORY: Category = Category::Technical;

/// Longest URL considered readable
const MAX_URL_LENGTH: usize = 115;

/// HTML documents above this many bytes are flagged
const MAX_HTML_BYTES: usize = 100_000;

/// Response headers that identify a CDN edge
const CDN_HEADERS: &[&str] = &[
    "cf-ray",
    "x-amz-cf-id",
    "x-akamai-transformed",
    "x-fastly-request-id",
    "x-served-by",
    "x-cdn",
    "x-azure-ref",
];

pub(super) fn rules() -> Vec<CheckRule> {
    vec![
        CheckRule::pages(META_ROBOTS, meta_robots),
        CheckRule::pages(OG_TAGS, og_tags),
        CheckRule::pages(TWITTER_CARDS, twitter_cards),
        CheckRule::pages(META_CHARSET, meta_charset),
        CheckRule::pages(META_LANGUAGE, meta_language),
        CheckRule::pages(VIEWPORT, viewport),
        CheckRule::pages(USER_SCALABLE, user_scalable),
        CheckRule::pages(MOBILE_FRIENDLY, mobile_friendly),
        CheckRule::pages(SITEMAP_IN_ROBOTS, sitemap_in_robots),
        CheckRule::pages(HTTPS, https),
        CheckRule::pages(CANONICAL, canonical),
        CheckRule::pages(STRUCTURED_DATA, structured_data),
        CheckRule::unmeasured(
            REDIRECT_CHAINS,
            "Requires deeper analysis",
            "Redirect hops are not recorded by the crawl",
        ),
        CheckRule::pages(URL_STRUCTURE, url_structure),
        CheckRule::pages(HREFLANG, hreflang),
        CheckRule::pages(MIXED_CONTENT, mixed_content),
        CheckRule::unmeasured(
            SSL_CERTIFICATE,
            "SSL verification required",
            "Certificate expiry and chain need a dedicated TLS scan",
        ),
        CheckRule::pages(MULTIPLE_CANONICALS, multiple_canonicals),
        CheckRule::pages(CANONICAL_NON_INDEXABLE, canonical_non_indexable),
        CheckRule::pages(INVALID_SCHEMA, invalid_schema),
        CheckRule::pages(URL_LENGTH, url_length),
        CheckRule::pages(URL_CASE, url_case),
        CheckRule::pages(ERROR_PAGES, error_pages),
        CheckRule::unmeasured(
            REDIRECT_LOOPS,
            "Redirect chain analysis required",
            "Looping redirects surface as fetch errors and are not retained",
        ),
        CheckRule::unmeasured(
            EXCESSIVE_REDIRECTS,
            "Redirect count audit needed",
            "Redirect counts are not recorded by the crawl",
        ),
        CheckRule::pages(MICRODATA, microdata),
        CheckRule::pages(HTML_SIZE, html_size),
        CheckRule::pages(CDN, cdn),
    ]
}

const META_ROBOTS: CheckInfo = CheckInfo {
    name: "Meta Robots Tag Presence",
    category: CATEGORY,
    impact: 75,
    recommended: "All pages should have meta robots directive for proper crawl control",
    ranking_impact: "Missing meta robots can reduce crawl efficiency by 5-10% and may cause unintended indexing",
    solution: "Add <meta name=\"robots\" content=\"index, follow\"> to the <head> of every page, ideally from the shared template",
    enhancements: &[
        "Use 'noindex, follow' for thin pages such as tag archives",
        "Send X-Robots-Tag headers for PDFs and images",
        "Consider max-snippet and max-image-preview directives",
    ],
};

fn meta_robots(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.flagged(|p| p.meta_robots.as_deref().map_or(true, str::is_empty));
    let present = pages.len() - missing.len();
    let status = if missing.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };

    let result = info
        .result(
            status,
            format!("{present} pages have meta robots, {} pages missing", missing.len()),
        )
        .pro_if(
            present > 0,
            format!("{present} pages already have meta robots configured"),
        );
    with_offenders(result, &missing, pages.len(), "without meta robots tags")
}

const OG_TAGS: CheckInfo = CheckInfo {
    name: "Open Graph (OG) tags missing",
    category: CATEGORY,
    impact: 70,
    recommended: "All pages should have OG tags for social sharing",
    ranking_impact: "OG tags control how shared links render, which drives click-through from social platforms",
    solution: "Add og:title, og:description, og:image and og:url meta tags to every page",
    enhancements: &[
        "Use 1200x630 images for og:image",
        "Validate previews with the platform debuggers",
    ],
};

fn og_tags(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.flagged(|p| p.og_tags.is_empty());
    let status = share_status(missing.len(), pages.len(), 0.5);
    let result = info.result(
        status,
        format!("{}/{} pages missing OG tags", missing.len(), pages.len()),
    );
    with_offenders(result, &missing, pages.len(), "without Open Graph tags")
}

const TWITTER_CARDS: CheckInfo = CheckInfo {
    name: "Twitter Card meta tags missing",
    category: CATEGORY,
    impact: 60,
    recommended: "All pages should have Twitter Card tags",
    ranking_impact: "Card markup improves how links display on X/Twitter and their engagement",
    solution: "Add twitter:card, twitter:title, twitter:description and twitter:image meta tags",
    enhancements: &["Use summary_large_image for articles", "Set twitter:site to the brand handle"],
};

fn twitter_cards(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.flagged(|p| p.twitter_tags.is_empty());
    let status = if missing.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Warning
    };
    let result = info.result(
        status,
        format!("{}/{} pages missing Twitter Cards", missing.len(), pages.len()),
    );
    with_offenders(result, &missing, pages.len(), "without Twitter Card tags")
}

const META_CHARSET: CheckInfo = CheckInfo {
    name: "Meta charset not specified",
    category: CATEGORY,
    impact: 65,
    recommended: "All pages should declare UTF-8 charset",
    ranking_impact: "Without a declared charset, text can be misread by crawlers and browsers",
    solution: "Add <meta charset=\"utf-8\"> as the first element inside <head>",
    enhancements: &["Also send charset in the Content-Type header"],
};

fn meta_charset(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.flagged(|p| p.meta_charset.is_none());
    let status = if missing.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    let result = info.result(
        status,
        format!("{}/{} pages missing charset", missing.len(), pages.len()),
    );
    with_offenders(result, &missing, pages.len(), "without a charset declaration")
}

const META_LANGUAGE: CheckInfo = CheckInfo {
    name: "Meta language tag missing",
    category: CATEGORY,
    impact: 70,
    recommended: "All pages should declare language with <html lang='en'>",
    ranking_impact: "The lang attribute helps search engines serve pages to the right audience",
    solution: "Set the lang attribute on the <html> element of every page",
    enhancements: &["Use region subtags such as en-GB where relevant"],
};

fn meta_language(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.flagged(|p| p.lang.as_deref().map_or(true, |l| l.trim().is_empty()));
    let status = if missing.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Warning
    };
    let result = info.result(
        status,
        format!(
            "{}/{} pages missing language declaration",
            missing.len(),
            pages.len()
        ),
    );
    with_offenders(result, &missing, pages.len(), "without a lang attribute")
}

const VIEWPORT: CheckInfo = CheckInfo {
    name: "Viewport meta tag missing",
    category: CATEGORY,
    impact: 90,
    recommended: "All pages should have viewport meta tag",
    ranking_impact: "Mobile-first indexing penalizes pages that do not render correctly on phones",
    solution: "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
    enhancements: &["Test key templates on real devices"],
};

fn viewport(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.flagged(|p| !p.has_viewport);
    let status = if missing.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    let result = info.result(
        status,
        format!("{}/{} missing viewport", missing.len(), pages.len()),
    );
    with_offenders(result, &missing, pages.len(), "without a viewport meta tag")
}

const USER_SCALABLE: CheckInfo = CheckInfo {
    name: "user-scalable set to 'no' in viewport",
    category: CATEGORY,
    impact: 60,
    recommended: "Allow users to zoom (user-scalable=yes)",
    ranking_impact: "Blocking zoom is an accessibility failure that hurts mobile usability signals",
    solution: "Remove user-scalable=no and maximum-scale=1 from the viewport tag",
    enhancements: &["Design layouts that survive 200% zoom"],
};

fn blocks_zoom(page: &PageRecord) -> bool {
    page.viewport.as_deref().is_some_and(|content| {
        let compact: String = content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        compact.contains("user-scalable=no") || compact.contains("user-scalable=0")
    })
}

fn user_scalable(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let issues = pages.flagged(blocks_zoom);
    let status = if issues.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Warning
    };
    let result = info.result(status, format!("{} pages with user-scalable=no", issues.len()));
    with_offenders(result, &issues, pages.len(), "that disable zooming")
}

const MOBILE_FRIENDLY: CheckInfo = CheckInfo {
    name: "Mobile-friendly design issues",
    category: CATEGORY,
    impact: 95,
    recommended: "100% mobile-friendly pages",
    ranking_impact: "Google indexes the mobile version first; pages unusable on phones rank lower",
    solution: "Use a responsive layout and declare the viewport on every template",
    enhancements: &["Keep tap targets at least 48px", "Avoid horizontal scrolling"],
};

fn mobile_friendly(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let ready = pages.pct(|p| p.has_viewport);
    let status = coverage_status(ready, 80.0, 50.0);
    let not_ready = pages.flagged(|p| !p.has_viewport);
    let result = info.result(status, format!("{ready:.0}% mobile-ready pages"));
    with_offenders(result, &not_ready, pages.len(), "not mobile-ready")
}

const SITEMAP_IN_ROBOTS: CheckInfo = CheckInfo {
    name: "Sitemap not referenced in robots.txt",
    category: CATEGORY,
    impact: 75,
    recommended: "Sitemap URL in robots.txt",
    ranking_impact: "A Sitemap line lets every crawler discover the sitemap without manual submission",
    solution: "Add 'Sitemap: https://your-domain/sitemap.xml' to robots.txt",
    enhancements: &["List every sitemap or the sitemap index"],
};

fn sitemap_in_robots(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    match &pages.site().robots_txt {
        ResourceProbe::NotChecked => {
            info.result(CheckStatus::Warning, "Unable to verify from crawl data")
        }
        ResourceProbe::Missing(status) => info
            .result(CheckStatus::Fail, format!("robots.txt unavailable (HTTP {status})"))
            .con("No robots.txt to reference a sitemap from"),
        ResourceProbe::Found(body) => {
            let sitemaps = ParsedRobots::from_content(body).sitemaps();
            if sitemaps.is_empty() {
                info.result(CheckStatus::Fail, "robots.txt has no Sitemap directive")
                    .con("Crawlers must discover the sitemap some other way")
            } else {
                info.result(
                    CheckStatus::Pass,
                    format!("{} sitemap(s) referenced", sitemaps.len()),
                )
                .pro(format!("Sitemap: {}", sitemaps.join(", ")))
            }
        }
    }
}

const HTTPS: CheckInfo = CheckInfo {
    name: "Website not using HTTPS",
    category: CATEGORY,
    impact: 95,
    recommended: "HTTPS on all pages",
    ranking_impact: "HTTPS is a confirmed ranking signal and browsers flag HTTP pages as not secure",
    solution: "Install a TLS certificate and 301-redirect every HTTP URL to HTTPS",
    enhancements: &["Enable HSTS once HTTPS is stable"],
};

fn https(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let http_pages = pages.flagged(|p| !p.has_https);
    if http_pages.is_empty() {
        return info
            .result(CheckStatus::Pass, "HTTPS")
            .pro("All crawled pages are served over HTTPS");
    }
    let result = info.result(
        CheckStatus::Fail,
        format!("HTTP ({}/{} pages)", http_pages.len(), pages.len()),
    );
    with_offenders(result, &http_pages, pages.len(), "served over plain HTTP")
}

const CANONICAL: CheckInfo = CheckInfo {
    name: "Canonical tag missing",
    category: CATEGORY,
    impact: 80,
    recommended: "All pages should have self-referencing canonical",
    ranking_impact: "Canonicals consolidate duplicate URLs so ranking signals are not split",
    solution: "Add <link rel=\"canonical\" href=\"...\"> pointing at the preferred URL of each page",
    enhancements: &["Use absolute URLs in canonicals"],
};

fn canonical(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.flagged(|p| p.canonical.is_none());
    let status = if missing.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Warning
    };
    let result = info.result(
        status,
        format!("{}/{} pages missing canonical", missing.len(), pages.len()),
    );
    with_offenders(result, &missing, pages.len(), "without a canonical tag")
}

const STRUCTURED_DATA: CheckInfo = CheckInfo {
    name: "Schema markup missing (JSON-LD)",
    category: CATEGORY,
    impact: 85,
    recommended: "All key pages should have structured data",
    ranking_impact: "Structured data enables rich results, which can raise click-through by 20-30%",
    solution: "Add JSON-LD blocks describing the page (Organization, Article, Product, FAQ...)",
    enhancements: &["Validate with the Rich Results Test"],
};

fn has_schema(page: &PageRecord) -> bool {
    !page.schema_markup.is_empty() || page.html_contains("schema.org")
}

fn structured_data(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(has_schema);
    let status = coverage_status(pct, 50.0, 20.0);
    let missing = pages.flagged(|p| !has_schema(p));
    let result = info.result(status, format!("{pct:.0}% pages with schema"));
    with_offenders(result, &missing, pages.len(), "without structured data")
}

const REDIRECT_CHAINS: CheckInfo = CheckInfo {
    name: "Multiple redirect chains",
    category: CATEGORY,
    impact: 70,
    recommended: "Single hop redirects only",
    ranking_impact: "Each extra hop wastes crawl budget and leaks link equity",
    solution: "Point links and redirects straight at the final URL",
    enhancements: &["Audit redirects after every migration"],
};

const URL_STRUCTURE: CheckInfo = CheckInfo {
    name: "URL structure not SEO-friendly",
    category: CATEGORY,
    impact: 75,
    recommended: "Short, descriptive, lowercase URLs with hyphens",
    ranking_impact: "Readable URLs improve click-through and keyword relevance",
    solution: "Use lowercase, hyphen-separated slugs under 115 characters",
    enhancements: &["Redirect old URLs when renaming slugs"],
};

fn has_case_or_underscore(page: &PageRecord) -> bool {
    let rest = page.url.split_once("://").map_or(page.url.as_str(), |(_, r)| r);
    rest.contains('_') || rest.chars().any(char::is_uppercase)
}

fn url_structure(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let long = pages.count(|p| p.url.len() > MAX_URL_LENGTH);
    let bad_chars = pages.count(has_case_or_underscore);
    let issues = long + bad_chars;
    let status = if issues == 0 {
        CheckStatus::Pass
    } else if (issues as f64) < pages.len() as f64 * 0.3 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    let offenders = pages.flagged(|p| p.url.len() > MAX_URL_LENGTH || has_case_or_underscore(p));
    let result = info.result(status, format!("{issues} URLs with issues"));
    with_offenders(result, &offenders, pages.len(), "with long or mixed-case URLs")
}

const HREFLANG: CheckInfo = CheckInfo {
    name: "Hreflang tags missing (international sites)",
    category: CATEGORY,
    impact: 80,
    recommended: "Required for multi-language sites",
    ranking_impact: "Proper international targeting can improve regional rankings by 20-40%",
    solution: "Add <link rel=\"alternate\" hreflang=\"..\"> for every language or region variant",
    enhancements: &[
        "Include an x-default alternate",
        "Configure regional targeting in Search Console",
    ],
};

fn hreflang(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let with_tags = pages.count(|p| p.hreflang_count > 0);
    if with_tags > 0 {
        info.result(CheckStatus::Pass, format!("{with_tags} pages with hreflang"))
            .pro("International targeting configured")
    } else {
        info.result(CheckStatus::Info, "0 pages with hreflang")
            .con("No international targeting detected")
    }
}

const MIXED_CONTENT: CheckInfo = CheckInfo {
    name: "Mixed content warnings",
    category: CATEGORY,
    impact: 85,
    recommended: "No mixed content (all resources HTTPS)",
    ranking_impact: "Browsers block or warn about insecure resources on HTTPS pages",
    solution: "Load every script, stylesheet and image over HTTPS",
    enhancements: &["Add a Content-Security-Policy upgrade-insecure-requests directive"],
};

fn has_mixed_content(page: &PageRecord) -> bool {
    page.has_https
        && (page.scripts.iter().any(|s| s.starts_with("http://"))
            || page.stylesheets.iter().any(|s| s.starts_with("http://"))
            || page.images.iter().any(|i| i.src.starts_with("http://")))
}

fn mixed_content(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let mixed = pages.flagged(has_mixed_content);
    let status = if mixed.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    let result = info.result(status, format!("{} pages with mixed content", mixed.len()));
    with_offenders(result, &mixed, pages.len(), "loading insecure resources")
}

const SSL_CERTIFICATE: CheckInfo = CheckInfo {
    name: "SSL certificate issues",
    category: CATEGORY,
    impact: 95,
    recommended: "Valid SSL certificate with proper configuration",
    ranking_impact: "Certificate errors block visitors and crawlers entirely",
    solution: "Automate certificate renewal and serve the full chain",
    enhancements: &["Monitor expiry dates"],
};

const MULTIPLE_CANONICALS: CheckInfo = CheckInfo {
    name: "Multiple canonical tags",
    category: CATEGORY,
    impact: 88,
    recommended: "One canonical tag per page",
    ranking_impact: "Conflicting canonicals are ignored, so duplicate URLs compete with each other",
    solution: "Keep exactly one canonical link per page; check plugins and templates for extras",
    enhancements: &[],
};

fn multiple_canonicals(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let multiple = pages.flagged(|p| p.canonical_count > 1);
    let status = if multiple.is_empty() {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    let result = info.result(
        status,
        format!("{} pages with multiple canonicals", multiple.len()),
    );
    with_offenders(result, &multiple, pages.len(), "with more than one canonical tag")
}

const CANONICAL_NON_INDEXABLE: CheckInfo = CheckInfo {
    name: "Canonical pointing to non-indexable URL",
    category: CATEGORY,
    impact: 90,
    recommended: "Canonicals point to indexable, 200 status pages",
    ranking_impact: "A canonical to an error or noindex page drops the page from the index",
    solution: "Point canonicals at live, indexable URLs",
    enhancements: &[],
};

fn is_indexable(page: &PageRecord) -> bool {
    page.status_code < 300
        && !page
            .meta_robots
            .as_deref()
            .is_some_and(|r| r.to_lowercase().contains("noindex"))
}

fn canonical_non_indexable(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let by_url = pages.by_url();
    let target = |p: &PageRecord| {
        p.canonical
            .as_deref()
            .and_then(link_key)
            .and_then(|key| by_url.get(key.as_str()).copied())
    };

    let checked = pages.count(|p| target(p).is_some());
    let offenders = pages.flagged(|p| target(p).is_some_and(|t| !is_indexable(t)));

    if !offenders.is_empty() {
        let result = info.result(
            CheckStatus::Fail,
            format!("{} canonicals point to non-indexable pages", offenders.len()),
        );
        return with_offenders(
            result,
            &offenders,
            pages.len(),
            "canonicalized to a non-indexable URL",
        );
    }
    if checked == 0 {
        return info.result(CheckStatus::Info, "Canonical target validation needed");
    }
    info.result(
        CheckStatus::Pass,
        format!("{checked} canonical targets verified indexable"),
    )
}

const INVALID_SCHEMA: CheckInfo = CheckInfo {
    name: "Invalid schema markup",
    category: CATEGORY,
    impact: 75,
    recommended: "Valid, error-free schema markup",
    ranking_impact: "Invalid structured data is ignored and forfeits rich results",
    solution: "Fix JSON syntax errors in application/ld+json blocks",
    enhancements: &["Validate with the Schema Markup Validator"],
};

fn has_invalid_json_ld(page: &PageRecord) -> bool {
    page.schema_markup
        .iter()
        .any(|block| serde_json::from_str::<serde_json::Value>(block).is_err())
}

fn invalid_schema(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let blocks: usize = pages.iter().map(|p| p.schema_markup.len()).sum();
    if blocks == 0 {
        return info.result(CheckStatus::Info, "No JSON-LD blocks to validate");
    }
    let invalid = pages.flagged(has_invalid_json_ld);
    if invalid.is_empty() {
        return info
            .result(CheckStatus::Pass, format!("{blocks} JSON-LD blocks parse cleanly"))
            .pro("All structured data blocks are well-formed JSON");
    }
    let result = info.result(
        CheckStatus::Fail,
        format!("{} pages with malformed JSON-LD", invalid.len()),
    );
    with_offenders(result, &invalid, pages.len(), "with malformed JSON-LD")
}

const URL_LENGTH: CheckInfo = CheckInfo {
    name: "URLs exceeding recommended length (>115 characters)",
    category: CATEGORY,
    impact: 65,
    recommended: "URLs under 115 characters",
    ranking_impact: "Long URLs are truncated in results and dilute keyword relevance",
    solution: "Shorten slugs and flatten deep folder structures",
    enhancements: &[],
};

fn url_length(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let long = pages.flagged(|p| p.url.len() > MAX_URL_LENGTH);
    let pct = percent(long.len(), pages.len());
    let result = info.result(
        soft_status(pct, 20.0),
        format!("{} URLs over 115 chars ({pct:.0}%)", long.len()),
    );
    with_offenders(result, &long, pages.len(), "with URLs over 115 characters")
}

const URL_CASE: CheckInfo = CheckInfo {
    name: "Mixed case or underscores in URLs",
    category: CATEGORY,
    impact: 60,
    recommended: "Lowercase with hyphens only",
    ranking_impact: "Case variants create duplicate URLs and underscores do not separate words",
    solution: "Use lowercase slugs with hyphens and redirect the old variants",
    enhancements: &[],
};

fn url_case(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let issues = pages.flagged(has_case_or_underscore);
    let pct = percent(issues.len(), pages.len());
    let result = info.result(
        soft_status(pct, 10.0),
        format!("{} URLs with case/underscore issues", issues.len()),
    );
    with_offenders(result, &issues, pages.len(), "with uppercase or underscores in the URL")
}

const ERROR_PAGES: CheckInfo = CheckInfo {
    name: "404 errors on important pages",
    category: CATEGORY,
    impact: 87,
    recommended: "No 404 errors on important pages",
    ranking_impact: "Error pages lose their rankings and waste the link equity pointing at them",
    solution: "Restore the pages or 301-redirect them to the closest live equivalent",
    enhancements: &["Fix internal links that point at removed pages"],
};

fn error_pages(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let errors = pages.flagged(|p| p.status_code >= 400);
    let pct = percent(errors.len(), pages.len());
    let status = if errors.is_empty() {
        CheckStatus::Pass
    } else if pct < 20.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    let result = info.result(
        status,
        format!("{}/{} pages returned an error status", errors.len(), pages.len()),
    );
    with_offenders(result, &errors, pages.len(), "returning 4xx/5xx")
}

const REDIRECT_LOOPS: CheckInfo = CheckInfo {
    name: "Redirect loops detected",
    category: CATEGORY,
    impact: 92,
    recommended: "No redirect loops",
    ranking_impact: "Looping URLs can never be indexed",
    solution: "Break the loop so every redirect ends on a 200 page",
    enhancements: &[],
};

const EXCESSIVE_REDIRECTS: CheckInfo = CheckInfo {
    name: "Too many 301/302 redirects",
    category: CATEGORY,
    impact: 78,
    recommended: "Minimize redirects, max 1 hop to final URL",
    ranking_impact: "Redirects slow page loads and dilute link equity",
    solution: "Update internal links to the final destination URLs",
    enhancements: &[],
};

const MICRODATA: CheckInfo = CheckInfo {
    name: "Microdata markup issues",
    category: CATEGORY,
    impact: 58,
    recommended: "Prefer JSON-LD over microdata",
    ranking_impact: "Microdata is harder to maintain and easier to break than JSON-LD",
    solution: "Migrate itemscope/itemprop markup to JSON-LD",
    enhancements: &[],
};

fn microdata(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let using = pages.count(|p| p.html_contains("itemscope") || p.html_contains("itemprop"));
    let status = if using > 0 {
        CheckStatus::Info
    } else {
        CheckStatus::Pass
    };
    info.result(status, format!("{using} pages using microdata"))
}

const HTML_SIZE: CheckInfo = CheckInfo {
    name: "HTML file size too large (>100KB)",
    category: CATEGORY,
    impact: 70,
    recommended: "HTML under 100KB",
    ranking_impact: "Heavy documents slow the first render, especially on mobile",
    solution: "Move inline scripts, styles and data out of the HTML and paginate long lists",
    enhancements: &[],
};

fn html_size(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let large = pages.flagged(|p| p.html_size() > MAX_HTML_BYTES);
    let pct = percent(large.len(), pages.len());
    let result = info.result(
        soft_status(pct, 20.0),
        format!("{} pages over 100KB ({pct:.0}%)", large.len()),
    );
    with_offenders(result, &large, pages.len(), "over 100KB of HTML")
}

const CDN: CheckInfo = CheckInfo {
    name: "No CDN implementation",
    category: CATEGORY,
    impact: 80,
    recommended: "CDN for global content delivery",
    ranking_impact: "A CDN lowers latency for distant visitors and improves Core Web Vitals",
    solution: "Serve the site through a CDN such as Cloudflare, Fastly or CloudFront",
    enhancements: &[],
};

fn cdn_marker(page: &PageRecord) -> Option<&'static str> {
    if let Some(header) = CDN_HEADERS.iter().copied().find(|h| page.header(h).is_some()) {
        return Some(header);
    }
    let server = page.header("server")?.to_lowercase();
    ["cloudflare", "akamai", "cloudfront", "fastly"]
        .into_iter()
        .find(|name| server.contains(name))
}

fn cdn(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    match pages.iter().find_map(cdn_marker) {
        Some(marker) => info
            .result(CheckStatus::Pass, format!("CDN detected ({marker})"))
            .details(json!({ "marker": marker })),
        None => info.result(CheckStatus::Info, "CDN detection required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::{page, run, run_with};
    use crate::page::SiteContext;

    #[test]
    fn test_meta_robots_lists_missing_pages() {
        let mut ok = page("https://x.com/");
        ok.meta_robots = Some("index, follow".to_string());
        let missing = page("https://x.com/a");

        let result = run(&META_ROBOTS, meta_robots, &[ok, missing]);

        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.current_value, "1 pages have meta robots, 1 pages missing");
        assert!(result.cons[1].contains("https://x.com/a"));
        assert_eq!(result.details.unwrap()["urls"][0], "https://x.com/a");
    }

    #[test]
    fn test_og_tags_thresholds() {
        let mut tagged = page("https://x.com/");
        tagged.og_tags.insert("og:title".to_string(), "X".to_string());
        let bare = page("https://x.com/a");

        let half = run(&OG_TAGS, og_tags, &[tagged.clone(), bare.clone()]);
        assert_eq!(half.status, CheckStatus::Warning);

        let most = run(&OG_TAGS, og_tags, &[tagged, bare.clone(), bare]);
        assert_eq!(most.status, CheckStatus::Fail);
    }

    #[test]
    fn test_user_scalable_detects_spacing_variants() {
        let mut p = page("https://x.com/");
        p.viewport = Some("width=device-width, user-scalable = NO".to_string());
        assert!(blocks_zoom(&p));
        p.viewport = Some("width=device-width".to_string());
        assert!(!blocks_zoom(&p));
    }

    #[test]
    fn test_mobile_friendly_percentages() {
        let mut ready = page("https://x.com/");
        ready.has_viewport = true;
        let not_ready = page("https://x.com/a");

        let result = run(&MOBILE_FRIENDLY, mobile_friendly, &[ready, not_ready]);
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.current_value, "50% mobile-ready pages");
    }

    #[test]
    fn test_sitemap_in_robots_uses_site_context() {
        let pages = [page("https://x.com/")];

        let unchecked = run(&SITEMAP_IN_ROBOTS, sitemap_in_robots, &pages);
        assert_eq!(unchecked.status, CheckStatus::Warning);

        let site = SiteContext {
            robots_txt: ResourceProbe::Found(
                "User-agent: *\nDisallow:\nSitemap: https://x.com/sitemap.xml\n".to_string(),
            ),
            ..Default::default()
        };
        let found = run_with(&SITEMAP_IN_ROBOTS, sitemap_in_robots, &pages, &site);
        assert_eq!(found.status, CheckStatus::Pass);

        let site = SiteContext {
            robots_txt: ResourceProbe::Found("User-agent: *\nDisallow: /admin\n".to_string()),
            ..Default::default()
        };
        let without = run_with(&SITEMAP_IN_ROBOTS, sitemap_in_robots, &pages, &site);
        assert_eq!(without.status, CheckStatus::Fail);

        let site = SiteContext {
            robots_txt: ResourceProbe::Missing(404),
            ..Default::default()
        };
        let missing = run_with(&SITEMAP_IN_ROBOTS, sitemap_in_robots, &pages, &site);
        assert_eq!(missing.status, CheckStatus::Fail);
    }

    #[test]
    fn test_https_fails_on_any_http_page() {
        let result = run(
            &HTTPS,
            https,
            &[page("https://x.com/"), page("http://x.com/a")],
        );
        assert_eq!(result.status, CheckStatus::Fail);

        let result = run(&HTTPS, https, &[page("https://x.com/")]);
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[test]
    fn test_url_case_flags_path_not_scheme() {
        let result = run(
            &URL_CASE,
            url_case,
            &[page("https://x.com/About_Us"), page("https://x.com/ok")],
        );
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.current_value, "1 URLs with case/underscore issues");

        let result = run(&URL_CASE, url_case, &[page("https://x.com/fine-page")]);
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[test]
    fn test_error_pages_thresholds() {
        let mut gone = page("https://x.com/gone");
        gone.status_code = 404;
        let mut pages: Vec<PageRecord> = (0..9).map(|i| page(&format!("https://x.com/{i}"))).collect();
        pages.push(gone.clone());

        assert_eq!(run(&ERROR_PAGES, error_pages, &pages).status, CheckStatus::Warning);
        assert_eq!(
            run(&ERROR_PAGES, error_pages, &[page("https://x.com/"), gone]).status,
            CheckStatus::Fail
        );
        assert_eq!(
            run(&ERROR_PAGES, error_pages, &[page("https://x.com/")]).status,
            CheckStatus::Pass
        );
    }

    #[test]
    fn test_mixed_content_only_on_https_pages() {
        let mut secure = page("https://x.com/");
        secure.scripts.push("http://cdn.x.com/app.js".to_string());
        let mut plain = page("http://x.com/");
        plain.scripts.push("http://cdn.x.com/app.js".to_string());

        assert!(has_mixed_content(&secure));
        assert!(!has_mixed_content(&plain));
    }

    #[test]
    fn test_canonical_to_error_page_fails() {
        let mut home = page("https://x.com/");
        home.canonical = Some("https://x.com/old/".to_string());
        let mut old = page("https://x.com/old");
        old.status_code = 404;

        let result = run(&CANONICAL_NON_INDEXABLE, canonical_non_indexable, &[home, old]);
        assert_eq!(result.status, CheckStatus::Fail);

        let mut self_ref = page("https://x.com/");
        self_ref.canonical = Some("https://x.com/".to_string());
        let result = run(&CANONICAL_NON_INDEXABLE, canonical_non_indexable, &[self_ref]);
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[test]
    fn test_relative_canonical_checked_after_parsing() {
        let url = url::Url::parse("https://x.com/blog").unwrap();
        let html = r#"<head><link rel="canonical" href="/old"></head>"#.to_string();
        let mut blog = crate::crawler::parse_page(&url, &url, html);
        blog.status_code = 200;
        let mut old = page("https://x.com/old");
        old.status_code = 410;

        let result = run(&CANONICAL_NON_INDEXABLE, canonical_non_indexable, &[blog, old]);
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[test]
    fn test_invalid_schema_detects_bad_json() {
        let mut good = page("https://x.com/");
        good.schema_markup.push(r#"{"@type": "Organization"}"#.to_string());
        let mut bad = page("https://x.com/a");
        bad.schema_markup.push(r#"{"@type": "Organization",}"#.to_string());

        assert_eq!(
            run(&INVALID_SCHEMA, invalid_schema, &[good.clone()]).status,
            CheckStatus::Pass
        );
        assert_eq!(
            run(&INVALID_SCHEMA, invalid_schema, &[good, bad]).status,
            CheckStatus::Fail
        );
        assert_eq!(
            run(&INVALID_SCHEMA, invalid_schema, &[page("https://x.com/")]).status,
            CheckStatus::Info
        );
    }

    #[test]
    fn test_cdn_detected_from_headers() {
        let mut p = page("https://x.com/");
        p.headers.insert("server".to_string(), "cloudflare".to_string());
        let result = run(&CDN, cdn, &[p]);
        assert_eq!(result.status, CheckStatus::Pass);

        let result = run(&CDN, cdn, &[page("https://x.com/")]);
        assert_eq!(result.status, CheckStatus::Info);
    }

    #[test]
    fn test_hreflang_is_info_when_absent() {
        let result = run(&HREFLANG, hreflang, &[page("https://x.com/")]);
        assert_eq!(result.status, CheckStatus::Info);
        assert_eq!(result.impact_score, 80);
    }
}
