//! Performance and Core Web Vitals rules
//!
//! Paint and first-byte timings are estimated from the measured fetch time
//! with fixed multipliers; nothing here runs a browser.

use super::registry::CheckRule;
use super::result::{Category, CheckResult, CheckStatus};
use super::support::{coverage_status, percent, share_status, with_offenders, CheckInfo, PageSet};
use crate::page::PageRecord;

const CATEGORY: Category = Category::Performance;

/// A page slower than this fails the load-time rule outright
const MAX_LOAD_SECS: f64 = 3.0;

/// Average load time above which the load-time rule warns
const TARGET_LOAD_SECS: f64 = 2.0;

const LCP_FACTOR: f64 = 1.2;
const TTFB_FACTOR: f64 = 0.2;

const MAX_DOM_NODES: usize = 1500;
const MAX_THIRD_PARTY_SCRIPTS: usize = 10;
const MAX_ASSET_REQUESTS: usize = 30;

pub(super) fn rules() -> Vec<CheckRule> {
    vec![
        CheckRule::pages(LOAD_TIME, load_time),
        CheckRule::pages(LCP, lcp),
        CheckRule::unmeasured(
            FID,
            "Requires real user monitoring",
            "Input delay can only be measured in a real browser",
        ),
        CheckRule::unmeasured(
            CLS,
            "Requires real user monitoring",
            "Layout shift can only be measured in a real browser",
        ),
        CheckRule::pages(TTFB, ttfb),
        CheckRule::pages(IMAGE_OPTIMIZATION, image_optimization),
        CheckRule::pages(MODERN_FORMATS, modern_formats),
        CheckRule::pages(LAZY_LOADING, lazy_loading),
        CheckRule::pages(CACHING, caching),
        CheckRule::pages(MINIFICATION, minification),
        CheckRule::unmeasured(
            HTTP2,
            "Requires server header analysis",
            "Protocol negotiation is not recorded by the crawl",
        ),
        CheckRule::pages(RENDER_BLOCKING, render_blocking),
        CheckRule::pages(DOM_SIZE, dom_size),
        CheckRule::unmeasured(
            INP,
            "INP measurement required (PageSpeed Insights)",
            "Interaction latency needs field data",
        ),
        CheckRule::unmeasured(
            DESKTOP_SCORE,
            "Desktop PageSpeed score needed",
            "Lab scores need a Lighthouse run",
        ),
        CheckRule::unmeasured(
            MOBILE_SCORE,
            "Mobile PageSpeed score needed",
            "Lab scores need a Lighthouse run",
        ),
        CheckRule::pages(THIRD_PARTY, third_party),
        CheckRule::pages(RESOURCE_HINTS, resource_hints),
        CheckRule::unmeasured(
            BROTLI,
            "Compression check required (server headers)",
            "Response encoding is negotiated transparently by the HTTP client",
        ),
        CheckRule::pages(ASSET_REQUESTS, asset_requests),
    ]
}

const LOAD_TIME: CheckInfo = CheckInfo {
    name: "Slow page load time (>3 seconds)",
    category: CATEGORY,
    impact: 95,
    recommended: "<2s average, <3s maximum",
    ranking_impact: "Bounce rates climb sharply past 3 seconds and page speed is a ranking factor",
    solution: "Reduce server response time, compress assets and defer non-critical scripts",
    enhancements: &["Cache rendered pages at the edge", "Trim unused CSS and JavaScript"],
};

fn load_time(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let avg = pages.avg_load_time();
    let slow = pages.flagged(|p| p.load_time > MAX_LOAD_SECS);
    let status = if !slow.is_empty() {
        CheckStatus::Fail
    } else if avg > TARGET_LOAD_SECS {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    let result = info
        .result(
            status,
            format!("{avg:.2}s average, {} slow pages", slow.len()),
        )
        .pro_if(avg <= TARGET_LOAD_SECS, "Average load time is within target");
    with_offenders(result, &slow, pages.len(), "taking longer than 3 seconds")
}

const LCP: CheckInfo = CheckInfo {
    name: "Poor Largest Contentful Paint (LCP >2.5s)",
    category: CATEGORY,
    impact: 95,
    recommended: "LCP < 2.5s (good), < 4.0s (needs improvement)",
    ranking_impact: "LCP is a Core Web Vital used directly in page experience ranking",
    solution: "Preload the hero image, serve it in a modern format and cut render-blocking CSS",
    enhancements: &["Use fetchpriority=high on the LCP image"],
};

fn lcp(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let estimated = pages.avg_load_time() * LCP_FACTOR;
    let status = if estimated <= 2.5 {
        CheckStatus::Pass
    } else if estimated <= 4.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    info.result(status, format!("~{estimated:.2}s (estimated)"))
}

const FID: CheckInfo = CheckInfo {
    name: "High First Input Delay (FID >100ms)",
    category: CATEGORY,
    impact: 85,
    recommended: "FID < 100ms (good), < 300ms (needs improvement)",
    ranking_impact: "Slow input response frustrates users and lowers engagement",
    solution: "Break up long JavaScript tasks and defer third-party scripts",
    enhancements: &[],
};

const CLS: CheckInfo = CheckInfo {
    name: "Poor Cumulative Layout Shift (CLS >0.1)",
    category: CATEGORY,
    impact: 90,
    recommended: "CLS < 0.1 (good), < 0.25 (needs improvement)",
    ranking_impact: "CLS is a Core Web Vital used in page experience ranking",
    solution: "Reserve space for images, ads and embeds with explicit dimensions",
    enhancements: &[],
};

const TTFB: CheckInfo = CheckInfo {
    name: "Slow Time to First Byte (TTFB >600ms)",
    category: CATEGORY,
    impact: 80,
    recommended: "TTFB < 600ms (good), < 1000ms (acceptable)",
    ranking_impact: "Slow server responses delay every other metric",
    solution: "Add server-side caching, optimize database queries and use a CDN",
    enhancements: &[],
};

fn ttfb(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let estimated = pages.avg_load_time() * TTFB_FACTOR;
    let status = if estimated <= 0.6 {
        CheckStatus::Pass
    } else if estimated <= 1.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    info.result(status, format!("~{:.0}ms (estimated)", estimated * 1000.0))
}

const IMAGE_OPTIMIZATION: CheckInfo = CheckInfo {
    name: "Images not optimized (>100KB each)",
    category: CATEGORY,
    impact: 90,
    recommended: "All images optimized, compressed, lazy-loaded",
    ranking_impact: "Images are usually the heaviest part of a page and dominate load time",
    solution: "Compress images, resize them to their display size and serve responsive srcsets",
    enhancements: &["Automate compression in the build pipeline"],
};

fn image_optimization(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let total = pages.total_images();
    if total == 0 {
        return info.result(CheckStatus::Pass, "No images found");
    }
    info.result(
        CheckStatus::Warning,
        format!("{total} images found (optimization unknown)"),
    )
    .con("Image byte sizes are not downloaded during the crawl")
}

const MODERN_FORMATS: CheckInfo = CheckInfo {
    name: "Images not using modern formats (WebP/AVIF)",
    category: CATEGORY,
    impact: 75,
    recommended: "80%+ images in WebP or AVIF format",
    ranking_impact: "WebP and AVIF are 25-50% smaller than JPEG and PNG",
    solution: "Convert images to WebP or AVIF and serve them through <picture> fallbacks",
    enhancements: &[],
};

fn modern_formats(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let total = pages.total_images();
    if total == 0 {
        return info.result(CheckStatus::Pass, "No images found");
    }
    let modern = pages.images().filter(|i| i.is_modern_format()).count();
    let pct = percent(modern, total);
    info.result(
        coverage_status(pct, 50.0, 20.0),
        format!("{pct:.0}% using modern formats"),
    )
}

const LAZY_LOADING: CheckInfo = CheckInfo {
    name: "Lazy loading not implemented",
    category: CATEGORY,
    impact: 70,
    recommended: "All below-the-fold images should lazy load",
    ranking_impact: "Lazy loading cuts initial page weight and speeds up first render",
    solution: "Add loading=\"lazy\" to images below the fold",
    enhancements: &["Never lazy-load the LCP image"],
};

fn lazy_loading(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let total = pages.total_images();
    if total == 0 {
        return info.result(CheckStatus::Pass, "No images found");
    }
    let lazy = pages.images().filter(|i| i.is_lazy()).count();
    let pct = percent(lazy, total);
    info.result(
        coverage_status(pct, 50.0, 20.0),
        format!("{pct:.0}% images with lazy loading"),
    )
}

const CACHING: CheckInfo = CheckInfo {
    name: "Browser caching not enabled",
    category: CATEGORY,
    impact: 85,
    recommended: "Cache headers properly configured",
    ranking_impact: "Cached assets make repeat visits and internal navigation much faster",
    solution: "Send long max-age Cache-Control headers for static assets with fingerprinted names",
    enhancements: &[],
};

fn caching(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let observed = pages
        .iter()
        .find_map(|p| p.header("cache-control"))
        .map_or_else(
            || "Unable to verify from crawl".to_string(),
            |value| format!("Document Cache-Control: {value}"),
        );
    info.result(CheckStatus::Warning, observed)
        .con("Static asset caching cannot be confirmed from HTML responses")
}

const MINIFICATION: CheckInfo = CheckInfo {
    name: "Unminified CSS/JavaScript",
    category: CATEGORY,
    impact: 70,
    recommended: "All CSS/JS should be minified",
    ranking_impact: "Minification trims 10-30% off text assets",
    solution: "Enable minification in the build tool or CDN",
    enhancements: &[],
};

/// Minified output has very few line breaks relative to its length
fn looks_minified(page: &PageRecord) -> bool {
    let lines = page.html.matches('\n').count();
    (lines as f64) < page.html.len() as f64 / 100.0
}

fn minification(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(looks_minified);
    info.result(
        coverage_status(pct, 50.0, 20.0),
        format!("~{pct:.0}% pages appear minified"),
    )
}

const HTTP2: CheckInfo = CheckInfo {
    name: "HTTP/2 not enabled",
    category: CATEGORY,
    impact: 65,
    recommended: "HTTP/2 or HTTP/3 enabled",
    ranking_impact: "Multiplexing reduces the cost of many small requests",
    solution: "Enable HTTP/2 on the web server or CDN",
    enhancements: &[],
};

const RENDER_BLOCKING: CheckInfo = CheckInfo {
    name: "Render-blocking resources",
    category: CATEGORY,
    impact: 85,
    recommended: "< 3 render-blocking resources",
    ranking_impact: "Blocking scripts and styles delay first paint and LCP",
    solution: "Inline critical CSS and add async or defer to head scripts",
    enhancements: &[],
};

fn render_blocking(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let avg = if pages.is_empty() {
        0.0
    } else {
        pages.iter().map(|p| p.render_blocking_count).sum::<usize>() as f64 / pages.len() as f64
    };
    let status = if avg < 3.0 {
        CheckStatus::Pass
    } else if avg < 6.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };
    let heavy = pages.flagged(|p| p.render_blocking_count >= 3);
    let result = info.result(status, format!("~{avg:.1} blocking resources per page"));
    with_offenders(result, &heavy, pages.len(), "with 3 or more blocking resources")
}

const DOM_SIZE: CheckInfo = CheckInfo {
    name: "Excessive DOM size (>1500 nodes)",
    category: CATEGORY,
    impact: 75,
    recommended: "Keep DOM size under 1500 nodes",
    ranking_impact: "Large DOMs slow style calculation and interaction",
    solution: "Simplify markup, paginate long lists and remove hidden duplicates",
    enhancements: &[],
};

fn dom_size(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let large = pages.flagged(|p| p.dom_node_count > MAX_DOM_NODES);
    let max = pages.iter().map(|p| p.dom_node_count).max().unwrap_or(0);
    let result = info.result(
        share_status(large.len(), pages.len(), 0.5),
        format!(
            "{}/{} pages with large DOM, max: {max} nodes",
            large.len(),
            pages.len()
        ),
    );
    with_offenders(result, &large, pages.len(), "with more than 1500 DOM nodes")
}

const INP: CheckInfo = CheckInfo {
    name: "High Interaction to Next Paint (INP >200ms)",
    category: CATEGORY,
    impact: 88,
    recommended: "INP < 200ms",
    ranking_impact: "INP replaced FID as the responsiveness Core Web Vital",
    solution: "Reduce main-thread work triggered by user interactions",
    enhancements: &[],
};

const DESKTOP_SCORE: CheckInfo = CheckInfo {
    name: "Poor desktop performance score (<90)",
    category: CATEGORY,
    impact: 80,
    recommended: "Score > 90",
    ranking_impact: "Lab scores summarize how fast the page feels",
    solution: "Run PageSpeed Insights and address the top opportunities",
    enhancements: &[],
};

const MOBILE_SCORE: CheckInfo = CheckInfo {
    name: "Poor mobile performance score (<70)",
    category: CATEGORY,
    impact: 92,
    recommended: "Score > 70 (ideally > 90)",
    ranking_impact: "Mobile performance weighs heavily under mobile-first indexing",
    solution: "Run PageSpeed Insights on mobile and address the top opportunities",
    enhancements: &[],
};

const THIRD_PARTY: CheckInfo = CheckInfo {
    name: "Third-party scripts slowing site",
    category: CATEGORY,
    impact: 80,
    recommended: "Minimize third-party scripts",
    ranking_impact: "Each third-party origin adds DNS, TLS and execution cost",
    solution: "Remove unused tags and load the rest async through a tag manager",
    enhancements: &[],
};

fn third_party_count(page: &PageRecord) -> usize {
    page.scripts
        .iter()
        .filter(|src| {
            (src.starts_with("http://") || src.starts_with("https://"))
                && !crate::url::is_same_domain(src, &page.url)
        })
        .count()
}

fn third_party(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let heavy = pages.flagged(|p| third_party_count(p) > MAX_THIRD_PARTY_SCRIPTS);
    let result = info.result(
        share_status(heavy.len(), pages.len(), 0.5),
        format!(
            "{}/{} pages with many third-party scripts",
            heavy.len(),
            pages.len()
        ),
    );
    with_offenders(result, &heavy, pages.len(), "loading more than 10 third-party scripts")
}

const RESOURCE_HINTS: CheckInfo = CheckInfo {
    name: "No resource preloading/hints",
    category: CATEGORY,
    impact: 70,
    recommended: "Use preload, preconnect, dns-prefetch strategically",
    ranking_impact: "Hints let the browser start critical fetches earlier",
    solution: "Preconnect to critical origins and preload the hero image and main font",
    enhancements: &[],
};

fn resource_hints(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let missing = pages.flagged(|p| p.resource_hint_count == 0);
    let result = info.result(
        share_status(missing.len(), pages.len(), 0.7),
        format!("{}/{} pages missing resource hints", missing.len(), pages.len()),
    );
    with_offenders(result, &missing, pages.len(), "without resource hints")
}

const BROTLI: CheckInfo = CheckInfo {
    name: "Resources not using modern compression (Brotli)",
    category: CATEGORY,
    impact: 72,
    recommended: "Brotli or Gzip compression enabled",
    ranking_impact: "Brotli shrinks text assets 15-20% more than gzip",
    solution: "Enable Brotli on the server or CDN",
    enhancements: &[],
};

const ASSET_REQUESTS: CheckInfo = CheckInfo {
    name: "Excessive script and stylesheet requests",
    category: CATEGORY,
    impact: 65,
    recommended: "Fewer than 30 script and stylesheet requests per page",
    ranking_impact: "Every extra request competes for bandwidth during the critical render",
    solution: "Bundle and tree-shake assets, and drop plugins that add their own files",
    enhancements: &[],
};

fn asset_requests(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let heavy = pages.flagged(|p| p.scripts.len() + p.stylesheets.len() > MAX_ASSET_REQUESTS);
    let result = info.result(
        share_status(heavy.len(), pages.len(), 0.5),
        format!(
            "{}/{} pages with more than {MAX_ASSET_REQUESTS} asset requests",
            heavy.len(),
            pages.len()
        ),
    );
    with_offenders(result, &heavy, pages.len(), "requesting too many scripts and stylesheets")
}
