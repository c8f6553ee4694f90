//! Advanced technical, security and accessibility rules

use url::Url;

use super::registry::CheckRule;
use super::result::{Category, CheckResult, CheckStatus};
use super::support::{CheckInfo, PageSet};
use crate::page::{PageRecord, ResourceProbe};

const CATEGORY: Category = Category::Advanced;

const SECURITY_HEADERS: &[&str] = &[
    "strict-transport-security",
    "content-security-policy",
    "x-frame-options",
    "x-content-type-options",
];

const ECOMMERCE_MARKERS: &[&str] = &["add to cart", "buy now", "checkout", "product", "price"];

pub(super) fn rules() -> Vec<CheckRule> {
    vec![
        CheckRule::pages(ROBOTS_TXT, robots_txt),
        CheckRule::pages(SITEMAP, sitemap),
        CheckRule::pages(PAGINATION, pagination),
        CheckRule::pages(AMP, amp),
        CheckRule::pages(PWA, pwa),
        CheckRule::pages(SECURITY, security_headers),
        CheckRule::pages(PRIVACY_POLICY, privacy_policy),
        CheckRule::pages(COOKIE_CONSENT, cookie_consent),
        CheckRule::unmeasured(
            WCAG,
            "Accessibility audit required",
            "WCAG conformance needs a dedicated accessibility audit",
        ),
        CheckRule::unmeasured(
            CONTRAST,
            "Visual audit required",
            "Contrast depends on computed styles",
        ),
        CheckRule::unmeasured(
            KEYBOARD,
            "Manual testing required",
            "Keyboard navigation needs interactive testing",
        ),
        CheckRule::pages(ECOMMERCE, ecommerce_tracking),
        CheckRule::pages(VITALS_TRACKING, vitals_tracking),
    ]
}

const ROBOTS_TXT: CheckInfo = CheckInfo {
    name: "Robots.txt missing or misconfigured",
    category: CATEGORY,
    impact: 80,
    recommended: "Properly configured robots.txt",
    ranking_impact: "A broken robots.txt can block the whole site from crawling",
    solution: "Serve /robots.txt that allows public pages and references the sitemap",
    enhancements: &[],
};

/// Root URL of the crawled site, derived from the first page
fn site_root(pages: &PageSet<'_>) -> Option<String> {
    let first = pages.iter().next()?;
    let mut root = Url::parse(&first.url).ok()?;
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    Some(root.to_string())
}

fn robots_txt(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let site = pages.site();
    match &site.robots_txt {
        ResourceProbe::NotChecked => info.result(CheckStatus::Info, "Not checked"),
        ResourceProbe::Missing(code) => info
            .result(CheckStatus::Fail, format!("Missing (HTTP {code})"))
            .con("Crawlers get no crawl directives or sitemap hint"),
        ResourceProbe::Found(_) => {
            let blocked = match (site.robots(), site_root(pages)) {
                (Some(robots), Some(root)) => !robots.is_allowed(&root, "*"),
                _ => false,
            };
            if blocked {
                info.result(CheckStatus::Fail, "Present, blocks the home page")
                    .con("robots.txt disallows the site root for all crawlers")
            } else {
                info.result(CheckStatus::Pass, "Present")
                    .pro("robots.txt is reachable and allows the site root")
            }
        }
    }
}

const SITEMAP: CheckInfo = CheckInfo {
    name: "Sitemap.xml missing or inaccessible",
    category: CATEGORY,
    impact: 85,
    recommended: "XML sitemap submitted to search engines",
    ranking_impact: "Sitemaps help engines discover and prioritize pages",
    solution: "Publish /sitemap.xml and submit it in Search Console",
    enhancements: &["Split sitemaps above 50,000 URLs"],
};

fn sitemap(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let site = pages.site();
    match &site.sitemap {
        ResourceProbe::NotChecked => info.result(CheckStatus::Info, "Not checked"),
        ResourceProbe::Missing(code) => info
            .result(CheckStatus::Fail, format!("Missing (HTTP {code})"))
            .con("No sitemap at /sitemap.xml"),
        ResourceProbe::Found(_) => {
            let urls = site.sitemap_url_count().unwrap_or(0);
            info.result(CheckStatus::Pass, format!("Present with {urls} URLs"))
                .pro("sitemap.xml is reachable")
        }
    }
}

const PAGINATION: CheckInfo = CheckInfo {
    name: "Pagination tags missing (rel=next/prev)",
    category: CATEGORY,
    impact: 65,
    recommended: "Proper pagination markup",
    ranking_impact: "Clear pagination helps crawlers reach deep list pages",
    solution: "Link paginated series with crawlable next/prev links",
    enhancements: &[],
};

fn pagination(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let found = pages.count(|p| p.html_contains_any(&["rel=\"next\"", "rel=\"prev\""]));
    let status = if found > 0 {
        CheckStatus::Pass
    } else {
        CheckStatus::Info
    };
    info.result(status, format!("{found} pages with pagination markup"))
}

const AMP: CheckInfo = CheckInfo {
    name: "AMP implementation issues",
    category: CATEGORY,
    impact: 55,
    recommended: "Valid AMP or responsive design",
    ranking_impact: "Invalid AMP pages drop out of AMP surfaces",
    solution: "Validate AMP pages or retire AMP in favour of fast responsive pages",
    enhancements: &[],
};

fn amp(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let found = pages.count(|p| p.html_contains_any(&["ampproject", "<html amp"]));
    info.result(CheckStatus::Info, format!("{found} AMP pages"))
}

const PWA: CheckInfo = CheckInfo {
    name: "Progressive Web App (PWA) optimization",
    category: CATEGORY,
    impact: 70,
    recommended: "PWA features for mobile experience",
    ranking_impact: "Installable, offline-capable sites improve mobile engagement",
    solution: "Add a web app manifest and register a service worker",
    enhancements: &[],
};

fn pwa(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let manifest = pages
        .iter()
        .any(|p| p.html_contains_any(&["manifest.json", ".webmanifest", "rel=\"manifest\""]));
    let worker = pages
        .iter()
        .any(|p| p.html_contains_any(&["serviceworker", "service-worker"]));
    if manifest && worker {
        info.result(CheckStatus::Pass, "Manifest and service worker found")
    } else {
        info.result(CheckStatus::Info, "Not detected")
            .con_if(!manifest, "No web app manifest")
            .con_if(!worker, "No service worker registration")
    }
}

const SECURITY: CheckInfo = CheckInfo {
    name: "Security headers missing",
    category: CATEGORY,
    impact: 75,
    recommended: "All security headers implemented",
    ranking_impact: "Security headers protect visitors and signal a well-run site",
    solution: "Send HSTS, CSP, X-Frame-Options and X-Content-Type-Options",
    enhancements: &[],
};

fn observed_security_headers(page: &PageRecord) -> Vec<&'static str> {
    SECURITY_HEADERS
        .iter()
        .copied()
        .filter(|name| page.header(name).is_some())
        .collect()
}

fn security_headers(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let mut seen: Vec<&'static str> = Vec::new();
    for page in pages.iter() {
        for name in observed_security_headers(page) {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
    }
    let current = if seen.is_empty() {
        "None observed".to_string()
    } else {
        seen.join(", ")
    };
    let mut result = info.result(CheckStatus::Info, current);
    for name in SECURITY_HEADERS {
        result = result.con_if(!seen.contains(name), format!("{name} not sent"));
    }
    result
}

const PRIVACY_POLICY: CheckInfo = CheckInfo {
    name: "Privacy policy missing or outdated",
    category: CATEGORY,
    impact: 82,
    recommended: "Current privacy policy, GDPR/CCPA compliant",
    ranking_impact: "A privacy policy is a basic trust signal",
    solution: "Publish a privacy policy and link it from the footer",
    enhancements: &[],
};

fn privacy_policy(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let found = pages.iter().any(|p| {
        p.url.to_lowercase().contains("privacy")
            || p.internal_links
                .iter()
                .any(|link| link.to_lowercase().contains("privacy"))
    });
    if found {
        info.result(CheckStatus::Pass, "Privacy policy found")
    } else {
        info.result(CheckStatus::Fail, "Not found")
            .con("No crawled page or internal link mentions a privacy policy")
    }
}

const COOKIE_CONSENT: CheckInfo = CheckInfo {
    name: "Cookie consent not implemented",
    category: CATEGORY,
    impact: 70,
    recommended: "GDPR-compliant cookie consent",
    ranking_impact: "Consent banners are required in many jurisdictions",
    solution: "Add a consent management platform that blocks tags until consent",
    enhancements: &[],
};

fn has_cookie_consent(page: &PageRecord) -> bool {
    page.html_contains_any(&["cookie"]) && page.html_contains_any(&["consent", "accept"])
}

fn cookie_consent(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    let pct = pages.pct(has_cookie_consent);
    let status = if pct < 50.0 {
        CheckStatus::Warning
    } else {
        CheckStatus::Pass
    };
    info.result(status, format!("{pct:.0}% pages with cookie consent"))
}

const WCAG: CheckInfo = CheckInfo {
    name: "WCAG accessibility violations",
    category: CATEGORY,
    impact: 78,
    recommended: "WCAG 2.1 AA compliance",
    ranking_impact: "Accessible pages serve more users and overlap with SEO best practice",
    solution: "Run an accessibility audit and fix AA violations",
    enhancements: &[],
};

const CONTRAST: CheckInfo = CheckInfo {
    name: "Color contrast issues",
    category: CATEGORY,
    impact: 65,
    recommended: "4.5:1 contrast ratio minimum",
    ranking_impact: "Low contrast hurts readability and engagement",
    solution: "Adjust text and background colours to meet contrast ratios",
    enhancements: &[],
};

const KEYBOARD: CheckInfo = CheckInfo {
    name: "Keyboard navigation problems",
    category: CATEGORY,
    impact: 70,
    recommended: "Full keyboard accessibility",
    ranking_impact: "Keyboard traps lock out users of assistive technology",
    solution: "Make every control focusable and visible on focus",
    enhancements: &[],
};

const ECOMMERCE: CheckInfo = CheckInfo {
    name: "E-commerce tracking not set up",
    category: CATEGORY,
    impact: 60,
    recommended: "Enhanced e-commerce tracking",
    ranking_impact: "Revenue attribution shows the value of organic traffic",
    solution: "Send GA4 e-commerce events for views, carts and purchases",
    enhancements: &[],
};

fn ecommerce_tracking(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    if pages.iter().any(|p| p.html_contains_any(ECOMMERCE_MARKERS)) {
        info.result(CheckStatus::Info, "E-commerce site detected")
            .con("Purchase tracking needs verification in the analytics account")
    } else {
        info.result(CheckStatus::Pass, "Not an e-commerce site")
    }
}

const VITALS_TRACKING: CheckInfo = CheckInfo {
    name: "Core Web Vitals tracking not configured",
    category: CATEGORY,
    impact: 85,
    recommended: "CWV tracking in GA4 and Search Console",
    ranking_impact: "Field data shows how real users experience the site",
    solution: "Report LCP, INP and CLS from the web-vitals library to analytics",
    enhancements: &[],
};

fn vitals_tracking(info: &CheckInfo, pages: &PageSet<'_>) -> CheckResult {
    if pages.iter().any(|p| p.html_contains("web-vitals")) {
        info.result(CheckStatus::Pass, "web-vitals library found")
    } else {
        info.result(CheckStatus::Info, "Setup verification needed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::{page, run, run_with};
    use crate::page::SiteContext;

    fn with_robots(body: &str) -> SiteContext {
        SiteContext {
            robots_txt: ResourceProbe::Found(body.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_robots_txt_states() {
        let pages = [page("https://x.com/")];

        let result = run(&ROBOTS_TXT, robots_txt, &pages);
        assert_eq!(result.status, CheckStatus::Info);

        let missing = SiteContext {
            robots_txt: ResourceProbe::Missing(404),
            ..Default::default()
        };
        let result = run_with(&ROBOTS_TXT, robots_txt, &pages, &missing);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.current_value, "Missing (HTTP 404)");

        let open = with_robots("User-agent: *\nDisallow: /admin\n");
        assert_eq!(
            run_with(&ROBOTS_TXT, robots_txt, &pages, &open).status,
            CheckStatus::Pass
        );

        let closed = with_robots("User-agent: *\nDisallow: /\n");
        assert_eq!(
            run_with(&ROBOTS_TXT, robots_txt, &pages, &closed).status,
            CheckStatus::Fail
        );
    }

    #[test]
    fn test_sitemap_counts_urls() {
        let site = SiteContext {
            sitemap: ResourceProbe::Found("<urlset><url><loc>https://x.com/</loc></url></urlset>".to_string()),
            ..Default::default()
        };
        let result = run_with(&SITEMAP, sitemap, &[page("https://x.com/")], &site);
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.current_value, "Present with 1 URLs");
    }

    #[test]
    fn test_privacy_policy_from_links() {
        let mut home = page("https://x.com/");
        assert_eq!(
            run(&PRIVACY_POLICY, privacy_policy, &[home.clone()]).status,
            CheckStatus::Fail
        );
        home.internal_links = vec!["https://x.com/Privacy-Policy".to_string()];
        assert_eq!(
            run(&PRIVACY_POLICY, privacy_policy, &[home]).status,
            CheckStatus::Pass
        );
    }

    #[test]
    fn test_security_headers_listed() {
        let mut p = page("https://x.com/");
        p.headers
            .insert("x-frame-options".to_string(), "DENY".to_string());
        let result = run(&SECURITY, security_headers, &[p]);
        assert_eq!(result.status, CheckStatus::Info);
        assert_eq!(result.current_value, "x-frame-options");
        assert_eq!(result.cons.len(), 3);
    }

    #[test]
    fn test_pwa_needs_manifest_and_worker() {
        let mut p = page("https://x.com/");
        p.html = r#"<link rel="manifest" href="/app.webmanifest">"#.to_string();
        assert_eq!(run(&PWA, pwa, &[p.clone()]).status, CheckStatus::Info);
        p.html.push_str("<script>navigator.serviceWorker.register('/sw.js')</script>");
        assert_eq!(run(&PWA, pwa, &[p]).status, CheckStatus::Pass);
    }
}
