//! HTML extraction into a [`PageRecord`]
//!
//! Parsing is lenient: malformed markup never fails, and anything that
//! cannot be found is left empty. The document tree is dropped before this
//! module returns, so every signal the checks need is extracted here.

use crate::page::{ImageInfo, PageRecord};
use crate::url::is_same_site;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Resource hint rel values
const HINT_RELS: &[&str] = &["preload", "prefetch", "preconnect", "dns-prefetch"];

/// Elements whose text is never rendered
const HIDDEN_TEXT_PARENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses an HTML document into a page record
///
/// # Arguments
///
/// * `page_url` - The normalized URL the page is recorded under
/// * `base_url` - The URL relative links resolve against (the final URL
///   after redirects)
/// * `html` - The raw response body
///
/// Status, headers and timing are left at their defaults for the caller.
///
/// # Example
///
/// ```
/// use seo_audit::crawler::parse_page;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/").unwrap();
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let page = parse_page(&url, &url, html.to_string());
/// assert_eq!(page.title.as_deref(), Some("Test"));
/// assert_eq!(page.internal_links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_page(page_url: &Url, base_url: &Url, html: String) -> PageRecord {
    let document = Html::parse_document(&html);

    let mut record = PageRecord {
        url: page_url.to_string(),
        has_https: page_url.scheme() == "https",
        ..Default::default()
    };

    record.title = select(&document, "title")
        .first()
        .map(|el| element_text(el))
        .filter(|t| !t.is_empty());

    extract_meta(&document, &mut record);
    extract_link_tags(&document, base_url, &mut record);
    extract_headings(&document, &mut record);
    extract_images(&document, &mut record);
    extract_anchors(&document, page_url, base_url, &mut record);
    extract_scripts(&document, base_url, &mut record);

    record.lang = select(&document, "html[lang]")
        .first()
        .and_then(|el| el.value().attr("lang"))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    record.paragraphs = select(&document, "p")
        .iter()
        .map(element_text)
        .filter(|p| !p.is_empty())
        .collect();

    record.dom_node_count = select(&document, "*").len();
    record.has_breadcrumb_markup =
        html.contains("BreadcrumbList") || has_breadcrumb_class(&document);

    record.text = visible_text(&document);
    record.word_count = record.text.split_whitespace().count();

    record.html = html;
    record
}

/// Selects all matching elements; an invalid selector matches nothing
fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Element text with whitespace runs collapsed
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(|v| v.trim().to_string())
}

/// Lowercased rel tokens of a `<link>` or `<a>`
fn rel_tokens(element: &ElementRef<'_>) -> Vec<String> {
    element
        .value()
        .attr("rel")
        .map(|rel| rel.split_whitespace().map(str::to_lowercase).collect())
        .unwrap_or_default()
}

fn extract_meta(document: &Html, record: &mut PageRecord) {
    let mut og_tags = BTreeMap::new();
    let mut twitter_tags = BTreeMap::new();

    for meta in select(document, "meta") {
        let content = attr(&meta, "content");

        if let Some(charset) = attr(&meta, "charset") {
            if record.meta_charset.is_none() && !charset.is_empty() {
                record.meta_charset = Some(charset);
            }
        }

        if let Some(equiv) = attr(&meta, "http-equiv") {
            if equiv.eq_ignore_ascii_case("content-type") && record.meta_charset.is_none() {
                record.meta_charset = content.as_deref().and_then(charset_from_content_type);
            }
        }

        if let Some(property) = attr(&meta, "property") {
            if property.to_lowercase().starts_with("og:") {
                og_tags.insert(property, content.clone().unwrap_or_default());
            }
        }

        let Some(name) = attr(&meta, "name") else {
            continue;
        };
        let lower = name.to_lowercase();
        match lower.as_str() {
            "description" if record.meta_description.is_none() => {
                record.meta_description = content.filter(|c| !c.is_empty());
            }
            "robots" if record.meta_robots.is_none() => {
                record.meta_robots = content;
            }
            "viewport" if record.viewport.is_none() => {
                record.has_viewport = true;
                record.viewport = Some(content.unwrap_or_default());
            }
            _ if lower.starts_with("twitter:") => {
                twitter_tags.insert(name, content.unwrap_or_default());
            }
            _ => {}
        }
    }

    record.og_tags = og_tags;
    record.twitter_tags = twitter_tags;
}

/// `text/html; charset=utf-8` -> `utf-8`
fn charset_from_content_type(content: &str) -> Option<String> {
    let lower = content.to_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let charset = lower[start..]
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches('"')
        .to_string();
    (!charset.is_empty()).then_some(charset)
}

fn extract_link_tags(document: &Html, base_url: &Url, record: &mut PageRecord) {
    for link in select(document, "link[rel]") {
        let rels = rel_tokens(&link);
        let href = attr(&link, "href");

        if rels.iter().any(|r| r == "canonical") {
            record.canonical_count += 1;
            if record.canonical.is_none() {
                record.canonical = href
                    .as_deref()
                    .filter(|h| !h.trim().is_empty())
                    .map(|h| resolve_resource(h.trim(), base_url));
            }
        }

        if rels.iter().any(|r| r == "stylesheet") {
            if let Some(href) = &href {
                record.stylesheets.push(resolve_resource(href, base_url));
            }
        }

        if rels.iter().any(|r| HINT_RELS.contains(&r.as_str())) {
            record.resource_hint_count += 1;
        }

        if rels.iter().any(|r| r == "alternate") && link.value().attr("hreflang").is_some() {
            record.hreflang_count += 1;
        }
    }

    let head_styles = select(document, "head link[rel]")
        .iter()
        .filter(|l| rel_tokens(l).iter().any(|r| r == "stylesheet"))
        .count();
    let head_scripts = select(document, "head script[src]")
        .iter()
        .filter(|s| s.value().attr("async").is_none() && s.value().attr("defer").is_none())
        .count();
    record.render_blocking_count = head_styles + head_scripts;
}

fn extract_headings(document: &Html, record: &mut PageRecord) {
    for heading in select(document, "h1, h2, h3, h4, h5, h6") {
        let level = heading.value().name()[1..].parse::<u8>().unwrap_or(0);
        record.heading_levels.push(level);

        let text = element_text(&heading);
        match level {
            1 => record.h1_tags.push(text),
            2 => record.h2_tags.push(text),
            3 => record.h3_tags.push(text),
            _ => record.h4_h6_count += 1,
        }
    }
}

fn extract_images(document: &Html, record: &mut PageRecord) {
    record.images = select(document, "img")
        .iter()
        .map(|img| ImageInfo {
            src: attr(img, "src").unwrap_or_default(),
            alt: img.value().attr("alt").map(str::to_string),
            title: attr(img, "title"),
            width: attr(img, "width"),
            height: attr(img, "height"),
            loading: attr(img, "loading"),
        })
        .collect();
}

fn extract_anchors(document: &Html, page_url: &Url, base_url: &Url, record: &mut PageRecord) {
    for anchor in select(document, "a[href]") {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(absolute) = resolve_link(href, base_url) else {
            continue;
        };

        if is_same_site(&absolute, page_url) {
            record.internal_links.push(absolute.to_string());
        } else {
            record.external_links.push(absolute.to_string());
        }
        record.links.push(absolute.to_string());
    }
}

fn extract_scripts(document: &Html, base_url: &Url, record: &mut PageRecord) {
    for script in select(document, "script") {
        if let Some(src) = attr(&script, "src") {
            record.scripts.push(resolve_resource(&src, base_url));
        }

        let is_json_ld = script
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if is_json_ld {
            let body = script.text().collect::<String>().trim().to_string();
            if !body.is_empty() {
                record.schema_markup.push(body);
            }
        }
    }
}

fn has_breadcrumb_class(document: &Html) -> bool {
    select(document, "[class]").iter().any(|el| {
        el.value()
            .attr("class")
            .is_some_and(|c| c.to_lowercase().contains("breadcrumb"))
    }) || select(document, "[aria-label]").iter().any(|el| {
        el.value()
            .attr("aria-label")
            .is_some_and(|l| l.to_lowercase().contains("breadcrumb"))
    })
}

/// Concatenated text nodes outside script, style, noscript and template
fn visible_text(document: &Html) -> String {
    let mut out = String::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TEXT_PARENTS.contains(&el.name()))
        });

        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves an anchor href to an absolute http(s) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links (same page anchors)
/// - invalid URLs
/// - non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    matches!(absolute.scheme(), "http" | "https").then_some(absolute)
}

/// Resolves a script or stylesheet reference; unresolvable values are kept raw
fn resolve_resource(src: &str, base_url: &Url) -> String {
    base_url
        .join(src)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| src.to_string())
}
