use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seo_audit::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the host with any leading `www.` removed
///
/// `example.com` and `www.example.com` map to the same site host.
pub fn site_host(url: &Url) -> Option<String> {
    extract_domain(url).map(|host| match host.strip_prefix("www.") {
        Some(bare) => bare.to_string(),
        None => host,
    })
}

/// Returns true if two parsed URLs belong to the same site
///
/// Hosts are compared after removing `www.`; an explicit non-default port
/// must also match. The scheme is ignored, so http and https variants of a
/// site are in scope together.
pub fn is_same_site(a: &Url, b: &Url) -> bool {
    match (site_host(a), site_host(b)) {
        (Some(ha), Some(hb)) => ha == hb && a.port() == b.port(),
        _ => false,
    }
}

/// Returns true if `url` is within the crawl scope of `seed`
///
/// Unparseable input on either side is out of scope.
///
/// # Examples
///
/// ```
/// use seo_audit::url::is_same_domain;
///
/// assert!(is_same_domain("https://www.x.com/a", "https://x.com"));
/// assert!(!is_same_domain("https://evil.com", "https://x.com"));
/// ```
pub fn is_same_domain(url: &str, seed: &str) -> bool {
    match (Url::parse(url), Url::parse(seed)) {
        (Ok(u), Ok(s)) => is_same_site(&u, &s),
        _ => false,
    }
}
