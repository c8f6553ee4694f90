use crate::UrlError;
use url::Url;

/// Normalizes a URL into the identity used for crawl deduplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an http or https scheme (the scheme itself is preserved)
/// 3. Require a host; the host is lowercased and default ports dropped
///    by the parser
/// 4. Remove the fragment and the query string
/// 5. Remove trailing slashes, except for the bare root path
///
/// Applying the function to its own output returns the same URL.
///
/// # Examples
///
/// ```
/// use seo_audit::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/page/#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
///
/// let root = normalize_url("https://example.com").unwrap();
/// assert_eq!(root.as_str(), "https://example.com/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    url.set_query(None);

    let path = strip_trailing_slashes(url.path());
    url.set_path(&path);

    Ok(url)
}

/// Removes trailing slashes; an empty result becomes the root path
fn strip_trailing_slashes(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize_url(s).unwrap().to_string()
    }

    #[test]
    fn test_trailing_slash_removed() {
        assert_eq!(norm("https://x.com/a/"), norm("https://x.com/a"));
        assert_eq!(norm("https://x.com/a/"), "https://x.com/a");
    }

    #[test]
    fn test_root_keeps_slash() {
        assert_eq!(norm("https://x.com"), "https://x.com/");
        assert_eq!(norm("https://x.com/"), "https://x.com/");
    }

    #[test]
    fn test_fragment_removed() {
        assert_eq!(norm("https://x.com/a#frag"), norm("https://x.com/a"));
        assert_eq!(norm("https://x.com/a/#section"), "https://x.com/a");
    }

    #[test]
    fn test_query_removed() {
        assert_eq!(norm("https://x.com/search?q=shoes"), "https://x.com/search");
        assert_eq!(norm("https://x.com/?utm_source=mail"), "https://x.com/");
    }

    #[test]
    fn test_scheme_preserved() {
        assert_eq!(norm("http://x.com/a"), "http://x.com/a");
        assert_eq!(norm("https://x.com/a"), "https://x.com/a");
    }

    #[test]
    fn test_host_lowercased_and_default_port_dropped() {
        assert_eq!(norm("HTTPS://X.COM:443/Path"), "https://x.com/Path");
        assert_eq!(norm("http://x.com:8080/a/"), "http://x.com:8080/a");
    }

    #[test]
    fn test_dot_segments_resolved() {
        assert_eq!(norm("https://x.com/a/./b/../c"), "https://x.com/a/c");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://x.com",
            "https://x.com/a/",
            "https://x.com/a//",
            "https://x.com/a?b=c#d",
            "http://WWW.X.com/Some/Path/",
            "https://x.com/%7Euser/",
            "https://x.com:8443/a/b/#c",
        ];

        for input in inputs {
            let once = norm(input);
            let twice = norm(&once);
            assert_eq!(once, twice, "normalization not idempotent for {}", input);
        }
    }

    #[test]
    fn test_www_is_kept() {
        // Scope equivalence is handled by is_same_domain, not by rewriting
        assert_eq!(norm("https://www.x.com/a"), "https://www.x.com/a");
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        assert!(matches!(
            normalize_url("ftp://x.com/file"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            normalize_url("mailto:someone@x.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_rejects_relative_and_garbage() {
        assert!(matches!(normalize_url("/relative/path"), Err(UrlError::Parse(_))));
        assert!(matches!(normalize_url("not a url"), Err(UrlError::Parse(_))));
        assert!(normalize_url("").is_err());
    }
}
