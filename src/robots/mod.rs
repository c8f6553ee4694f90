//! Robots.txt handling module
//!
//! Used by the crawler (when configured to respect robots.txt) and by the
//! checks that judge the site's robots.txt and sitemap declarations.

mod parser;

pub use parser::ParsedRobots;

use url::Url;

/// Location of robots.txt for the site serving `url`
pub fn robots_url(url: &Url) -> Option<Url> {
    url.join("/robots.txt").ok()
}

/// Checks if a URL is allowed by robots.txt
pub fn is_allowed(robots: &ParsedRobots, url: &str, user_agent: &str) -> bool {
    robots.is_allowed(url, user_agent)
}
