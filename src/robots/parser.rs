//! Robots.txt parser implementation
//!
//! Allow/disallow matching is delegated to the robotstxt crate; the
//! `Crawl-delay` and `Sitemap` extensions are read directly from the text.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
}

impl ParsedRobots {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// A permissive robots.txt, used when the file could not be fetched
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Raw content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Checks if a URL (or path) may be fetched by `user_agent`
    ///
    /// `user_agent` is the product token (e.g. `SeoAuditBot`), not the full
    /// User-Agent header.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Crawl delay in seconds for `user_agent`
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let agent = user_agent.to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut in_group_body = false;
        let mut wildcard_delay = None;
        let mut agent_delay = None;

        for (key, value) in directives(&self.content) {
            match key.as_str() {
                "user-agent" => {
                    // Consecutive User-agent lines share one group
                    if in_group_body {
                        group.clear();
                        in_group_body = false;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_group_body = true;
                    let Ok(delay) = value.parse::<f64>() else {
                        continue;
                    };
                    let named = group
                        .iter()
                        .any(|ua| ua != "*" && !ua.is_empty() && agent.contains(ua.as_str()));
                    if named {
                        agent_delay = Some(delay);
                    } else if group.iter().any(|ua| ua == "*") {
                        wildcard_delay = Some(delay);
                    }
                }
                _ => in_group_body = true,
            }
        }

        agent_delay.or(wildcard_delay)
    }

    /// URLs declared by `Sitemap:` directives, in file order
    pub fn sitemaps(&self) -> Vec<String> {
        directives(&self.content)
            .filter(|(key, value)| key == "sitemap" && !value.is_empty())
            .map(|(_, value)| value.to_string())
            .collect()
    }
}

/// Iterates `key: value` lines with lowercase keys, skipping comments
fn directives(content: &str) -> impl Iterator<Item = (String, &str)> {
    content.lines().filter_map(|line| {
        let line = line.split('#').next().unwrap_or("").trim();
        let (key, value) = line.split_once(':')?;
        Some((key.trim().to_lowercase(), value.trim()))
    })
}
