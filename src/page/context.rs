//! Site-wide facts gathered outside the page crawl

use crate::robots::ParsedRobots;

/// Outcome of probing a well-known site file such as robots.txt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResourceProbe {
    /// The file was not requested (or the request failed at network level)
    #[default]
    NotChecked,
    /// The server answered with a non-success status
    Missing(u16),
    /// The file exists; holds its body
    Found(String),
}

impl ResourceProbe {
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Found(body) => Some(body),
            _ => None,
        }
    }

    pub fn is_checked(&self) -> bool {
        !matches!(self, Self::NotChecked)
    }
}

/// Cross-page context handed to the checks next to the page list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteContext {
    pub robots_txt: ResourceProbe,
    pub sitemap: ResourceProbe,
}

impl SiteContext {
    /// robots.txt parsed for allow checks, when it was found
    pub fn robots(&self) -> Option<ParsedRobots> {
        self.robots_txt.body().map(ParsedRobots::from_content)
    }

    /// Number of `<loc>` entries in the sitemap body
    pub fn sitemap_url_count(&self) -> Option<usize> {
        self.sitemap
            .body()
            .map(|body| body.matches("<loc>").count())
    }
}
