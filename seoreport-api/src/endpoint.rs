use std::fmt;

/// Optimizer API methods used by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Projects,
    Visibility,
    CrawlIssues,
    CrawlOverview,
    Rankings,
}

impl Endpoint {
    /// Method name as it appears in the request path
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Projects => "optimizer.projects",
            Endpoint::Visibility => "optimizer.visibility",
            Endpoint::CrawlIssues => "optimizer.onpage.crawl",
            Endpoint::CrawlOverview => "optimizer.onpage.overview",
            Endpoint::Rankings => "optimizer.ranking",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
