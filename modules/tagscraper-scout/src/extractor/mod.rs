// Per-site listing extractors.
//
// Each site module knows two things: how to build the listing URL for a key,
// and how to turn that page's HTML into records. SiteExtractor does the
// fetching and dispatches to the right module by source.

pub mod quora;
pub mod reddit;
pub mod stackoverflow;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Selector};
use tracing::info;
use url::Url;

use tagscraper_common::{Config, RecordSet, Result, ScrapeError, Source};

use crate::traits::{Extractor, PageFetcher};

// ---------------------------------------------------------------------------
// SiteExtractor
// ---------------------------------------------------------------------------

pub struct SiteExtractor {
    source: Source,
    base: Url,
    fetcher: Arc<dyn PageFetcher>,
}

impl SiteExtractor {
    pub fn new(source: Source, base_url: &str, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ScrapeError::Config(format!("invalid {source} base url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ScrapeError::Config(format!(
                "{source} base url {base_url:?} cannot carry a path"
            )));
        }
        Ok(Self {
            source,
            base,
            fetcher,
        })
    }

    /// The single page fetched for `key`.
    pub fn listing_url(&self, key: &str) -> Url {
        match self.source {
            Source::StackOverflow => stackoverflow::listing_url(&self.base, key),
            Source::Quora => quora::listing_url(&self.base, key),
            Source::Reddit => reddit::listing_url(&self.base, key),
        }
    }

    pub fn parse(&self, html: &str) -> Result<RecordSet> {
        match self.source {
            Source::StackOverflow => stackoverflow::parse_listing(html, &self.base),
            Source::Quora => quora::parse_listing(html, &self.base),
            Source::Reddit => reddit::parse_listing(html, &self.base),
        }
    }
}

#[async_trait]
impl Extractor for SiteExtractor {
    fn source(&self) -> Source {
        self.source
    }

    async fn extract(&self, key: &str) -> Result<RecordSet> {
        let url = self.listing_url(key);
        let body = self.fetcher.get(&url).await?;
        let records = self.parse(&body)?;
        info!(source = %self.source, key, records = records.len(), "scrape finished");
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Extractors: source -> extractor registry
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct Extractors {
    by_source: HashMap<Source, Arc<dyn Extractor>>,
}

impl Extractors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor under the source it reports.
    pub fn with(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.by_source.insert(extractor.source(), extractor);
        self
    }

    /// HTTP extractors for every known source, sharing one fetcher.
    pub fn http(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let mut extractors = Self::new();
        for source in Source::ALL {
            let base_url = match source {
                Source::StackOverflow => &config.stackoverflow_base_url,
                Source::Quora => &config.quora_base_url,
                Source::Reddit => &config.reddit_base_url,
            };
            let extractor = SiteExtractor::new(source, base_url, fetcher.clone())?;
            extractors = extractors.with(Arc::new(extractor));
        }
        Ok(extractors)
    }

    pub fn get(&self, source: Source) -> Option<Arc<dyn Extractor>> {
        self.by_source.get(&source).cloned()
    }
}

// ---------------------------------------------------------------------------
// Shared parsing helpers
// ---------------------------------------------------------------------------

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Parse(format!("bad selector {css:?}: {e:?}")))
}

/// `base` with `segments` appended as percent-encoded path segments.
pub(crate) fn url_with_path(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// All text under an element, trimmed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolve a link target against the site base. Absolute targets pass through.
pub(crate) fn resolve(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_with_path_encodes_segments() {
        let base = Url::parse("http://www.stackoverflow.com").unwrap();
        let url = url_with_path(&base, &["questions", "tagged", "c#"]);
        assert_eq!(url.as_str(), "http://www.stackoverflow.com/questions/tagged/c%23");

        let url = url_with_path(&base, &["r", "a/b"]);
        assert_eq!(url.as_str(), "http://www.stackoverflow.com/r/a%2Fb");
    }

    #[test]
    fn url_with_path_keeps_base_prefix() {
        let base = Url::parse("http://127.0.0.1:8080/mirror/").unwrap();
        let url = url_with_path(&base, &["topic", "Rust"]);
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/mirror/topic/Rust");
    }

    #[test]
    fn resolve_joins_relative_and_keeps_absolute() {
        let base = Url::parse("http://www.quora.com").unwrap();
        assert_eq!(
            resolve(&base, "/What-is-Rust").as_deref(),
            Some("http://www.quora.com/What-is-Rust")
        );
        assert_eq!(
            resolve(&base, "https://other.example/x").as_deref(),
            Some("https://other.example/x")
        );
        assert_eq!(resolve(&base, "  "), None);
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        struct NoFetch;
        #[async_trait]
        impl PageFetcher for NoFetch {
            async fn get(&self, url: &Url) -> Result<String> {
                Err(ScrapeError::fetch(url.as_str(), "unreachable"))
            }
        }
        let result = SiteExtractor::new(Source::Reddit, "not a url", Arc::new(NoFetch));
        assert!(matches!(result, Err(ScrapeError::Config(_))));
    }
}
