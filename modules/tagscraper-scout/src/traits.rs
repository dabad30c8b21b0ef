// Trait abstractions for the pipeline's outside world.
//
// PageFetcher is the HTTP capability: GET a URL, get the body back.
// Extractor turns one key into records for one source site.
//
// Both are injected as Arc<dyn ..>, so channel and orchestrator tests run
// against MockExtractor and MockBlobStore with no network and no disk.

use async_trait::async_trait;
use url::Url;

use tagscraper_common::{RecordSet, Result, Source};

// ---------------------------------------------------------------------------
// PageFetcher
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the body. Transport errors, non-success statuses
    /// and empty bodies are all `ScrapeError::Fetch`.
    async fn get(&self, url: &Url) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Extractor: Send + Sync {
    /// The site this extractor reads.
    fn source(&self) -> Source;

    /// Fetch the listing page for `key` and pull out its records.
    async fn extract(&self, key: &str) -> Result<RecordSet>;
}
