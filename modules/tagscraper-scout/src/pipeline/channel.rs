// One source's keys: read previous -> scrape -> merge -> write, per key.
//
// Keys run concurrently and independently. A failing key never cancels its
// siblings; the channel only reports failure once every key has settled.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use tagscraper_common::{merge, Result, ScrapeError, Source, Stage};

use crate::store::RecordStore;
use crate::traits::Extractor;

/// What one successful key pipeline did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    pub blob: String,
    /// Size of the stored set before this run, `None` when absent.
    pub previous: Option<usize>,
    pub scraped: usize,
    pub written: usize,
}

#[derive(Debug, Clone)]
pub struct KeyOutcome {
    pub key: String,
    pub result: Result<KeyReport>,
}

/// Every key's outcome for one source, in request order.
#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub source: Source,
    pub outcomes: Vec<KeyOutcome>,
}

impl ChannelReport {
    /// The first failed key in request order.
    pub fn first_failure(&self) -> Option<&ScrapeError> {
        self.outcomes.iter().find_map(|o| o.result.as_ref().err())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Collapse to the channel-level result: every key must have succeeded.
    pub fn into_result(self) -> Result<Vec<KeyReport>> {
        self.outcomes.into_iter().map(|o| o.result).collect()
    }
}

pub struct ChannelProcessor {
    store: RecordStore,
    extractor: Arc<dyn Extractor>,
}

impl ChannelProcessor {
    pub fn new(store: RecordStore, extractor: Arc<dyn Extractor>) -> Self {
        Self { store, extractor }
    }

    pub fn source(&self) -> Source {
        self.extractor.source()
    }

    pub async fn run(&self, keys: &[String]) -> ChannelReport {
        let outcomes = join_all(keys.iter().map(|key| async move {
            KeyOutcome {
                key: key.clone(),
                result: self.process_key(key).await,
            }
        }))
        .await;

        let report = ChannelReport {
            source: self.source(),
            outcomes,
        };
        info!(
            source = %report.source,
            keys = report.outcomes.len(),
            succeeded = report.succeeded(),
            "channel finished"
        );
        report
    }

    /// Run the pipeline for a single key. Errors carry the stage they
    /// happened in.
    pub async fn process_key(&self, key: &str) -> Result<KeyReport> {
        let source = self.source();
        let blob = source.blob_name(key);
        let failed = |stage: Stage| {
            move |cause: ScrapeError| {
                warn!(source = %source, key, %stage, error = %cause, "key failed");
                ScrapeError::Aggregate {
                    channel: source,
                    key: key.to_string(),
                    stage,
                    cause: Box::new(cause),
                }
            }
        };

        let previous = self
            .store
            .read(&blob)
            .await
            .map_err(failed(Stage::Reading))?;

        debug!(source = %source, key, "scraping");
        let fresh = self
            .extractor
            .extract(key)
            .await
            .map_err(failed(Stage::Scraping))?;

        let previous_len = previous.as_ref().map(Vec::len);
        let scraped = fresh.len();
        debug!(source = %source, key, previous = ?previous_len, scraped, "merging");
        let merged = merge(previous, fresh);

        self.store
            .write(&blob, &merged)
            .await
            .map_err(failed(Stage::Writing))?;

        Ok(KeyReport {
            blob,
            previous: previous_len,
            scraped,
            written: merged.len(),
        })
    }
}
