use std::sync::Arc;
use std::time::Instant;

use blob_store::BlobStore;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use tagscraper_common::{Result, ScrapeError, ScrapeRequest, Source};

use super::channel::{ChannelProcessor, ChannelReport};
use crate::extractor::Extractors;
use crate::store::RecordStore;

/// Result of a fully successful run, serialized as `{"success": .., "time": ..}`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// The request, echoed back unchanged.
    pub success: ScrapeRequest,
    /// Wall-clock milliseconds for the whole run.
    pub time: u64,
    #[serde(skip)]
    pub channels: Vec<ChannelReport>,
}

pub struct Orchestrator {
    store: RecordStore,
    extractors: Extractors,
    strict_sources: bool,
}

impl Orchestrator {
    pub fn new(blobs: Arc<dyn BlobStore>, extractors: Extractors) -> Self {
        Self {
            store: RecordStore::new(blobs),
            extractors,
            strict_sources: false,
        }
    }

    /// Fail the run on source names outside the known set instead of
    /// skipping them.
    pub fn strict_sources(mut self, strict: bool) -> Self {
        self.strict_sources = strict;
        self
    }

    /// Scrape every (source, key) pair in `request` and persist the merged
    /// results. Succeeds only if every channel succeeded; otherwise returns
    /// the first failure, taking channels in source order.
    pub async fn run(&self, request: Option<ScrapeRequest>) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        self.run_inner(request)
            .instrument(info_span!("scrape_run", %run_id))
            .await
    }

    async fn run_inner(&self, request: Option<ScrapeRequest>) -> Result<RunReport> {
        let start = Instant::now();
        let request = match request {
            Some(request) if !request.is_empty() => request,
            _ => return Err(ScrapeError::InputEmpty),
        };

        let channels = self.plan(&request)?;
        info!(channels = channels.len(), "run started");

        let reports = join_all(
            channels
                .iter()
                .map(|(processor, keys)| processor.run(keys)),
        )
        .await;

        if let Some(err) = reports.iter().find_map(ChannelReport::first_failure) {
            return Err(err.clone());
        }

        let time = start.elapsed().as_millis() as u64;
        info!(time_ms = time, "run finished");
        Ok(RunReport {
            success: request,
            time,
            channels: reports,
        })
    }

    /// Resolve the request into channel processors before any I/O starts.
    fn plan<'r>(&self, request: &'r ScrapeRequest) -> Result<Vec<(ChannelProcessor, &'r [String])>> {
        for name in request.unknown_sources() {
            if self.strict_sources {
                return Err(ScrapeError::UnknownSource(name.to_string()));
            }
            warn!(source = name, "skipping unknown source");
        }

        let mut channels = Vec::new();
        for source in Source::ALL {
            let Some(keys) = request.keys_for(source) else {
                continue;
            };
            let extractor = self.extractors.get(source).ok_or_else(|| {
                ScrapeError::Config(format!("no extractor registered for {source}"))
            })?;
            channels.push((ChannelProcessor::new(self.store.clone(), extractor), keys));
        }
        Ok(channels)
    }
}
