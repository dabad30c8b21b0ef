// Record sets on top of a BlobStore: JSON in, JSON out.

use std::sync::Arc;

use blob_store::BlobStore;
use tracing::{debug, info};

use tagscraper_common::{RecordSet, Result, ScrapeError};

#[derive(Clone)]
pub struct RecordStore {
    blobs: Arc<dyn BlobStore>,
}

impl RecordStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Load the stored set for `name`. `Ok(None)` when nothing has been
    /// stored yet, which is not the same as a stored empty set.
    pub async fn read(&self, name: &str) -> Result<Option<RecordSet>> {
        debug!(bucket = self.blobs.bucket(), blob = name, "reading");
        let Some(body) = self
            .blobs
            .get(name)
            .await
            .map_err(|e| ScrapeError::Store(e.to_string()))?
        else {
            return Ok(None);
        };

        let records = serde_json::from_slice(&body).map_err(|e| ScrapeError::CorruptData {
            blob: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(records))
    }

    /// Replace whatever is stored under `name` with `records`.
    ///
    /// Backends without an atomic put get delete-then-put. If the put fails
    /// after the delete succeeded, the name is left absent and the previous
    /// records are gone.
    pub async fn write(&self, name: &str, records: &RecordSet) -> Result<()> {
        let body = serde_json::to_vec(records).map_err(|e| ScrapeError::Store(e.to_string()))?;

        if !self.blobs.atomic_put() {
            self.blobs
                .delete(name)
                .await
                .map_err(|e| ScrapeError::Store(e.to_string()))?;
        }
        self.blobs
            .put(name, body)
            .await
            .map_err(|e| ScrapeError::Store(e.to_string()))?;

        info!(
            bucket = self.blobs.bucket(),
            blob = name,
            records = records.len(),
            "blob updated"
        );
        Ok(())
    }
}
