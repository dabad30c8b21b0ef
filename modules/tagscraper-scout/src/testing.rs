// Test mocks for the scrape pipeline.
//
// Three mocks matching the three injected boundaries:
// - MockFetcher (PageFetcher): HashMap-based URL -> body
// - MockExtractor (Extractor): HashMap-based key -> records or error
// - MockBlobStore (BlobStore): in-memory bucket with per-name failure
//   injection and an operation log

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use blob_store::{BlobStore, BlobStoreError};
use url::Url;

use tagscraper_common::{Record, RecordSet, Result, ScrapeError, Source};

use crate::traits::{Extractor, PageFetcher};

/// Shorthand for a record in test fixtures.
pub fn record(title: &str, reference: &str) -> Record {
    Record::new(title, reference)
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Returns registered bodies by URL, `Fetch` errors for anything else.
pub struct MockFetcher {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn on_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn get(&self, url: &Url) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ScrapeError::fetch(url.as_str(), "MockFetcher: no page registered"))
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

/// Canned results per key. Unregistered keys fail with a `Fetch` error.
pub struct MockExtractor {
    source: Source,
    results: HashMap<String, Result<RecordSet>>,
    calls: Mutex<Vec<String>>,
}

impl MockExtractor {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            results: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_key(mut self, key: &str, records: RecordSet) -> Self {
        self.results.insert(key.to_string(), Ok(records));
        self
    }

    pub fn failing_key(mut self, key: &str, reason: &str) -> Self {
        self.results.insert(
            key.to_string(),
            Err(ScrapeError::fetch(format!("mock://{}/{key}", self.source), reason)),
        );
        self
    }

    /// Keys extracted so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn source(&self) -> Source {
        self.source
    }

    async fn extract(&self, key: &str) -> Result<RecordSet> {
        self.calls.lock().unwrap().push(key.to_string());
        // Yield so sibling keys interleave the way real network calls would.
        tokio::task::yield_now().await;
        self.results.get(key).cloned().unwrap_or_else(|| {
            Err(ScrapeError::fetch(
                format!("mock://{}/{key}", self.source),
                "MockExtractor: no result registered",
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// MockBlobStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockBlobStoreInner {
    blobs: HashMap<String, Vec<u8>>,
    fail_get: HashSet<String>,
    fail_put: HashSet<String>,
    fail_delete: HashSet<String>,
    ops: Vec<String>,
}

/// In-memory bucket. Non-atomic by default, so writes go through
/// delete-then-put like a plain object store.
pub struct MockBlobStore {
    inner: Mutex<MockBlobStoreInner>,
    atomic: bool,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MockBlobStoreInner::default()),
            atomic: false,
        }
    }

    /// Advertise an atomic put.
    pub fn atomic(mut self) -> Self {
        self.atomic = true;
        self
    }

    /// Pre-populate a blob. Not recorded in the operation log.
    pub fn with_blob(self, name: &str, body: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .blobs
            .insert(name.to_string(), body.as_bytes().to_vec());
        self
    }

    /// Pre-populate a blob with serialized records.
    pub fn with_records(self, name: &str, records: &[Record]) -> Self {
        let body = serde_json::to_string(records).unwrap();
        self.with_blob(name, &body)
    }

    pub fn fail_get(self, name: &str) -> Self {
        self.inner.lock().unwrap().fail_get.insert(name.to_string());
        self
    }

    pub fn fail_put(self, name: &str) -> Self {
        self.inner.lock().unwrap().fail_put.insert(name.to_string());
        self
    }

    pub fn fail_delete(self, name: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .fail_delete
            .insert(name.to_string());
        self
    }

    /// Every get/put/delete so far, as `"{op} {name}"`.
    pub fn ops(&self) -> Vec<String> {
        self.inner.lock().unwrap().ops.clone()
    }

    /// Current raw content of a blob.
    pub fn blob(&self, name: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .blobs
            .get(name)
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }

    /// Current content of a blob, decoded as records.
    pub fn records(&self, name: &str) -> Option<RecordSet> {
        self.blob(name)
            .map(|body| serde_json::from_str(&body).unwrap())
    }
}

impl Default for MockBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn injected(op: &str, name: &str) -> BlobStoreError {
    BlobStoreError::Io(std::io::Error::other(format!("injected {op} failure for {name}")))
}

#[async_trait]
impl BlobStore for MockBlobStore {
    fn bucket(&self) -> &str {
        "mock"
    }

    async fn get(&self, name: &str) -> blob_store::Result<Option<Vec<u8>>> {
        let mut inner = self.inner.lock().unwrap();
        inner.ops.push(format!("get {name}"));
        if inner.fail_get.contains(name) {
            return Err(injected("get", name));
        }
        Ok(inner.blobs.get(name).cloned())
    }

    async fn put(&self, name: &str, body: Vec<u8>) -> blob_store::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.ops.push(format!("put {name}"));
        if inner.fail_put.contains(name) {
            return Err(injected("put", name));
        }
        inner.blobs.insert(name.to_string(), body);
        Ok(())
    }

    async fn delete(&self, name: &str) -> blob_store::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.ops.push(format!("delete {name}"));
        if inner.fail_delete.contains(name) {
            return Err(injected("delete", name));
        }
        inner.blobs.remove(name);
        Ok(())
    }

    fn atomic_put(&self) -> bool {
        self.atomic
    }
}
