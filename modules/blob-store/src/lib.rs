pub mod error;
mod fs;
mod postgres;

pub use error::{BlobStoreError, Result};
pub use fs::FsBlobStore;
pub use postgres::PgBlobStore;

use async_trait::async_trait;

/// A single bucket of named blobs with overwrite semantics.
///
/// There are no transactions across names or across callers: two writers
/// putting the same name race, and the last write wins.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Bucket this store reads and writes.
    fn bucket(&self) -> &str;

    /// Fetch a blob. `Ok(None)` when the name does not exist.
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Store a blob under `name`, replacing any existing content.
    async fn put(&self, name: &str, body: Vec<u8>) -> Result<()>;

    /// Remove a blob. Removing a missing name is not an error.
    async fn delete(&self, name: &str) -> Result<()>;

    /// Whether `put` replaces existing content in one step. When false,
    /// callers that need a clean overwrite delete first, and a crash between
    /// the delete and the put leaves the name absent.
    fn atomic_put(&self) -> bool {
        false
    }
}
