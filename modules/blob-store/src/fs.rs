// Filesystem backend: one `{file_name(name)}.json` file per blob in
// `{root}/{bucket}/`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use url::form_urlencoded;
use uuid::Uuid;

use crate::error::{BlobStoreError, Result};
use crate::BlobStore;

pub struct FsBlobStore {
    bucket: String,
    dir: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl AsRef<Path>, bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            dir: root.as_ref().join(bucket),
        }
    }

    /// Directory holding this bucket's blobs.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        Ok(self.dir.join(format!("{}.json", file_name(name)?)))
    }
}

/// Map a blob name onto a single path component.
///
/// Everything outside `[A-Za-z0-9*-._]` is percent-encoded, so separators
/// and `%` itself cannot appear raw and distinct names never share a file.
/// A leading `.` is encoded too, keeping blobs apart from hidden temp files.
fn file_name(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(BlobStoreError::InvalidName(name.to_string()));
    }
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    Ok(match encoded.strip_prefix('.') {
        Some(rest) => format!("%2E{rest}"),
        None => encoded,
    })
}

#[async_trait]
impl BlobStore for FsBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, name: &str, body: Vec<u8>) -> Result<()> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write beside the target and rename over it so readers never see a
        // partial file.
        let tmp = self.dir.join(format!(".{}.tmp", Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&tmp, &body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(bucket = self.bucket.as_str(), name, bytes = body.len(), "blob written");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn atomic_put(&self) -> bool {
        true
    }
}
