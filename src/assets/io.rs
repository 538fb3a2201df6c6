use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::errors::{Error, Result};

/// Asynchronous byte source for assets.
pub trait AssetReader: Send + Sync {
    /// Reads the whole asset addressed by `uri`.
    fn read_bytes(&self, uri: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Reads assets relative to a root directory.
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    /// `path` may be a directory or a file inside the asset directory.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::AssetNotFound(path.display().to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// In-memory assets, optionally with a simulated read latency per entry.
#[derive(Default, Clone)]
pub struct MemoryAssetReader {
    entries: FxHashMap<String, (Arc<[u8]>, Option<Duration>)>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries
            .insert(uri.into(), (Arc::from(bytes.into()), None));
    }

    /// Inserts an entry whose read completes only after `latency`.
    pub fn insert_with_latency(&mut self, uri: impl Into<String>, bytes: impl Into<Vec<u8>>, latency: Duration) {
        self.entries
            .insert(uri.into(), (Arc::from(bytes.into()), Some(latency)));
    }

    #[must_use]
    pub fn with(mut self, uri: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(uri, bytes);
        self
    }
}

impl AssetReader for MemoryAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let (bytes, latency) = self
            .entries
            .get(uri)
            .cloned()
            .ok_or_else(|| Error::AssetNotFound(uri.to_string()))?;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        Ok(bytes.to_vec())
    }
}
