use std::future::Future;

use crate::assets::io::AssetReader;
use crate::errors::Result;
use crate::retarget::SourceClip;

/// Supplies source clips by locator.
///
/// Failures are opaque to the clip library: the error is logged and the
/// clip is left out.
pub trait ClipSource: Send + Sync {
    fn load_clip(&self, locator: &str) -> impl Future<Output = Result<SourceClip>> + Send;
}

/// Reads JSON clip files through an [`AssetReader`].
pub struct JsonClipSource<R> {
    reader: R,
}

impl<R: AssetReader> JsonClipSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    #[must_use]
    pub fn reader(&self) -> &R {
        &self.reader
    }
}

impl<R: AssetReader> ClipSource for JsonClipSource<R> {
    async fn load_clip(&self, locator: &str) -> Result<SourceClip> {
        let bytes = self.reader.read_bytes(locator).await?;
        let label = locator.to_string();

        // Offload decoding to the blocking pool
        tokio::task::spawn_blocking(move || SourceClip::from_json_slice(&bytes, &label)).await?
    }
}
