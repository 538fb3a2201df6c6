//! Asset loading
//!
//! - [`AssetReader`]: async byte sources ([`FileAssetReader`], [`MemoryAssetReader`])
//! - [`ClipSource`]: locator → [`SourceClip`](crate::retarget::SourceClip)
//! - [`ClipLibrary`]: concurrent load + retarget of a fixed clip set

pub mod clip_source;
pub mod io;
pub mod library;

pub use clip_source::{ClipSource, JsonClipSource};
pub use io::{AssetReader, FileAssetReader, MemoryAssetReader};
pub use library::{ClipLibrary, ClipRequest, LoadReport, load_clip};
