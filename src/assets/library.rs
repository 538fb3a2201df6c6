use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tokio::runtime::Runtime;

use crate::animation::AnimationClip;
use crate::assets::clip_source::ClipSource;
use crate::errors::{Error, Result};
use crate::retarget::Retargeter;
use crate::scene::SkeletonIndex;

fn get_asset_runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create asset loader runtime"))
}

/// One clip to load: the name it is stored under and where to read it from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClipRequest {
    pub name: String,
    pub locator: String,
}

impl ClipRequest {
    pub fn new(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
        }
    }
}

/// Outcome of [`ClipLibrary::load_all`], in request order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl LoadReport {
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Retargeted clips by name.
///
/// Entries are only ever added; a name that failed to load is simply absent.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: FxHashMap<String, Arc<AnimationClip>>,
}

impl ClipLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `clip` under `name`. Returns `false` (and keeps the existing
    /// clip) if the name is already taken.
    pub fn insert(&mut self, name: impl Into<String>, clip: AnimationClip) -> bool {
        let name = name.into();
        if self.clips.contains_key(&name) {
            log::warn!("Clip `{name}` is already in the library; keeping the first");
            return false;
        }
        self.clips.insert(name, Arc::new(clip));
        true
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.get(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Clip names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Loads and retargets every request concurrently.
    ///
    /// Each request settles independently; a failing one is logged and
    /// reported but never cancels the others. The returned future resolves
    /// once all of them have settled, whatever order they finish in.
    pub async fn load_all<S: ClipSource>(
        source: &S,
        requests: &[ClipRequest],
        index: &SkeletonIndex,
        retargeter: &Retargeter,
    ) -> (Self, LoadReport) {
        let tasks = requests
            .iter()
            .map(|request| load_clip(source, request, index, retargeter));

        let results = futures::future::join_all(tasks).await;

        let mut library = Self::new();
        let mut report = LoadReport::default();

        for (request, result) in requests.iter().zip(results) {
            match result {
                Ok(clip) => {
                    log::info!(
                        "Clip `{}` ready: {} tracks, {:.2}s",
                        request.name,
                        clip.tracks.len(),
                        clip.duration
                    );
                    if library.insert(request.name.clone(), clip) {
                        report.loaded.push(request.name.clone());
                    }
                }
                Err(err) => {
                    log::warn!(
                        "Clip `{}` unavailable ({}): {err}",
                        request.name,
                        request.locator
                    );
                    report.failed.push((request.name.clone(), err));
                }
            }
        }

        log::info!("Available clips: {:?}", library.names());
        (library, report)
    }

    /// Blocking variant of [`load_all`](Self::load_all) driven by a shared
    /// asset runtime. Must not be called from inside an async context.
    pub fn load_all_blocking<S: ClipSource>(
        source: &S,
        requests: &[ClipRequest],
        index: &SkeletonIndex,
        retargeter: &Retargeter,
    ) -> (Self, LoadReport) {
        get_asset_runtime().block_on(Self::load_all(source, requests, index, retargeter))
    }
}

/// Convenience for a single clip: load and retarget, surfacing the error.
pub async fn load_clip<S: ClipSource>(
    source: &S,
    request: &ClipRequest,
    index: &SkeletonIndex,
    retargeter: &Retargeter,
) -> Result<AnimationClip> {
    let source_clip = source.load_clip(&request.locator).await?;
    let mut clip = retargeter.retarget(&source_clip, index)?;
    // Stored under the requested name, whatever the file calls it.
    clip.name.clone_from(&request.name);
    Ok(clip)
}
