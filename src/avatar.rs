//! Avatar
//!
//! [`Avatar`] owns one character together with everything that animates it:
//! the skeleton index, the clip library (via the playback controller), the
//! mixer, and the idle fallback.
//!
//! # Lifecycle
//!
//! 1. Create with [`Avatar::new`]; the character is scaled and hidden
//! 2. Load clips with [`Avatar::load_clips`] (or hand over a prepared library
//!    with [`Avatar::install_library`])
//! 3. Call [`Avatar::update`] once per frame
//! 4. Forward play requests with [`Avatar::play`] or [`Avatar::handle_key`]
//!
//! ```rust,ignore
//! let mut avatar = Avatar::new(character, &config);
//! let source = JsonClipSource::new(FileAssetReader::new("assets/clips"));
//! avatar.load_clips(&source).await;
//!
//! loop {
//!     avatar.update(dt);
//!     println!("{}", avatar.status().current_clip_label());
//! }
//! ```

use crate::animation::AnimationMixer;
use crate::assets::{ClipLibrary, ClipSource, LoadReport};
use crate::config::AvatarConfig;
use crate::playback::{IdleFallback, PlayOutcome, PlaybackController};
use crate::retarget::Retargeter;
use crate::scene::{Character, SkeletonIndex};

/// Observable state of an avatar, refreshed every frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AvatarStatus {
    pub current_clip: Option<String>,
    /// `true` once a loaded clip has started driving the character.
    pub animation_loaded: bool,
    pub visible: bool,
}

impl AvatarStatus {
    #[must_use]
    pub fn current_clip_label(&self) -> &str {
        self.current_clip.as_deref().unwrap_or("none")
    }
}

pub struct Avatar {
    character: Character,
    index: SkeletonIndex,
    config: AvatarConfig,
    retargeter: Retargeter,

    controller: PlaybackController,
    mixer: AnimationMixer,
    fallback: IdleFallback,

    animation_loaded: bool,
    elapsed: f32,
    frame_count: u64,
}

impl Avatar {
    #[must_use]
    pub fn new(mut character: Character, config: &AvatarConfig) -> Self {
        character.set_uniform_scale(config.avatar_scale);
        character.set_visible(false);

        let index = SkeletonIndex::build(&character);
        let fallback = IdleFallback::new(&character);

        log::info!(
            "Avatar `{}`: {} nodes, {} bones, scale {}",
            character.name,
            character.node_count(),
            index.len(),
            config.avatar_scale
        );

        Self {
            index,
            retargeter: config.retargeter(),
            controller: PlaybackController::new(config.playback_policy()),
            mixer: AnimationMixer::new(),
            fallback,
            config: config.clone(),
            character,
            animation_loaded: false,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn character(&self) -> &Character {
        &self.character
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &SkeletonIndex {
        &self.index
    }

    #[inline]
    #[must_use]
    pub fn retargeter(&self) -> &Retargeter {
        &self.retargeter
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn fallback(&self) -> &IdleFallback {
        &self.fallback
    }

    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Loads every clip in the configured manifest and hands the result to
    /// the playback controller.
    pub async fn load_clips<S: ClipSource>(&mut self, source: &S) -> LoadReport {
        let requests = self.config.clip_requests();
        let (library, report) = ClipLibrary::load_all(source, &requests, &self.index, &self.retargeter).await;
        self.install_library(library);
        report
    }

    /// Blocking variant of [`load_clips`](Self::load_clips).
    pub fn load_clips_blocking<S: ClipSource>(&mut self, source: &S) -> LoadReport {
        let requests = self.config.clip_requests();
        let (library, report) = ClipLibrary::load_all_blocking(source, &requests, &self.index, &self.retargeter);
        self.install_library(library);
        report
    }

    /// One-time hand-off of a loaded library. Starts the default clip if it
    /// is present; otherwise the idle fallback keeps running.
    pub fn install_library(&mut self, library: ClipLibrary) {
        if self.controller.start(library) {
            self.fallback.disable(&mut self.character);
        }
        self.animation_loaded = self.controller.has_started();
        self.sync_visibility();
    }

    pub fn play(&mut self, name: &str) -> PlayOutcome {
        self.controller.play(name)
    }

    /// Plays the clip mapped to `key`. Unmapped keys are ignored.
    pub fn handle_key(&mut self, key: char) -> Option<PlayOutcome> {
        let name = self.config.clip_for_key(key)?.to_string();
        Some(self.controller.play(&name))
    }

    /// Advances playback by `dt` and writes the resulting pose.
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.frame_count += 1;

        if self.controller.has_started() {
            self.fallback.disable(&mut self.character);
            self.controller.update(dt);
            self.mixer
                .apply(self.controller.actions_mut(), &mut self.character, &self.index);
        } else {
            self.fallback.apply(&mut self.character, self.elapsed);
        }

        self.sync_visibility();
    }

    #[must_use]
    pub fn status(&self) -> AvatarStatus {
        AvatarStatus {
            current_clip: self.controller.current_clip_name().map(str::to_string),
            animation_loaded: self.animation_loaded,
            visible: self.character.is_visible(),
        }
    }

    fn sync_visibility(&mut self) {
        if self.controller.is_revealed() && !self.character.is_visible() {
            self.character.set_visible(true);
        }
    }
}
