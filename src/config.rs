//! Avatar configuration
//!
//! [`AvatarConfig`] gathers everything that is fixed per avatar: the uniform
//! scale, bone naming, playback policy, and the clip manifest. The defaults
//! describe a Mixamo-rigged humanoid with idle, jump, wave and run clips.
//!
//! ```rust,ignore
//! use marionette::config::AvatarConfig;
//!
//! let config = AvatarConfig::from_json_str(r#"{ "avatar_scale": 1.0 }"#)?;
//! assert_eq!(config.clips.len(), 4); // unspecified fields keep their defaults
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::assets::ClipRequest;
use crate::errors::{Error, Result};
use crate::playback::{CROSSFADE_DURATION, DEFAULT_TIME_SCALE, IDLE_CLIP, PlaybackPolicy};
use crate::retarget::{DEFAULT_ROOT_BONE, DEFAULT_SOURCE_PREFIX, Retargeter};

/// One entry of the clip manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClipEntry {
    /// Name the clip is stored and requested under.
    pub name: String,
    /// Locator handed to the clip source.
    pub locator: String,
    /// Key that requests this clip, if any.
    #[serde(default)]
    pub key: Option<char>,
    /// One-shot clips play once and then hand back to the idle clip.
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_looping() -> bool {
    true
}

impl ClipEntry {
    pub fn new(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            key: None,
            looping: true,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    #[must_use]
    pub fn one_shot(mut self) -> Self {
        self.looping = false;
        self
    }
}

/// Per-avatar settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Uniform scale applied to the character root. Source root-motion
    /// positions are divided by the same factor.
    pub avatar_scale: f32,

    /// Bone whose position track carries root motion.
    pub root_bone: String,

    /// Prefix stripped from source bone names before lookup.
    pub source_prefix: String,

    /// Clip started once loading completes.
    pub default_clip: String,

    /// Clip returned to after a one-shot clip finishes.
    pub idle_clip: String,

    /// Play-head speed applied to every clip.
    pub time_scale: f32,

    /// Crossfade length, unaffected by `time_scale`.
    pub crossfade_duration: f32,

    pub clips: Vec<ClipEntry>,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            avatar_scale: 100.0,
            root_bone: DEFAULT_ROOT_BONE.to_string(),
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
            default_clip: IDLE_CLIP.to_string(),
            idle_clip: IDLE_CLIP.to_string(),
            time_scale: DEFAULT_TIME_SCALE,
            crossfade_duration: CROSSFADE_DURATION,
            clips: vec![
                ClipEntry::new("idle", "Idle.json").with_key('1'),
                ClipEntry::new("jump", "Jump.json").with_key('2').one_shot(),
                ClipEntry::new("wave", "Wave.json").with_key('3'),
                ClipEntry::new("run", "Run.json").with_key('4'),
            ],
        }
    }
}

impl AvatarConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::AssetNotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;
        Self::from_json_str(&json)
    }

    /// Load requests for every clip in the manifest, in manifest order.
    #[must_use]
    pub fn clip_requests(&self) -> Vec<ClipRequest> {
        self.clips
            .iter()
            .map(|entry| ClipRequest::new(entry.name.clone(), entry.locator.clone()))
            .collect()
    }

    #[must_use]
    pub fn playback_policy(&self) -> PlaybackPolicy {
        let mut policy = PlaybackPolicy::default()
            .with_default_clip(self.default_clip.clone())
            .with_idle_clip(self.idle_clip.clone())
            .with_crossfade_duration(self.crossfade_duration)
            .with_time_scale(self.time_scale);
        for entry in &self.clips {
            policy = if entry.looping {
                policy.with_looping(&entry.name)
            } else {
                policy.with_one_shot(entry.name.clone())
            };
        }
        policy
    }

    #[must_use]
    pub fn retargeter(&self) -> Retargeter {
        Retargeter::new(self.avatar_scale, self.root_bone.clone()).with_source_prefix(self.source_prefix.clone())
    }

    /// Clip mapped to `key`, if any.
    #[must_use]
    pub fn clip_for_key(&self, key: char) -> Option<&str> {
        self.clips
            .iter()
            .find(|entry| entry.key == Some(key))
            .map(|entry| entry.name.as_str())
    }
}
