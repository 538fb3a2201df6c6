use rustc_hash::FxHashSet;

use crate::animation::LoopMode;

/// All clips play at half their authored speed.
pub const DEFAULT_TIME_SCALE: f32 = 0.5;
/// Length of a crossfade, in unscaled time units.
pub const CROSSFADE_DURATION: f32 = 0.5;
pub const IDLE_CLIP: &str = "idle";

/// How one clip plays: fixed per clip name, never chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPolicy {
    pub time_scale: f32,
    pub loop_mode: LoopMode,
}

/// Playback rules shared by every clip of an avatar.
///
/// Clips listed as one-shot play once, hold their last pose, and hand back to
/// the idle clip when they finish. Everything else loops.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackPolicy {
    /// Started automatically once the clip library is ready.
    pub default_clip: String,
    /// Target of the automatic transition after a one-shot clip.
    pub idle_clip: String,
    pub crossfade_duration: f32,
    pub time_scale: f32,
    one_shot: FxHashSet<String>,
}

impl Default for PlaybackPolicy {
    fn default() -> Self {
        Self {
            default_clip: IDLE_CLIP.to_string(),
            idle_clip: IDLE_CLIP.to_string(),
            crossfade_duration: CROSSFADE_DURATION,
            time_scale: DEFAULT_TIME_SCALE,
            one_shot: FxHashSet::default(),
        }
        .with_one_shot("jump")
    }
}

impl PlaybackPolicy {
    #[must_use]
    pub fn with_default_clip(mut self, name: impl Into<String>) -> Self {
        self.default_clip = name.into();
        self
    }

    #[must_use]
    pub fn with_idle_clip(mut self, name: impl Into<String>) -> Self {
        self.idle_clip = name.into();
        self
    }

    /// A duration of zero or less makes every transition an immediate cut.
    #[must_use]
    pub fn with_crossfade_duration(mut self, duration: f32) -> Self {
        self.crossfade_duration = duration;
        self
    }

    #[must_use]
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    #[must_use]
    pub fn with_one_shot(mut self, name: impl Into<String>) -> Self {
        self.one_shot.insert(name.into());
        self
    }

    /// Marks `name` as looping, undoing a previous one-shot registration.
    #[must_use]
    pub fn with_looping(mut self, name: &str) -> Self {
        self.one_shot.remove(name);
        self
    }

    #[must_use]
    pub fn is_one_shot(&self, name: &str) -> bool {
        self.one_shot.contains(name)
    }

    #[must_use]
    pub fn clip_policy(&self, name: &str) -> ClipPolicy {
        ClipPolicy {
            time_scale: self.time_scale,
            loop_mode: if self.is_one_shot(name) {
                LoopMode::Once
            } else {
                LoopMode::Loop
            },
        }
    }
}
