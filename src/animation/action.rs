use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::Deserialize;

use crate::animation::{
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    Once,
    #[default]
    Loop,
    PingPong,
}

/// One playing instance of a clip.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    finished: bool,
    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            finished: false,
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn clip_name(&self) -> &str {
        &self.clip.name
    }

    /// A `Once` action that reached the end of its clip. The play head stays
    /// clamped there, so the final pose keeps being sampled.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances the play head by `dt` scaled by `time_scale`.
    ///
    /// Returns `true` only on the call during which a `Once` action finishes.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.paused || !self.enabled || self.finished {
            return false;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return false;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.finished = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.finished = true;
                }
                self.finished
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    // Reverse playback
                    self.time = duration + (self.time % duration);
                }
                false
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let mut t = self.time % double_duration;
                if t < 0.0 {
                    t += double_duration;
                }
                if t > duration {
                    t = double_duration - t;
                }
                self.time = t;
                false
            }
        }
    }

    /// Rewinds to the start and clears the finished state.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.finished = false;
        self.paused = false;
        for cursor in &mut self.track_cursors {
            cursor.last_index = 0;
        }
    }

    /// Gets the value of the specified track at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Quaternion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}
