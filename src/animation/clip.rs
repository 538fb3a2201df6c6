use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};

#[derive(Debug, Clone, PartialEq)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    /// Decodes an authored flat buffer into the value type `target` expects.
    #[must_use]
    pub fn from_flat(
        target: TargetPath,
        times: Vec<f32>,
        values: &[f32],
        interpolation: InterpolationMode,
    ) -> Option<Self> {
        match target {
            TargetPath::Translation | TargetPath::Scale => {
                KeyframeTrack::from_flat(times, values, interpolation).map(Self::Vector3)
            }
            TargetPath::Rotation => {
                KeyframeTrack::from_flat(times, values, interpolation).map(Self::Quaternion)
            }
        }
    }

    #[must_use]
    pub fn times(&self) -> &[f32] {
        match self {
            Self::Vector3(t) => &t.times,
            Self::Quaternion(t) => &t.times,
        }
    }

    #[must_use]
    pub fn last_time(&self) -> f32 {
        match self {
            Self::Vector3(t) => t.last_time(),
            Self::Quaternion(t) => t.last_time(),
        }
    }

    #[must_use]
    pub fn to_flat(&self) -> Vec<f32> {
        match self {
            Self::Vector3(t) => t.to_flat(),
            Self::Quaternion(t) => t.to_flat(),
        }
    }
}

/// A complete track: binding metadata plus keyframe data.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

impl Track {
    /// `"<node_name>.<property>"`, the form clip files use to address a channel.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.meta.node_name, self.meta.target)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Creates a clip whose duration is the last keyframe time over all tracks.
    #[must_use]
    pub fn new(name: String, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.last_time())
            .fold(0.0_f32, f32::max);

        Self {
            name,
            duration,
            tracks,
        }
    }

    /// Creates a clip with an explicit duration.
    #[must_use]
    pub fn with_duration(name: String, duration: f32, tracks: Vec<Track>) -> Self {
        Self {
            name,
            duration,
            tracks,
        }
    }

    #[must_use]
    pub fn find_track(&self, qualified_name: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.qualified_name() == qualified_name)
    }
}
