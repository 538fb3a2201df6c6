use serde::Deserialize;

use crate::animation::tracks::InterpolationMode;
use crate::errors::{Error, Result};

/// One authored channel, addressed as `"<bone>.<property>"`.
///
/// `values` is the flat scalar buffer exactly as authored: three scalars per
/// key for `position`/`scale`, four (x, y, z, w) for `rotation`, tripled for
/// cubic-spline tracks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceTrack {
    pub name: String,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
    #[serde(default)]
    pub interpolation: InterpolationMode,
}

impl SourceTrack {
    #[must_use]
    pub fn new(name: impl Into<String>, times: Vec<f32>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            times,
            values,
            interpolation: InterpolationMode::Linear,
        }
    }

    /// Splits the qualified name at its last `.` into `(bone, property)`.
    #[must_use]
    pub fn split_name(&self) -> Option<(&str, &str)> {
        self.name.rsplit_once('.')
    }
}

/// A clip as authored against the source rig, before retargeting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceClip {
    pub name: String,
    /// Negative means "derive from the last keyframe".
    #[serde(default = "unset_duration")]
    pub duration: f32,
    pub tracks: Vec<SourceTrack>,
}

fn unset_duration() -> f32 {
    -1.0
}

impl SourceClip {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32, tracks: Vec<SourceTrack>) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Decodes a JSON clip file.
    ///
    /// `label` names the clip in errors (usually its locator).
    pub fn from_json_slice(bytes: &[u8], label: &str) -> Result<Self> {
        let mut clip: SourceClip = serde_json::from_slice(bytes)?;
        clip.validate(label)?;
        if clip.duration < 0.0 {
            clip.duration = clip
                .tracks
                .iter()
                .filter_map(|t| t.times.last().copied())
                .fold(0.0_f32, f32::max);
        }
        Ok(clip)
    }

    fn validate(&self, label: &str) -> Result<()> {
        let invalid = |reason: String| Error::InvalidClip {
            clip: label.to_string(),
            reason,
        };

        if self.tracks.is_empty() {
            return Err(invalid("clip has no tracks".to_string()));
        }
        if !self.duration.is_finite() {
            return Err(invalid(format!("duration {} is not finite", self.duration)));
        }
        for track in &self.tracks {
            if track.times.iter().any(|t| !t.is_finite())
                || track.times.windows(2).any(|w| w[1] < w[0])
            {
                return Err(invalid(format!(
                    "track `{}` has non-increasing or non-finite key times",
                    track.name
                )));
            }
        }
        Ok(())
    }
}
