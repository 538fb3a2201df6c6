//! Clip retargeting
//!
//! Rebinds clips authored against a source rig onto a runtime skeleton:
//!
//! 1. Each track name `"<bone>.<property>"` is split; unknown properties and
//!    names without a separator are skipped.
//! 2. The source-rig prefix (`mixamorig` by default) is stripped from the
//!    bone name. If the stripped name is not a bone of the runtime skeleton,
//!    the untouched name is tried instead.
//! 3. Tracks whose bone is still not found are dropped.
//! 4. The root bone's `position` track is divided by the avatar scale, since
//!    the character's uniform root scale is applied on top of it.
//!
//! A clip that keeps no tracks at all is an error, never an empty clip.

pub mod source;

pub use source::{SourceClip, SourceTrack};

use thiserror::Error;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::scene::SkeletonIndex;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetargetError {
    #[error("no tracks retargeted for clip `{clip}`")]
    NoTracksRetargeted { clip: String },

    #[error("scale factor must be finite and non-zero, got {0}")]
    InvalidScaleFactor(f32),
}

pub const DEFAULT_SOURCE_PREFIX: &str = "mixamorig";
pub const DEFAULT_ROOT_BONE: &str = "Hips";

/// Resolves a source bone name against the index, preferring the name with
/// `prefix` removed.
fn resolve_bone<'a>(bone: &'a str, prefix: &str, index: &SkeletonIndex) -> Option<&'a str> {
    if !prefix.is_empty() {
        if let Some(stripped) = bone.strip_prefix(prefix) {
            if index.contains(stripped) {
                return Some(stripped);
            }
        }
    }
    index.contains(bone).then_some(bone)
}

/// Retargets `source` onto the skeleton described by `index`, stripping the
/// default `mixamorig` prefix.
///
/// Pure: the index is only read, and identical inputs give identical output.
pub fn retarget(
    source: &SourceClip,
    index: &SkeletonIndex,
    scale_factor: f32,
    root_bone: &str,
) -> Result<AnimationClip, RetargetError> {
    retarget_with_prefix(source, index, scale_factor, root_bone, DEFAULT_SOURCE_PREFIX)
}

/// [`retarget`] with an explicit source-rig prefix. An empty prefix matches
/// bone names verbatim.
pub fn retarget_with_prefix(
    source: &SourceClip,
    index: &SkeletonIndex,
    scale_factor: f32,
    root_bone: &str,
    source_prefix: &str,
) -> Result<AnimationClip, RetargetError> {
    if !scale_factor.is_finite() || scale_factor == 0.0 {
        return Err(RetargetError::InvalidScaleFactor(scale_factor));
    }

    let mut tracks = Vec::with_capacity(source.tracks.len());

    for track in &source.tracks {
        let Some((bone, property)) = track.split_name() else {
            log::trace!("`{}`: skipping unqualified track `{}`", source.name, track.name);
            continue;
        };
        let Some(target) = TargetPath::from_property(property) else {
            log::trace!("`{}`: skipping unsupported channel `{}`", source.name, track.name);
            continue;
        };
        let Some(bone_name) = resolve_bone(bone, source_prefix, index) else {
            log::trace!("`{}`: no bone for track `{}`", source.name, track.name);
            continue;
        };

        let data = if target == TargetPath::Translation && bone_name == root_bone {
            let scaled: Vec<f32> = track.values.iter().map(|v| v / scale_factor).collect();
            TrackData::from_flat(target, track.times.clone(), &scaled, track.interpolation)
        } else {
            TrackData::from_flat(target, track.times.clone(), &track.values, track.interpolation)
        };

        let Some(data) = data else {
            log::warn!(
                "`{}`: track `{}` has {} values for {} keys, dropping it",
                source.name,
                track.name,
                track.values.len(),
                track.times.len()
            );
            continue;
        };

        tracks.push(Track {
            meta: TrackMeta {
                node_name: bone_name.to_string(),
                target,
            },
            data,
        });
    }

    if tracks.is_empty() {
        return Err(RetargetError::NoTracksRetargeted {
            clip: source.name.clone(),
        });
    }

    log::debug!(
        "`{}` retargeted with {}/{} tracks",
        source.name,
        tracks.len(),
        source.tracks.len()
    );

    Ok(AnimationClip::with_duration(
        source.name.clone(),
        source.duration,
        tracks,
    ))
}

/// Retargeting parameters for one avatar, usually taken from
/// [`AvatarConfig`](crate::config::AvatarConfig).
#[derive(Debug, Clone, PartialEq)]
pub struct Retargeter {
    pub source_prefix: String,
    pub root_bone: String,
    pub scale_factor: f32,
}

impl Default for Retargeter {
    fn default() -> Self {
        Self {
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
            root_bone: DEFAULT_ROOT_BONE.to_string(),
            scale_factor: 100.0,
        }
    }
}

impl Retargeter {
    #[must_use]
    pub fn new(scale_factor: f32, root_bone: impl Into<String>) -> Self {
        Self {
            scale_factor,
            root_bone: root_bone.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_source_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.source_prefix = prefix.into();
        self
    }

    pub fn retarget(&self, source: &SourceClip, index: &SkeletonIndex) -> Result<AnimationClip, RetargetError> {
        retarget_with_prefix(
            source,
            index,
            self.scale_factor,
            &self.root_bone,
            &self.source_prefix,
        )
    }
}
