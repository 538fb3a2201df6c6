//! # Marionette
//!
//! Skeletal animation retargeting and blended playback for humanoid avatars.
//!
//! Clips authored against a source rig (Mixamo naming by default) are
//! retargeted onto a loaded character by bone name, loaded concurrently into a
//! [`ClipLibrary`], and played through a [`PlaybackController`] that crossfades
//! between clips and returns to idle after one-shot clips.
//!
//! # Modules
//!
//! - [`scene`]: character hierarchy and the skeleton index
//! - [`animation`]: keyframe tracks, actions, bindings and the mixer
//! - [`retarget`]: source clip format and bone-name retargeting
//! - [`assets`]: asset readers, clip sources and the clip library
//! - [`playback`]: playback state machine and idle fallback
//! - [`avatar`]: the per-character facade tying it all together

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod avatar;
pub mod config;
pub mod errors;
pub mod playback;
pub mod retarget;
pub mod scene;
pub mod utils;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode};
pub use assets::{ClipLibrary, ClipRequest, ClipSource, FileAssetReader, JsonClipSource, LoadReport, MemoryAssetReader};
pub use avatar::{Avatar, AvatarStatus};
pub use config::{AvatarConfig, ClipEntry};
pub use errors::{Error, Result};
pub use playback::{IdleFallback, PlayOutcome, PlaybackController, PlaybackPolicy, PlaybackState};
pub use retarget::{RetargetError, Retargeter, SourceClip, SourceTrack, retarget};
pub use scene::{Character, Node, NodeHandle, NodeKind, SkeletonIndex, Transform};
pub use utils::FrameClock;
