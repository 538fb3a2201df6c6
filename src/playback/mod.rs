//! Clip selection and procedural fallback
//!
//! - [`PlaybackController`]: tagged state machine driving crossfades
//! - [`PlaybackPolicy`]: per-clip loop and speed rules
//! - [`IdleFallback`]: micro-motion while no clip has started

pub mod controller;
pub mod idle;
pub mod policy;

pub use controller::{FadingAction, PlayOutcome, PlaybackController, PlaybackState};
pub use idle::IdleFallback;
pub use policy::{CROSSFADE_DURATION, ClipPolicy, DEFAULT_TIME_SCALE, IDLE_CLIP, PlaybackPolicy};
