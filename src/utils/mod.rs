//! Utility Module
//!
//! - [`FrameClock`]: per-frame `dt` from the wall clock or a fixed step

pub mod time;

pub use time::FrameClock;
