use std::time::{Duration, Instant};

/// Produces per-frame `dt` values, either from the wall clock or at a fixed
/// step for headless and deterministic runs.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: ClockMode,
    /// Time since last tick
    pub delta: Duration,
    /// Total time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

#[derive(Debug, Clone, Copy)]
enum ClockMode {
    Realtime { last_update: Instant },
    Fixed { step: Duration },
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::realtime()
    }
}

impl FrameClock {
    /// A clock that measures real time between ticks.
    #[must_use]
    pub fn realtime() -> Self {
        Self::with_mode(ClockMode::Realtime {
            last_update: Instant::now(),
        })
    }

    /// A clock that advances by exactly `step` on every tick.
    #[must_use]
    pub fn fixed(step: Duration) -> Self {
        Self::with_mode(ClockMode::Fixed { step })
    }

    /// Fixed-step clock running at `fps` ticks per second.
    #[must_use]
    pub fn fixed_fps(fps: u32) -> Self {
        Self::fixed(Duration::from_secs_f64(1.0 / f64::from(fps.max(1))))
    }

    fn with_mode(mode: ClockMode) -> Self {
        Self {
            mode,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advances the clock and returns the new `dt` in seconds.
    pub fn tick(&mut self) -> f32 {
        self.delta = match &mut self.mode {
            ClockMode::Realtime { last_update } => {
                let now = Instant::now();
                let delta = now - *last_update;
                *last_update = now;
                delta
            }
            ClockMode::Fixed { step } => *step,
        };
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.dt_seconds()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}
