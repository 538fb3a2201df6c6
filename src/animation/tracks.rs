use serde::Deserialize;

use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMode {
    #[default]
    Linear,
    Step,
    #[serde(alias = "cubic", alias = "cubic_spline")]
    CubicSpline,
}

impl InterpolationMode {
    /// Number of authored values stored per keyframe.
    #[inline]
    #[must_use]
    pub fn values_per_key(self) -> usize {
        match self {
            Self::CubicSpline => 3,
            _ => 1,
        }
    }
}

const MAX_SCAN_OFFSET: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>, // For CubicSpline, length is times.len() * 3
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Builds a track from an authored flat scalar buffer.
    ///
    /// Returns `None` when the buffer length does not match
    /// `times.len() * values_per_key * T::STRIDE`.
    #[must_use]
    pub fn from_flat(times: Vec<f32>, flat: &[f32], interpolation: InterpolationMode) -> Option<Self> {
        let expected = times.len() * interpolation.values_per_key() * T::STRIDE;
        if flat.len() != expected {
            return None;
        }

        let values = flat.chunks_exact(T::STRIDE).map(T::from_slice).collect();
        Some(Self::new(times, values, interpolation))
    }

    /// Flattens the stored values back into an authored scalar buffer.
    #[must_use]
    pub fn to_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.values.len() * T::STRIDE);
        for value in &self.values {
            value.extend_flat(&mut out);
        }
        out
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last keyframe, or `0.0` for an empty track.
    #[inline]
    #[must_use]
    pub fn last_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Stateless sampling via binary search.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        // partition_point finds the first index where t > time, i.e. next_index
        let next_idx = self.times.partition_point(|&t| t <= time);
        let idx = next_idx.saturating_sub(1);

        Some(self.sample_at_frame(idx, time))
    }

    /// Sampling with a cursor that remembers the last keyframe interval.
    ///
    /// Playback moves forward a little every frame, so a short linear scan
    /// from the previous interval almost always hits; large jumps (loop wrap,
    /// scrubbing) fall back to binary search.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.times.len();
        if len == 0 {
            return None;
        }

        // Static data (single keyframe)
        if len == 1 {
            return Some(*self.get_value_at(0));
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.times[i];

        let found_index = if time >= t_curr {
            // Forward: check [i, i+1), [i+1, i+2)...
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    if time >= self.times[len - 1] {
                        res = Some(len - 1);
                    }
                    break;
                }

                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Backward: time < times[i], so find the first idx with times[idx] <= time
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                if i < offset {
                    break;
                }
                let idx = i - offset;
                if time >= self.times[idx] {
                    res = Some(idx);
                    break;
                }
            }
            res
        };

        let final_index = found_index.unwrap_or_else(|| {
            let next_idx = self.times.partition_point(|&t| t <= time);
            next_idx.saturating_sub(1)
        });
        cursor.last_index = final_index;

        Some(self.sample_at_frame(final_index, time))
    }

    /// For Linear/Step, the index is used directly.
    /// For CubicSpline, the value is at index * 3 + 1.
    fn get_value_at(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            _ => &self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();

        if index >= len - 1 {
            return *self.get_value_at(len - 1);
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => *self.get_value_at(index),
            InterpolationMode::Linear => {
                let v0 = *self.get_value_at(index);
                let v1 = *self.get_value_at(next_idx);
                T::interpolate_linear(v0, v1, t)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;

                let v0 = self.values[i_prev + 1];
                let out_tangent0 = self.values[i_prev + 2];
                let in_tangent1 = self.values[i_next];
                let v1 = self.values[i_next + 1];

                T::interpolate_cubic(v0, out_tangent0, in_tangent1, v1, t, dt)
            }
        }
    }
}
