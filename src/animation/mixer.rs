use std::collections::hash_map::Entry;
use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::{PropertyBinding, TargetPath};
use crate::scene::{Character, NodeHandle, SkeletonIndex};

/// Weighted running sum for one (node, property) pair.
#[derive(Debug, Clone, Copy)]
enum Accumulator {
    Vector3 { sum: Vec3, weight: f32 },
    Quaternion { value: Quat, weight: f32 },
}

impl Accumulator {
    fn weight(&self) -> f32 {
        match *self {
            Self::Vector3 { weight, .. } | Self::Quaternion { weight, .. } => weight,
        }
    }
}

/// Samples weighted actions and writes the blended pose into a character.
///
/// Per bone property, vectors are summed by weight and rotations are folded
/// in with incremental slerp. When the weights add up to less than one the
/// remainder comes from the bone's rest pose, so a clip fading in starts from
/// the bind pose rather than from zero.
#[derive(Default)]
pub struct AnimationMixer {
    bindings: FxHashMap<String, Arc<[PropertyBinding]>>,
    accumulators: FxHashMap<(NodeHandle, TargetPath), Accumulator>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached bindings for `action`'s clip, resolved on first use.
    fn bindings_for(&mut self, index: &SkeletonIndex, action: &AnimationAction) -> Arc<[PropertyBinding]> {
        if let Some(bindings) = self.bindings.get(action.clip_name()) {
            return Arc::clone(bindings);
        }
        let bindings: Arc<[PropertyBinding]> = Binder::bind(index, action.clip()).into();
        self.bindings
            .insert(action.clip_name().to_string(), Arc::clone(&bindings));
        bindings
    }

    /// Number of clips with cached bindings.
    #[must_use]
    pub fn bound_clip_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn apply<'a>(
        &mut self,
        actions: impl IntoIterator<Item = &'a mut AnimationAction>,
        character: &mut Character,
        index: &SkeletonIndex,
    ) {
        self.accumulators.clear();

        for action in actions {
            // Finished one-shot actions still hold their last pose.
            if !action.enabled || action.weight <= 0.0 {
                continue;
            }
            let weight = action.weight.min(1.0);
            let bindings = self.bindings_for(index, action);

            for binding in bindings.iter() {
                let Some(value) = action.sample_track(binding.track_index) else {
                    continue;
                };
                let key = (binding.node_handle, binding.target);

                match self.accumulators.entry(key) {
                    Entry::Occupied(mut entry) => match (value, entry.get_mut()) {
                        (TrackValue::Vector3(v), Accumulator::Vector3 { sum, weight: acc }) => {
                            *sum += v * weight;
                            *acc += weight;
                        }
                        (TrackValue::Quaternion(q), Accumulator::Quaternion { value, weight: acc }) => {
                            let total = *acc + weight;
                            // Stay in the same hemisphere so slerp takes the short arc.
                            let q = if value.dot(q) < 0.0 { -q } else { q };
                            *value = value.slerp(q, weight / total);
                            *acc = total;
                        }
                        // A property bound to mismatched value types is ignored.
                        _ => {}
                    },
                    Entry::Vacant(entry) => {
                        entry.insert(match value {
                            TrackValue::Vector3(v) => Accumulator::Vector3 { sum: v * weight, weight },
                            TrackValue::Quaternion(q) => Accumulator::Quaternion { value: q, weight },
                        });
                    }
                }
            }
        }

        for (&(handle, target), acc) in &self.accumulators {
            let Some(node) = character.get_node_mut(handle) else {
                continue;
            };
            let total = acc.weight();
            if total <= 0.0 {
                continue;
            }
            let rest_share = (1.0 - total).max(0.0);

            match (*acc, target) {
                (Accumulator::Vector3 { sum, .. }, TargetPath::Translation) => {
                    node.transform.position = blend_vec3(sum, total, node.rest.position, rest_share);
                }
                (Accumulator::Vector3 { sum, .. }, TargetPath::Scale) => {
                    node.transform.scale = blend_vec3(sum, total, node.rest.scale, rest_share);
                }
                (Accumulator::Quaternion { value, .. }, TargetPath::Rotation) => {
                    node.transform.rotation = if rest_share > 0.0 {
                        node.rest.rotation.slerp(value, total).normalize()
                    } else {
                        value.normalize()
                    };
                }
                _ => {}
            }
        }
    }
}

fn blend_vec3(sum: Vec3, total: f32, rest: Vec3, rest_share: f32) -> Vec3 {
    if rest_share > 0.0 {
        sum + rest * rest_share
    } else {
        sum / total
    }
}
