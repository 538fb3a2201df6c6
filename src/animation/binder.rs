use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::SkeletonIndex;

pub struct Binder;

impl Binder {
    /// Resolves every track of `clip` to a bone of the indexed skeleton.
    ///
    /// Tracks whose node is not in the index produce no binding.
    #[must_use]
    pub fn bind(index: &SkeletonIndex, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_idx, track) in clip.tracks.iter().enumerate() {
            if let Some(node_handle) = index.get(&track.meta.node_name) {
                bindings.push(PropertyBinding {
                    track_index: track_idx,
                    node_handle,
                    target: track.meta.target,
                });
            }
        }

        bindings
    }
}
