use rustc_hash::FxHashMap;

use crate::scene::NodeHandle;
use crate::scene::character::Character;

/// Name → bone lookup over a character's skeleton.
///
/// Built once per character and read-only afterwards, so any number of
/// retarget operations can share it by reference. Holds handles only; the
/// bones themselves stay owned by the [`Character`].
///
/// When two bones share a name the first one met in depth-first order wins.
/// The losing handles are kept in [`duplicates`](Self::duplicates) for
/// diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SkeletonIndex {
    bones: FxHashMap<String, NodeHandle>,
    duplicates: Vec<(String, NodeHandle)>,
}

impl SkeletonIndex {
    #[must_use]
    pub fn build(character: &Character) -> Self {
        let mut index = Self::default();

        character.traverse(|handle, node| {
            if !node.is_bone() {
                return;
            }
            if index.bones.contains_key(&node.name) {
                index.duplicates.push((node.name.clone(), handle));
            } else {
                index.bones.insert(node.name.clone(), handle);
            }
        });

        for (name, _) in &index.duplicates {
            log::warn!(
                "Character `{}` has more than one bone named `{name}`; keeping the first",
                character.name
            );
        }
        log::info!(
            "Skeleton index for `{}` built with {} bones",
            character.name,
            index.bones.len()
        );

        index
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NodeHandle> {
        self.bones.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bones.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Bone names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bones.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Bones that lost a name collision, in traversal order.
    #[must_use]
    pub fn duplicates(&self) -> &[(String, NodeHandle)] {
        &self.duplicates
    }
}
