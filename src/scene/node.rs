use serde::Deserialize;
use smallvec::SmallVec;

use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// What a node in a character hierarchy represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Plain transform node (armature roots, attachment points).
    #[default]
    Group,
    /// Skeleton joint; the only kind the skeleton index picks up.
    Bone,
    /// Skinned mesh bound to the skeleton.
    SkinnedMesh,
}

/// A node of a character hierarchy.
///
/// Nodes form a tree through parent-child handles:
/// - `parent`: `None` for the character root
/// - `children`: child handles in authored order
///
/// `rest` holds the pose the node was authored in; animation blends toward
/// it when the summed action weight is below one.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: SmallVec<[NodeHandle; 4]>,

    pub transform: Transform,
    pub rest: Transform,

    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: SmallVec::new(),
            transform: Transform::new(),
            rest: Transform::new(),
            visible: true,
        }
    }

    /// Sets both the live transform and the rest pose.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self.rest = transform;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_bone(&self) -> bool {
        self.kind == NodeKind::Bone
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}
