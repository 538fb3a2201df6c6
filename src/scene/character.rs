use std::path::Path;

use glam::{Affine3A, Quat, Vec3};
use serde::Deserialize;
use slotmap::SlotMap;
use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::scene::NodeHandle;
use crate::scene::node::{Node, NodeKind};
use crate::scene::transform::Transform;

/// A loaded skinned character: an owned node hierarchy under a single root.
///
/// The character owns every node; everything else (the skeleton index,
/// animation bindings) refers to nodes through [`NodeHandle`]s.
///
/// The character starts hidden so that nothing is drawn in its bind pose
/// before an animation drives it.
#[derive(Debug, Clone)]
pub struct Character {
    pub id: Uuid,
    pub name: String,

    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,

    visible: bool,
}

impl Character {
    /// Creates a character whose root is a group node named `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(name, NodeKind::Group));
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            nodes,
            root,
            visible: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Inserts `node` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` is not a node of this character.
    pub fn add_child(&mut self, parent: NodeHandle, mut node: Node) -> Option<NodeHandle> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        node.parent = Some(parent);
        let handle = self.nodes.insert(node);
        self.nodes[parent].children.push(handle);
        Some(handle)
    }

    /// Convenience for building skeletons in code: adds a bone at `position`.
    pub fn add_bone(&mut self, parent: NodeHandle, name: &str, position: Vec3) -> Option<NodeHandle> {
        let node = Node::new(name, NodeKind::Bone).with_transform(Transform::from_trs(
            position,
            Quat::IDENTITY,
            Vec3::ONE,
        ));
        self.add_child(parent, node)
    }

    /// Visits every node depth-first, parents before children, children in
    /// insertion order.
    pub fn traverse(&self, mut visitor: impl FnMut(NodeHandle, &Node)) {
        let mut stack = vec![self.root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            visitor(handle, node);
            // Reverse so the first child is visited first.
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// First node named `name` in traversal order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        let mut found = None;
        self.traverse(|handle, node| {
            if found.is_none() && node.name == name {
                found = Some(handle);
            }
        });
        found
    }

    /// Model-space matrix of `handle`, composed from the root down.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let mut node = self.nodes.get(handle)?;
        let mut matrix = node.transform.local_matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            matrix = node.transform.local_matrix() * matrix;
        }
        Some(matrix)
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| m.translation.into())
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Applies a uniform scale to the root node (live and rest pose).
    pub fn set_uniform_scale(&mut self, scale: f32) {
        let root = &mut self.nodes[self.root];
        root.transform.set_uniform_scale(scale);
        root.rest.set_uniform_scale(scale);
    }

    /// Records every node's current transform as its rest pose.
    pub fn capture_rest_pose(&mut self) {
        for node in self.nodes.values_mut() {
            node.rest = node.transform;
        }
    }

    /// Resets every node to its rest pose.
    pub fn reset_to_rest_pose(&mut self) {
        for node in self.nodes.values_mut() {
            node.transform = node.rest;
        }
    }

    // ========================================================================
    // Loading from a description
    // ========================================================================

    /// Builds a character from a decoded description. The description's top
    /// node becomes the root.
    pub fn from_desc(desc: &NodeDesc) -> Result<Self> {
        if desc.name.is_empty() {
            return Err(Error::InvalidCharacter("root node has no name".to_string()));
        }

        let mut character = Self::new(&desc.name);
        let root = character.root;
        {
            let node = &mut character.nodes[root];
            node.kind = desc.kind;
            node.transform = desc.transform();
            node.rest = node.transform;
        }

        let mut pending: Vec<(NodeHandle, &NodeDesc)> =
            desc.children.iter().rev().map(|child| (root, child)).collect();
        while let Some((parent, child)) = pending.pop() {
            if child.name.is_empty() {
                return Err(Error::InvalidCharacter(format!(
                    "unnamed node under `{}`",
                    character.nodes[parent].name
                )));
            }
            let node = Node::new(child.name.clone(), child.kind).with_transform(child.transform());
            let handle = character
                .add_child(parent, node)
                .ok_or_else(|| Error::InvalidCharacter("dangling parent".to_string()))?;
            pending.extend(child.children.iter().rev().map(|c| (handle, c)));
        }

        log::info!(
            "Character `{}` built with {} nodes",
            character.name,
            character.node_count()
        );
        Ok(character)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let desc: NodeDesc = serde_json::from_str(json)?;
        Self::from_desc(&desc)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::AssetNotFound(path.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_json_str(&text)
    }
}

/// Serialized form of a character node and its subtree.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDesc {
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
    #[serde(default)]
    pub children: Vec<NodeDesc>,
}

impl NodeDesc {
    fn transform(&self) -> Transform {
        Transform::from_trs(
            self.position.map_or(Vec3::ZERO, Vec3::from_array),
            self.rotation.map_or(Quat::IDENTITY, Quat::from_array),
            self.scale.map_or(Vec3::ONE, Vec3::from_array),
        )
    }
}
