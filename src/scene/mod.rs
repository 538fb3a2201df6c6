//! Character hierarchy
//!
//! - [`Character`]: owned node hierarchy of a loaded avatar
//! - [`Node`]: named node with a TRS [`Transform`] and a rest pose
//! - [`SkeletonIndex`]: bone name → [`NodeHandle`] lookup

pub mod character;
pub mod node;
pub mod skeleton;
pub mod transform;

pub use character::{Character, NodeDesc};
pub use node::{Node, NodeKind};
pub use skeleton::SkeletonIndex;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
