use std::fmt;

use crate::scene::NodeHandle;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation, // Maps to transform.position
    Rotation,    // Maps to transform.rotation
    Scale,       // Maps to transform.scale
}

impl TargetPath {
    /// Parses the property half of a qualified track name (`"Hips.position"`).
    #[must_use]
    pub fn from_property(property: &str) -> Option<Self> {
        match property {
            "position" => Some(Self::Translation),
            "rotation" | "quaternion" => Some(Self::Rotation),
            "scale" => Some(Self::Scale),
            _ => None,
        }
    }

    /// The property name used in qualified track names.
    #[must_use]
    pub fn property_name(self) -> &'static str {
        match self {
            Self::Translation => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property_name())
    }
}

/// Binding relationship: maps track `track_index` from a clip to the target
/// property of `node_handle` in the character.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
}
