use glam::{Affine3A, EulerRot, Quat, Vec3};

/// Local TRS transform of a node, relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new() -> Self {
        Self::IDENTITY
    }

    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Sets the rotation from XYZ Euler angles (radians).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Current rotation as XYZ Euler angles (radians).
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    #[inline]
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vec3::splat(scale);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
