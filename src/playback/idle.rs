use glam::{EulerRot, Quat, Vec3};

use crate::scene::{Character, Transform};

const BOB_FREQUENCY: f32 = 2.0;
const BOB_AMPLITUDE: f32 = 0.01;
const YAW_FREQUENCY: f32 = 0.5;
const YAW_AMPLITUDE: f32 = 0.02;
const PITCH_FREQUENCY: f32 = 0.7;
const PITCH_AMPLITUDE: f32 = 0.01;

/// Procedural micro-motion for a character that has no clip to play.
///
/// Offsets are applied on top of the root's transform captured at
/// construction, so the motion never drifts. Once disabled it stays disabled.
#[derive(Debug, Clone)]
pub struct IdleFallback {
    base: Transform,
    enabled: bool,
}

impl IdleFallback {
    #[must_use]
    pub fn new(character: &Character) -> Self {
        let base = character
            .get_node(character.root())
            .map(|root| root.transform)
            .unwrap_or_default();
        Self { base, enabled: true }
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    #[must_use]
    pub fn base_pose(&self) -> &Transform {
        &self.base
    }

    /// Root transform at `elapsed` seconds.
    #[must_use]
    pub fn pose_at(&self, elapsed: f32) -> Transform {
        let bob = (elapsed * BOB_FREQUENCY).sin() * BOB_AMPLITUDE;
        let yaw = (elapsed * YAW_FREQUENCY).sin() * YAW_AMPLITUDE;
        let pitch = (elapsed * PITCH_FREQUENCY).sin() * PITCH_AMPLITUDE;

        let sway = Quat::from_euler(EulerRot::XYZ, pitch, yaw, 0.0);
        Transform {
            position: self.base.position + Vec3::new(0.0, bob, 0.0),
            rotation: self.base.rotation * sway,
            scale: self.base.scale,
        }
    }

    /// Writes the pose for `elapsed` seconds into the character root.
    /// Does nothing once disabled.
    pub fn apply(&self, character: &mut Character, elapsed: f32) {
        if !self.enabled {
            return;
        }
        let pose = self.pose_at(elapsed);
        let root = character.root();
        if let Some(node) = character.get_node_mut(root) {
            node.transform = pose;
        }
    }

    /// Turns the fallback off for good and puts the root back where it was.
    pub fn disable(&mut self, character: &mut Character) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        let root = character.root();
        if let Some(node) = character.get_node_mut(root) {
            node.transform = self.base;
        }
        log::debug!("Idle fallback disabled");
    }
}
