use bevy_ecs::prelude::Component;
use bevy_math::{Quat, Vec3};

use crate::constants::PHYSICS_EPSILON;

// ============================================================================
// Pose & Body
// ============================================================================

// Position and orientation of an agent. Forward is +Z rotated by `rotation`.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl Pose {
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Movement collaborator. The controller asks for a kinematic move each tick;
/// the implementor owns the actual integration and may clamp or refuse it.
pub trait Body {
    fn pose(&self) -> Pose;
    fn move_to(&mut self, position: Vec3, rotation: Quat);
}

impl Body for Pose {
    fn pose(&self) -> Pose {
        *self
    }

    fn move_to(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }
}

// ============================================================================
// Planar Steering
// ============================================================================

#[must_use]
pub fn planar_offset(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).with_y(0.0)
}

#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    planar_offset(a, b).length()
}

// Yaw-only rotation facing along `direction`, ignoring its vertical part.
#[must_use]
pub fn heading_toward(direction: Vec3) -> Option<Quat> {
    let flat = direction.with_y(0.0);
    if flat.length_squared() <= PHYSICS_EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(flat.x.atan2(flat.z)))
}

/// One tick of planar movement toward `target`.
///
/// The heading is slerped toward the target direction by `turn_speed * delta`
/// (clamped to a full turn), then the agent advances along the new heading by
/// `speed * delta`, never further than the remaining distance. Returns `None`
/// when the agent already stands on the target.
#[must_use]
pub fn steer(pose: Pose, target: Vec3, speed: f32, turn_speed: f32, delta: f32) -> Option<Pose> {
    let offset = planar_offset(pose.position, target);
    let desired = heading_toward(offset)?;
    let distance = offset.length();

    let rotation = pose
        .rotation
        .slerp(desired, (turn_speed * delta).clamp(0.0, 1.0))
        .normalize();
    let heading = (rotation * Vec3::Z).with_y(0.0).normalize_or_zero();
    let step = (speed * delta).min(distance);

    Some(Pose {
        position: pose.position + heading * step,
        rotation,
    })
}
