use bevy_math::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::{
    constants::{SAFE_SPOT_ATTEMPTS, SAFE_SPOT_PROBE_HEIGHT, SEARCH_RADIUS},
    obstruction::Obstruction,
};

// ============================================================================
// Safe Spot Sampling
// ============================================================================

/// Rejection sampler for look-around points near an alarm.
///
/// A candidate sits exactly `radius` away from the center in a random
/// horizontal direction and is accepted only if neither the center nor the
/// agent has a wall between itself and the candidate. This is a heuristic:
/// a clear straight line does not prove the point is walkable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeSpotSampler {
    pub radius: f32,
    pub attempts: u32,
    pub probe_height: f32,
}

impl Default for SafeSpotSampler {
    fn default() -> Self {
        Self {
            radius: SEARCH_RADIUS,
            attempts: SAFE_SPOT_ATTEMPTS,
            probe_height: SAFE_SPOT_PROBE_HEIGHT,
        }
    }
}

impl SafeSpotSampler {
    // Sample a safe spot, falling back to the center once every attempt is rejected.
    pub fn sample<R: Rng>(
        &self,
        center: Vec3,
        agent_position: Vec3,
        obstruction: &dyn Obstruction,
        rng: &mut R,
    ) -> Vec3 {
        self.try_sample(center, agent_position, obstruction, rng)
            .unwrap_or(center)
    }

    pub fn try_sample<R: Rng>(
        &self,
        center: Vec3,
        agent_position: Vec3,
        obstruction: &dyn Obstruction,
        rng: &mut R,
    ) -> Option<Vec3> {
        let lift = Vec3::Y * self.probe_height;

        for _ in 0..self.attempts {
            let angle = rng.random_range(0.0..TAU);
            let candidate = center + Vec3::new(angle.cos(), 0.0, angle.sin()) * self.radius;

            // Wall between the alarm and the spot
            if obstruction.is_obstructed(center + lift, candidate + lift) {
                continue;
            }

            // Wall between the agent and the spot
            if obstruction.is_obstructed(agent_position + lift, candidate + lift) {
                continue;
            }

            return Some(candidate);
        }

        None
    }
}
