#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use crate::{constants::*, sampler::SafeSpotSampler};

// ============================================================================
// Guardian Tunables
// ============================================================================

// Per-guardian tunables. Level files may override any subset of fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct GuardianConfig {
    pub patrol_speed: f32,
    pub run_speed: f32,
    pub turn_speed: f32,
    pub arrival_threshold: f32,
    pub waypoint_dwell: f32,
    pub reaction_delay: f32,
    pub settle_duration: f32,
    pub look_duration: f32,
    pub search_radius: f32,
    pub search_points: u32,
    pub search_arrival_threshold: f32,
    pub search_arrival_timeout: f32,
    // None waits at each zone node until arrival, however long that takes
    pub zone_arrival_timeout: Option<f32>,
    // Limit on each leg of a pursuit run. None runs until arrival
    pub pursuit_timeout: Option<f32>,
    pub sample_attempts: u32,
    pub probe_height: f32,
    pub seed: u64,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            patrol_speed: GUARDIAN_PATROL_SPEED,
            run_speed: GUARDIAN_RUN_SPEED,
            turn_speed: GUARDIAN_TURN_SPEED,
            arrival_threshold: GUARDIAN_ARRIVAL_THRESHOLD,
            waypoint_dwell: GUARDIAN_WAYPOINT_DWELL,
            reaction_delay: GUARDIAN_REACTION_DELAY,
            settle_duration: GUARDIAN_SETTLE_DURATION,
            look_duration: GUARDIAN_LOOK_DURATION,
            search_radius: SEARCH_RADIUS,
            search_points: SEARCH_POINTS,
            search_arrival_threshold: SEARCH_ARRIVAL_THRESHOLD,
            search_arrival_timeout: SEARCH_ARRIVAL_TIMEOUT,
            zone_arrival_timeout: Some(ZONE_ARRIVAL_TIMEOUT),
            pursuit_timeout: Some(PURSUIT_TIMEOUT),
            sample_attempts: SAFE_SPOT_ATTEMPTS,
            probe_height: SAFE_SPOT_PROBE_HEIGHT,
            seed: 0,
        }
    }
}

impl GuardianConfig {
    #[must_use]
    pub const fn sampler(&self) -> SafeSpotSampler {
        SafeSpotSampler {
            radius: self.search_radius,
            attempts: self.sample_attempts,
            probe_height: self.probe_height,
        }
    }
}
