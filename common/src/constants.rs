// ============================================================================
// Floating-Point Comparisons
// ============================================================================

// Small value for floating-point comparisons (near-zero checks, division guards).
pub const PHYSICS_EPSILON: f32 = 1e-6;

// ============================================================================
// Guardian Movement
// ============================================================================

// Speeds (units per second)
pub const GUARDIAN_PATROL_SPEED: f32 = 2.0;
pub const GUARDIAN_RUN_SPEED: f32 = 4.5;
pub const GUARDIAN_TURN_SPEED: f32 = 20.0; // slerp factor per second

// Horizontal distance below which a movement target counts as reached
pub const GUARDIAN_ARRIVAL_THRESHOLD: f32 = 0.6;

// ============================================================================
// Guardian Timings (seconds)
// ============================================================================

pub const GUARDIAN_WAYPOINT_DWELL: f32 = 1.0;
pub const GUARDIAN_REACTION_DELAY: f32 = 5.0; // must exceed any UI delay shown before the alarm
pub const GUARDIAN_SETTLE_DURATION: f32 = 1.0; // pause on arrival before looking around
pub const GUARDIAN_LOOK_DURATION: f32 = 2.0;

// ============================================================================
// Search
// ============================================================================

pub const SEARCH_RADIUS: f32 = 1.5;
pub const SEARCH_POINTS: u32 = 2; // sampled look-around points per point alarm
pub const SEARCH_ARRIVAL_THRESHOLD: f32 = 0.8;
pub const SEARCH_ARRIVAL_TIMEOUT: f32 = 2.5; // stuck protection for sampled points
pub const ZONE_ARRIVAL_TIMEOUT: f32 = 10.0; // stuck protection for zone interior nodes
pub const PURSUIT_TIMEOUT: f32 = 15.0; // per leg of a pursuit run

// Safe spot sampling
pub const SAFE_SPOT_ATTEMPTS: u32 = 10;
pub const SAFE_SPOT_PROBE_HEIGHT: f32 = 0.5; // linecasts run this far above the floor

// ============================================================================
// Level Geometry
// ============================================================================

pub const DEFAULT_WALL_WIDTH: f32 = 0.3;
pub const DEFAULT_WALL_HEIGHT: f32 = 4.0;
