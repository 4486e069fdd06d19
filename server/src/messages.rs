use bevy::prelude::*;

// ============================================================================
// Bevy Messages
// ============================================================================

/// Alarm raised in the level, e.g. by a failed key quiz.
///
/// `zone` qualifies the alarm for zone searches. `guardian` names a guardian
/// wired directly to the alarm source; it falls back to a plain position alert
/// when the zone is not configured.
#[derive(Message, Debug, Clone)]
pub struct Alarm {
    pub position: Vec3,
    pub zone: Option<String>,
    pub guardian: Option<String>,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerCaught;

#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerEscaped;
