use bevy::prelude::*;

use common::{guardian::GuardianController, hunt::HuntIndicator};

// ============================================================================
// Bevy Components
// ============================================================================

// Guardian state machine. Its body is the `Pose` on the same entity.
#[derive(Component, Debug)]
pub struct Guardian(pub GuardianController<HuntIndicator>);
