use bevy::prelude::*;

use crate::{
    components::Guardian,
    messages::{PlayerCaught, PlayerEscaped},
};
use common::session::Session;

// ============================================================================
// Session Systems
// ============================================================================

// Level start: a fresh clock and no outcome.
pub fn session_start_system(mut session: ResMut<Session>) {
    session.reset();
}

pub fn session_timer_system(time: Res<Time>, mut session: ResMut<Session>) {
    session.tick(time.delta_secs());
}

// A caught player ends the run and every guardian drops its hunt on the spot.
pub fn session_caught_system(
    mut caught: MessageReader<PlayerCaught>,
    mut session: ResMut<Session>,
    mut guardians: Query<&mut Guardian>,
) {
    if caught.read().count() == 0 {
        return;
    }
    if session.caught().is_none() {
        return;
    }
    for mut guardian in &mut guardians {
        guardian.0.stand_down();
    }
}

pub fn session_escaped_system(mut escaped: MessageReader<PlayerEscaped>, mut session: ResMut<Session>) {
    if escaped.read().count() > 0 {
        let _ = session.escaped();
    }
}
