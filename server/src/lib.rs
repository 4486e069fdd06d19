pub mod components;
pub mod config;
pub mod constants;
pub mod messages;
pub mod resources;
pub mod systems;

pub use config::{init_tracing, load_level, loop_frequency, tick_duration};

use bevy::{prelude::*, time::TimeUpdateStrategy};
use std::time::Duration;

use common::{level::Level, session::Session};
use messages::{Alarm, PlayerCaught, PlayerEscaped};
use resources::{ActiveLevel, KeyFailures, ScriptCursor};
use systems::*;

// ============================================================================
// Simulation App
// ============================================================================

/// Headless simulation of one level. Every `app.update()` advances time by
/// exactly `tick`, independent of the wall clock.
#[must_use]
pub fn build_app(level: Level, player: &str, tick: Duration) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);

    // Slow tick rates would otherwise be cut to the default max delta
    let mut virtual_time = app.world_mut().resource_mut::<Time<Virtual>>();
    if tick > virtual_time.max_delta() {
        virtual_time.set_max_delta(tick);
    }

    app.insert_resource(TimeUpdateStrategy::ManualDuration(tick))
        .insert_resource(ActiveLevel(level))
        .insert_resource(Session::new(player))
        .init_resource::<ScriptCursor>()
        .init_resource::<KeyFailures>()
        .add_message::<Alarm>()
        .add_message::<PlayerCaught>()
        .add_message::<PlayerEscaped>()
        .add_systems(Startup, (session_start_system, guardians_spawn_system))
        .add_systems(
            Update,
            (
                // Script first so its alarms and outcomes land in the same tick
                script_system,
                guardians_alarm_system,
                session_caught_system,
                session_escaped_system,
                guardians_movement_system,
                session_timer_system,
            )
                .chain(),
        );

    app
}
