use bevy::prelude::*;
use tracing::{debug, info};

use crate::{
    messages::{Alarm, PlayerCaught, PlayerEscaped},
    resources::{ActiveLevel, KeyFailures, ScriptCursor},
};
use common::level::ScriptEvent;

// ============================================================================
// Script System
// ============================================================================

// Fire every scripted event whose time has come, in script order.
pub fn script_system(
    time: Res<Time>,
    level: Res<ActiveLevel>,
    mut cursor: ResMut<ScriptCursor>,
    mut failures: ResMut<KeyFailures>,
    mut alarms: MessageWriter<Alarm>,
    mut caught: MessageWriter<PlayerCaught>,
    mut escaped: MessageWriter<PlayerEscaped>,
) {
    let now = time.elapsed_secs();
    let script = &level.0.script;

    while let Some(entry) = script.get(cursor.0).filter(|entry| entry.at <= now) {
        cursor.0 += 1;
        debug!("script event at {:.2}s: {:?}", entry.at, entry.event);

        match &entry.event {
            ScriptEvent::Alert { position, zone } => {
                alarms.write(Alarm {
                    position: Vec3::from_array(*position),
                    zone: zone.clone(),
                    guardian: None,
                });
            }
            ScriptEvent::KeyFailed { key } => {
                let Some(key) = level.0.key(key) else {
                    continue;
                };
                let count = failures.register(&key.name);
                info!("key '{}' failed ({count} so far)", key.name);
                alarms.write(Alarm {
                    position: key.position,
                    zone: Some(key.name.clone()),
                    guardian: key.guardian.clone(),
                });
            }
            ScriptEvent::Caught => {
                caught.write(PlayerCaught);
            }
            ScriptEvent::Escaped => {
                escaped.write(PlayerEscaped);
            }
        }
    }
}
