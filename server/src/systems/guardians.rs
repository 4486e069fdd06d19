use bevy::prelude::*;

use crate::{components::Guardian, messages::Alarm, resources::ActiveLevel};
use common::guardian::Pose;

// ============================================================================
// Guardian Spawn System
// ============================================================================

pub fn guardians_spawn_system(mut commands: Commands, level: Res<ActiveLevel>) {
    let level = &level.0;
    for blueprint in &level.guardians {
        commands.spawn((Guardian(blueprint.controller(&level.terrain)), Pose::at(blueprint.spawn)));
    }
}

// ============================================================================
// Guardian Alarm System
// ============================================================================

// Deliver alarms to every guardian. The newest alarm wins.
pub fn guardians_alarm_system(mut alarms: MessageReader<Alarm>, mut guardians: Query<&mut Guardian>) {
    for alarm in alarms.read() {
        for mut guardian in &mut guardians {
            let controller = &mut guardian.0;
            let wired = alarm.guardian.as_deref() == Some(controller.name());

            match alarm.zone.as_deref() {
                Some(zone) => {
                    if !controller.alert_to_zone(alarm.position, zone) && wired {
                        controller.alert_to_position(alarm.position);
                    }
                }
                None => {
                    if alarm.guardian.is_none() || wired {
                        controller.alert_to_position(alarm.position);
                    }
                }
            }
        }
    }
}

// ============================================================================
// Guardian Movement System
// ============================================================================

pub fn guardians_movement_system(time: Res<Time>, mut guardians: Query<(&mut Guardian, &mut Pose)>) {
    let delta = time.delta_secs();
    for (mut guardian, mut pose) in &mut guardians {
        guardian.0.advance(&mut *pose, delta);
    }
}
