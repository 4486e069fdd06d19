use bevy_math::Vec3;
use bevy_time::{Timer, TimerMode};
use std::{collections::VecDeque, time::Duration};

// ============================================================================
// Behaviour Modes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardianMode {
    Patrolling,
    Reacting,
    Pursuing,
    Searching,
}

// Fine-grained step of the state machine. Every waiting step owns its timer, so
// replacing the phase discards any pending wait.
#[derive(Debug, Clone)]
pub(crate) enum Phase {
    Walking,
    Dwelling(Timer),
    Reacting(Timer),
    Pursuing(Option<Timer>),
    Settling(Timer),
    Approaching(Option<Timer>),
    Looking(Timer),
}

impl Phase {
    pub(crate) const fn mode(&self) -> GuardianMode {
        match self {
            Self::Walking | Self::Dwelling(_) => GuardianMode::Patrolling,
            Self::Reacting(_) => GuardianMode::Reacting,
            Self::Pursuing(_) => GuardianMode::Pursuing,
            Self::Settling(_) | Self::Approaching(_) | Self::Looking(_) => GuardianMode::Searching,
        }
    }
}

// One-shot timer from seconds. Negative or NaN lengths finish immediately.
pub(crate) fn countdown(seconds: f32) -> Timer {
    let duration = Duration::try_from_secs_f32(seconds.max(0.0)).unwrap_or(Duration::MAX);
    Timer::new(duration, TimerMode::Once)
}

// ============================================================================
// Hunt Bookkeeping
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SearchPlan {
    // Look-around points sampled near the alarm position
    Sampled { remaining: u32 },
    // Interior zone nodes still to visit, in authored order
    Zone { nodes: VecDeque<Vec3> },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Hunt {
    pub origin: Vec3,
    pub zone: Option<String>,
    pub route: VecDeque<Vec3>,
    pub search: SearchPlan,
}

// ============================================================================
// Guardian State
// ============================================================================

/// Runtime record of one guardian, owned by its controller.
#[derive(Debug, Clone)]
pub struct GuardianState {
    pub(crate) phase: Phase,
    pub(crate) target: Option<Vec3>,
    pub(crate) waypoint_index: usize,
    pub(crate) hunt: Option<Hunt>,
}

impl GuardianState {
    pub(crate) const fn patrolling(target: Option<Vec3>) -> Self {
        Self {
            phase: Phase::Walking,
            target,
            waypoint_index: 0,
            hunt: None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> GuardianMode {
        self.phase.mode()
    }

    #[must_use]
    pub const fn target(&self) -> Option<Vec3> {
        self.target
    }

    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    #[must_use]
    pub fn active_zone(&self) -> Option<&str> {
        self.hunt.as_ref().and_then(|hunt| hunt.zone.as_deref())
    }

    #[must_use]
    pub fn alert_origin(&self) -> Option<Vec3> {
        self.hunt.as_ref().map(|hunt| hunt.origin)
    }
}
