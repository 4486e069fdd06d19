use bevy_ecs::prelude::Resource;
use std::fmt;
use tracing::info;

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Caught,
    Escaped,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Caught => "Caught",
            Self::Escaped => "Success",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Row handed to the event log when a run ends.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeRecord {
    pub player: String,
    pub duration: f32,
    pub outcome: Outcome,
}

/// Per-run context: who is playing, how long the run has lasted and how it
/// ended. Created at level start and reset when returning to the menu.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Session {
    player_name: String,
    elapsed: f32,
    outcome: Option<Outcome>,
}

impl Session {
    #[must_use]
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    // Run clock. Frozen once an outcome is recorded.
    pub fn tick(&mut self, dt: f32) {
        if self.outcome.is_none() && dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn caught(&mut self) -> Option<OutcomeRecord> {
        self.finish(Outcome::Caught)
    }

    pub fn escaped(&mut self) -> Option<OutcomeRecord> {
        self.finish(Outcome::Escaped)
    }

    // Level start or menu return. The player keeps their name.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.outcome = None;
    }

    fn finish(&mut self, outcome: Outcome) -> Option<OutcomeRecord> {
        if self.outcome.is_some() {
            return None;
        }
        self.outcome = Some(outcome);

        let record = OutcomeRecord {
            player: self.player_name.clone(),
            duration: self.elapsed,
            outcome,
        };
        info!(
            player = %record.player,
            duration = record.duration,
            result = %record.outcome,
            "run finished"
        );
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_runs_until_an_outcome() {
        let mut session = Session::new("ada");
        session.tick(1.5);
        session.tick(0.5);
        assert_eq!(session.elapsed(), 2.0);

        let record = session.caught().expect("first outcome is recorded");
        assert_eq!(record.player, "ada");
        assert_eq!(record.duration, 2.0);
        assert_eq!(record.outcome.as_str(), "Caught");

        session.tick(10.0);
        assert_eq!(session.elapsed(), 2.0);
    }

    #[test]
    fn only_the_first_outcome_counts() {
        let mut session = Session::new("ada");
        assert!(session.escaped().is_some());
        assert!(session.caught().is_none());
        assert_eq!(session.outcome(), Some(Outcome::Escaped));
        assert_eq!(Outcome::Escaped.to_string(), "Success");
    }

    #[test]
    fn reset_restarts_the_run() {
        let mut session = Session::new("ada");
        session.tick(3.0);
        let _ = session.caught();
        session.reset();

        assert!(!session.is_over());
        assert_eq!(session.elapsed(), 0.0);
        assert_eq!(session.player_name(), "ada");

        session.tick(-1.0);
        session.tick(f32::NAN);
        assert_eq!(session.elapsed(), 0.0);
    }
}
