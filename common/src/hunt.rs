use tracing::debug;

// ============================================================================
// Hunt Cue
// ============================================================================

// Sink for the "being hunted" presentation cue. Fire-and-forget.
pub trait HuntSignal {
    fn start_hunt(&mut self);
    fn end_hunt(&mut self);
    // Drop the cue without any fade, e.g. when the player was caught
    fn hide_immediate(&mut self);
}

/// Tracks whether the hunt cue is showing.
///
/// Start and end are idempotent: starting while already hunting, or ending
/// while idle, does nothing. Only real transitions are counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuntIndicator {
    hunting: bool,
    starts: u32,
    ends: u32,
}

impl HuntIndicator {
    #[must_use]
    pub const fn is_hunting(&self) -> bool {
        self.hunting
    }

    #[must_use]
    pub const fn starts(&self) -> u32 {
        self.starts
    }

    #[must_use]
    pub const fn ends(&self) -> u32 {
        self.ends
    }
}

impl HuntSignal for HuntIndicator {
    fn start_hunt(&mut self) {
        if self.hunting {
            return;
        }
        self.hunting = true;
        self.starts += 1;
        debug!("hunt cue shown");
    }

    fn end_hunt(&mut self) {
        if !self.hunting {
            return;
        }
        self.hunting = false;
        self.ends += 1;
        debug!("hunt cue faded out");
    }

    fn hide_immediate(&mut self) {
        if self.hunting {
            debug!("hunt cue hidden");
        }
        self.hunting = false;
    }
}
