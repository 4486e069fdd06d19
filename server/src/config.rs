use anyhow::{Context, Result};
use std::{path::Path, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::constants::{LOG_FILTER, MAX_LOOP_FREQUENCY, MIN_LOOP_FREQUENCY};
use common::level::Level;

// ============================================================================
// Logging
// ============================================================================

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

// ============================================================================
// Level Loading
// ============================================================================

pub fn load_level(path: &Path) -> Result<Level> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read level {}", path.display()))?;
    Level::from_json_str(&json).with_context(|| format!("Failed to load level {}", path.display()))
}

// ============================================================================
// Tick Rate
// ============================================================================

#[must_use]
pub const fn loop_frequency(hz: u64) -> u64 {
    if hz < MIN_LOOP_FREQUENCY {
        MIN_LOOP_FREQUENCY
    } else if hz > MAX_LOOP_FREQUENCY {
        MAX_LOOP_FREQUENCY
    } else {
        hz
    }
}

// Length of one simulation tick, never zero.
#[must_use]
pub const fn tick_duration(hz: u64) -> Duration {
    Duration::from_nanos(1_000_000_000 / loop_frequency(hz))
}
