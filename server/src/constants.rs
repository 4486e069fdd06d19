// ============================================================================
// Simulation Host Constants
// ============================================================================

// Default simulation rate in ticks per second
pub const SERVER_LOOP_FREQUENCY: u64 = 30;

// Accepted --hz range
pub const MIN_LOOP_FREQUENCY: u64 = 1;
pub const MAX_LOOP_FREQUENCY: u64 = 1000;

// Fallback tracing filter when RUST_LOG is not set
pub const LOG_FILTER: &str = "info";

// Name recorded in the session when none is given on the command line
pub const DEFAULT_PLAYER_NAME: &str = "player";
