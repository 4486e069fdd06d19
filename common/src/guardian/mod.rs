pub mod config;
pub mod controller;
pub mod movement;
pub mod state;
pub mod zones;

pub use config::GuardianConfig;
pub use controller::{GuardianController, Terrain};
pub use movement::{Body, Pose};
pub use state::{GuardianMode, GuardianState};
pub use zones::{InvestigationZone, ZoneRegistry};
