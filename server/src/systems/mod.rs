pub mod guardians;
pub mod script;
pub mod session;

pub use guardians::{guardians_alarm_system, guardians_movement_system, guardians_spawn_system};
pub use script::script_system;
pub use session::{session_caught_system, session_start_system, session_escaped_system, session_timer_system};
