pub mod constants;
pub mod guardian;
pub mod hunt;
pub mod level;
pub mod nav;
pub mod obstruction;
pub mod sampler;
pub mod session;
