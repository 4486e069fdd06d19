pub mod graph;
pub mod pathfinder;

pub use graph::{NavGraph, NavNode, NodeId};
pub use pathfinder::{Route, find_path};
