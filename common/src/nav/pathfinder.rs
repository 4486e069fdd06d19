use bevy_math::Vec3;
use std::collections::{HashMap, HashSet};

use super::graph::{NavGraph, NodeId};

// ============================================================================
// Route
// ============================================================================

// Ordered node sequence from start to goal, both inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub cost: f32,
    // Number of nodes popped from the open list while searching
    pub expanded: usize,
}

impl Route {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn start(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    #[must_use]
    pub fn goal(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    // Node positions along the route, skipping handles the graph cannot resolve.
    #[must_use]
    pub fn positions(&self, graph: &NavGraph) -> Vec<Vec3> {
        self.nodes.iter().filter_map(|id| graph.position(*id)).collect()
    }
}

// ============================================================================
// A* Search
// ============================================================================

/// A* search over the waypoint graph.
///
/// Edge cost and heuristic are both the Euclidean distance between node
/// positions, so the heuristic is admissible and the route is optimal.
/// The open list keeps insertion order and the lowest f-score wins, with
/// ties going to the node inserted first; the result is deterministic for a
/// given graph. Returns `None` when the open list runs dry, which callers
/// treat as "no route" rather than an error.
#[must_use]
pub fn find_path(graph: &NavGraph, start: NodeId, goal: NodeId) -> Option<Route> {
    let start_pos = graph.position(start)?;
    let goal_pos = graph.position(goal)?;

    if start == goal {
        return Some(Route {
            nodes: vec![goal],
            cost: 0.0,
            expanded: 0,
        });
    }

    let mut open: Vec<NodeId> = vec![start];
    let mut closed: HashSet<NodeId> = HashSet::new();
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
    let mut g_score: HashMap<NodeId, f32> = HashMap::from([(start, 0.0)]);
    let mut f_score: HashMap<NodeId, f32> = HashMap::from([(start, start_pos.distance(goal_pos))]);
    let mut expanded = 0;

    while let Some(index) = lowest_f_index(&open, &f_score) {
        let current = open.remove(index);
        expanded += 1;

        if current == goal {
            let cost = g_score.get(&current).copied().unwrap_or_default();
            return Some(Route {
                nodes: reconstruct(&came_from, current),
                cost,
                expanded,
            });
        }

        closed.insert(current);

        let Some(current_pos) = graph.position(current) else {
            continue;
        };
        let current_g = g_score.get(&current).copied().unwrap_or(f32::MAX);

        for neighbor in graph.neighbors(current) {
            if closed.contains(&neighbor.id) {
                continue;
            }

            let tentative_g = current_g + current_pos.distance(neighbor.position);

            if !open.contains(&neighbor.id) {
                open.push(neighbor.id);
            } else if tentative_g >= g_score.get(&neighbor.id).copied().unwrap_or(f32::MAX) {
                continue;
            }

            came_from.insert(neighbor.id, current);
            g_score.insert(neighbor.id, tentative_g);
            f_score.insert(neighbor.id, tentative_g + neighbor.position.distance(goal_pos));
        }
    }

    None
}

// Index of the open-list entry with the lowest f-score; strict comparison keeps the earliest on ties.
fn lowest_f_index(open: &[NodeId], f_score: &HashMap<NodeId, f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, id) in open.iter().enumerate() {
        let f = f_score.get(id).copied().unwrap_or(f32::MAX);
        if best.is_none_or(|(_, best_f)| f < best_f) {
            best = Some((index, f));
        }
    }
    best.map(|(index, _)| index)
}

fn reconstruct(came_from: &HashMap<NodeId, NodeId>, mut current: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![current];
    while let Some(previous) = came_from.get(&current) {
        current = *previous;
        nodes.push(current);
    }
    nodes.reverse();
    nodes
}
