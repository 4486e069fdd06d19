use bevy_math::Vec3;
use std::collections::HashMap;

// ============================================================================
// Node Handles
// ============================================================================

// Stable handle into the graph arena. Neighbor lists store these instead of
// references, so cycles in the authored graph are harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct NavNode {
    pub id: NodeId,
    pub name: String,
    pub position: Vec3,
    pub neighbors: Vec<NodeId>,
}

// ============================================================================
// Navigation Graph
// ============================================================================

/// Static waypoint graph authored with the level.
///
/// Nodes live in an arena indexed by [`NodeId`]. Edges are stored per node, so
/// `connect` writes both directions while `connect_one_way` mirrors asymmetric
/// authoring data.
#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    nodes: Vec<NavNode>,
    by_name: HashMap<String, NodeId>,
}

impl NavGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Add a node and return its handle. A repeated name shadows the earlier
    // node for `node_named` lookups but both stay in the arena.
    pub fn add_node(&mut self, name: impl Into<String>, position: Vec3) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let name = name.into();
        self.by_name.insert(name.clone(), id);
        self.nodes.push(NavNode {
            id,
            name,
            position,
            neighbors: Vec::new(),
        });
        id
    }

    // Connect two nodes in both directions. Returns false if either handle is unknown.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.connect_one_way(a, b);
        self.connect_one_way(b, a);
        true
    }

    pub fn connect_one_way(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.contains(to) {
            return false;
        }
        let Some(node) = self.nodes.get_mut(from.index()) else {
            return false;
        };
        if !node.neighbors.contains(&to) {
            node.neighbors.push(to);
        }
        true
    }

    // Remove the edge in both directions.
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) {
        if let Some(node) = self.nodes.get_mut(a.index()) {
            node.neighbors.retain(|n| *n != b);
        }
        if let Some(node) = self.nodes.get_mut(b.index()) {
            node.neighbors.retain(|n| *n != a);
        }
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NavNode> {
        self.nodes.get(id.index())
    }

    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<Vec3> {
        self.node(id).map(|node| node.position)
    }

    #[must_use]
    pub fn node_named(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    // Neighbors in authored order. Handles that do not resolve are skipped.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = &NavNode> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.neighbors.iter())
            .filter_map(|neighbor| self.node(*neighbor))
    }

    // Linear scan for the closest node. Ties keep the first node in arena order.
    #[must_use]
    pub fn nearest(&self, position: Vec3) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for node in &self.nodes {
            let distance_sq = node.position.distance_squared(position);
            if best.is_none_or(|(_, best_sq)| distance_sq < best_sq) {
                best = Some((node.id, distance_sq));
            }
        }
        best.map(|(id, _)| id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
