use anyhow::{Context, Result, bail};
use bevy_math::Vec3;
use std::collections::HashSet;
use tracing::{debug, warn};

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use crate::{
    guardian::{GuardianConfig, GuardianController, InvestigationZone, Terrain, ZoneRegistry},
    hunt::HuntIndicator,
    nav::NavGraph,
    obstruction::{Wall, WallSet},
};

// ============================================================================
// Authoring Data
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct LevelSpec {
    pub nodes: Vec<NodeSpec>,
    pub zones: Vec<ZoneSpec>,
    pub walls: Vec<Wall>,
    pub keys: Vec<KeySpec>,
    pub guardians: Vec<GuardianSpec>,
    pub script: Vec<ScriptEntry>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct NodeSpec {
    pub name: String,
    pub position: [f32; 3],
    #[cfg_attr(feature = "json", serde(default))]
    pub neighbors: Vec<String>,
}

// Zone node names, entrance first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct ZoneSpec {
    pub id: String,
    #[cfg_attr(feature = "json", serde(default))]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct KeySpec {
    pub name: String,
    pub position: [f32; 3],
    // Guardian wired directly to this key's alarm, if any
    #[cfg_attr(feature = "json", serde(default))]
    pub guardian: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct GuardianSpec {
    pub name: String,
    pub spawn: [f32; 3],
    #[cfg_attr(feature = "json", serde(default))]
    pub waypoints: Vec<[f32; 3]>,
    #[cfg_attr(feature = "json", serde(default))]
    pub config: GuardianConfig,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct ScriptEntry {
    pub at: f32,
    #[cfg_attr(feature = "json", serde(flatten))]
    pub event: ScriptEvent,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(tag = "event", rename_all = "snake_case"))]
pub enum ScriptEvent {
    Alert {
        position: [f32; 3],
        #[cfg_attr(feature = "json", serde(default))]
        zone: Option<String>,
    },
    KeyFailed {
        key: String,
    },
    Caught,
    Escaped,
}

// ============================================================================
// Runtime Level
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct KeyPoint {
    pub name: String,
    pub position: Vec3,
    pub guardian: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuardianBlueprint {
    pub name: String,
    pub spawn: Vec3,
    pub waypoints: Vec<Vec3>,
    pub config: GuardianConfig,
}

impl GuardianBlueprint {
    #[must_use]
    pub fn controller(&self, terrain: &Terrain) -> GuardianController<HuntIndicator> {
        GuardianController::new(
            self.name.clone(),
            self.config.clone(),
            self.waypoints.clone(),
            terrain.clone(),
            HuntIndicator::default(),
        )
    }
}

/// Validated level: immutable routing data plus everything needed to spawn
/// guardians and replay the script.
#[derive(Debug, Clone)]
pub struct Level {
    pub terrain: Terrain,
    pub keys: Vec<KeyPoint>,
    pub guardians: Vec<GuardianBlueprint>,
    pub script: Vec<ScriptEntry>,
}

impl Level {
    /// Validate authoring data.
    ///
    /// Duplicate node, zone, key or guardian names are errors. References to
    /// unknown names (neighbors, zone nodes, key guardians, scripted keys) are
    /// dropped with a warning.
    pub fn build(spec: LevelSpec) -> Result<Self> {
        let graph = build_graph(&spec.nodes)?;
        let zones = build_zones(&graph, &spec.zones)?;

        let mut guardian_names = HashSet::new();
        let mut guardians = Vec::with_capacity(spec.guardians.len());
        for guardian in spec.guardians {
            if !guardian_names.insert(guardian.name.clone()) {
                bail!("duplicate guardian '{}'", guardian.name);
            }
            guardians.push(GuardianBlueprint {
                name: guardian.name,
                spawn: Vec3::from_array(guardian.spawn),
                waypoints: guardian.waypoints.into_iter().map(Vec3::from_array).collect(),
                config: guardian.config,
            });
        }

        let mut keys: Vec<KeyPoint> = Vec::with_capacity(spec.keys.len());
        for key in spec.keys {
            if keys.iter().any(|k| k.name == key.name) {
                bail!("duplicate key '{}'", key.name);
            }
            let guardian = key.guardian.filter(|name| {
                let known = guardian_names.contains(name);
                if !known {
                    warn!("key '{}' is wired to unknown guardian '{name}'", key.name);
                }
                known
            });
            keys.push(KeyPoint {
                name: key.name,
                position: Vec3::from_array(key.position),
                guardian,
            });
        }

        let mut script: Vec<ScriptEntry> = spec
            .script
            .into_iter()
            .filter(|entry| match &entry.event {
                ScriptEvent::KeyFailed { key } if !keys.iter().any(|k| &k.name == key) => {
                    warn!("script references unknown key '{key}' at {:.2}s", entry.at);
                    false
                }
                _ => true,
            })
            .collect();
        script.sort_by(|a, b| a.at.total_cmp(&b.at));

        debug!(
            "level built: {} nodes, {} zones, {} walls, {} guardians",
            graph.len(),
            zones.len(),
            spec.walls.len(),
            guardians.len()
        );

        Ok(Self {
            terrain: Terrain::new(graph, zones, WallSet::new(spec.walls)),
            keys,
            guardians,
            script,
        })
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: LevelSpec = serde_json::from_str(json).context("Failed to parse level")?;
        Self::build(spec)
    }

    #[must_use]
    pub fn key(&self, name: &str) -> Option<&KeyPoint> {
        self.keys.iter().find(|key| key.name == name)
    }
}

fn build_graph(nodes: &[NodeSpec]) -> Result<NavGraph> {
    let mut graph = NavGraph::new();
    for node in nodes {
        if graph.node_named(&node.name).is_some() {
            bail!("duplicate nav node '{}'", node.name);
        }
        graph.add_node(node.name.clone(), Vec3::from_array(node.position));
    }

    // Authored neighbor lists are per node, so edges keep their direction
    for node in nodes {
        let Some(from) = graph.node_named(&node.name) else {
            continue;
        };
        for neighbor in &node.neighbors {
            match graph.node_named(neighbor) {
                Some(to) => {
                    graph.connect_one_way(from, to);
                }
                None => warn!("nav node '{}' lists unknown neighbor '{neighbor}'", node.name),
            }
        }
    }

    Ok(graph)
}

fn build_zones(graph: &NavGraph, zones: &[ZoneSpec]) -> Result<ZoneRegistry> {
    let mut registry = ZoneRegistry::new();
    for zone in zones {
        let nodes = zone
            .nodes
            .iter()
            .filter_map(|name| {
                let id = graph.node_named(name);
                if id.is_none() {
                    warn!("zone '{}' lists unknown node '{name}'", zone.id);
                }
                id
            })
            .collect();
        registry
            .insert(InvestigationZone::new(zone.id.clone(), nodes))
            .context("Invalid zone table")?;
    }
    Ok(registry)
}
