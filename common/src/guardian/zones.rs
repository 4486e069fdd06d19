use anyhow::{Result, bail};
use std::collections::HashMap;

use crate::nav::NodeId;

// ============================================================================
// Investigation Zones
// ============================================================================

// Authored group of search nodes tied to an alarm source: the entrance node
// first, then the interior nodes in visiting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestigationZone {
    pub id: String,
    pub nodes: Vec<NodeId>,
}

impl InvestigationZone {
    #[must_use]
    pub fn new(id: impl Into<String>, nodes: Vec<NodeId>) -> Self {
        Self { id: id.into(), nodes }
    }

    #[must_use]
    pub fn entrance(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    #[must_use]
    pub fn interior(&self) -> &[NodeId] {
        self.nodes.get(1..).unwrap_or_default()
    }

    // A zone without nodes must never start a hunt.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: HashMap<String, InvestigationZone>,
}

impl ZoneRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Register a zone. Identifiers must be unique.
    pub fn insert(&mut self, zone: InvestigationZone) -> Result<()> {
        if self.zones.contains_key(&zone.id) {
            bail!("duplicate investigation zone '{}'", zone.id);
        }
        self.zones.insert(zone.id.clone(), zone);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&InvestigationZone> {
        self.zones.get(id)
    }

    // Zone lookup that treats an empty zone the same as an unknown one.
    #[must_use]
    pub fn configured(&self, id: &str) -> Option<&InvestigationZone> {
        self.get(id).filter(|zone| zone.is_configured())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
