//! Membership - the node <-> gate index.
//!
//! Every node lands in its primary gate (by id) and its spiral gate (by
//! layer). Declared harmonics add harmonic-tier gates on top, so membership
//! depends on authored content as well as on the id.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use codex_tables::{NodeId, NodeRecord};

use crate::catalog::{Catalog, GateId, GateTier, GATES_PER_TIER};
use crate::error::{CodexError, EntityKind, Result};

/// Gates a node belongs to according to the membership formula.
///
/// Declared harmonics outside 1..=144 are skipped.
pub fn formula_gates(record: &NodeRecord) -> BTreeSet<GateId> {
    let tier = u16::from(GATES_PER_TIER);
    let mut gates = BTreeSet::new();

    gates.insert(gate_in_tier(0, record.id.0, tier));

    for h in record.harmonics.gate_sources().filter(NodeId::is_valid) {
        gates.insert(gate_in_tier(1, h.0, tier));
    }

    gates.insert(gate_in_tier(2, record.id.layer(), tier));
    gates
}

/// `tier_index * 33 + ((n - 1) mod 33) + 1`
fn gate_in_tier(tier_index: u16, n: u16, per_tier: u16) -> GateId {
    let offset = (n.saturating_sub(1) % per_tier) + 1;
    // At most 99, always fits.
    GateId((tier_index * per_tier + offset) as u8)
}

/// Membership counts for a quick overview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSummary {
    /// Nodes indexed per spiral layer.
    pub nodes_per_layer: BTreeMap<u16, usize>,
    /// Occupied gates per tier.
    pub primary_gates: usize,
    pub harmonic_gates: usize,
    pub spiral_gates: usize,
    /// Total node-gate pairs.
    pub memberships: usize,
}

/// Forward (node -> gates) and inverse (gate -> nodes) membership index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipResolver {
    node_gates: BTreeMap<NodeId, BTreeSet<GateId>>,
    gate_nodes: BTreeMap<GateId, BTreeSet<NodeId>>,
}

impl MembershipResolver {
    /// Build both directions of the index from the catalog's nodes.
    pub fn new(catalog: &Catalog) -> Self {
        let mut node_gates = BTreeMap::new();

        for node in catalog.all_nodes() {
            for declared in node.harmonics.gate_sources() {
                if !declared.is_valid() {
                    warn!(node = %node.id(), declared = %declared, "skipping out-of-range harmonic");
                }
            }
            node_gates.insert(node.id(), formula_gates(&node.record));
        }

        let mut gate_nodes: BTreeMap<GateId, BTreeSet<NodeId>> = BTreeMap::new();
        for (node, gates) in &node_gates {
            for gate in gates {
                gate_nodes.entry(*gate).or_default().insert(*node);
            }
        }

        debug!(
            nodes = node_gates.len(),
            gates = gate_nodes.len(),
            "built membership index"
        );

        Self {
            node_gates,
            gate_nodes,
        }
    }

    /// Wrap an index supplied by the caller.
    ///
    /// Nothing is checked here; run validation to find inconsistencies.
    pub fn from_index(
        node_gates: BTreeMap<NodeId, BTreeSet<GateId>>,
        gate_nodes: BTreeMap<GateId, BTreeSet<NodeId>>,
    ) -> Self {
        Self {
            node_gates,
            gate_nodes,
        }
    }

    /// Sorted gates of a node.
    pub fn gates_for_node(&self, node: NodeId) -> Result<Vec<GateId>> {
        if !node.is_valid() {
            return Err(CodexError::not_found(EntityKind::Node, node));
        }
        Ok(self
            .node_gates
            .get(&node)
            .map(|gates| gates.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Sorted member nodes of a gate.
    pub fn nodes_for_gate(&self, gate: GateId) -> Result<Vec<NodeId>> {
        if !gate.is_valid() {
            return Err(CodexError::not_found(EntityKind::Gate, gate));
        }
        Ok(self
            .gate_nodes
            .get(&gate)
            .map(|nodes| nodes.iter().copied().collect())
            .unwrap_or_default())
    }

    /// The forward index.
    pub fn node_index(&self) -> &BTreeMap<NodeId, BTreeSet<GateId>> {
        &self.node_gates
    }

    /// The inverse index.
    pub fn gate_index(&self) -> &BTreeMap<GateId, BTreeSet<NodeId>> {
        &self.gate_nodes
    }

    /// Record one membership in both directions. Returns true if anything changed.
    pub fn insert(&mut self, node: NodeId, gate: GateId) -> bool {
        let forward = self.node_gates.entry(node).or_default().insert(gate);
        let inverse = self.gate_nodes.entry(gate).or_default().insert(node);
        forward || inverse
    }

    pub fn summary(&self) -> MembershipSummary {
        let mut summary = MembershipSummary::default();

        for (node, gates) in &self.node_gates {
            *summary.nodes_per_layer.entry(node.layer()).or_default() += 1;
            summary.memberships += gates.len();
        }

        for (gate, nodes) in &self.gate_nodes {
            if nodes.is_empty() {
                continue;
            }
            match gate.tier() {
                Some(GateTier::Primary) => summary.primary_gates += 1,
                Some(GateTier::Harmonic) => summary.harmonic_gates += 1,
                Some(GateTier::Spiral) => summary.spiral_gates += 1,
                None => {}
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::plain_table;
    use codex_tables::{Chakra, DeclaredHarmonics, Element, StaticTables};

    fn ids(raw: &[u8]) -> Vec<GateId> {
        raw.iter().copied().map(GateId).collect()
    }

    #[test]
    fn test_formula_without_harmonics() {
        let record = NodeRecord::new(1, "Spark", Element::Fire, Chakra::Root);
        assert_eq!(
            formula_gates(&record).into_iter().collect::<Vec<_>>(),
            ids(&[1, 67])
        );

        let last = NodeRecord::new(144, "Omega", Element::Shadow, Chakra::Crown);
        // (143 mod 33) + 1 = 12, layer 12 -> 78
        assert_eq!(
            formula_gates(&last).into_iter().collect::<Vec<_>>(),
            ids(&[12, 78])
        );
    }

    #[test]
    fn test_formula_with_harmonics() {
        let record = NodeRecord::new(1, "Spark", Element::Fire, Chakra::Root).with_harmonics(
            DeclaredHarmonics {
                perfect_consonance: vec![NodeId(6), NodeId(8)],
                consonance: vec![NodeId(5), NodeId(38)],
                // Only the consonant lists add gates.
                dissonance: vec![NodeId(2)],
                tritone: vec![NodeId(7)],
            },
        );

        // 38 wraps onto the same harmonic gate as 5.
        assert_eq!(
            formula_gates(&record).into_iter().collect::<Vec<_>>(),
            ids(&[1, 38, 39, 41, 67])
        );
    }

    #[test]
    fn test_formula_skips_out_of_range_harmonics() {
        let record = NodeRecord::new(2, "Root", Element::Earth, Chakra::Sacral).with_harmonics(
            DeclaredHarmonics {
                perfect_consonance: vec![NodeId(0), NodeId(200)],
                ..Default::default()
            },
        );
        assert_eq!(
            formula_gates(&record).into_iter().collect::<Vec<_>>(),
            ids(&[2, 67])
        );
    }

    #[test]
    fn test_builtin_node_one() {
        let tables = StaticTables::builtin().unwrap();
        let catalog = Catalog::build(&tables.nodes).unwrap();
        let membership = MembershipResolver::new(&catalog);

        let gates = membership.gates_for_node(NodeId(1)).unwrap();
        assert_eq!(gates, ids(&[1, 38, 39, 41, 67]));
    }

    #[test]
    fn test_every_node_has_two_gates_at_least() {
        let catalog = Catalog::build(&plain_table()).unwrap();
        let membership = MembershipResolver::new(&catalog);

        for node in catalog.all_nodes() {
            let gates = membership.gates_for_node(node.id()).unwrap();
            assert!(gates.len() >= 2, "node {} has {:?}", node.id(), gates);
            assert!(gates.iter().all(GateId::is_valid));
        }
    }

    #[test]
    fn test_inverse_matches_forward() {
        let tables = StaticTables::builtin().unwrap();
        let catalog = Catalog::build(&tables.nodes).unwrap();
        let membership = MembershipResolver::new(&catalog);

        for gate in catalog.all_gates() {
            let members = membership.nodes_for_gate(gate.id).unwrap();
            for node in &members {
                assert!(membership.gates_for_node(*node).unwrap().contains(&gate.id));
            }
            assert_eq!(members, gate.nodes.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_unknown_ids() {
        let membership = MembershipResolver::default();

        assert!(membership
            .gates_for_node(NodeId(999))
            .unwrap_err()
            .is_not_found(EntityKind::Node));
        assert!(membership
            .nodes_for_gate(GateId(0))
            .unwrap_err()
            .is_not_found(EntityKind::Gate));
        // A valid id with nothing indexed is just empty.
        assert!(membership.gates_for_node(NodeId(5)).unwrap().is_empty());
    }

    #[test]
    fn test_insert_updates_both_directions() {
        let mut membership = MembershipResolver::default();

        assert!(membership.insert(NodeId(3), GateId(3)));
        assert!(!membership.insert(NodeId(3), GateId(3)));
        assert_eq!(membership.nodes_for_gate(GateId(3)).unwrap(), vec![NodeId(3)]);
    }

    #[test]
    fn test_summary() {
        let catalog = Catalog::build(&plain_table()).unwrap();
        let summary = MembershipResolver::new(&catalog).summary();

        assert_eq!(summary.nodes_per_layer.len(), 12);
        assert_eq!(summary.nodes_per_layer[&1], 12);
        assert_eq!(summary.primary_gates, 33);
        assert_eq!(summary.harmonic_gates, 0);
        assert_eq!(summary.spiral_gates, 12);
        assert_eq!(summary.memberships, 288);
    }
}
