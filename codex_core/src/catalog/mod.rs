//! Catalog - the immutable arena of 144 nodes and 99 gates.
//!
//! Nodes and gates are stored in flat vectors and addressed by `id - 1`.
//! Relationships are kept as id sets rather than references, so the catalog
//! has no cycles between nodes and gates.

mod gate;

pub use gate::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Deref;
use tracing::debug;

use codex_tables::{NodeId, NodeRecord, NodeTable, NODES_PER_LAYER, NODE_COUNT};

use crate::error::{CodexError, EntityKind, Result};
use crate::membership::formula_gates;

/// Where a node sits on the spiral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralPlacement {
    /// Turn of the spiral, 1..=12.
    pub layer: u16,
    /// Position within the turn, 1..=12.
    pub position: u16,
    /// Angle in degrees, 30 per position.
    pub angle: f32,
    /// Distance from the centre, 10 per layer.
    pub radius: f32,
}

impl SpiralPlacement {
    pub fn of(id: NodeId) -> Self {
        let layer = id.layer();
        let position = id.position_in_layer();
        Self {
            layer,
            position,
            angle: f32::from(position - 1) * (360.0 / f32::from(NODES_PER_LAYER)),
            radius: f32::from(layer) * 10.0,
        }
    }
}

/// A node: its authored record plus derived placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub record: NodeRecord,
    pub placement: SpiralPlacement,
}

impl Node {
    fn new(record: NodeRecord) -> Self {
        let placement = SpiralPlacement::of(record.id);
        Self { record, placement }
    }

    pub fn id(&self) -> NodeId {
        self.record.id
    }
}

impl Deref for Node {
    type Target = NodeRecord;

    fn deref(&self) -> &NodeRecord {
        &self.record
    }
}

/// The immutable catalog of nodes and gates.
///
/// Only [`Catalog::build`] creates one; there is no deserializing path
/// around its checks.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    nodes: Vec<Node>,
    gates: Vec<Gate>,
}

impl Catalog {
    /// Build the catalog from the node table.
    ///
    /// The table must hold exactly the ids 1..=144, each once. Gate member
    /// sets are filled from the membership formula.
    pub fn build(table: &NodeTable) -> Result<Self> {
        if table.len() != usize::from(NODE_COUNT) {
            return Err(CodexError::InvalidArgument(format!(
                "node table holds {} records, expected {}",
                table.len(),
                NODE_COUNT
            )));
        }

        let mut seen = HashSet::new();
        for record in &table.nodes {
            if !record.id.is_valid() {
                return Err(CodexError::InvalidArgument(format!(
                    "node id {} is outside 1..={}",
                    record.id, NODE_COUNT
                )));
            }
            if !seen.insert(record.id) {
                return Err(CodexError::InvalidArgument(format!(
                    "node id {} appears more than once",
                    record.id
                )));
            }
        }

        let mut records = table.nodes.clone();
        records.sort_by_key(|r| r.id);
        let nodes: Vec<Node> = records.into_iter().map(Node::new).collect();

        let mut gates: Vec<Gate> = (1..=GATE_COUNT)
            .map(GateId)
            .filter_map(|id| id.tier().map(|tier| Gate::shell(id, tier)))
            .collect();

        for node in &nodes {
            for gate in formula_gates(&node.record) {
                gates[gate.index()].nodes.insert(node.id());
            }
        }

        debug!(nodes = nodes.len(), gates = gates.len(), "built codex catalog");

        Ok(Self { nodes, gates })
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        if !id.is_valid() {
            return Err(CodexError::not_found(EntityKind::Node, id));
        }
        self.nodes
            .get(id.index())
            .ok_or_else(|| CodexError::not_found(EntityKind::Node, id))
    }

    /// Look up a gate by id.
    pub fn gate(&self, id: GateId) -> Result<&Gate> {
        if !id.is_valid() {
            return Err(CodexError::not_found(EntityKind::Gate, id));
        }
        self.gates
            .get(id.index())
            .ok_or_else(|| CodexError::not_found(EntityKind::Gate, id))
    }

    /// Whether the id names a catalogued node.
    pub fn contains(&self, id: NodeId) -> bool {
        id.is_valid() && id.index() < self.nodes.len()
    }

    /// All 144 nodes in id order.
    pub fn all_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All 99 gates in id order.
    pub fn all_gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Nodes on one turn of the spiral.
    pub fn nodes_in_layer(&self, layer: u16) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.placement.layer == layer)
            .collect()
    }

    /// Gates of one tier.
    pub fn gates_by_tier(&self, tier: GateTier) -> Vec<&Gate> {
        self.gates.iter().filter(|g| g.tier == tier).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use codex_tables::{Chakra, Element, StaticTables};

    /// A synthetic but complete 144-node table with no declared harmonics.
    pub(crate) fn plain_table() -> NodeTable {
        let elements = Element::ALL;
        let chakras = Chakra::ALL;
        NodeTable::from_records(
            (1..=NODE_COUNT)
                .map(|id| {
                    let i = usize::from(id - 1);
                    NodeRecord::new(
                        id,
                        format!("Node {}", id),
                        elements[i % elements.len()],
                        chakras[i % chakras.len()],
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_build_builtin_catalog() {
        let tables = StaticTables::builtin().unwrap();
        let catalog = Catalog::build(&tables.nodes).unwrap();

        assert_eq!(catalog.all_nodes().len(), 144);
        assert_eq!(catalog.all_gates().len(), 99);
        assert_eq!(catalog.nodes_in_layer(1).len(), 12);
        assert_eq!(catalog.gates_by_tier(GateTier::Harmonic).len(), 33);
    }

    #[test]
    fn test_node_lookup_is_direct() {
        let catalog = Catalog::build(&plain_table()).unwrap();

        for id in [1, 72, 144] {
            assert_eq!(catalog.node(NodeId(id)).unwrap().id(), NodeId(id));
        }
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let catalog = Catalog::build(&plain_table()).unwrap();

        assert!(catalog
            .node(NodeId(999))
            .unwrap_err()
            .is_not_found(EntityKind::Node));
        assert!(catalog
            .node(NodeId(0))
            .unwrap_err()
            .is_not_found(EntityKind::Node));
        assert!(catalog
            .gate(GateId(100))
            .unwrap_err()
            .is_not_found(EntityKind::Gate));
    }

    #[test]
    fn test_build_rejects_incomplete_table() {
        let mut table = plain_table();
        table.nodes.pop();
        assert!(matches!(
            Catalog::build(&table),
            Err(CodexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_build_rejects_duplicate_ids() {
        let mut table = plain_table();
        table.nodes[143].id = NodeId(1);
        assert!(matches!(
            Catalog::build(&table),
            Err(CodexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_serialized_table_goes_through_build() {
        let mut table = plain_table();
        table.nodes.truncate(10);
        let json = serde_json::to_string(&table).unwrap();

        let table: NodeTable = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            Catalog::build(&table),
            Err(CodexError::InvalidArgument(_))
        ));

        let catalog = Catalog::build(&plain_table()).unwrap();
        let value = serde_json::to_value(&catalog).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 144);
        assert_eq!(value["gates"].as_array().unwrap().len(), 99);
    }

    #[test]
    fn test_build_sorts_records() {
        let mut table = plain_table();
        table.nodes.reverse();
        let catalog = Catalog::build(&table).unwrap();
        assert_eq!(catalog.all_nodes()[0].id(), NodeId(1));
        assert_eq!(catalog.node(NodeId(50)).unwrap().name, "Node 50");
    }

    #[test]
    fn test_spiral_placement() {
        let placement = SpiralPlacement::of(NodeId(14));
        assert_eq!(placement.layer, 2);
        assert_eq!(placement.position, 2);
        assert!((placement.angle - 30.0).abs() < 0.001);
        assert!((placement.radius - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_gates_carry_members() {
        let catalog = Catalog::build(&plain_table()).unwrap();

        // Primary gate 1 collects every node congruent to 1 mod 33.
        let gate = catalog.gate(GateId(1)).unwrap();
        let members: Vec<_> = gate.nodes.iter().map(|n| n.0).collect();
        assert_eq!(members, vec![1, 34, 67, 100, 133]);

        // Spiral gate 67 is layer 1.
        assert_eq!(catalog.gate(GateId(67)).unwrap().nodes.len(), 12);
        // Layers stop at 12, so the last spiral gates stay empty.
        assert!(catalog.gate(GateId(99)).unwrap().nodes.is_empty());
    }
}
