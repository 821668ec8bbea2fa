//! Node definitions - the 144 authored entities of the codex spiral.

mod attributes;
mod record;

pub use attributes::*;
pub use record::*;

use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};

/// Number of nodes in a complete codex.
pub const NODE_COUNT: u16 = 144;

/// Nodes per turn of the spiral.
pub const NODES_PER_LAYER: u16 = 12;

/// Identifier of a codex node (1..=144 in a complete codex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u16);

impl NodeId {
    /// Whether the id falls inside the codex range.
    pub fn is_valid(&self) -> bool {
        (1..=NODE_COUNT).contains(&self.0)
    }

    /// Spiral layer (turn) this id sits on, 1-based.
    pub fn layer(&self) -> u16 {
        self.0.div_ceil(NODES_PER_LAYER)
    }

    /// Position within the layer, 1-based.
    pub fn position_in_layer(&self) -> u16 {
        (self.0.saturating_sub(1) % NODES_PER_LAYER) + 1
    }

    /// Array index for flat `id - 1` storage.
    pub fn index(&self) -> usize {
        usize::from(self.0.saturating_sub(1))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The node table as authored, in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeTable {
    #[serde(rename = "node", default)]
    pub nodes: Vec<NodeRecord>,
}

impl NodeTable {
    /// Parse a node table from TOML (`[[node]]` entries).
    pub fn from_toml_str(source: &str) -> TableResult<Self> {
        toml::from_str(source).map_err(|e| TableError::parse("node", e))
    }

    /// Create a table from already-built records.
    pub fn from_records(nodes: Vec<NodeRecord>) -> Self {
        Self { nodes }
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a record by id.
    pub fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Mutable access to a record by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeRecord> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_layer_and_position() {
        assert_eq!(NodeId(1).layer(), 1);
        assert_eq!(NodeId(12).layer(), 1);
        assert_eq!(NodeId(13).layer(), 2);
        assert_eq!(NodeId(144).layer(), 12);

        assert_eq!(NodeId(1).position_in_layer(), 1);
        assert_eq!(NodeId(12).position_in_layer(), 12);
        assert_eq!(NodeId(14).position_in_layer(), 2);
    }

    #[test]
    fn test_node_id_validity() {
        assert!(NodeId(1).is_valid());
        assert!(NodeId(144).is_valid());
        assert!(!NodeId(0).is_valid());
        assert!(!NodeId(145).is_valid());
        assert!(!NodeId(999).is_valid());
    }

    #[test]
    fn test_node_table_from_toml() {
        let source = r##"
            [[node]]
            id = 7
            name = "Balance of the First Turn"
            element = "Air"
            chakra = "Crown"
            planet = "Venus"
            zodiac = "Libra"
            resonance = 741
            color = "#DDA0DD"
            geometry = "Octahedron"
            light = 7
            shadow = 43
            iching = 7
            soyga = "A"
        "##;

        let table = NodeTable::from_toml_str(source).unwrap();
        assert_eq!(table.len(), 1);

        let node = table.get(NodeId(7)).unwrap();
        assert_eq!(node.element, Element::Air);
        assert_eq!(node.chakra, Chakra::Crown);
        // Narrative and harmonics are optional in the source.
        assert!(node.harmonics.is_empty());
        assert!(node.narrative.keywords.is_empty());
    }

    #[test]
    fn test_node_table_rejects_unknown_element() {
        let source = r##"
            [[node]]
            id = 1
            name = "Broken"
            element = "Plasma"
            chakra = "Root"
            planet = "Mars"
            zodiac = "Aries"
            resonance = 174
            color = "#000000"
            geometry = "Cube"
            light = 1
            shadow = 1
            iching = 1
            soyga = "A"
        "##;

        let err = NodeTable::from_toml_str(source).unwrap_err();
        assert!(matches!(err, TableError::Parse { table: "node", .. }));
    }
}
