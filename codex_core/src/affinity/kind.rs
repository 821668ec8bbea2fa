//! Affinity kinds and per-node affinity lists.

use serde::{Deserialize, Serialize};

use codex_tables::NodeId;

/// How two nodes relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffinityKind {
    Harmonic,
    Dissonant,
    Tritone,
    /// Spiral neighbours. May co-occur with any other kind.
    Adjacent,
}

impl AffinityKind {
    pub const ALL: [AffinityKind; 4] = [
        AffinityKind::Harmonic,
        AffinityKind::Dissonant,
        AffinityKind::Tritone,
        AffinityKind::Adjacent,
    ];

    /// Whether a pair may carry at most one kind from this group.
    pub fn is_exclusive(&self) -> bool {
        !matches!(self, AffinityKind::Adjacent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AffinityKind::Harmonic => "harmonic",
            AffinityKind::Dissonant => "dissonant",
            AffinityKind::Tritone => "tritone",
            AffinityKind::Adjacent => "adjacent",
        }
    }
}

impl std::fmt::Display for AffinityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directed affinity entry. The classifier always stores both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AffinityRelation {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: AffinityKind,
}

impl AffinityRelation {
    pub fn new(from: NodeId, to: NodeId, kind: AffinityKind) -> Self {
        Self { from, to, kind }
    }

    /// The same relation seen from the other end.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            kind: self.kind,
        }
    }
}

/// Affinities of one node, each list sorted by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affinities {
    pub harmonic: Vec<NodeId>,
    pub dissonant: Vec<NodeId>,
    pub tritone: Vec<NodeId>,
    pub adjacent: Vec<NodeId>,
}

impl Affinities {
    pub fn get(&self, kind: AffinityKind) -> &[NodeId] {
        match kind {
            AffinityKind::Harmonic => &self.harmonic,
            AffinityKind::Dissonant => &self.dissonant,
            AffinityKind::Tritone => &self.tritone,
            AffinityKind::Adjacent => &self.adjacent,
        }
    }

    fn get_mut(&mut self, kind: AffinityKind) -> &mut Vec<NodeId> {
        match kind {
            AffinityKind::Harmonic => &mut self.harmonic,
            AffinityKind::Dissonant => &mut self.dissonant,
            AffinityKind::Tritone => &mut self.tritone,
            AffinityKind::Adjacent => &mut self.adjacent,
        }
    }

    pub fn contains(&self, kind: AffinityKind, node: NodeId) -> bool {
        self.get(kind).binary_search(&node).is_ok()
    }

    /// Insert keeping the list sorted. Returns false if already present.
    pub(crate) fn insert(&mut self, kind: AffinityKind, node: NodeId) -> bool {
        let list = self.get_mut(kind);
        match list.binary_search(&node) {
            Ok(_) => false,
            Err(pos) => {
                list.insert(pos, node);
                true
            }
        }
    }

    /// Kinds under which `node` appears.
    pub fn kinds_of(&self, node: NodeId) -> Vec<AffinityKind> {
        AffinityKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind, node))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        AffinityKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }
}
