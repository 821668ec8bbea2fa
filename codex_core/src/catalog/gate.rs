//! Gates - the 99 derived groupings of nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use codex_tables::{ChapterNumber, NodeId};

/// Number of gates.
pub const GATE_COUNT: u8 = 99;

/// Gates per tier.
pub const GATES_PER_TIER: u8 = 33;

/// Identifier of a gate (1..=99).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateId(pub u8);

impl GateId {
    pub fn is_valid(&self) -> bool {
        (1..=GATE_COUNT).contains(&self.0)
    }

    /// The tier, fully determined by the id range.
    pub fn tier(&self) -> Option<GateTier> {
        match self.0 {
            1..=33 => Some(GateTier::Primary),
            34..=66 => Some(GateTier::Harmonic),
            67..=99 => Some(GateTier::Spiral),
            _ => None,
        }
    }

    pub(crate) fn index(&self) -> usize {
        usize::from(self.0.saturating_sub(1))
    }
}

impl std::fmt::Display for GateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gate tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateTier {
    /// Gates 1..=33, one per chapter.
    Primary,
    /// Gates 34..=66, reached through declared harmonics.
    Harmonic,
    /// Gates 67..=99, one per spiral layer.
    Spiral,
}

/// A gate and its member nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub id: GateId,
    pub tier: GateTier,
    pub name: String,
    /// Primary gates map one-to-one onto chapters.
    pub chapter: Option<ChapterNumber>,
    /// Ring of the gate wheel, 11 gates per ring.
    pub layer: u8,
    pub nodes: BTreeSet<NodeId>,
}

impl Gate {
    /// An empty gate shell for a valid id.
    pub(crate) fn shell(id: GateId, tier: GateTier) -> Self {
        let chapter = (tier == GateTier::Primary).then_some(ChapterNumber(id.0));
        let name = match tier {
            GateTier::Primary => format!("Gate {} (Chapter {})", id, id),
            GateTier::Harmonic => format!("Harmonic Gate {}", id),
            GateTier::Spiral => format!("Spiral Gate {}", id),
        };

        Self {
            id,
            tier,
            name,
            chapter,
            layer: id.0.div_ceil(11),
            nodes: BTreeSet::new(),
        }
    }

    /// Whether `node` is a member.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}
