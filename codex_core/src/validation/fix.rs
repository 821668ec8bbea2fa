//! Fix proposals: derivable entries that validation found missing.

use serde::{Deserialize, Serialize};
use tracing::info;

use codex_tables::NodeId;

use super::ValidationReport;
use crate::affinity::{AffinityClassifier, AffinityKind, AffinityRelation};
use crate::catalog::GateId;
use crate::membership::MembershipResolver;

/// One entry to regenerate. Authored attributes are never proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "fix", rename_all = "snake_case")]
pub enum FixProposal {
    /// A formula gate missing from the node's forward entry.
    AddNodeGate { node: NodeId, gate: GateId },
    /// A forward membership missing from the gate's inverse entry.
    AddGateMember { gate: GateId, node: NodeId },
    /// The missing reverse of a recorded affinity.
    AddAffinity {
        from: NodeId,
        to: NodeId,
        kind: AffinityKind,
    },
}

/// A validation report plus the proposals that would repair it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixReport {
    pub report: ValidationReport,
    pub proposals: Vec<FixProposal>,
}

impl FixReport {
    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Apply every proposal. Returns how many changed something.
    pub fn apply(
        &self,
        membership: &mut MembershipResolver,
        affinity: &mut AffinityClassifier,
    ) -> usize {
        let applied = self
            .proposals
            .iter()
            .filter(|proposal| match **proposal {
                FixProposal::AddNodeGate { node, gate }
                | FixProposal::AddGateMember { gate, node } => membership.insert(node, gate),
                FixProposal::AddAffinity { from, to, kind } => {
                    affinity.insert(AffinityRelation::new(from, to, kind))
                }
            })
            .count();

        info!(
            proposed = self.proposals.len(),
            applied, "applied validation fixes"
        );
        applied
    }
}
