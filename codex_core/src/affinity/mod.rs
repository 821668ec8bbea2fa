//! Affinity classification between nodes.
//!
//! Rules propose unordered pairs. Exclusive kinds are resolved by precedence
//! (harmonic, then dissonant, then tritone) and every surviving pair is
//! written for both endpoints. Adjacency is computed on its own.

mod kind;

pub use kind::*;

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use codex_tables::{NodeId, NODES_PER_LAYER, NODE_COUNT};

use crate::catalog::{Catalog, Node};
use crate::config::AffinityConfig;
use crate::error::{CodexError, EntityKind, Result};

type Pair = (NodeId, NodeId);

fn pair(a: NodeId, b: NodeId) -> Pair {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Symmetric affinity table for the whole catalog.
#[derive(Debug, Clone, Default)]
pub struct AffinityClassifier {
    by_node: BTreeMap<NodeId, Affinities>,
}

impl AffinityClassifier {
    /// Classify every pair of catalogued nodes.
    pub fn new(catalog: &Catalog, config: &AffinityConfig) -> Self {
        let nodes = catalog.all_nodes();

        let mut harmonic = BTreeSet::new();
        let mut dissonant = BTreeSet::new();
        let mut tritone = BTreeSet::new();

        for node in nodes {
            let id = node.id();

            let same_element = nearest(nodes, node, config.same_element_cap, |other| {
                other.element == node.element
            });
            let chakra = nearest(nodes, node, config.chakra_cap, |other| {
                node.chakra.is_adjacent_or_same(other.chakra)
            });
            for other in same_element
                .into_iter()
                .chain(chakra)
                .chain(declared(catalog, id, &node.harmonics.perfect_consonance))
            {
                harmonic.insert(pair(id, other));
            }

            if let Some(opposite) = node.element.opposite() {
                for other in nearest(nodes, node, config.opposite_element_cap, |other| {
                    other.element == opposite
                }) {
                    dissonant.insert(pair(id, other));
                }
            }
            for other in declared(catalog, id, &node.harmonics.dissonance) {
                dissonant.insert(pair(id, other));
            }

            for other in declared(catalog, id, &node.harmonics.tritone) {
                tritone.insert(pair(id, other));
            }
        }

        let dissonant: BTreeSet<Pair> = dissonant.difference(&harmonic).copied().collect();
        let tritone: BTreeSet<Pair> = tritone
            .into_iter()
            .filter(|p| !harmonic.contains(p) && !dissonant.contains(p))
            .collect();

        let mut classifier = Self::default();
        for (kind, pairs) in [
            (AffinityKind::Harmonic, &harmonic),
            (AffinityKind::Dissonant, &dissonant),
            (AffinityKind::Tritone, &tritone),
        ] {
            for (a, b) in pairs {
                classifier.insert_pair(*a, *b, kind);
            }
        }

        for node in nodes {
            for other in spiral_neighbours(node.id()) {
                classifier.insert_pair(node.id(), other, AffinityKind::Adjacent);
            }
        }

        debug!(
            harmonic = harmonic.len(),
            dissonant = dissonant.len(),
            tritone = tritone.len(),
            "classified node affinities"
        );

        classifier
    }

    /// Build a table from directed relations exactly as given.
    ///
    /// No symmetry or exclusivity is enforced; validation reports what is wrong.
    pub fn from_relations(relations: impl IntoIterator<Item = AffinityRelation>) -> Self {
        let mut classifier = Self::default();
        for relation in relations {
            classifier.insert(relation);
        }
        classifier
    }

    /// Affinities of one node.
    pub fn harmonics_of(&self, node: NodeId) -> Result<Affinities> {
        if !node.is_valid() {
            return Err(CodexError::not_found(EntityKind::Node, node));
        }
        Ok(self.by_node.get(&node).cloned().unwrap_or_default())
    }

    /// Every directed relation, ordered by source then kind then target.
    pub fn relations(&self) -> impl Iterator<Item = AffinityRelation> + '_ {
        self.by_node.iter().flat_map(|(from, affinities)| {
            AffinityKind::ALL.into_iter().flat_map(move |kind| {
                affinities
                    .get(kind)
                    .iter()
                    .map(move |to| AffinityRelation::new(*from, *to, kind))
            })
        })
    }

    /// Whether the directed relation is recorded.
    pub fn contains(&self, relation: &AffinityRelation) -> bool {
        self.by_node
            .get(&relation.from)
            .is_some_and(|a| a.contains(relation.kind, relation.to))
    }

    /// Record one directed relation. Returns false if it was already present.
    pub fn insert(&mut self, relation: AffinityRelation) -> bool {
        self.by_node
            .entry(relation.from)
            .or_default()
            .insert(relation.kind, relation.to)
    }

    fn insert_pair(&mut self, a: NodeId, b: NodeId, kind: AffinityKind) {
        self.insert(AffinityRelation::new(a, b, kind));
        self.insert(AffinityRelation::new(b, a, kind));
    }
}

/// The `cap` other nodes matching `rule`, closest id first.
fn nearest(nodes: &[Node], node: &Node, cap: usize, rule: impl Fn(&Node) -> bool) -> Vec<NodeId> {
    let id = node.id();
    let mut candidates: Vec<NodeId> = nodes
        .iter()
        .filter(|other| other.id() != id && rule(*other))
        .map(Node::id)
        .collect();
    candidates.sort_by_key(|other| (other.0.abs_diff(id.0), other.0));
    candidates.truncate(cap);
    candidates
}

/// Declared ids that name another catalogued node.
fn declared<'a>(
    catalog: &'a Catalog,
    id: NodeId,
    list: &'a [NodeId],
) -> impl Iterator<Item = NodeId> + 'a {
    list.iter()
        .copied()
        .filter(move |other| *other != id && catalog.contains(*other))
}

/// Previous and next id plus the same position one layer down and up.
fn spiral_neighbours(id: NodeId) -> Vec<NodeId> {
    let n = i32::from(id.0);
    let layer = i32::from(NODES_PER_LAYER);
    [n - 1, n + 1, n - layer, n + layer]
        .into_iter()
        .filter(|m| (1..=i32::from(NODE_COUNT)).contains(m))
        .map(|m| NodeId(m as u16))
        .collect()
}
