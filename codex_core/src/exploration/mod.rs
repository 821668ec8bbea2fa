//! Exploration - what a node connects to and what to do next.
//!
//! Everything here is a pure read over the catalog, the affinity table and
//! the cross-reference catalogs. History lives in [`ExplorationLog`], which
//! the caller owns.

mod log;
mod query;

pub use log::*;
pub use query::*;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use codex_tables::{Chakra, Element, NodeId};

use crate::affinity::AffinityClassifier;
use crate::catalog::{Catalog, Node};
use crate::config::ExplorationConfig;
use crate::crossref::CrossReferenceResolver;
use crate::error::Result;

/// Nodes connected to the explored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connections {
    pub harmonic: Vec<NodeId>,
    pub dissonant: Vec<NodeId>,
    pub related: Vec<NodeId>,
}

/// Where to go and what to do next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    /// Ranked: harmonic, then related, then the next id.
    pub explore: Vec<NodeId>,
    pub create: Vec<String>,
    pub learn: Vec<String>,
}

/// Result of exploring one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    pub node: Node,
    pub connections: Connections,
    pub suggestions: Suggestions,
}

/// Read-only queries for interactive use.
pub struct ExplorationEngine<'a> {
    catalog: &'a Catalog,
    affinity: &'a AffinityClassifier,
    crossref: &'a CrossReferenceResolver,
    config: &'a ExplorationConfig,
}

impl<'a> ExplorationEngine<'a> {
    pub fn new(
        catalog: &'a Catalog,
        affinity: &'a AffinityClassifier,
        crossref: &'a CrossReferenceResolver,
        config: &'a ExplorationConfig,
    ) -> Self {
        Self {
            catalog,
            affinity,
            crossref,
            config,
        }
    }

    /// Explore a node: its connections plus suggestions.
    pub fn explore(&self, id: NodeId) -> Result<Exploration> {
        let node = self.catalog.node(id)?;
        let affinities = self.affinity.harmonics_of(id)?;
        let related = self.related(node);

        let mut harmonic_by_distance = affinities.harmonic.clone();
        harmonic_by_distance.sort_by_key(|other| (other.0.abs_diff(id.0), other.0));

        let next = NodeId(id.0 + 1);
        let explore = distinct(
            harmonic_by_distance
                .iter()
                .take(self.config.per_source)
                .chain(related.iter().take(self.config.per_source))
                .copied()
                .chain(self.catalog.contains(next).then_some(next)),
            id,
            self.config.explore_cap,
        );

        Ok(Exploration {
            node: node.clone(),
            suggestions: Suggestions {
                explore,
                create: self.create_prompts(node),
                learn: self.learn_prompts(node),
            },
            connections: Connections {
                harmonic: affinities.harmonic,
                dissonant: affinities.dissonant,
                related,
            },
        })
    }

    /// Nodes satisfying every predicate of `query`, in id order.
    pub fn search_nodes(&self, query: &NodeQuery) -> Vec<&'a Node> {
        self.catalog
            .all_nodes()
            .iter()
            .filter(|n| query.matches(&n.record))
            .collect()
    }

    pub fn random_node(&self) -> Option<&'a Node> {
        self.random_node_with(&mut rand::thread_rng())
    }

    pub fn random_node_with<R: Rng>(&self, rng: &mut R) -> Option<&'a Node> {
        self.catalog.all_nodes().choose(rng)
    }

    pub fn nodes_by_element(&self, element: Element) -> Vec<&'a Node> {
        self.search_nodes(&NodeQuery::new().with_element(element))
    }

    pub fn nodes_by_chakra(&self, chakra: Chakra) -> Vec<&'a Node> {
        self.search_nodes(&NodeQuery::new().with_chakra(chakra))
    }

    pub fn nodes_by_geometry(&self, geometry: &str) -> Vec<&'a Node> {
        self.search_nodes(&NodeQuery {
            geometry: Some(geometry.to_string()),
            ..Default::default()
        })
    }

    /// Cross-reference neighbours first, then shared archetype and keywords.
    fn related(&self, node: &Node) -> Vec<NodeId> {
        let id = node.id();
        let per_source = self.config.per_source;
        let narrative = &node.narrative;

        let same_archetype = self
            .catalog
            .all_nodes()
            .iter()
            .filter(|other| {
                !narrative.archetype.is_empty() && other.narrative.archetype == narrative.archetype
            })
            .map(Node::id)
            .filter(|other| *other != id)
            .take(per_source);

        let shared_keyword = self
            .catalog
            .all_nodes()
            .iter()
            .filter(|other| {
                other
                    .narrative
                    .keywords
                    .iter()
                    .any(|k| narrative.keywords.contains(k))
            })
            .map(Node::id)
            .filter(|other| *other != id)
            .take(per_source);

        distinct(
            self.crossref
                .linked_nodes(id)
                .into_iter()
                .filter(|other| self.catalog.contains(*other))
                .chain(same_archetype)
                .chain(shared_keyword),
            id,
            self.config.related_cap,
        )
    }

    fn create_prompts(&self, node: &Node) -> Vec<String> {
        let mut prompts = vec![
            format!("Create art using {}", node.color),
            format!("Draw or build a {}", node.geometry),
        ];
        if let Some(beat) = &node.narrative.story_beat {
            prompts.push(format!("Write a story about: {}", beat));
        }
        if !node.narrative.keywords.is_empty() {
            prompts.push(format!(
                "Write using these words: {}",
                node.narrative.keywords.join(", ")
            ));
        }
        prompts.push(format!(
            "Listen to or create music at {} Hz",
            node.resonance
        ));

        prompts.truncate(self.config.prompt_cap);
        prompts
    }

    fn learn_prompts(&self, node: &Node) -> Vec<String> {
        let mut prompts = vec![
            format!("Learn about the element of {}", node.element),
            format!("Study {} in astrology", node.planet),
            format!("Explore {} zodiac sign", node.zodiac),
            format!("Learn about the {} chakra", node.chakra),
            format!("Study {} in sacred geometry", node.geometry),
            format!("Research Shem angel {}", node.light),
            format!("Learn about Goetia spirit {}", node.shadow),
        ];

        prompts.truncate(self.config.prompt_cap);
        prompts
    }
}

/// First-seen order, without `exclude` or repeats, truncated to `cap`.
fn distinct(ids: impl Iterator<Item = NodeId>, exclude: NodeId, cap: usize) -> Vec<NodeId> {
    let mut out = Vec::new();
    for id in ids {
        if out.len() == cap {
            break;
        }
        if id != exclude && id.is_valid() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
