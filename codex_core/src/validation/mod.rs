//! Validation of the derived tables against their invariants.
//!
//! Validation only reports. Repair goes through [`FixReport::apply`], which
//! regenerates missing entries from the same formulas and nothing else.

mod fix;
mod report;

pub use fix::*;
pub use report::*;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

use codex_tables::{NodeId, TreeKind, TreeTables, VertexId, PATH_COUNT, VERTEX_COUNT};

use crate::affinity::{AffinityClassifier, AffinityKind};
use crate::catalog::Catalog;
use crate::config::AffinityConfig;
use crate::crossref::CrossReferenceResolver;
use crate::membership::{formula_gates, MembershipResolver};

/// Checks every cross-table invariant of a built codex.
pub struct ValidationEngine<'a> {
    catalog: &'a Catalog,
    membership: &'a MembershipResolver,
    affinity: &'a AffinityClassifier,
    tree: &'a TreeTables,
    crossref: &'a CrossReferenceResolver,
    affinity_config: &'a AffinityConfig,
}

impl<'a> ValidationEngine<'a> {
    pub fn new(
        catalog: &'a Catalog,
        membership: &'a MembershipResolver,
        affinity: &'a AffinityClassifier,
        tree: &'a TreeTables,
        crossref: &'a CrossReferenceResolver,
        affinity_config: &'a AffinityConfig,
    ) -> Self {
        Self {
            catalog,
            membership,
            affinity,
            tree,
            crossref,
            affinity_config,
        }
    }

    /// Run every check.
    pub fn validate(&self) -> ValidationReport {
        self.run().0
    }

    /// Run every check and propose fixes for what can be regenerated.
    pub fn fix_report(&self) -> FixReport {
        let (report, proposals) = self.run();
        FixReport {
            report,
            proposals: proposals.into_iter().collect(),
        }
    }

    fn run(&self) -> (ValidationReport, BTreeSet<FixProposal>) {
        let mut report = ValidationReport::new();
        let mut proposals = BTreeSet::new();

        self.check_nodes(&mut report, &mut proposals);
        self.check_inverse(&mut report, &mut proposals);
        self.check_catalog_gates(&mut report);
        self.check_paths(&mut report);
        self.check_tree_correspondence(&mut report);
        self.check_affinities(&mut report, &mut proposals);
        self.check_cross_references(&mut report);

        for issue in &report.errors {
            warn!(check = ?issue.check, "{}", issue.message);
        }
        debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            proposals = proposals.len(),
            "validated codex"
        );

        (report, proposals)
    }

    /// Forward entries against the formula, plus declared harmonics.
    fn check_nodes(&self, report: &mut ValidationReport, proposals: &mut BTreeSet<FixProposal>) {
        let index = self.membership.node_index();

        for node in self.catalog.all_nodes() {
            let id = node.id();
            let expected = formula_gates(&node.record);
            let actual = index.get(&id).cloned().unwrap_or_default();

            if actual.is_empty() {
                report.error(Check::NodeGates, format!("node {} has no gates", id));
            }
            if actual != expected {
                report.error(
                    Check::MembershipFormula,
                    format!(
                        "node {} has gates {}, formula gives {}",
                        id,
                        list(&actual),
                        list(&expected)
                    ),
                );
                for gate in expected.difference(&actual) {
                    proposals.insert(FixProposal::AddNodeGate { node: id, gate: *gate });
                }
            }

            if node.harmonics.is_empty() {
                report.warn(
                    Check::DeclaredHarmonics,
                    format!("node {} declares no harmonics", id),
                );
            }
            let declared = &node.harmonics;
            for other in declared
                .perfect_consonance
                .iter()
                .chain(&declared.consonance)
                .chain(&declared.dissonance)
                .chain(&declared.tritone)
                .filter(|other| !other.is_valid())
            {
                report.warn(
                    Check::DeclaredHarmonics,
                    format!("node {} declares out-of-range harmonic {}", id, other),
                );
            }
        }

        for (node, gates) in index {
            for gate in gates.iter().filter(|g| !g.is_valid()) {
                report.error(
                    Check::GateRange,
                    format!("node {} is indexed under gate {}", node, gate),
                );
            }
        }
    }

    /// Forward and inverse index must describe the same pairs.
    fn check_inverse(&self, report: &mut ValidationReport, proposals: &mut BTreeSet<FixProposal>) {
        let forward = self.membership.node_index();
        let inverse = self.membership.gate_index();

        for (node, gates) in forward {
            for gate in gates {
                let listed = inverse.get(gate).is_some_and(|nodes| nodes.contains(node));
                if listed {
                    continue;
                }
                report.error(
                    Check::MembershipInverse,
                    format!("gate {} does not list member node {}", gate, node),
                );
                let derivable = self
                    .catalog
                    .node(*node)
                    .is_ok_and(|n| formula_gates(&n.record).contains(gate));
                if derivable {
                    proposals.insert(FixProposal::AddGateMember {
                        gate: *gate,
                        node: *node,
                    });
                }
            }
        }

        for (gate, nodes) in inverse {
            if !gate.is_valid() {
                report.error(
                    Check::GateRange,
                    format!("inverse index holds gate {}", gate),
                );
            }
            for node in nodes {
                let listed = forward.get(node).is_some_and(|gates| gates.contains(gate));
                if !listed {
                    report.error(
                        Check::MembershipInverse,
                        format!("node {} does not list gate {} that lists it", node, gate),
                    );
                }
            }
        }
    }

    fn check_catalog_gates(&self, report: &mut ValidationReport) {
        let inverse = self.membership.gate_index();

        for gate in self.catalog.all_gates() {
            let indexed = inverse.get(&gate.id).cloned().unwrap_or_default();
            if indexed != gate.nodes {
                report.error(
                    Check::CatalogGates,
                    format!(
                        "gate {} holds {} in the catalog but {} in the index",
                        gate.id,
                        list(&gate.nodes),
                        list(&indexed)
                    ),
                );
            }
            if gate.nodes.is_empty() {
                report.warn(Check::EmptyGate, format!("gate {} has no members", gate.id));
            }
        }
    }

    /// Arcana must map one-to-one onto 0..=21 and paths must join life vertices.
    fn check_paths(&self, report: &mut ValidationReport) {
        let paths = &self.tree.paths;
        if paths.len() != PATH_COUNT {
            report.error(
                Check::ArcanaBijection,
                format!("{} paths, expected {}", paths.len(), PATH_COUNT),
            );
        }

        let mut seen = HashSet::new();
        for path in paths {
            if usize::from(path.arcana) >= PATH_COUNT {
                report.error(
                    Check::ArcanaBijection,
                    format!("path {} carries arcana {} outside 0..=21", path.id, path.arcana),
                );
            } else if !seen.insert(path.arcana) {
                report.error(
                    Check::ArcanaBijection,
                    format!("arcana {} is carried by more than one path", path.arcana),
                );
            }

            for end in [path.from, path.to] {
                if self.tree.vertex(TreeKind::Life, end).is_none() {
                    report.error(
                        Check::PathEndpoints,
                        format!("path {} ends at unknown life vertex {}", path.id, end),
                    );
                }
            }
        }

        for arcana in 0..PATH_COUNT as u8 {
            if !seen.contains(&arcana) {
                report.error(
                    Check::ArcanaBijection,
                    format!("arcana {} has no path", arcana),
                );
            }
        }
    }

    /// Both trees must hold vertices 1..=11 exactly once.
    fn check_tree_correspondence(&self, report: &mut ValidationReport) {
        let expected: BTreeSet<VertexId> = (1..=VERTEX_COUNT).map(VertexId).collect();

        for tree in [TreeKind::Life, TreeKind::Death] {
            let vertices = self.tree.vertices(tree);
            let ids: BTreeSet<VertexId> = vertices.iter().map(|v| v.id).collect();

            if ids.len() != vertices.len() {
                report.error(
                    Check::TreeCorrespondence,
                    format!("{} tree repeats a vertex id", tree),
                );
            }
            for missing in expected.difference(&ids) {
                report.error(
                    Check::TreeCorrespondence,
                    format!("{} tree has no vertex {}", tree, missing),
                );
            }
            for extra in ids.difference(&expected) {
                report.error(
                    Check::TreeCorrespondence,
                    format!("{} tree has stray vertex {}", tree, extra),
                );
            }
        }
    }

    /// Symmetry per direction, exclusivity per unordered pair.
    ///
    /// A missing reverse is only proposed when the classifier rules would
    /// produce it and the pair carries no conflicting kinds.
    fn check_affinities(
        &self,
        report: &mut ValidationReport,
        proposals: &mut BTreeSet<FixProposal>,
    ) {
        let mut exclusive: BTreeMap<(NodeId, NodeId), BTreeSet<AffinityKind>> = BTreeMap::new();
        for relation in self.affinity.relations().filter(|r| r.kind.is_exclusive()) {
            exclusive
                .entry(unordered(relation.from, relation.to))
                .or_default()
                .insert(relation.kind);
        }
        let conflicting: BTreeSet<(NodeId, NodeId)> = exclusive
            .into_iter()
            .filter(|(_, kinds)| kinds.len() > 1)
            .map(|(pair, _)| pair)
            .collect();

        let expected = AffinityClassifier::new(self.catalog, self.affinity_config);

        for relation in self.affinity.relations() {
            let reverse = relation.reversed();
            if self.affinity.contains(&reverse) {
                continue;
            }
            report.error(
                Check::AffinitySymmetry,
                format!(
                    "{} {} -> {} has no reverse",
                    relation.kind, relation.from, relation.to
                ),
            );
            let pair = unordered(relation.from, relation.to);
            if !conflicting.contains(&pair) && expected.contains(&reverse) {
                proposals.insert(FixProposal::AddAffinity {
                    from: reverse.from,
                    to: reverse.to,
                    kind: reverse.kind,
                });
            }
        }

        for (a, b) in conflicting {
            report.error(
                Check::AffinityExclusive,
                format!("nodes {} and {} carry more than one exclusive kind", a, b),
            );
        }
    }

    /// Catalog links must name real nodes.
    fn check_cross_references(&self, report: &mut ValidationReport) {
        for card in self.crossref.card_catalog().all_cards() {
            for node in card.codex_nodes.iter().filter(|n| !n.is_valid()) {
                report.warn(
                    Check::CrossReference,
                    format!("card {} links unknown node {}", card.id, node),
                );
            }
        }
        for chapter in self.crossref.chapter_catalog().all_chapters() {
            for node in chapter.codex_nodes.iter().filter(|n| !n.is_valid()) {
                report.warn(
                    Check::CrossReference,
                    format!("chapter {} links unknown node {}", chapter.number, node),
                );
            }
        }
    }
}

fn unordered(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    (a.min(b), a.max(b))
}

fn list<T: std::fmt::Display>(set: &BTreeSet<T>) -> String {
    let items: Vec<String> = set.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
