//! The codex context object.

use tracing::info;

use codex_tables::{CardId, ChapterNumber, NodeId, StaticTables, TreeTables};

use crate::affinity::{Affinities, AffinityClassifier};
use crate::catalog::{Catalog, Gate, GateId, Node};
use crate::config::CodexConfig;
use crate::crossref::CrossReferenceResolver;
use crate::error::Result;
use crate::exploration::{Exploration, ExplorationEngine, NodeQuery};
use crate::membership::MembershipResolver;
use crate::pathworking::DualTreePathworker;
use crate::validation::{FixReport, ValidationEngine, ValidationReport};

/// Everything derived from one set of tables, built once.
///
/// Callers own the codex and pass it around; there is no global instance.
/// All derived tables are read-only after construction, so a codex can be
/// shared behind an `Arc`.
#[derive(Debug)]
pub struct Codex {
    config: CodexConfig,
    catalog: Catalog,
    membership: MembershipResolver,
    affinity: AffinityClassifier,
    crossref: CrossReferenceResolver,
    tree: TreeTables,
}

impl Codex {
    /// Build from the embedded tables with default configuration.
    pub fn builtin() -> Result<Self> {
        Self::from_tables(StaticTables::builtin()?, CodexConfig::default())
    }

    pub fn from_tables(tables: StaticTables, config: CodexConfig) -> Result<Self> {
        let catalog = Catalog::build(&tables.nodes)?;
        let membership = MembershipResolver::new(&catalog);
        let affinity = AffinityClassifier::new(&catalog, &config.affinity);
        let crossref = CrossReferenceResolver::new(tables.deck, tables.chapters);

        info!(
            nodes = catalog.all_nodes().len(),
            gates = catalog.all_gates().len(),
            paths = tables.tree.paths.len(),
            "codex ready"
        );

        Ok(Self {
            config,
            catalog,
            membership,
            affinity,
            crossref,
            tree: tables.tree,
        })
    }

    pub fn config(&self) -> &CodexConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn membership(&self) -> &MembershipResolver {
        &self.membership
    }

    pub fn affinity(&self) -> &AffinityClassifier {
        &self.affinity
    }

    pub fn crossref(&self) -> &CrossReferenceResolver {
        &self.crossref
    }

    pub fn tree(&self) -> &TreeTables {
        &self.tree
    }

    pub fn explorer(&self) -> ExplorationEngine<'_> {
        ExplorationEngine::new(
            &self.catalog,
            &self.affinity,
            &self.crossref,
            &self.config.exploration,
        )
    }

    pub fn validator(&self) -> ValidationEngine<'_> {
        ValidationEngine::new(
            &self.catalog,
            &self.membership,
            &self.affinity,
            &self.tree,
            &self.crossref,
            &self.config.affinity,
        )
    }

    /// A fresh pathworker over this codex's trees. Sessions belong to it.
    pub fn pathworker(&self) -> DualTreePathworker {
        DualTreePathworker::new(self.tree.clone())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.catalog.node(id)
    }

    pub fn gate(&self, id: GateId) -> Result<&Gate> {
        self.catalog.gate(id)
    }

    pub fn gates_for_node(&self, id: NodeId) -> Result<Vec<GateId>> {
        self.catalog.node(id)?;
        self.membership.gates_for_node(id)
    }

    pub fn nodes_for_gate(&self, id: GateId) -> Result<Vec<NodeId>> {
        self.membership.nodes_for_gate(id)
    }

    pub fn harmonics_of(&self, id: NodeId) -> Result<Affinities> {
        self.catalog.node(id)?;
        self.affinity.harmonics_of(id)
    }

    pub fn cards_for_node(&self, id: NodeId) -> Vec<CardId> {
        self.crossref.cards_for_node(id)
    }

    pub fn chapters_for_node(&self, id: NodeId) -> Vec<ChapterNumber> {
        self.crossref.chapters_for_node(id)
    }

    pub fn explore(&self, id: NodeId) -> Result<Exploration> {
        self.explorer().explore(id)
    }

    pub fn search_nodes(&self, query: &NodeQuery) -> Vec<&Node> {
        self.explorer().search_nodes(query)
    }

    pub fn random_node(&self) -> Option<&Node> {
        self.explorer().random_node()
    }

    pub fn validate(&self) -> ValidationReport {
        self.validator().validate()
    }

    pub fn fix_report(&self) -> FixReport {
        self.validator().fix_report()
    }
}
