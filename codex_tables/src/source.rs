//! Loading the complete set of source tables.

use std::path::Path;

use tracing::debug;

use crate::catalogs::{ChapterBook, Deck};
use crate::error::{TableError, TableResult};
use crate::nodes::NodeTable;
use crate::tree::TreeTables;

const NODES_TOML: &str = include_str!("../data/nodes.toml");
const TREE_TOML: &str = include_str!("../data/tree.toml");
const CARDS_TOML: &str = include_str!("../data/cards.toml");
const CHAPTERS_TOML: &str = include_str!("../data/chapters.toml");

/// File names used by [`StaticTables::from_dir`].
pub const TABLE_FILES: [&str; 4] = ["nodes.toml", "tree.toml", "cards.toml", "chapters.toml"];

/// Every table the engine reads, loaded once.
#[derive(Debug, Clone)]
pub struct StaticTables {
    pub nodes: NodeTable,
    pub tree: TreeTables,
    pub deck: Deck,
    pub chapters: ChapterBook,
}

impl StaticTables {
    /// The tables shipped with this crate.
    pub fn builtin() -> TableResult<Self> {
        Self::from_sources(NODES_TOML, TREE_TOML, CARDS_TOML, CHAPTERS_TOML)
    }

    /// Parse all four tables from TOML sources.
    pub fn from_sources(nodes: &str, tree: &str, cards: &str, chapters: &str) -> TableResult<Self> {
        let tables = Self {
            nodes: NodeTable::from_toml_str(nodes)?,
            tree: TreeTables::from_toml_str(tree)?,
            deck: Deck::from_toml_str(cards)?,
            chapters: ChapterBook::from_toml_str(chapters)?,
        };

        debug!(
            nodes = tables.nodes.len(),
            paths = tables.tree.paths.len(),
            cards = tables.deck.len(),
            chapters = tables.chapters.len(),
            "loaded static tables"
        );

        Ok(tables)
    }

    /// Read `nodes.toml`, `tree.toml`, `cards.toml` and `chapters.toml` from a directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> TableResult<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| TableError::Io { path, source })
        };

        let nodes = read(TABLE_FILES[0])?;
        let tree = read(TABLE_FILES[1])?;
        let cards = read(TABLE_FILES[2])?;
        let chapters = read(TABLE_FILES[3])?;

        Self::from_sources(&nodes, &tree, &cards, &chapters)
    }
}
