//! Chapters - the 33 chapters of the living spine.

use serde::{Deserialize, Serialize};

use super::ChapterCatalog;
use crate::error::{TableError, TableResult};
use crate::nodes::NodeId;

/// Chapter number (1..=33).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterNumber(pub u8);

impl std::fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chapter and the codex nodes it links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: ChapterNumber,
    pub title: String,
    pub theme: String,
    #[serde(default)]
    pub codex_nodes: Vec<NodeId>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// In-memory chapter catalog, kept sorted by number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterBook {
    #[serde(rename = "chapter", default)]
    chapters: Vec<Chapter>,
}

impl ChapterBook {
    /// Parse from TOML (`[[chapter]]` entries).
    pub fn from_toml_str(source: &str) -> TableResult<Self> {
        let book: ChapterBook =
            toml::from_str(source).map_err(|e| TableError::parse("chapter", e))?;
        Ok(Self::from_chapters(book.chapters))
    }

    pub fn from_chapters(mut chapters: Vec<Chapter>) -> Self {
        chapters.sort_by_key(|c| c.number);
        Self { chapters }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

impl ChapterCatalog for ChapterBook {
    fn chapter(&self, number: ChapterNumber) -> Option<&Chapter> {
        self.chapters
            .binary_search_by_key(&number, |c| c.number)
            .ok()
            .map(|idx| &self.chapters[idx])
    }

    fn chapters_by_node(&self, node: NodeId) -> Vec<&Chapter> {
        self.chapters
            .iter()
            .filter(|c| c.codex_nodes.contains(&node))
            .collect()
    }

    fn all_chapters(&self) -> Vec<&Chapter> {
        self.chapters.iter().collect()
    }
}
