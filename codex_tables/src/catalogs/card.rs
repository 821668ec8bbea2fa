//! Cards - the 78-card deck.

use serde::{Deserialize, Serialize};

use super::{CardCatalog, ChapterNumber};
use crate::error::{TableError, TableResult};
use crate::nodes::NodeId;

/// Card identifier, e.g. `major_21` or `cups_3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of a major arcana card.
    pub fn major(number: u8) -> Self {
        Self(format!("major_{}", number))
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Major or minor arcana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arcana {
    Major,
    Minor,
}

/// Minor arcana suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Wands,
    Cups,
    Swords,
    Pentacles,
}

/// A card and the codex nodes and chapters it links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub number: u8,
    pub name: String,
    pub arcana: Arcana,
    pub suit: Option<Suit>,
    pub element: String,
    #[serde(default)]
    pub codex_nodes: Vec<NodeId>,
    #[serde(default)]
    pub chapters: Vec<ChapterNumber>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// In-memory card catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    #[serde(rename = "card", default)]
    cards: Vec<Card>,
}

impl Deck {
    /// Parse a deck from TOML (`[[card]]` entries).
    pub fn from_toml_str(source: &str) -> TableResult<Self> {
        toml::from_str(source).map_err(|e| TableError::parse("card", e))
    }

    /// Build a deck from cards.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The major arcana, in deck order.
    pub fn major_arcana(&self) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| c.arcana == Arcana::Major)
            .collect()
    }

    /// Cards of one suit, in deck order.
    pub fn suit(&self, suit: Suit) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.suit == Some(suit)).collect()
    }
}

impl CardCatalog for Deck {
    fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    fn cards_by_node(&self, node: NodeId) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| c.codex_nodes.contains(&node))
            .collect()
    }

    fn cards_by_chapter(&self, chapter: ChapterNumber) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| c.chapters.contains(&chapter))
            .collect()
    }

    fn all_cards(&self) -> Vec<&Card> {
        self.cards.iter().collect()
    }
}
