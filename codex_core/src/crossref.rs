//! Cross-references between nodes and the card and chapter catalogs.

use std::collections::BTreeSet;

use codex_tables::{CardCatalog, CardId, ChapterBook, ChapterCatalog, ChapterNumber, Deck, NodeId};

use crate::error::{CodexError, EntityKind, Result};

/// Resolves links declared by external catalogs.
///
/// Nothing is cached: every call asks the catalogs again. A node without
/// links yields an empty list, never an error.
pub struct CrossReferenceResolver {
    cards: Box<dyn CardCatalog + Send + Sync>,
    chapters: Box<dyn ChapterCatalog + Send + Sync>,
}

impl CrossReferenceResolver {
    pub fn new(
        cards: impl CardCatalog + Send + Sync + 'static,
        chapters: impl ChapterCatalog + Send + Sync + 'static,
    ) -> Self {
        Self {
            cards: Box::new(cards),
            chapters: Box::new(chapters),
        }
    }

    /// Ids of cards linking to `node`, sorted.
    pub fn cards_for_node(&self, node: NodeId) -> Vec<CardId> {
        let ids: BTreeSet<CardId> = self
            .cards
            .cards_by_node(node)
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        ids.into_iter().collect()
    }

    /// Numbers of chapters linking to `node`, sorted.
    pub fn chapters_for_node(&self, node: NodeId) -> Vec<ChapterNumber> {
        let numbers: BTreeSet<ChapterNumber> = self
            .chapters
            .chapters_by_node(node)
            .into_iter()
            .map(|c| c.number)
            .collect();
        numbers.into_iter().collect()
    }

    /// Nodes a card links to.
    pub fn nodes_for_card(&self, card: &CardId) -> Result<Vec<NodeId>> {
        let card = self
            .cards
            .card(card)
            .ok_or_else(|| CodexError::not_found(EntityKind::Card, card))?;
        Ok(sorted(card.codex_nodes.iter().copied()))
    }

    /// Nodes a chapter links to.
    pub fn nodes_for_chapter(&self, chapter: ChapterNumber) -> Result<Vec<NodeId>> {
        let chapter = self
            .chapters
            .chapter(chapter)
            .ok_or_else(|| CodexError::not_found(EntityKind::Chapter, chapter))?;
        Ok(sorted(chapter.codex_nodes.iter().copied()))
    }

    /// Cards that name a chapter.
    pub fn cards_for_chapter(&self, chapter: ChapterNumber) -> Result<Vec<CardId>> {
        if self.chapters.chapter(chapter).is_none() {
            return Err(CodexError::not_found(EntityKind::Chapter, chapter));
        }
        let ids: BTreeSet<CardId> = self
            .cards
            .cards_by_chapter(chapter)
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        Ok(ids.into_iter().collect())
    }

    /// Other nodes reachable through any card or chapter that links `node`.
    pub fn linked_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let via_cards = self
            .cards
            .cards_by_node(node)
            .into_iter()
            .flat_map(|c| c.codex_nodes.iter().copied());
        let via_chapters = self
            .chapters
            .chapters_by_node(node)
            .into_iter()
            .flat_map(|c| c.codex_nodes.iter().copied());

        sorted(via_cards.chain(via_chapters).filter(|n| *n != node))
    }

    pub fn card_catalog(&self) -> &dyn CardCatalog {
        self.cards.as_ref()
    }

    pub fn chapter_catalog(&self) -> &dyn ChapterCatalog {
        self.chapters.as_ref()
    }
}

impl Default for CrossReferenceResolver {
    /// Empty catalogs.
    fn default() -> Self {
        Self::new(Deck::default(), ChapterBook::default())
    }
}

impl std::fmt::Debug for CrossReferenceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossReferenceResolver")
            .field("cards", &self.cards.all_cards().len())
            .field("chapters", &self.chapters.all_chapters().len())
            .finish()
    }
}

fn sorted(nodes: impl Iterator<Item = NodeId>) -> Vec<NodeId> {
    nodes.collect::<BTreeSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_tables::{Arcana, Card, Chapter, StaticTables};

    fn card(id: &str, nodes: &[u16], chapters: &[u8]) -> Card {
        Card {
            id: CardId::new(id),
            number: 0,
            name: id.to_string(),
            arcana: Arcana::Major,
            suit: None,
            element: String::from("Air"),
            codex_nodes: nodes.iter().copied().map(NodeId).collect(),
            chapters: chapters.iter().copied().map(ChapterNumber).collect(),
            keywords: vec![],
        }
    }

    fn chapter(number: u8, nodes: &[u16]) -> Chapter {
        Chapter {
            number: ChapterNumber(number),
            title: format!("Chapter {}", number),
            theme: String::from("Theme"),
            codex_nodes: nodes.iter().copied().map(NodeId).collect(),
            keywords: vec![],
        }
    }

    fn resolver() -> CrossReferenceResolver {
        CrossReferenceResolver::new(
            Deck::from_cards(vec![
                card("major_0", &[1, 144, 1], &[1]),
                card("cups_2", &[1, 40], &[2]),
                card("lonely", &[], &[]),
            ]),
            ChapterBook::from_chapters(vec![chapter(1, &[1, 34]), chapter(2, &[])]),
        )
    }

    #[test]
    fn test_cards_and_chapters_for_node() {
        let xref = resolver();

        assert_eq!(
            xref.cards_for_node(NodeId(1)),
            vec![CardId::new("cups_2"), CardId::new("major_0")]
        );
        assert_eq!(xref.chapters_for_node(NodeId(34)), vec![ChapterNumber(1)]);
        assert!(xref.cards_for_node(NodeId(77)).is_empty());
        assert!(xref.chapters_for_node(NodeId(77)).is_empty());
    }

    #[test]
    fn test_nodes_for_card_dedupes() {
        let xref = resolver();

        assert_eq!(
            xref.nodes_for_card(&CardId::new("major_0")).unwrap(),
            vec![NodeId(1), NodeId(144)]
        );
        assert!(xref.nodes_for_card(&CardId::new("lonely")).unwrap().is_empty());
        assert!(xref
            .nodes_for_card(&CardId::new("missing"))
            .unwrap_err()
            .is_not_found(EntityKind::Card));
    }

    #[test]
    fn test_nodes_for_chapter() {
        let xref = resolver();

        assert_eq!(
            xref.nodes_for_chapter(ChapterNumber(1)).unwrap(),
            vec![NodeId(1), NodeId(34)]
        );
        assert!(xref.nodes_for_chapter(ChapterNumber(2)).unwrap().is_empty());
        assert!(xref
            .nodes_for_chapter(ChapterNumber(40))
            .unwrap_err()
            .is_not_found(EntityKind::Chapter));
    }

    #[test]
    fn test_cards_for_chapter() {
        let xref = resolver();

        assert_eq!(
            xref.cards_for_chapter(ChapterNumber(2)).unwrap(),
            vec![CardId::new("cups_2")]
        );
        assert!(xref.cards_for_chapter(ChapterNumber(9)).is_err());
    }

    #[test]
    fn test_linked_nodes() {
        let xref = resolver();

        assert_eq!(
            xref.linked_nodes(NodeId(1)),
            vec![NodeId(34), NodeId(40), NodeId(144)]
        );
    }

    #[test]
    fn test_builtin_links() {
        let tables = StaticTables::builtin().unwrap();
        let xref = CrossReferenceResolver::new(tables.deck, tables.chapters);

        assert_eq!(xref.cards_for_node(NodeId(1)), vec![CardId::major(0)]);
        assert_eq!(xref.chapters_for_node(NodeId(1)), vec![ChapterNumber(1)]);
        assert_eq!(
            xref.nodes_for_chapter(ChapterNumber(1)).unwrap(),
            vec![NodeId(1), NodeId(34), NodeId(67), NodeId(100)]
        );
    }
}
