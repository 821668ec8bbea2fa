//! Card and chapter catalogs.
//!
//! Both catalogs are authored independently of the codex and only declare
//! which nodes they link to. The engine consumes them through the
//! [`CardCatalog`] and [`ChapterCatalog`] traits, so a host can plug in its
//! own storage; [`Deck`] and [`ChapterBook`] are the in-memory defaults.

mod card;
mod chapter;

pub use card::*;
pub use chapter::*;

use crate::nodes::NodeId;

/// Read access to a deck of cards.
pub trait CardCatalog {
    /// Look up a card by id.
    fn card(&self, id: &CardId) -> Option<&Card>;

    /// Cards declaring a link to `node`.
    fn cards_by_node(&self, node: NodeId) -> Vec<&Card>;

    /// Cards declaring a link to `chapter`.
    fn cards_by_chapter(&self, chapter: ChapterNumber) -> Vec<&Card>;

    /// Every card in catalog order.
    fn all_cards(&self) -> Vec<&Card>;
}

/// Read access to the book of chapters.
pub trait ChapterCatalog {
    /// Look up a chapter by number.
    fn chapter(&self, number: ChapterNumber) -> Option<&Chapter>;

    /// Chapters declaring a link to `node`.
    fn chapters_by_node(&self, node: NodeId) -> Vec<&Chapter>;

    /// Every chapter in order.
    fn all_chapters(&self) -> Vec<&Chapter>;

    /// The chapter after `number`, if any.
    fn next(&self, number: ChapterNumber) -> Option<&Chapter> {
        self.chapter(ChapterNumber(number.0.checked_add(1)?))
    }

    /// The chapter before `number`, if any.
    fn previous(&self, number: ChapterNumber) -> Option<&Chapter> {
        self.chapter(ChapterNumber(number.0.checked_sub(1)?))
    }
}
