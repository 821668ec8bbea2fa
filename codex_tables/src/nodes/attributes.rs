//! Fixed attribute vocabularies shared by every node.

use serde::{Deserialize, Serialize};

/// The six elements a node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Air,
    Earth,
    Spirit,
    Shadow,
}

impl Element {
    /// All elements in declaration order.
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Water,
        Element::Air,
        Element::Earth,
        Element::Spirit,
        Element::Shadow,
    ];

    /// The element in tension with this one, if any.
    ///
    /// Only the four classical elements pair up (Fire/Water, Air/Earth).
    pub fn opposite(&self) -> Option<Element> {
        match self {
            Element::Fire => Some(Element::Water),
            Element::Water => Some(Element::Fire),
            Element::Air => Some(Element::Earth),
            Element::Earth => Some(Element::Air),
            Element::Spirit | Element::Shadow => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Air => "Air",
            Element::Earth => "Earth",
            Element::Spirit => "Spirit",
            Element::Shadow => "Shadow",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chakras, ordered root to crown along a linear chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Chakra {
    Root,
    Sacral,
    SolarPlexus,
    Heart,
    Throat,
    ThirdEye,
    Crown,
}

impl Chakra {
    /// All chakras in chain order.
    pub const ALL: [Chakra; 7] = [
        Chakra::Root,
        Chakra::Sacral,
        Chakra::SolarPlexus,
        Chakra::Heart,
        Chakra::Throat,
        Chakra::ThirdEye,
        Chakra::Crown,
    ];

    /// Position on the chain, 0 (Root) to 6 (Crown).
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Same chakra or a direct neighbour on the chain.
    pub fn is_adjacent_or_same(&self, other: Chakra) -> bool {
        self.ordinal().abs_diff(other.ordinal()) <= 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Chakra::Root => "Root",
            Chakra::Sacral => "Sacral",
            Chakra::SolarPlexus => "Solar Plexus",
            Chakra::Heart => "Heart",
            Chakra::Throat => "Throat",
            Chakra::ThirdEye => "Third Eye",
            Chakra::Crown => "Crown",
        }
    }
}

impl std::fmt::Display for Chakra {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_opposites_are_mutual() {
        for element in Element::ALL {
            if let Some(opposite) = element.opposite() {
                assert_eq!(opposite.opposite(), Some(element));
                assert_ne!(opposite, element);
            }
        }
        assert_eq!(Element::Spirit.opposite(), None);
        assert_eq!(Element::Shadow.opposite(), None);
    }

    #[test]
    fn test_chakra_chain_adjacency() {
        assert!(Chakra::Root.is_adjacent_or_same(Chakra::Root));
        assert!(Chakra::Root.is_adjacent_or_same(Chakra::Sacral));
        assert!(Chakra::Heart.is_adjacent_or_same(Chakra::SolarPlexus));
        assert!(Chakra::Heart.is_adjacent_or_same(Chakra::Throat));
        assert!(!Chakra::Root.is_adjacent_or_same(Chakra::SolarPlexus));
        // The chain is linear, not a ring.
        assert!(!Chakra::Root.is_adjacent_or_same(Chakra::Crown));
    }

    #[test]
    fn test_chakra_display() {
        assert_eq!(Chakra::SolarPlexus.to_string(), "Solar Plexus");
        assert_eq!(Chakra::ThirdEye.to_string(), "Third Eye");
    }
}
