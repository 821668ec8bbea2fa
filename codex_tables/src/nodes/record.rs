//! Node records - authored attributes for one node of the spiral.

use serde::{Deserialize, Serialize};

use super::{Chakra, Element, NodeId};

/// A node as authored in the source table.
///
/// Records are created once when the tables are loaded and are never
/// mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub name: String,
    pub element: Element,
    pub chakra: Chakra,
    pub planet: String,
    pub zodiac: String,

    /// Solfeggio resonance in Hz.
    pub resonance: u32,

    /// Hex color, e.g. `#FF4500`.
    pub color: String,

    /// Sacred-geometry form label.
    pub geometry: String,

    /// Shem angel number (1..=72).
    pub light: u8,

    /// Goetia demon number (1..=72).
    pub shadow: u8,

    /// I Ching hexagram (1..=64).
    pub iching: u8,

    /// Book of Soyga table letter.
    pub soyga: char,

    #[serde(default)]
    pub narrative: Narrative,

    #[serde(default)]
    pub harmonics: DeclaredHarmonics,
}

impl NodeRecord {
    /// Create a record with neutral defaults for everything but the core attributes.
    pub fn new(id: u16, name: impl Into<String>, element: Element, chakra: Chakra) -> Self {
        let idx = id.saturating_sub(1);
        Self {
            id: NodeId(id),
            name: name.into(),
            element,
            chakra,
            planet: String::from("Sun"),
            zodiac: String::from("Leo"),
            resonance: 528,
            color: String::from("#FFD700"),
            geometry: String::from("Dodecahedron"),
            light: (idx % 72) as u8 + 1,
            shadow: (idx % 72) as u8 + 1,
            iching: (idx % 64) as u8 + 1,
            soyga: 'A',
            narrative: Narrative::default(),
            harmonics: DeclaredHarmonics::default(),
        }
    }

    /// Set the narrative block.
    pub fn with_narrative(mut self, narrative: Narrative) -> Self {
        self.narrative = narrative;
        self
    }

    /// Set the declared harmonic lists.
    pub fn with_harmonics(mut self, harmonics: DeclaredHarmonics) -> Self {
        self.harmonics = harmonics;
        self
    }

    /// Set planet and zodiac.
    pub fn with_sky(mut self, planet: impl Into<String>, zodiac: impl Into<String>) -> Self {
        self.planet = planet.into();
        self.zodiac = zodiac.into();
        self
    }

    /// Set the resonance frequency.
    pub fn with_resonance(mut self, hz: u32) -> Self {
        self.resonance = hz;
        self
    }

    /// Set color and geometry.
    pub fn with_form(mut self, color: impl Into<String>, geometry: impl Into<String>) -> Self {
        self.color = color.into();
        self.geometry = geometry.into();
        self
    }

    /// Every correspondence this node declares, one entry per system.
    pub fn correspondences(&self) -> Vec<Correspondence> {
        vec![
            Correspondence::ShemAngel { number: self.light },
            Correspondence::GoetiaDemon {
                number: self.shadow,
            },
            Correspondence::IChing {
                hexagram: self.iching,
            },
            Correspondence::Soyga { table: self.soyga },
        ]
    }

    /// Whether any keyword contains `needle` (case-insensitive).
    pub fn has_keyword_like(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.narrative
            .keywords
            .iter()
            .any(|k| k.to_lowercase().contains(&needle))
    }
}

/// Narrative hooks for a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Narrative {
    pub theme: String,
    pub archetype: String,
    pub keywords: Vec<String>,
    pub story_beat: Option<String>,
}

impl Narrative {
    pub fn new(theme: impl Into<String>, archetype: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            archetype: archetype.into(),
            ..Default::default()
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// Harmonic lists declared by the author, as node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclaredHarmonics {
    pub perfect_consonance: Vec<NodeId>,
    pub consonance: Vec<NodeId>,
    pub dissonance: Vec<NodeId>,
    pub tritone: Vec<NodeId>,
}

impl DeclaredHarmonics {
    /// True when no list declares anything.
    pub fn is_empty(&self) -> bool {
        self.perfect_consonance.is_empty()
            && self.consonance.is_empty()
            && self.dissonance.is_empty()
            && self.tritone.is_empty()
    }

    /// The lists that contribute harmonic-tier gates, in order.
    pub fn gate_sources(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.perfect_consonance
            .iter()
            .chain(self.consonance.iter())
            .copied()
    }
}

/// A correspondence into one of the external symbolic systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Correspondence {
    /// One of the 72 Shem ha-Mephorash angels.
    ShemAngel { number: u8 },
    /// One of the 72 Goetia spirits.
    GoetiaDemon { number: u8 },
    /// One of the 64 I Ching hexagrams.
    IChing { hexagram: u8 },
    /// A table of the Book of Soyga.
    Soyga { table: char },
}

impl Correspondence {
    /// Short name of the correspondence system.
    pub fn system(&self) -> &'static str {
        match self {
            Correspondence::ShemAngel { .. } => "shem",
            Correspondence::GoetiaDemon { .. } => "goetia",
            Correspondence::IChing { .. } => "iching",
            Correspondence::Soyga { .. } => "soyga",
        }
    }
}

impl std::fmt::Display for Correspondence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Correspondence::ShemAngel { number } => write!(f, "Shem angel {}", number),
            Correspondence::GoetiaDemon { number } => write!(f, "Goetia spirit {}", number),
            Correspondence::IChing { hexagram } => write!(f, "Hexagram {}", hexagram),
            Correspondence::Soyga { table } => write!(f, "Soyga table {}", table),
        }
    }
}
