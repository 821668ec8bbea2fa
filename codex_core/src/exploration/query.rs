//! Node search predicates.

use serde::{Deserialize, Serialize};

use codex_tables::{Chakra, Element, NodeRecord};

/// A conjunction of optional predicates. An unset field does not filter.
///
/// `element`, `planet`, `zodiac`, `chakra`, `resonance` and `geometry` must
/// match exactly; `name`, `keyword` and `theme` match case-insensitive
/// substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeQuery {
    pub element: Option<Element>,
    pub planet: Option<String>,
    pub zodiac: Option<String>,
    pub chakra: Option<Chakra>,
    pub resonance: Option<u32>,
    pub geometry: Option<String>,
    pub name: Option<String>,
    pub keyword: Option<String>,
    pub theme: Option<String>,
}

impl NodeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_chakra(mut self, chakra: Chakra) -> Self {
        self.chakra = Some(chakra);
        self
    }

    pub fn with_planet(mut self, planet: impl Into<String>) -> Self {
        self.planet = Some(planet.into());
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether `node` satisfies every set predicate.
    pub fn matches(&self, node: &NodeRecord) -> bool {
        fn eq<T: PartialEq>(want: &Option<T>, have: &T) -> bool {
            want.as_ref().map_or(true, |w| w == have)
        }
        fn like(want: &Option<String>, have: &str) -> bool {
            want.as_ref()
                .map_or(true, |w| have.to_lowercase().contains(&w.to_lowercase()))
        }

        eq(&self.element, &node.element)
            && eq(&self.planet, &node.planet)
            && eq(&self.zodiac, &node.zodiac)
            && eq(&self.chakra, &node.chakra)
            && eq(&self.resonance, &node.resonance)
            && eq(&self.geometry, &node.geometry)
            && like(&self.name, &node.name)
            && like(&self.theme, &node.narrative.theme)
            && self
                .keyword
                .as_ref()
                .map_or(true, |k| node.has_keyword_like(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_tables::Narrative;

    fn record() -> NodeRecord {
        NodeRecord::new(1, "Spark of the First Turn", Element::Fire, Chakra::Root)
            .with_sky("Mars", "Aries")
            .with_narrative(
                Narrative::new("Will and Transformation", "Innocent")
                    .with_keywords(["wonder", "flame"]),
            )
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(NodeQuery::new().matches(&record()));
    }

    #[test]
    fn test_all_predicates_must_hold() {
        let node = record();

        assert!(NodeQuery::new()
            .with_element(Element::Fire)
            .with_planet("Mars")
            .matches(&node));
        assert!(!NodeQuery::new()
            .with_element(Element::Fire)
            .with_planet("Venus")
            .matches(&node));
    }

    #[test]
    fn test_substring_fields_ignore_case() {
        let node = record();

        assert!(NodeQuery::new().with_keyword("FLA").matches(&node));
        assert!(NodeQuery::new().with_theme("transform").matches(&node));
        assert!(NodeQuery::new().with_name("first turn").matches(&node));
        assert!(!NodeQuery::new().with_keyword("ocean").matches(&node));
    }

    #[test]
    fn test_equality_fields_are_exact() {
        assert!(!NodeQuery::new().with_planet("mars").matches(&record()));
    }

    #[test]
    fn test_query_from_json() {
        let query: NodeQuery =
            serde_json::from_str(r#"{"element": "Water", "keyword": "tide"}"#).unwrap();
        assert_eq!(query.element, Some(Element::Water));
        assert_eq!(query.keyword.as_deref(), Some("tide"));
        assert!(query.planet.is_none());
    }
}
