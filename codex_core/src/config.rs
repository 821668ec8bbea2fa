//! Tunable caps for affinity classification and exploration.

use serde::{Deserialize, Serialize};

use crate::error::{CodexError, Result};

/// Configuration for the whole engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodexConfig {
    pub affinity: AffinityConfig,
    pub exploration: ExplorationConfig,
}

impl CodexConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source)
            .map_err(|e| CodexError::InvalidArgument(format!("bad codex config: {}", e)))
    }
}

/// Candidate caps per affinity rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityConfig {
    /// Same-element candidates kept per node.
    pub same_element_cap: usize,

    /// Chakra-neighbour candidates kept per node.
    pub chakra_cap: usize,

    /// Opposite-element candidates kept per node.
    pub opposite_element_cap: usize,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self {
            same_element_cap: 3,
            chakra_cap: 2,
            opposite_element_cap: 2,
        }
    }
}

/// Caps for the exploration query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Suggestions drawn from each source (harmonic, related).
    pub per_source: usize,

    /// Maximum length of `suggestions.explore`.
    pub explore_cap: usize,

    /// Maximum length of `connections.related`.
    pub related_cap: usize,

    /// Maximum number of create / learn prompts.
    pub prompt_cap: usize,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            per_source: 2,
            explore_cap: 5,
            related_cap: 4,
            prompt_cap: 5,
        }
    }
}
