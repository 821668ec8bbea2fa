//! Caller-owned exploration history.

use serde::{Deserialize, Serialize};

use codex_tables::NodeId;

use super::Exploration;

/// Remembers what a caller has explored. The engine itself keeps no history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorationLog {
    current: Option<Exploration>,
    visited: Vec<NodeId>,
}

impl ExplorationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `exploration` current and note its node once.
    pub fn record(&mut self, exploration: Exploration) {
        let id = exploration.node.id();
        if !self.visited.contains(&id) {
            self.visited.push(id);
        }
        self.current = Some(exploration);
    }

    /// Visited nodes in first-visit order.
    pub fn history(&self) -> &[NodeId] {
        &self.visited
    }

    pub fn current(&self) -> Option<&Exploration> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.visited.clear();
        self.current = None;
    }
}
