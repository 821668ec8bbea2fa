//! Pathworking sessions and their traversal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use codex_tables::{PathId, TreeKind, VertexId};

/// Unique identifier for a pathworking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which tree (or both) a session walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeMode {
    Life,
    Death,
    Dual,
}

impl From<TreeKind> for TreeMode {
    fn from(tree: TreeKind) -> Self {
        match tree {
            TreeKind::Life => TreeMode::Life,
            TreeKind::Death => TreeMode::Death,
        }
    }
}

/// One vertex on a planned route, with the path used to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub vertex: VertexId,
    pub name: String,
    /// `None` for the first step.
    pub traversed_path: Option<PathId>,
    pub arcana: Option<u8>,
}

/// Progress along one tree.
///
/// `completed_at` is set exactly when `current` reaches `end` and is never
/// cleared afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traversal {
    pub tree: TreeKind,
    pub start: VertexId,
    pub end: VertexId,
    pub current: VertexId,
    /// Shortest route from start to end; empty when end is unreachable.
    pub route: Vec<PathStep>,
    /// Every vertex visited so far, starting with `start`.
    pub trail: Vec<VertexId>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Traversal {
    pub(crate) fn new(
        tree: TreeKind,
        start: VertexId,
        end: VertexId,
        route: Vec<PathStep>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tree,
            start,
            end,
            current: start,
            route,
            trail: vec![start],
            completed_at: (start == end).then_some(now),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Move to `next`. Callers check completion first.
    pub(crate) fn step(&mut self, next: VertexId, now: DateTime<Utc>) {
        self.current = next;
        self.trail.push(next);
        if next == self.end {
            self.completed_at = Some(now);
        }
    }
}

/// How the two halves of a dual session stand relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Balance {
    SeekingEquilibrium,
    LifeLeading,
    DeathLeading,
    Equilibrium,
}

impl Balance {
    pub fn from_progress(life_done: bool, death_done: bool) -> Self {
        match (life_done, death_done) {
            (false, false) => Balance::SeekingEquilibrium,
            (true, false) => Balance::LifeLeading,
            (false, true) => Balance::DeathLeading,
            (true, true) => Balance::Equilibrium,
        }
    }
}

/// A single-tree or dual-tree walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SessionKind {
    Single(Traversal),
    Dual {
        life: Traversal,
        death: Traversal,
        balance: Balance,
    },
}

/// A pathworking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub kind: SessionKind,
    pub started_at: DateTime<Utc>,
    /// Set once every traversal in the session is complete.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub(crate) fn new(kind: SessionKind, now: DateTime<Utc>) -> Self {
        let mut session = Self {
            id: SessionId::new(),
            kind,
            started_at: now,
            completed_at: None,
        };
        session.refresh(now);
        session
    }

    pub fn mode(&self) -> TreeMode {
        match &self.kind {
            SessionKind::Single(traversal) => traversal.tree.into(),
            SessionKind::Dual { .. } => TreeMode::Dual,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// The traversal on `tree`, if this session walks it.
    pub fn traversal(&self, tree: TreeKind) -> Option<&Traversal> {
        match &self.kind {
            SessionKind::Single(traversal) => (traversal.tree == tree).then_some(traversal),
            SessionKind::Dual { life, death, .. } => Some(match tree {
                TreeKind::Life => life,
                TreeKind::Death => death,
            }),
        }
    }

    pub(crate) fn traversal_mut(&mut self, tree: TreeKind) -> Option<&mut Traversal> {
        match &mut self.kind {
            SessionKind::Single(traversal) => (traversal.tree == tree).then_some(traversal),
            SessionKind::Dual { life, death, .. } => Some(match tree {
                TreeKind::Life => life,
                TreeKind::Death => death,
            }),
        }
    }

    /// Current position of a single-tree session.
    pub fn current(&self) -> Option<VertexId> {
        match &self.kind {
            SessionKind::Single(traversal) => Some(traversal.current),
            SessionKind::Dual { .. } => None,
        }
    }

    pub fn balance(&self) -> Option<Balance> {
        match &self.kind {
            SessionKind::Single(_) => None,
            SessionKind::Dual { balance, .. } => Some(*balance),
        }
    }

    /// Recompute balance and session completion after a step.
    pub(crate) fn refresh(&mut self, now: DateTime<Utc>) {
        let done = match &mut self.kind {
            SessionKind::Single(traversal) => traversal.is_completed(),
            SessionKind::Dual {
                life,
                death,
                balance,
            } => {
                *balance = Balance::from_progress(life.is_completed(), death.is_completed());
                *balance == Balance::Equilibrium
            }
        };
        if done && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }
}
