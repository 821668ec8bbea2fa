//! Dual-tree pathworking.
//!
//! Routes are shortest paths found by breadth-first search over the 22 life
//! paths. The Tree of Death has no edges of its own: it is walked over the
//! shadow mirror of the same paths, vertex for vertex.
//!
//! Sessions are owned by the pathworker. Advancing needs `&mut self`, so a
//! host that shares one pathworker between threads wraps it in a `Mutex`.

mod session;

pub use session::*;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{info, warn};

use codex_tables::{TreeKind, TreePath, TreeTables, TreeVertex, VertexId, VERTEX_COUNT};

use crate::error::{CodexError, EntityKind, Result};

/// A path looked up by its arcana, with endpoints on both trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcanaPath {
    pub path: TreePath,
    pub from: TreeVertex,
    pub to: TreeVertex,
    /// Death-tree counterparts of `from` and `to`.
    pub shadow_from: Option<TreeVertex>,
    pub shadow_to: Option<TreeVertex>,
}

/// Runs pathworking sessions over both trees.
#[derive(Debug, Clone)]
pub struct DualTreePathworker {
    tree: TreeTables,
    sessions: HashMap<SessionId, Session>,
}

impl DualTreePathworker {
    pub fn new(tree: TreeTables) -> Self {
        Self {
            tree,
            sessions: HashMap::new(),
        }
    }

    pub fn tree(&self) -> &TreeTables {
        &self.tree
    }

    /// Look up a vertex on either tree.
    pub fn vertex(&self, tree: TreeKind, id: VertexId) -> Result<&TreeVertex> {
        check_vertex(tree, id)?;
        self.tree
            .vertex(tree, id)
            .ok_or_else(|| CodexError::not_found(EntityKind::Vertex, format!("{} {}", tree, id)))
    }

    /// Shortest route between two vertices, both ends included.
    pub fn find_path(&self, tree: TreeKind, from: VertexId, to: VertexId) -> Result<Vec<PathStep>> {
        check_vertex(tree, from)?;
        check_vertex(tree, to)?;
        self.route(tree, from, to).ok_or_else(|| {
            CodexError::not_found(EntityKind::Route, format!("{} {} -> {}", tree, from, to))
        })
    }

    /// Begin a walk on one tree.
    pub fn start(&mut self, tree: TreeKind, from: VertexId, to: VertexId) -> Result<Session> {
        let now = Utc::now();
        let traversal = self.plan(tree, from, to, now)?;
        let session = Session::new(SessionKind::Single(traversal), now);

        info!(session = %session.id, %tree, %from, %to, "started pathworking");
        Ok(self.keep(session))
    }

    /// Begin a walk on both trees at once. The halves advance independently.
    pub fn start_dual(
        &mut self,
        life_from: VertexId,
        life_to: VertexId,
        death_from: VertexId,
        death_to: VertexId,
    ) -> Result<Session> {
        let now = Utc::now();
        let life = self.plan(TreeKind::Life, life_from, life_to, now)?;
        let death = self.plan(TreeKind::Death, death_from, death_to, now)?;
        let balance = Balance::from_progress(life.is_completed(), death.is_completed());
        let session = Session::new(
            SessionKind::Dual {
                life,
                death,
                balance,
            },
            now,
        );

        info!(session = %session.id, %life_from, %life_to, %death_from, %death_to, "started dual pathworking");
        Ok(self.keep(session))
    }

    /// Move a single-tree session to `next`.
    pub fn advance(&mut self, id: SessionId, next: VertexId) -> Result<Session> {
        let tree = match &self.session(id)?.kind {
            SessionKind::Single(traversal) => traversal.tree,
            SessionKind::Dual { .. } => {
                return Err(CodexError::InvalidArgument(format!(
                    "session {} is dual; advance one tree at a time",
                    id
                )))
            }
        };
        self.advance_in(id, tree, next)
    }

    /// Move the traversal on `tree` to `next`.
    pub fn advance_in(&mut self, id: SessionId, tree: TreeKind, next: VertexId) -> Result<Session> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| CodexError::not_found(EntityKind::Session, id))?;
        let traversal = session.traversal_mut(tree).ok_or_else(|| {
            CodexError::InvalidArgument(format!("session {} does not walk the {} tree", id, tree))
        })?;

        if traversal.is_completed() {
            return Err(CodexError::SessionCompleted(id));
        }
        check_vertex(tree, next)?;

        let now = Utc::now();
        traversal.step(next, now);
        let arrived = traversal.is_completed();
        session.refresh(now);

        if arrived {
            info!(session = %id, %tree, vertex = %next, "pathworking reached its end");
        }
        Ok(session.clone())
    }

    /// The path carrying `arcana`, with both trees' endpoints.
    pub fn path_for_arcana(&self, arcana: u8) -> Result<ArcanaPath> {
        let path = self
            .tree
            .path_for_arcana(arcana)
            .ok_or_else(|| CodexError::not_found(EntityKind::Arcana, arcana))?;
        let from = self.vertex(TreeKind::Life, path.from)?;
        let to = self.vertex(TreeKind::Life, path.to)?;

        Ok(ArcanaPath {
            path: path.clone(),
            from: from.clone(),
            to: to.clone(),
            shadow_from: self.tree.counterpart(from).cloned(),
            shadow_to: self.tree.counterpart(to).cloned(),
        })
    }

    pub fn session(&self, id: SessionId) -> Result<&Session> {
        self.sessions
            .get(&id)
            .ok_or_else(|| CodexError::not_found(EntityKind::Session, id))
    }

    /// Every live session, oldest first.
    pub fn sessions(&self) -> Vec<&Session> {
        let mut sessions: Vec<&Session> = self.sessions.values().collect();
        sessions.sort_by_key(|s| s.started_at);
        sessions
    }

    /// Drop a session from the lookup map.
    pub fn forget(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    fn keep(&mut self, session: Session) -> Session {
        self.sessions.insert(session.id, session.clone());
        session
    }

    fn plan(
        &self,
        tree: TreeKind,
        from: VertexId,
        to: VertexId,
        now: chrono::DateTime<Utc>,
    ) -> Result<Traversal> {
        check_vertex(tree, from)?;
        check_vertex(tree, to)?;

        let route = self.route(tree, from, to).unwrap_or_else(|| {
            warn!(%tree, %from, %to, "no route between vertices; starting without one");
            Vec::new()
        });
        Ok(Traversal::new(tree, from, to, route, now))
    }

    /// Breadth-first search over the path table.
    fn route(&self, tree: TreeKind, from: VertexId, to: VertexId) -> Option<Vec<PathStep>> {
        let mut came_from: HashMap<VertexId, (VertexId, &TreePath)> = HashMap::new();
        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(vertex) = queue.pop_front() {
            if vertex == to {
                break;
            }
            for path in self.tree.paths_from(vertex) {
                let Some(next) = path.other_end(vertex) else {
                    continue;
                };
                if visited.insert(next) {
                    came_from.insert(next, (vertex, path));
                    queue.push_back(next);
                }
            }
        }

        if !visited.contains(&to) {
            return None;
        }

        let mut hops = Vec::new();
        let mut vertex = to;
        while vertex != from {
            let (previous, path) = *came_from.get(&vertex)?;
            hops.push(self.step(tree, vertex, Some(path)));
            vertex = previous;
        }
        hops.push(self.step(tree, from, None));
        hops.reverse();
        Some(hops)
    }

    fn step(&self, tree: TreeKind, vertex: VertexId, path: Option<&TreePath>) -> PathStep {
        PathStep {
            vertex,
            name: self
                .tree
                .vertex(tree, vertex)
                .map(|v| v.name.clone())
                .unwrap_or_default(),
            traversed_path: path.map(|p| p.id),
            arcana: path.map(|p| p.arcana),
        }
    }
}

fn check_vertex(tree: TreeKind, id: VertexId) -> Result<()> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(CodexError::InvalidArgument(format!(
            "{} tree vertex {} is outside 1..={}",
            tree, id, VERTEX_COUNT
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_tables::{PathId, StaticTables};

    fn pathworker() -> DualTreePathworker {
        DualTreePathworker::new(StaticTables::builtin().unwrap().tree)
    }

    fn vertices(route: &[PathStep]) -> Vec<u8> {
        route.iter().map(|s| s.vertex.0).collect()
    }

    fn assert_connected(pw: &DualTreePathworker, route: &[PathStep]) {
        for pair in route.windows(2) {
            let path_id = pair[1].traversed_path.unwrap();
            let path = pw.tree().paths.iter().find(|p| p.id == path_id).unwrap();
            assert!(path.joins(pair[0].vertex, pair[1].vertex));
        }
    }

    #[test]
    fn test_direct_path() {
        let pw = pathworker();
        let route = pw
            .find_path(TreeKind::Life, VertexId(1), VertexId(6))
            .unwrap();

        assert_eq!(vertices(&route), vec![1, 6]);
        assert_eq!(route[0].traversed_path, None);
        assert_eq!(route[1].traversed_path, Some(PathId(32)));
        assert_eq!(route[1].arcana, Some(21));
        assert_eq!(route[1].name, "Tiphareth");
    }

    #[test]
    fn test_route_without_tiphareth_shortcut() {
        let pw = pathworker();

        // Kether to Malkuth needs three hops.
        let route = pw
            .find_path(TreeKind::Life, VertexId(1), VertexId(10))
            .unwrap();
        assert_eq!(route.len(), 4);
        assert_eq!(route.first().unwrap().vertex, VertexId(1));
        assert_eq!(route.last().unwrap().vertex, VertexId(10));
        assert_connected(&pw, &route);

        // There is no 6-10 path, so 2 -> 6 -> 10 is not a route.
        let route = pw
            .find_path(TreeKind::Life, VertexId(2), VertexId(10))
            .unwrap();
        assert_eq!(route.len(), 4);
        assert_connected(&pw, &route);
    }

    #[test]
    fn test_every_principal_pair_is_reachable() {
        let pw = pathworker();
        for a in 1..=10 {
            for b in 1..=10 {
                let route = pw
                    .find_path(TreeKind::Life, VertexId(a), VertexId(b))
                    .unwrap();
                assert_eq!(route.first().unwrap().vertex, VertexId(a));
                assert_eq!(route.last().unwrap().vertex, VertexId(b));
                assert_connected(&pw, &route);
            }
        }
    }

    #[test]
    fn test_death_tree_mirrors_life_paths() {
        let pw = pathworker();
        let life = pw
            .find_path(TreeKind::Life, VertexId(1), VertexId(10))
            .unwrap();
        let death = pw
            .find_path(TreeKind::Death, VertexId(1), VertexId(10))
            .unwrap();

        assert_eq!(vertices(&life), vertices(&death));
        assert_eq!(death[0].name, "Thaumiel");
    }

    #[test]
    fn test_daath_is_unreachable() {
        let mut pw = pathworker();

        let err = pw
            .find_path(TreeKind::Life, VertexId(1), VertexId(11))
            .unwrap_err();
        assert!(err.is_not_found(EntityKind::Route));

        // The session still starts, without a planned route.
        let session = pw.start(TreeKind::Life, VertexId(1), VertexId(11)).unwrap();
        assert!(session.traversal(TreeKind::Life).unwrap().route.is_empty());
    }

    #[test]
    fn test_out_of_range_vertices() {
        let mut pw = pathworker();

        assert!(matches!(
            pw.start(TreeKind::Life, VertexId(0), VertexId(6)),
            Err(CodexError::InvalidArgument(_))
        ));
        assert!(matches!(
            pw.find_path(TreeKind::Death, VertexId(1), VertexId(12)),
            Err(CodexError::InvalidArgument(_))
        ));
        assert!(matches!(
            pw.start_dual(VertexId(1), VertexId(6), VertexId(1), VertexId(99)),
            Err(CodexError::InvalidArgument(_))
        ));
        assert!(pw.sessions().is_empty());
    }

    #[test]
    fn test_kether_to_tiphareth_session() {
        let mut pw = pathworker();

        let session = pw.start(TreeKind::Life, VertexId(1), VertexId(6)).unwrap();
        assert_eq!(session.current(), Some(VertexId(1)));
        assert!(!session.is_completed());

        let session = pw.advance(session.id, VertexId(6)).unwrap();
        assert_eq!(session.current(), Some(VertexId(6)));
        assert!(session.is_completed());
        assert!(session.completed_at.is_some());
    }

    #[test]
    fn test_completion_is_final() {
        let mut pw = pathworker();
        let id = pw
            .start(TreeKind::Life, VertexId(1), VertexId(6))
            .unwrap()
            .id;
        pw.advance(id, VertexId(6)).unwrap();

        assert!(matches!(
            pw.advance(id, VertexId(2)),
            Err(CodexError::SessionCompleted(_))
        ));
        let session = pw.session(id).unwrap();
        assert_eq!(session.current(), Some(VertexId(6)));
        assert!(session.is_completed());
    }

    #[test]
    fn test_intermediate_steps_do_not_complete() {
        let mut pw = pathworker();
        let id = pw
            .start(TreeKind::Death, VertexId(1), VertexId(10))
            .unwrap()
            .id;

        let session = pw.advance(id, VertexId(6)).unwrap();
        assert!(!session.is_completed());
        assert_eq!(
            session.traversal(TreeKind::Death).unwrap().trail,
            vec![VertexId(1), VertexId(6)]
        );
    }

    #[test]
    fn test_start_at_end_is_completed() {
        let mut pw = pathworker();
        let session = pw.start(TreeKind::Life, VertexId(4), VertexId(4)).unwrap();
        assert!(session.is_completed());
    }

    #[test]
    fn test_dual_session() {
        let mut pw = pathworker();
        let session = pw
            .start_dual(VertexId(1), VertexId(6), VertexId(10), VertexId(9))
            .unwrap();
        assert_eq!(session.mode(), TreeMode::Dual);
        assert_eq!(session.balance(), Some(Balance::SeekingEquilibrium));

        assert!(matches!(
            pw.advance(session.id, VertexId(6)),
            Err(CodexError::InvalidArgument(_))
        ));

        let session = pw
            .advance_in(session.id, TreeKind::Life, VertexId(6))
            .unwrap();
        assert_eq!(session.balance(), Some(Balance::LifeLeading));
        assert!(!session.is_completed());
        assert!(matches!(
            pw.advance_in(session.id, TreeKind::Life, VertexId(5)),
            Err(CodexError::SessionCompleted(_))
        ));

        let session = pw
            .advance_in(session.id, TreeKind::Death, VertexId(9))
            .unwrap();
        assert_eq!(session.balance(), Some(Balance::Equilibrium));
        assert!(session.is_completed());
    }

    #[test]
    fn test_advance_unknown_session() {
        let mut pw = pathworker();
        let err = pw.advance(SessionId::new(), VertexId(2)).unwrap_err();
        assert!(err.is_not_found(EntityKind::Session));
    }

    #[test]
    fn test_advance_rejects_bad_vertex() {
        let mut pw = pathworker();
        let id = pw
            .start(TreeKind::Life, VertexId(1), VertexId(6))
            .unwrap()
            .id;
        assert!(matches!(
            pw.advance(id, VertexId(42)),
            Err(CodexError::InvalidArgument(_))
        ));
        assert_eq!(pw.session(id).unwrap().current(), Some(VertexId(1)));
    }

    #[test]
    fn test_path_for_arcana() {
        let pw = pathworker();

        let world = pw.path_for_arcana(21).unwrap();
        assert_eq!(world.from.id, VertexId(1));
        assert_eq!(world.to.id, VertexId(6));
        assert_eq!(world.path.name, "The World");
        assert_eq!(world.shadow_from.unwrap().name, "Thaumiel");

        assert!(pw
            .path_for_arcana(22)
            .unwrap_err()
            .is_not_found(EntityKind::Arcana));
    }

    #[test]
    fn test_sessions_and_forget() {
        let mut pw = pathworker();
        let a = pw.start(TreeKind::Life, VertexId(1), VertexId(6)).unwrap().id;
        let b = pw.start(TreeKind::Death, VertexId(2), VertexId(3)).unwrap().id;
        assert_eq!(pw.sessions().len(), 2);

        assert!(pw.forget(a).is_some());
        assert!(pw.session(a).is_err());
        assert!(pw.session(b).is_ok());
        assert!(pw.forget(a).is_none());
    }

    #[test]
    fn test_vertex_lookup() {
        let pw = pathworker();
        assert_eq!(
            pw.vertex(TreeKind::Life, VertexId(11)).unwrap().name,
            "Daath"
        );
        assert!(pw.vertex(TreeKind::Life, VertexId(12)).is_err());
    }
}
