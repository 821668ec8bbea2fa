//! Tree definitions - the Tree of Life, its shadow Tree of Death, and the 22 paths.

use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};

/// Vertices per tree: ten principal positions plus the hidden one.
pub const VERTEX_COUNT: u8 = 11;

/// Number of paths on the Tree of Life.
pub const PATH_COUNT: usize = 22;

/// Which of the two trees a vertex belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    Life,
    Death,
}

impl TreeKind {
    /// The other tree.
    pub fn shadow(&self) -> TreeKind {
        match self {
            TreeKind::Life => TreeKind::Death,
            TreeKind::Death => TreeKind::Life,
        }
    }
}

impl std::fmt::Display for TreeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeKind::Life => f.write_str("life"),
            TreeKind::Death => f.write_str("death"),
        }
    }
}

/// Position on a tree (1..=11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u8);

impl VertexId {
    pub fn is_valid(&self) -> bool {
        (1..=VERTEX_COUNT).contains(&self.0)
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Path number on the Tree of Life (11..=32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathId(pub u8);

impl std::fmt::Display for PathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sephirah or qliphah.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeVertex {
    pub tree: TreeKind,
    pub id: VertexId,
    pub name: String,
    pub meaning: String,
    pub hebrew: Option<String>,
    pub element: Option<String>,
    /// Name of the life vertex this one shadows (death tree only).
    pub shadow_of: Option<String>,
}

/// An edge between two Tree of Life vertices, labelled with a major arcana.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreePath {
    pub id: PathId,
    pub from: VertexId,
    pub to: VertexId,
    pub arcana: u8,
    pub name: String,
}

impl TreePath {
    /// Whether this path joins `a` and `b`, in either direction.
    pub fn joins(&self, a: VertexId, b: VertexId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// The endpoint opposite `v`, if `v` is an endpoint.
    pub fn other_end(&self, v: VertexId) -> Option<VertexId> {
        if self.from == v {
            Some(self.to)
        } else if self.to == v {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Deserialize)]
struct RawTree {
    #[serde(default)]
    sephirah: Vec<RawSephirah>,
    #[serde(default)]
    qliphah: Vec<RawQliphah>,
    #[serde(default)]
    path: Vec<TreePath>,
}

#[derive(Deserialize)]
struct RawSephirah {
    id: VertexId,
    name: String,
    meaning: String,
    hebrew: Option<String>,
    element: Option<String>,
}

#[derive(Deserialize)]
struct RawQliphah {
    id: VertexId,
    name: String,
    meaning: String,
    shadow_of: Option<String>,
}

/// Both trees and the path table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeTables {
    pub life: Vec<TreeVertex>,
    pub death: Vec<TreeVertex>,
    pub paths: Vec<TreePath>,
}

impl TreeTables {
    /// Parse from TOML with `[[sephirah]]`, `[[qliphah]]` and `[[path]]` entries.
    pub fn from_toml_str(source: &str) -> TableResult<Self> {
        let raw: RawTree = toml::from_str(source).map_err(|e| TableError::parse("tree", e))?;

        let life = raw
            .sephirah
            .into_iter()
            .map(|s| TreeVertex {
                tree: TreeKind::Life,
                id: s.id,
                name: s.name,
                meaning: s.meaning,
                hebrew: s.hebrew,
                element: s.element,
                shadow_of: None,
            })
            .collect();

        let death = raw
            .qliphah
            .into_iter()
            .map(|q| TreeVertex {
                tree: TreeKind::Death,
                id: q.id,
                name: q.name,
                meaning: q.meaning,
                hebrew: None,
                element: None,
                shadow_of: q.shadow_of,
            })
            .collect();

        Ok(Self {
            life,
            death,
            paths: raw.path,
        })
    }

    /// Vertices of one tree.
    pub fn vertices(&self, tree: TreeKind) -> &[TreeVertex] {
        match tree {
            TreeKind::Life => &self.life,
            TreeKind::Death => &self.death,
        }
    }

    /// Look up a vertex by tree and id.
    pub fn vertex(&self, tree: TreeKind, id: VertexId) -> Option<&TreeVertex> {
        self.vertices(tree).iter().find(|v| v.id == id)
    }

    /// The vertex on the other tree in shadow correspondence with `vertex`.
    pub fn counterpart(&self, vertex: &TreeVertex) -> Option<&TreeVertex> {
        self.vertex(vertex.tree.shadow(), vertex.id)
    }

    /// Paths touching a vertex.
    pub fn paths_from(&self, v: VertexId) -> impl Iterator<Item = &TreePath> {
        self.paths.iter().filter(move |p| p.from == v || p.to == v)
    }

    /// The path carrying a given arcana index.
    pub fn path_for_arcana(&self, arcana: u8) -> Option<&TreePath> {
        self.paths.iter().find(|p| p.arcana == arcana)
    }
}
