//! Error types for codex queries and pathworking.

use codex_tables::TableError;
use thiserror::Error;

use crate::pathworking::SessionId;

/// Result type for codex operations.
pub type Result<T> = std::result::Result<T, CodexError>;

/// Kinds of entity a lookup can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Gate,
    Card,
    Chapter,
    Session,
    Vertex,
    Arcana,
    Route,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Node => "node",
            EntityKind::Gate => "gate",
            EntityKind::Card => "card",
            EntityKind::Chapter => "chapter",
            EntityKind::Session => "session",
            EntityKind::Vertex => "vertex",
            EntityKind::Arcana => "arcana",
            EntityKind::Route => "route",
        };
        f.write_str(name)
    }
}

/// Errors returned by codex operations.
///
/// Broken invariants are not errors: they surface in a
/// [`ValidationReport`](crate::ValidationReport) instead.
#[derive(Debug, Error)]
pub enum CodexError {
    /// Unknown id, or no route between two vertices.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    /// Out-of-range or missing argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The session (or the addressed half of a dual session) is already complete.
    #[error("session {0} is already completed")]
    SessionCompleted(SessionId),

    /// The source tables could not be loaded.
    #[error(transparent)]
    Tables(#[from] TableError),
}

impl CodexError {
    pub(crate) fn not_found(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        CodexError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether this is a `NotFound` for the given kind.
    pub fn is_not_found(&self, expected: EntityKind) -> bool {
        matches!(self, CodexError::NotFound { kind, .. } if *kind == expected)
    }
}
