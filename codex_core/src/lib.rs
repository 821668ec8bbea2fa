//! # Codex Core
//!
//! The engine of the Codex 144:99. It derives everything that is not authored
//! from the tables in `codex_tables`: gate membership, node affinities,
//! cross-references into the card and chapter catalogs, routes across the
//! Tree of Life and the Tree of Death, and validation of all of the above.
//!
//! ## Core Components
//!
//! - **catalog**: the 144 nodes and 99 gates, addressed by id
//! - **membership**: node <-> gate index from the membership formula
//! - **affinity**: harmonic, dissonant, tritone and adjacent node pairs
//! - **crossref**: links declared by the card and chapter catalogs
//! - **pathworking**: single and dual tree sessions with shortest routes
//! - **validation**: invariant checks and fix proposals
//! - **exploration**: node exploration, search and random discovery
//!
//! [`Codex`] builds all of them once and hands out the query engines.
//!
//! ```no_run
//! use codex_core::{Codex, NodeId};
//!
//! let codex = Codex::builtin()?;
//! let exploration = codex.explore(NodeId(1))?;
//! println!("{} -> {:?}", exploration.node.name, exploration.suggestions.explore);
//! # Ok::<(), codex_core::CodexError>(())
//! ```

pub mod affinity;
pub mod catalog;
mod codex;
mod config;
mod crossref;
mod error;
pub mod exploration;
mod membership;
pub mod pathworking;
pub mod validation;

pub use affinity::*;
pub use catalog::*;
pub use codex::*;
pub use config::*;
pub use crossref::*;
pub use error::*;
pub use exploration::*;
pub use membership::*;
pub use pathworking::*;
pub use validation::*;

pub use codex_tables::{
    CardCatalog, CardId, Chakra, ChapterCatalog, ChapterNumber, Correspondence, Element, NodeId,
    NodeRecord, PathId, StaticTables, TreeKind, TreePath, TreeTables, TreeVertex, VertexId,
};
