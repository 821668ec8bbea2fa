//! # Codex Tables
//!
//! The authored content of the Codex 144:99: the 144 nodes of the spiral, the
//! Tree of Life and its shadow Tree of Death, the 22 paths between sephiroth,
//! and the two catalogs that link back into the codex (78 cards, 33 chapters).
//!
//! This crate is the single source of truth for authored attributes and holds
//! no derivation logic. Everything derived (gates, affinities, routes) lives in
//! `codex_core`.
//!
//! ## Modules
//!
//! - **nodes**: node records, elements, chakras and correspondences
//! - **tree**: tree vertices and the 22 paths
//! - **catalogs**: card and chapter catalogs consumed through narrow traits
//! - **source**: loading all tables from the embedded data or a directory

pub mod catalogs;
mod error;
pub mod nodes;
mod source;
pub mod tree;

pub use catalogs::*;
pub use error::*;
pub use nodes::*;
pub use source::*;
pub use tree::*;
