//! Errors raised while loading the static tables.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for table loading.
pub type TableResult<T> = std::result::Result<T, TableError>;

/// Failure to read or parse one of the source tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be read.
    #[error("failed to read table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table is not valid TOML or does not match the record schema.
    #[error("malformed {table} table: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: toml::de::Error,
    },
}

impl TableError {
    pub(crate) fn parse(table: &'static str, source: toml::de::Error) -> Self {
        TableError::Parse { table, source }
    }
}
