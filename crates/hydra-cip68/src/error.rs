use crate::client::SnapshotError;

use thiserror::Error;

/// Composite shapes the canonicalizer refuses to encode.
///
/// Scalar shapes never fail canonicalization; only malformed composites do.
#[derive(Debug, Error)]
pub enum MetadataShapeError {
    #[error("top-level metadata must be a mapping, got {found}")]
    TopLevelNotMapping { found: &'static str },

    #[error(
        "unsupported metadata shape under key '{key}': sequence element {index} is {found}, expected a mapping"
    )]
    NonMappingSequenceElement {
        key: String,
        index: usize,
        found: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum Cip68Error {
    #[error("Metadata serialization failed: {0}")]
    MetadataSerialization(#[from] MetadataShapeError),

    #[error("Invalid UTxO id '{0}': expected '<tx-hash>#<index>'")]
    InvalidUtxoId(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Snapshot query failed: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Ledger client is not initialized")]
    ClientNotInitialized,

    #[error("Ledger client error: {0}")]
    LedgerClient(String),
}
