//! Data model for a Hydra head's confirmed UTxO snapshot.
//!
//! Mirrors the JSON returned by the node's `/snapshot/utxo` endpoint: a
//! mapping from `"<tx-hash>#<index>"` to the output held at that reference.
//! Maps are insertion-ordered because matching is iteration-order dependent.

use crate::error::Cip68Error;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Asset-class key carrying the plain ada quantity.
pub const LOVELACE: &str = "lovelace";

/// Snapshot of a head's UTxO set, keyed by composite output reference.
pub type UtxoSnapshot = IndexMap<String, OutputRecord>;

/// Value locked at an output: `lovelace` maps to a raw quantity, every other
/// key is a policy id mapping token names to quantities.
pub type ValueMap = IndexMap<String, AssetEntry>;

/// One output of the snapshot, as serialized by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub address: String,
    pub value: ValueMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datumhash: Option<String>,
    #[serde(
        default,
        rename = "referenceScript",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_script: Option<String>,
}

/// Either the raw lovelace quantity or a token-name sub-mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetEntry {
    Lovelace(u64),
    Tokens(IndexMap<String, u64>),
}

impl AssetEntry {
    /// Quantity held under `token_name`, if this entry is a token mapping.
    #[must_use]
    pub fn token_quantity(&self, token_name: &str) -> Option<u64> {
        match self {
            Self::Lovelace(_) => None,
            Self::Tokens(tokens) => tokens.get(token_name).copied(),
        }
    }
}

/// Decomposed output reference: transaction hash plus output index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoId {
    pub tx_hash: String,
    pub output_index: u32,
}

impl FromStr for UtxoId {
    type Err = Cip68Error;

    fn from_str(composite: &str) -> Result<Self, Self::Err> {
        let Some((tx_hash, index)) = composite.split_once('#') else {
            return Err(Cip68Error::InvalidUtxoId(composite.to_string()));
        };

        if tx_hash.is_empty() {
            return Err(Cip68Error::InvalidUtxoId(composite.to_string()));
        }

        let output_index = index
            .parse::<u32>()
            .map_err(|_| Cip68Error::InvalidUtxoId(composite.to_string()))?;

        Ok(Self {
            tx_hash: tx_hash.to_string(),
            output_index,
        })
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tx_hash, self.output_index)
    }
}
