//! Ledger session and the metadata-update operations.
//!
//! The session replaces a process-wide mutable client handle with an
//! explicit object: the ledger client, target network and Hydra node client
//! are fixed at construction and passed by reference into every operation.
//! Canonicalization and matching stay pure, so any number of sessions may
//! run concurrently; signing/submission serialization is the ledger
//! client's concern.

use crate::adapter::{AdaptedInput, AssetMap, adapt_input};
use crate::client::HydraClient;
use crate::datum::{CIP68_METADATA_VERSION, PlutusData, build_datum};
use crate::error::Cip68Error;
use crate::matcher::{MatchCriteria, find_utxo};
use crate::metadata::MetadataValue;
use crate::snapshot::{LOVELACE, OutputRecord};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Cardano network a session operates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Preprod,
    Preview,
}

impl Network {
    /// Base URL of the Blockfrost-style provider backing the ledger client.
    #[must_use]
    pub fn provider_base_url(self) -> String {
        format!("https://cardano-{self}.blockfrost.io/api/v0")
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Preprod => "preprod",
            Self::Preview => "preview",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = Cip68Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "preprod" => Ok(Self::Preprod),
            "preview" => Ok(Self::Preview),
            other => Err(Cip68Error::InvalidRequest(format!(
                "unknown network '{other}', expected mainnet, preprod or preview"
            ))),
        }
    }
}

/// External transaction-building collaborator.
///
/// Implementations own fee computation, signing and submission; both methods
/// return the serialized signed transaction as hex.
pub trait LedgerClient {
    /// Locks `assets` at `address` with `datum` attached inline.
    fn pay_to_address_with_data(
        &self,
        address: &str,
        datum: &PlutusData,
        assets: &AssetMap,
    ) -> Result<String, Cip68Error>;

    /// Spends `input` and re-locks `assets` at `address` with the new
    /// inline `datum`.
    fn collect_and_pay(
        &self,
        input: &AdaptedInput,
        address: &str,
        datum: &PlutusData,
        assets: &AssetMap,
    ) -> Result<String, Cip68Error>;
}

/// Builder for [`HeadSession`].
///
/// Building without a ledger client fails with
/// [`Cip68Error::ClientNotInitialized`]; a session can never exist with a
/// missing client.
#[derive(Debug)]
pub struct SessionBuilder<C> {
    network: Network,
    node_url: Option<String>,
    client: Option<C>,
}

impl<C: LedgerClient> SessionBuilder<C> {
    #[must_use]
    pub fn new(network: Network) -> Self {
        Self {
            network,
            node_url: None,
            client: None,
        }
    }

    #[must_use]
    pub fn node_url(mut self, url: &str) -> Self {
        self.node_url = Some(url.to_string());
        self
    }

    #[must_use]
    pub fn client(mut self, client: C) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<HeadSession<C>, Cip68Error> {
        let client = self.client.ok_or(Cip68Error::ClientNotInitialized)?;
        let node_url = self.node_url.ok_or_else(|| {
            Cip68Error::InvalidRequest("session requires a Hydra node URL".to_string())
        })?;

        Ok(HeadSession {
            client,
            network: self.network,
            node: HydraClient::new(&node_url),
        })
    }
}

/// One metadata-update session against an open Hydra head.
#[derive(Debug)]
pub struct HeadSession<C> {
    client: C,
    network: Network,
    node: HydraClient,
}

impl<C: LedgerClient> HeadSession<C> {
    #[must_use]
    pub fn network(&self) -> Network {
        self.network
    }

    #[must_use]
    pub fn node(&self) -> &HydraClient {
        &self.node
    }

    /// Queries the head's UTxO snapshot and selects the first entry
    /// matching `criteria`.
    ///
    /// `Ok(None)` means the query succeeded and nothing matched.
    pub fn find_usable_utxo(
        &self,
        criteria: &MatchCriteria,
    ) -> Result<Option<(String, OutputRecord)>, Cip68Error> {
        let snapshot = self.node.fetch_snapshot()?;

        Ok(find_utxo(&snapshot, criteria).map(|(id, record)| (id.to_string(), record.clone())))
    }

    /// Creates a CIP-68 reference token: locks one unit of
    /// `policy_id.token_name` at `address` with the metadata datum inline.
    pub fn create_reference_token(
        &self,
        policy_id: &str,
        token_name: &str,
        metadata: &MetadataValue,
        address: &str,
    ) -> Result<String, Cip68Error> {
        let datum = build_datum(metadata, CIP68_METADATA_VERSION)?;

        let mut assets = AssetMap::new();
        assets.insert(format!("{policy_id}{token_name}"), 1);

        tracing::info!(policy_id, token_name, address, "locking reference token");

        self.client
            .pay_to_address_with_data(address, &datum.to_plutus_data(), &assets)
    }

    /// Rewrites the metadata attached to the token held by the given UTxO.
    ///
    /// Spends the matched output and re-locks its token bundle at the same
    /// address with the new inline datum. Lovelace is stripped from the
    /// re-locked bundle; min-ada and change are the ledger client's concern.
    pub fn update_metadata(
        &self,
        composite_id: &str,
        record: &OutputRecord,
        metadata: &MetadataValue,
    ) -> Result<String, Cip68Error> {
        let datum = build_datum(metadata, CIP68_METADATA_VERSION)?;
        let input = adapt_input(composite_id, record)?;

        let mut assets = input.assets.clone();
        assets.shift_remove(LOVELACE);

        tracing::info!(composite_id, address = %record.address, "updating CIP-68 metadata");

        self.client
            .collect_and_pay(&input, &record.address, &datum.to_plutus_data(), &assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_parse_and_display_roundtrip() {
        for name in ["mainnet", "preprod", "preview"] {
            let network: Network = name.parse().expect("parse");
            assert_eq!(network.to_string(), name);
        }
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn provider_url_embeds_the_network_name() {
        assert_eq!(
            Network::Preview.provider_base_url(),
            "https://cardano-preview.blockfrost.io/api/v0"
        );
    }
}
