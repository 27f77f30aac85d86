#![warn(clippy::all, clippy::pedantic)]

//! Command-line entrypoint for the Hydra CIP-68 helper CLI.
//!
//! Dry-run tooling: fetches a head's UTxO snapshot, matches a token-bearing
//! UTxO and builds the CIP-68 datum for inspection. Transaction building
//! requires a [`hydra_cip68::LedgerClient`] implementation supplied by the
//! embedding application.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use clap::{Parser, Subcommand};

use hydra_cip68::{
    CIP68_METADATA_VERSION, HydraClient, MatchCriteria, MetadataValue, Network, adapt_input,
    build_datum, find_utxo,
};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "hydra-cli", version, about = "Hydra CIP-68 helper CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Cardano network the head settles against
    #[arg(long, env = "CARDANO_NETWORK", default_value = "preview")]
    network: Network,
    /// Base URL of the Hydra node API
    #[arg(long, env = "HYDRA_NODE_URL", default_value = "http://127.0.0.1:4001")]
    node_url: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and print the head's confirmed UTxO snapshot
    Snapshot,
    /// Find the first UTxO matching the given criteria
    FindUtxo {
        #[command(flatten)]
        criteria: CriteriaArgs,
    },
    /// Build a CIP-68 datum from a metadata JSON file and print it
    BuildDatum {
        /// Path to the metadata JSON file, or '-' for stdin
        #[arg(long)]
        metadata: PathBuf,
        /// Schema version tag to wrap the metadata with
        #[arg(long, default_value_t = CIP68_METADATA_VERSION)]
        version: u64,
    },
    /// Match a UTxO and print it in transaction-ready form
    Adapt {
        #[command(flatten)]
        criteria: CriteriaArgs,
    },
}

#[derive(clap::Args, Debug)]
struct CriteriaArgs {
    /// Only match outputs held at this address
    #[arg(long)]
    address: Option<String>,
    /// Policy id of the token to look for (requires --token-name)
    #[arg(long, requires = "token_name")]
    policy_id: Option<String>,
    /// Token name to look for (requires --policy-id)
    #[arg(long, requires = "policy_id")]
    token_name: Option<String>,
}

impl From<CriteriaArgs> for MatchCriteria {
    fn from(args: CriteriaArgs) -> Self {
        Self {
            address: args.address,
            policy_id: args.policy_id,
            token_name: args.token_name,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    tracing::debug!(network = %cli.network, node_url = %cli.node_url, "starting");

    let node = HydraClient::new(&cli.node_url);

    match cli.command {
        Commands::Snapshot => {
            let snapshot = node
                .fetch_snapshot()
                .context("failed to query the Hydra node snapshot")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::FindUtxo { criteria } => {
            let snapshot = node
                .fetch_snapshot()
                .context("failed to query the Hydra node snapshot")?;
            match find_utxo(&snapshot, &criteria.into()) {
                Some((utxo_id, record)) => {
                    println!("{utxo_id}");
                    println!("{}", serde_json::to_string_pretty(record)?);
                }
                None => {
                    tracing::warn!("no suitable UTxO found");
                    std::process::exit(1);
                }
            }
        }
        Commands::BuildDatum { metadata, version } => {
            let raw = read_metadata(&metadata)?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("metadata file '{}' is not valid JSON", metadata.display()))?;
            let datum = build_datum(&MetadataValue::from_json(value), version)
                .context("metadata could not be canonicalized")?;
            println!("{}", serde_json::to_string_pretty(&datum.to_json())?);
            println!("{}", datum.to_plutus_data());
        }
        Commands::Adapt { criteria } => {
            let snapshot = node
                .fetch_snapshot()
                .context("failed to query the Hydra node snapshot")?;
            let Some((utxo_id, record)) = find_utxo(&snapshot, &criteria.into()) else {
                tracing::warn!("no suitable UTxO found");
                std::process::exit(1);
            };
            let input = adapt_input(utxo_id, record)
                .with_context(|| format!("snapshot entry '{utxo_id}' could not be adapted"))?;
            println!("{}", serde_json::to_string_pretty(&input)?);
        }
    }

    Ok(())
}

fn read_metadata(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read metadata from stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read metadata file '{}'", path.display()))
}
