#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![cfg_attr(
    test,
    allow(
        clippy::default_trait_access,
        clippy::iter_on_single_items,
        clippy::needless_pass_by_value,
        clippy::too_many_lines
    )
)]

pub mod adapter;
pub mod canonical;
pub mod client;
pub mod datum;
pub mod error;
pub mod matcher;
pub mod metadata;
pub mod session;
pub mod snapshot;

pub use adapter::{AdaptedInput, AssetMap, adapt_input, flatten_value};
pub use canonical::{CanonicalDatumMap, CanonicalValue, canonicalize};
pub use client::{HydraClient, SnapshotError};
pub use datum::{CIP68_METADATA_VERSION, Cip68Datum, PlutusData, build_datum};
pub use error::{Cip68Error, MetadataShapeError};
pub use matcher::{MatchCriteria, find_utxo};
pub use metadata::MetadataValue;
pub use session::{HeadSession, LedgerClient, Network, SessionBuilder};
pub use snapshot::{AssetEntry, LOVELACE, OutputRecord, UtxoId, UtxoSnapshot, ValueMap};
