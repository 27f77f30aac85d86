//! Translation from the node's output representation into the shape the
//! ledger client consumes when building a transaction.

use crate::error::Cip68Error;
use crate::snapshot::{AssetEntry, LOVELACE, OutputRecord, UtxoId, ValueMap};

use indexmap::IndexMap;
use serde::Serialize;

/// Flattened asset-quantity mapping: `lovelace` verbatim, every token keyed
/// by `policy_id ++ token_name` with no separator.
pub type AssetMap = IndexMap<String, u64>;

/// Normalized transaction input derived from one snapshot output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdaptedInput {
    pub tx_hash: String,
    pub output_index: u32,
    pub address: String,
    pub assets: AssetMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datum_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_ref: Option<String>,
}

/// Flattens a nested value map.
///
/// Grouping by asset class is lost; the (policy, token, quantity) triples
/// are not. `lovelace` always comes first when present.
#[must_use]
pub fn flatten_value(value: &ValueMap) -> AssetMap {
    let mut assets = AssetMap::new();

    if let Some(AssetEntry::Lovelace(quantity)) = value.get(LOVELACE) {
        assets.insert(LOVELACE.to_string(), *quantity);
    }

    for (asset_class, entry) in value {
        if asset_class == LOVELACE {
            continue;
        }

        match entry {
            AssetEntry::Tokens(tokens) => {
                for (token_name, quantity) in tokens {
                    assets.insert(format!("{asset_class}{token_name}"), *quantity);
                }
            }
            // A bare quantity under a non-lovelace key has no token name to
            // append; keep the class key as-is.
            AssetEntry::Lovelace(quantity) => {
                assets.insert(asset_class.clone(), *quantity);
            }
        }
    }

    assets
}

/// Adapts one snapshot entry into a transaction-ready input.
///
/// `composite_id` is the snapshot key (`"<tx-hash>#<index>"`). Absent or
/// empty datum/script fields become `None`, never empty strings.
pub fn adapt_input(composite_id: &str, record: &OutputRecord) -> Result<AdaptedInput, Cip68Error> {
    let id: UtxoId = composite_id.parse()?;

    Ok(AdaptedInput {
        tx_hash: id.tx_hash,
        output_index: id.output_index,
        address: record.address.clone(),
        assets: flatten_value(&record.value),
        datum: non_empty(record.datum.as_deref()),
        datum_hash: non_empty(record.datumhash.as_deref()),
        script_ref: non_empty(record.reference_script.as_deref()),
    })
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field.filter(|text| !text.is_empty()).map(str::to_string)
}
