//! UTxO selection over a snapshot.
//!
//! Deterministic first-match semantics: entries are scanned in snapshot
//! iteration order, the address filter is applied first, and the scan stops
//! at the first qualifying entry. There is no best-match or quantity
//! tie-break, and "nothing matched" is a normal `None`, never an error.

use crate::snapshot::{OutputRecord, UtxoSnapshot};

use serde::{Deserialize, Serialize};

/// Filter for selecting one UTxO out of a snapshot.
///
/// The policy/token filter only applies when both halves are present;
/// otherwise the first entry surviving the address filter wins (the
/// deliberate "fallback to any UTxO" mode).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_name: Option<String>,
}

/// Finds the first snapshot entry satisfying `criteria`.
///
/// Returns the composite id together with the matched output, or `None`
/// when the snapshot is exhausted (including an empty snapshot).
#[must_use]
pub fn find_utxo<'a>(
    snapshot: &'a UtxoSnapshot,
    criteria: &MatchCriteria,
) -> Option<(&'a str, &'a OutputRecord)> {
    for (utxo_id, record) in snapshot {
        if let Some(address) = &criteria.address
            && address != &record.address
        {
            continue;
        }

        if let (Some(policy_id), Some(token_name)) = (&criteria.policy_id, &criteria.token_name) {
            let quantity = record
                .value
                .get(policy_id)
                .and_then(|entry| entry.token_quantity(token_name));

            if quantity.is_some_and(|quantity| quantity > 0) {
                tracing::debug!(%utxo_id, %policy_id, %token_name, "found usable UTxO");
                return Some((utxo_id.as_str(), record));
            }
        } else {
            tracing::debug!(%utxo_id, "no token criteria, returning first UTxO");
            return Some((utxo_id.as_str(), record));
        }
    }

    tracing::debug!("no suitable UTxO found");
    None
}
