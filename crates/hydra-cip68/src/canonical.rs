//! Metadata canonicalization.
//!
//! Walks a [`MetadataValue`] tree and produces the canonical keyed mapping
//! the CIP-68 datum carries on-chain: every key and every leaf value becomes
//! the UTF-8 byte string of its text form, numerics are stringified first,
//! and nesting (mappings, sequences of mappings) is preserved recursively.
//!
//! Ordering is significant: the wrapping datum serialization is
//! byte-order-sensitive, so output entries follow input iteration order and
//! are never sorted.

use crate::error::MetadataShapeError;
use crate::metadata::MetadataValue;

use indexmap::IndexMap;

/// Insertion-ordered canonical mapping from byte-string keys to encoded
/// values. Built fresh per call; never sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalDatumMap {
    entries: Vec<(Vec<u8>, CanonicalValue)>,
}

/// A canonical mapping value: an encoded leaf, a nested mapping, or a
/// sequence of nested mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalValue {
    Bytes(Vec<u8>),
    Map(CanonicalDatumMap),
    Seq(Vec<CanonicalDatumMap>),
}

impl CanonicalDatumMap {
    #[must_use]
    pub fn entries(&self) -> &[(Vec<u8>, CanonicalValue)] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&CanonicalValue> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(|(key, _)| key.as_slice())
    }

    fn push(&mut self, key: Vec<u8>, value: CanonicalValue) {
        self.entries.push((key, value));
    }
}

/// Canonicalizes a full metadata tree.
///
/// The top level must be a mapping; nested levels may hold scalars,
/// mappings, or sequences whose elements are themselves mappings. A
/// sequence element of any other shape fails the whole call.
pub fn canonicalize(value: &MetadataValue) -> Result<CanonicalDatumMap, MetadataShapeError> {
    let MetadataValue::Mapping(entries) = value else {
        return Err(MetadataShapeError::TopLevelNotMapping {
            found: value.shape_name(),
        });
    };

    canonicalize_mapping(entries)
}

fn canonicalize_mapping(
    entries: &IndexMap<String, MetadataValue>,
) -> Result<CanonicalDatumMap, MetadataShapeError> {
    let mut canonical = CanonicalDatumMap::default();

    for (key, value) in entries {
        let encoded = match value {
            MetadataValue::Text(text) => CanonicalValue::Bytes(text.clone().into_bytes()),
            MetadataValue::Number(_) | MetadataValue::Boolean(_) | MetadataValue::BigInt(_) => {
                let text = value.scalar_text().unwrap_or_default();
                CanonicalValue::Bytes(text.into_bytes())
            }
            MetadataValue::Other(raw) => {
                tracing::warn!(
                    %key,
                    shape = value.shape_name(),
                    "stringifying unrecognized metadata scalar"
                );
                CanonicalValue::Bytes(raw.clone().into_bytes())
            }
            MetadataValue::Mapping(nested) => CanonicalValue::Map(canonicalize_mapping(nested)?),
            MetadataValue::Sequence(items) => {
                let mut sequence = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let MetadataValue::Mapping(nested) = item else {
                        return Err(MetadataShapeError::NonMappingSequenceElement {
                            key: key.clone(),
                            index,
                            found: item.shape_name(),
                        });
                    };
                    sequence.push(canonicalize_mapping(nested)?);
                }
                CanonicalValue::Seq(sequence)
            }
        };

        canonical.push(key.clone().into_bytes(), encoded);
    }

    Ok(canonical)
}
