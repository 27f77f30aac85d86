//! CIP-68 datum assembly.
//!
//! Wraps a canonicalized metadata mapping together with the schema version
//! tag and renders the result as the type-tagged Plutus data value an
//! external ledger client serializes and attaches to the output.

use crate::canonical::{CanonicalDatumMap, CanonicalValue, canonicalize};
use crate::error::Cip68Error;
use crate::metadata::MetadataValue;

use std::fmt;

/// Schema tag distinguishing this metadata layout from future revisions.
pub const CIP68_METADATA_VERSION: u64 = 1;

/// A CIP-68 datum: canonical metadata plus the schema version tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cip68Datum {
    pub metadata: CanonicalDatumMap,
    pub version: u64,
}

/// Builds a CIP-68 datum from caller-supplied metadata.
///
/// Canonicalization failures are wrapped in
/// [`Cip68Error::MetadataSerialization`] with the cause preserved.
pub fn build_datum(metadata: &MetadataValue, version: u64) -> Result<Cip68Datum, Cip68Error> {
    let canonical = canonicalize(metadata)?;

    tracing::debug!(version, entries = canonical.len(), "built CIP-68 datum");

    Ok(Cip68Datum {
        metadata: canonical,
        version,
    })
}

impl Cip68Datum {
    /// Renders the datum as `Constr 0 [metadata-map, version]`, the CIP-68
    /// on-chain layout.
    #[must_use]
    pub fn to_plutus_data(&self) -> PlutusData {
        PlutusData::Constr {
            tag: 0,
            fields: vec![
                map_to_plutus(&self.metadata),
                PlutusData::Integer(i128::from(self.version)),
            ],
        }
    }

    /// JSON rendering with hex-encoded byte strings, for inspection output.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "metadata": map_to_json(&self.metadata),
            "version": self.version,
        })
    }
}

/// Structured on-chain data value, as consumed by the ledger client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlutusData {
    Bytes(Vec<u8>),
    Integer(i128),
    List(Vec<PlutusData>),
    Map(Vec<(PlutusData, PlutusData)>),
    Constr { tag: u64, fields: Vec<PlutusData> },
}

fn map_to_plutus(map: &CanonicalDatumMap) -> PlutusData {
    let pairs = map
        .entries()
        .iter()
        .map(|(key, value)| (PlutusData::Bytes(key.clone()), value_to_plutus(value)))
        .collect();
    PlutusData::Map(pairs)
}

fn value_to_plutus(value: &CanonicalValue) -> PlutusData {
    match value {
        CanonicalValue::Bytes(bytes) => PlutusData::Bytes(bytes.clone()),
        CanonicalValue::Map(nested) => map_to_plutus(nested),
        CanonicalValue::Seq(items) => PlutusData::List(items.iter().map(map_to_plutus).collect()),
    }
}

fn map_to_json(map: &CanonicalDatumMap) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for (key, value) in map.entries() {
        object.insert(hex::encode(key), value_to_json(value));
    }
    serde_json::Value::Object(object)
}

fn value_to_json(value: &CanonicalValue) -> serde_json::Value {
    match value {
        CanonicalValue::Bytes(bytes) => serde_json::Value::String(hex::encode(bytes)),
        CanonicalValue::Map(nested) => map_to_json(nested),
        CanonicalValue::Seq(items) => {
            serde_json::Value::Array(items.iter().map(map_to_json).collect())
        }
    }
}

impl fmt::Display for PlutusData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Self::Integer(int) => write!(f, "{int}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(pairs) => {
                write!(f, "{{")?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Self::Constr { tag, fields } => {
                write!(f, "Constr {tag} [")?;
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}")?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::Cip68Error;

    use serde_json::json;

    #[test]
    fn datum_wraps_canonical_metadata_with_version() {
        let metadata = MetadataValue::from_json(json!({"name": "t"}));
        let datum = build_datum(&metadata, 1).expect("build datum");

        assert_eq!(datum.version, 1);
        assert_eq!(datum.metadata, canonicalize(&metadata).expect("canonicalize"));
    }

    #[test]
    fn canonicalization_failure_is_wrapped() {
        let metadata = MetadataValue::from_json(json!({"tags": ["a", "b"]}));
        let err = build_datum(&metadata, 1).expect_err("scalar sequence must fail");
        assert!(matches!(err, Cip68Error::MetadataSerialization(_)));
        assert!(err.to_string().starts_with("Metadata serialization failed"));
    }

    #[test]
    fn plutus_rendering_uses_constr_zero() {
        let metadata = MetadataValue::from_json(json!({"name": "t"}));
        let datum = build_datum(&metadata, CIP68_METADATA_VERSION).expect("build datum");

        let PlutusData::Constr { tag, fields } = datum.to_plutus_data() else {
            panic!("expected constructor");
        };
        assert_eq!(tag, 0);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1], PlutusData::Integer(1));
        let PlutusData::Map(pairs) = &fields[0] else {
            panic!("expected metadata map");
        };
        assert_eq!(
            pairs[0],
            (
                PlutusData::Bytes(b"name".to_vec()),
                PlutusData::Bytes(b"t".to_vec())
            )
        );
    }

    #[test]
    fn json_rendering_hex_encodes_byte_strings() {
        let metadata = MetadataValue::from_json(json!({"name": "t"}));
        let datum = build_datum(&metadata, 1).expect("build datum");

        // "name" = 6e616d65, "t" = 74
        assert_eq!(
            datum.to_json(),
            json!({"metadata": {"6e616d65": "74"}, "version": 1})
        );
    }

    #[test]
    fn display_renders_nested_structure() {
        let metadata = MetadataValue::from_json(json!({"files": [{"src": "a"}]}));
        let datum = build_datum(&metadata, 1).expect("build datum");

        let rendered = datum.to_plutus_data().to_string();
        assert_eq!(
            rendered,
            "Constr 0 [{0x66696c6573: [{0x737263: 0x61}]}, 1]"
        );
    }
}
