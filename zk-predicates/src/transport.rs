//! Proof text transport format.
//!
//! The one bit-exact wire format in this repo: a JSON object holding the
//! compressed proof bytes as an array-like index-to-byte map, plus the
//! public inputs as decimal strings. It exists purely to round-trip a proof
//! through a clipboard/text field between the prover and verifier surfaces.

use crate::groth16::{ZkError, deserialize_proof, serialize_proof};
use ark_bn254::{Bn254, Fr};
use ark_ff::PrimeField;
use ark_groth16::Proof;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A proof plus its public inputs, in transport form.
///
/// Lives only for the duration of one prove/copy/paste/verify interaction;
/// nothing here is persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    /// Compressed proof bytes, keyed by decimal index.
    #[serde(with = "byte_map")]
    pub proof: Vec<u8>,

    /// Decimal field values, in the circuit's public-input order.
    #[serde(rename = "publicInputs")]
    pub public_inputs: Vec<String>,
}

impl ProofBundle {
    /// Package a freshly generated proof for transport.
    pub fn bundle(proof: &Proof<Bn254>, public_inputs: &[Fr]) -> Result<Self, ZkError> {
        Ok(Self {
            proof: serialize_proof(proof)?,
            public_inputs: public_inputs.iter().map(fr_to_decimal).collect(),
        })
    }

    /// Recover the proof and public inputs from transport form.
    pub fn unbundle(&self) -> Result<(Proof<Bn254>, Vec<Fr>), ZkError> {
        let proof = deserialize_proof(&self.proof)?;

        let mut inputs = Vec::with_capacity(self.public_inputs.len());
        for value in &self.public_inputs {
            inputs.push(fr_from_decimal(value)?);
        }

        Ok((proof, inputs))
    }

    /// The exact string a user copies out of the prover surface.
    pub fn to_json(&self) -> Result<String, ZkError> {
        serde_json::to_string(self).map_err(|e| ZkError::Serialization(format!("{e}")))
    }

    /// Parse a string pasted into the verifier surface.
    pub fn from_json(text: &str) -> Result<Self, ZkError> {
        serde_json::from_str(text).map_err(|e| ZkError::Serialization(format!("{e}")))
    }
}

fn fr_to_decimal(value: &Fr) -> String {
    value.into_bigint().to_string()
}

fn fr_from_decimal(value: &str) -> Result<Fr, ZkError> {
    Fr::from_str(value)
        .map_err(|_| ZkError::Serialization(format!("invalid public input value: {value:?}")))
}

/// Serde adapter for the `proof` field's index-to-byte map.
mod byte_map {
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(bytes.len()))?;
        for (index, byte) in bytes.iter().enumerate() {
            map.serialize_entry(&index.to_string(), byte)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let entries = BTreeMap::<String, u8>::deserialize(deserializer)?;

        // Keys are decimal indices; order them numerically, not lexically.
        let mut indexed = Vec::with_capacity(entries.len());
        for (key, byte) in entries {
            let index: usize = key
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid proof byte index: {key:?}")))?;
            indexed.push((index, byte));
        }
        indexed.sort_unstable_by_key(|(index, _)| *index);

        Ok(indexed.into_iter().map(|(_, byte)| byte).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bundle(len: usize) -> ProofBundle {
        ProofBundle {
            proof: (0..len).map(|i| (i % 251) as u8).collect(),
            public_inputs: vec!["18".to_string()],
        }
    }

    #[test]
    fn proof_bytes_keep_numeric_order_through_json() {
        // More than ten bytes, so lexical key ordering would shuffle them.
        let bundle = sample_bundle(13);
        let text = bundle.to_json().unwrap();
        let parsed = ProofBundle::from_json(&text).unwrap();
        assert_eq!(parsed, bundle);
    }

    #[test]
    fn proof_serializes_as_index_map() {
        let bundle = ProofBundle {
            proof: vec![7, 250, 0],
            public_inputs: vec!["18".to_string()],
        };
        let text = bundle.to_json().unwrap();
        assert_eq!(text, r#"{"proof":{"0":7,"1":250,"2":0},"publicInputs":["18"]}"#);
    }

    #[test]
    fn accepts_out_of_order_indices() {
        let text = r#"{"proof":{"10":11,"2":3,"0":1,"1":2},"publicInputs":["100"]}"#;
        let parsed = ProofBundle::from_json(text).unwrap();
        assert_eq!(parsed.proof, vec![1, 2, 3, 11]);
        assert_eq!(parsed.public_inputs, vec!["100".to_string()]);
    }

    #[test]
    fn rejects_non_numeric_byte_index() {
        let text = r#"{"proof":{"a":1},"publicInputs":[]}"#;
        assert!(ProofBundle::from_json(text).is_err());
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(ProofBundle::from_json("not a proof").is_err());
        assert!(ProofBundle::from_json("{}").is_err());
    }

    #[test]
    fn decimal_public_inputs_round_trip() {
        let values = [Fr::from(0u64), Fr::from(18u64), Fr::from(u64::MAX)];
        for value in values {
            let text = fr_to_decimal(&value);
            assert_eq!(fr_from_decimal(&text).unwrap(), value);
        }
    }

    #[test]
    fn rejects_non_decimal_public_input() {
        assert!(fr_from_decimal("0x12").is_err());
        assert!(fr_from_decimal("").is_err());
    }
}
