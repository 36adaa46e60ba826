//! Pairing-scheme calldata: `verifyProof(uint256[2] a, uint256[2][2] b, uint256[2] c, uint256[N] input)`.

use std::sync::LazyLock;

use alloy_primitives::U256;
use regex::Regex;
use serde_json::{Value, json};
use tracing::trace;

use crate::calldata::{coordinate, signal_list, word};
use crate::error::{CalldataError, Result};
use crate::value::{ProofValue, parse_uint};

/// Characters snarkjs uses to lay out the calldata string; none of them carry data.
static LAYOUT_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"["\[\]\s]"#).expect("layout pattern"));

/// Number of proof fields (A, B, C) ahead of the public inputs.
pub const PROOF_FIELDS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groth16Calldata {
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
    pub input: Vec<U256>,
}

impl Groth16Calldata {
    /// Parses the string produced by `exportSolidityCallData` into the call tuple.
    ///
    /// A proof with no public inputs (`...,[]`) parses to an empty `input`, not `[0]`.
    pub fn parse(formatted: &str) -> Result<Self> {
        Self::from_flat(&flatten(formatted)?)
    }

    /// Partitions a flat field list: `[0,1]` is A, `[2..6]` is B as `[[2,3],[4,5]]`,
    /// `[6,7]` is C and everything after is the input vector.
    pub fn from_flat(fields: &[U256]) -> Result<Self> {
        if fields.len() < PROOF_FIELDS {
            return Err(CalldataError::TooFewFields(fields.len()));
        }

        Ok(Self {
            a: [fields[0], fields[1]],
            b: [[fields[2], fields[3]], [fields[4], fields[5]]],
            c: [fields[6], fields[7]],
            input: fields[PROOF_FIELDS..].to_vec(),
        })
    }

    /// An all-zero proof carrying `n_inputs` zero inputs. Verifiers must reject it.
    pub fn zeroed(n_inputs: usize) -> Self {
        Self {
            a: [U256::ZERO; 2],
            b: [[U256::ZERO; 2]; 2],
            c: [U256::ZERO; 2],
            input: vec![U256::ZERO; n_inputs],
        }
    }

    /// The fields back in calldata order.
    pub fn flat(&self) -> Vec<U256> {
        let mut fields = Vec::with_capacity(PROOF_FIELDS + self.input.len());
        fields.extend(self.a);
        fields.extend(self.b.iter().flatten());
        fields.extend(self.c);
        fields.extend(&self.input);
        fields
    }

    /// Decimal rendering of every field, in calldata order.
    pub fn to_decimal_strings(&self) -> Vec<String> {
        self.flat().iter().map(U256::to_string).collect()
    }

    pub fn to_json(&self) -> Value {
        let dec = |values: &[U256]| values.iter().map(U256::to_string).collect::<Vec<_>>();
        json!({
            "a": dec(&self.a),
            "b": [dec(&self.b[0]), dec(&self.b[1])],
            "c": dec(&self.c),
            "input": dec(&self.input),
        })
    }
}

/// Strips the layout characters and splits the calldata string into integers.
///
/// An empty input vector leaves one empty trailing segment, which is dropped.
pub fn flatten(formatted: &str) -> Result<Vec<U256>> {
    let stripped = LAYOUT_CHARS.replace_all(formatted, "");
    let mut items: Vec<&str> = stripped.split(',').collect();
    if items.len() > 1 && items.last() == Some(&"") {
        trace!("dropping empty trailing calldata segment");
        items.pop();
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            parse_uint(item).ok_or_else(|| CalldataError::InvalidInteger {
                index,
                item: item.to_string(),
            })
        })
        .collect()
}

/// Renders a snarkjs Groth16 proof and its public signals the way
/// `groth16.exportSolidityCallData` does.
///
/// Each G2 coordinate pair of `pi_b` is emitted imaginary part first, which is the
/// order the EVM pairing precompile expects.
pub fn export_solidity_calldata(proof: &ProofValue, public_signals: &ProofValue) -> Result<String> {
    let a0 = word(coordinate(proof, "pi_a", &[0])?);
    let a1 = word(coordinate(proof, "pi_a", &[1])?);
    let b00 = word(coordinate(proof, "pi_b", &[0, 0])?);
    let b01 = word(coordinate(proof, "pi_b", &[0, 1])?);
    let b10 = word(coordinate(proof, "pi_b", &[1, 0])?);
    let b11 = word(coordinate(proof, "pi_b", &[1, 1])?);
    let c0 = word(coordinate(proof, "pi_c", &[0])?);
    let c1 = word(coordinate(proof, "pi_c", &[1])?);
    let inputs = signal_list(public_signals)?.into_iter().map(word).collect::<Vec<_>>().join(",");

    Ok(format!("[{a0}, {a1}],[[{b01}, {b00}],[{b11}, {b10}]],[{c0}, {c1}],[{inputs}]"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::unstringify;

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    #[test]
    fn test_partition_with_two_inputs() {
        let flat: Vec<U256> = [10, 11, 12, 13, 14, 15, 16, 17, 20, 21].into_iter().map(u).collect();
        let calldata = Groth16Calldata::from_flat(&flat).unwrap();

        assert_eq!(calldata.a, [u(10), u(11)]);
        assert_eq!(calldata.b, [[u(12), u(13)], [u(14), u(15)]]);
        assert_eq!(calldata.c, [u(16), u(17)]);
        assert_eq!(calldata.input, vec![u(20), u(21)]);
        assert_eq!(calldata.flat(), flat);
    }

    #[test]
    fn test_partition_preserves_long_input_order() {
        let flat: Vec<U256> = (0..21).map(u).collect();
        let calldata = Groth16Calldata::from_flat(&flat).unwrap();
        assert_eq!(calldata.input, (8..21).map(u).collect::<Vec<_>>());
    }

    #[test]
    fn test_too_few_fields() {
        let flat: Vec<U256> = (0..7).map(u).collect();
        assert!(matches!(Groth16Calldata::from_flat(&flat), Err(CalldataError::TooFewFields(7))));
    }

    #[test]
    fn test_parse_snarkjs_layout() {
        let formatted = r#"["0x0a", "0x0b"],[["0x0c", "0x0d"],["0x0e", "0x0f"]],["0x10", "0x11"],["0x14","0x15"]"#;
        let calldata = Groth16Calldata::parse(formatted).unwrap();

        assert_eq!(calldata.a, [u(10), u(11)]);
        assert_eq!(calldata.b, [[u(12), u(13)], [u(14), u(15)]]);
        assert_eq!(calldata.c, [u(16), u(17)]);
        assert_eq!(calldata.input, vec![u(20), u(21)]);
        assert_eq!(&calldata.to_decimal_strings()[8..], &["20".to_string(), "21".to_string()]);
    }

    #[test]
    fn test_parse_accepts_decimal_items_and_newlines() {
        let formatted = "[1,2],\n[[3,4],[5,6]],\n[7,8],\n[9]";
        let calldata = Groth16Calldata::parse(formatted).unwrap();
        assert_eq!(calldata.input, vec![u(9)]);
    }

    #[test]
    fn test_parse_without_public_inputs() {
        let calldata = Groth16Calldata::parse("[1,2],[[3,4],[5,6]],[7,8],[]").unwrap();
        assert!(calldata.input.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage_item() {
        let err = Groth16Calldata::parse("[1,2],[[3,4],[5,zz]],[7,8],[9]").unwrap_err();
        assert!(matches!(err, CalldataError::InvalidInteger { index: 5, .. }));
    }

    #[test]
    fn test_export_swaps_g2_pairs() {
        let proof = unstringify(ProofValue::from(serde_json::json!({
            "pi_a": ["1", "2", "1"],
            "pi_b": [["3", "4"], ["5", "6"], ["1", "0"]],
            "pi_c": ["7", "8", "1"],
            "protocol": "groth16",
            "curve": "bn128"
        })));
        let signals = unstringify(ProofValue::from(serde_json::json!(["33", "99"])));

        let formatted = export_solidity_calldata(&proof, &signals).unwrap();
        assert!(formatted.starts_with(
            "[\"0x0000000000000000000000000000000000000000000000000000000000000001\", "
        ));

        let calldata = Groth16Calldata::parse(&formatted).unwrap();
        assert_eq!(calldata.a, [u(1), u(2)]);
        assert_eq!(calldata.b, [[u(4), u(3)], [u(6), u(5)]]);
        assert_eq!(calldata.c, [u(7), u(8)]);
        assert_eq!(calldata.input, vec![u(33), u(99)]);
    }

    #[test]
    fn test_export_reports_missing_point() {
        let proof = ProofValue::from(serde_json::json!({"pi_a": ["1", "2"], "pi_b": [["3", "4"], ["5", "6"]]}));
        let signals = ProofValue::from(serde_json::json!([]));
        let err = export_solidity_calldata(&proof, &signals).unwrap_err();
        assert!(matches!(err, CalldataError::MissingField(field) if field.starts_with("pi_c")));
    }

    #[test]
    fn test_zeroed() {
        let calldata = Groth16Calldata::zeroed(13);
        assert_eq!(calldata.flat(), vec![U256::ZERO; 21]);
    }
}
