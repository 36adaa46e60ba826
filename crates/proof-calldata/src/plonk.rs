//! Single-blob calldata: `verifyProof(bytes proof, uint256[] pubSignals)`.

use alloy_primitives::{Bytes, U256};
use serde_json::{Value, json};
use tracing::debug;

use crate::calldata::{coordinate, signal_list, word};
use crate::error::{CalldataError, Result};
use crate::value::{ProofValue, unstringify};

/// G1 commitments in the order the verifier reads them from the blob.
pub const PROOF_POINTS: [&str; 9] = ["A", "B", "C", "Z", "T1", "T2", "T3", "Wxi", "Wxiw"];

/// Opening evaluations that follow the points.
pub const PROOF_EVALUATIONS: [&str; 7] = ["eval_a", "eval_b", "eval_c", "eval_s1", "eval_s2", "eval_zw", "eval_r"];

/// Size of the proof blob in bytes: two words per point, one per evaluation.
pub const PROOF_BLOB_LEN: usize = 32 * (2 * PROOF_POINTS.len() + PROOF_EVALUATIONS.len());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlonkCalldata {
    /// The proof blob exactly as it appeared in the exported string.
    pub proof: String,
    pub inputs: Vec<U256>,
}

impl PlonkCalldata {
    /// Splits at the first comma: the left side is the blob, the right side a JSON list
    /// of public inputs.
    pub fn parse(formatted: &str) -> Result<Self> {
        let (proof, inputs) = formatted.split_once(',').ok_or(CalldataError::MissingSeparator)?;
        let inputs: Value = serde_json::from_str(inputs)?;
        let inputs = signal_list(&unstringify(ProofValue::from(inputs)))?;
        debug!(blob_chars = proof.len(), inputs = inputs.len(), "parsed plonk calldata");

        Ok(Self {
            proof: proof.to_string(),
            inputs,
        })
    }

    /// A single zero byte as the proof, with `n_inputs` zero inputs.
    pub fn zeroed(n_inputs: usize) -> Self {
        Self {
            proof: "0x00".to_string(),
            inputs: vec![U256::ZERO; n_inputs],
        }
    }

    /// Decodes the hex blob into the `bytes` argument of the call.
    pub fn proof_bytes(&self) -> Result<Bytes> {
        let hex_digits = self
            .proof
            .trim()
            .strip_prefix("0x")
            .ok_or_else(|| CalldataError::InvalidProofBlob(self.proof.clone()))?;
        hex::decode(hex_digits)
            .map(Bytes::from)
            .map_err(|_| CalldataError::InvalidProofBlob(self.proof.clone()))
    }

    pub fn to_json(&self) -> Value {
        json!({
            "proof": self.proof,
            "inputs": self.inputs.iter().map(U256::to_string).collect::<Vec<_>>(),
        })
    }
}

/// Renders a snarkjs PLONK proof the way `plonk.exportSolidityCallData` does:
/// `0x<blob>,[<inputs>]`.
pub fn export_solidity_calldata(proof: &ProofValue, public_signals: &ProofValue) -> Result<String> {
    let mut blob = Vec::with_capacity(PROOF_BLOB_LEN);
    for point in PROOF_POINTS {
        blob.extend_from_slice(&coordinate(proof, point, &[0])?.to_be_bytes::<32>());
        blob.extend_from_slice(&coordinate(proof, point, &[1])?.to_be_bytes::<32>());
    }
    for evaluation in PROOF_EVALUATIONS {
        blob.extend_from_slice(&coordinate(proof, evaluation, &[])?.to_be_bytes::<32>());
    }

    let inputs = signal_list(public_signals)?.into_iter().map(word).collect::<Vec<_>>().join(",");
    Ok(format!("0x{},[{inputs}]", hex::encode(blob)))
}
