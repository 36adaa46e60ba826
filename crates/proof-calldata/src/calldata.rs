use alloy_primitives::U256;

use crate::error::{CalldataError, Result};
use crate::groth16::{self, Groth16Calldata};
use crate::plonk::{self, PlonkCalldata};
use crate::scheme::ProofScheme;
use crate::value::{ProofValue, parse_uint};

/// Arguments of a verifier contract's `verifyProof` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Calldata {
    Groth16(Groth16Calldata),
    Plonk(PlonkCalldata),
}

impl Calldata {
    /// Reshapes an exported calldata string into the call shape of `scheme`.
    pub fn parse(scheme: ProofScheme, formatted: &str) -> Result<Self> {
        match scheme {
            ProofScheme::Groth16 => Groth16Calldata::parse(formatted).map(Self::Groth16),
            ProofScheme::Plonk => PlonkCalldata::parse(formatted).map(Self::Plonk),
        }
    }

    /// A proof of all zeroes with `n_inputs` zero public inputs.
    pub fn zeroed(scheme: ProofScheme, n_inputs: usize) -> Self {
        match scheme {
            ProofScheme::Groth16 => Self::Groth16(Groth16Calldata::zeroed(n_inputs)),
            ProofScheme::Plonk => Self::Plonk(PlonkCalldata::zeroed(n_inputs)),
        }
    }

    pub fn scheme(&self) -> ProofScheme {
        match self {
            Self::Groth16(_) => ProofScheme::Groth16,
            Self::Plonk(_) => ProofScheme::Plonk,
        }
    }

    pub fn inputs(&self) -> &[U256] {
        match self {
            Self::Groth16(calldata) => &calldata.input,
            Self::Plonk(calldata) => &calldata.inputs,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Groth16(calldata) => calldata.to_json(),
            Self::Plonk(calldata) => calldata.to_json(),
        }
    }
}

/// Native stand-in for snarkjs `exportSolidityCallData`.
pub fn export_calldata(scheme: ProofScheme, proof: &ProofValue, public_signals: &ProofValue) -> Result<String> {
    match scheme {
        ProofScheme::Groth16 => groth16::export_solidity_calldata(proof, public_signals),
        ProofScheme::Plonk => plonk::export_solidity_calldata(proof, public_signals),
    }
}

/// 0x-prefixed, zero-padded 32-byte word in double quotes, as snarkjs prints it.
pub(crate) fn word(value: U256) -> String {
    format!("\"0x{}\"", hex::encode(value.to_be_bytes::<32>()))
}

/// Reads an integer leaf at `proof[key][path..]`.
///
/// Numeric strings are accepted as well, matching the exporter's own normalization.
pub(crate) fn coordinate(proof: &ProofValue, key: &str, path: &[usize]) -> Result<U256> {
    let mut node = proof.get(key);
    for index in path {
        node = node.and_then(|value| value.at(*index));
    }

    let label = if path.is_empty() { key.to_string() } else { format!("{key}{path:?}") };
    let value = node.ok_or_else(|| CalldataError::MissingField(label.clone()))?;
    leaf_uint(value).ok_or(CalldataError::NotAnInteger(label))
}

pub(crate) fn signal_list(public_signals: &ProofValue) -> Result<Vec<U256>> {
    let signals = public_signals
        .as_list()
        .ok_or_else(|| CalldataError::MissingField("public signals".to_string()))?;

    signals
        .iter()
        .enumerate()
        .map(|(index, signal)| leaf_uint(signal).ok_or(CalldataError::NonIntegerInput(index)))
        .collect()
}

fn leaf_uint(value: &ProofValue) -> Option<U256> {
    match value {
        ProofValue::Text(text) => parse_uint(text),
        other => other.as_uint(),
    }
}
