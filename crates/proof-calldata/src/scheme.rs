use serde::{Deserialize, Serialize};

use crate::error::CalldataError;

/// Proof systems whose generated verifier contracts this crate can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofScheme {
    /// Pairing scheme: three curve points plus an input vector.
    Groth16,
    /// Single-blob scheme: one opaque proof blob plus an input vector.
    Plonk,
}

impl ProofScheme {
    /// The subcommand name snarkjs uses for this scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groth16 => "groth16",
            Self::Plonk => "plonk",
        }
    }
}

impl std::str::FromStr for ProofScheme {
    type Err = CalldataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groth16" => Ok(Self::Groth16),
            "plonk" => Ok(Self::Plonk),
            _ => Err(CalldataError::UnknownScheme(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProofScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
