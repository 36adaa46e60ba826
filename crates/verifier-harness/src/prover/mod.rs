//! Proof generation backends.
//!
//! snarkjs is the reference prover; [`ArtifactProver`] replays proofs that were generated ahead of time.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use proof_calldata::{ProofScheme, ProofValue};

pub mod artifacts;
pub mod snarkjs;

pub use artifacts::ArtifactProver;
pub use snarkjs::SnarkjsCli;

/// File names snarkjs writes a proof and its public signals to.
pub const PROOF_FILE: &str = "proof.json";
pub const PUBLIC_FILE: &str = "public.json";

/// The compiled circuit and its proving key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircuitArtifacts {
    pub wasm: PathBuf,
    pub zkey: PathBuf,
}

/// Raw prover output, numeric fields still as decimal strings.
#[derive(Clone, Debug, PartialEq)]
pub struct ProofOutput {
    pub proof: ProofValue,
    pub public_signals: ProofValue,
}

impl ProofOutput {
    /// Reads `proof.json` and `public.json` from `dir`.
    pub async fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            proof: read_json(&dir.join(PROOF_FILE)).await?,
            public_signals: read_json(&dir.join(PUBLIC_FILE)).await?,
        })
    }

    /// Writes `proof.json` and `public.json` into `dir`, integers rendered as decimal strings.
    pub async fn store(&self, dir: &Path) -> Result<()> {
        write_json(&dir.join(PROOF_FILE), &self.proof).await?;
        write_json(&dir.join(PUBLIC_FILE), &self.public_signals).await
    }
}

#[async_trait]
pub trait ProvingBackend: Send + Sync {
    /// Computes the witness for `input` and proves it against `circuit`.
    async fn full_prove(
        &self,
        scheme: ProofScheme,
        input: &serde_json::Value,
        circuit: &CircuitArtifacts,
    ) -> Result<ProofOutput>;

    /// Renders the calldata string the generated verifier expects.
    async fn export_calldata(
        &self,
        scheme: ProofScheme,
        proof: &ProofValue,
        public_signals: &ProofValue,
    ) -> Result<String>;
}

pub(crate) async fn read_json(path: &Path) -> Result<ProofValue> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(value.into())
}

pub(crate) async fn write_json(path: &Path, value: &ProofValue) -> Result<()> {
    let json = serde_json::to_string_pretty(&proof_calldata::stringify(value.clone()).to_json())?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
