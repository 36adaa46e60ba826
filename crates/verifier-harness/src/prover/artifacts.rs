use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use proof_calldata::{ProofScheme, ProofValue, export_calldata};
use tracing::debug;

use super::{CircuitArtifacts, ProofOutput, ProvingBackend};

/// Serves a proof generated ahead of time and exports calldata natively.
///
/// The witness input and circuit of a case are ignored; the artifacts must have been
/// produced from them.
#[derive(Clone, Debug)]
pub struct ArtifactProver {
    dir: PathBuf,
}

impl ArtifactProver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ProvingBackend for ArtifactProver {
    async fn full_prove(
        &self,
        scheme: ProofScheme,
        _input: &serde_json::Value,
        _circuit: &CircuitArtifacts,
    ) -> Result<ProofOutput> {
        debug!(%scheme, "replaying proof from {}", self.dir.display());
        ProofOutput::load(&self.dir).await
    }

    async fn export_calldata(
        &self,
        scheme: ProofScheme,
        proof: &ProofValue,
        public_signals: &ProofValue,
    ) -> Result<String> {
        Ok(export_calldata(scheme, proof, public_signals)?)
    }
}
