use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use proof_calldata::{ProofScheme, ProofValue};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

use super::{CircuitArtifacts, PROOF_FILE, PUBLIC_FILE, ProofOutput, ProvingBackend, write_json};

/// Runs the snarkjs command line tool.
///
/// Every call works in a fresh temporary directory, so concurrent cases never share files.
#[derive(Clone, Debug)]
pub struct SnarkjsCli {
    bin: PathBuf,
}

impl Default for SnarkjsCli {
    fn default() -> Self {
        Self::new("snarkjs")
    }
}

impl SnarkjsCli {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Runs the command and returns its stdout, failing with stderr on a non-zero exit.
    async fn execute(&self, command: &mut Command) -> Result<String> {
        debug!(?command, "running snarkjs");
        let output = command
            .output()
            .await
            .with_context(|| format!("Failed to spawn {}", self.bin.display()))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.bin.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ProvingBackend for SnarkjsCli {
    async fn full_prove(
        &self,
        scheme: ProofScheme,
        input: &serde_json::Value,
        circuit: &CircuitArtifacts,
    ) -> Result<ProofOutput> {
        let workdir = TempDir::new()?;
        let input_path = workdir.path().join("input.json");
        tokio::fs::write(&input_path, serde_json::to_vec(input)?).await?;

        info!(%scheme, "proving {}", circuit.wasm.display());
        self.execute(
            Command::new(&self.bin)
                .arg(scheme.as_str())
                .arg("fullprove")
                .arg(&input_path)
                .arg(&circuit.wasm)
                .arg(&circuit.zkey)
                .arg(workdir.path().join(PROOF_FILE))
                .arg(workdir.path().join(PUBLIC_FILE)),
        )
        .await?;

        ProofOutput::load(workdir.path()).await
    }

    async fn export_calldata(
        &self,
        _scheme: ProofScheme,
        proof: &ProofValue,
        public_signals: &ProofValue,
    ) -> Result<String> {
        // snarkjs reads the protocol from the proof file itself.
        let workdir = TempDir::new()?;
        let proof_path = workdir.path().join(PROOF_FILE);
        let public_path = workdir.path().join(PUBLIC_FILE);
        write_json(&proof_path, proof).await?;
        write_json(&public_path, public_signals).await?;

        let stdout = self
            .execute(
                Command::new(&self.bin)
                    .args(["zkey", "export", "soliditycalldata"])
                    .arg(&public_path)
                    .arg(&proof_path),
            )
            .await?;

        Ok(stdout.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_binary_fails_to_spawn() {
        let cli = SnarkjsCli::new("/nonexistent/snarkjs");
        let circuit = CircuitArtifacts {
            wasm: "c.wasm".into(),
            zkey: "c.zkey".into(),
        };

        let err = cli.full_prove(ProofScheme::Groth16, &json!({ "a": "1" }), &circuit).await.unwrap_err();
        assert!(err.to_string().contains("Failed to spawn"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_reports_stderr() {
        let cli = SnarkjsCli::new("false");
        let err = cli
            .export_calldata(ProofScheme::Plonk, &json!({}).into(), &json!([]).into())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_export_returns_trimmed_stdout() {
        // `echo` prints its arguments, standing in for the calldata line.
        let cli = SnarkjsCli::new("echo");
        let stdout = cli
            .export_calldata(ProofScheme::Groth16, &json!({}).into(), &json!([]).into())
            .await
            .unwrap();
        assert!(stdout.starts_with("zkey export soliditycalldata"));
        assert!(stdout.ends_with(PROOF_FILE));
    }
}
