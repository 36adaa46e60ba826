use anyhow::{Context, Result};
use proof_calldata::{Calldata, ProofScheme, unstringify};
use tracing::{debug, info};

use crate::prover::{CircuitArtifacts, ProvingBackend};
use crate::verifier::VerifierContract;

/// A circuit input to prove and check against one verifier.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationCase {
    pub name: String,
    pub scheme: ProofScheme,
    pub input: serde_json::Value,
    pub circuit: CircuitArtifacts,
}

/// Outcome of the valid and the zero-proof run of one case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaseReport {
    pub accepted: bool,
    pub rejected_zero_proof: bool,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.accepted && self.rejected_zero_proof
    }
}

/// Proves `case` and reshapes the exported calldata for its verifier.
pub async fn prepare_calldata(backend: &dyn ProvingBackend, case: &VerificationCase) -> Result<Calldata> {
    let output = backend
        .full_prove(case.scheme, &case.input, &case.circuit)
        .await
        .with_context(|| format!("proving {}", case.name))?;

    let proof = unstringify(output.proof);
    let public_signals = unstringify(output.public_signals);
    info!(case = %case.name, signals = %public_signals.to_json(), "proof generated");

    let formatted = backend
        .export_calldata(case.scheme, &proof, &public_signals)
        .await
        .with_context(|| format!("exporting calldata for {}", case.name))?;
    debug!(case = %case.name, %formatted, "exported calldata");

    Ok(Calldata::parse(case.scheme, &formatted)?)
}

/// Runs the full pipeline for `case` and returns the verifier's answer.
pub async fn run_case(
    backend: &dyn ProvingBackend,
    verifier: &dyn VerifierContract,
    case: &VerificationCase,
) -> Result<bool> {
    let calldata = prepare_calldata(backend, case).await?;
    Ok(verifier.verify(&calldata).await?)
}

/// Submits an all-zero proof with `n_inputs` zero inputs. A sound verifier returns `false`.
pub async fn run_invalid_case(verifier: &dyn VerifierContract, scheme: ProofScheme, n_inputs: usize) -> Result<bool> {
    let calldata = Calldata::zeroed(scheme, n_inputs);
    Ok(verifier.verify(&calldata).await?)
}

/// Runs the valid proof of `case`, then the zero proof with the same input count.
pub async fn run_suite(
    backend: &dyn ProvingBackend,
    verifier: &dyn VerifierContract,
    case: &VerificationCase,
) -> Result<CaseReport> {
    let calldata = prepare_calldata(backend, case).await?;
    let accepted = verifier
        .verify(&calldata)
        .await
        .with_context(|| format!("verifying {}", case.name))?;

    let rejected_zero_proof = !run_invalid_case(verifier, case.scheme, calldata.inputs().len())
        .await
        .with_context(|| format!("verifying zero proof for {}", case.name))?;

    Ok(CaseReport {
        accepted,
        rejected_zero_proof,
    })
}
