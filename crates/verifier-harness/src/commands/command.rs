use std::path::{Path, PathBuf};

use alloy_primitives::Bytes;
use anyhow::{Context, Result, anyhow, bail};
use proof_calldata::{Calldata, ProofScheme, export_calldata, unstringify};
use tracing::{error, info};

use crate::commands::cli::VERSION;
use crate::config::{CaseConfig, Config};
use crate::prover::{ArtifactProver, ProvingBackend, SnarkjsCli, read_json};
use crate::runner::{CaseReport, run_suite};
use crate::verifier::{LocalGroth16Verifier, RpcVerifier, VerifierContract};

pub fn init() -> Result<()> {
    Config::init()
}

/// Runs the selected cases and fails if any of them did not pass.
pub async fn run(case_name: Option<String>, local: bool) -> Result<()> {
    let config = Config::load()?;
    let mut failures = 0;

    for case_config in config.select_cases(case_name.as_deref())? {
        info!("running case {}", case_config.name);
        let outcome = async {
            let backend = backend_for(&config, case_config);
            let verifier = verifier_for(&config, case_config, local).await?;
            run_suite(backend.as_ref(), verifier.as_ref(), &case_config.to_case()).await
        }
        .await;

        match outcome {
            Ok(report) => {
                print_report(&case_config.name, &report);
                if !report.passed() {
                    failures += 1;
                }
            }
            Err(err) => {
                error!("case {} failed: {err:#}", case_config.name);
                println!("FAIL {}: {err:#}", case_config.name);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} case(s) failed");
    }
    info!("[Done] all cases passed");
    Ok(())
}

/// Prints the call arguments for a stored proof as JSON.
pub async fn calldata(scheme: ProofScheme, proof: PathBuf, public: PathBuf, snarkjs: Option<PathBuf>) -> Result<()> {
    let proof = unstringify(read_json(&proof).await?);
    let public_signals = unstringify(read_json(&public).await?);

    let formatted = match snarkjs {
        Some(bin) => SnarkjsCli::new(bin).export_calldata(scheme, &proof, &public_signals).await?,
        None => export_calldata(scheme, &proof, &public_signals)?,
    };
    let calldata = Calldata::parse(scheme, &formatted)?;

    println!("{}", serde_json::to_string_pretty(&calldata.to_json())?);
    Ok(())
}

pub fn version() {
    println!("version: {VERSION}");
}

fn print_report(name: &str, report: &CaseReport) {
    if report.accepted {
        println!("PASS {name}: valid proof accepted");
    } else {
        println!("FAIL {name}: valid proof rejected");
    }
    if report.rejected_zero_proof {
        println!("PASS {name}: zero proof rejected");
    } else {
        println!("FAIL {name}: zero proof accepted");
    }
}

fn backend_for(config: &Config, case: &CaseConfig) -> Box<dyn ProvingBackend> {
    match &case.artifacts {
        Some(dir) => Box::new(ArtifactProver::new(dir)),
        None => Box::new(SnarkjsCli::new(&config.snarkjs_bin)),
    }
}

async fn verifier_for(config: &Config, case: &CaseConfig, local: bool) -> Result<Box<dyn VerifierContract>> {
    if local {
        if case.scheme != ProofScheme::Groth16 {
            bail!("--local only verifies groth16 cases, {} is {}", case.name, case.scheme);
        }
        let path = case
            .verification_key
            .as_ref()
            .ok_or_else(|| anyhow!("case {} has no verification_key", case.name))?;
        return Ok(Box::new(LocalGroth16Verifier::load(path)?));
    }

    let rpc_url = config.effective_rpc_url();
    if let Some(address) = case.contract_address {
        return Ok(Box::new(RpcVerifier::connect(&rpc_url, address)?));
    }

    let bytecode_path = case
        .bytecode
        .as_ref()
        .ok_or_else(|| anyhow!("case {} has neither contract_address nor bytecode", case.name))?;
    let private_key = config
        .effective_private_key()
        .ok_or_else(|| anyhow!("deploying {} needs private_key or HARNESS_PRIVATE_KEY", case.name))?;

    let bytecode = read_bytecode(bytecode_path)?;
    Ok(Box::new(RpcVerifier::deploy(&rpc_url, &private_key, bytecode).await?))
}

/// Reads hex creation bytecode as written by `solc --bin`.
fn read_bytecode(path: &Path) -> Result<Bytes> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let bytes = alloy_primitives::hex::decode(text.trim())
        .with_context(|| format!("{} is not hex bytecode", path.display()))?;
    Ok(bytes.into())
}
