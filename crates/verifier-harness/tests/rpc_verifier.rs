//! Checks against verifier contracts deployed on a live node.
//!
//! Run with `cargo test -p verifier-harness --test rpc_verifier -- --ignored` after exporting
//! `HARNESS_RPC_URL` and the verifier addresses.
use alloy_primitives::Address;
use proof_calldata::ProofScheme;
use verifier_harness::runner::run_invalid_case;
use verifier_harness::verifier::RpcVerifier;

fn verifier_from_env(address_var: &str) -> RpcVerifier {
    let rpc_url = std::env::var("HARNESS_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".into());
    let address: Address = std::env::var(address_var)
        .unwrap_or_else(|_| panic!("{address_var} must be set"))
        .parse()
        .unwrap();
    RpcVerifier::connect(&rpc_url, address).unwrap()
}

fn inputs_from_env(var: &str) -> usize {
    std::env::var(var).ok().and_then(|n| n.parse().ok()).unwrap_or(1)
}

#[tokio::test]
#[ignore = "requires a node with a deployed groth16 verifier (GROTH16_VERIFIER_ADDRESS)"]
async fn test_groth16_verifier_rejects_zero_proof() {
    let verifier = verifier_from_env("GROTH16_VERIFIER_ADDRESS");
    let n_inputs = inputs_from_env("GROTH16_VERIFIER_INPUTS");

    assert!(!run_invalid_case(&verifier, ProofScheme::Groth16, n_inputs).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a node with a deployed plonk verifier (PLONK_VERIFIER_ADDRESS)"]
async fn test_plonk_verifier_rejects_zero_proof() {
    let verifier = verifier_from_env("PLONK_VERIFIER_ADDRESS");
    let n_inputs = inputs_from_env("PLONK_VERIFIER_INPUTS");

    assert!(!run_invalid_case(&verifier, ProofScheme::Plonk, n_inputs).await.unwrap());
}
