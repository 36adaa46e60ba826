//! Verifier contract collaborators.
use async_trait::async_trait;
use proof_calldata::{Calldata, CalldataError, ProofScheme};
use thiserror::Error;

pub mod local;
pub mod rpc;

pub use local::{LocalGroth16Verifier, VerificationKeyJson};
pub use rpc::RpcVerifier;

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("{0} calldata is not supported by this verifier")]
    UnsupportedScheme(ProofScheme),

    #[error("expected {expected} public inputs, got {actual}")]
    InputLength { expected: usize, actual: usize },

    #[error("public input {0} is not below the scalar field modulus")]
    InputOutOfField(usize),

    #[error("proof point {0} is not a valid curve point")]
    InvalidPoint(&'static str),

    #[error("invalid verification key: {0}")]
    VerificationKey(String),

    #[error("pairing check failed: {0}")]
    Pairing(String),

    #[error("invalid RPC endpoint: {0}")]
    Endpoint(String),

    #[error("invalid signer key: {0}")]
    Signer(String),

    #[error("deployment failed: {0}")]
    Deploy(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("failed to decode verifier return value: {0}")]
    Decode(#[from] alloy_sol_types::Error),

    #[error(transparent)]
    Calldata(#[from] CalldataError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A deployed (or emulated) `verifyProof` entry point.
///
/// `Ok(false)` means the proof was well formed and rejected. Calls the contract would
/// revert on surface as errors.
#[async_trait]
pub trait VerifierContract: Send + Sync {
    async fn verify(&self, calldata: &Calldata) -> Result<bool, VerifierError>;
}
