//! Drives snarkjs proofs through the calldata adapter into verifier contracts.
//!
//! A [`runner::VerificationCase`] is proved by a [`prover::ProvingBackend`], its output is
//! reshaped with [`proof_calldata::Calldata`] and checked by a [`verifier::VerifierContract`].
//! Every case is also replayed with an all-zero proof, which must be rejected.

pub mod commands;
pub mod config;
pub mod prover;
pub mod runner;
pub mod verifier;
