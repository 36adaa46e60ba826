//! Reshapes snarkjs proof artifacts into the arguments of generated verifier contracts.
//!
//! The flow is: parse prover output into [`ProofValue`], normalize numeric strings with
//! [`unstringify`], render the calldata string with [`export_calldata`] (or let snarkjs do it),
//! then reshape that string with [`Calldata::parse`].

pub mod calldata;
pub mod error;
pub mod groth16;
pub mod plonk;
pub mod scheme;
pub mod value;

pub use calldata::{Calldata, export_calldata};
pub use error::{CalldataError, Result};
pub use groth16::Groth16Calldata;
pub use plonk::PlonkCalldata;
pub use scheme::ProofScheme;
pub use value::{ProofValue, parse_uint, stringify, unstringify};
