//! Post-processing for verifier contracts emitted by the circuit toolchain.
//!
//! The generated sources pin an old compiler and a generic contract name. This crate
//! rewrites both in place so every verifier compiles under the project's pragma and
//! can be looked up by a distinct name.

pub mod error;
pub mod manifest;
pub mod patcher;

pub use error::{PatchError, Result};
pub use manifest::{PatchManifest, PatchTarget};
pub use patcher::{ContractPatcher, DEFAULT_PRAGMA_VERSION, PatchOutcome};
