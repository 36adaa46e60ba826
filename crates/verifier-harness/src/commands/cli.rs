use std::path::PathBuf;

use clap::{Parser, Subcommand};
use proof_calldata::ProofScheme;

pub const VERSION: &str = "v0.1.0";

#[derive(Parser)]
#[command(name = "verifier-harness", version = VERSION, about = "snarkjs verifier contract harness", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration and home directory
    Init {},

    /// Prove every configured case and check it against its verifier
    Run {
        /// Only run the case with this name
        #[arg(long)]
        case: Option<String>,

        /// Verify Groth16 proofs in process against each case's verification key
        #[arg(long, default_value = "false")]
        local: bool,
    },

    /// Reshape a stored proof into verifier call arguments
    Calldata {
        /// Proof scheme of the artifacts (groth16 or plonk)
        #[arg(long)]
        scheme: ProofScheme,

        /// Path to proof.json
        #[arg(long)]
        proof: PathBuf,

        /// Path to public.json
        #[arg(long)]
        public: PathBuf,

        /// Export through this snarkjs executable instead of the native exporter
        #[arg(long)]
        snarkjs: Option<PathBuf>,
    },

    /// Show the harness version
    Version {},
}
