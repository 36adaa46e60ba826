//! Bumps the pragma and contract name of generated verifier contracts.
//!
//! ## Usage
//! Run from the project root after the verifiers have been exported:
//! ```shell
//! cargo run -p solidity-patch --bin bump-solidity
//! cargo run -p solidity-patch --bin bump-solidity -- --target contracts/FooVerifier.sol=FooVerifier
//! ```
use std::path::PathBuf;

use clap::Parser;
use solidity_patch::{PatchManifest, PatchTarget};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bump-solidity", version, about = "Patch generated verifier contracts", long_about = None)]
struct Args {
    /// YAML manifest listing the contracts to patch
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Directory relative target paths are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Pragma version to write, overriding the manifest
    #[arg(long)]
    pragma: Option<String>,

    /// Ad-hoc `<path>=<ContractName>` targets, replacing the manifest's list
    #[arg(long = "target")]
    targets: Vec<PatchTarget>,
}

fn main() -> anyhow::Result<()> {
    let mut filter = EnvFilter::new("info");
    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        if let Ok(parsed) = env_filter.parse() {
            filter = filter.add_directive(parsed);
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let mut manifest = match &args.manifest {
        Some(path) => PatchManifest::load(path)?,
        None => PatchManifest::default(),
    };
    if let Some(pragma) = args.pragma {
        manifest.pragma_version = pragma;
    }
    if !args.targets.is_empty() {
        manifest.targets = args.targets;
    }

    let outcomes = manifest.apply(&args.root)?;
    info!("[Done] patched {} contract(s)", outcomes.len());

    Ok(())
}
