use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PatchError, Result};
use crate::patcher::{ContractPatcher, DEFAULT_PRAGMA_VERSION, PatchOutcome};

/// A contract file and the name its verifier should be declared under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchTarget {
    pub path: PathBuf,
    pub contract_name: String,
}

impl PatchTarget {
    pub fn new(path: impl Into<PathBuf>, contract_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contract_name: contract_name.into(),
        }
    }
}

impl FromStr for PatchTarget {
    type Err = PatchError;

    /// Parses `<path>=<ContractName>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.rsplit_once('=') {
            Some((path, name)) if !path.is_empty() && !name.is_empty() => Ok(Self::new(path, name)),
            _ => Err(PatchError::InvalidTarget(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchManifest {
    /// Version written into every caret pragma.
    pub pragma_version: String,

    /// Contracts to patch, in order.
    pub targets: Vec<PatchTarget>,
}

impl Default for PatchManifest {
    fn default() -> Self {
        Self {
            pragma_version: DEFAULT_PRAGMA_VERSION.into(),
            targets: vec![
                PatchTarget::new("contracts/HelloWorldVerifier.sol", "HelloWorldVerifier"),
                PatchTarget::new("contracts/Multiplier3Verifier_groth16.sol", "Multiplier3GrothVerifier"),
                PatchTarget::new("contracts/Multiplier3Verifier_plonk.sol", "Multiplier3PlonkVerifier"),
            ],
        }
    }
}

impl PatchManifest {
    /// Loads a manifest from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        info!("reading patch manifest at {}", path.display());
        let yaml = fs::read_to_string(path).map_err(|source| PatchError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&yaml).map_err(|source| PatchError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Patches every target, resolving relative paths against `root`.
    ///
    /// Stops at the first file that cannot be read or written.
    pub fn apply(&self, root: &Path) -> Result<Vec<(PathBuf, PatchOutcome)>> {
        let patcher = ContractPatcher::new(&self.pragma_version);
        let mut outcomes = Vec::with_capacity(self.targets.len());

        for target in &self.targets {
            let path = root.join(&target.path);
            info!("bumping {} as {}", path.display(), target.contract_name);
            let outcome = patcher.bump_contract(&path, &target.contract_name)?;
            outcomes.push((path, outcome));
        }

        Ok(outcomes)
    }
}
