use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::{debug, warn};

use crate::error::{PatchError, Result};

/// Compiler version every patched verifier is pinned to.
pub const DEFAULT_PRAGMA_VERSION: &str = "^0.8.0";

// Caret pragmas only. PLONK templates declare a `>=0.7.0 <0.9.0` range and are left alone.
static PRAGMA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pragma solidity \^\d+\.\d+\.\d+").expect("pragma pattern"));
static VERIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"contract .*Verifier").expect("verifier pattern"));

/// Which of the two rewrites found something to replace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    pub pragma_replaced: bool,
    pub name_replaced: bool,
}

#[derive(Debug, Clone)]
pub struct ContractPatcher {
    pragma_version: String,
}

impl Default for ContractPatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PRAGMA_VERSION)
    }
}

impl ContractPatcher {
    pub fn new(pragma_version: impl Into<String>) -> Self {
        Self {
            pragma_version: pragma_version.into(),
        }
    }

    pub fn pragma_version(&self) -> &str {
        &self.pragma_version
    }

    /// Replaces the first caret pragma and the first `contract ...Verifier` declaration.
    ///
    /// The passes are independent; a pass whose pattern does not match leaves the text as is.
    pub fn patch_source(&self, source: &str, contract_name: &str) -> (String, PatchOutcome) {
        let pragma = format!("pragma solidity {}", self.pragma_version);
        let pragma_replaced = PRAGMA_PATTERN.is_match(source);
        let bumped = PRAGMA_PATTERN.replace(source, NoExpand(&pragma));

        let declaration = format!("contract {contract_name}");
        let name_replaced = VERIFIER_PATTERN.is_match(&bumped);
        let renamed = VERIFIER_PATTERN.replace(&bumped, NoExpand(&declaration));

        (
            renamed.into_owned(),
            PatchOutcome {
                pragma_replaced,
                name_replaced,
            },
        )
    }

    /// Patches the contract at `path` and overwrites it in place.
    pub fn bump_contract(&self, path: &Path, contract_name: &str) -> Result<PatchOutcome> {
        let content = fs::read_to_string(path).map_err(|source| PatchError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (bumped, outcome) = self.patch_source(&content, contract_name);
        if !outcome.pragma_replaced {
            warn!("no caret pragma in {}, keeping the declared version", path.display());
        }
        if !outcome.name_replaced {
            warn!("no verifier declaration in {}, name left unchanged", path.display());
        }

        fs::write(path, bumped).map_err(|source| PatchError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?outcome, "patched {}", path.display());

        Ok(outcome)
    }
}
