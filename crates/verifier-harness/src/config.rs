use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use anyhow::{Context, Result, anyhow};
use proof_calldata::ProofScheme;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::prover::CircuitArtifacts;
use crate::runner::VerificationCase;

/// Overrides `private_key` when set.
pub const PRIVATE_KEY_ENV: &str = "HARNESS_PRIVATE_KEY";
/// Overrides `rpc_url` when set.
pub const RPC_URL_ENV: &str = "HARNESS_RPC_URL";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON-RPC endpoint of the chain hosting the verifier contracts.
    pub rpc_url: String,

    /// snarkjs executable used for proving and calldata export.
    pub snarkjs_bin: String,

    /// Hex key used to deploy verifiers from bytecode.
    pub private_key: Option<String>,

    pub cases: Vec<CaseConfig>,
}

/// One circuit, one input, one verifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseConfig {
    pub name: String,
    pub scheme: ProofScheme,
    pub circuit_wasm: PathBuf,
    pub zkey: PathBuf,
    pub input: serde_json::Value,

    /// Already deployed verifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,

    /// Hex creation bytecode, deployed once per run when no address is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode: Option<PathBuf>,

    /// snarkjs `verification_key.json`, required by `--local`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_key: Option<PathBuf>,

    /// Directory with a pre-generated `proof.json` and `public.json`. Skips snarkjs when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<PathBuf>,
}

impl CaseConfig {
    /// A case laid out the way `circom` and `snarkjs` leave a compiled circuit in `dir`.
    fn new(name: &str, scheme: ProofScheme, dir: &str, circuit: &str, input: serde_json::Value) -> Self {
        let root = Path::new(dir);
        Self {
            name: name.into(),
            scheme,
            circuit_wasm: root.join(format!("{circuit}_js")).join(format!("{circuit}.wasm")),
            zkey: root.join("circuit_final.zkey"),
            input,
            contract_address: None,
            bytecode: None,
            verification_key: None,
            artifacts: None,
        }
    }

    pub fn to_case(&self) -> VerificationCase {
        VerificationCase {
            name: self.name.clone(),
            scheme: self.scheme,
            input: self.input.clone(),
            circuit: CircuitArtifacts {
                wasm: self.circuit_wasm.clone(),
                zkey: self.zkey.clone(),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".into(),
            snarkjs_bin: "snarkjs".into(),
            private_key: None,
            cases: vec![
                CaseConfig::new(
                    "HelloWorld",
                    ProofScheme::Groth16,
                    "contracts/circuits/HelloWorld",
                    "HelloWorld",
                    json!({ "a": "1", "b": "2" }),
                ),
                CaseConfig::new(
                    "Multiplier3-groth16",
                    ProofScheme::Groth16,
                    "contracts/circuits/Multiplier3_groth16",
                    "Multiplier3",
                    json!({ "a": "1", "b": "2", "c": "3" }),
                ),
                CaseConfig::new(
                    "Multiplier3-plonk",
                    ProofScheme::Plonk,
                    "contracts/circuits/Multiplier3_plonk",
                    "Multiplier3",
                    json!({ "a": "1", "b": "2", "c": "3" }),
                ),
                CaseConfig::new(
                    "SystemOfEquations",
                    ProofScheme::Groth16,
                    "contracts/bonus/SystemOfEquations",
                    "SystemOfEquations",
                    json!({
                        "x": ["15", "17", "19"],
                        "A": [["1", "1", "1"], ["1", "2", "3"], ["2", "-1", "1"]],
                        "b": ["51", "106", "32"],
                    }),
                ),
            ],
        }
    }
}

impl Config {
    /// The default harness home directory.
    pub const APP_HOME: &str = ".verifier-harness";
    /// The default configuration directory.
    pub const CONFIG_DIR: &str = "config";
    /// The default configuration file in YAML format.
    pub const CONFIG_FILE: &str = "config.yaml";

    /// Initializes the local configuration directory and writes the default config if missing.
    pub fn init() -> Result<()> {
        let config_path = Self::config_path()?;
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir)?;
        }

        if !config_path.exists() {
            info!("creating default config at {config_path:?}");
            let yaml = serde_yaml::to_string(&Config::default())?;
            fs::write(&config_path, yaml)?;
        } else {
            info!("config file already exists at {config_path:?}");
        }

        Ok(())
    }

    /// Returns the default application config path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow!("cannot find home directory"))?
            .join(Self::APP_HOME)
            .join(Self::CONFIG_DIR)
            .join(Self::CONFIG_FILE))
    }

    /// Loads the config from the harness home directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("config file not found at {}", path.display()));
        }

        info!("reading config file at {}", path.display());
        let yaml = fs::read_to_string(path).context("Failed to read config file from path")?;
        let config = serde_yaml::from_str(&yaml).context("Failed to parse config file")?;

        Ok(config)
    }

    /// RPC endpoint, preferring the environment over the file.
    pub fn effective_rpc_url(&self) -> String {
        std::env::var(RPC_URL_ENV).unwrap_or_else(|_| self.rpc_url.clone())
    }

    /// Deployer key, preferring the environment over the file.
    pub fn effective_private_key(&self) -> Option<String> {
        std::env::var(PRIVATE_KEY_ENV).ok().or_else(|| self.private_key.clone())
    }

    /// Cases selected by name, or all of them.
    pub fn select_cases(&self, name: Option<&str>) -> Result<Vec<&CaseConfig>> {
        match name {
            None => Ok(self.cases.iter().collect()),
            Some(name) => {
                let case = self
                    .cases
                    .iter()
                    .find(|case| case.name == name)
                    .ok_or_else(|| anyhow!("no case named {name} in config"))?;
                Ok(vec![case])
            }
        }
    }
}
