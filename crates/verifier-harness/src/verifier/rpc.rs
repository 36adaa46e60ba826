use alloy::dyn_abi::DynSolValue;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::{Address, Bytes, U256, keccak256};
use alloy_sol_types::SolValue;
use async_trait::async_trait;
use proof_calldata::Calldata;
use tracing::{debug, info};
use url::Url;

use super::{VerifierContract, VerifierError};

const PLONK_SIGNATURE: &str = "verifyProof(bytes,uint256[])";

/// A verifier contract reached over JSON-RPC with `eth_call`.
#[derive(Clone)]
pub struct RpcVerifier {
    provider: DynProvider,
    address: Address,
}

impl RpcVerifier {
    /// Points at an already deployed verifier.
    pub fn connect(rpc_url: &str, address: Address) -> Result<Self, VerifierError> {
        let url = parse_endpoint(rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self { provider, address })
    }

    /// Deploys `bytecode` from the account of `private_key` and points at the new contract.
    pub async fn deploy(rpc_url: &str, private_key: &str, bytecode: Bytes) -> Result<Self, VerifierError> {
        let url = parse_endpoint(rpc_url)?;
        let signer: PrivateKeySigner = private_key
            .trim_start_matches("0x")
            .parse()
            .map_err(|e| VerifierError::Signer(format!("{e}")))?;
        let deployer = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url);

        let tx = TransactionRequest::default().with_deploy_code(bytecode);
        let receipt = provider
            .send_transaction(tx)
            .await?
            .get_receipt()
            .await
            .map_err(|e| VerifierError::Deploy(e.to_string()))?;

        if !receipt.status() {
            return Err(VerifierError::Deploy(format!("transaction {} reverted", receipt.transaction_hash)));
        }
        let address = receipt
            .contract_address
            .ok_or_else(|| VerifierError::Deploy("receipt carries no contract address".into()))?;
        info!(%deployer, %address, "deployed verifier");

        Ok(Self {
            provider: provider.erased(),
            address,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl VerifierContract for RpcVerifier {
    async fn verify(&self, calldata: &Calldata) -> Result<bool, VerifierError> {
        let input = encode_verify_call(calldata)?;
        debug!(address = %self.address, len = input.len(), "calling verifyProof");

        let tx = TransactionRequest::default().with_to(self.address).with_input(input);
        let ret = self.provider.call(tx).await?;

        Ok(bool::abi_decode(&ret)?)
    }
}

fn parse_endpoint(rpc_url: &str) -> Result<Url, VerifierError> {
    Url::parse(rpc_url).map_err(|e| VerifierError::Endpoint(format!("{rpc_url}: {e}")))
}

/// ABI encodes the `verifyProof` call matching the shape of `calldata`.
///
/// Groth16 verifiers take the inputs as a fixed-size array, so the selector depends on
/// the input count.
pub fn encode_verify_call(calldata: &Calldata) -> Result<Bytes, VerifierError> {
    let (signature, args) = match calldata {
        Calldata::Groth16(groth16) => (
            format!(
                "verifyProof(uint256[2],uint256[2][2],uint256[2],uint256[{}])",
                groth16.input.len()
            ),
            vec![
                fixed(&groth16.a),
                DynSolValue::FixedArray(groth16.b.iter().map(|row| fixed(row)).collect()),
                fixed(&groth16.c),
                fixed(&groth16.input),
            ],
        ),
        Calldata::Plonk(plonk) => (
            PLONK_SIGNATURE.to_string(),
            vec![
                DynSolValue::Bytes(plonk.proof_bytes()?.to_vec()),
                DynSolValue::Array(plonk.inputs.iter().copied().map(uint).collect()),
            ],
        ),
    };

    let mut input = keccak256(signature.as_bytes())[..4].to_vec();
    input.extend(DynSolValue::Tuple(args).abi_encode_params());
    Ok(input.into())
}

fn uint(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

fn fixed(values: &[U256]) -> DynSolValue {
    DynSolValue::FixedArray(values.iter().copied().map(uint).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;
    use proof_calldata::{Groth16Calldata, PlonkCalldata};

    mod groth16_abi {
        alloy::sol! {
            function verifyProof(uint256[2] a, uint256[2][2] b, uint256[2] c, uint256[1] input) external view returns (bool);
        }
    }

    mod plonk_abi {
        alloy::sol! {
            function verifyProof(bytes proof, uint256[] pubSignals) external view returns (bool);
        }
    }

    fn u(value: u64) -> U256 {
        U256::from(value)
    }

    #[test]
    fn test_groth16_encoding_matches_contract_abi() {
        let calldata = Groth16Calldata::from_flat(&(1..=9).map(u).collect::<Vec<_>>()).unwrap();

        let encoded = encode_verify_call(&Calldata::Groth16(calldata)).unwrap();
        let expected = groth16_abi::verifyProofCall {
            a: [u(1), u(2)],
            b: [[u(3), u(4)], [u(5), u(6)]],
            c: [u(7), u(8)],
            input: [u(9)],
        }
        .abi_encode();

        assert_eq!(encoded.to_vec(), expected);
        assert_eq!(encoded.len(), 4 + 32 * 9);
    }

    #[test]
    fn test_selector_tracks_input_count() {
        let one = encode_verify_call(&Calldata::Groth16(Groth16Calldata::zeroed(1))).unwrap();
        let three = encode_verify_call(&Calldata::Groth16(Groth16Calldata::zeroed(3))).unwrap();

        assert_ne!(one[..4], three[..4]);
        assert_eq!(three.len(), 4 + 32 * 11);
    }

    #[test]
    fn test_plonk_encoding_matches_contract_abi() {
        let calldata = PlonkCalldata {
            proof: "0x0102ff".to_string(),
            inputs: vec![u(6), u(7)],
        };

        let encoded = encode_verify_call(&Calldata::Plonk(calldata)).unwrap();
        let expected = plonk_abi::verifyProofCall {
            proof: Bytes::from(vec![0x01, 0x02, 0xff]),
            pubSignals: vec![u(6), u(7)],
        }
        .abi_encode();

        assert_eq!(encoded.to_vec(), expected);
    }

    #[test]
    fn test_plonk_zeroed_proof_encodes() {
        let encoded = encode_verify_call(&Calldata::Plonk(PlonkCalldata::zeroed(1))).unwrap();
        assert_eq!(encoded[..4], keccak256(PLONK_SIGNATURE.as_bytes())[..4]);
    }

    #[test]
    fn test_bad_blob_is_rejected_before_the_call() {
        let calldata = PlonkCalldata {
            proof: "deadbeef".to_string(),
            inputs: vec![],
        };
        let err = encode_verify_call(&Calldata::Plonk(calldata)).unwrap_err();
        assert!(matches!(err, VerifierError::Calldata(_)));
    }

    #[test]
    fn test_connect_rejects_bad_url() {
        let err = RpcVerifier::connect("not a url", Address::ZERO).err().unwrap();
        assert!(matches!(err, VerifierError::Endpoint(_)));
    }

    #[test]
    fn test_connect_over_http() {
        let address = Address::repeat_byte(0x11);
        let verifier = RpcVerifier::connect("http://127.0.0.1:8545", address).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(verifier.address(), address);
    }
}
