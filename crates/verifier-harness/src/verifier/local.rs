//! In-process Groth16 verification over BN254.
//!
//! Reproduces what a snarkjs-generated Groth16 verifier contract computes, so the harness
//! can run without a node.
use std::path::Path;

use alloy_primitives::U256;
use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInt, PrimeField};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, VerifyingKey, prepare_verifying_key};
use async_trait::async_trait;
use proof_calldata::{Calldata, Groth16Calldata, ProofScheme, parse_uint};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{VerifierContract, VerifierError};

/// snarkjs `verification_key.json` for a Groth16 circuit.
///
/// Points are projective coordinate strings: G1 as `[x, y, z]`, G2 as
/// `[[x.c0, x.c1], [y.c0, y.c1], [z.c0, z.c1]]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKeyJson {
    pub protocol: String,
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: Vec<String>,
    pub vk_beta_2: Vec<Vec<String>>,
    pub vk_gamma_2: Vec<Vec<String>>,
    pub vk_delta_2: Vec<Vec<String>>,
    #[serde(rename = "IC")]
    pub ic: Vec<Vec<String>>,
}

impl VerificationKeyJson {
    pub fn load(path: &Path) -> Result<Self, VerifierError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Converts the key into arkworks form, validating every point.
    pub fn to_verifying_key(&self) -> Result<VerifyingKey<Bn254>, VerifierError> {
        if self.protocol != "groth16" {
            return Err(VerifierError::VerificationKey(format!("protocol is {}", self.protocol)));
        }
        if self.ic.len() != self.n_public + 1 {
            return Err(VerifierError::VerificationKey(format!(
                "{} IC points for {} public inputs",
                self.ic.len(),
                self.n_public
            )));
        }

        Ok(VerifyingKey {
            alpha_g1: key_g1(&self.vk_alpha_1, "vk_alpha_1")?,
            beta_g2: key_g2(&self.vk_beta_2, "vk_beta_2")?,
            gamma_g2: key_g2(&self.vk_gamma_2, "vk_gamma_2")?,
            delta_g2: key_g2(&self.vk_delta_2, "vk_delta_2")?,
            gamma_abc_g1: self
                .ic
                .iter()
                .map(|point| key_g1(point, "IC"))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Groth16 verifier backed by `ark-groth16`.
pub struct LocalGroth16Verifier {
    pvk: PreparedVerifyingKey<Bn254>,
    n_public: usize,
}

impl LocalGroth16Verifier {
    pub fn new(vk: &VerifyingKey<Bn254>) -> Self {
        Self {
            pvk: prepare_verifying_key(vk),
            n_public: vk.gamma_abc_g1.len().saturating_sub(1),
        }
    }

    pub fn from_json(vk: &VerificationKeyJson) -> Result<Self, VerifierError> {
        Ok(Self::new(&vk.to_verifying_key()?))
    }

    /// Loads a snarkjs `verification_key.json`.
    pub fn load(path: &Path) -> Result<Self, VerifierError> {
        debug!("loading verification key from {}", path.display());
        Self::from_json(&VerificationKeyJson::load(path)?)
    }

    pub fn n_public(&self) -> usize {
        self.n_public
    }

    pub fn verify_groth16(&self, calldata: &Groth16Calldata) -> Result<bool, VerifierError> {
        if calldata.input.len() != self.n_public {
            return Err(VerifierError::InputLength {
                expected: self.n_public,
                actual: calldata.input.len(),
            });
        }

        let inputs = calldata
            .input
            .iter()
            .enumerate()
            .map(|(index, value)| Fr::from_bigint(limbs(*value)).ok_or(VerifierError::InputOutOfField(index)))
            .collect::<Result<Vec<_>, _>>()?;

        // Calldata carries G2 coordinates as [c1, c0].
        let [bx, by] = calldata.b;
        let proof = Proof {
            a: g1(calldata.a, "A")?,
            b: g2([bx[1], bx[0]], [by[1], by[0]], "B")?,
            c: g1(calldata.c, "C")?,
        };

        Groth16::<Bn254>::verify_proof(&self.pvk, &proof, &inputs).map_err(|e| VerifierError::Pairing(e.to_string()))
    }
}

#[async_trait]
impl VerifierContract for LocalGroth16Verifier {
    async fn verify(&self, calldata: &Calldata) -> Result<bool, VerifierError> {
        match calldata {
            Calldata::Groth16(groth16) => self.verify_groth16(groth16),
            Calldata::Plonk(_) => Err(VerifierError::UnsupportedScheme(ProofScheme::Plonk)),
        }
    }
}

fn limbs(value: U256) -> BigInt<4> {
    BigInt::new(value.into_limbs())
}

fn fq(value: U256, label: &'static str) -> Result<Fq, VerifierError> {
    Fq::from_bigint(limbs(value)).ok_or(VerifierError::InvalidPoint(label))
}

/// Affine G1 point from `[x, y]`; `(0, 0)` is the point at infinity.
fn g1([x, y]: [U256; 2], label: &'static str) -> Result<G1Affine, VerifierError> {
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::zero());
    }

    let point = G1Affine::new_unchecked(fq(x, label)?, fq(y, label)?);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(VerifierError::InvalidPoint(label));
    }
    Ok(point)
}

/// Affine G2 point from `[x.c0, x.c1]`, `[y.c0, y.c1]`; all zero is the point at infinity.
fn g2(x: [U256; 2], y: [U256; 2], label: &'static str) -> Result<G2Affine, VerifierError> {
    if x.iter().chain(&y).all(|c| c.is_zero()) {
        return Ok(G2Affine::zero());
    }

    let point = G2Affine::new_unchecked(
        Fq2::new(fq(x[0], label)?, fq(x[1], label)?),
        Fq2::new(fq(y[0], label)?, fq(y[1], label)?),
    );
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(VerifierError::InvalidPoint(label));
    }
    Ok(point)
}

fn key_uint(text: &str, label: &'static str) -> Result<U256, VerifierError> {
    parse_uint(text).ok_or_else(|| VerifierError::VerificationKey(format!("{label} coordinate {text:?}")))
}

/// Reads `[x, y, z]`, where `z` is `1` for affine points and `0` for infinity.
fn key_g1(point: &[String], label: &'static str) -> Result<G1Affine, VerifierError> {
    let [x, y, z] = point else {
        return Err(VerifierError::VerificationKey(format!("{label} must have 3 coordinates")));
    };
    if key_uint(z, label)?.is_zero() {
        return Ok(G1Affine::zero());
    }
    g1([key_uint(x, label)?, key_uint(y, label)?], label)
        .map_err(|_| VerifierError::VerificationKey(format!("{label} is not on the curve")))
}

fn key_g2(point: &[Vec<String>], label: &'static str) -> Result<G2Affine, VerifierError> {
    let [x, y, z] = point else {
        return Err(VerifierError::VerificationKey(format!("{label} must have 3 coordinates")));
    };
    if key_pair(z, label)?.iter().all(|c| c.is_zero()) {
        return Ok(G2Affine::zero());
    }
    g2(key_pair(x, label)?, key_pair(y, label)?, label)
        .map_err(|_| VerifierError::VerificationKey(format!("{label} is not on the curve")))
}

fn key_pair(coords: &[String], label: &'static str) -> Result<[U256; 2], VerifierError> {
    match coords {
        [c0, c1] => Ok([key_uint(c0, label)?, key_uint(c1, label)?]),
        _ => Err(VerifierError::VerificationKey(format!("{label} coordinates must be pairs"))),
    }
}
