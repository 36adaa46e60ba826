//! End-to-end Groth16 runs against the in-process verifier.
//!
//! Proofs come from arkworks for an `a * b = c` circuit and are written out in the snarkjs
//! JSON layout, so they travel the same path as `snarkjs groth16 fullprove` output.
use std::path::Path;

use alloy_primitives::U256;
use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_ff::{BigInt, PrimeField};
use ark_groth16::{Groth16, Proof, VerifyingKey};
use ark_relations::lc;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_snark::SNARK;
use ark_std::rand::SeedableRng;
use ark_std::rand::rngs::StdRng;
use proof_calldata::{Calldata, ProofScheme};
use serde_json::{Value, json};
use tempfile::TempDir;
use verifier_harness::prover::{ArtifactProver, CircuitArtifacts, ProvingBackend};
use verifier_harness::runner::{VerificationCase, prepare_calldata, run_case, run_invalid_case, run_suite};
use verifier_harness::verifier::{LocalGroth16Verifier, VerifierContract, VerifierError};

#[derive(Clone)]
struct MultiplierCircuit {
    a: Option<Fr>,
    b: Option<Fr>,
}

impl ConstraintSynthesizer<Fr> for MultiplierCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let a = cs.new_witness_variable(|| self.a.ok_or(SynthesisError::AssignmentMissing))?;
        let b = cs.new_witness_variable(|| self.b.ok_or(SynthesisError::AssignmentMissing))?;
        let c = cs.new_input_variable(|| {
            let a = self.a.ok_or(SynthesisError::AssignmentMissing)?;
            let b = self.b.ok_or(SynthesisError::AssignmentMissing)?;
            Ok(a * b)
        })?;
        cs.enforce_constraint(lc!() + a, lc!() + b, lc!() + c)?;
        Ok(())
    }
}

fn dec<F: PrimeField<BigInt = BigInt<4>>>(value: F) -> String {
    U256::from_limbs(value.into_bigint().0).to_string()
}

fn g1_json(point: &G1Affine) -> Value {
    json!([dec(point.x), dec(point.y), "1"])
}

fn g2_json(point: &G2Affine) -> Value {
    json!([[dec(point.x.c0), dec(point.x.c1)], [dec(point.y.c0), dec(point.y.c1)], ["1", "0"]])
}

fn proof_json(proof: &Proof<Bn254>) -> Value {
    json!({
        "pi_a": g1_json(&proof.a),
        "pi_b": g2_json(&proof.b),
        "pi_c": g1_json(&proof.c),
        "protocol": "groth16",
        "curve": "bn128",
    })
}

fn verification_key_json(vk: &VerifyingKey<Bn254>) -> Value {
    json!({
        "protocol": "groth16",
        "curve": "bn128",
        "nPublic": vk.gamma_abc_g1.len() - 1,
        "vk_alpha_1": g1_json(&vk.alpha_g1),
        "vk_beta_2": g2_json(&vk.beta_g2),
        "vk_gamma_2": g2_json(&vk.gamma_g2),
        "vk_delta_2": g2_json(&vk.delta_g2),
        "IC": vk.gamma_abc_g1.iter().map(g1_json).collect::<Vec<_>>(),
    })
}

fn write(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

struct Fixture {
    dir: TempDir,
    verifier: LocalGroth16Verifier,
    case: VerificationCase,
}

impl Fixture {
    /// Proves `a * b` and stores proof, public signals and verification key as snarkjs would.
    fn multiplier(a: u64, b: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(a * 1_000 + b);
        let (pk, vk) =
            Groth16::<Bn254>::circuit_specific_setup(MultiplierCircuit { a: None, b: None }, &mut rng).unwrap();
        let circuit = MultiplierCircuit {
            a: Some(Fr::from(a)),
            b: Some(Fr::from(b)),
        };
        let proof = Groth16::<Bn254>::prove(&pk, circuit, &mut rng).unwrap();

        let dir = TempDir::new().unwrap();
        write(dir.path(), "proof.json", &proof_json(&proof));
        write(dir.path(), "public.json", &json!([dec(Fr::from(a * b))]));
        write(dir.path(), "verification_key.json", &verification_key_json(&vk));

        let verifier = LocalGroth16Verifier::load(&dir.path().join("verification_key.json")).unwrap();
        let case = VerificationCase {
            name: "Multiplier".into(),
            scheme: ProofScheme::Groth16,
            input: json!({ "a": a.to_string(), "b": b.to_string() }),
            circuit: CircuitArtifacts {
                wasm: dir.path().join("Multiplier.wasm"),
                zkey: dir.path().join("circuit_final.zkey"),
            },
        };

        Self { dir, verifier, case }
    }

    fn prover(&self) -> ArtifactProver {
        ArtifactProver::new(self.dir.path())
    }
}

#[tokio::test]
async fn test_valid_proof_passes_and_zero_proof_fails() {
    let fixture = Fixture::multiplier(3, 11);

    let report = run_suite(&fixture.prover(), &fixture.verifier, &fixture.case).await.unwrap();
    assert!(report.accepted);
    assert!(report.rejected_zero_proof);
    assert!(report.passed());
}

#[tokio::test]
async fn test_zero_proof_is_rejected() {
    let fixture = Fixture::multiplier(2, 5);

    let accepted = run_invalid_case(&fixture.verifier, ProofScheme::Groth16, 1).await.unwrap();
    assert!(!accepted);
}

#[tokio::test]
async fn test_wrong_public_signal_is_rejected() {
    let fixture = Fixture::multiplier(4, 7);
    write(fixture.dir.path(), "public.json", &json!(["29"]));

    let accepted = run_case(&fixture.prover(), &fixture.verifier, &fixture.case).await.unwrap();
    assert!(!accepted);
}

#[tokio::test]
async fn test_unswapped_g2_coordinates_do_not_verify() {
    let fixture = Fixture::multiplier(6, 9);
    let Calldata::Groth16(mut calldata) = prepare_calldata(&fixture.prover(), &fixture.case).await.unwrap() else {
        panic!("expected groth16 calldata");
    };
    assert!(fixture.verifier.verify_groth16(&calldata).unwrap());

    calldata.b = calldata.b.map(|[c1, c0]| [c0, c1]);
    let result = fixture.verifier.verify(&Calldata::Groth16(calldata)).await;
    assert!(!matches!(result, Ok(true)));
}

#[tokio::test]
async fn test_signal_count_must_match_key() {
    let fixture = Fixture::multiplier(2, 2);
    write(fixture.dir.path(), "public.json", &json!(["4", "0"]));

    let err = run_case(&fixture.prover(), &fixture.verifier, &fixture.case).await.unwrap_err();
    let verifier_err = err.downcast_ref::<VerifierError>().unwrap();
    assert!(matches!(verifier_err, VerifierError::InputLength { expected: 1, actual: 2 }));
}

#[tokio::test]
async fn test_exported_calldata_matches_stored_proof() {
    let fixture = Fixture::multiplier(3, 3);
    let prover = fixture.prover();
    let output = prover.full_prove(ProofScheme::Groth16, &fixture.case.input, &fixture.case.circuit).await.unwrap();

    let calldata = prepare_calldata(&prover, &fixture.case).await.unwrap();
    let pi_a = output.proof.get("pi_a").unwrap().to_json();
    assert_eq!(calldata.to_json()["a"][0], pi_a[0]);
    assert_eq!(calldata.inputs(), &[U256::from(9u64)]);
}
