//! Groth16 prover/verifier orchestration for the predicate circuits.
//!
//! SECURITY NOTE (prototype): Groth16 requires a trusted setup that produces a proving key (PK)
//! and verifying key (VK). This demo generates keys locally, once per predicate. In production,
//! an MPC ceremony (or a transparent system) should be used.

use crate::circuit::{AgeCircuit, CountryCircuit, SalaryCircuit};
use crate::constants::{AGE_THRESHOLD, RESTRICTED_COUNTRY_CODES, SALARY_COUNT, SALARY_THRESHOLD};
use crate::types::{PredicateInput, PredicateKind};
use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZkError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("predicate not satisfied by the supplied input")]
    PredicateUnsatisfied,

    #[error("proof verification failed")]
    VerificationFailed,

    #[error("arkworks error: {0}")]
    Ark(String),
}

/// Run the circuit on a fresh constraint system and check the assignment
/// satisfies it.
///
/// Groth16 proving does not check satisfiability itself; an unsatisfied
/// predicate is caught here instead of surfacing later as a proof that fails
/// verification.
fn check_satisfied<C: ConstraintSynthesizer<Fr>>(circuit: C) -> Result<(), ZkError> {
    let cs = ConstraintSystem::<Fr>::new_ref();

    // Some gadgets cannot even compute their witnesses for a failing input
    // (the inequality gadget divides by the difference), so a synthesis error
    // here is the same outcome as an unsatisfied system.
    if circuit.generate_constraints(cs.clone()).is_err() {
        return Err(ZkError::PredicateUnsatisfied);
    }

    if !cs.is_satisfied().map_err(|e| ZkError::Ark(format!("{e}")))? {
        return Err(ZkError::PredicateUnsatisfied);
    }
    Ok(())
}

/// Generate a Groth16 keypair for one predicate's circuit.
///
/// For a given predicate this must be run once; the keys play the role of a
/// precompiled circuit artifact. Assignments in the setup instance are
/// irrelevant, only the constraint shape matters.
pub fn setup_keys(
    kind: PredicateKind,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(ProvingKey<Bn254>, VerifyingKey<Bn254>), ZkError> {
    match kind {
        PredicateKind::Age => {
            let circuit = AgeCircuit { age: AGE_THRESHOLD, threshold: AGE_THRESHOLD };
            Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
        }
        PredicateKind::Country => {
            let circuit = CountryCircuit { country: 0, restricted: RESTRICTED_COUNTRY_CODES };
            Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
        }
        PredicateKind::Salary => {
            let circuit = SalaryCircuit {
                salaries: [SALARY_THRESHOLD; SALARY_COUNT],
                threshold: SALARY_THRESHOLD,
            };
            Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
        }
    }
    .map_err(|e| ZkError::Ark(format!("{e}")))
}

/// Prove one predicate over the supplied input.
///
/// Returns the proof together with the public inputs it commits to, in the
/// circuit's allocation order.
pub fn prove(
    input: &PredicateInput,
    pk: &ProvingKey<Bn254>,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(Proof<Bn254>, Vec<Fr>), ZkError> {
    let public_inputs = input.public_inputs();

    let proof = match input {
        PredicateInput::Age { age, threshold } => {
            let circuit = AgeCircuit { age: *age, threshold: *threshold };
            check_satisfied(circuit.clone())?;
            Groth16::<Bn254>::prove(pk, circuit, rng)
        }
        PredicateInput::Country { country, restricted } => {
            let circuit = CountryCircuit { country: *country, restricted: *restricted };
            check_satisfied(circuit.clone())?;
            Groth16::<Bn254>::prove(pk, circuit, rng)
        }
        PredicateInput::Salary { salaries, threshold } => {
            let circuit = SalaryCircuit { salaries: *salaries, threshold: *threshold };
            check_satisfied(circuit.clone())?;
            Groth16::<Bn254>::prove(pk, circuit, rng)
        }
    }
    .map_err(|e| ZkError::Ark(format!("{e}")))?;

    Ok((proof, public_inputs))
}

/// Verify a predicate proof against its public inputs.
pub fn verify(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    public_inputs: &[Fr],
) -> Result<(), ZkError> {
    let ok = Groth16::<Bn254>::verify(vk, public_inputs, proof)
        .map_err(|e| ZkError::Ark(format!("{e}")))?;
    if !ok {
        return Err(ZkError::VerificationFailed);
    }
    Ok(())
}

/// Serialize a proving key to bytes.
pub fn serialize_pk(pk: &ProvingKey<Bn254>) -> Result<Vec<u8>, ZkError> {
    let mut out = Vec::new();
    pk.serialize_compressed(&mut out)
        .map_err(|e| ZkError::Serialization(format!("{e}")))?;
    Ok(out)
}

pub fn deserialize_pk(bytes: &[u8]) -> Result<ProvingKey<Bn254>, ZkError> {
    ProvingKey::<Bn254>::deserialize_compressed(bytes)
        .map_err(|e| ZkError::Serialization(format!("{e}")))
}

pub fn serialize_vk(vk: &VerifyingKey<Bn254>) -> Result<Vec<u8>, ZkError> {
    let mut out = Vec::new();
    vk.serialize_compressed(&mut out)
        .map_err(|e| ZkError::Serialization(format!("{e}")))?;
    Ok(out)
}

pub fn deserialize_vk(bytes: &[u8]) -> Result<VerifyingKey<Bn254>, ZkError> {
    VerifyingKey::<Bn254>::deserialize_compressed(bytes)
        .map_err(|e| ZkError::Serialization(format!("{e}")))
}

pub fn serialize_proof(proof: &Proof<Bn254>) -> Result<Vec<u8>, ZkError> {
    let mut out = Vec::new();
    proof
        .serialize_compressed(&mut out)
        .map_err(|e| ZkError::Serialization(format!("{e}")))?;
    Ok(out)
}

pub fn deserialize_proof(bytes: &[u8]) -> Result<Proof<Bn254>, ZkError> {
    Proof::<Bn254>::deserialize_compressed(bytes)
        .map_err(|e| ZkError::Serialization(format!("{e}")))
}
