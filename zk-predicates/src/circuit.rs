//! R1CS circuits for the three eligibility predicates.
//!
//! Each circuit keeps the user's value(s) as witnesses and exposes only the
//! fixed parameters as public inputs:
//! 1) age: the prover's age meets a public threshold.
//! 2) country: the prover's country code differs from every public excluded code.
//! 3) salary: each of the prover's three salaries meets a public threshold.
//!
//! Privacy: the age, country code, and salaries are witnesses (never public).
//!
//! Comparisons use a subtraction range check: with `a`, `b`, and `a - b` all
//! constrained to the same bit width, the subtraction cannot wrap the field,
//! so a valid decomposition of `a - b` implies `a >= b`.

use crate::constants::{NUM_RESTRICTED, SALARY_COUNT};
use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

/// Convert little-endian boolean bits into an FpVar.
fn bits_le_to_fp(bits_le: &[Boolean<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    let mut acc = FpVar::<Fr>::constant(Fr::from(0u64));
    let mut coeff = FpVar::<Fr>::constant(Fr::from(1u64));

    for b in bits_le {
        // b ? coeff : 0
        let term = b.select(&coeff, &FpVar::<Fr>::constant(Fr::from(0u64)))?;
        acc += term;
        coeff += coeff.clone();
    }

    Ok(acc)
}

/// Enforce that `v` fits in `width` bits.
fn constrain_width(v: &FpVar<Fr>, width: usize) -> Result<(), SynthesisError> {
    let bits = v.to_bits_le()?;
    let low = bits[..width].to_vec();
    let reconstructed = bits_le_to_fp(&low)?;
    reconstructed.enforce_equal(v)
}

/// Enforce `a >= b` for two values already constrained to `width` bits.
fn enforce_geq(a: &FpVar<Fr>, b: &FpVar<Fr>, width: usize) -> Result<(), SynthesisError> {
    let diff = a - b;
    constrain_width(&diff, width)
}

/// Circuit proving the prover's age meets a public threshold.
#[derive(Clone, Debug)]
pub struct AgeCircuit {
    /// Private age in years.
    pub age: u8,
    /// Public minimum age.
    pub threshold: u8,
}

impl ConstraintSynthesizer<Fr> for AgeCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // IMPORTANT: Public input ordering MUST match `PredicateInput::public_inputs`.
        let threshold = FpVar::<Fr>::new_input(cs.clone(), || Ok(Fr::from(self.threshold as u64)))?;
        let age = FpVar::<Fr>::new_witness(cs.clone(), || Ok(Fr::from(self.age as u64)))?;

        constrain_width(&threshold, 8)?;
        constrain_width(&age, 8)?;

        enforce_geq(&age, &threshold, 8)
    }
}

/// Circuit proving the prover's country code is outside a public excluded set.
#[derive(Clone, Debug)]
pub struct CountryCircuit {
    /// Private country calling code.
    pub country: u16,
    /// Public excluded codes.
    pub restricted: [u16; NUM_RESTRICTED],
}

impl ConstraintSynthesizer<Fr> for CountryCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let mut excluded = Vec::with_capacity(NUM_RESTRICTED);
        for code in self.restricted {
            excluded.push(FpVar::<Fr>::new_input(cs.clone(), || Ok(Fr::from(code as u64)))?);
        }

        let country = FpVar::<Fr>::new_witness(cs.clone(), || Ok(Fr::from(self.country as u64)))?;
        constrain_width(&country, 16)?;

        for code in &excluded {
            country.enforce_not_equal(code)?;
        }

        Ok(())
    }
}

/// Circuit proving each of the prover's salaries meets a public threshold.
#[derive(Clone, Debug)]
pub struct SalaryCircuit {
    /// Private salary figures.
    pub salaries: [u32; SALARY_COUNT],
    /// Public minimum per salary.
    pub threshold: u32,
}

impl ConstraintSynthesizer<Fr> for SalaryCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let threshold = FpVar::<Fr>::new_input(cs.clone(), || Ok(Fr::from(self.threshold as u64)))?;
        constrain_width(&threshold, 32)?;

        for salary in self.salaries {
            let salary = FpVar::<Fr>::new_witness(cs.clone(), || Ok(Fr::from(salary as u64)))?;
            constrain_width(&salary, 32)?;
            enforce_geq(&salary, &threshold, 32)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RESTRICTED_COUNTRY_CODES;
    use ark_relations::r1cs::ConstraintSystem;

    fn satisfied<C: ConstraintSynthesizer<Fr>>(circuit: C) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        // The inequality gadget fails witness computation outright when the
        // compared values collide; that counts as unsatisfied here.
        if circuit.generate_constraints(cs.clone()).is_err() {
            return false;
        }
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn age_at_threshold_satisfies() {
        assert!(satisfied(AgeCircuit { age: 18, threshold: 18 }));
        assert!(satisfied(AgeCircuit { age: 25, threshold: 18 }));
    }

    #[test]
    fn age_below_threshold_is_unsatisfiable() {
        assert!(!satisfied(AgeCircuit { age: 17, threshold: 18 }));
        assert!(!satisfied(AgeCircuit { age: 0, threshold: 18 }));
    }

    #[test]
    fn unlisted_country_satisfies() {
        assert!(satisfied(CountryCircuit { country: 7, restricted: RESTRICTED_COUNTRY_CODES }));
    }

    #[test]
    fn each_restricted_country_is_unsatisfiable() {
        for code in RESTRICTED_COUNTRY_CODES {
            assert!(!satisfied(CountryCircuit { country: code, restricted: RESTRICTED_COUNTRY_CODES }));
        }
    }

    #[test]
    fn salaries_at_or_above_threshold_satisfy() {
        assert!(satisfied(SalaryCircuit { salaries: [100, 200, 300], threshold: 100 }));
    }

    #[test]
    fn one_low_salary_is_unsatisfiable() {
        assert!(!satisfied(SalaryCircuit { salaries: [100, 99, 300], threshold: 100 }));
    }
}
