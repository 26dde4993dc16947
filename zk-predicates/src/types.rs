//! Predicate identifiers and typed inputs shared between the circuits and
//! the host-side prover/verifier.

use crate::constants::{
    AGE_THRESHOLD, NUM_RESTRICTED, RESTRICTED_COUNTRY_CODES, SALARY_COUNT, SALARY_THRESHOLD,
};
use ark_bn254::Fr;
use thiserror::Error;

/// The predicates a user can prove something about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredicateKind {
    Age,
    Country,
    Salary,
}

impl PredicateKind {
    pub const ALL: [PredicateKind; 3] = [Self::Age, Self::Country, Self::Salary];

    /// Stable lowercase key used in URLs and key-cache file names.
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Country => "country",
            Self::Salary => "salary",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "age" => Some(Self::Age),
            "country" => Some(Self::Country),
            "salary" => Some(Self::Salary),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Age => 0,
            Self::Country => 1,
            Self::Salary => 2,
        }
    }

    /// Hint shown next to the input field for this predicate.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Age => "Enter your age",
            Self::Country => "Enter your country calling code",
            Self::Salary => "Enter three salaries separated by commas",
        }
    }
}

/// Raw user input that failed validation before reaching a circuit.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid input for age; please enter a valid number")]
    Age,

    #[error("invalid input for country; please enter a numeric country code")]
    Country,

    #[error("invalid input for salary; please enter three numbers separated by commas")]
    Salary,
}

/// Parsed input for one predicate: the private value(s) plus the fixed
/// public parameters the circuit is instantiated with.
#[derive(Clone, Debug)]
pub enum PredicateInput {
    Age {
        age: u8,
        threshold: u8,
    },
    Country {
        country: u16,
        restricted: [u16; NUM_RESTRICTED],
    },
    Salary {
        salaries: [u32; SALARY_COUNT],
        threshold: u32,
    },
}

impl PredicateInput {
    /// Validate and parse one raw input string into the shape the
    /// predicate's circuit expects.
    pub fn parse(kind: PredicateKind, raw: &str) -> Result<Self, InputError> {
        match kind {
            PredicateKind::Age => {
                let age = raw.trim().parse::<u8>().map_err(|_| InputError::Age)?;
                Ok(Self::Age { age, threshold: AGE_THRESHOLD })
            }
            PredicateKind::Country => {
                let country = raw.trim().parse::<u16>().map_err(|_| InputError::Country)?;
                Ok(Self::Country { country, restricted: RESTRICTED_COUNTRY_CODES })
            }
            PredicateKind::Salary => {
                let parts: Vec<&str> = raw.split(',').collect();
                if parts.len() != SALARY_COUNT {
                    return Err(InputError::Salary);
                }

                let mut salaries = [0u32; SALARY_COUNT];
                for (slot, part) in salaries.iter_mut().zip(parts) {
                    *slot = part.trim().parse::<u32>().map_err(|_| InputError::Salary)?;
                }
                Ok(Self::Salary { salaries, threshold: SALARY_THRESHOLD })
            }
        }
    }

    pub fn kind(&self) -> PredicateKind {
        match self {
            Self::Age { .. } => PredicateKind::Age,
            Self::Country { .. } => PredicateKind::Country,
            Self::Salary { .. } => PredicateKind::Salary,
        }
    }

    /// Public inputs for this predicate's proof.
    ///
    /// ORDERING MUST MATCH the circuit's `new_input` allocation order.
    pub fn public_inputs(&self) -> Vec<Fr> {
        match self {
            Self::Age { threshold, .. } => vec![Fr::from(*threshold as u64)],
            Self::Country { restricted, .. } => {
                restricted.iter().map(|c| Fr::from(*c as u64)).collect()
            }
            Self::Salary { threshold, .. } => vec![Fr::from(*threshold as u64)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_age() {
        let input = PredicateInput::parse(PredicateKind::Age, " 25 ").unwrap();
        match input {
            PredicateInput::Age { age, threshold } => {
                assert_eq!(age, 25);
                assert_eq!(threshold, AGE_THRESHOLD);
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_age() {
        assert!(PredicateInput::parse(PredicateKind::Age, "eighteen").is_err());
        assert!(PredicateInput::parse(PredicateKind::Age, "").is_err());
        assert!(PredicateInput::parse(PredicateKind::Age, "-5").is_err());
    }

    #[test]
    fn parses_country_code() {
        let input = PredicateInput::parse(PredicateKind::Country, "7").unwrap();
        match input {
            PredicateInput::Country { country, restricted } => {
                assert_eq!(country, 7);
                assert_eq!(restricted, RESTRICTED_COUNTRY_CODES);
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_country() {
        assert!(PredicateInput::parse(PredicateKind::Country, "FR").is_err());
    }

    #[test]
    fn salary_requires_exactly_three_values() {
        assert!(PredicateInput::parse(PredicateKind::Salary, "100,200").is_err());
        assert!(PredicateInput::parse(PredicateKind::Salary, "100,200,300,400").is_err());
        assert!(PredicateInput::parse(PredicateKind::Salary, "100,200,300x").is_err());

        let input = PredicateInput::parse(PredicateKind::Salary, " 100, 200 ,300 ").unwrap();
        match input {
            PredicateInput::Salary { salaries, threshold } => {
                assert_eq!(salaries, [100, 200, 300]);
                assert_eq!(threshold, SALARY_THRESHOLD);
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn predicate_keys_round_trip() {
        for kind in PredicateKind::ALL {
            assert_eq!(PredicateKind::from_key(kind.as_key()), Some(kind));
        }
        assert_eq!(PredicateKind::from_key("height"), None);
    }
}
