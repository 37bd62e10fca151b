//! BRs 6.1.6: a DSA public key value must satisfy `2 <= y <= p - 2`, so that
//! it has the unique correct representation in the field.

use crate::models::certificate::{Certificate, PublicKey};
use crate::models::LintResult;
use crate::registry::{Lint, LintCheck};
use crate::source::{dates, LintSource};
use num_bigint::BigUint;

pub struct DsaUniqueCorrectRepresentation;

impl LintCheck for DsaUniqueCorrectRepresentation {
    fn check_applies(&self, cert: &Certificate) -> bool {
        matches!(cert.public_key, PublicKey::Dsa { .. })
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let (p, y) = match &cert.public_key {
            PublicKey::Dsa { p, y, .. } => (p, y),
            _ => return LintResult::na(),
        };
        let two = BigUint::from(2u32);
        if *p < two {
            return LintResult::error("DSA modulus p is smaller than 2");
        }
        let p_minus_two = p - &two;
        if *y < two || *y > p_minus_two {
            return LintResult::error("DSA public value y is outside [2, p-2]");
        }
        LintResult::pass()
    }
}

pub(crate) fn lint() -> Lint {
    Lint::new(
        "e_dsa_unique_correct_representation",
        LintSource::CabfBaselineRequirements,
        DsaUniqueCorrectRepresentation,
    )
    .description("DSA: Public key value has the unique correct representation in the field, and that the key has the correct order in the subgroup")
    .citation("BRs: 6.1.6")
    .effective(dates::cabf_br_effective())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lints::fixtures;
    use crate::models::LintStatus;

    fn dsa_cert(p: u32, y: u32) -> Certificate {
        let mut cert = fixtures::leaf();
        cert.public_key = PublicKey::Dsa {
            p: BigUint::from(p),
            q: BigUint::from(11u32),
            g: BigUint::from(4u32),
            y: BigUint::from(y),
        };
        cert
    }

    #[test]
    fn test_y_equal_p_minus_one_is_error() {
        let cert = dsa_cert(23, 22);
        assert!(DsaUniqueCorrectRepresentation.check_applies(&cert));
        assert_eq!(DsaUniqueCorrectRepresentation.execute(&cert).status, LintStatus::Error);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(DsaUniqueCorrectRepresentation.execute(&dsa_cert(23, 2)).status, LintStatus::Pass);
        assert_eq!(DsaUniqueCorrectRepresentation.execute(&dsa_cert(23, 21)).status, LintStatus::Pass);
        assert_eq!(DsaUniqueCorrectRepresentation.execute(&dsa_cert(23, 1)).status, LintStatus::Error);
    }

    #[test]
    fn test_tiny_modulus_does_not_underflow() {
        let result = DsaUniqueCorrectRepresentation.execute(&dsa_cert(1, 2));
        assert_eq!(result.status, LintStatus::Error);
    }

    #[test]
    fn test_non_dsa_does_not_apply() {
        assert!(!DsaUniqueCorrectRepresentation.check_applies(&fixtures::leaf()));
    }
}
