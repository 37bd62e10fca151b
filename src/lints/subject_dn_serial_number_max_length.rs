//! RFC 5280 Appendix A: ub-serial-number INTEGER ::= 64.

use crate::models::certificate::Certificate;
use crate::models::LintResult;
use crate::registry::{Lint, LintCheck};
use crate::source::{dates, LintSource};

const MAX_CHARS: usize = 64;

pub struct SubjectDnSerialNumberMaxLength;

impl LintCheck for SubjectDnSerialNumberMaxLength {
    fn check_applies(&self, cert: &Certificate) -> bool {
        cert.subject.serial_number.iter().any(|s| !s.is_empty())
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        for value in &cert.subject.serial_number {
            let count = value.chars().count();
            if count > MAX_CHARS {
                return LintResult::error(format!(
                    "subject serialNumber has {} characters, limit is {}",
                    count, MAX_CHARS
                ));
            }
        }
        LintResult::pass()
    }
}

pub(crate) fn lint() -> Lint {
    Lint::new(
        "e_subject_dn_serial_number_max_length",
        LintSource::Rfc5280,
        SubjectDnSerialNumberMaxLength,
    )
    .description("The 'Serial Number' field of the subject MUST be less than 64 characters")
    .citation("RFC 5280: Appendix A")
    .effective(dates::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lints::fixtures;
    use crate::models::LintStatus;

    fn with_serial(value: String) -> Certificate {
        let mut cert = fixtures::leaf();
        cert.subject.serial_number.push(value);
        cert
    }

    #[test]
    fn test_64_code_points_pass() {
        // multi-byte characters count once each
        let cert = with_serial("é".repeat(64));
        assert!(cert.subject.serial_number[0].len() > 64);
        assert_eq!(SubjectDnSerialNumberMaxLength.execute(&cert).status, LintStatus::Pass);
    }

    #[test]
    fn test_65_code_points_is_error() {
        let cert = with_serial("9".repeat(65));
        assert_eq!(SubjectDnSerialNumberMaxLength.execute(&cert).status, LintStatus::Error);
    }

    #[test]
    fn test_absent_serial_does_not_apply() {
        assert!(!SubjectDnSerialNumberMaxLength.check_applies(&fixtures::leaf()));
        assert!(!SubjectDnSerialNumberMaxLength.check_applies(&with_serial(String::new())));
    }
}
