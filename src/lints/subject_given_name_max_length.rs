//! RFC 5280 A.1: ub-given-name-length INTEGER ::= 16.

use crate::models::certificate::Certificate;
use crate::models::LintResult;
use crate::registry::{Lint, LintCheck};
use crate::source::{dates, LintSource};

const MAX_CHARS: usize = 16;

pub struct SubjectGivenNameMaxLength;

impl LintCheck for SubjectGivenNameMaxLength {
    fn check_applies(&self, _cert: &Certificate) -> bool {
        true
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        match cert
            .subject
            .given_name
            .iter()
            .find(|g| g.chars().count() > MAX_CHARS)
        {
            Some(g) => LintResult::error(format!("givenName '{}' exceeds {} characters", g, MAX_CHARS)),
            None => LintResult::pass(),
        }
    }
}

pub(crate) fn lint() -> Lint {
    Lint::new(
        "e_subject_given_name_max_length",
        LintSource::Rfc5280,
        SubjectGivenNameMaxLength,
    )
    .description("The 'GivenName' field of the subject MUST be less than 17 characters")
    .citation("RFC 5280: A.1")
    .effective(dates::rfc2459())
}
