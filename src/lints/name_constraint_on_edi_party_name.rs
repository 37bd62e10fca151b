//! RFC 5280 4.2.1.10: CAs SHOULD NOT impose name constraints on the
//! ediPartyName name form.

use crate::models::certificate::{oid, Certificate};
use crate::models::LintResult;
use crate::registry::{Lint, LintCheck};
use crate::source::{dates, LintSource};

pub struct NameConstraintOnEdiPartyName;

impl LintCheck for NameConstraintOnEdiPartyName {
    fn check_applies(&self, cert: &Certificate) -> bool {
        cert.has_extension(oid::NAME_CONSTRAINTS)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let Some(nc) = cert.name_constraints.as_ref() else {
            return LintResult::fatal("name constraints extension present but not decoded");
        };
        if !nc.permitted.edi_party_names.is_empty() || !nc.excluded.edi_party_names.is_empty() {
            return LintResult::warn("name constraints include the ediPartyName form");
        }
        LintResult::pass()
    }
}

pub(crate) fn lint() -> Lint {
    Lint::new(
        "w_name_constraint_on_edi_party_name",
        LintSource::Rfc5280,
        NameConstraintOnEdiPartyName,
    )
    .description("The name constraints extension SHOULD NOT impose constraints on the ediPartyName name form")
    .citation("RFC 5280: 4.2.1.10")
    .effective(dates::rfc5280())
}
