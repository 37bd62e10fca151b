//! RFC 5280 4.2: a certificate MUST NOT include more than one instance of a
//! particular extension.

use crate::models::certificate::Certificate;
use crate::models::LintResult;
use crate::registry::{Lint, LintCheck};
use crate::source::{dates, LintSource};

pub struct ExtDuplicateExtension;

impl LintCheck for ExtDuplicateExtension {
    fn check_applies(&self, cert: &Certificate) -> bool {
        cert.version == 3
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        // Pairwise is fine: extension lists stay around a dozen entries.
        let exts = &cert.extensions;
        for (i, a) in exts.iter().enumerate() {
            if let Some(b) = exts.iter().skip(i + 1).find(|b| b.oid == a.oid) {
                return LintResult::error(format!("extension {} appears more than once", b.oid));
            }
        }
        LintResult::pass()
    }
}

pub(crate) fn lint() -> Lint {
    Lint::new(
        "e_ext_duplicate_extension",
        LintSource::Rfc5280,
        ExtDuplicateExtension,
    )
    .description("A certificate MUST NOT include more than one instance of a particular extension")
    .citation("RFC 5280: 4.2")
    .effective(dates::rfc2459())
}
