//! Subject attribute values should not end with whitespace.

use crate::error::ConfigError;
use crate::models::certificate::Certificate;
use crate::models::LintResult;
use crate::registry::{Lint, LintCheck};
use crate::source::{dates, LintSource};
use regex::Regex;

#[derive(Default)]
pub struct SubjectDnTrailingWhitespace {
    trailing: Option<Regex>,
}

impl LintCheck for SubjectDnTrailingWhitespace {
    fn initialize(&mut self) -> Result<(), ConfigError> {
        if self.trailing.is_none() {
            self.trailing = Some(Regex::new(r"\s$")?);
        }
        Ok(())
    }

    fn check_applies(&self, cert: &Certificate) -> bool {
        !cert.subject.is_empty()
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let Some(re) = self.trailing.as_ref() else {
            return LintResult::fatal("lint used before initialization");
        };
        match cert.subject.attributes().find(|(_, v)| re.is_match(v)) {
            Some((attr, _)) => LintResult::warn(format!("subject {} has trailing whitespace", attr)),
            None => LintResult::pass(),
        }
    }
}

pub(crate) fn lint() -> Lint {
    Lint::new(
        "w_subject_dn_trailing_whitespace",
        LintSource::Community,
        SubjectDnTrailingWhitespace::default(),
    )
    .description("AttributeValue in subject RelativeDistinguishedName sequence SHOULD NOT have trailing whitespace")
    .citation("Community: names should be trimmed")
    .effective(dates::zero())
}
