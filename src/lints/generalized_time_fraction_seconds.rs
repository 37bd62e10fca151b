//! RFC 5280 4.1.2.5.2: GeneralizedTime values MUST NOT include fractional
//! seconds.
//!
//! The check works on the encoded content octets. The suffix decides the
//! form and each form has a fixed maximum length without fractions:
//! `YYYYMMDDHHMMSSZ` (15), `YYYYMMDDHHMMSS+hhmm` (19), `YYYYMMDDHHMMSS` (14).

use crate::models::certificate::{Asn1Time, Certificate, TimeTag};
use crate::models::LintResult;
use crate::registry::{Lint, LintCheck};
use crate::source::{dates, LintSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeForm {
    /// Ends in `Z`.
    Zulu,
    /// Ends in `+hhmm` or `-hhmm`.
    Offset,
    /// No zone designator.
    Local,
}

impl TimeForm {
    pub fn max_len(&self) -> usize {
        match self {
            TimeForm::Zulu => 15,
            TimeForm::Offset => 19,
            TimeForm::Local => 14,
        }
    }
}

/// Form of an encoded time, or `None` for an empty value.
pub fn classify_time(bytes: &[u8]) -> Option<TimeForm> {
    let last = *bytes.last()?;
    if last == b'Z' {
        return Some(TimeForm::Zulu);
    }
    let sign = bytes.len().checked_sub(5).and_then(|i| bytes.get(i));
    if matches!(sign, Some(b'+') | Some(b'-')) {
        return Some(TimeForm::Offset);
    }
    Some(TimeForm::Local)
}

fn is_generalized(t: Option<&Asn1Time>) -> bool {
    t.is_some_and(|t| t.tag == TimeTag::GeneralizedTime)
}

/// Detail message when `t` violates the rule.
fn check_fraction(field: &str, t: &Asn1Time) -> Option<String> {
    let bytes = t.bytes();
    match classify_time(bytes) {
        None => Some(format!("{} is an empty GeneralizedTime", field)),
        Some(form) if bytes.len() > form.max_len() => Some(format!(
            "{} '{}' is longer than {} bytes; fractional seconds are not allowed",
            field,
            t.value,
            form.max_len()
        )),
        Some(_) => None,
    }
}

pub struct GeneralizedTimeFraction;

impl LintCheck for GeneralizedTimeFraction {
    fn check_applies(&self, cert: &Certificate) -> bool {
        let (before, after) = cert.validity_times();
        is_generalized(before) || is_generalized(after)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let (before, after) = cert.validity_times();
        let fields = [("notBefore", before), ("notAfter", after)];
        for (field, time) in fields {
            let Some(time) = time.filter(|t| t.tag == TimeTag::GeneralizedTime) else {
                continue;
            };
            if let Some(detail) = check_fraction(field, time) {
                return LintResult::error(detail);
            }
        }
        LintResult::pass()
    }
}

pub(crate) fn lint() -> Lint {
    Lint::new(
        "e_generalized_time_includes_fraction_seconds",
        LintSource::Rfc5280,
        GeneralizedTimeFraction,
    )
    .description("Generalized time values MUST NOT include fractional seconds")
    .citation("RFC 5280: 4.1.2.5.2")
    .effective(dates::rfc2459())
}
