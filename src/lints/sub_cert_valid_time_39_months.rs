//! BRs 6.3.2: subscriber certificates issued after 1 July 2016 but before
//! 1 March 2018 MUST have a validity period of at most 39 months.

use crate::models::certificate::Certificate;
use crate::models::LintResult;
use crate::registry::{Lint, LintCheck};
use crate::source::{dates, LintSource};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

pub struct SubCertValidTimeLongerThan39Months;

impl LintCheck for SubCertValidTimeLongerThan39Months {
    fn check_applies(&self, cert: &Certificate) -> bool {
        cert.is_subscriber()
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let Some(limit) = add_months_rolling(cert.not_before, 39) else {
            return LintResult::fatal("notBefore + 39 months is not representable");
        };
        if limit < cert.not_after {
            return LintResult::error(format!(
                "validity ends {} which is after {}",
                cert.not_after.to_rfc3339(),
                limit.to_rfc3339()
            ));
        }
        LintResult::pass()
    }
}

/// `at` plus `months` calendar months. The day of month is kept and any
/// excess past the end of the target month spills into the next one, so
/// 30 November plus three months is 2 March (1 March in a leap year).
fn add_months_rolling(at: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    let date = at.date_naive();
    let index = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    let shifted = NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_days(Days::new(u64::from(date.day0())))?;
    Some(shifted.and_time(at.time()).and_utc())
}

pub(crate) fn lint() -> Lint {
    Lint::new(
        "e_sub_cert_valid_time_longer_than_39_months",
        LintSource::CabfBaselineRequirements,
        SubCertValidTimeLongerThan39Months,
    )
    .description("Subscriber Certificates issued after 1 July 2016 but prior to 1 March 2018 MUST have a Validity Period no greater than 39 months.")
    .citation("BRs: 6.3.2")
    .effective(dates::sub_cert_39_month())
    .ineffective(dates::sub_cert_825_days())
}
