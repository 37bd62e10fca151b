//! Lint provenance: the normative source a lint comes from and the dates
//! at which requirements came into force.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Standard or policy a lint enforces.
pub enum LintSource {
    #[serde(rename = "RFC5280")]
    Rfc5280,
    #[serde(rename = "CABF_BR")]
    CabfBaselineRequirements,
    #[serde(rename = "CABF_EV")]
    CabfEvGuidelines,
    #[serde(rename = "Mozilla")]
    MozillaRootStorePolicy,
    #[serde(rename = "Community")]
    Community,
}

impl LintSource {
    pub const ALL: [LintSource; 5] = [
        LintSource::Rfc5280,
        LintSource::CabfBaselineRequirements,
        LintSource::CabfEvGuidelines,
        LintSource::MozillaRootStorePolicy,
        LintSource::Community,
    ];

    /// Stable identifier used in config files, CLI flags and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LintSource::Rfc5280 => "RFC5280",
            LintSource::CabfBaselineRequirements => "CABF_BR",
            LintSource::CabfEvGuidelines => "CABF_EV",
            LintSource::MozillaRootStorePolicy => "Mozilla",
            LintSource::Community => "Community",
        }
    }
}

impl fmt::Display for LintSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LintSource {
    type Err = crate::error::SettingsError;

    /// Accepts the canonical identifiers case-insensitively, plus a few
    /// spelled-out aliases (`cabf_baseline_requirements`, `mozilla_policy`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        match norm.as_str() {
            "rfc5280" => Ok(LintSource::Rfc5280),
            "cabf_br" | "cabf_baseline_requirements" => Ok(LintSource::CabfBaselineRequirements),
            "cabf_ev" | "cabf_ev_guidelines" => Ok(LintSource::CabfEvGuidelines),
            "mozilla" | "mozilla_policy" | "mozilla_root_store_policy" => {
                Ok(LintSource::MozillaRootStorePolicy)
            }
            "community" => Ok(LintSource::Community),
            _ => Err(crate::error::SettingsError::UnknownSource(s.to_string())),
        }
    }
}

/// Calendar date, validated when evaluated in a `const` item.
///
/// # Panics
/// On a day that does not exist. In `const` position that is a build error.
pub const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

/// Midnight UTC at the start of `date`.
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Midnight UTC on a fixed day; panics like [`ymd`] on an invalid one.
pub fn utc_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    midnight(ymd(year, month, day))
}

/// Dates at which the standards referenced by the built-in lints took effect.
pub mod dates {
    use super::{midnight, ymd};
    use chrono::{DateTime, NaiveDate, Utc};

    const ZERO: NaiveDate = ymd(1, 1, 1);
    const RFC2459: NaiveDate = ymd(1999, 1, 1);
    const RFC5280: NaiveDate = ymd(2008, 5, 1);
    const CABF_BR_EFFECTIVE: NaiveDate = ymd(2012, 7, 1);
    const SUB_CERT_39_MONTH: NaiveDate = ymd(2016, 7, 1);
    const SUB_CERT_825_DAYS: NaiveDate = ymd(2018, 3, 1);

    /// Applies to every certificate ever issued.
    pub fn zero() -> DateTime<Utc> {
        midnight(ZERO)
    }

    pub fn rfc2459() -> DateTime<Utc> {
        midnight(RFC2459)
    }

    pub fn rfc5280() -> DateTime<Utc> {
        midnight(RFC5280)
    }

    /// CA/Browser Forum Baseline Requirements effective date.
    pub fn cabf_br_effective() -> DateTime<Utc> {
        midnight(CABF_BR_EFFECTIVE)
    }

    pub fn sub_cert_39_month() -> DateTime<Utc> {
        midnight(SUB_CERT_39_MONTH)
    }

    pub fn sub_cert_825_days() -> DateTime<Utc> {
        midnight(SUB_CERT_825_DAYS)
    }
}
