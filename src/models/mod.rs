//! Shared data models: lint verdicts, the per-certificate report, and the
//! certificate view lints read from.

pub mod certificate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Verdict of one lint, ordered by severity.
///
/// `NA` sorts last but is never counted as a severity: it only records that
/// the lint did not apply to the certificate.
pub enum LintStatus {
    Reserved,
    Pass,
    Info,
    Warn,
    Error,
    Fatal,
    #[serde(rename = "na")]
    NA,
}

impl LintStatus {
    pub const ALL: [LintStatus; 7] = [
        LintStatus::Reserved,
        LintStatus::Pass,
        LintStatus::Info,
        LintStatus::Warn,
        LintStatus::Error,
        LintStatus::Fatal,
        LintStatus::NA,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LintStatus::Reserved => "reserved",
            LintStatus::Pass => "pass",
            LintStatus::Info => "info",
            LintStatus::Warn => "warn",
            LintStatus::Error => "error",
            LintStatus::Fatal => "fatal",
            LintStatus::NA => "na",
        }
    }
}

impl fmt::Display for LintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Outcome of running one lint against one certificate.
pub struct LintResult {
    pub status: LintStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LintResult {
    pub fn new(status: LintStatus) -> Self {
        Self {
            status,
            details: None,
        }
    }

    pub fn pass() -> Self {
        Self::new(LintStatus::Pass)
    }

    pub fn na() -> Self {
        Self::new(LintStatus::NA)
    }

    pub fn warn(details: impl Into<String>) -> Self {
        Self::new(LintStatus::Warn).with_details(details)
    }

    pub fn error(details: impl Into<String>) -> Self {
        Self::new(LintStatus::Error).with_details(details)
    }

    pub fn fatal(details: impl Into<String>) -> Self {
        Self::new(LintStatus::Fatal).with_details(details)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Verdicts for every lint that passed the date gate, keyed by lint name.
///
/// Keys iterate in name order, so two reports built from the same inputs
/// serialize identically.
pub struct Report {
    pub evaluated_at: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub results: BTreeMap<String, LintResult>,
}

impl Report {
    pub fn new(evaluated_at: DateTime<Utc>, not_before: DateTime<Utc>) -> Self {
        Self {
            evaluated_at,
            not_before,
            results: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LintResult> {
        self.results.get(name)
    }

    pub fn status_of(&self, name: &str) -> Option<LintStatus> {
        self.get(name).map(|r| r.status)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.results.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LintResult)> {
        self.results.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn insert(&mut self, name: impl Into<String>, result: LintResult) {
        self.results.insert(name.into(), result);
    }
}
