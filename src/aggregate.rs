//! Reduction of a report to an overall verdict, plus per-status counts for
//! printers and exit codes.

use crate::models::{LintStatus, Report};
use serde::Serialize;

/// Most severe non-`NA` status in the report; `Pass` when there is none.
pub fn aggregate(report: &Report) -> LintStatus {
    report
        .iter()
        .map(|(_, r)| r.status)
        .filter(|s| *s != LintStatus::NA)
        .fold(LintStatus::Pass, std::cmp::max)
}

/// Process exit code for an overall status: non-zero on Error or Fatal.
pub fn exit_code(status: LintStatus) -> i32 {
    match status {
        LintStatus::Error | LintStatus::Fatal => 1,
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Count of results per status.
pub struct Summary {
    pub pass: usize,
    pub info: usize,
    pub warn: usize,
    pub error: usize,
    pub fatal: usize,
    pub na: usize,
    pub reserved: usize,
    pub overall: LintStatus,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            pass: 0,
            info: 0,
            warn: 0,
            error: 0,
            fatal: 0,
            na: 0,
            reserved: 0,
            overall: LintStatus::Pass,
        }
    }
}

impl Summary {
    pub fn from_report(report: &Report) -> Self {
        let mut summary = Summary::default();
        for (_, r) in report.iter() {
            summary.add(r.status);
        }
        summary.overall = aggregate(report);
        summary
    }

    /// Combined counts over several reports; `overall` is the worst one.
    pub fn merge<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Self {
        let mut total = Summary::default();
        let mut overall = LintStatus::Pass;
        for report in reports {
            for (_, r) in report.iter() {
                total.add(r.status);
            }
            overall = overall.max(aggregate(report));
        }
        total.overall = overall;
        total
    }

    fn add(&mut self, status: LintStatus) {
        match status {
            LintStatus::Reserved => self.reserved += 1,
            LintStatus::Pass => self.pass += 1,
            LintStatus::Info => self.info += 1,
            LintStatus::Warn => self.warn += 1,
            LintStatus::Error => self.error += 1,
            LintStatus::Fatal => self.fatal += 1,
            LintStatus::NA => self.na += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.reserved + self.pass + self.info + self.warn + self.error + self.fatal + self.na
    }
}
