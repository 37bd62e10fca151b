//! Execution driver: runs the selected lints of a registry against one
//! certificate and collects a `Report`.
//!
//! For every selected lint, in name order:
//! - date gate: skipped entirely (no report entry) when the certificate's
//!   notBefore lies outside `[effective, ineffective)`;
//! - applicability gate: `NA` without calling `execute`;
//! - otherwise `execute`, with panics converted into `Fatal`.
//!
//! Lints are independent pure functions of the certificate, so they fan out
//! over a bounded rayon pool and are merged once at the end.

use crate::error::EngineError;
use crate::models::certificate::Certificate;
use crate::models::{LintResult, Report};
use crate::registry::{Lint, LintFilter, Registry};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Upper bound on worker threads. `1` runs on the caller thread.
    pub concurrency: usize,
    pub filter: LintFilter,
    /// Lints slower than this are reported in the log.
    pub lint_budget: Option<Duration>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            filter: LintFilter::default(),
            lint_budget: None,
        }
    }
}

pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

pub struct Engine<'r> {
    registry: &'r Registry,
    options: EngineOptions,
    pool: Option<ThreadPool>,
}

/// Why a lint did not make it into the report.
enum Gate {
    NotYetEffective,
    NoLongerEffective,
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r Registry, options: EngineOptions) -> Result<Self, EngineError> {
        let pool = if options.concurrency > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(options.concurrency)
                    .thread_name(|i| format!("certlint-{}", i))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self {
            registry,
            options,
            pool,
        })
    }

    /// Sequential engine with no filter.
    pub fn sequential(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: EngineOptions {
                concurrency: 1,
                ..EngineOptions::default()
            },
            pool: None,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Lint one certificate as of `evaluated_at`.
    pub fn run(&self, cert: &Certificate, evaluated_at: DateTime<Utc>) -> Report {
        let selected: Vec<&Lint> = self.registry.select(&self.options.filter).collect();
        let evaluate = |lint: &&Lint| self.evaluate(lint, cert);

        let outcomes: Vec<(String, Option<LintResult>)> = match &self.pool {
            Some(pool) => pool.install(|| selected.par_iter().map(evaluate).collect()),
            None => selected.iter().map(evaluate).collect(),
        };

        let mut report = Report::new(evaluated_at, cert.not_before);
        for (name, outcome) in outcomes {
            if let Some(result) = outcome {
                report.insert(name, result);
            }
        }
        info!(
            selected = selected.len(),
            recorded = report.len(),
            "certificate linted"
        );
        report
    }

    /// Lint several certificates; reports come back in input order.
    pub fn run_many(&self, certs: &[Certificate], evaluated_at: DateTime<Utc>) -> Vec<Report> {
        certs.iter().map(|c| self.run(c, evaluated_at)).collect()
    }

    fn evaluate(&self, lint: &Lint, cert: &Certificate) -> (String, Option<LintResult>) {
        if let Some(gate) = date_gate(lint, cert) {
            let reason = match gate {
                Gate::NotYetEffective => "certificate predates lint",
                Gate::NoLongerEffective => "lint no longer effective",
            };
            debug!(lint = %lint.name, reason, "skipped");
            return (lint.name.clone(), None);
        }

        let started = Instant::now();
        let result = run_isolated(lint, cert);
        let elapsed = started.elapsed();
        if let Some(budget) = self.options.lint_budget {
            if elapsed > budget {
                warn!(
                    lint = %lint.name,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = budget.as_millis() as u64,
                    "lint exceeded execution budget"
                );
            }
        }
        debug!(lint = %lint.name, status = %result.status, "evaluated");
        (lint.name.clone(), Some(result))
    }
}

/// Gate on the certificate's notBefore only; the evaluation time is
/// recorded in the report but never filters lints.
fn date_gate(lint: &Lint, cert: &Certificate) -> Option<Gate> {
    let relevant = cert.not_before;
    if lint.effective_date.is_some_and(|eff| relevant < eff) {
        return Some(Gate::NotYetEffective);
    }
    if lint.ineffective_date.is_some_and(|ineff| relevant >= ineff) {
        return Some(Gate::NoLongerEffective);
    }
    None
}

/// Applicability then execution, with any panic turned into `Fatal`.
fn run_isolated(lint: &Lint, cert: &Certificate) -> LintResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        if lint.check_applies(cert) {
            lint.execute(cert)
        } else {
            LintResult::na()
        }
    }));
    match outcome {
        Ok(result) => result,
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            warn!(lint = %lint.name, error = %msg, "lint panicked");
            LintResult::fatal(format!("lint panicked: {}", msg))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::PublicKey;
    use crate::models::LintStatus;
    use crate::registry::{LintCheck, RegistryBuilder};
    use crate::source::{utc_date, LintSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed(LintStatus);

    impl LintCheck for Fixed {
        fn check_applies(&self, _cert: &Certificate) -> bool {
            true
        }

        fn execute(&self, _cert: &Certificate) -> LintResult {
            LintResult::new(self.0)
        }
    }

    struct NeverApplies {
        executed: Arc<AtomicUsize>,
    }

    impl LintCheck for NeverApplies {
        fn check_applies(&self, _cert: &Certificate) -> bool {
            false
        }

        fn execute(&self, _cert: &Certificate) -> LintResult {
            self.executed.fetch_add(1, Ordering::SeqCst);
            LintResult::error("should not run")
        }
    }

    struct Panics;

    impl LintCheck for Panics {
        fn check_applies(&self, _cert: &Certificate) -> bool {
            true
        }

        fn execute(&self, cert: &Certificate) -> LintResult {
            let empty: &[u8] = &[];
            // out-of-bounds on purpose
            let idx = cert.extensions.len() + 3;
            LintResult::new(if empty[idx] == 0 {
                LintStatus::Pass
            } else {
                LintStatus::Error
            })
        }
    }

    fn cert_at(not_before: DateTime<Utc>) -> Certificate {
        Certificate::new(3, not_before, utc_date(2030, 1, 1), PublicKey::Ed25519)
    }

    fn now() -> DateTime<Utc> {
        utc_date(2026, 1, 1)
    }

    #[test]
    fn test_lint_before_effective_date_is_absent() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(
                Lint::new("e_dated", LintSource::CabfBaselineRequirements, Fixed(LintStatus::Error))
                    .effective(utc_date(2016, 7, 1)),
            )
            .unwrap();
        builder
            .register(Lint::new("e_undated", LintSource::Rfc5280, Fixed(LintStatus::Pass)))
            .unwrap();
        let registry = builder.build();
        let engine = Engine::sequential(&registry);

        let report = engine.run(&cert_at(utc_date(2016, 1, 1)), now());
        assert!(!report.contains("e_dated"));
        assert_eq!(report.status_of("e_undated"), Some(LintStatus::Pass));

        let later = engine.run(&cert_at(utc_date(2016, 7, 1)), now());
        assert_eq!(later.status_of("e_dated"), Some(LintStatus::Error));
    }

    #[test]
    fn test_lint_on_or_after_ineffective_date_is_absent() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(
                Lint::new("e_window", LintSource::CabfBaselineRequirements, Fixed(LintStatus::Pass))
                    .effective(utc_date(2016, 7, 1))
                    .ineffective(utc_date(2018, 3, 1)),
            )
            .unwrap();
        let registry = builder.build();
        let engine = Engine::sequential(&registry);
        assert!(!engine.run(&cert_at(utc_date(2018, 3, 1)), now()).contains("e_window"));
        assert!(!engine.run(&cert_at(utc_date(2019, 1, 1)), now()).contains("e_window"));
        assert!(engine.run(&cert_at(utc_date(2017, 1, 1)), now()).contains("e_window"));
    }

    #[test]
    fn test_post_dated_certificate_is_linted_before_effective_date() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(
                Lint::new("e_future", LintSource::Community, Fixed(LintStatus::Pass))
                    .effective(utc_date(2028, 1, 1)),
            )
            .unwrap();
        let registry = builder.build();
        let engine = Engine::sequential(&registry);
        let cert = cert_at(utc_date(2029, 1, 1));
        let report = engine.run(&cert, now());
        assert_eq!(report.status_of("e_future"), Some(LintStatus::Pass));
        assert_eq!(report.evaluated_at, now());
        assert!(engine.run(&cert, utc_date(2029, 6, 1)).contains("e_future"));
    }

    #[test]
    fn test_not_applicable_skips_execute() {
        let executed = Arc::new(AtomicUsize::new(0));
        let mut builder = RegistryBuilder::new();
        builder
            .register(Lint::new(
                "e_never",
                LintSource::Community,
                NeverApplies {
                    executed: Arc::clone(&executed),
                },
            ))
            .unwrap();
        let registry = builder.build();
        let engine = Engine::sequential(&registry);
        let report = engine.run(&cert_at(utc_date(2020, 1, 1)), now());
        assert_eq!(report.get("e_never"), Some(&LintResult::na()));
        assert_eq!(executed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panicking_lint_is_isolated() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(Lint::new("e_boom", LintSource::Community, Panics))
            .unwrap();
        builder
            .register(Lint::new("e_fine", LintSource::Community, Fixed(LintStatus::Pass)))
            .unwrap();
        let registry = builder.build();
        let engine = Engine::new(
            &registry,
            EngineOptions {
                concurrency: 2,
                ..EngineOptions::default()
            },
        )
        .unwrap();
        let report = engine.run(&cert_at(utc_date(2020, 1, 1)), now());
        let boom = report.get("e_boom").unwrap();
        assert_eq!(boom.status, LintStatus::Fatal);
        assert!(boom.details.as_deref().unwrap_or("").contains("panicked"));
        assert_eq!(report.status_of("e_fine"), Some(LintStatus::Pass));
    }

    #[test]
    fn test_runs_are_deterministic_across_concurrency() {
        let mut builder = RegistryBuilder::new();
        for (i, status) in LintStatus::ALL.iter().enumerate() {
            builder
                .register(Lint::new(format!("e_{:02}", 20 - i), LintSource::Community, Fixed(*status)))
                .unwrap();
        }
        let registry = builder.build();
        let cert = cert_at(utc_date(2020, 1, 1));

        let seq = Engine::sequential(&registry);
        let par = Engine::new(
            &registry,
            EngineOptions {
                concurrency: 4,
                ..EngineOptions::default()
            },
        )
        .unwrap();
        let a = serde_json::to_string(&seq.run(&cert, now())).unwrap();
        let b = serde_json::to_string(&seq.run(&cert, now())).unwrap();
        let c = serde_json::to_string(&par.run(&cert, now())).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_filter_limits_selection() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(Lint::new("e_rfc", LintSource::Rfc5280, Fixed(LintStatus::Error)))
            .unwrap();
        builder
            .register(Lint::new("e_br", LintSource::CabfBaselineRequirements, Fixed(LintStatus::Error)))
            .unwrap();
        let registry = builder.build();
        let mut filter = LintFilter::default();
        filter.exclude_sources.insert(LintSource::Rfc5280);
        let engine = Engine::new(
            &registry,
            EngineOptions {
                concurrency: 1,
                filter,
                lint_budget: Some(Duration::from_secs(5)),
            },
        )
        .unwrap();
        let report = engine.run(&cert_at(utc_date(2020, 1, 1)), now());
        assert!(!report.contains("e_rfc"));
        assert!(report.contains("e_br"));
    }

    #[test]
    fn test_run_many_keeps_input_order() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(
                Lint::new("e_dated", LintSource::Community, Fixed(LintStatus::Pass))
                    .effective(utc_date(2019, 1, 1)),
            )
            .unwrap();
        let registry = builder.build();
        let engine = Engine::sequential(&registry);
        let certs = vec![cert_at(utc_date(2020, 1, 1)), cert_at(utc_date(2018, 1, 1))];
        let reports = engine.run_many(&certs, now());
        assert_eq!(reports.len(), 2);
        assert!(reports[0].contains("e_dated"));
        assert!(!reports[1].contains("e_dated"));
    }
}
