//! Lint contract and catalog.
//!
//! A lint is a named rule with provenance metadata and a `LintCheck`
//! implementation. Lints are collected by a `RegistryBuilder` during a single
//! initialization phase and frozen into a `Registry`, which is then shared
//! read-only with every engine run.

use crate::error::{ConfigError, RegistryError};
use crate::models::certificate::Certificate;
use crate::models::LintResult;
use crate::source::LintSource;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, warn};

/// Check logic of a lint.
///
/// Implementations must be pure with respect to the certificate: no
/// interior mutation, no I/O. `initialize` is called exactly once, when the
/// lint is registered.
pub trait LintCheck: Send + Sync {
    fn initialize(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Whether the rule is meaningful for this certificate at all.
    fn check_applies(&self, cert: &Certificate) -> bool;

    fn execute(&self, cert: &Certificate) -> LintResult;
}

/// A registered rule.
pub struct Lint {
    pub name: String,
    pub description: String,
    pub citation: String,
    pub source: LintSource,
    pub effective_date: Option<DateTime<Utc>>,
    pub ineffective_date: Option<DateTime<Utc>>,
    check: Box<dyn LintCheck>,
}

impl Lint {
    pub fn new(name: impl Into<String>, source: LintSource, check: impl LintCheck + 'static) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            citation: String::new(),
            source,
            effective_date: None,
            ineffective_date: None,
            check: Box::new(check),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = citation.into();
        self
    }

    pub fn effective(mut self, date: DateTime<Utc>) -> Self {
        self.effective_date = Some(date);
        self
    }

    pub fn ineffective(mut self, date: DateTime<Utc>) -> Self {
        self.ineffective_date = Some(date);
        self
    }

    /// `[effective, ineffective)` contains `date`; a missing bound is open.
    pub fn in_window(&self, date: DateTime<Utc>) -> bool {
        if self.effective_date.is_some_and(|eff| date < eff) {
            return false;
        }
        if self.ineffective_date.is_some_and(|ineff| date >= ineff) {
            return false;
        }
        true
    }

    pub fn check_applies(&self, cert: &Certificate) -> bool {
        self.check.check_applies(cert)
    }

    pub fn execute(&self, cert: &Certificate) -> LintResult {
        self.check.execute(cert)
    }

    pub fn metadata(&self) -> LintMetadata {
        LintMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            citation: self.citation.clone(),
            source: self.source,
            effective_date: self.effective_date,
            ineffective_date: self.ineffective_date,
        }
    }

    fn validate_window(&self) -> Result<(), ConfigError> {
        match (self.effective_date, self.ineffective_date) {
            (Some(effective), Some(ineffective)) if effective >= ineffective => {
                Err(ConfigError::InvalidWindow {
                    effective,
                    ineffective,
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lint")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("effective_date", &self.effective_date)
            .field("ineffective_date", &self.ineffective_date)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Serializable description of a lint, without its check logic.
pub struct LintMetadata {
    pub name: String,
    pub description: String,
    pub citation: String,
    pub source: LintSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ineffective_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Selects a subset of the registry by source and by name.
///
/// Empty include sets select everything; exclusions always win.
pub struct LintFilter {
    pub include_sources: BTreeSet<LintSource>,
    pub exclude_sources: BTreeSet<LintSource>,
    pub include_names: BTreeSet<String>,
    pub exclude_names: BTreeSet<String>,
}

impl LintFilter {
    pub fn allows(&self, lint: &Lint) -> bool {
        if self.exclude_sources.contains(&lint.source) || self.exclude_names.contains(&lint.name) {
            return false;
        }
        let source_ok = self.include_sources.is_empty() || self.include_sources.contains(&lint.source);
        let name_ok = self.include_names.is_empty() || self.include_names.contains(&lint.name);
        source_ok && name_ok
    }

    pub fn is_empty(&self) -> bool {
        self.include_sources.is_empty()
            && self.exclude_sources.is_empty()
            && self.include_names.is_empty()
            && self.exclude_names.is_empty()
    }
}

#[derive(Default)]
/// Single-writer collection phase of the registry.
pub struct RegistryBuilder {
    lints: Vec<Lint>,
    index: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize and add a lint.
    ///
    /// Fails without touching the existing entry when the name is taken, and
    /// drops the lint when its window is inverted or `initialize` fails.
    pub fn register(&mut self, mut lint: Lint) -> Result<(), RegistryError> {
        if self.index.contains_key(&lint.name) {
            return Err(RegistryError::DuplicateName { name: lint.name });
        }
        if let Err(source) = lint.validate_window() {
            return Err(RegistryError::Config {
                name: lint.name,
                source,
            });
        }
        if let Err(source) = lint.check.initialize() {
            return Err(RegistryError::Config {
                name: lint.name,
                source,
            });
        }
        debug!(lint = %lint.name, source = %lint.source, "registered lint");
        self.index.insert(lint.name.clone(), self.lints.len());
        self.lints.push(lint);
        Ok(())
    }

    /// Register a batch of lints.
    ///
    /// A lint that fails setup is logged and left out; the rest of the batch
    /// still registers. A duplicate name stops the batch and is returned.
    /// Returns how many lints were left out.
    pub fn register_all(&mut self, lints: impl IntoIterator<Item = Lint>) -> Result<usize, RegistryError> {
        let mut excluded = 0;
        for lint in lints {
            match self.register(lint) {
                Ok(()) => {}
                Err(RegistryError::Config { name, source }) => {
                    warn!(lint = %name, error = %source, "lint excluded");
                    excluded += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(excluded)
    }

    pub fn len(&self) -> usize {
        self.lints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lints.is_empty()
    }

    /// Freeze the catalog, sorted by name.
    pub fn build(self) -> Registry {
        let mut lints = self.lints;
        lints.sort_by(|a, b| a.name.cmp(&b.name));
        let index = lints
            .iter()
            .enumerate()
            .map(|(i, l)| (l.name.clone(), i))
            .collect();
        Registry { lints, index }
    }
}

/// Immutable lint catalog. Safe to share between threads without locking.
pub struct Registry {
    lints: Vec<Lint>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Registry holding every lint shipped with this crate.
    pub fn builtin() -> Result<Registry, RegistryError> {
        let mut builder = RegistryBuilder::new();
        crate::lints::register_all(&mut builder)?;
        Ok(builder.build())
    }

    /// All lints in name order. Each call starts a fresh iteration.
    pub fn all(&self) -> impl Iterator<Item = &Lint> + '_ {
        self.lints.iter()
    }

    pub fn by_name(&self, name: &str) -> Option<&Lint> {
        self.index.get(name).and_then(|&i| self.lints.get(i))
    }

    pub fn by_source(&self, source: LintSource) -> impl Iterator<Item = &Lint> + '_ {
        self.lints.iter().filter(move |l| l.source == source)
    }

    pub fn select<'a>(&'a self, filter: &'a LintFilter) -> impl Iterator<Item = &'a Lint> + 'a {
        self.lints.iter().filter(move |l| filter.allows(l))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.lints.iter().map(|l| l.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.lints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lints.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LintStatus;
    use crate::source::utc_date;

    struct Fixed(LintStatus);

    impl LintCheck for Fixed {
        fn check_applies(&self, _cert: &Certificate) -> bool {
            true
        }

        fn execute(&self, _cert: &Certificate) -> LintResult {
            LintResult::new(self.0)
        }
    }

    struct FailsSetup;

    impl LintCheck for FailsSetup {
        fn initialize(&mut self) -> Result<(), ConfigError> {
            Err(ConfigError::Other("no state".into()))
        }

        fn check_applies(&self, _cert: &Certificate) -> bool {
            true
        }

        fn execute(&self, _cert: &Certificate) -> LintResult {
            LintResult::pass()
        }
    }

    #[test]
    fn test_duplicate_name_keeps_first_entry() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(Lint::new("e_dup", LintSource::Rfc5280, Fixed(LintStatus::Pass)).description("first"))
            .unwrap();
        let err = builder
            .register(Lint::new("e_dup", LintSource::Community, Fixed(LintStatus::Error)).description("second"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { ref name } if name == "e_dup"));

        let registry = builder.build();
        assert_eq!(registry.len(), 1);
        let lint = registry.by_name("e_dup").unwrap();
        assert_eq!(lint.description, "first");
        assert_eq!(lint.source, LintSource::Rfc5280);
    }

    #[test]
    fn test_failed_initialize_excludes_lint() {
        let mut builder = RegistryBuilder::new();
        let err = builder
            .register(Lint::new("e_broken", LintSource::Community, FailsSetup))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Config { .. }));
        builder
            .register(Lint::new("e_fine", LintSource::Community, Fixed(LintStatus::Pass)))
            .unwrap();
        let registry = builder.build();
        assert!(registry.by_name("e_broken").is_none());
        assert!(registry.by_name("e_fine").is_some());
    }

    #[test]
    fn test_batch_skips_failed_setup_and_keeps_going() {
        let mut builder = RegistryBuilder::new();
        let excluded = builder
            .register_all(vec![
                Lint::new("e_first", LintSource::Community, Fixed(LintStatus::Pass)),
                Lint::new("e_broken", LintSource::Community, FailsSetup),
                Lint::new("e_window", LintSource::Rfc5280, Fixed(LintStatus::Pass))
                    .effective(utc_date(2020, 1, 1))
                    .ineffective(utc_date(2019, 1, 1)),
                Lint::new("e_last", LintSource::Community, Fixed(LintStatus::Pass)),
            ])
            .unwrap();
        assert_eq!(excluded, 2);
        let registry = builder.build();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["e_first", "e_last"]);
    }

    #[test]
    fn test_batch_stops_on_duplicate_name() {
        let mut builder = RegistryBuilder::new();
        let err = builder
            .register_all(vec![
                Lint::new("e_same", LintSource::Community, Fixed(LintStatus::Pass)),
                Lint::new("e_same", LintSource::Rfc5280, Fixed(LintStatus::Error)),
                Lint::new("e_after", LintSource::Community, Fixed(LintStatus::Pass)),
            ])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { ref name } if name == "e_same"));
        let registry = builder.build();
        assert!(registry.by_name("e_after").is_none());
        assert_eq!(registry.by_name("e_same").map(|l| l.source), Some(LintSource::Community));
    }

    #[test]
    fn test_inverted_window_is_config_error() {
        let mut builder = RegistryBuilder::new();
        let lint = Lint::new("e_window", LintSource::Rfc5280, Fixed(LintStatus::Pass))
            .effective(utc_date(2020, 1, 1))
            .ineffective(utc_date(2020, 1, 1));
        let err = builder.register(lint).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Config {
                source: ConfigError::InvalidWindow { .. },
                ..
            }
        ));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_all_is_sorted_and_restartable() {
        let mut builder = RegistryBuilder::new();
        for name in ["w_c", "e_a", "n_b"] {
            builder
                .register(Lint::new(name, LintSource::Community, Fixed(LintStatus::Pass)))
                .unwrap();
        }
        let registry = builder.build();
        let first: Vec<_> = registry.all().map(|l| l.name.clone()).collect();
        let second: Vec<_> = registry.all().map(|l| l.name.clone()).collect();
        assert_eq!(first, vec!["e_a", "n_b", "w_c"]);
        assert_eq!(first, second);
        assert_eq!(registry.by_name("n_b").map(|l| l.name.as_str()), Some("n_b"));
    }

    #[test]
    fn test_by_source_and_filter() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(Lint::new("e_rfc", LintSource::Rfc5280, Fixed(LintStatus::Pass)))
            .unwrap();
        builder
            .register(Lint::new("e_br", LintSource::CabfBaselineRequirements, Fixed(LintStatus::Pass)))
            .unwrap();
        builder
            .register(Lint::new("w_br", LintSource::CabfBaselineRequirements, Fixed(LintStatus::Pass)))
            .unwrap();
        let registry = builder.build();

        let br: Vec<_> = registry
            .by_source(LintSource::CabfBaselineRequirements)
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(br, vec!["e_br", "w_br"]);

        let mut filter = LintFilter::default();
        assert_eq!(registry.select(&filter).count(), 3);

        filter.include_sources.insert(LintSource::CabfBaselineRequirements);
        filter.exclude_names.insert("w_br".into());
        let picked: Vec<_> = registry.select(&filter).map(|l| l.name.as_str()).collect();
        assert_eq!(picked, vec!["e_br"]);

        let mut by_name = LintFilter::default();
        by_name.include_names.insert("e_rfc".into());
        by_name.exclude_sources.insert(LintSource::Rfc5280);
        assert_eq!(registry.select(&by_name).count(), 0);
    }

    #[test]
    fn test_window_bounds() {
        let lint = Lint::new("e_w", LintSource::Rfc5280, Fixed(LintStatus::Pass))
            .effective(utc_date(2016, 7, 1))
            .ineffective(utc_date(2018, 3, 1));
        assert!(!lint.in_window(utc_date(2016, 6, 30)));
        assert!(lint.in_window(utc_date(2016, 7, 1)));
        assert!(lint.in_window(utc_date(2018, 2, 28)));
        assert!(!lint.in_window(utc_date(2018, 3, 1)));

        let open = Lint::new("e_open", LintSource::Rfc5280, Fixed(LintStatus::Pass));
        assert!(open.in_window(utc_date(1900, 1, 1)));
    }

    #[test]
    fn test_builtin_registry_loads() {
        let registry = Registry::builtin().unwrap();
        assert!(registry.by_name("e_ext_duplicate_extension").is_some());
        assert!(registry.by_name("w_name_constraint_on_edi_party_name").is_some());
        let meta = registry
            .by_name("e_sub_cert_valid_time_longer_than_39_months")
            .unwrap()
            .metadata();
        assert_eq!(meta.source, LintSource::CabfBaselineRequirements);
        assert!(meta.ineffective_date.is_some());
    }
}
