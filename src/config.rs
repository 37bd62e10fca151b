//! Configuration discovery and effective settings resolution.
//!
//! certlint reads `certlint.toml|yaml|yml` from the repository root (or the
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `output`: `human`
//! - `concurrency`: available parallelism
//! - `lint_budget_ms`: unset
//! - `[filter]`: empty, i.e. every registered lint
//!
//! Overrides precedence: CLI > config file > defaults. Filter lists from
//! the CLI are added to the ones from the file.

use crate::engine::{default_concurrency, EngineOptions};
use crate::error::SettingsError;
use crate::registry::LintFilter;
use crate::source::LintSource;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_NAMES: [&str; 3] = ["certlint.toml", "certlint.yaml", "certlint.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Lint selection section under `[filter]`.
pub struct FilterCfg {
    #[serde(default)]
    pub include_sources: Vec<String>,
    #[serde(default)]
    pub exclude_sources: Vec<String>,
    #[serde(default)]
    pub include_names: Vec<String>,
    #[serde(default)]
    pub exclude_names: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `certlint.toml|yaml`.
pub struct CertlintConfig {
    pub output: Option<String>,
    pub concurrency: Option<usize>,
    pub lint_budget_ms: Option<u64>,
    #[serde(default)]
    pub filter: Option<FilterCfg>,
}

#[derive(Debug, Default, Clone)]
/// Values given on the command line; `None`/empty means "not given".
pub struct Overrides {
    pub repo_root: Option<String>,
    pub output: Option<String>,
    pub concurrency: Option<usize>,
    pub include_sources: Vec<String>,
    pub exclude_sources: Vec<String>,
    pub include_names: Vec<String>,
    pub exclude_names: Vec<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub output: String,
    pub concurrency: usize,
    pub lint_budget: Option<Duration>,
    pub filter: LintFilter,
}

impl Effective {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            concurrency: self.concurrency,
            filter: self.filter.clone(),
            lint_budget: self.lint_budget,
        }
    }
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `certlint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `CertlintConfig` from the first config file present in `root`.
///
/// A missing file is not an error; an unreadable or malformed one is.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, CertlintConfig)>, SettingsError> {
    for name in CONFIG_NAMES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|source| SettingsError::Io {
            path: path.clone(),
            source,
        })?;
        let cfg = if name.ends_with(".toml") {
            toml::from_str(&s).map_err(|source| SettingsError::Toml {
                path: path.clone(),
                source,
            })?
        } else {
            serde_yaml::from_str(&s).map_err(|source| SettingsError::Yaml {
                path: path.clone(),
                source,
            })?
        };
        return Ok(Some((path, cfg)));
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides) -> Result<Effective, SettingsError> {
    let start = PathBuf::from(cli.repo_root.as_deref().unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let (config_path, cfg) = match load_config(&repo_root)? {
        Some((path, cfg)) => (Some(path), cfg),
        None => (None, CertlintConfig::default()),
    };

    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let concurrency = cli
        .concurrency
        .or(cfg.concurrency)
        .filter(|n| *n > 0)
        .unwrap_or_else(default_concurrency);

    let lint_budget = cfg.lint_budget_ms.map(Duration::from_millis);

    let file_filter = cfg.filter.unwrap_or_default();
    let mut filter = LintFilter::default();
    for s in file_filter.include_sources.iter().chain(&cli.include_sources) {
        filter.include_sources.insert(s.parse::<LintSource>()?);
    }
    for s in file_filter.exclude_sources.iter().chain(&cli.exclude_sources) {
        filter.exclude_sources.insert(s.parse::<LintSource>()?);
    }
    filter.include_names.extend(
        file_filter
            .include_names
            .into_iter()
            .chain(cli.include_names.iter().cloned()),
    );
    filter.exclude_names.extend(
        file_filter
            .exclude_names
            .into_iter()
            .chain(cli.exclude_names.iter().cloned()),
    );

    Ok(Effective {
        repo_root,
        config_path,
        output,
        concurrency,
        lint_budget,
        filter,
    })
}

/// Evaluation time from an RFC 3339 string, or the current time when absent.
pub fn evaluation_time(value: Option<&str>) -> Result<DateTime<Utc>, SettingsError> {
    match value {
        Some(v) => DateTime::parse_from_rfc3339(v.trim())
            .map(|t| t.with_timezone(&Utc))
            .map_err(|source| SettingsError::EvaluationTime {
                value: v.to_string(),
                source,
            }),
        None => Ok(Utc::now()),
    }
}
