//! Error types for registration, execution setup, and input loading.
//!
//! Per-lint runtime failures are not errors here: the engine turns them into
//! `Fatal` results so one broken lint never stops the others.

use std::path::PathBuf;
use thiserror::Error;

/// A lint could not prepare its static state.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `effective` must be strictly before `ineffective`.
    #[error("effective date {effective} is not before ineffective date {ineffective}")]
    InvalidWindow {
        effective: chrono::DateTime<chrono::Utc>,
        ineffective: chrono::DateTime<chrono::Utc>,
    },

    /// A pattern used by the lint failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{0}")]
    Other(String),
}

/// Registration failures. These are configuration-fatal.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("lint '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("lint '{name}' failed to initialize: {source}")]
    Config {
        name: String,
        #[source]
        source: ConfigError,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Loading a certificate view from disk.
#[derive(Debug, Error)]
pub enum CertLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid certificate document: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A configuration file exists but cannot be used.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid TOML: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{path} is not valid YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown lint source '{0}'")]
    UnknownSource(String),

    #[error("invalid evaluation time '{value}': {source}")]
    EvaluationTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
