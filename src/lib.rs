//! certlint core library.
//!
//! This crate exposes programmatic APIs for linting parsed X.509
//! certificates against RFC 5280 and CA/Browser Forum requirements.
//!
//! High-level modules:
//! - `registry`: Lint contract (`LintCheck`), `Lint` entries, and the
//!   build-once `Registry`.
//! - `engine`: Execution driver with date gating, applicability gating,
//!   panic isolation and bounded parallelism.
//! - `aggregate`: Overall severity and per-status counts.
//! - `lints`: Built-in lints.
//! - `models`: Certificate view, lint statuses, and the report.
//! - `source`: Lint sources and well-known effective dates.
//! - `lint`: Batch runner over certificate documents matched by globs.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `output`: Human/JSON printers.
//! - `error`: Error types.
//!
//! ```no_run
//! use certlint::{Certificate, Engine, Registry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::builtin()?;
//! let engine = Engine::sequential(&registry);
//! let cert = Certificate::load(std::path::Path::new("leaf.json"))?;
//! let report = engine.run(&cert, chrono::Utc::now());
//! println!("{}", certlint::aggregate(&report));
//! # Ok(())
//! # }
//! ```
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod lint;
pub mod lints;
pub mod models;
pub mod output;
pub mod registry;
pub mod source;

pub use aggregate::{aggregate, Summary};
pub use engine::{Engine, EngineOptions};
pub use error::{CertLoadError, ConfigError, EngineError, RegistryError, SettingsError};
pub use models::certificate::Certificate;
pub use models::{LintResult, LintStatus, Report};
pub use registry::{Lint, LintCheck, LintFilter, LintMetadata, Registry, RegistryBuilder};
pub use source::LintSource;
