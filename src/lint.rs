//! Batch runner: lints every certificate document matched by a set of glob
//! patterns and collects one report per file.
//!
//! Files are loaded in parallel, then each certificate goes through the
//! engine. Results are ordered by file path so output is stable.

use crate::aggregate::Summary;
use crate::engine::Engine;
use crate::models::certificate::Certificate;
use crate::models::Report;
use chrono::{DateTime, Utc};
use glob::glob;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
/// Outcome for one input file: a report, or why there is none.
pub struct FileReport {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
/// Results of a batch run.
pub struct LintRun {
    pub files: Vec<FileReport>,
    pub summary: Summary,
    /// Files that could not be linted.
    pub failed: usize,
}

/// Expand `patterns` relative to `root`, lint each match with `engine`.
///
/// Invalid patterns and unreadable documents are recorded as file-level
/// errors; they never stop the other files.
pub fn run_lint(
    engine: &Engine<'_>,
    root: &Path,
    patterns: &[String],
    evaluated_at: DateTime<Utc>,
) -> LintRun {
    let mut failures: Vec<FileReport> = Vec::new();
    let mut targets: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in patterns {
        let abs_glob = root.join(pat);
        let pattern = abs_glob.to_string_lossy().to_string();
        match glob(&pattern) {
            Ok(paths) => {
                let before = targets.len();
                targets.extend(paths.flatten().filter(|p| p.is_file()));
                if targets.len() == before {
                    warn!(pattern = %pat, "pattern matched no files");
                }
            }
            Err(e) => failures.push(FileReport {
                file: pat.clone(),
                report: None,
                error: Some(format!("invalid pattern: {}", e)),
            }),
        }
    }
    debug!(files = targets.len(), "certificate documents selected");

    let loaded: Vec<(PathBuf, Result<Certificate, String>)> = targets
        .into_par_iter()
        .map(|path| {
            let cert = Certificate::load(&path).map_err(|e| e.to_string());
            (path, cert)
        })
        .collect();

    let mut files: Vec<FileReport> = loaded
        .into_iter()
        .map(|(path, cert)| {
            let file = display_path(&path, root);
            match cert {
                Ok(cert) => FileReport {
                    file,
                    report: Some(engine.run(&cert, evaluated_at)),
                    error: None,
                },
                Err(error) => {
                    warn!(file = %file, %error, "skipping certificate document");
                    FileReport {
                        file,
                        report: None,
                        error: Some(error),
                    }
                }
            }
        })
        .collect();
    files.extend(failures);
    files.sort_by(|a, b| a.file.cmp(&b.file));

    let summary = Summary::merge(files.iter().filter_map(|f| f.report.as_ref()));
    let failed = files.iter().filter(|f| f.error.is_some()).count();
    LintRun {
        files,
        summary,
        failed,
    }
}

/// `path` relative to `root` when possible.
pub fn display_path(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}
