//! Output rendering for lint runs and the lint catalog.
//!
//! Supports `human` (default) and `json` outputs. The JSON form of a lint
//! run carries every file report and a top-level summary.

use crate::lint::LintRun;
use crate::models::LintStatus;
use crate::registry::LintMetadata;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn to_pretty(v: &JsonVal) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| "{}".to_string())
}

fn status_label(status: LintStatus, color: bool) -> String {
    let label = format!("⟦{}⟧", status);
    if !color {
        return label;
    }
    match status {
        LintStatus::Fatal => label.magenta().bold().to_string(),
        LintStatus::Error => label.red().bold().to_string(),
        LintStatus::Warn => label.yellow().bold().to_string(),
        LintStatus::Info => label.blue().bold().to_string(),
        _ => label.bright_black().to_string(),
    }
}

/// Print a lint run. Human output lists findings only (info and above);
/// pass and NA results are counted in the summary.
pub fn print_lint(run: &LintRun, output: &str) {
    match output {
        "json" => println!("{}", to_pretty(&compose_lint_json(run))),
        _ => {
            let color = use_colors(output);
            for f in &run.files {
                let file = if color {
                    f.file.clone().bold().to_string()
                } else {
                    f.file.clone()
                };
                if let Some(err) = &f.error {
                    let icon = if color { "✖".red().to_string() } else { "✖".to_string() };
                    println!("{} {} — {}", icon, file, err);
                    continue;
                }
                let Some(report) = &f.report else { continue };
                for (name, r) in report.iter() {
                    if matches!(r.status, LintStatus::Pass | LintStatus::NA | LintStatus::Reserved) {
                        continue;
                    }
                    match &r.details {
                        Some(d) => println!("{} {} ❲{}❳ — {}", status_label(r.status, color), file, name, d),
                        None => println!("{} {} ❲{}❳", status_label(r.status, color), file, name),
                    }
                }
            }
            let s = &run.summary;
            let summary = format!(
                "— Summary — overall={} fatal={} errors={} warnings={} infos={} pass={} na={} files={} failed={}",
                s.overall,
                s.fatal,
                s.error,
                s.warn,
                s.info,
                s.pass,
                s.na,
                run.files.len(),
                run.failed
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print the lint catalog.
pub fn print_list(lints: &[LintMetadata], output: &str) {
    match output {
        "json" => println!("{}", to_pretty(&compose_list_json(lints))),
        _ => {
            let color = use_colors(output);
            for l in lints {
                let name = if color {
                    l.name.clone().bold().to_string()
                } else {
                    l.name.clone()
                };
                let window = match (l.effective_date, l.ineffective_date) {
                    (Some(e), Some(i)) => format!("{} .. {}", e.date_naive(), i.date_naive()),
                    (Some(e), None) => format!("since {}", e.date_naive()),
                    (None, Some(i)) => format!("until {}", i.date_naive()),
                    (None, None) => "always".to_string(),
                };
                println!("{} [{}] {} ({})", name, l.source, l.citation, window);
                if !l.description.is_empty() {
                    println!("    {}", l.description);
                }
            }
        }
    }
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(run: &LintRun) -> JsonVal {
    serde_json::to_value(run).unwrap_or(JsonVal::Null)
}

/// Compose catalog JSON (pure) for testing/snapshot purposes.
pub fn compose_list_json(lints: &[LintMetadata]) -> JsonVal {
    json!({ "lints": lints, "total": lints.len() })
}
