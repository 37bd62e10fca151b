//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "certlint",
    version,
    about = "X.509 certificate compliance linter",
    long_about = "certlint — runs RFC 5280 and CA/Browser Forum lints over parsed certificate documents (JSON).\n\nConfiguration precedence: CLI > certlint.toml > defaults.",
    after_help = "Examples:\n  certlint lint certs/*.json\n  certlint lint leaf.json --at 2017-01-01T00:00:00Z --output json\n  certlint lint certs/*.json --include-source CABF_BR --exclude-lint w_subject_dn_trailing_whitespace\n  certlint list --source RFC5280",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current certlint version.")]
    Version,
    /// Lint certificate documents
    #[command(
        about = "Run lints over certificates",
        long_about = "Lint every certificate document matched by the given glob patterns. Exits 1 when any lint reports error or fatal.",
        after_help = "Examples:\n  certlint lint certs/*.json\n  certlint lint leaf.json --output json"
    )]
    Lint {
        #[arg(required = true, help = "Glob patterns of certificate JSON documents")]
        patterns: Vec<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Evaluation time, RFC 3339 (default: now)")]
        at: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Worker threads for lint evaluation")]
        concurrency: Option<usize>,
        #[arg(long = "include-source", help = "Only run lints from this source (repeatable)")]
        include_sources: Vec<String>,
        #[arg(long = "exclude-source", help = "Skip lints from this source (repeatable)")]
        exclude_sources: Vec<String>,
        #[arg(long = "include-lint", help = "Only run this lint (repeatable)")]
        include_lints: Vec<String>,
        #[arg(long = "exclude-lint", help = "Skip this lint (repeatable)")]
        exclude_lints: Vec<String>,
    },
    /// List registered lints
    #[command(
        about = "List lints",
        long_about = "Print the lint catalog with source, citation and effective dates."
    )]
    List {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Only list lints from this source")]
        source: Option<String>,
    },
}
