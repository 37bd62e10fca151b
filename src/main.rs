//! certlint CLI binary entry point.
//! Resolves configuration, builds the lint registry once, and prints results.

use certlint::aggregate::exit_code;
use certlint::cli::{Cli, Commands};
use certlint::config::{self, Overrides};
use certlint::engine::Engine;
use certlint::output;
use certlint::registry::Registry;
use certlint::source::LintSource;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", msg);
    std::process::exit(2);
}

fn main() {
    // Logs go to stderr so JSON on stdout stays parseable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Lint {
            patterns,
            repo_root,
            at,
            output,
            concurrency,
            include_sources,
            exclude_sources,
            include_lints,
            exclude_lints,
        } => {
            let eff = config::resolve_effective(&Overrides {
                repo_root,
                output,
                concurrency,
                include_sources,
                exclude_sources,
                include_names: include_lints,
                exclude_names: exclude_lints,
            })
            .unwrap_or_else(|e| fail(e));
            let evaluated_at = config::evaluation_time(at.as_deref()).unwrap_or_else(|e| fail(e));
            let registry = Registry::builtin().unwrap_or_else(|e| fail(e));
            info!(
                lints = registry.len(),
                config = ?eff.config_path,
                concurrency = eff.concurrency,
                "registry ready"
            );
            for name in eff
                .filter
                .include_names
                .iter()
                .chain(&eff.filter.exclude_names)
            {
                if registry.by_name(name).is_none() {
                    fail(format!("unknown lint '{}'", name));
                }
            }
            let engine = Engine::new(&registry, eff.engine_options()).unwrap_or_else(|e| fail(e));
            let run = certlint::lint::run_lint(&engine, &eff.repo_root, &patterns, evaluated_at);
            output::print_lint(&run, &eff.output);
            if run.failed > 0 {
                std::process::exit(2);
            }
            let code = exit_code(run.summary.overall);
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::List { output, source } => {
            let registry = Registry::builtin().unwrap_or_else(|e| fail(e));
            let source = source
                .as_deref()
                .map(str::parse::<LintSource>)
                .transpose()
                .unwrap_or_else(|e| fail(e));
            let metas: Vec<_> = registry
                .all()
                .filter(|l| source.map_or(true, |s| l.source == s))
                .map(|l| l.metadata())
                .collect();
            output::print_list(&metas, output.as_deref().unwrap_or("human"));
        }
    }
}
