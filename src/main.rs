//! `loglicense` — log the licenses of Python dependencies and gate them on a policy.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Locate the dependency file, or search the working directory ([`detector`]).
//! 3. Parse it into package references ([`manifest`]).
//! 4. Fetch each package's metadata from the registry ([`registry`]) and shape
//!    the report rows ([`collector`]).
//! 5. `report`: render the table ([`report`]).
//! 6. `check`: classify licenses against the policy ([`policy`], [`validator`])
//!    and exit `0` (pass), `1` (banned license) or `2` (coverage below target).

mod cli;
mod collector;
mod detector;
mod error;
mod license;
mod manifest;
mod models;
mod policy;
mod registry;
mod report;
mod validator;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{CheckArgs, Cli, Command, RegistryArgs, ReportArgs};
use collector::{default_columns, CollectorOptions, LicenseCollector};
use policy::load_policy;
use registry::RegistrySettings;
use report::TableFormat;
use validator::{validate, Gate};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Report(args) => run_report(args, cli.quiet).await,
        Command::Check(args) => {
            let gate = run_check(args, cli.quiet).await?;
            if gate != Gate::Passed {
                std::process::exit(gate.exit_code());
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "loglicense=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn collector_options(registry: &RegistryArgs, info_columns: Vec<String>, quiet: bool) -> CollectorOptions {
    CollectorOptions {
        package_manager: registry.package_manager.clone(),
        info_columns,
        develop: registry.develop,
        jobs: registry.jobs,
        registry: RegistrySettings {
            base_url: registry.registry_url.clone(),
            timeout: Duration::from_secs(registry.timeout),
            pin_versions: registry.pin_versions,
        },
        show_progress: !quiet,
    }
}

async fn run_report(args: ReportArgs, quiet: bool) -> Result<()> {
    let dependency_file: PathBuf = match args.dependency_file() {
        Some(path) => path.clone(),
        None => {
            let cwd = std::env::current_dir().context("cannot read the working directory")?;
            detector::find_manifest(&cwd)?
        }
    };

    let options = collector_options(&args.registry, args.info_columns.clone(), quiet);
    let mut collector = LicenseCollector::new(&dependency_file, options)?;
    let table = collector.collect().await?;

    let rendered = report::table::render(&table.to_rows(), args.tablefmt)?;

    match &args.output_file {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("cannot write report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

async fn run_check(args: CheckArgs, quiet: bool) -> Result<Gate> {
    let policy = load_policy(&args.config_file);

    let options = collector_options(&args.registry, default_columns(), quiet);
    let mut collector = LicenseCollector::new(&args.dependency_file, options)?;
    let table = collector.collect().await?;

    let validation = validate(&table, &policy)?;
    let gate = validation.gate(policy.coverage);

    if args.tablefmt == TableFormat::Json {
        if args.show_report() {
            let output = serde_json::json!({
                "rows": validation.rows,
                "total": validation.total(),
                "coverage": validation.coverage(),
                "coverage_target": policy.coverage,
                "gate": gate,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    } else {
        if args.show_report() {
            println!("{}", report::table::render(&validation.to_rows(), args.tablefmt)?);
            report::terminal::render_summary(&validation, quiet);
        }
        if let Some(target) = policy.coverage {
            report::terminal::render_coverage(&validation, target);
        }
    }

    report::terminal::render_gate(gate, &validation, policy.coverage);

    Ok(gate)
}
