//! depscan - Python dependency constraint auditor CLI tool
//!
//! Subcommands:
//! - scan: compare declared constraints with the latest stable releases
//! - build: copy build files, then run the packaging command

use clap::Parser;
use depscan::build::{BuildContext, BuildStep, CommandStep, CopyFilesStep, NoopStep};
use depscan::cli::{CliArgs, Command};
use depscan::config::ScanSettings;
use depscan::manifest::load_project;
use depscan::orchestrator::Orchestrator;
use depscan::output::{create_formatter, OutputConfig};
use depscan::registry::{HttpClient, SimpleIndex};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the verbosity default
fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    match args.command.clone() {
        Command::Scan {
            index_url,
            timeout,
            json,
        } => scan(&args, index_url.as_deref(), timeout, json).await,
        Command::Build {
            build_lib,
            dry_run,
            command,
        } => build(&args, build_lib, dry_run, command),
    }
}

async fn scan(
    args: &CliArgs,
    index_url: Option<&str>,
    timeout: Option<u64>,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let manifest = load_project(&args.path)?;
    let settings = ScanSettings::merge(&manifest.tool, index_url, timeout)?;

    if args.verbose {
        eprintln!("depscan v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Manifest: {}", manifest.path.display());
        eprintln!("Index: {}", settings.index_url);
    }

    let client = HttpClient::with_timeout(settings.timeout)?;
    let index = SimpleIndex::with_base_url(client, &settings.index_url);
    let orchestrator = Orchestrator::new(Box::new(index)).with_progress(!args.quiet && !json);

    let report = orchestrator.run(&manifest.declarations).await;
    info!(
        audited = report.total_audited(),
        skipped = report.skipped_count(),
        "scan finished"
    );

    let formatter = create_formatter(OutputConfig::from_cli(json, args.verbose, args.quiet));
    let mut stdout = io::stdout().lock();
    formatter.format(&report, orchestrator.index(), &mut stdout)?;
    stdout.flush()?;

    // Findings are informational; only a failure to load the project is an error
    Ok(ExitCode::SUCCESS)
}

fn build(
    args: &CliArgs,
    build_lib: PathBuf,
    dry_run: bool,
    command: Vec<String>,
) -> anyhow::Result<ExitCode> {
    let manifest = load_project(&args.path)?;
    let ctx = BuildContext::new(manifest.project_dir(), &build_lib, dry_run);

    let inner: Box<dyn BuildStep> = match CommandStep::from_argv(&command) {
        Some(step) => Box::new(step),
        None => Box::new(NoopStep),
    };
    let step = CopyFilesStep::new(manifest.tool.build_files, inner);

    if args.verbose {
        eprintln!("Build output: {}", ctx.build_lib.display());
    }
    step.run(&ctx)?;

    Ok(ExitCode::SUCCESS)
}
