//! cloudsweep CLI - timestamped cloud-asset enumeration runs
//!
//! Thin orchestration around the `cloudlist` enumeration tool: probe it,
//! run it for one provider under a timeout, classify the result, and
//! persist captured output under a timestamped artifact file.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use cloudsweep_core::{
    resolve_tool, Invocation, RunReport, RunStatus, Runner, RunnerConfig,
    DEFAULT_RUN_TIMEOUT_SECS,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "cloudsweep",
    author,
    version,
    about = "Run cloudlist asset enumeration for a cloud provider and archive the results",
    long_about = "Invokes the cloudlist enumeration tool for one cloud provider, bounded by a \
                  timeout, and saves captured output to a timestamped file under the output \
                  directory. Partial output from an aborted run is preserved."
)]
struct Cli {
    /// Cloud provider to enumerate (aws, gcp, azure, ...)
    provider: Option<String>,

    /// Output directory for enumeration artifacts
    #[arg(long = "out", value_name = "DIR", default_value = "outputs")]
    output: PathBuf,

    /// Path to the cloudlist binary (default: PATH, then known install locations)
    #[arg(long = "bin", value_name = "PATH")]
    tool: Option<PathBuf>,

    /// Enumeration timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_RUN_TIMEOUT_SECS)]
    timeout: u64,

    /// Print the resolved command without invoking the tool
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Emit the run report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Suppress progress spinners (for script/pipeline consumption)
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing().ok();
    let cli = Cli::parse();
    ui::init_quiet_mode(cli.quiet);

    let provider = match cli.provider.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &provider).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    println!("error: a cloud provider is required (e.g. aws, gcp, azure)");
    println!();
    println!("Usage: cloudsweep <PROVIDER> [--out <DIR>] [--bin <PATH>] [--timeout <SECS>]");
    println!("Run 'cloudsweep --help' for details.");
}

async fn run(cli: &Cli, provider: &str) -> Result<ExitCode> {
    let config = RunnerConfig {
        tool: cli.tool.clone(),
        output_dir: cli.output.clone(),
        run_timeout: Duration::from_secs(cli.timeout),
        ..RunnerConfig::default()
    };

    debug!(?config, "runner configured");

    if cli.dry_run {
        return dry_run(&config, provider);
    }

    let runner = Runner::new(config);
    let pb = ui::spinner(format!("enumerating {provider} assets"));
    let report = runner.execute(provider).await;

    match &report {
        Ok(r) if r.status.is_success() => ui::finish_success(pb, "enumeration complete"),
        _ => ui::finish_error(pb, "enumeration failed"),
    }
    let report = report?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        describe(&report, cli.timeout);
    }

    Ok(ExitCode::from(report.status.exit_code()))
}

fn dry_run(config: &RunnerConfig, provider: &str) -> Result<ExitCode> {
    match resolve_tool(config.tool.as_deref()) {
        Some(tool) => {
            let invocation = Invocation::new(tool, provider, config.run_timeout);
            println!("{}", invocation.command_line());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("cloudlist is not installed or not in PATH");
            println!("Install it first: https://cloudlist.projectdiscovery.io/cloudlist/get-started/");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn describe(report: &RunReport, timeout_secs: u64) {
    match report.status {
        RunStatus::Success => match &report.artifact {
            Some(path) => {
                println!("Enumeration completed for {}", report.provider);
                println!("Results saved to {}", path.display());
            }
            None => {
                println!(
                    "Enumeration completed for {}, but produced no output; nothing saved",
                    report.provider
                );
            }
        },
        RunStatus::Usage => print_usage(),
        RunStatus::ToolUnavailable => {
            println!("cloudlist is not installed or not responding");
            println!("Install it first: https://cloudlist.projectdiscovery.io/cloudlist/get-started/");
        }
        RunStatus::TimedOut => {
            println!("cloudlist run timed out after {timeout_secs}s; no output captured");
        }
        RunStatus::NotFound => {
            println!("cloudlist binary disappeared before the run; reinstall or pass --bin");
        }
        RunStatus::Killed => {
            println!("cloudlist was killed before finishing (likely memory or resource limits)");
            if let Some(path) = &report.artifact {
                println!("Partial results saved to {}", path.display());
            }
        }
        RunStatus::ErrorExit { code } => {
            println!("cloudlist exited with code {code}");
            if let Some(stderr) = &report.stderr {
                println!("cloudlist error output:");
                for line in stderr.lines() {
                    println!("  {line}");
                }
            }
            if let Some(path) = &report.artifact {
                println!("Partial results saved to {}", path.display());
            }
            println!("A provider config file may be required: https://docs.projectdiscovery.io/tools/cloudlist/running");
        }
    }
}
