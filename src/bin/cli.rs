use std::path::{Path, PathBuf};
use std::process::ExitCode;

use api_harness::prelude::*;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "api-harness")]
#[command(about = "Run API test suites and record their outcomes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a suite file or every suite in a directory
    Run {
        /// Path to a suite YAML file or directory
        #[arg(value_name = "SUITE")]
        path: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Directory the CSV and JSON reports are written to
        #[arg(short, long, default_value = "reports")]
        output_dir: PathBuf,

        /// Stop each suite at its first failing case
        #[arg(short, long)]
        fail_fast: bool,
    },

    /// Write a default config file for an environment
    InitConfig {
        /// Environment name
        #[arg(short, long, default_value = "dev")]
        env: String,

        /// Directory holding per-environment config files
        #[arg(long, default_value = "config")]
        config_dir: PathBuf,
    },

    /// Validate suite files without running them
    Validate {
        /// Path to suite file or directory
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Config file (JSON or YAML); overrides --env
    #[arg(short, long, conflicts_with = "env")]
    config: Option<PathBuf>,

    /// Environment name, loads <CONFIG_DIR>/<ENV>.json
    #[arg(short, long, default_value = "dev")]
    env: String,

    /// Directory holding per-environment config files
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<HarnessConfig> {
        let config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::for_env(&self.config_dir, &self.env)?,
        };
        Ok(config)
    }
}

fn init_tracing(verbose: bool, config: Option<&HarnessConfig>) {
    let filter = if verbose {
        "api_harness=debug".to_string()
    } else {
        config
            .and_then(|c| c.tracing_filter().ok())
            .unwrap_or_else(|| "api_harness=info".to_string())
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Run { config, .. } => Some(config.load()),
        _ => None,
    };
    init_tracing(cli.verbose, config.as_ref().and_then(|c| c.as_ref().ok()));

    let result = match config {
        Some(Err(e)) => Err(e),
        Some(Ok(config)) => run(cli.command, Some(config)).await,
        None => run(cli.command, None).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, "Harness failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(command: Commands, config: Option<HarnessConfig>) -> anyhow::Result<bool> {
    match command {
        Commands::Run {
            path,
            output_dir,
            fail_fast,
            ..
        } => {
            let config = config.ok_or_else(|| anyhow::anyhow!("No configuration loaded"))?;
            run_suites(&path, config, &output_dir, fail_fast).await
        }
        Commands::InitConfig { env, config_dir } => init_config(&config_dir, &env),
        Commands::Validate { path } => validate(&path),
    }
}

async fn run_suites(
    path: &Path,
    config: HarnessConfig,
    output_dir: &Path,
    fail_fast: bool,
) -> anyhow::Result<bool> {
    if !path.exists() {
        anyhow::bail!("Path not found: {}", path.display());
    }

    let suites = SuiteLoader::load_path(path)?;
    if suites.is_empty() {
        println!("No suites found in: {}", path.display());
        return Ok(true);
    }

    config.validate()?;
    println!("Running suites from: {}", path.display());
    println!("Base URL: {}\n", config.base_url);

    let writer = LogWriter::start(&config.log_file);
    let log_file = writer.path().to_path_buf();
    let client = ApiClient::new(config)?.with_logger(writer.logger());
    let store = ReportStore::start();

    let runner = SuiteRunner::new(&client, &store).fail_fast(fail_fast);
    let mut summaries = Vec::with_capacity(suites.len());
    for suite in &suites {
        summaries.push(runner.run(suite).await);
    }

    store.stop().await;
    writer.stop().await;

    let (tabular, structured) = store.export_all(output_dir).await?;
    let metrics = store.snapshot();

    for summary in &summaries {
        print_summary(summary);
    }

    println!("\n=== Results ===\n");
    println!(
        "Total: {}  Passed: {}  Failed: {}  Errors: {}  Success rate: {:.1}%",
        metrics.total_tests,
        metrics.passed_tests,
        metrics.failed_tests,
        metrics.error_tests,
        metrics.success_rate
    );
    println!("Execution time: {:.3}s\n", metrics.total_execution_time);
    println!("Request log: {}", log_file.display());
    println!("CSV report: {}", tabular.display());
    println!("JSON report: {}", structured.display());

    Ok(summaries.iter().all(SuiteSummary::success))
}

fn init_config(config_dir: &Path, env: &str) -> anyhow::Result<bool> {
    let path = HarnessConfig::env_path(config_dir, env);
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(true);
    }

    HarnessConfig::default().save(&path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(true)
}

fn validate(path: &Path) -> anyhow::Result<bool> {
    if !path.exists() {
        anyhow::bail!("Path not found: {}", path.display());
    }

    let suites = SuiteLoader::load_path(path)?;
    if suites.is_empty() {
        println!("No suites found in: {}", path.display());
        return Ok(true);
    }

    let cases: usize = suites.iter().map(|s| s.cases.len()).sum();
    if path.is_dir() {
        println!("✓ {} suites validated, {} cases", suites.len(), cases);
    } else {
        println!("✓ {} is valid, {} cases", path.display(), cases);
    }
    Ok(true)
}

fn print_summary(summary: &SuiteSummary) {
    let status = if summary.success() { "✓" } else { "✗" };
    println!(
        "{} Suite: {} ({}/{} passed)",
        status,
        summary.suite,
        summary.passed(),
        summary.cases.len()
    );

    for case in &summary.cases {
        let case_status = if case.status == TestStatus::Success { "  ✓" } else { "  ✗" };
        println!("  {} {} [{}]", case_status, case.name, case.status);
        if let Some(message) = &case.message {
            for line in message.lines() {
                println!("      {}", line);
            }
        }
    }

    if !summary.skipped.is_empty() {
        println!("  Skipped: {}", summary.skipped.join(", "));
    }
}
