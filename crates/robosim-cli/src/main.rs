//! robosim command-line entry point.
//!
//! Runs challenge scenarios against the reference controllers and prints a
//! pass/fail report. The process exits non-zero when any scenario fails or
//! errors.

mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use robosim_common::config::{FailureMode, HarnessConfig, LagMode, RobotConfig, ScenarioId};
use robosim_scenarios::{reference_controller, ScenarioRunner, SCENARIOS};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use crate::report::{Outcome, Summary};

/// Environment variable naming a configuration file.
const CONFIG_ENV: &str = "ROBOSIM_CONFIG";

/// robosim command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "robosim",
    about = "Deterministic virtual-time test harness for cyclic robot controllers",
    version,
    long_about = None
)]
struct Args {
    /// Path to a harness configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run scenarios against their reference controllers.
    Run {
        /// Scenario ids or names, or `all`.
        #[arg(default_value = "all")]
        scenarios: Vec<String>,

        /// Iterations per run (overrides config file).
        #[arg(long, short = 'n', allow_negative_numbers = true)]
        iterations: Option<i64>,

        /// Stop each run at its first mismatch.
        #[arg(long)]
        fail_fast: bool,

        /// When the motor is compared against the oracle.
        #[arg(long, value_enum)]
        lag_mode: Option<LagModeArg>,

        /// Wall-clock budget per controller call, e.g. `50ms`.
        #[arg(long, value_parser = humantime::parse_duration)]
        step_budget: Option<std::time::Duration>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List registered scenarios.
    List {
        /// Print the list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LagModeArg {
    /// Check at the next iteration against this iteration's prediction.
    #[value(name = "pre_registered")]
    PreRegistered,
    /// Check right after the controller call.
    #[value(name = "same_tick")]
    SameTick,
}

impl From<LagModeArg> for LagMode {
    fn from(arg: LagModeArg) -> Self {
        match arg {
            LagModeArg::PreRegistered => LagMode::PreRegistered,
            LagModeArg::SameTick => LagMode::SameTick,
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(&args.log_level);

    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Run {
            scenarios,
            iterations,
            fail_fast,
            lag_mode,
            step_budget,
            json,
        } => {
            let mut config = config;
            if let Some(n) = iterations {
                config.max_iterations = n;
            }
            if fail_fast {
                config.failure_mode = FailureMode::FailFast;
            }
            if let Some(mode) = lag_mode {
                config.lag_mode = mode.into();
            }
            if step_budget.is_some() {
                config.step_budget = step_budget;
            }

            let ids = parse_selection(&scenarios)?;
            let summary = run_scenarios(&config, &ids);

            if json {
                println!("{}", summary.render_json().context("Failed to serialize report")?);
            } else {
                print!("{}", summary.render_text());
            }

            Ok(if summary.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::List { json } => {
            if json {
                let list: Vec<_> = SCENARIOS
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "id": s.id,
                            "name": s.name,
                            "description": s.description,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                for s in &SCENARIOS {
                    println!("{:>3}  {:<15} {}", s.id.0, s.name, s.description);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            print!("{}", config.to_toml().context("Failed to serialize configuration")?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initialize logging with the specified log level.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging(level: &str) {
    let filter = format!(
        "robosim={level},robosim_runtime={level},robosim_scenarios={level},robosim_common={level}"
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing file wins):
/// 1. Command-line `--config` argument
/// 2. `ROBOSIM_CONFIG` environment variable
/// 3. `config/default.toml` (local development)
/// 4. Built-in defaults
fn load_config(cli_path: Option<&PathBuf>) -> Result<HarnessConfig> {
    // 1. Command-line argument (highest priority)
    if let Some(config_path) = cli_path {
        info!(?config_path, "Loading config from command-line argument");
        return HarnessConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // 2. Environment variable
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let config_path = PathBuf::from(&env_path);
        if config_path.exists() {
            info!(?config_path, "Loading config from {CONFIG_ENV}");
            return HarnessConfig::from_file(&config_path)
                .with_context(|| format!("Failed to load config from {CONFIG_ENV}={env_path}"));
        }
        warn!(
            path = %env_path,
            "{CONFIG_ENV} set but file does not exist, checking other locations"
        );
    }

    // 3. Local development path
    let local_path = PathBuf::from("config/default.toml");
    if local_path.exists() {
        info!(?local_path, "Loading config from local path");
        return HarnessConfig::from_file(&local_path)
            .with_context(|| format!("Failed to load config from {}", local_path.display()));
    }

    // 4. Built-in defaults
    info!("No config file found, using built-in defaults");
    Ok(HarnessConfig::default())
}

/// Resolve scenario arguments (`all`, numeric ids, `challenge-N` or names).
fn parse_selection(args: &[String]) -> Result<Vec<ScenarioId>> {
    let mut ids = Vec::new();

    for arg in args {
        if arg == "all" {
            ids.extend(SCENARIOS.iter().map(|s| s.id));
            continue;
        }

        let numeric = arg.strip_prefix("challenge-").unwrap_or(arg);
        if let Ok(n) = numeric.parse::<u32>() {
            ids.push(ScenarioId(n));
        } else if let Some(s) = SCENARIOS.iter().find(|s| s.name == arg) {
            ids.push(s.id);
        } else {
            bail!("unknown scenario '{arg}' (use an id, a name from `robosim list`, or `all`)");
        }
    }

    Ok(ids)
}

/// Run every selected scenario against a fresh reference controller.
fn run_scenarios(config: &HarnessConfig, ids: &[ScenarioId]) -> Summary {
    let runner = ScenarioRunner::new(config.clone());
    let mut summary = Summary::default();

    for &id in ids {
        let mut controller = reference_controller(RobotConfig {
            challenge: Some(id),
        });
        let outcome = runner.run_detailed(&mut controller);
        summary.push(Outcome::new(id, outcome));
    }

    info!(
        passed = summary.passed,
        failed = summary.failed,
        errored = summary.errored,
        "All scenarios finished"
    );
    summary
}
