//! Command-line interface for the Waymark itinerary engine.
//!
//! `waymark plan <input.json>` reads a visitor and a list of places, loads
//! the optional lookup tables, runs the exhaustive planner and prints the
//! chosen sequence with per-stop explanations as JSON.
#![forbid(unsafe_code)]

mod error;
mod fs;
mod input;
mod output;
mod plan;
mod tables;

use clap::{Parser, Subcommand};

pub use error::CliError;
pub use input::InputError;
pub use output::{FALLBACK_KEY, FALLBACK_NOTE, PlanMetadata, PlanReport, PlanStatus, RunnerUp};
pub use tables::TableLoadError;

use plan::{PlanArgs, run_plan};

const ARG_PLAN_INPUT: &str = "input";
const ARG_PLAN_WEIGHTS: &str = "weights";
const ARG_PLAN_MAPPINGS: &str = "mappings";
const ARG_PLAN_TIMES: &str = "times";
const ARG_PLAN_SEQUENCES: &str = "sequences";
const ARG_PLAN_WALKING_SPEED: &str = "walking-speed";
const ARG_PLAN_RUNNERS_UP: &str = "runners-up";
const ARG_PLAN_TIMEOUT_MS: &str = "timeout-ms";
const ARG_PLAN_OUTPUT: &str = "output";
const ENV_PLAN_INPUT: &str = "WAYMARK_CMDS_PLAN_INPUT";

/// Run the Waymark CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when arguments, configuration or input are
/// invalid, when planning fails, or when the report cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    match cli.command {
        Command::Plan(args) => run_plan(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already installed");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymark",
    about = "Choose and order a short walking itinerary",
    version
)]
struct Cli {
    /// Log planning stages to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a sequence of two or three places from a JSON input file.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
