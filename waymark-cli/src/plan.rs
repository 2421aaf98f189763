//! Plan command implementation for the Waymark CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{Context, DEFAULT_WALKING_SPEED_KMH, Place, PlanRequest, Planner};
use waymark_planner::{DEFAULT_RUNNER_UP_LIMIT, ExhaustivePlanner, ExhaustivePlannerConfig};

use crate::fs::{create_utf8_file, open_utf8_file};
use crate::input::RawInput;
use crate::output::{PlanReport, write_report};
use crate::tables::TablePaths;
use crate::{
    ARG_PLAN_INPUT, ARG_PLAN_MAPPINGS, ARG_PLAN_OUTPUT, ARG_PLAN_RUNNERS_UP, ARG_PLAN_SEQUENCES,
    ARG_PLAN_TIMEOUT_MS, ARG_PLAN_TIMES, ARG_PLAN_WALKING_SPEED, ARG_PLAN_WEIGHTS, CliError,
    ENV_PLAN_INPUT,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Choose two or three places from a JSON input file and \
                 order them within the visitor's time budget. Table files \
                 tune scoring; any that cannot be read are replaced by \
                 built-in defaults and listed as warnings.",
    about = "Plan a short itinerary"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct PlanArgs {
    /// Path to the JSON input with `user` and `places` sections.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Scoring weights JSON; missing keys keep their defaults.
    #[arg(long = ARG_PLAN_WEIGHTS, value_name = "path")]
    #[serde(default)]
    pub(crate) weights: Option<Utf8PathBuf>,
    /// Preference → place types JSON.
    #[arg(long = ARG_PLAN_MAPPINGS, value_name = "path")]
    #[serde(default)]
    pub(crate) mappings: Option<Utf8PathBuf>,
    /// Preferred visiting windows JSON.
    #[arg(long = ARG_PLAN_TIMES, value_name = "path")]
    #[serde(default)]
    pub(crate) times: Option<Utf8PathBuf>,
    /// Logical sequence rules JSON.
    #[arg(long = ARG_PLAN_SEQUENCES, value_name = "path")]
    #[serde(default)]
    pub(crate) sequences: Option<Utf8PathBuf>,
    /// Walking speed in km/h.
    #[arg(long = ARG_PLAN_WALKING_SPEED, value_name = "kmh")]
    #[serde(default)]
    pub(crate) walking_speed: Option<f64>,
    /// How many ranked arrangements to list in the metadata.
    #[arg(long = ARG_PLAN_RUNNERS_UP, value_name = "count")]
    #[serde(default)]
    pub(crate) runners_up: Option<usize>,
    /// Abort planning after this many milliseconds.
    #[arg(long = ARG_PLAN_TIMEOUT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) timeout_ms: Option<u64>,
    /// Write the report here instead of stdout.
    #[arg(long = ARG_PLAN_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// Path to the JSON input file.
    pub(crate) input: Utf8PathBuf,
    /// Optional table files.
    pub(crate) tables: TablePaths,
    /// Planner settings.
    pub(crate) planner: ExhaustivePlannerConfig,
    /// Report destination; `None` writes to the caller's writer.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_INPUT,
            env: ENV_PLAN_INPUT,
        })?;

        let walking_speed_kmh = args.walking_speed.unwrap_or(DEFAULT_WALKING_SPEED_KMH);
        if !(walking_speed_kmh.is_finite() && walking_speed_kmh > 0.0) {
            return Err(CliError::InvalidArgument {
                field: ARG_PLAN_WALKING_SPEED,
                reason: "must be a positive number",
            });
        }
        let time_limit = match args.timeout_ms {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_PLAN_TIMEOUT_MS,
                    reason: "must be at least 1",
                });
            }
            other => other.map(Duration::from_millis),
        };

        Ok(Self {
            input,
            tables: TablePaths {
                weights: args.weights,
                mappings: args.mappings,
                times: args.times,
                sequences: args.sequences,
            },
            planner: ExhaustivePlannerConfig {
                walking_speed_kmh,
                runner_up_limit: args.runners_up.unwrap_or(DEFAULT_RUNNER_UP_LIMIT),
                time_limit,
            },
            output: args.output,
        })
    }
}

/// Builds a planner for the current plan invocation.
pub(super) trait PlanPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Box<dyn Planner>;
}

pub(super) struct DefaultPlanPlannerBuilder;

impl PlanPlannerBuilder for DefaultPlanPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Box<dyn Planner> {
        Box::new(ExhaustivePlanner::with_config(config.planner.clone()))
    }
}

pub(super) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultPlanPlannerBuilder, &mut stdout)
}

pub(super) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn PlanPlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_plan(&config, builder)?;
    match &config.output {
        Some(path) => {
            let mut file = create_utf8_file(path).map_err(CliError::WriteReport)?;
            write_report(&mut file, &report)?;
            log::debug!("report written to {path}");
            Ok(())
        }
        None => write_report(writer, &report),
    }
}

fn execute_plan(
    config: &PlanConfig,
    builder: &dyn PlanPlannerBuilder,
) -> Result<PlanReport, CliError> {
    let (context, places) = load_plan_input(&config.input)?;
    let loaded = config.tables.load();
    let request = PlanRequest {
        context,
        places,
        tables: loaded.tables,
    };
    request
        .validate()
        .map_err(|source| CliError::InvalidRequest {
            path: config.input.clone(),
            source,
        })?;
    log::debug!(
        "planning over {} places with {} preferences",
        request.places.len(),
        request.context.preferences.len()
    );
    let planner = builder.build(config);
    let response = planner.plan(&request).map_err(CliError::Plan)?;
    log::debug!("planning took {:?}", response.diagnostics.solve_time);
    Ok(PlanReport::from_response(&response, loaded.warnings))
}

/// Loads the visitor context and places from a JSON input file.
pub(super) fn load_plan_input(path: &Utf8Path) -> Result<(Context, Vec<Place>), CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawInput =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
            path: path.to_path_buf(),
            source,
        })?;
    raw.into_parts().map_err(|source| CliError::InvalidInput {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
