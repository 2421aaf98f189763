//! Error types emitted by the Waymark CLI.
//!
//! Table problems never surface here: they are absorbed as warnings.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waymark_core::{PlanError, PlanRequestValidationError};

use crate::InputError;

/// Errors emitted by the Waymark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that could supply it.
        env: &'static str,
    },
    /// An option held a value the planner cannot use.
    #[error("invalid --{field}: {reason}")]
    InvalidArgument {
        /// Name of the offending option.
        field: &'static str,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// Opening the input file failed.
    #[error("failed to open input at {path:?}: {source}")]
    OpenInput {
        /// Path that was opened.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The input file was not valid JSON of the expected shape.
    #[error("failed to parse input JSON at {path:?}: {source}")]
    ParseInput {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// A record in the input was incomplete or malformed.
    #[error("input in {path:?} is invalid: {source}")]
    InvalidInput {
        /// Path that was read.
        path: Utf8PathBuf,
        /// What was wrong with the record.
        #[source]
        source: InputError,
    },
    /// The assembled request failed validation.
    #[error("plan request in {path:?} failed validation: {source}")]
    InvalidRequest {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: PlanRequestValidationError,
    },
    /// The planner rejected the request or timed out.
    #[error("planning failed: {0}")]
    Plan(#[source] PlanError),
    /// Serializing the report failed.
    #[error("failed to serialize plan report: {0}")]
    SerializeReport(#[source] serde_json::Error),
    /// Writing the report failed.
    #[error("failed to write plan report: {0}")]
    WriteReport(#[source] std::io::Error),
}
