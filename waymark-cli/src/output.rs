//! The JSON report printed by `waymark plan`.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};
use waymark_core::{NoSequenceReason, PlanOutcome, PlanResponse, RankedArrangement};

use crate::CliError;

/// Explanation key carrying the fallback notice.
pub const FALLBACK_KEY: &str = "_fallback";

/// Notice attached to results produced after relaxing constraints.
pub const FALLBACK_NOTE: &str =
    "No places matching all constraints found; showing best available options";

/// Whether a sequence was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// An itinerary was produced.
    Ok,
    /// Planning completed without a feasible sequence.
    NoSequenceFound,
}

/// A ranked arrangement as reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerUp {
    /// Place ids in visiting order.
    pub sequence: Vec<String>,
    /// Weighted score.
    pub score: f64,
    /// Travel plus visit minutes, to one decimal place.
    pub total_time_minutes: f64,
}

/// How the report was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanMetadata {
    /// Candidates that survived filtering.
    pub candidates: usize,
    /// Arrangements enumerated.
    pub arrangements_evaluated: usize,
    /// Arrangements that passed feasibility checks.
    pub arrangements_feasible: usize,
    /// Relaxations applied, in order.
    pub relaxations: Vec<String>,
    /// Why no sequence was found, when none was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Next-best arrangements, best first; the winner is not repeated.
    pub runners_up: Vec<RunnerUp>,
    /// Table files replaced by defaults.
    pub warnings: Vec<String>,
}

/// The document written to stdout or `--output`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    /// Place ids in visiting order; empty when nothing was found.
    pub sequence: Vec<String>,
    /// Travel plus visit minutes, to one decimal place.
    pub total_time_minutes: f64,
    /// Place id → explanation, plus [`FALLBACK_KEY`] when relaxed.
    pub explanation: BTreeMap<String, String>,
    /// Score of the chosen sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Outcome.
    pub status: PlanStatus,
    /// Diagnostics.
    pub metadata: PlanMetadata,
}

impl PlanReport {
    /// Summarise a planner response.
    pub fn from_response(response: &PlanResponse, warnings: Vec<String>) -> Self {
        let diagnostics = &response.diagnostics;
        let mut metadata = PlanMetadata {
            candidates: diagnostics.candidates,
            arrangements_evaluated: diagnostics.arrangements_enumerated,
            arrangements_feasible: diagnostics.arrangements_feasible,
            relaxations: diagnostics
                .relaxations
                .iter()
                .map(|r| r.as_str().to_owned())
                .collect(),
            reason: None,
            runners_up: diagnostics.runners_up.iter().map(RunnerUp::from).collect(),
            warnings,
        };
        match &response.outcome {
            PlanOutcome::Found(itinerary) => {
                let mut explanation: BTreeMap<String, String> = itinerary
                    .stops
                    .iter()
                    .map(|stop| (stop.place_id.clone(), stop.explanation.clone()))
                    .collect();
                if response.used_fallback() {
                    explanation.insert(FALLBACK_KEY.to_owned(), FALLBACK_NOTE.to_owned());
                }
                Self {
                    sequence: itinerary.stops.iter().map(|s| s.place_id.clone()).collect(),
                    total_time_minutes: tenths(itinerary.total_minutes),
                    explanation,
                    score: Some(itinerary.score),
                    status: PlanStatus::Ok,
                    metadata,
                }
            }
            PlanOutcome::NoSequenceFound(reason) => {
                metadata.reason = Some(
                    match reason {
                        NoSequenceReason::NoCandidates => "no_candidates",
                        NoSequenceReason::NoFeasibleArrangement => "no_feasible_arrangement",
                    }
                    .to_owned(),
                );
                Self {
                    sequence: Vec::new(),
                    total_time_minutes: 0.0,
                    explanation: BTreeMap::new(),
                    score: None,
                    status: PlanStatus::NoSequenceFound,
                    metadata,
                }
            }
        }
    }
}

impl From<&RankedArrangement> for RunnerUp {
    fn from(ranked: &RankedArrangement) -> Self {
        Self {
            sequence: ranked.place_ids.clone(),
            score: ranked.score,
            total_time_minutes: tenths(ranked.total_minutes),
        }
    }
}

fn tenths(minutes: f64) -> f64 {
    (minutes * 10.0).round() / 10.0
}

/// Write `report` as pretty JSON followed by a newline.
pub(crate) fn write_report(writer: &mut dyn Write, report: &PlanReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteReport)?;
    Ok(())
}
