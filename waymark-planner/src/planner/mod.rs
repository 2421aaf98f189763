//! `ExhaustivePlanner`: filter, search, score and explain in one pass.

use std::time::{Duration, Instant};

use waymark_core::{
    BUDGET_TOLERANCE, DEFAULT_WALKING_SPEED_KMH, Diagnostics, GraphBuilder, Itinerary,
    NoSequenceReason, PlanError, PlanOutcome, PlanRequest, PlanResponse, Planner, Stop,
};
use waymark_scorer::WeightedScorer;

use crate::explain::Explainer;
use crate::filter::CandidateFilter;
use crate::search::{Deadline, SearchLimits, SequenceSearch};

/// Runner-up arrangements reported by default.
pub const DEFAULT_RUNNER_UP_LIMIT: usize = 5;

/// Configuration for [`ExhaustivePlanner`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExhaustivePlannerConfig {
    /// Walking speed used to derive travel times.
    pub walking_speed_kmh: f64,
    /// Ranked arrangements kept in the diagnostics; zero keeps none.
    pub runner_up_limit: usize,
    /// Abort planning after this long.
    pub time_limit: Option<Duration>,
}

impl Default for ExhaustivePlannerConfig {
    fn default() -> Self {
        Self {
            walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
            runner_up_limit: DEFAULT_RUNNER_UP_LIMIT,
            time_limit: None,
        }
    }
}

/// Planner that evaluates every arrangement of two and three candidates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{Context, Place, PlanRequest, Planner, PlanningTables, TimeWindow};
/// use waymark_planner::ExhaustivePlanner;
///
/// let place = |id: &str, kind: &str, lat: f64| {
///     Place::new(id, kind, Coord { x: 0.0, y: lat })
///         .with_window(TimeWindow::all_day())
///         .with_visit_minutes(20)
/// };
/// let request = PlanRequest {
///     context: Context::new(Coord { x: 0.0, y: 0.0 }, 600, 90)
///         .with_preference("park")
///         .with_preference("cafe"),
///     places: vec![place("p", "park", 0.002), place("c", "cafe", 0.004)],
///     tables: PlanningTables::default(),
/// };
///
/// let response = ExhaustivePlanner::new().plan(&request)?;
/// let itinerary = response.itinerary().expect("two stops fit");
/// assert_eq!(itinerary.sequence(), ["p", "c"]);
/// # Ok::<(), waymark_core::PlanError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExhaustivePlanner {
    config: ExhaustivePlannerConfig,
}

impl ExhaustivePlanner {
    /// Construct a planner using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a planner with explicit configuration.
    #[must_use]
    pub const fn with_config(config: ExhaustivePlannerConfig) -> Self {
        Self { config }
    }

    /// The planner's configuration.
    #[must_use]
    pub const fn config(&self) -> &ExhaustivePlannerConfig {
        &self.config
    }
}

impl Planner for ExhaustivePlanner {
    fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlanError> {
        request.validate()?;
        let started_at = Instant::now();
        let context = &request.context;

        let graph = GraphBuilder::new()
            .with_walking_speed(self.config.walking_speed_kmh)
            .build(request.places.clone(), context.start)?;
        let scorer = WeightedScorer::new(&request.tables, context);

        let filtered = CandidateFilter::new(&graph, context, scorer).run();
        let mut diagnostics = Diagnostics {
            candidates: filtered.candidates.len(),
            relaxations: filtered.relaxations.clone(),
            ..Diagnostics::default()
        };
        if filtered.candidates.is_empty() {
            log::debug!("no candidates survived filtering");
            diagnostics.solve_time = started_at.elapsed();
            return Ok(PlanResponse {
                outcome: PlanOutcome::NoSequenceFound(NoSequenceReason::NoCandidates),
                diagnostics,
            });
        }

        let limits = SearchLimits {
            budget_minutes: budget_limit(context.budget_minutes, filtered.is_relaxed()),
            runner_up_limit: self.config.runner_up_limit,
            deadline: self
                .config
                .time_limit
                .map(|limit| Deadline::new(started_at, limit)),
        };
        let searched = SequenceSearch::new(&graph, scorer, context.start_minute, limits)
            .run(&filtered.candidates)?;
        diagnostics.arrangements_enumerated = searched.enumerated;
        diagnostics.arrangements_feasible = searched.feasible;
        diagnostics.runners_up = searched
            .ranked
            .iter()
            .skip(1)
            .take(self.config.runner_up_limit)
            .map(crate::search::Arrangement::ranked)
            .collect();

        let Some(best) = searched.best() else {
            log::debug!("no feasible arrangement among {} candidates", diagnostics.candidates);
            diagnostics.solve_time = started_at.elapsed();
            return Ok(PlanResponse {
                outcome: PlanOutcome::NoSequenceFound(NoSequenceReason::NoFeasibleArrangement),
                diagnostics,
            });
        };

        let explanations = Explainer::new(&graph, context, scorer, filtered.is_relaxed())
            .explain(&best.visits);
        let stops = best
            .visits
            .iter()
            .zip(best.place_ids())
            .zip(explanations)
            .map(|((visit, place_id), explanation)| Stop {
                place_id: place_id.clone(),
                arrival_minute: visit.arrival_minute,
                leg: visit.leg,
                explanation,
            })
            .collect();
        let itinerary = Itinerary {
            stops,
            total_minutes: best.total_minutes,
            score: best.score.total(),
        };
        log::debug!(
            "selected {} with score {:.3}",
            best.place_ids().join(" -> "),
            itinerary.score
        );
        diagnostics.solve_time = started_at.elapsed();
        Ok(PlanResponse {
            outcome: PlanOutcome::Found(itinerary),
            diagnostics,
        })
    }
}

/// The budget the search enforces, widened by [`BUDGET_TOLERANCE`] in
/// fallback mode.
#[expect(clippy::float_arithmetic, reason = "tolerance widens the budget")]
fn budget_limit(budget_minutes: u32, relaxed: bool) -> f64 {
    let budget = f64::from(budget_minutes);
    if relaxed {
        budget * (1.0 + BUDGET_TOLERANCE)
    } else {
        budget
    }
}

#[cfg(test)]
mod tests;
