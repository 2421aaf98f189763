use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::{Context, ContextError, Edge, GraphError, Place, PlaceError, PlanningTables};

/// Share of the time budget granted when the fallback relaxes it.
pub const BUDGET_TOLERANCE: f64 = 0.05;

/// Everything a planner needs for one request.
///
/// # Examples
/// ```rust
/// use geo::Coord;
/// use waymark_core::{Context, PlanRequest, PlanningTables};
///
/// let request = PlanRequest {
///     context: Context::new(Coord { x: 0.0, y: 0.0 }, 540, 120).with_preference("coffee"),
///     places: Vec::new(),
///     tables: PlanningTables::default(),
/// };
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// Start, budget, preferences and avoid conditions.
    pub context: Context,
    /// Places to choose from.
    pub places: Vec<Place>,
    /// Weights and lookup tables.
    pub tables: PlanningTables,
}

/// Reasons a [`PlanRequest`] is rejected before planning starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanRequestValidationError {
    /// The context was malformed.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// A place was malformed.
    #[error(transparent)]
    Place(#[from] PlaceError),
    /// Two places shared an identifier.
    #[error("place id {id:?} appears more than once")]
    DuplicatePlaceId {
        /// The repeated identifier.
        id: String,
    },
}

impl PlanRequest {
    /// Check the context and every place.
    pub fn validate(&self) -> Result<(), PlanRequestValidationError> {
        self.context.validate()?;
        let mut seen = HashSet::with_capacity(self.places.len());
        for place in &self.places {
            place.validate()?;
            if !seen.insert(place.id.as_str()) {
                return Err(PlanRequestValidationError::DuplicatePlaceId {
                    id: place.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A constraint relaxed because nothing survived the stricter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relaxation {
    /// Avoid conditions were ignored.
    AvoidListDisabled,
    /// The time budget was extended by [`BUDGET_TOLERANCE`].
    BudgetTolerance,
}

impl Relaxation {
    /// Stable identifier for reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AvoidListDisabled => "avoid_list_disabled",
            Self::BudgetTolerance => "budget_tolerance",
        }
    }
}

impl fmt::Display for Relaxation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visit in an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Identifier of the visited place.
    pub place_id: String,
    /// Arrival instant in minutes since the start day's midnight.
    pub arrival_minute: f64,
    /// The leg walked to reach this stop.
    pub leg: Edge,
    /// Why the stop was chosen.
    pub explanation: String,
}

/// The winning arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    /// Stops in visiting order.
    pub stops: Vec<Stop>,
    /// Travel plus visit time in minutes.
    pub total_minutes: f64,
    /// Weighted score of the arrangement.
    pub score: f64,
}

impl Itinerary {
    /// Place identifiers in visiting order.
    pub fn sequence(&self) -> Vec<&str> {
        self.stops.iter().map(|s| s.place_id.as_str()).collect()
    }

    /// The explanation for `place_id`.
    pub fn explanation(&self, place_id: &str) -> Option<&str> {
        self.stops
            .iter()
            .find(|s| s.place_id == place_id)
            .map(|s| s.explanation.as_str())
    }
}

/// Why no itinerary could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoSequenceReason {
    /// No place survived filtering, even after every relaxation.
    NoCandidates,
    /// Candidates existed but no arrangement of two or three was feasible.
    NoFeasibleArrangement,
}

/// Result of planning: an itinerary or an explicit absence of one.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// A feasible arrangement was found.
    Found(Itinerary),
    /// No sequence was found.
    NoSequenceFound(NoSequenceReason),
}

/// A scored arrangement kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedArrangement {
    /// Place identifiers in visiting order.
    pub place_ids: Vec<String>,
    /// Weighted score.
    pub score: f64,
    /// Travel plus visit time in minutes.
    pub total_minutes: f64,
}

/// Metadata describing how a response was produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Candidates left after filtering and de-duplication.
    pub candidates: usize,
    /// Arrangements enumerated by the search.
    pub arrangements_enumerated: usize,
    /// Arrangements that passed feasibility checks and were scored.
    pub arrangements_feasible: usize,
    /// Relaxations applied, in the order they were attempted.
    pub relaxations: Vec<Relaxation>,
    /// Next-best arrangements after the winner, best first.
    pub runners_up: Vec<RankedArrangement>,
    /// Time spent planning.
    pub solve_time: Duration,
}

/// Response from a planner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResponse {
    /// The itinerary or the reason none exists.
    pub outcome: PlanOutcome,
    /// How the outcome was reached.
    pub diagnostics: Diagnostics,
}

impl PlanResponse {
    /// The itinerary, when one was found.
    pub fn itinerary(&self) -> Option<&Itinerary> {
        match &self.outcome {
            PlanOutcome::Found(itinerary) => Some(itinerary),
            PlanOutcome::NoSequenceFound(_) => None,
        }
    }

    /// Whether any constraint was relaxed.
    pub fn used_fallback(&self) -> bool {
        !self.diagnostics.relaxations.is_empty()
    }
}

/// Errors returned by [`Planner::plan`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The request was malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] PlanRequestValidationError),
    /// The graph could not be built.
    #[error("failed to build graph: {0}")]
    Graph(#[from] GraphError),
    /// Planning exceeded the caller's time limit.
    #[error("planning exceeded the {limit:?} time limit")]
    Timeout {
        /// The configured limit.
        limit: Duration,
    },
}

/// Choose and order places for a visitor.
///
/// Implementations are pure functions of the request and must be
/// `Send + Sync` so requests can be planned in parallel.
pub trait Planner: Send + Sync {
    /// Plan a request. "No sequence found" is an `Ok` outcome.
    fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlanError>;
}
