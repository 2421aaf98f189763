//! Exhaustive search over arrangements of two and three candidates.
//!
//! Every ordering is walked from the start location to compute arrival
//! instants. Arrangements that reach a closed place or overrun the budget are
//! discarded before scoring. The rest are ranked by score, then by travel
//! minutes, then by their id sequence.

mod permutations;

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use waymark_core::{Edge, Node, PlaceGraph, PlanError, RankedArrangement};
use waymark_scorer::{ScoreBreakdown, Visit, WeightedScorer};

pub use permutations::{KPermutations, permutation_count};

/// Arrangement sizes searched, smallest first.
pub const ARRANGEMENT_SIZES: [usize; 2] = [2, 3];

/// Grid that scores are snapped to before ranking.
pub const SCORE_TIE_TOLERANCE: f64 = 1e-9;

const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Limits applied to one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchLimits {
    /// Largest admissible total of travel and visit minutes.
    pub budget_minutes: f64,
    /// How many ranked arrangements to keep for reporting.
    pub runner_up_limit: usize,
    /// When the search must give up.
    pub deadline: Option<Deadline>,
}

/// A point in time after which the search aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    /// A deadline `limit` after `started`.
    #[must_use]
    pub const fn new(started: Instant, limit: Duration) -> Self {
        Self { started, limit }
    }

    fn check(&self) -> Result<(), PlanError> {
        if self.started.elapsed() > self.limit {
            return Err(PlanError::Timeout { limit: self.limit });
        }
        Ok(())
    }
}

/// A stop along a walked arrangement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedVisit {
    /// Graph index of the place.
    pub index: usize,
    /// Leg walked to reach the place.
    pub leg: Edge,
    /// Arrival instant in minutes since the start day's midnight.
    pub arrival_minute: f64,
    /// Minutes spent since leaving the start, on arrival.
    pub elapsed_minutes: f64,
}

/// A feasible, scored arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    /// Stops in visiting order.
    pub visits: Vec<PlannedVisit>,
    /// Travel plus visit minutes.
    pub total_minutes: f64,
    /// Travel minutes alone.
    pub travel_minutes: f64,
    /// Weighted score components.
    pub score: ScoreBreakdown,
    ids: Vec<String>,
}

impl Arrangement {
    /// Place ids in visiting order.
    #[must_use]
    pub fn place_ids(&self) -> &[String] {
        &self.ids
    }

    /// Summary for diagnostics.
    #[must_use]
    pub fn ranked(&self) -> RankedArrangement {
        RankedArrangement {
            place_ids: self.ids.clone(),
            score: self.score.total(),
            total_minutes: self.total_minutes,
        }
    }

    /// Orders arrangements best first.
    ///
    /// Scores are snapped to multiples of [`SCORE_TIE_TOLERANCE`]; higher
    /// snapped scores win, and equal ones fall through to fewer travel
    /// minutes, then to the smaller id sequence.
    #[must_use]
    pub fn rank(&self, other: &Self) -> Ordering {
        snapped_score(other.score.total())
            .total_cmp(&snapped_score(self.score.total()))
            .then_with(|| self.travel_minutes.total_cmp(&other.travel_minutes))
            .then_with(|| self.ids.cmp(&other.ids))
    }
}

#[expect(clippy::float_arithmetic, reason = "scores are bucketed by tolerance")]
const fn snapped_score(score: f64) -> f64 {
    (score / SCORE_TIE_TOLERANCE).round()
}

/// What a search found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// Best arrangements, winner first.
    pub ranked: Vec<Arrangement>,
    /// Arrangements enumerated.
    pub enumerated: usize,
    /// Arrangements that passed feasibility checks.
    pub feasible: usize,
}

impl SearchOutcome {
    /// The winning arrangement.
    #[must_use]
    pub fn best(&self) -> Option<&Arrangement> {
        self.ranked.first()
    }
}

/// Searches arrangements of a candidate set.
#[derive(Debug, Clone, Copy)]
pub struct SequenceSearch<'a> {
    graph: &'a PlaceGraph,
    scorer: WeightedScorer<'a>,
    start_minute: u16,
    limits: SearchLimits,
}

impl<'a> SequenceSearch<'a> {
    /// Construct a search.
    #[must_use]
    pub const fn new(
        graph: &'a PlaceGraph,
        scorer: WeightedScorer<'a>,
        start_minute: u16,
        limits: SearchLimits,
    ) -> Self {
        Self {
            graph,
            scorer,
            start_minute,
            limits,
        }
    }

    /// Enumerate, check and score every arrangement of `candidates`.
    ///
    /// # Errors
    /// Returns [`PlanError::Timeout`] when the deadline passes.
    pub fn run(&self, candidates: &[usize]) -> Result<SearchOutcome, PlanError> {
        let keep = self.limits.runner_up_limit.saturating_add(1);
        let mut outcome = SearchOutcome::default();
        for size in ARRANGEMENT_SIZES {
            for selection in KPermutations::new(candidates.len(), size) {
                outcome.enumerated += 1;
                if outcome.enumerated.is_multiple_of(DEADLINE_CHECK_INTERVAL)
                    && let Some(deadline) = &self.limits.deadline
                {
                    deadline.check()?;
                }
                let indices: Vec<usize> = selection
                    .iter()
                    .filter_map(|&position| candidates.get(position).copied())
                    .collect();
                let Some(arrangement) = self.evaluate(&indices) else {
                    continue;
                };
                outcome.feasible += 1;
                insert_ranked(&mut outcome.ranked, arrangement, keep);
            }
        }
        if let Some(deadline) = &self.limits.deadline {
            deadline.check()?;
        }
        log::debug!(
            "search over {} candidates: {} enumerated, {} feasible",
            candidates.len(),
            outcome.enumerated,
            outcome.feasible
        );
        Ok(outcome)
    }

    /// Walk `indices` in order, returning `None` when infeasible.
    #[must_use]
    pub fn evaluate(&self, indices: &[usize]) -> Option<Arrangement> {
        let visits = self.walk(indices)?;
        let places = visits
            .iter()
            .map(|visit| self.graph.place(visit.index))
            .collect::<Option<Vec<_>>>()?;
        let scored: Vec<Visit<'_>> = visits
            .iter()
            .zip(&places)
            .map(|(visit, place)| Visit {
                place,
                leg: visit.leg,
                arrival_minute: visit.arrival_minute,
            })
            .collect();
        let score = self.scorer.score(&scored);
        let (total_minutes, travel_minutes) = totals(&visits, &places);
        Some(Arrangement {
            ids: places.iter().map(|place| place.id.clone()).collect(),
            visits,
            total_minutes,
            travel_minutes,
            score,
        })
    }

    #[expect(clippy::float_arithmetic, reason = "arrival times accumulate minutes")]
    fn walk(&self, indices: &[usize]) -> Option<Vec<PlannedVisit>> {
        let start = f64::from(self.start_minute);
        let mut elapsed = 0.0;
        let mut previous = Node::Start;
        let mut visits = Vec::with_capacity(indices.len());
        for &index in indices {
            let place = self.graph.place(index)?;
            let leg = self.graph.edge(previous, Node::Place(index))?;
            elapsed += leg.travel_minutes;
            let arrival_minute = start + elapsed;
            if !place.is_open_at(arrival_minute) {
                return None;
            }
            visits.push(PlannedVisit {
                index,
                leg,
                arrival_minute,
                elapsed_minutes: elapsed,
            });
            elapsed += f64::from(place.visit_minutes);
            if elapsed > self.limits.budget_minutes {
                return None;
            }
            previous = Node::Place(index);
        }
        Some(visits)
    }
}

#[expect(clippy::float_arithmetic, reason = "totals sum fractional minutes")]
fn totals(visits: &[PlannedVisit], places: &[&waymark_core::Place]) -> (f64, f64) {
    let travel: f64 = visits.iter().map(|visit| visit.leg.travel_minutes).sum();
    let visiting: f64 = places
        .iter()
        .map(|place| f64::from(place.visit_minutes))
        .sum();
    (travel + visiting, travel)
}

fn insert_ranked(ranked: &mut Vec<Arrangement>, arrangement: Arrangement, keep: usize) {
    let position = ranked
        .iter()
        .position(|existing| arrangement.rank(existing) == Ordering::Less)
        .unwrap_or(ranked.len());
    if position >= keep {
        return;
    }
    ranked.insert(position, arrangement);
    ranked.truncate(keep);
}
