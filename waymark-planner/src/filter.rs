//! Hard-constraint filtering of places into search candidates.
//!
//! Filtering runs in two phases. Phase A checks each place on its own:
//! preference relevance, avoid conditions, opening hours at the direct
//! arrival time, and an early budget prune. Phase B keeps a single place per
//! type. When nothing survives, the filter retries with progressively relaxed
//! passes and records each relaxation it attempted.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use waymark_core::{AvoidCondition, BUDGET_TOLERANCE, Context, PlaceGraph, Relaxation};
use waymark_scorer::WeightedScorer;

/// One attempt at filtering, from strict to most relaxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPass {
    /// Every constraint applies.
    Strict,
    /// Avoid conditions are ignored.
    AvoidListDisabled,
    /// Avoid conditions are ignored and the budget prune is extended.
    BudgetRelaxed,
}

impl FilterPass {
    /// Passes in the order they are attempted.
    pub const ALL: [Self; 3] = [Self::Strict, Self::AvoidListDisabled, Self::BudgetRelaxed];

    /// Relaxations in effect during this pass.
    #[must_use]
    pub const fn relaxations(self) -> &'static [Relaxation] {
        match self {
            Self::Strict => &[],
            Self::AvoidListDisabled => &[Relaxation::AvoidListDisabled],
            Self::BudgetRelaxed => &[Relaxation::AvoidListDisabled, Relaxation::BudgetTolerance],
        }
    }

    /// Whether avoid conditions disqualify places.
    #[must_use]
    pub const fn honours_avoid_list(self) -> bool {
        matches!(self, Self::Strict)
    }

    /// Multiplier applied to the budget for the early prune.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "tolerance is a fraction of the budget")]
    pub fn budget_factor(self) -> f64 {
        match self {
            Self::Strict | Self::AvoidListDisabled => 1.0,
            Self::BudgetRelaxed => 1.0 + BUDGET_TOLERANCE,
        }
    }
}

/// Why Phase A dropped a place.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection<'a> {
    /// No preference matched.
    Irrelevant,
    /// An avoid condition applied.
    Avoided(&'a AvoidCondition),
    /// Closed at the direct arrival instant.
    Closed {
        /// Arrival in minutes since the start day's midnight.
        arrival_minute: f64,
    },
    /// Reaching and visiting the place alone exceeds the budget.
    OverBudget {
        /// Travel plus visit minutes.
        required_minutes: f64,
    },
}

impl fmt::Display for Rejection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Irrelevant => f.write_str("matches no preference"),
            Self::Avoided(condition) => write!(f, "avoided as {condition}"),
            Self::Closed { arrival_minute } => write!(f, "closed at minute {arrival_minute:.1}"),
            Self::OverBudget { required_minutes } => {
                write!(f, "needs {required_minutes:.1} minutes")
            }
        }
    }
}

/// Candidates that survived filtering and the relaxations needed to get them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Graph indices of surviving places, in input order.
    pub candidates: Vec<usize>,
    /// Relaxations attempted, in order.
    pub relaxations: Vec<Relaxation>,
}

impl FilterOutcome {
    /// Whether any relaxation was applied.
    #[must_use]
    pub fn is_relaxed(&self) -> bool {
        !self.relaxations.is_empty()
    }
}

/// Applies hard constraints to the places of a graph.
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter<'a> {
    graph: &'a PlaceGraph,
    context: &'a Context,
    scorer: WeightedScorer<'a>,
}

impl<'a> CandidateFilter<'a> {
    /// Construct a filter.
    #[must_use]
    pub const fn new(
        graph: &'a PlaceGraph,
        context: &'a Context,
        scorer: WeightedScorer<'a>,
    ) -> Self {
        Self {
            graph,
            context,
            scorer,
        }
    }

    /// Run the strict pass and, if it comes back empty, the relaxed passes.
    #[must_use]
    pub fn run(&self) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        for pass in FilterPass::ALL {
            outcome.relaxations = pass.relaxations().to_vec();
            let admitted = self.admitted(pass);
            outcome.candidates = self.deduplicate(&admitted);
            log::debug!(
                "filter pass {pass:?}: {} admitted, {} after de-duplication",
                admitted.len(),
                outcome.candidates.len()
            );
            if !outcome.candidates.is_empty() {
                break;
            }
        }
        if outcome.is_relaxed() {
            let applied: Vec<&str> = outcome.relaxations.iter().map(Relaxation::as_str).collect();
            log::debug!("fallback relaxations: {}", applied.join(", "));
        }
        outcome
    }

    /// Phase A: indices of places satisfying every per-place constraint.
    #[must_use]
    pub fn admitted(&self, pass: FilterPass) -> Vec<usize> {
        (0..self.graph.len())
            .filter(|&index| match self.rejection(index, pass) {
                None => true,
                Some(reason) => {
                    if let Some(place) = self.graph.place(index) {
                        log::debug!("dropping {}: {reason}", place.id);
                    }
                    false
                }
            })
            .collect()
    }

    /// The first constraint the place at `index` fails under `pass`.
    ///
    /// Unknown indices are reported as irrelevant.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "arrival and budget checks use fractional minutes"
    )]
    pub fn rejection(&self, index: usize, pass: FilterPass) -> Option<Rejection<'a>> {
        let (Some(place), Some(edge)) = (self.graph.place(index), self.graph.edge_from_start(index))
        else {
            return Some(Rejection::Irrelevant);
        };
        if !self.scorer.preference_match(place).is_relevant() {
            return Some(Rejection::Irrelevant);
        }
        if pass.honours_avoid_list()
            && let Some(condition) = self.context.violated_condition(place)
        {
            return Some(Rejection::Avoided(condition));
        }
        let arrival_minute = f64::from(self.context.start_minute) + edge.travel_minutes;
        if !place.is_open_at(arrival_minute) {
            return Some(Rejection::Closed { arrival_minute });
        }
        let required_minutes = edge.travel_minutes + f64::from(place.visit_minutes);
        let limit = f64::from(self.context.budget_minutes) * pass.budget_factor();
        if required_minutes > limit {
            return Some(Rejection::OverBudget { required_minutes });
        }
        None
    }

    /// Phase B: keep one place per type.
    ///
    /// Within a type the strongest preference match wins, then the place
    /// nearest the start, then the smallest id. The result keeps input order.
    #[must_use]
    pub fn deduplicate(&self, admitted: &[usize]) -> Vec<usize> {
        let mut best_by_kind: BTreeMap<&str, usize> = BTreeMap::new();
        for &index in admitted {
            let Some(place) = self.graph.place(index) else {
                continue;
            };
            best_by_kind
                .entry(place.kind.as_str())
                .and_modify(|current| {
                    if self.rank(index, *current) == Ordering::Less {
                        *current = index;
                    }
                })
                .or_insert(index);
        }
        let mut kept: Vec<usize> = best_by_kind.into_values().collect();
        kept.sort_unstable();
        kept
    }

    /// Orders two places of the same type; `Less` means `a` is preferred.
    fn rank(&self, a: usize, b: usize) -> Ordering {
        let (Some(place_a), Some(place_b)) = (self.graph.place(a), self.graph.place(b)) else {
            return a.cmp(&b);
        };
        let strength = |place| self.scorer.preference_match(place).strength();
        let distance = |index| {
            self.graph
                .edge_from_start(index)
                .map_or(f64::INFINITY, |edge| edge.distance_km)
        };
        strength(place_b)
            .total_cmp(&strength(place_a))
            .then_with(|| distance(a).total_cmp(&distance(b)))
            .then_with(|| place_a.id.cmp(&place_b.id))
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "fixtures fail fast")]
mod tests {
    use super::*;
    use rstest::rstest;
    use waymark_core::test_support::{context, open, place, sample_tables};
    use waymark_core::{CrowdLevel, GraphBuilder, Place, PlanningTables};

    fn filter_ids(places: Vec<Place>, context: &Context, tables: &PlanningTables) -> FilterOutcome {
        let graph = GraphBuilder::new()
            .build(places, context.start)
            .expect("graph");
        CandidateFilter::new(&graph, context, WeightedScorer::new(tables, context)).run()
    }

    fn ids(places: &[Place], outcome: &FilterOutcome) -> Vec<String> {
        outcome
            .candidates
            .iter()
            .filter_map(|&i| places.get(i).map(|p| p.id.clone()))
            .collect()
    }

    #[rstest]
    fn keeps_one_place_per_type() {
        let places = vec![
            place("far-park", "park", 2.0, "green"),
            place("near-park", "park", 0.5, "green"),
            place("cafe", "cafe", 1.0, "coffee"),
        ];
        let context = context(540, 180, &["quiet", "coffee"]);
        let outcome = filter_ids(places.clone(), &context, &sample_tables());
        assert_eq!(ids(&places, &outcome), vec!["near-park", "cafe"]);
        assert!(outcome.relaxations.is_empty());
    }

    #[rstest]
    fn stronger_match_beats_distance() {
        let places = vec![
            place("plain", "park", 0.1, "green"),
            place("coffee-park", "park", 1.5, "coffee"),
        ];
        let context = context(540, 180, &["quiet", "coffee"]);
        let outcome = filter_ids(places.clone(), &context, &sample_tables());
        assert_eq!(ids(&places, &outcome), vec!["coffee-park"]);
    }

    #[rstest]
    fn equal_places_fall_back_to_id() {
        let places = vec![place("b", "park", 1.0, ""), place("a", "park", 1.0, "")];
        let context = context(540, 180, &["quiet"]);
        let outcome = filter_ids(places.clone(), &context, &sample_tables());
        assert_eq!(ids(&places, &outcome), vec!["a"]);
    }

    #[rstest]
    fn rejects_for_each_constraint() {
        let places = vec![
            place("gallery", "museum", 0.5, "art"),
            place("busy", "cafe", 0.5, "").with_crowd_level(CrowdLevel::High),
            open(place("shut", "bookstore", 0.5, ""), "18:00", "20:00"),
            place("distant", "library", 30.0, ""),
        ];
        let context = context(540, 120, &["quiet", "coffee"]).with_avoid("crowded");
        let graph = GraphBuilder::new()
            .build(places, context.start)
            .expect("graph");
        let tables = sample_tables();
        let filter = CandidateFilter::new(&graph, &context, WeightedScorer::new(&tables, &context));

        assert_eq!(
            filter.rejection(0, FilterPass::Strict),
            Some(Rejection::Irrelevant)
        );
        assert_eq!(
            filter.rejection(1, FilterPass::Strict),
            Some(Rejection::Avoided(&AvoidCondition::Crowded))
        );
        assert_eq!(filter.rejection(1, FilterPass::AvoidListDisabled), None);
        assert!(matches!(
            filter.rejection(2, FilterPass::Strict),
            Some(Rejection::Closed { .. })
        ));
        assert!(matches!(
            filter.rejection(3, FilterPass::Strict),
            Some(Rejection::OverBudget { .. })
        ));
    }

    #[rstest]
    fn avoid_list_is_relaxed_first() {
        let places = vec![place("busy", "cafe", 0.5, "").with_crowd_level(CrowdLevel::High)];
        let context = context(540, 120, &["coffee"]).with_avoid("crowded");
        let outcome = filter_ids(places.clone(), &context, &sample_tables());
        assert_eq!(ids(&places, &outcome), vec!["busy"]);
        assert_eq!(outcome.relaxations, vec![Relaxation::AvoidListDisabled]);
    }

    #[rstest]
    fn budget_tolerance_admits_near_misses() {
        // 1 km at 5 km/h is 12 minutes; with a 30 minute visit that needs 42.
        let places = vec![place("park", "park", 1.0, "")];
        let context = context(540, 41, &["quiet"]);
        let outcome = filter_ids(places.clone(), &context, &sample_tables());
        assert_eq!(ids(&places, &outcome), vec!["park"]);
        assert_eq!(
            outcome.relaxations,
            vec![Relaxation::AvoidListDisabled, Relaxation::BudgetTolerance]
        );
    }

    #[rstest]
    fn records_every_attempt_when_nothing_survives() {
        let places = vec![place("museum", "museum", 0.5, "")];
        let context = context(540, 120, &["coffee"]);
        let outcome = filter_ids(places, &context, &sample_tables());
        assert!(outcome.candidates.is_empty());
        assert_eq!(
            outcome.relaxations,
            vec![Relaxation::AvoidListDisabled, Relaxation::BudgetTolerance]
        );
    }
}
