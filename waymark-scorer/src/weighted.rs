//! Weighted soft score of an ordered arrangement.
//!
//! The score sums per-stop terms (preference strength, arrival inside a
//! preferred window) and path terms (distance, crowd adjustments, sequence
//! rules), each multiplied by its [`WeightConfig`](waymark_core::WeightConfig)
//! coefficient.

use waymark_core::{
    Context, CrowdLevel, Edge, NamedWindow, Place, PlanningTables, SequenceRule,
};

use crate::PreferenceMatch;

/// Multiplier applied to the time-efficiency weight for a preferred arrival.
pub const PREFERRED_WINDOW_BONUS: f64 = 1.5;

/// Crowd adjustment for a high-crowd stop when crowds are avoided.
pub const HIGH_CROWD_ADJUSTMENT: f64 = 1.0;

/// Crowd adjustment for a low-crowd stop when crowds are avoided.
pub const LOW_CROWD_ADJUSTMENT: f64 = -0.5;

/// A stop as reached along an arrangement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit<'a> {
    /// The place visited.
    pub place: &'a Place,
    /// The leg walked to reach it.
    pub leg: Edge,
    /// Arrival instant in minutes since the start day's midnight.
    pub arrival_minute: f64,
}

/// Score components after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    /// Preference strength term.
    pub preference: f64,
    /// Preferred-window term.
    pub time_of_day: f64,
    /// Total-distance term.
    pub distance: f64,
    /// Crowd adjustment term.
    pub crowd: f64,
    /// Sequence-rule term.
    pub logical_sequence: f64,
}

impl ScoreBreakdown {
    /// Sum of every component.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "score components are summed")]
    pub fn total(&self) -> f64 {
        self.preference + self.time_of_day + self.distance + self.crowd + self.logical_sequence
    }
}

/// Scores arrangements against one request's context and tables.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{Context, Edge, Place, PlanningTables};
/// use waymark_scorer::{Visit, WeightedScorer};
///
/// let tables = PlanningTables::default();
/// let context = Context::new(Coord { x: 0.0, y: 0.0 }, 540, 120).with_preference("park");
/// let park = Place::new("p", "park", Coord { x: 0.0, y: 0.0 });
/// let visits = [Visit { place: &park, leg: Edge::ZERO, arrival_minute: 540.0 }];
///
/// let score = WeightedScorer::new(&tables, &context).score(&visits);
/// assert!((score.total() - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WeightedScorer<'a> {
    tables: &'a PlanningTables,
    context: &'a Context,
}

impl<'a> WeightedScorer<'a> {
    /// Construct a scorer.
    #[must_use]
    pub const fn new(tables: &'a PlanningTables, context: &'a Context) -> Self {
        Self { tables, context }
    }

    /// Preferences satisfied by `place`.
    #[must_use]
    pub fn preference_match(&self, place: &Place) -> PreferenceMatch {
        PreferenceMatch::evaluate(place, self.context, &self.tables.preferences)
    }

    /// The preferred window of the visit's type containing its arrival.
    #[must_use]
    pub fn preferred_window(&self, visit: &Visit<'_>) -> Option<&'a NamedWindow> {
        self.tables
            .time_windows
            .preferred_window(&visit.place.kind, visit.arrival_minute)
    }

    /// The rule rewarding `next` straight after `previous`.
    #[must_use]
    pub fn sequence_rule(&self, previous: &Place, next: &Place) -> Option<&'a SequenceRule> {
        self.tables
            .sequence_rules
            .rule_for(&previous.kind, &next.kind)
    }

    /// Crowd adjustment for `place`; zero unless crowds are avoided.
    #[must_use]
    pub fn crowd_adjustment(&self, place: &Place) -> f64 {
        if !self.context.avoids_crowds() {
            return 0.0;
        }
        match place.crowd_level {
            CrowdLevel::High => HIGH_CROWD_ADJUSTMENT,
            CrowdLevel::Low => LOW_CROWD_ADJUSTMENT,
            CrowdLevel::Medium => 0.0,
        }
    }

    /// Score an ordered arrangement.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the score is a weighted sum of floating-point terms"
    )]
    pub fn score(&self, visits: &[Visit<'_>]) -> ScoreBreakdown {
        let weights = &self.tables.weights;
        let mut breakdown = ScoreBreakdown::default();
        let mut distance_km = 0.0;
        let mut crowd = 0.0;
        let mut rule_hits = 0.0;

        for visit in visits {
            breakdown.preference +=
                weights.preference_match * self.preference_match(visit.place).strength();
            if self.preferred_window(visit).is_some() {
                breakdown.time_of_day += weights.time_efficiency * PREFERRED_WINDOW_BONUS;
            }
            distance_km += visit.leg.distance_km;
            crowd += self.crowd_adjustment(visit.place);
        }
        for pair in visits.windows(2) {
            if let [previous, next] = pair
                && self.sequence_rule(previous.place, next.place).is_some()
            {
                rule_hits += 1.0;
            }
        }

        breakdown.distance = weights.distance_penalty * distance_km;
        breakdown.crowd = weights.crowd_penalty * crowd;
        breakdown.logical_sequence = weights.logical_sequence * rule_hits;
        breakdown
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    clippy::float_arithmetic,
    reason = "fixtures fail fast and assertions compare floats"
)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use waymark_core::{
        PreferenceMapping, SequenceRuleTable, TimeWindow, TimeWindowTable, WeightConfig,
    };

    const TOLERANCE: f64 = 1e-9;

    #[fixture]
    fn tables() -> PlanningTables {
        PlanningTables {
            weights: WeightConfig::default(),
            preferences: PreferenceMapping::new()
                .with_mapping("coffee", ["cafe"])
                .with_mapping("quiet", ["park"]),
            time_windows: TimeWindowTable::new().with_window(
                "cafe",
                NamedWindow::new(
                    TimeWindow::new(420, 660).expect("window"),
                    "breakfast",
                ),
            ),
            sequence_rules: SequenceRuleTable::new().with_rule(SequenceRule::new(
                "park",
                "cafe",
                "coffee after a walk",
            )),
        }
    }

    fn context(avoid_crowds: bool) -> Context {
        let context = Context::new(Coord { x: 0.0, y: 0.0 }, 480, 180)
            .with_preference("coffee")
            .with_preference("quiet");
        if avoid_crowds {
            context.with_avoid("crowded")
        } else {
            context
        }
    }

    fn leg(distance_km: f64) -> Edge {
        Edge {
            distance_km,
            travel_minutes: distance_km * 12.0,
        }
    }

    #[rstest]
    fn scores_each_component(tables: PlanningTables) {
        let context = context(true);
        let park = Place::new("p", "park", Coord { x: 0.0, y: 0.0 })
            .with_crowd_level(CrowdLevel::Low);
        let cafe = Place::new("c", "cafe", Coord { x: 0.0, y: 0.0 })
            .with_crowd_level(CrowdLevel::High);
        let visits = [
            Visit {
                place: &park,
                leg: leg(0.5),
                arrival_minute: 486.0,
            },
            Visit {
                place: &cafe,
                leg: leg(1.0),
                arrival_minute: 570.0,
            },
        ];

        let score = WeightedScorer::new(&tables, &context).score(&visits);
        assert!((score.preference - 10.0).abs() < TOLERANCE);
        assert!((score.time_of_day - 4.5).abs() < TOLERANCE);
        assert!((score.distance - -3.0).abs() < TOLERANCE);
        // High crowd (+1.0) and low crowd (-0.5) weighted by -5.
        assert!((score.crowd - -2.5).abs() < TOLERANCE);
        assert!((score.logical_sequence - 5.0).abs() < TOLERANCE);
        assert!((score.total() - 14.0).abs() < TOLERANCE);
    }

    #[rstest]
    fn rule_only_counts_in_order(tables: PlanningTables) {
        let context = context(false);
        let park = Place::new("p", "park", Coord { x: 0.0, y: 0.0 });
        let cafe = Place::new("c", "cafe", Coord { x: 0.0, y: 0.0 });
        let visit = |place| Visit {
            place,
            leg: Edge::ZERO,
            arrival_minute: 900.0,
        };
        let scorer = WeightedScorer::new(&tables, &context);
        let forward = scorer.score(&[visit(&park), visit(&cafe)]);
        let backward = scorer.score(&[visit(&cafe), visit(&park)]);
        assert!((forward.logical_sequence - 5.0).abs() < TOLERANCE);
        assert!(backward.logical_sequence.abs() < TOLERANCE);
    }

    #[rstest]
    #[case(CrowdLevel::High, false, 0.0)]
    #[case(CrowdLevel::High, true, HIGH_CROWD_ADJUSTMENT)]
    #[case(CrowdLevel::Low, true, LOW_CROWD_ADJUSTMENT)]
    #[case(CrowdLevel::Medium, true, 0.0)]
    fn crowd_adjustment_needs_avoid_condition(
        tables: PlanningTables,
        #[case] level: CrowdLevel,
        #[case] avoid_crowds: bool,
        #[case] expected: f64,
    ) {
        let context = context(avoid_crowds);
        let place = Place::new("x", "bar", Coord { x: 0.0, y: 0.0 }).with_crowd_level(level);
        let adjustment = WeightedScorer::new(&tables, &context).crowd_adjustment(&place);
        assert!((adjustment - expected).abs() < TOLERANCE);
    }

    #[rstest]
    fn types_without_windows_get_no_bonus(tables: PlanningTables) {
        let context = context(false);
        let park = Place::new("p", "park", Coord { x: 0.0, y: 0.0 });
        let visit = Visit {
            place: &park,
            leg: Edge::ZERO,
            arrival_minute: 500.0,
        };
        let scorer = WeightedScorer::new(&tables, &context);
        assert!(scorer.preferred_window(&visit).is_none());
        assert!(scorer.score(&[visit]).time_of_day.abs() < TOLERANCE);
    }
}
