//! Per-stop explanations for a winning arrangement.

use waymark_core::clock::format_clock;
use waymark_core::{Context, CrowdLevel, Place, PlaceGraph};
use waymark_scorer::{Visit, WeightedScorer};

use crate::search::PlannedVisit;

/// Legs shorter than this are described as nearby.
pub const NEARBY_KM: f64 = 0.2;

/// Explanation used when a visit cannot be resolved to a place.
pub const DEFAULT_EXPLANATION: &str = "fits remaining time";

/// Builds the rationale shown for each stop.
///
/// Clauses appear in a fixed order: matched preferences, crowd note,
/// distance, preferred time of day, sequence rule and remaining time.
#[derive(Debug, Clone, Copy)]
pub struct Explainer<'a> {
    graph: &'a PlaceGraph,
    context: &'a Context,
    scorer: WeightedScorer<'a>,
    relaxed: bool,
}

impl<'a> Explainer<'a> {
    /// Construct an explainer; `relaxed` marks a fallback result.
    #[must_use]
    pub const fn new(
        graph: &'a PlaceGraph,
        context: &'a Context,
        scorer: WeightedScorer<'a>,
        relaxed: bool,
    ) -> Self {
        Self {
            graph,
            context,
            scorer,
            relaxed,
        }
    }

    /// One explanation per visit, in order.
    #[must_use]
    pub fn explain(&self, visits: &[PlannedVisit]) -> Vec<String> {
        let mut previous = None;
        let mut explanations = Vec::with_capacity(visits.len());
        for visit in visits {
            let place = self.graph.place(visit.index);
            let text = place.map_or_else(
                || DEFAULT_EXPLANATION.to_owned(),
                |current| capitalise(&self.clauses(visit, current, previous).join(", ")),
            );
            explanations.push(text);
            previous = place;
        }
        explanations
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "remaining time is a fractional minute count"
    )]
    fn clauses(
        &self,
        visit: &PlannedVisit,
        place: &Place,
        previous: Option<&Place>,
    ) -> Vec<String> {
        let mut clauses = Vec::new();

        match self.scorer.preference_match(place).names() {
            [] => {}
            [single] => clauses.push(format!("matches preference for {single}")),
            several => clauses.push(format!("matches preferences: {}", several.join(", "))),
        }

        if self.context.avoids_crowds() {
            match place.crowd_level {
                CrowdLevel::Low => clauses.push("low crowd level".to_owned()),
                CrowdLevel::High if self.relaxed => {
                    clauses.push("note: crowded (best available option)".to_owned());
                }
                CrowdLevel::High | CrowdLevel::Medium => {}
            }
        }

        let km = visit.leg.distance_km;
        clauses.push(if km < NEARBY_KM {
            "nearby".to_owned()
        } else if previous.is_none() {
            format!("{km:.1} km from the start")
        } else {
            format!("{km:.1} km from the previous stop")
        });

        let scored = Visit {
            place,
            leg: visit.leg,
            arrival_minute: visit.arrival_minute,
        };
        if let Some(window) = self.scorer.preferred_window(&scored) {
            clauses.push(format!(
                "ideal time ({}) at {}",
                window.name,
                format_clock(visit.arrival_minute)
            ));
        }

        if let Some(rule) = previous.and_then(|prev| self.scorer.sequence_rule(prev, place)) {
            clauses.push(rule.reason.clone());
        }

        let remaining = f64::from(self.context.budget_minutes) - visit.elapsed_minutes;
        if f64::from(place.visit_minutes) <= remaining {
            clauses.push(format!("fits remaining time ({remaining:.0} min)"));
        }
        clauses
    }
}

/// Upper-case the first character, leaving the rest untouched.
#[must_use]
pub fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    clippy::float_arithmetic,
    reason = "fixtures fail fast and derive legs from distances"
)]
mod tests {
    use super::*;
    use rstest::rstest;
    use waymark_core::test_support::{context, place, sample_tables};
    use waymark_core::{Edge, GraphBuilder, PlanningTables};

    fn visit(index: usize, distance_km: f64, arrival_minute: f64, elapsed: f64) -> PlannedVisit {
        PlannedVisit {
            index,
            leg: Edge {
                distance_km,
                travel_minutes: distance_km * 12.0,
            },
            arrival_minute,
            elapsed_minutes: elapsed,
        }
    }

    fn explain(
        context: &Context,
        tables: &PlanningTables,
        relaxed: bool,
        visits: &[PlannedVisit],
    ) -> Vec<String> {
        let places = vec![
            place("park", "park", 0.1, "").with_crowd_level(CrowdLevel::Low),
            place("cafe", "cafe", 1.4, "").with_crowd_level(CrowdLevel::High),
        ];
        let graph = GraphBuilder::new()
            .build(places, context.start)
            .expect("graph");
        let scorer = WeightedScorer::new(tables, context);
        Explainer::new(&graph, context, scorer, relaxed).explain(visits)
    }

    #[rstest]
    fn clauses_follow_fixed_order() {
        let context = context(480, 120, &["quiet", "coffee"]).with_avoid("crowded");
        let visits = [visit(0, 0.1, 481.2, 1.2), visit(1, 1.3, 526.8, 46.8)];
        let texts = explain(&context, &sample_tables(), true, &visits);
        assert_eq!(
            texts,
            vec![
                "Matches preference for quiet, low crowd level, nearby, \
                 fits remaining time (119 min)",
                "Matches preference for coffee, note: crowded (best available option), \
                 1.3 km from the previous stop, ideal time (any time) at 08:47, \
                 coffee after a walk, fits remaining time (73 min)",
            ]
        );
    }

    #[rstest]
    fn strict_results_omit_crowded_note() {
        let context = context(480, 120, &["coffee"]).with_avoid("crowded");
        let texts = explain(&context, &sample_tables(), false, &[visit(1, 1.4, 496.8, 16.8)]);
        assert_eq!(
            texts,
            vec![
                "Matches preference for coffee, 1.4 km from the start, ideal time (any time) \
                 at 08:17, fits remaining time (103 min)"
            ]
        );
    }

    #[rstest]
    fn short_budget_drops_fit_clause() {
        let context = context(480, 40, &[]);
        let texts = explain(
            &context,
            &PlanningTables::default(),
            false,
            &[visit(1, 1.4, 496.8, 16.8)],
        );
        assert_eq!(texts, vec!["1.4 km from the start"]);
    }

    #[rstest]
    #[case("nearby", "Nearby")]
    #[case("über", "Über")]
    #[case("", "")]
    fn capitalises_first_character_only(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(capitalise(input), expected);
    }
}
