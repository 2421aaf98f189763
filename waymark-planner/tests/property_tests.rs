//! Property-based tests for the exhaustive planner.
//!
//! # Invariants tested
//!
//! - **Hard constraints:** without fallback, every stop is relevant, not
//!   avoided and open at its arrival instant.
//! - **Distinct types:** no two stops share a type.
//! - **Time accounting:** the total equals legs plus visits and fits the
//!   budget, widened by the tolerance only in fallback mode.
//! - **Determinism:** planning the same request twice gives the same result.


use std::collections::HashSet;

use proptest::prelude::*;
use waymark_core::{BUDGET_TOLERANCE, PlanRequest, Planner};
use waymark_planner::ExhaustivePlanner;
use waymark_scorer::PreferenceMatch;

use proptest_support::request_strategy;

fn plan(request: &PlanRequest) -> waymark_core::PlanResponse {
    match ExhaustivePlanner::new().plan(request) {
        Ok(response) => response,
        Err(err) => panic!("generated requests are valid: {err}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: strict results satisfy every hard constraint per stop.
    #[test]
    fn strict_stops_satisfy_constraints(request in request_strategy(8)) {
        let response = plan(&request);
        if let Some(itinerary) = response.itinerary()
            && !response.used_fallback()
        {
            for stop in &itinerary.stops {
                let place = request
                    .places
                    .iter()
                    .find(|p| p.id == stop.place_id)
                    .ok_or_else(|| TestCaseError::fail("stop references unknown place"))?;
                let matched =
                    PreferenceMatch::evaluate(place, &request.context, &request.tables.preferences);
                prop_assert!(matched.is_relevant());
                prop_assert!(request.context.violated_condition(place).is_none());
                prop_assert!(place.is_open_at(stop.arrival_minute));
            }
        }
    }

    /// Property: a result never repeats a type.
    #[test]
    fn stops_have_distinct_types(request in request_strategy(8)) {
        let response = plan(&request);
        if let Some(itinerary) = response.itinerary() {
            let kinds: HashSet<&str> = itinerary
                .stops
                .iter()
                .filter_map(|stop| request.places.iter().find(|p| p.id == stop.place_id))
                .map(|place| place.kind.as_str())
                .collect();
            prop_assert_eq!(kinds.len(), itinerary.stops.len());
            prop_assert!((2..=3).contains(&itinerary.stops.len()));
        }
    }

    /// Property: total minutes add up and respect the budget.
    #[test]
    #[expect(clippy::float_arithmetic, reason = "sums fractional minutes")]
    fn total_time_adds_up(request in request_strategy(8)) {
        let response = plan(&request);
        if let Some(itinerary) = response.itinerary() {
            let legs: f64 = itinerary.stops.iter().map(|s| s.leg.travel_minutes).sum();
            let visits: f64 = itinerary
                .stops
                .iter()
                .filter_map(|stop| request.places.iter().find(|p| p.id == stop.place_id))
                .map(|place| f64::from(place.visit_minutes))
                .sum();
            prop_assert!((itinerary.total_minutes - (legs + visits)).abs() < 0.01);

            let budget = f64::from(request.context.budget_minutes);
            let limit = if response.used_fallback() {
                budget * (1.0 + BUDGET_TOLERANCE)
            } else {
                budget
            };
            prop_assert!(itinerary.total_minutes <= limit + 1e-9);
        }
    }

    /// Property: planning is deterministic.
    #[test]
    fn planning_is_deterministic(request in request_strategy(7)) {
        let first = plan(&request);
        let second = plan(&request);
        prop_assert_eq!(first.outcome, second.outcome);
        prop_assert_eq!(first.diagnostics.relaxations, second.diagnostics.relaxations);
        prop_assert_eq!(first.diagnostics.runners_up, second.diagnostics.runners_up);
    }
}
