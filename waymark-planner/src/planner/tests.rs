//! Tests for the `ExhaustivePlanner`.
#![expect(clippy::expect_used, reason = "tests should fail fast")]

use super::*;
use rstest::rstest;
use waymark_core::test_support::{context, place, request, sample_tables};
use waymark_core::{CrowdLevel, GraphError, Relaxation};

#[rstest]
fn plans_with_default_config() {
    let planner = ExhaustivePlanner::new();
    assert_eq!(planner.config().runner_up_limit, DEFAULT_RUNNER_UP_LIMIT);
    let response = planner
        .plan(&request(
            context(540, 120, &["quiet", "coffee"]),
            vec![place("park", "park", 0.3, ""), place("cafe", "cafe", 0.6, "")],
            sample_tables(),
        ))
        .expect("plan");
    let itinerary = response.itinerary().expect("itinerary");
    assert_eq!(itinerary.sequence(), ["park", "cafe"]);
    assert!(!response.used_fallback());
    assert_eq!(response.diagnostics.candidates, 2);
    assert_eq!(response.diagnostics.arrangements_enumerated, 2);
    assert_eq!(
        response.diagnostics.runners_up.first().map(|r| r.place_ids.clone()),
        Some(vec!["cafe".to_owned(), "park".to_owned()])
    );
}

#[rstest]
fn fallback_widens_the_search_budget() {
    // Each place needs 30 minutes of visiting and 1.2 minutes of walking.
    let places = vec![
        place("park", "park", 0.1, "").with_crowd_level(CrowdLevel::High),
        place("cafe", "cafe", 0.1, "").with_crowd_level(CrowdLevel::High),
    ];
    let response = ExhaustivePlanner::new()
        .plan(&request(
            context(540, 60, &["quiet", "coffee"]).with_avoid("crowded"),
            places,
            sample_tables(),
        ))
        .expect("plan");
    assert_eq!(
        response.diagnostics.relaxations,
        vec![Relaxation::AvoidListDisabled]
    );
    let itinerary = response.itinerary().expect("relaxed budget fits both");
    assert!(itinerary.total_minutes > 60.0);
    assert!(
        itinerary
            .stops
            .iter()
            .all(|stop| stop.explanation.contains("note: crowded"))
    );
}

#[rstest]
#[case::disabled(0, 0)]
#[case::one(1, 1)]
#[case::more_than_feasible(10, 1)]
fn runners_up_never_repeat_the_winner(#[case] limit: usize, #[case] expected: usize) {
    let planner = ExhaustivePlanner::with_config(ExhaustivePlannerConfig {
        runner_up_limit: limit,
        ..ExhaustivePlannerConfig::default()
    });
    let response = planner
        .plan(&request(
            context(540, 120, &["quiet", "coffee"]),
            vec![place("park", "park", 0.3, ""), place("cafe", "cafe", 0.6, "")],
            sample_tables(),
        ))
        .expect("plan");
    let winner = response.itinerary().expect("itinerary").sequence();
    assert_eq!(response.diagnostics.arrangements_feasible, 2);
    assert_eq!(response.diagnostics.runners_up.len(), expected);
    assert!(
        response
            .diagnostics
            .runners_up
            .iter()
            .all(|runner_up| runner_up.place_ids != winner)
    );
}

#[rstest]
fn lone_candidate_yields_no_sequence() {
    let response = ExhaustivePlanner::new()
        .plan(&request(
            context(540, 120, &["quiet"]),
            vec![place("park", "park", 0.3, "")],
            sample_tables(),
        ))
        .expect("plan");
    assert_eq!(
        response.outcome,
        PlanOutcome::NoSequenceFound(NoSequenceReason::NoFeasibleArrangement)
    );
    assert_eq!(response.diagnostics.candidates, 1);
}

#[rstest]
fn rejects_invalid_walking_speed() {
    let planner = ExhaustivePlanner::with_config(ExhaustivePlannerConfig {
        walking_speed_kmh: 0.0,
        ..ExhaustivePlannerConfig::default()
    });
    let err = planner
        .plan(&request(context(540, 120, &[]), Vec::new(), sample_tables()))
        .expect_err("invalid speed");
    assert_eq!(
        err,
        PlanError::Graph(GraphError::InvalidWalkingSpeed { speed: 0.0 })
    );
}

#[rstest]
#[case(100, false, 100.0)]
#[case(100, true, 105.0)]
fn budget_limit_applies_tolerance(
    #[case] budget: u32,
    #[case] relaxed: bool,
    #[case] expected: f64,
) {
    #[expect(clippy::float_arithmetic, reason = "compares fractional minutes")]
    let delta = (budget_limit(budget, relaxed) - expected).abs();
    assert!(delta < 1e-9);
}
