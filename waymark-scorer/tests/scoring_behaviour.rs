#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for the weighted arrangement score.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use waymark_core::{
    Context, CrowdLevel, Edge, Place, PlanningTables, PreferenceMapping, SequenceRule,
    SequenceRuleTable, TimeWindowTable,
};
use waymark_scorer::{ScoreBreakdown, Visit, WeightedScorer};

/// Scenario state shared between steps.
pub struct World {
    context: RefCell<Context>,
    tables: RefCell<PlanningTables>,
    places: RefCell<Vec<Place>>,
    score: RefCell<Option<ScoreBreakdown>>,
}

#[fixture]
/// A visitor starting at 08:00 with three hours and default weights.
pub fn world() -> World {
    let tables = PlanningTables {
        preferences: PreferenceMapping::new()
            .with_mapping("coffee", ["cafe"])
            .with_mapping("quiet", ["park"]),
        sequence_rules: SequenceRuleTable::new().with_rule(SequenceRule::new(
            "park",
            "cafe",
            "coffee after a walk",
        )),
        ..PlanningTables::default()
    };
    World {
        context: RefCell::new(Context::new(Coord { x: 0.0, y: 0.0 }, 480, 180)),
        tables: RefCell::new(tables),
        places: RefCell::new(Vec::new()),
        score: RefCell::new(None),
    }
}

fn place(id: &str, kind: &str, crowd: CrowdLevel) -> Place {
    Place::new(id, kind, Coord { x: 0.0, y: 0.0 }).with_crowd_level(crowd)
}

#[given("a visitor who likes coffee and quiet places")]
fn likes_coffee_and_quiet(world: &World) {
    let context = world.context.replace(Context::new(Coord { x: 0.0, y: 0.0 }, 480, 180));
    *world.context.borrow_mut() = context.with_preference("coffee").with_preference("quiet");
}

#[given("the visitor avoids crowded places")]
fn avoids_crowds(world: &World) {
    let context = world.context.replace(Context::new(Coord { x: 0.0, y: 0.0 }, 480, 180));
    *world.context.borrow_mut() = context.with_avoid("crowded");
}

#[given("a park followed by a cafe")]
fn park_then_cafe(world: &World) {
    *world.places.borrow_mut() = vec![
        place("park", "park", CrowdLevel::Medium),
        place("cafe", "cafe", CrowdLevel::Medium),
    ];
}

#[given("a busy cafe followed by a quiet park")]
fn busy_cafe_then_quiet_park(world: &World) {
    *world.places.borrow_mut() = vec![
        place("cafe", "cafe", CrowdLevel::High),
        place("park", "park", CrowdLevel::Low),
    ];
}

#[given("cafes are preferred between {start} and {end}")]
fn cafe_window(world: &World, start: u16, end: u16) {
    let mut tables = world.tables.borrow_mut();
    tables.time_windows = TimeWindowTable::new()
        .try_with_window("cafe", start, end, "morning")
        .expect("valid window");
}

#[when("the arrangement is scored")]
fn score_arrangement(world: &World) {
    let places = world.places.borrow();
    let context = world.context.borrow();
    let tables = world.tables.borrow();
    let visits: Vec<Visit<'_>> = places
        .iter()
        .zip([500.0, 560.0])
        .map(|(place, arrival_minute)| Visit {
            place,
            leg: Edge::ZERO,
            arrival_minute,
        })
        .collect();
    let score = WeightedScorer::new(&tables, &context).score(&visits);
    *world.score.borrow_mut() = Some(score);
}

#[then("the sequence term is {value}")]
fn sequence_term(world: &World, value: f64) {
    assert_near(recorded(world).logical_sequence, value);
}

#[then("the preference term is {value}")]
fn preference_term(world: &World, value: f64) {
    assert_near(recorded(world).preference, value);
}

#[then("the crowd term is {value}")]
fn crowd_term(world: &World, value: f64) {
    assert_near(recorded(world).crowd, value);
}

#[then("the time of day term is {value}")]
fn time_of_day_term(world: &World, value: f64) {
    assert_near(recorded(world).time_of_day, value);
}

fn recorded(world: &World) -> ScoreBreakdown {
    world.score.borrow().expect("arrangement should be scored")
}

#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating point values"
)]
fn assert_near(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[scenario(path = "tests/features/scoring.feature", index = 0)]
fn walk_before_coffee(world: World) {
    let _ = world;
}

#[scenario(path = "tests/features/scoring.feature", index = 1)]
fn crowds_count_when_avoided(world: World) {
    let _ = world;
}

#[scenario(path = "tests/features/scoring.feature", index = 2)]
fn preferred_window_bonus(world: World) {
    let _ = world;
}
