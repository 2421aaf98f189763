//! Behavioural tests for `ExhaustivePlanner` using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use waymark_core::test_support::{context, open, place, request, sample_tables};
use waymark_core::{
    Place, PlanError, PlanOutcome, PlanResponse, Planner, PlanningTables, Relaxation, WeightConfig,
};
use waymark_planner::ExhaustivePlanner;

#[derive(Debug)]
struct PlannerWorld {
    places: RefCell<Vec<Place>>,
    tables: RefCell<PlanningTables>,
    context: RefCell<waymark_core::Context>,
    outcome: RefCell<Option<Result<PlanResponse, PlanError>>>,
}

impl PlannerWorld {
    fn new() -> Self {
        Self {
            places: RefCell::new(Vec::new()),
            tables: RefCell::new(sample_tables()),
            context: RefCell::new(context(540, 180, &[])),
            outcome: RefCell::new(None),
        }
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn response(&self) -> PlanResponse {
        self.outcome
            .borrow()
            .as_ref()
            .cloned()
            .expect("outcome should be recorded before assertions")
            .expect("planning should succeed")
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn sequence(&self) -> Vec<String> {
        self.response()
            .itinerary()
            .expect("an itinerary should be found")
            .sequence()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}

#[fixture]
fn world() -> PlannerWorld {
    PlannerWorld::new()
}

#[given("a park, a cafe and a bookstore near the start")]
fn park_cafe_bookstore(world: &PlannerWorld) {
    world.places.replace(vec![
        open(place("park", "park", 0.3, ""), "06:00", "22:00"),
        open(place("cafe", "cafe", 0.6, ""), "07:00", "20:00"),
        open(place("bookstore", "bookstore", 0.9, ""), "09:00", "21:00"),
    ]);
}

#[given("a museum far from the start")]
fn distant_museum(world: &PlannerWorld) {
    world
        .places
        .replace(vec![place("museum", "museum", 40.0, "")]);
}

#[given("a park and a bookstore at the start and a library one kilometre away")]
fn tied_places(world: &PlannerWorld) {
    world.places.replace(vec![
        place("c", "library", 1.0, ""),
        place("b", "park", 0.0, ""),
        place("a", "bookstore", 0.0, ""),
    ]);
}

#[given("a bar and a club open from 20:00 to 02:00")]
fn overnight_venues(world: &PlannerWorld) {
    world.places.replace(vec![
        open(place("bar", "bar", 0.2, ""), "20:00", "02:00"),
        open(place("club", "club", 0.4, ""), "20:00", "02:00"),
    ]);
}

#[given("distance carries no weight")]
fn distance_is_free(world: &PlannerWorld) {
    world.tables.borrow_mut().weights = WeightConfig {
        distance_penalty: 0.0,
        ..WeightConfig::default()
    };
}

#[given("a visitor who likes coffee and quiet places and avoids crowds")]
fn coffee_and_quiet_visitor(world: &PlannerWorld) {
    world
        .context
        .replace(context(540, 180, &["coffee", "quiet"]).with_avoid("crowded"));
}

#[given("a visitor who likes quiet places")]
fn quiet_visitor(world: &PlannerWorld) {
    world.context.replace(context(540, 240, &["quiet"]));
}

#[given("a nightlife visitor starting at minute {minute}")]
fn nightlife_visitor(world: &PlannerWorld, minute: u16) {
    world
        .context
        .replace(context(minute, 120, &["bar", "club"]));
}

#[when("the visitor plans an itinerary")]
fn plan(world: &PlannerWorld) {
    let plan_request = request(
        world.context.borrow().clone(),
        world.places.borrow().clone(),
        world.tables.borrow().clone(),
    );
    let outcome = ExhaustivePlanner::new().plan(&plan_request);
    world.outcome.replace(Some(outcome));
}

#[then("every place passes filtering")]
fn all_candidates(world: &PlannerWorld) {
    let response = world.response();
    assert_eq!(response.diagnostics.candidates, world.places.borrow().len());
    assert!(response.diagnostics.relaxations.is_empty());
}

#[then("the park is visited straight before the cafe")]
fn park_before_cafe(world: &PlannerWorld) {
    let sequence = world.sequence();
    let joined = sequence.join(",");
    assert!(joined.contains("park,cafe"), "got {joined}");
}

#[then("every stop has an explanation")]
fn explained(world: &PlannerWorld) {
    let response = world.response();
    let stops = response
        .itinerary()
        .map(|itinerary| itinerary.stops.clone())
        .unwrap_or_default();
    assert!(!stops.is_empty());
    assert!(stops.iter().all(|stop| !stop.explanation.is_empty()));
}

#[then("no sequence is found")]
fn nothing_found(world: &PlannerWorld) {
    assert!(matches!(
        world.response().outcome,
        PlanOutcome::NoSequenceFound(_)
    ));
}

#[then("both relaxations were attempted")]
fn both_relaxations(world: &PlannerWorld) {
    assert_eq!(
        world.response().diagnostics.relaxations,
        vec![Relaxation::AvoidListDisabled, Relaxation::BudgetTolerance]
    );
}

#[then("the itinerary is a then b then c")]
fn ordered_by_ids(world: &PlannerWorld) {
    assert_eq!(world.sequence(), vec!["a", "b", "c"]);
}

#[then("an itinerary with {count} stops is found")]
fn stop_count(world: &PlannerWorld, count: usize) {
    assert_eq!(world.sequence().len(), count);
}

#[scenario(path = "tests/features/planner.feature", index = 0)]
fn walk_before_coffee(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/planner.feature", index = 1)]
fn nothing_survives_fallback(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/planner.feature", index = 2)]
fn ties_prefer_less_walking(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/planner.feature", index = 3)]
fn overnight_open_after_midnight(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/planner.feature", index = 4)]
fn overnight_closed_in_morning(world: PlannerWorld) {
    let _ = world;
}
