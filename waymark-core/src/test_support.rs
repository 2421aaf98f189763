//! Test-only builders shared by unit and behaviour tests.

use geo::Coord;

use crate::{
    Context, CrowdLevel, NamedWindow, Place, PlanRequest, PlanningTables, PreferenceMapping,
    SequenceRule, SequenceRuleTable, TimeWindow, TimeWindowTable,
};

/// Degrees of latitude per kilometre, near enough for fixtures.
pub const DEGREES_PER_KM: f64 = 1.0 / 111.195;

/// Construct an all-day place of `kind` located `north_km` north of the
/// origin, tagged with `tag`.
pub fn place(id: &str, kind: &str, north_km: f64, tag: &str) -> Place {
    Place::new(id, kind, Coord { x: 0.0, y: north_km * DEGREES_PER_KM })
        .with_window(TimeWindow::all_day())
        .with_visit_minutes(30)
        .with_crowd_level(CrowdLevel::Medium)
        .with_tag(tag)
}

/// Replace a place's opening windows with a single `HH:MM` range.
///
/// # Panics
/// Panics when either clock string is malformed.
pub fn open(place: Place, from: &str, to: &str) -> Place {
    let window = TimeWindow::parse(from, to).expect("fixture window");
    Place {
        opening_windows: vec![window],
        ..place
    }
}

/// A context starting at the origin.
pub fn context(start_minute: u16, budget_minutes: u32, preferences: &[&str]) -> Context {
    preferences.iter().fold(
        Context::new(Coord { x: 0.0, y: 0.0 }, start_minute, budget_minutes),
        |context, preference| context.with_preference(preference),
    )
}

/// Tables for the park → cafe → bookstore scenario.
pub fn sample_tables() -> PlanningTables {
    PlanningTables {
        preferences: PreferenceMapping::new()
            .with_mapping("coffee", ["cafe"])
            .with_mapping("quiet", ["park", "bookstore", "library"]),
        time_windows: TimeWindowTable::new().with_window(
            "cafe",
            NamedWindow::new(TimeWindow::all_day(), "any time"),
        ),
        sequence_rules: SequenceRuleTable::new().with_rule(SequenceRule::new(
            "park",
            "cafe",
            "coffee after a walk",
        )),
        ..PlanningTables::default()
    }
}

/// Assemble a request.
pub fn request(context: Context, places: Vec<Place>, tables: PlanningTables) -> PlanRequest {
    PlanRequest {
        context,
        places,
        tables,
    }
}
