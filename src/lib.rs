//! Facade crate for the Waymark itinerary engine.
//!
//! This crate re-exports the core domain types, the weighted scorer and the
//! exhaustive planner so callers can depend on a single package.

#![forbid(unsafe_code)]

pub use waymark_core::{
    AvoidCondition, Context, CrowdLevel, Diagnostics, Itinerary, NoSequenceReason, Place,
    PlanError, PlanOutcome, PlanRequest, PlanResponse, Planner, PlanningTables, Relaxation, Stop,
    TimeWindow, WeightConfig,
};

pub use waymark_planner::{ExhaustivePlanner, ExhaustivePlannerConfig};
pub use waymark_scorer::{ScoreBreakdown, WeightedScorer};
