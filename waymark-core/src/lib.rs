//! Core domain types for the Waymark itinerary engine.
//!
//! The crate models places, the visitor's context and the caller-supplied
//! lookup tables, builds the immutable distance graph the planner searches,
//! and defines the [`Planner`] trait with its request and response types.
//! Nothing here performs I/O.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod clock;
pub mod context;
pub mod graph;
pub mod place;
pub mod planner;
pub mod tables;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{ClockError, MINUTES_PER_DAY, TimeWindow};
pub use context::{AvoidCondition, Context, ContextError};
pub use graph::{DEFAULT_WALKING_SPEED_KMH, Edge, GraphBuilder, GraphError, Node, PlaceGraph};
pub use place::{CrowdLevel, Place, PlaceError};
pub use planner::{
    BUDGET_TOLERANCE, Diagnostics, Itinerary, NoSequenceReason, PlanError, PlanOutcome,
    PlanRequest, PlanRequestValidationError, PlanResponse, Planner, RankedArrangement, Relaxation,
    Stop,
};
pub use tables::{
    NamedWindow, PlanningTables, PreferenceMapping, SequenceRule, SequenceRuleTable,
    TimeWindowTable, WeightConfig,
};
