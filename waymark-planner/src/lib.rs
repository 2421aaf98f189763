//! Exhaustive itinerary planner for Waymark.
//!
//! This crate provides [`ExhaustivePlanner`], the implementation of the
//! [`Planner`](waymark_core::Planner) trait. A request flows through four
//! stages, each producing a new immutable value:
//!
//! 1. the [`GraphBuilder`](waymark_core::GraphBuilder) computes every edge
//!    between the start and the places;
//! 2. the [`CandidateFilter`] applies hard constraints, keeps one place per
//!    type and relaxes the avoid list and budget when nothing survives;
//! 3. the [`SequenceSearch`] walks every arrangement of two and three
//!    candidates, discards infeasible ones and ranks the rest with the
//!    [`WeightedScorer`](waymark_scorer::WeightedScorer);
//! 4. the [`Explainer`] writes a rationale for each stop of the winner.
//!
//! The planner is synchronous and holds no mutable state, so one instance can
//! serve many requests concurrently.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod explain;
pub mod filter;
mod planner;
pub mod search;

pub use explain::Explainer;
pub use filter::{CandidateFilter, FilterOutcome, FilterPass};
pub use planner::{DEFAULT_RUNNER_UP_LIMIT, ExhaustivePlanner, ExhaustivePlannerConfig};
pub use search::{KPermutations, SequenceSearch, permutation_count};
