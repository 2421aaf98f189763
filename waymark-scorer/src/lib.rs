//! Scoring for Waymark arrangements.
//!
//! The crate provides two pieces used by the planner:
//! - [`PreferenceMatch`] decides which of a visitor's preferences a place
//!   satisfies, directly through its type and tags or through the
//!   [`PreferenceMapping`](waymark_core::PreferenceMapping). The share of
//!   preferences matched is the place's preference strength.
//! - [`WeightedScorer`] scores an ordered arrangement of [`Visit`]s with the
//!   coefficients of a [`WeightConfig`](waymark_core::WeightConfig), returning
//!   a [`ScoreBreakdown`] whose total decides the winner.
//!
//! Scoring is pure: the scorer borrows the request's tables and context and
//! never mutates them.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod preference;
mod weighted;

pub use preference::{NEUTRAL_STRENGTH, PreferenceMatch};
pub use weighted::{
    HIGH_CROWD_ADJUSTMENT, LOW_CROWD_ADJUSTMENT, PREFERRED_WINDOW_BONUS, ScoreBreakdown, Visit,
    WeightedScorer,
};
