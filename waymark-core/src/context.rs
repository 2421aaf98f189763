//! The visitor's situation: where and when they start, how long they have,
//! what they want and what they would rather avoid.

use std::fmt;

use geo::Coord;
use thiserror::Error;

use crate::place::valid_location;
use crate::{CrowdLevel, MINUTES_PER_DAY, Place};

/// A condition that disqualifies a place.
///
/// `crowded` is resolved against the crowd level; every other condition
/// matches a place whose type or tags carry the same label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AvoidCondition {
    /// Places with a high crowd level.
    Crowded,
    /// Places whose type or tags equal the label.
    Label(String),
}

impl AvoidCondition {
    /// Parse a free-form condition, case-insensitively.
    ///
    /// # Examples
    /// ```
    /// use waymark_core::AvoidCondition;
    ///
    /// assert_eq!(AvoidCondition::parse("Crowded"), AvoidCondition::Crowded);
    /// assert_eq!(
    ///     AvoidCondition::parse("outdoor"),
    ///     AvoidCondition::Label("outdoor".into())
    /// );
    /// ```
    pub fn parse(input: &str) -> Self {
        let label = input.trim().to_lowercase();
        if label == "crowded" {
            Self::Crowded
        } else {
            Self::Label(label)
        }
    }

    /// Whether the condition holds for `place`.
    pub fn applies_to(&self, place: &Place) -> bool {
        match self {
            Self::Crowded => place.crowd_level == CrowdLevel::High,
            Self::Label(label) => place.carries(label),
        }
    }
}

impl fmt::Display for AvoidCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crowded => f.write_str("crowded"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Request-level context.
///
/// Preferences are stored lower-cased and de-duplicated in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// Where the visitor starts.
    pub start: Coord<f64>,
    /// Start clock time in minutes since midnight.
    pub start_minute: u16,
    /// Total time budget in minutes.
    pub budget_minutes: u32,
    /// Requested preferences.
    pub preferences: Vec<String>,
    /// Conditions the visitor wants to avoid.
    pub avoid: Vec<AvoidCondition>,
}

/// Errors returned by [`Context::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The start location was not a valid WGS84 value.
    #[error("start location is invalid")]
    InvalidStart,
    /// The start time was not on the clock.
    #[error("start minute {minute} is outside the 0..1440 clock")]
    StartOutOfRange {
        /// The rejected value.
        minute: u16,
    },
    /// The budget was zero.
    #[error("time budget must be positive")]
    ZeroBudget,
}

impl Context {
    /// Construct a context without preferences or avoid conditions.
    pub const fn new(start: Coord<f64>, start_minute: u16, budget_minutes: u32) -> Self {
        Self {
            start,
            start_minute,
            budget_minutes,
            preferences: Vec::new(),
            avoid: Vec::new(),
        }
    }

    /// Add a preference.
    pub fn with_preference(mut self, preference: &str) -> Self {
        let preference = preference.trim().to_lowercase();
        if !preference.is_empty() && !self.preferences.contains(&preference) {
            self.preferences.push(preference);
        }
        self
    }

    /// Add an avoid condition.
    pub fn with_avoid(mut self, condition: &str) -> Self {
        let condition = AvoidCondition::parse(condition);
        if !self.avoid.contains(&condition) {
            self.avoid.push(condition);
        }
        self
    }

    /// Whether the visitor asked to avoid crowds.
    pub fn avoids_crowds(&self) -> bool {
        self.avoid.contains(&AvoidCondition::Crowded)
    }

    /// The first avoid condition that disqualifies `place`, if any.
    pub fn violated_condition(&self, place: &Place) -> Option<&AvoidCondition> {
        self.avoid.iter().find(|c| c.applies_to(place))
    }

    /// Check the invariants a context must hold before planning.
    pub fn validate(&self) -> Result<(), ContextError> {
        if !valid_location(self.start) {
            return Err(ContextError::InvalidStart);
        }
        if self.start_minute >= MINUTES_PER_DAY {
            return Err(ContextError::StartOutOfRange {
                minute: self.start_minute,
            });
        }
        if self.budget_minutes == 0 {
            return Err(ContextError::ZeroBudget);
        }
        Ok(())
    }
}
