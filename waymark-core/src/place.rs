//! Places that may be visited.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

use crate::TimeWindow;

/// How busy a place usually is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CrowdLevel {
    /// Quiet.
    Low,
    /// Moderately busy.
    Medium,
    /// Crowded.
    High,
}

impl CrowdLevel {
    /// Return the level as a lowercase `&str`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrowdLevel {
    type Err = PlaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(PlaceError::UnknownCrowdLevel {
                value: s.to_owned(),
            }),
        }
    }
}

/// A location that may be included in an itinerary.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The place
/// type and tags are stored lower-cased so comparisons are by value.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{CrowdLevel, Place, TimeWindow};
///
/// let place = Place::new("p1", "Park", Coord { x: -0.12, y: 51.5 })
///     .with_window(TimeWindow::parse("06:00", "22:00")?)
///     .with_visit_minutes(45)
///     .with_crowd_level(CrowdLevel::Low)
///     .with_tag("Quiet");
///
/// assert_eq!(place.kind, "park");
/// assert!(place.tags.contains("quiet"));
/// assert!(place.validate().is_ok());
/// # Ok::<(), waymark_core::ClockError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Unique identifier within a request.
    pub id: String,
    /// Display name; defaults to the id.
    pub name: String,
    /// Category such as `cafe` or `park`.
    pub kind: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Daily opening windows.
    pub opening_windows: Vec<TimeWindow>,
    /// Average time spent on site.
    pub visit_minutes: u16,
    /// Typical crowd level.
    pub crowd_level: CrowdLevel,
    /// Free-form descriptors used for preference matching.
    pub tags: BTreeSet<String>,
}

/// Errors returned by [`Place::validate`] and crowd-level parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceError {
    /// The identifier was blank.
    #[error("place id must not be empty")]
    EmptyId,
    /// The type was blank.
    #[error("place {id} has an empty type")]
    EmptyKind {
        /// Offending place.
        id: String,
    },
    /// No opening windows were supplied.
    #[error("place {id} has no opening windows")]
    NoOpeningWindows {
        /// Offending place.
        id: String,
    },
    /// Latitude or longitude was not a valid WGS84 value.
    #[error("place {id} has an invalid location")]
    InvalidLocation {
        /// Offending place.
        id: String,
    },
    /// A crowd level string was not recognised.
    #[error("unknown crowd level {value:?}")]
    UnknownCrowdLevel {
        /// The rejected input.
        value: String,
    },
}

impl Place {
    /// Construct a place with no opening windows, no tags, a zero visit
    /// duration and medium crowds.
    pub fn new(id: impl Into<String>, kind: &str, location: Coord<f64>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind: kind.trim().to_lowercase(),
            location,
            opening_windows: Vec::new(),
            visit_minutes: 0,
            crowd_level: CrowdLevel::Medium,
            tags: BTreeSet::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add an opening window.
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.opening_windows.push(window);
        self
    }

    /// Set the average visit duration.
    pub fn with_visit_minutes(mut self, minutes: u16) -> Self {
        self.visit_minutes = minutes;
        self
    }

    /// Set the crowd level.
    pub fn with_crowd_level(mut self, level: CrowdLevel) -> Self {
        self.crowd_level = level;
        self
    }

    /// Add a preference-matching tag.
    pub fn with_tag(mut self, tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() {
            self.tags.insert(tag);
        }
        self
    }

    /// Whether the type or any tag equals `label` (already lower-cased).
    pub fn carries(&self, label: &str) -> bool {
        self.kind == label || self.tags.contains(label)
    }

    /// Whether the place is open at `minute`.
    pub fn is_open_at(&self, minute: f64) -> bool {
        self.opening_windows.iter().any(|w| w.contains(minute))
    }

    /// Check the invariants a place must hold before graph construction.
    pub fn validate(&self) -> Result<(), PlaceError> {
        if self.id.trim().is_empty() {
            return Err(PlaceError::EmptyId);
        }
        let id = || self.id.clone();
        if self.kind.is_empty() {
            return Err(PlaceError::EmptyKind { id: id() });
        }
        if self.opening_windows.is_empty() {
            return Err(PlaceError::NoOpeningWindows { id: id() });
        }
        if !valid_location(self.location) {
            return Err(PlaceError::InvalidLocation { id: id() });
        }
        Ok(())
    }
}

pub(crate) fn valid_location(location: Coord<f64>) -> bool {
    location.x.is_finite()
        && location.y.is_finite()
        && (-180.0..=180.0).contains(&location.x)
        && (-90.0..=90.0).contains(&location.y)
}
