//! The JSON input document and its conversion into core types.
//!
//! Every field is optional at the serde level so a missing value can be
//! reported against the record that lacks it rather than as a bare decoder
//! error.

use geo::Coord;
use serde::Deserialize;
use thiserror::Error;
use waymark_core::clock::parse_clock;
use waymark_core::{ClockError, Context, CrowdLevel, Place, PlaceError, TimeWindow};

/// Start time used when the visitor omits one.
pub(crate) const DEFAULT_START_TIME: &str = "00:00";

/// Problems found while converting the input document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A top-level section was absent.
    #[error("input has no {section:?} section")]
    MissingSection {
        /// Name of the section.
        section: &'static str,
    },
    /// A record lacked a required field.
    #[error("{record} is missing {field:?}")]
    MissingField {
        /// The record, e.g. `user` or `place "p1"`.
        record: String,
        /// The absent field.
        field: &'static str,
    },
    /// A clock field was not `HH:MM`.
    #[error("{record} has an invalid {field:?}: {source}")]
    InvalidClock {
        /// The offending record.
        record: String,
        /// The offending field.
        field: &'static str,
        /// Parser failure.
        #[source]
        source: ClockError,
    },
    /// A crowd level was not `low`, `medium` or `high`.
    #[error("{record} has an invalid \"crowd_level\": {source}")]
    InvalidCrowdLevel {
        /// The offending record.
        record: String,
        /// Parser failure.
        #[source]
        source: PlaceError,
    },
}

/// The input document as decoded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawInput {
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default)]
    places: Option<Vec<RawPlace>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawUser {
    lat: Option<f64>,
    lng: Option<f64>,
    start_time: Option<String>,
    time_available_minutes: Option<u32>,
    #[serde(default)]
    preferences: Vec<String>,
    #[serde(default)]
    avoid: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawPlace {
    id: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    avg_duration_minutes: Option<u16>,
    crowd_level: Option<String>,
    open_from: Option<String>,
    open_to: Option<String>,
    #[serde(default)]
    opening_hours: Vec<RawHours>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawHours {
    open_from: String,
    open_to: String,
}

impl RawInput {
    /// Convert the document into a context and its places.
    pub(crate) fn into_parts(self) -> Result<(Context, Vec<Place>), InputError> {
        let user = self
            .user
            .ok_or(InputError::MissingSection { section: "user" })?;
        let places = self
            .places
            .ok_or(InputError::MissingSection { section: "places" })?;
        let context = user.into_context()?;
        let places = places
            .into_iter()
            .enumerate()
            .map(|(position, raw)| raw.into_place(position))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((context, places))
    }
}

impl RawUser {
    fn into_context(self) -> Result<Context, InputError> {
        let record = "user";
        let lat = require(self.lat, record, "lat")?;
        let lng = require(self.lng, record, "lng")?;
        let budget = require(self.time_available_minutes, record, "time_available_minutes")?;
        let start_time = self
            .start_time
            .unwrap_or_else(|| DEFAULT_START_TIME.to_owned());
        let start_minute = parse_clock(&start_time).map_err(|source| InputError::InvalidClock {
            record: record.to_owned(),
            field: "start_time",
            source,
        })?;
        let with_preferences = self
            .preferences
            .iter()
            .fold(Context::new(Coord { x: lng, y: lat }, start_minute, budget), |ctx, p| {
                ctx.with_preference(p)
            });
        Ok(self
            .avoid
            .iter()
            .fold(with_preferences, |ctx, condition| ctx.with_avoid(condition)))
    }
}

impl RawPlace {
    fn into_place(self, position: usize) -> Result<Place, InputError> {
        let record = self
            .id
            .as_ref()
            .map_or_else(|| format!("place[{position}]"), |id| format!("place {id:?}"));
        let id = require(self.id, &record, "id")?;
        let kind = require(self.kind, &record, "type")?;
        let lat = require(self.lat, &record, "lat")?;
        let lng = require(self.lng, &record, "lng")?;
        let visit_minutes = require(self.avg_duration_minutes, &record, "avg_duration_minutes")?;
        let crowd_level: CrowdLevel = require(self.crowd_level, &record, "crowd_level")?
            .parse()
            .map_err(|source| InputError::InvalidCrowdLevel {
                record: record.clone(),
                source,
            })?;

        let mut hours = self.opening_hours;
        if self.open_from.is_some() || self.open_to.is_some() || hours.is_empty() {
            hours.insert(
                0,
                RawHours {
                    open_from: require(self.open_from, &record, "open_from")?,
                    open_to: require(self.open_to, &record, "open_to")?,
                },
            );
        }

        let mut place = Place::new(id, &kind, Coord { x: lng, y: lat })
            .with_visit_minutes(visit_minutes)
            .with_crowd_level(crowd_level);
        if let Some(name) = self.name {
            place = place.with_name(name);
        }
        for entry in &hours {
            place = place.with_window(entry.window(&record)?);
        }
        Ok(self.tags.iter().fold(place, |acc, tag| acc.with_tag(tag)))
    }
}

impl RawHours {
    fn window(&self, record: &str) -> Result<TimeWindow, InputError> {
        let clock = |field: &'static str, value: &str| {
            parse_clock(value).map_err(|source| InputError::InvalidClock {
                record: record.to_owned(),
                field,
                source,
            })
        };
        let start = clock("open_from", &self.open_from)?;
        let end = clock("open_to", &self.open_to)?;
        TimeWindow::new(start, end).map_err(|source| InputError::InvalidClock {
            record: record.to_owned(),
            field: "open_to",
            source,
        })
    }
}

fn require<T>(value: Option<T>, record: &str, field: &'static str) -> Result<T, InputError> {
    value.ok_or_else(|| InputError::MissingField {
        record: record.to_owned(),
        field,
    })
}
