//! Lookup tables supplied by the caller for each request.
//!
//! The tables are plain immutable values. Keys and types are lower-cased on
//! construction so lookups compare by value.

use std::collections::{BTreeMap, BTreeSet};

use crate::{ClockError, Place, TimeWindow};

/// Coefficients of the sequence score.
///
/// Signs are carried by the weights: penalties default to negative values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeightConfig {
    /// Multiplier for the share of preferences a stop matches.
    pub preference_match: f64,
    /// Multiplier for the total path distance in kilometres.
    pub distance_penalty: f64,
    /// Multiplier for the summed crowd adjustments.
    pub crowd_penalty: f64,
    /// Multiplier for arrivals inside a preferred window.
    pub time_efficiency: f64,
    /// Multiplier for each adjacent pair matching a sequence rule.
    pub logical_sequence: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            preference_match: 10.0,
            distance_penalty: -2.0,
            crowd_penalty: -5.0,
            time_efficiency: 3.0,
            logical_sequence: 5.0,
        }
    }
}

/// Preference → place types that satisfy it.
///
/// # Examples
/// ```
/// use waymark_core::PreferenceMapping;
///
/// let mapping = PreferenceMapping::new().with_mapping("Coffee", ["cafe", "Bakery"]);
/// assert!(mapping.types_for("coffee").any(|t| t == "bakery"));
/// assert_eq!(mapping.types_for("tea").count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "BTreeMap<String, Vec<String>>"))]
pub struct PreferenceMapping {
    map: BTreeMap<String, BTreeSet<String>>,
}

impl PreferenceMapping {
    /// Construct an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a preference to additional place types.
    pub fn with_mapping<I, S>(mut self, preference: &str, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.map.entry(normalise(preference)).or_default();
        entry.extend(types.into_iter().map(|t| normalise(t.as_ref())));
        self
    }

    /// Iterate over the types mapped to `preference`.
    pub fn types_for<'a>(&'a self, preference: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.map
            .get(preference)
            .into_iter()
            .flat_map(|types| types.iter().map(String::as_str))
    }

    /// Whether `place` satisfies `preference` directly or through the mapping.
    pub fn matches(&self, preference: &str, place: &Place) -> bool {
        place.carries(preference) || self.types_for(preference).any(|t| place.carries(t))
    }

    /// Number of mapped preferences.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for PreferenceMapping {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        raw.into_iter()
            .fold(Self::new(), |mapping, (preference, types)| {
                mapping.with_mapping(&preference, types)
            })
    }
}

/// A named preferred window such as `breakfast`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawNamedWindow"))]
pub struct NamedWindow {
    /// The daily window.
    pub window: TimeWindow,
    /// Human-readable label.
    pub name: String,
}

impl NamedWindow {
    /// Construct a named window.
    pub fn new(window: TimeWindow, name: impl Into<String>) -> Self {
        Self {
            window,
            name: name.into(),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawNamedWindow {
    start_minutes: u16,
    end_minutes: u16,
    name: String,
}

#[cfg(feature = "serde")]
impl TryFrom<RawNamedWindow> for NamedWindow {
    type Error = ClockError;

    fn try_from(raw: RawNamedWindow) -> Result<Self, Self::Error> {
        Ok(Self::new(
            TimeWindow::new(raw.start_minutes, raw.end_minutes)?,
            raw.name,
        ))
    }
}

/// Place type → ordered preferred windows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "BTreeMap<String, Vec<NamedWindow>>"))]
pub struct TimeWindowTable {
    map: BTreeMap<String, Vec<NamedWindow>>,
}

impl TimeWindowTable {
    /// Construct an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a preferred window for `kind`.
    pub fn with_window(mut self, kind: &str, window: NamedWindow) -> Self {
        self.map.entry(normalise(kind)).or_default().push(window);
        self
    }

    /// Append a preferred window parsed from minute values.
    pub fn try_with_window(
        self,
        kind: &str,
        start: u16,
        end: u16,
        name: &str,
    ) -> Result<Self, ClockError> {
        let window = NamedWindow::new(TimeWindow::new(start, end)?, name);
        Ok(self.with_window(kind, window))
    }

    /// The first preferred window of `kind` containing `minute`.
    ///
    /// Types with no entry have no preferred window.
    pub fn preferred_window(&self, kind: &str, minute: f64) -> Option<&NamedWindow> {
        self.map
            .get(kind)
            .and_then(|windows| windows.iter().find(|w| w.window.contains(minute)))
    }

    /// Number of types with preferred windows.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl From<BTreeMap<String, Vec<NamedWindow>>> for TimeWindowTable {
    fn from(raw: BTreeMap<String, Vec<NamedWindow>>) -> Self {
        let mut table = Self::new();
        for (kind, windows) in raw {
            for window in windows {
                table = table.with_window(&kind, window);
            }
        }
        table
    }
}

/// A bonus for visiting `to_type` straight after `from_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawSequenceRule"))]
pub struct SequenceRule {
    /// Type of the preceding stop.
    pub from_type: String,
    /// Type of the following stop.
    pub to_type: String,
    /// Explanation shown to the visitor.
    pub reason: String,
}

impl SequenceRule {
    /// Construct a rule; types are lower-cased.
    pub fn new(from_type: &str, to_type: &str, reason: impl Into<String>) -> Self {
        Self {
            from_type: normalise(from_type),
            to_type: normalise(to_type),
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSequenceRule {
    from_type: String,
    to_type: String,
    #[serde(default = "default_reason")]
    reason: String,
}

#[cfg(feature = "serde")]
fn default_reason() -> String {
    "logical sequence".to_owned()
}

#[cfg(feature = "serde")]
impl From<RawSequenceRule> for SequenceRule {
    fn from(raw: RawSequenceRule) -> Self {
        Self::new(&raw.from_type, &raw.to_type, raw.reason)
    }
}

/// Ordered list of sequence rules; the first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<SequenceRule>"))]
pub struct SequenceRuleTable {
    rules: Vec<SequenceRule>,
}

impl SequenceRuleTable {
    /// Construct an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: SequenceRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The rule matching the ordered pair, if any.
    pub fn rule_for(&self, previous: &str, next: &str) -> Option<&SequenceRule> {
        self.rules
            .iter()
            .find(|r| r.from_type == previous && r.to_type == next)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<SequenceRule>> for SequenceRuleTable {
    fn from(rules: Vec<SequenceRule>) -> Self {
        Self { rules }
    }
}

/// The weights and lookup tables a planner scores against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanningTables {
    /// Score coefficients.
    pub weights: WeightConfig,
    /// Preference → type mapping.
    pub preferences: PreferenceMapping,
    /// Preferred visiting windows by type.
    pub time_windows: TimeWindowTable,
    /// Ordered-pair bonuses.
    pub sequence_rules: SequenceRuleTable,
}

fn normalise(value: &str) -> String {
    value.trim().to_lowercase()
}
