//! Preference matching between a visitor and a place.

use waymark_core::{Context, Place, PreferenceMapping};

/// Strength assigned when the visitor stated no preferences.
pub const NEUTRAL_STRENGTH: f64 = 0.5;

/// The preferences a place satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreferenceMatch {
    matched: Vec<String>,
    total: usize,
}

impl PreferenceMatch {
    /// Match `place` against every preference in `context`.
    ///
    /// A preference is satisfied when the place's type or a tag equals it, or
    /// when the mapping lists the type or a tag under it.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use waymark_core::{Context, Place, PreferenceMapping};
    /// use waymark_scorer::PreferenceMatch;
    ///
    /// let mapping = PreferenceMapping::new().with_mapping("coffee", ["cafe"]);
    /// let context = Context::new(Coord { x: 0.0, y: 0.0 }, 480, 90)
    ///     .with_preference("coffee")
    ///     .with_preference("art");
    /// let cafe = Place::new("c", "cafe", Coord { x: 0.0, y: 0.0 });
    ///
    /// let matched = PreferenceMatch::evaluate(&cafe, &context, &mapping);
    /// assert_eq!(matched.names(), ["coffee"]);
    /// assert!((matched.strength() - 0.5).abs() < f64::EPSILON);
    /// ```
    #[must_use]
    pub fn evaluate(place: &Place, context: &Context, mapping: &PreferenceMapping) -> Self {
        let matched = context
            .preferences
            .iter()
            .filter(|preference| mapping.matches(preference, place))
            .cloned()
            .collect();
        Self {
            matched,
            total: context.preferences.len(),
        }
    }

    /// Names of the satisfied preferences, in the visitor's order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.matched
    }

    /// Whether the place is relevant to the visitor.
    ///
    /// Without stated preferences every place is relevant.
    #[must_use]
    pub fn is_relevant(&self) -> bool {
        self.total == 0 || !self.matched.is_empty()
    }

    /// Share of preferences satisfied, in `0.0..=1.0`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "preference counts are small and the ratio is a score input"
    )]
    pub fn strength(&self) -> f64 {
        if self.total == 0 {
            return NEUTRAL_STRENGTH;
        }
        self.matched.len() as f64 / self.total as f64
    }
}
