//! Minute-of-day clock arithmetic.
//!
//! Times are minutes since midnight on a modular `0..1440` clock. There is no
//! calendar: a window whose end precedes its start wraps past midnight and is
//! treated as `[start, 1440) ∪ [0, end)`.
//!
//! # Examples
//! ```
//! use waymark_core::TimeWindow;
//!
//! let late_bar = TimeWindow::new(1200, 120)?;
//! assert!(late_bar.contains(30.0));
//! assert!(!late_bar.contains(600.0));
//! # Ok::<(), waymark_core::ClockError>(())
//! ```

use thiserror::Error;

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Errors raised while building clock values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    /// A minute value was outside `0..1440`.
    #[error("minute {minute} is outside the 0..1440 clock")]
    OutOfRange {
        /// The rejected value.
        minute: u16,
    },
    /// A clock string was not `HH:MM`.
    #[error("clock time {input:?} is not formatted as HH:MM")]
    Malformed {
        /// The rejected input.
        input: String,
    },
}

/// A daily opening or preference window.
///
/// `start == end` denotes a window open around the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWindow", into = "RawWindow"))]
pub struct TimeWindow {
    start: u16,
    end: u16,
}

impl TimeWindow {
    /// Validate and construct a window from two minute-of-day values.
    pub fn new(start: u16, end: u16) -> Result<Self, ClockError> {
        for minute in [start, end] {
            if minute >= MINUTES_PER_DAY {
                return Err(ClockError::OutOfRange { minute });
            }
        }
        Ok(Self { start, end })
    }

    /// A window covering the whole day.
    pub const fn all_day() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Parse a window from two `HH:MM` strings.
    ///
    /// # Examples
    /// ```
    /// use waymark_core::TimeWindow;
    ///
    /// let window = TimeWindow::parse("07:00", "20:00")?;
    /// assert_eq!((window.start(), window.end()), (420, 1200));
    /// # Ok::<(), waymark_core::ClockError>(())
    /// ```
    pub fn parse(start: &str, end: &str) -> Result<Self, ClockError> {
        Self::new(parse_clock(start)?, parse_clock(end)?)
    }

    /// Opening minute.
    pub const fn start(&self) -> u16 {
        self.start
    }

    /// Closing minute (exclusive).
    pub const fn end(&self) -> u16 {
        self.end
    }

    /// Whether the window crosses midnight.
    pub const fn wraps(&self) -> bool {
        self.end < self.start
    }

    /// Report whether `minute` falls inside the window.
    ///
    /// `minute` may be fractional or exceed a day; it is reduced onto the
    /// clock before comparison.
    pub fn contains(&self, minute: f64) -> bool {
        if self.start == self.end {
            return true;
        }
        let at = minute_of_day(minute);
        let start = f64::from(self.start);
        let end = f64::from(self.end);
        if self.wraps() {
            at >= start || at < end
        } else {
            start <= at && at < end
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawWindow {
    start_minutes: u16,
    end_minutes: u16,
}

#[cfg(feature = "serde")]
impl TryFrom<RawWindow> for TimeWindow {
    type Error = ClockError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start_minutes, raw.end_minutes)
    }
}

#[cfg(feature = "serde")]
impl From<TimeWindow> for RawWindow {
    fn from(window: TimeWindow) -> Self {
        Self {
            start_minutes: window.start,
            end_minutes: window.end,
        }
    }
}

/// Reduce an instant onto the `0..1440` clock.
pub fn minute_of_day(minute: f64) -> f64 {
    minute.rem_euclid(f64::from(MINUTES_PER_DAY))
}

/// Parse an `HH:MM` clock string into minutes since midnight.
///
/// # Examples
/// ```
/// use waymark_core::clock::parse_clock;
///
/// assert_eq!(parse_clock("08:30"), Ok(510));
/// assert!(parse_clock("24:00").is_err());
/// ```
pub fn parse_clock(input: &str) -> Result<u16, ClockError> {
    let malformed = || ClockError::Malformed {
        input: input.to_owned(),
    };
    let (hours, minutes) = input.trim().split_once(':').ok_or_else(malformed)?;
    let hours: u16 = hours.parse().map_err(|_| malformed())?;
    let minutes: u16 = minutes.parse().map_err(|_| malformed())?;
    if hours >= 24 || minutes >= 60 {
        return Err(malformed());
    }
    Ok(hours * 60 + minutes)
}

/// Render an instant as `HH:MM`, rounding to the nearest minute.
///
/// # Examples
/// ```
/// use waymark_core::clock::format_clock;
///
/// assert_eq!(format_clock(495.4), "08:15");
/// assert_eq!(format_clock(1470.0), "00:30");
/// ```
pub fn format_clock(minute: f64) -> String {
    // Rounded onto the clock, so the value fits `0..1440`.
    let total = minute_of_day(minute.round()) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}
