//! iCalendar DURATION value type (RFC 5545 §3.3.6).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RfcError;

const SECONDS_PER_DAY: i64 = 24 * 3600;

/// Duration value (RFC 5545 §3.3.6).
///
/// Represents a duration of time. iCalendar durations can be either:
/// - Week-based: `P1W` (1 week)
/// - Day/time-based: `P1DT2H30M` (1 day, 2 hours, 30 minutes)
///
/// Weeks and days are nominal (they follow the wall clock across DST
/// changes), hours, minutes and seconds are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Duration {
    /// Whether this duration is negative.
    pub negative: bool,
    /// Number of weeks (mutually exclusive with days/hours/minutes/seconds).
    pub weeks: u32,
    /// Number of days.
    pub days: u32,
    /// Number of hours.
    pub hours: u32,
    /// Number of minutes.
    pub minutes: u32,
    /// Number of seconds.
    pub seconds: u32,
}

impl Duration {
    /// Creates a new zero duration.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            negative: false,
            weeks: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    /// Creates a duration from days.
    #[must_use]
    pub const fn days(days: u32) -> Self {
        Self {
            days,
            ..Self::zero()
        }
    }

    /// Creates a new duration builder.
    #[must_use]
    pub const fn builder() -> DurationBuilder {
        DurationBuilder::new()
    }

    /// ## Summary
    /// Creates an exact duration from a signed number of seconds.
    ///
    /// The result only uses hours, minutes and seconds so that it keeps
    /// describing the same elapsed time regardless of DST transitions.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Components saturate at u32::MAX hours, far beyond any calendar span"
    )]
    pub fn from_exact_seconds(total: i64) -> Self {
        let abs = total.unsigned_abs();
        let hours = (abs / 3600).min(u64::from(u32::MAX));
        Self {
            negative: total < 0,
            hours: hours as u32,
            minutes: ((abs % 3600) / 60) as u32,
            seconds: (abs % 60) as u32,
            ..Self::zero()
        }
    }

    /// Returns whether the duration spans no time at all.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.as_seconds() == 0
    }

    /// Returns whether any hour, minute or second component is set.
    #[must_use]
    pub const fn has_sub_day_components(&self) -> bool {
        self.hours > 0 || self.minutes > 0 || self.seconds > 0
    }

    /// Returns the signed number of nominal days (weeks and days).
    #[must_use]
    pub const fn nominal_days(&self) -> i64 {
        let days = self.weeks as i64 * 7 + self.days as i64;
        if self.negative { -days } else { days }
    }

    /// Returns the signed number of exact seconds (hours, minutes and seconds).
    #[must_use]
    pub const fn exact_seconds(&self) -> i64 {
        let secs = self.hours as i64 * 3600 + self.minutes as i64 * 60 + self.seconds as i64;
        if self.negative { -secs } else { secs }
    }

    /// Returns the total duration as seconds, counting a day as 24 hours.
    #[must_use]
    pub const fn as_seconds(&self) -> i64 {
        self.nominal_days() * SECONDS_PER_DAY + self.exact_seconds()
    }

    /// Returns the number of whole days, rounding towards zero.
    #[must_use]
    pub const fn whole_days(&self) -> i64 {
        self.as_seconds() / SECONDS_PER_DAY
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;

        if self.weeks > 0 {
            write!(f, "{}W", self.weeks)?;
        } else {
            if self.days > 0 {
                write!(f, "{}D", self.days)?;
            }
            if self.has_sub_day_components() {
                write!(f, "T")?;
                if self.hours > 0 {
                    write!(f, "{}H", self.hours)?;
                }
                if self.minutes > 0 {
                    write!(f, "{}M", self.minutes)?;
                }
                if self.seconds > 0 {
                    write!(f, "{}S", self.seconds)?;
                }
            } else if self.days == 0 {
                // Zero duration
                write!(f, "T0S")?;
            } else {
                // Days only, already written
            }
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = RfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::rfc::ical::parse::parse_duration(s)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Builder for constructing `Duration` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationBuilder {
    inner: Duration,
}

impl DurationBuilder {
    /// Creates a new duration builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Duration::zero(),
        }
    }

    /// Sets the duration as negative.
    #[must_use]
    pub const fn negative(mut self) -> Self {
        self.inner.negative = true;
        self
    }

    /// Sets the weeks component.
    #[must_use]
    pub const fn weeks(mut self, weeks: u32) -> Self {
        self.inner.weeks = weeks;
        self
    }

    /// Sets the days component.
    #[must_use]
    pub const fn days(mut self, days: u32) -> Self {
        self.inner.days = days;
        self
    }

    /// Sets the hours component.
    #[must_use]
    pub const fn hours(mut self, hours: u32) -> Self {
        self.inner.hours = hours;
        self
    }

    /// Sets the minutes component.
    #[must_use]
    pub const fn minutes(mut self, minutes: u32) -> Self {
        self.inner.minutes = minutes;
        self
    }

    /// Sets the seconds component.
    #[must_use]
    pub const fn seconds(mut self, seconds: u32) -> Self {
        self.inner.seconds = seconds;
        self
    }

    /// Builds the duration.
    #[must_use]
    pub const fn build(self) -> Duration {
        self.inner
    }
}
