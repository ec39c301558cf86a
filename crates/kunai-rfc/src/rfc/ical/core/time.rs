//! Event time values: DTSTART/DTEND-style instants and RDATE/EXDATE lists.

use serde::{Deserialize, Serialize};

use super::datetime::{Date, DateTime};

/// A DTSTART, DTEND, RDATE or EXDATE value.
///
/// Either a date-only value (all-day semantics) or a DATE-TIME that is
/// floating, UTC or zoned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTime {
    Date(Date),
    DateTime(DateTime),
}

impl EventTime {
    /// Returns whether this is a date-only value.
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns the calendar date, cutting off the time of day of DATE-TIME values.
    #[must_use]
    pub const fn date(&self) -> Date {
        match self {
            Self::Date(date) => *date,
            Self::DateTime(dt) => dt.date(),
        }
    }
}

impl From<Date> for EventTime {
    fn from(date: Date) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime> for EventTime {
    fn from(dt: DateTime) -> Self {
        Self::DateTime(dt)
    }
}

/// One RDATE or EXDATE property: an ordered list of instants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateList {
    pub values: Vec<EventTime>,
}

impl DateList {
    #[must_use]
    pub const fn new(values: Vec<EventTime>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<EventTime> for DateList {
    fn from_iter<T: IntoIterator<Item = EventTime>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
