//! VEVENT model (RFC 5545 §3.6.1) as exchanged with the row codec.

use serde::{Deserialize, Serialize};

use super::alarm::Alarm;
use super::classification::Classification;
use super::duration::Duration;
use super::participant::{Attendee, Organizer};
use super::time::{DateList, EventTime};

/// `STATUS` property values for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Tentative,
    Confirmed,
    Cancelled,
}

/// `TRANSP` property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transparency {
    /// Event blocks time on calendar (default)
    #[default]
    Opaque,
    /// Event does not block time (shows as free)
    Transparent,
}

/// A property the event row has no column for, kept for round-tripping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownProperty {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<(String, String)>,
}

impl UnknownProperty {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            parameters: Vec::new(),
        }
    }
}

/// The semantic time model of an event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventTimes {
    /// DTSTART. Mandatory for storage; absent only in incomplete input.
    pub start: Option<EventTime>,
    /// DTEND.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,
    /// DURATION.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    /// RRULE values in their raw grammar, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recurrence_rules: Vec<String>,
    /// RDATE properties, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recurrence_dates: Vec<DateList>,
    /// EXDATE properties, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exception_dates: Vec<DateList>,
}

impl EventTimes {
    /// Creates a time model with only a start.
    #[must_use]
    pub fn starting_at(start: impl Into<EventTime>) -> Self {
        Self {
            start: Some(start.into()),
            ..Self::default()
        }
    }

    /// Returns whether the event repeats (has RRULEs or RDATEs).
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        !self.recurrence_rules.is_empty() || self.recurrence_dates.iter().any(|l| !l.is_empty())
    }
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub times: EventTimes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub transparency: Transparency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Organizer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alarms: Vec<Alarm>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Properties without a dedicated column, preserved through side records.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_properties: Vec<UnknownProperty>,
}
