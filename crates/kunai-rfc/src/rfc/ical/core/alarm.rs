//! VALARM values (RFC 5545 §3.6.6), reduced to what event rows store.

use serde::{Deserialize, Serialize};

/// `ACTION` property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmAction {
    #[default]
    Display,
    Email,
    Audio,
}

/// An alarm relative to the event start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    /// Minutes before the start at which the alarm fires. Negative values fire after the start.
    pub minutes_before: i64,
    #[serde(default)]
    pub action: AlarmAction,
}

impl Alarm {
    #[must_use]
    pub const fn new(minutes_before: i64, action: AlarmAction) -> Self {
        Self {
            minutes_before,
            action,
        }
    }
}
