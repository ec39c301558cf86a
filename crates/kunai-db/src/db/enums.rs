//! Integer code enums stored in event rows.
//!
//! Each enum maps to the closed set of codes the storage schema accepts for
//! one column. Unknown codes decode to `None` and callers fall back to a
//! default.

use std::fmt;

/// Event visibility.
///
/// Maps to `events.access_level`. Codes ascend in restrictiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AccessLevel {
    Public,
    Private,
    Confidential,
}

impl AccessLevel {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Public => 0,
            Self::Private => 1,
            Self::Confidential => 2,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Public),
            1 => Some(Self::Private),
            2 => Some(Self::Confidential),
            _ => None,
        }
    }

    /// Returns the string representation of this access level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Confidential => "confidential",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event status.
///
/// Maps to `events.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EventStatusCode {
    Tentative,
    Confirmed,
    Cancelled,
}

impl EventStatusCode {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Tentative => 0,
            Self::Confirmed => 1,
            Self::Cancelled => 2,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Tentative),
            1 => Some(Self::Confirmed),
            2 => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Busy/free state of the event's time span.
///
/// Maps to `events.availability`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Availability {
    #[default]
    Busy,
    Free,
}

impl Availability {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Busy => 0,
            Self::Free => 1,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Busy),
            1 => Some(Self::Free),
            _ => None,
        }
    }
}

/// Attendee participation type.
///
/// Maps to `attendees.attendee_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AttendeeType {
    None,
    Required,
    Optional,
    Resource,
}

impl AttendeeType {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Required => 1,
            Self::Optional => 2,
            Self::Resource => 3,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Required),
            2 => Some(Self::Optional),
            3 => Some(Self::Resource),
            _ => None,
        }
    }
}

/// Attendee relationship to the event.
///
/// Maps to `attendees.attendee_relationship`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AttendeeRelationship {
    None,
    Attendee,
    Organizer,
}

impl AttendeeRelationship {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Attendee => 1,
            Self::Organizer => 2,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Attendee),
            2 => Some(Self::Organizer),
            _ => None,
        }
    }
}

/// Attendee response.
///
/// Maps to `attendees.attendee_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AttendeeStatus {
    None,
    Accepted,
    Declined,
    Invited,
    Tentative,
}

impl AttendeeStatus {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Accepted => 1,
            Self::Declined => 2,
            Self::Invited => 3,
            Self::Tentative => 4,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Accepted),
            2 => Some(Self::Declined),
            3 => Some(Self::Invited),
            4 => Some(Self::Tentative),
            _ => None,
        }
    }
}

/// How a reminder is delivered.
///
/// Maps to `reminders.method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ReminderMethod {
    Default,
    Alert,
    Email,
    Alarm,
}

impl ReminderMethod {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Default => 0,
            Self::Alert => 1,
            Self::Email => 2,
            Self::Alarm => 4,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Default),
            1 => Some(Self::Alert),
            2 => Some(Self::Email),
            4 => Some(Self::Alarm),
            _ => None,
        }
    }
}
