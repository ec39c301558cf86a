//! Flat row model exchanged with the storage boundary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl ColumnValue {
    /// Returns the value as an integer. Booleans read as 0/1.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Boolean(value) => Some(i64::from(*value)),
            Self::Null | Self::Text(_) => None,
        }
    }

    /// Returns the value as a boolean. Integers read as `value != 0`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            Self::Integer(value) => Some(*value != 0),
            Self::Null | Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<Self>> From<Option<T>> for ColumnValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Column name to value map of one row.
pub type Row = BTreeMap<String, ColumnValue>;

/// Reads a text column, treating `Null` and missing columns alike.
#[must_use]
pub fn text<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.get(column).and_then(ColumnValue::as_text)
}

/// Reads an integer column, treating `Null` and missing columns alike.
#[must_use]
pub fn integer(row: &Row, column: &str) -> Option<i64> {
    row.get(column).and_then(ColumnValue::as_integer)
}

/// Storage tables an event is spread across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Events,
    Attendees,
    Reminders,
    ExtendedProperties,
}

impl Table {
    /// Returns the storage identifier of this table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Attendees => "attendees",
            Self::Reminders => "reminders",
            Self::ExtendedProperties => "extended_properties",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row selection predicate for queries, updates and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every row of the table.
    #[default]
    All,
    /// The row with this id.
    Id(i64),
    /// Rows whose column equals the value.
    Equals { column: String, value: ColumnValue },
    /// Rows whose column equals any of the values.
    In {
        column: String,
        values: Vec<ColumnValue>,
    },
    /// Rows matching every inner selection.
    And(Vec<Self>),
}

impl Selection {
    /// Selects rows whose column equals the value.
    #[must_use]
    pub fn equals(column: &str, value: impl Into<ColumnValue>) -> Self {
        Self::Equals {
            column: column.to_string(),
            value: value.into(),
        }
    }

    /// Selects rows whose column equals any of the values.
    #[must_use]
    pub fn one_of<V: Into<ColumnValue>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Selects the dependent rows of an event.
    #[must_use]
    pub fn event(event_id: i64) -> Self {
        Self::equals(super::keys::EVENT_ID, event_id)
    }

    /// Returns whether the row with the given id and values matches.
    #[must_use]
    pub fn matches(&self, id: i64, row: &Row) -> bool {
        match self {
            Self::All => true,
            Self::Id(wanted) => *wanted == id,
            Self::Equals { column, value } => {
                row.get(column).unwrap_or(&ColumnValue::Null) == value
            }
            Self::In { column, values } => {
                values.contains(row.get(column).unwrap_or(&ColumnValue::Null))
            }
            Self::And(inner) => inner.iter().all(|selection| selection.matches(id, row)),
        }
    }
}
