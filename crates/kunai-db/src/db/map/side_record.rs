//! Unknown-property side records stored as extended properties.
//!
//! The value of a side record is a JSON array `[name, value, {params}]`.

use std::collections::BTreeMap;

use kunai_core::constants::UNKNOWN_PROPERTY_NAME;
use kunai_rfc::rfc::ical::core::UnknownProperty;

use crate::db::keys;
use crate::db::row::Row;
use crate::error::DbResult;

/// What to do with a side record on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideRecord {
    /// Store this property next to the core row.
    Write(UnknownProperty),
    /// Remove a previously stored record.
    Clear,
}

/// ## Summary
/// Serializes an unknown property into its side-record payload.
///
/// ## Errors
/// Returns `DbError::SerializationError` if JSON encoding fails.
pub fn to_payload(property: &UnknownProperty) -> DbResult<String> {
    let parameters: BTreeMap<&str, &str> = property
        .parameters
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    Ok(serde_json::to_string(&(
        &property.name,
        &property.value,
        parameters,
    ))?)
}

/// Parses a side-record payload, returning `None` for malformed payloads.
#[must_use]
pub fn from_payload(payload: &str) -> Option<UnknownProperty> {
    match serde_json::from_str::<(String, String, BTreeMap<String, String>)>(payload) {
        Ok((name, value, parameters)) => Some(UnknownProperty {
            name,
            value,
            parameters: parameters.into_iter().collect(),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed unknown property");
            None
        }
    }
}

/// Builds an extended-property row.
#[must_use]
pub fn extended_property(name: &str, value: impl Into<String>) -> Row {
    let mut row = Row::new();
    row.insert(keys::NAME.to_string(), name.into());
    row.insert(keys::VALUE.to_string(), value.into().into());
    row
}

/// ## Summary
/// Builds the extended-property row holding an unknown property.
///
/// ## Errors
/// Returns `DbError::SerializationError` if JSON encoding fails.
pub fn unknown_property_row(property: &UnknownProperty) -> DbResult<Row> {
    Ok(extended_property(UNKNOWN_PROPERTY_NAME, to_payload(property)?))
}
