//! ORGANIZER and ATTENDEE values (RFC 5545 §3.8.4.1, §3.8.4.3).

use serde::{Deserialize, Serialize};

const MAILTO_SCHEME: &str = "mailto:";

/// ## Summary
/// Resolves the email address of a calendar user.
///
/// A `mailto:` URI wins; otherwise the `EMAIL` parameter (RFC 7986) is used.
/// Any other URI yields no address.
#[must_use]
pub fn resolve_email(uri: &str, email_param: Option<&str>) -> Option<String> {
    let from_uri = uri
        .get(..MAILTO_SCHEME.len())
        .filter(|scheme| scheme.eq_ignore_ascii_case(MAILTO_SCHEME))
        .map(|_| uri[MAILTO_SCHEME.len()..].trim())
        .filter(|address| !address.is_empty());

    from_uri
        .or_else(|| email_param.map(str::trim).filter(|e| !e.is_empty()))
        .map(String::from)
}

/// Builds a `mailto:` URI for an email address.
#[must_use]
pub fn mailto(email: &str) -> String {
    format!("{MAILTO_SCHEME}{email}")
}

/// Event organizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    /// CAL-ADDRESS of the organizer, usually a `mailto:` URI.
    pub uri: String,
    /// `CN` parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// `EMAIL` parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Organizer {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            common_name: None,
            email: None,
        }
    }

    /// Returns the organizer's email address, if it has one.
    #[must_use]
    pub fn email_address(&self) -> Option<String> {
        resolve_email(&self.uri, self.email.as_deref())
    }
}

/// `ROLE` parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Role {
    Chair,
    ReqParticipant,
    OptParticipant,
    NonParticipant,
}

/// `PARTSTAT` parameter values for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum ParticipationStatus {
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
    Delegated,
}

/// `CUTYPE` parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum CalendarUserType {
    Individual,
    Group,
    Resource,
    Room,
    Unknown,
}

/// Event attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// CAL-ADDRESS of the attendee.
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation_status: Option<ParticipationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<CalendarUserType>,
}

impl Attendee {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            common_name: None,
            email: None,
            role: None,
            participation_status: None,
            user_type: None,
        }
    }

    /// Returns the attendee's email address, if it has one.
    #[must_use]
    pub fn email_address(&self) -> Option<String> {
        resolve_email(&self.uri, self.email.as_deref())
    }
}
