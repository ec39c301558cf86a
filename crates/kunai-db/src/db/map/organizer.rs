//! Organizer of group-scheduled events.
//!
//! Only events with attendees carry an organizer; it is stored as an email address.

use kunai_rfc::rfc::ical::core::{Attendee, Organizer, mailto};

/// Returns the organizer email to store, if the event is group scheduled.
#[must_use]
pub fn encode_organizer(organizer: Option<&Organizer>, attendees: &[Attendee]) -> Option<String> {
    if attendees.is_empty() {
        return None;
    }

    let organizer = organizer?;
    let email = organizer.email_address();
    if email.is_none() {
        tracing::debug!(uri = organizer.uri, "Organizer has no email address, not storing it");
    }
    email
}

/// Returns the organizer of a stored event; suppressed without attendees.
#[must_use]
pub fn decode_organizer(email: Option<&str>, has_attendees: bool) -> Option<Organizer> {
    if !has_attendees {
        return None;
    }
    email
        .filter(|email| !email.is_empty())
        .map(|email| Organizer::new(mailto(email)))
}
