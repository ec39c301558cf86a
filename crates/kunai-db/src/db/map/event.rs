//! Event <-> core row and dependent rows.

use kunai_core::config::CodecConfig;
use kunai_core::constants::{
    CATEGORIES_PROPERTY_NAME, CATEGORIES_SEPARATOR, UNKNOWN_PROPERTY_NAME, URL_PROPERTY_NAME,
};
use kunai_rfc::rfc::ical::core::{
    Alarm, AlarmAction, Attendee, CalendarUserType, Event, EventStatus, ParticipationStatus, Role,
    Transparency, mailto,
};

use super::classification::{CLASS_PROPERTY, decode_classification, encode_classification};
use super::organizer::{decode_organizer, encode_organizer};
use super::side_record::{self, SideRecord};
use super::time::{RowEncoding, TimeCodec};
use crate::db::enums::{
    AccessLevel, AttendeeRelationship, AttendeeStatus, AttendeeType, Availability,
    EventStatusCode, ReminderMethod,
};
use crate::db::keys;
use crate::db::row::{self, ColumnValue, Row};
use crate::error::DbResult;

/// Rows produced for one event.
///
/// Dependent rows do not carry `event_id`; the writer links them to the core row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEvent {
    pub values: Row,
    pub attendees: Vec<Row>,
    pub reminders: Vec<Row>,
    /// Categories, url and unknown properties, including a classification side record.
    pub extended_properties: Vec<Row>,
}

/// Extended property names written by `EventCodec`. Other names belong to
/// other writers and are left untouched.
pub const OWNED_EXTENDED_PROPERTIES: [&str; 3] =
    [CATEGORIES_PROPERTY_NAME, URL_PROPERTY_NAME, UNKNOWN_PROPERTY_NAME];

/// Stored rows of one event, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventRows {
    pub values: Row,
    pub attendees: Vec<Row>,
    pub reminders: Vec<Row>,
    pub extended_properties: Vec<Row>,
}

impl From<EncodedEvent> for EventRows {
    fn from(encoded: EncodedEvent) -> Self {
        Self {
            values: encoded.values,
            attendees: encoded.attendees,
            reminders: encoded.reminders,
            extended_properties: encoded.extended_properties,
        }
    }
}

/// Encodes and decodes complete events.
#[derive(Debug)]
pub struct EventCodec {
    time: TimeCodec,
}

impl EventCodec {
    #[must_use]
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            time: TimeCodec::new(config),
        }
    }

    #[must_use]
    pub const fn with_time_codec(time: TimeCodec) -> Self {
        Self { time }
    }

    /// ## Summary
    /// Encodes an event into its core row and dependent rows.
    ///
    /// ## Errors
    /// - `DbError::InvalidTimeModel` if the event has no start.
    /// - `DbError::SerializationError` if a side record cannot be encoded.
    #[tracing::instrument(skip_all, fields(title = event.title.as_deref()))]
    pub fn encode(&mut self, event: &Event) -> DbResult<EncodedEvent> {
        let encoding = self.time.encode(&event.times)?;

        let mut values = Row::new();
        encoding.write_to(&mut values);

        let classification = encode_classification(event.classification.as_ref());
        let organizer = encode_organizer(event.organizer.as_ref(), &event.attendees);

        let columns: [(&str, ColumnValue); 9] = [
            (keys::TITLE, event.title.clone().into()),
            (keys::EVENT_LOCATION, event.location.clone().into()),
            (keys::DESCRIPTION, event.description.clone().into()),
            (keys::STATUS, event.status.map(|status| status_code(status).code()).into()),
            (keys::AVAILABILITY, availability(event.transparency).code().into()),
            (
                keys::ACCESS_LEVEL,
                classification.access_level.map(AccessLevel::code).into(),
            ),
            (keys::ORGANIZER, organizer.clone().into()),
            (keys::HAS_ATTENDEE_DATA, (!event.attendees.is_empty()).into()),
            (keys::HAS_ALARM, (!event.alarms.is_empty()).into()),
        ];
        for (column, value) in columns {
            values.insert(column.to_string(), value);
        }

        let attendees = event
            .attendees
            .iter()
            .map(|attendee| attendee_row(attendee, organizer.as_deref()))
            .collect();
        let reminders = event.alarms.iter().map(reminder_row).collect();

        let mut extended_properties = Vec::new();
        if !event.categories.is_empty() {
            extended_properties.push(side_record::extended_property(
                CATEGORIES_PROPERTY_NAME,
                event.categories.join(&CATEGORIES_SEPARATOR.to_string()),
            ));
        }
        if let Some(url) = &event.url {
            extended_properties.push(side_record::extended_property(URL_PROPERTY_NAME, url.clone()));
        }
        for property in &event.unknown_properties {
            extended_properties.push(side_record::unknown_property_row(property)?);
        }
        if let SideRecord::Write(property) = &classification.side_record {
            extended_properties.push(side_record::unknown_property_row(property)?);
        }

        Ok(EncodedEvent {
            values,
            attendees,
            reminders,
            extended_properties,
        })
    }

    /// ## Summary
    /// Decodes an event from its stored rows.
    ///
    /// ## Errors
    /// Returns `DbError::InvalidTimeModel` if the core row lacks `all_day` or `dtstart`.
    #[tracing::instrument(skip_all, fields(attendees = rows.attendees.len()))]
    pub fn decode(&mut self, rows: &EventRows) -> DbResult<Event> {
        let encoding = RowEncoding::read_from(&rows.values)?;
        let times = self.time.decode(&encoding)?;

        let text = |column| row::text(&rows.values, column).map(str::to_string);
        let mut event = Event {
            title: text(keys::TITLE),
            location: text(keys::EVENT_LOCATION),
            description: text(keys::DESCRIPTION),
            times,
            ..Event::default()
        };

        event.status = row::integer(&rows.values, keys::STATUS).and_then(|code| {
            let status = EventStatusCode::from_code(code).map(event_status);
            if status.is_none() {
                tracing::warn!(code, "Unknown status code");
            }
            status
        });
        event.transparency = match row::integer(&rows.values, keys::AVAILABILITY)
            .and_then(Availability::from_code)
        {
            Some(Availability::Free) => Transparency::Transparent,
            Some(Availability::Busy) | None => Transparency::Opaque,
        };

        event.attendees = rows.attendees.iter().filter_map(decode_attendee).collect();
        event.alarms = rows.reminders.iter().map(decode_reminder).collect();

        let mut class_record = None;
        for property in &rows.extended_properties {
            let (Some(name), Some(value)) =
                (row::text(property, keys::NAME), row::text(property, keys::VALUE))
            else {
                continue;
            };
            match name {
                CATEGORIES_PROPERTY_NAME => {
                    event.categories = value
                        .split(CATEGORIES_SEPARATOR)
                        .filter(|category| !category.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                URL_PROPERTY_NAME => event.url = Some(value.to_string()),
                UNKNOWN_PROPERTY_NAME => match side_record::from_payload(value) {
                    Some(unknown) if unknown.name.eq_ignore_ascii_case(CLASS_PROPERTY) => {
                        class_record = Some(unknown);
                    }
                    Some(unknown) => event.unknown_properties.push(unknown),
                    None => {}
                },
                other => tracing::debug!(name = other, "Skipping foreign extended property"),
            }
        }

        event.classification = decode_classification(
            row::integer(&rows.values, keys::ACCESS_LEVEL),
            class_record.as_ref(),
        );
        event.organizer = decode_organizer(
            row::text(&rows.values, keys::ORGANIZER),
            !event.attendees.is_empty(),
        );

        Ok(event)
    }
}

const fn status_code(status: EventStatus) -> EventStatusCode {
    match status {
        EventStatus::Tentative => EventStatusCode::Tentative,
        EventStatus::Confirmed => EventStatusCode::Confirmed,
        EventStatus::Cancelled => EventStatusCode::Cancelled,
    }
}

const fn event_status(code: EventStatusCode) -> EventStatus {
    match code {
        EventStatusCode::Tentative => EventStatus::Tentative,
        EventStatusCode::Confirmed => EventStatus::Confirmed,
        EventStatusCode::Cancelled => EventStatus::Cancelled,
    }
}

const fn availability(transparency: Transparency) -> Availability {
    match transparency {
        Transparency::Opaque => Availability::Busy,
        Transparency::Transparent => Availability::Free,
    }
}

fn attendee_row(attendee: &Attendee, organizer: Option<&str>) -> Row {
    let email = attendee.email_address();
    let identity = (!attendee.uri.to_ascii_lowercase().starts_with("mailto:"))
        .then(|| attendee.uri.clone());

    let attendee_type = match (attendee.user_type, attendee.role) {
        (Some(CalendarUserType::Resource | CalendarUserType::Room), _) => AttendeeType::Resource,
        (_, Some(Role::OptParticipant)) => AttendeeType::Optional,
        (_, Some(Role::NonParticipant)) => AttendeeType::None,
        (_, Some(Role::Chair | Role::ReqParticipant) | None) => AttendeeType::Required,
    };
    let status = match attendee.participation_status {
        Some(ParticipationStatus::Accepted) => AttendeeStatus::Accepted,
        Some(ParticipationStatus::Declined) => AttendeeStatus::Declined,
        Some(ParticipationStatus::Tentative) => AttendeeStatus::Tentative,
        Some(ParticipationStatus::Delegated) => AttendeeStatus::None,
        Some(ParticipationStatus::NeedsAction) | None => AttendeeStatus::Invited,
    };
    let is_organizer = matches!(
        (email.as_deref(), organizer),
        (Some(email), Some(organizer)) if email.eq_ignore_ascii_case(organizer)
    );
    let relationship = if is_organizer {
        AttendeeRelationship::Organizer
    } else {
        AttendeeRelationship::Attendee
    };

    let columns: [(&str, ColumnValue); 6] = [
        (keys::ATTENDEE_EMAIL, email.into()),
        (keys::ATTENDEE_IDENTITY, identity.into()),
        (keys::ATTENDEE_NAME, attendee.common_name.clone().into()),
        (keys::ATTENDEE_TYPE, attendee_type.code().into()),
        (keys::ATTENDEE_RELATIONSHIP, relationship.code().into()),
        (keys::ATTENDEE_STATUS, status.code().into()),
    ];
    columns
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}

fn decode_attendee(values: &Row) -> Option<Attendee> {
    let email = row::text(values, keys::ATTENDEE_EMAIL).filter(|email| !email.is_empty());
    let identity = row::text(values, keys::ATTENDEE_IDENTITY).filter(|uri| !uri.is_empty());

    let mut attendee = match (identity, email) {
        (Some(uri), email) => {
            let mut attendee = Attendee::new(uri);
            attendee.email = email.map(str::to_string);
            attendee
        }
        (None, Some(email)) => Attendee::new(mailto(email)),
        (None, None) => {
            tracing::warn!("Skipping attendee without email or identity");
            return None;
        }
    };

    attendee.common_name = row::text(values, keys::ATTENDEE_NAME).map(str::to_string);

    match row::integer(values, keys::ATTENDEE_TYPE).and_then(AttendeeType::from_code) {
        Some(AttendeeType::Required) => attendee.role = Some(Role::ReqParticipant),
        Some(AttendeeType::Optional) => attendee.role = Some(Role::OptParticipant),
        Some(AttendeeType::None) => attendee.role = Some(Role::NonParticipant),
        Some(AttendeeType::Resource) => attendee.user_type = Some(CalendarUserType::Resource),
        None => {}
    }

    attendee.participation_status =
        match row::integer(values, keys::ATTENDEE_STATUS).and_then(AttendeeStatus::from_code) {
            Some(AttendeeStatus::Accepted) => Some(ParticipationStatus::Accepted),
            Some(AttendeeStatus::Declined) => Some(ParticipationStatus::Declined),
            Some(AttendeeStatus::Tentative) => Some(ParticipationStatus::Tentative),
            Some(AttendeeStatus::Invited) => Some(ParticipationStatus::NeedsAction),
            Some(AttendeeStatus::None) | None => None,
        };

    Some(attendee)
}

fn reminder_row(alarm: &Alarm) -> Row {
    // Rows cannot express alarms after the start
    let minutes = alarm.minutes_before.max(0);
    if minutes != alarm.minutes_before {
        tracing::debug!(minutes_before = alarm.minutes_before, "Clamping alarm after start");
    }
    let method = match alarm.action {
        AlarmAction::Display => ReminderMethod::Alert,
        AlarmAction::Email => ReminderMethod::Email,
        AlarmAction::Audio => ReminderMethod::Alarm,
    };

    let mut values = Row::new();
    values.insert(keys::MINUTES.to_string(), minutes.into());
    values.insert(keys::METHOD.to_string(), method.code().into());
    values
}

fn decode_reminder(values: &Row) -> Alarm {
    let action = match row::integer(values, keys::METHOD).and_then(ReminderMethod::from_code) {
        Some(ReminderMethod::Email) => AlarmAction::Email,
        Some(ReminderMethod::Alarm) => AlarmAction::Audio,
        Some(ReminderMethod::Alert | ReminderMethod::Default) | None => AlarmAction::Display,
    };
    Alarm::new(row::integer(values, keys::MINUTES).unwrap_or_default(), action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use kunai_rfc::rfc::ical::core::{
        Classification, DateTime, EventTimes, Organizer, UnknownProperty,
    };

    fn codec() -> EventCodec {
        EventCodec::with_time_codec(TimeCodec::with_default_zone(Tz::Europe__Vienna))
    }

    fn event() -> Event {
        Event {
            title: Some("Planning".to_string()),
            times: EventTimes::starting_at(DateTime::zoned(2020, 6, 1, 12, 30, 0, "Europe/Vienna")),
            ..Event::default()
        }
    }

    fn side_records(encoded: &EncodedEvent) -> Vec<UnknownProperty> {
        encoded
            .extended_properties
            .iter()
            .filter(|property| row::text(property, keys::NAME) == Some(UNKNOWN_PROPERTY_NAME))
            .filter_map(|property| {
                row::text(property, keys::VALUE).and_then(side_record::from_payload)
            })
            .collect()
    }

    fn round_trip(event: &Event) -> Event {
        let mut codec = codec();
        let encoded = codec.encode(event).unwrap();
        codec.decode(&encoded.into()).unwrap()
    }

    #[test_log::test]
    fn plain_fields_round_trip() {
        let mut original = event();
        original.location = Some("Room 1".to_string());
        original.description = Some("Quarterly".to_string());
        original.status = Some(EventStatus::Confirmed);
        original.transparency = Transparency::Transparent;
        original.categories = vec!["Work".to_string(), "Team".to_string()];
        original.url = Some("https://example.com/plan".to_string());

        let decoded = round_trip(&original);

        assert_eq!(decoded.title, original.title);
        assert_eq!(decoded.location, original.location);
        assert_eq!(decoded.description, original.description);
        assert_eq!(decoded.status, Some(EventStatus::Confirmed));
        assert_eq!(decoded.transparency, Transparency::Transparent);
        assert_eq!(decoded.categories, original.categories);
        assert_eq!(decoded.url, original.url);
    }

    #[test_log::test]
    fn public_writes_no_side_record() {
        let mut original = event();
        original.classification = Some(Classification::PUBLIC);

        let encoded = codec().encode(&original).unwrap();

        assert!(side_records(&encoded).is_empty());
        assert_eq!(
            row::integer(&encoded.values, keys::ACCESS_LEVEL),
            Some(AccessLevel::Public.code())
        );
        assert_eq!(round_trip(&original).classification, Some(Classification::PUBLIC));
    }

    #[test_log::test]
    fn custom_classification_round_trips() {
        for value in [Classification::CONFIDENTIAL, Classification::parse("X-NEED-TO-KNOW")] {
            let mut original = event();
            original.classification = Some(value.clone());

            let encoded = codec().encode(&original).unwrap();
            assert_eq!(side_records(&encoded).len(), 1);

            let decoded = round_trip(&original);
            assert_eq!(decoded.classification, Some(value));
            assert!(decoded.unknown_properties.is_empty());
        }
    }

    #[test_log::test]
    fn unknown_properties_round_trip() {
        let mut original = event();
        let mut property = UnknownProperty::new("X-MEETING-ROOM", "42");
        property.parameters.push(("X-FLOOR".to_string(), "3".to_string()));
        original.unknown_properties = vec![property];
        original.classification = Some(Classification::CONFIDENTIAL);

        let decoded = round_trip(&original);

        assert_eq!(decoded.unknown_properties, original.unknown_properties);
        assert_eq!(decoded.classification, Some(Classification::CONFIDENTIAL));
    }

    #[test_log::test]
    fn organizer_requires_attendees() {
        let mut original = event();
        original.organizer = Some(Organizer::new("mailto:boss@example.com"));

        let encoded = codec().encode(&original).unwrap();
        assert_eq!(encoded.values.get(keys::ORGANIZER), Some(&ColumnValue::Null));
        assert_eq!(round_trip(&original).organizer, None);

        original.attendees.push(Attendee::new("mailto:dev@example.com"));
        let decoded = round_trip(&original);
        assert_eq!(
            decoded.organizer.and_then(|organizer| organizer.email_address()).as_deref(),
            Some("boss@example.com")
        );
    }

    #[test_log::test]
    fn attendee_rows() {
        let mut original = event();
        original.organizer = Some(Organizer::new("mailto:boss@example.com"));

        let mut boss = Attendee::new("MAILTO:Boss@example.com");
        boss.role = Some(Role::Chair);
        boss.participation_status = Some(ParticipationStatus::Accepted);

        let mut room = Attendee::new("urn:uuid:room-1");
        room.email = Some("room1@example.com".to_string());
        room.common_name = Some("Room 1".to_string());
        room.user_type = Some(CalendarUserType::Room);

        let mut guest = Attendee::new("mailto:guest@example.com");
        guest.role = Some(Role::OptParticipant);

        original.attendees = vec![boss, room, guest];

        let encoded = codec().encode(&original).unwrap();
        let [boss_row, room_row, guest_row] = encoded.attendees.as_slice() else {
            panic!("expected three attendee rows");
        };

        assert_eq!(
            row::integer(boss_row, keys::ATTENDEE_RELATIONSHIP),
            Some(AttendeeRelationship::Organizer.code())
        );
        assert_eq!(
            row::integer(boss_row, keys::ATTENDEE_STATUS),
            Some(AttendeeStatus::Accepted.code())
        );
        assert_eq!(row::text(room_row, keys::ATTENDEE_IDENTITY), Some("urn:uuid:room-1"));
        assert_eq!(row::text(room_row, keys::ATTENDEE_EMAIL), Some("room1@example.com"));
        assert_eq!(
            row::integer(room_row, keys::ATTENDEE_TYPE),
            Some(AttendeeType::Resource.code())
        );
        assert_eq!(
            row::integer(guest_row, keys::ATTENDEE_TYPE),
            Some(AttendeeType::Optional.code())
        );
        assert_eq!(
            row::integer(guest_row, keys::ATTENDEE_STATUS),
            Some(AttendeeStatus::Invited.code())
        );

        let decoded = codec().decode(&encoded.into()).unwrap();
        assert_eq!(decoded.attendees.len(), 3);
        assert_eq!(decoded.attendees[1].uri, "urn:uuid:room-1");
        assert_eq!(decoded.attendees[1].email.as_deref(), Some("room1@example.com"));
        assert_eq!(decoded.attendees[1].user_type, Some(CalendarUserType::Resource));
        assert_eq!(
            decoded.attendees[2].participation_status,
            Some(ParticipationStatus::NeedsAction)
        );
    }

    #[test_log::test]
    fn alarms_after_start_are_clamped() {
        let mut original = event();
        original.alarms = vec![
            Alarm::new(15, AlarmAction::Display),
            Alarm::new(-10, AlarmAction::Email),
            Alarm::new(60, AlarmAction::Audio),
        ];

        let encoded = codec().encode(&original).unwrap();
        assert_eq!(encoded.values.get(keys::HAS_ALARM), Some(&ColumnValue::Boolean(true)));

        let decoded = codec().decode(&encoded.into()).unwrap();
        assert_eq!(
            decoded.alarms,
            vec![
                Alarm::new(15, AlarmAction::Display),
                Alarm::new(0, AlarmAction::Email),
                Alarm::new(60, AlarmAction::Audio),
            ]
        );
    }

    #[test_log::test]
    fn decode_requires_time_columns() {
        let err = codec().decode(&EventRows::default()).unwrap_err();
        assert!(matches!(err, crate::error::DbError::InvalidTimeModel(_)));
    }

    #[test_log::test]
    fn foreign_extended_properties_are_skipped() {
        let mut rows: EventRows = codec().encode(&event()).unwrap().into();
        rows.extended_properties
            .push(side_record::extended_property("vendor.sync-state", "dirty"));

        let decoded = codec().decode(&rows).unwrap();
        assert!(decoded.unknown_properties.is_empty());
    }
}
