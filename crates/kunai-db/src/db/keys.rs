//! Column keys of the event storage tables.

/// Foreign key column carried by every dependent row.
pub const EVENT_ID: &str = "event_id";

/// Event title.
pub const TITLE: &str = "title";
/// Event location.
pub const EVENT_LOCATION: &str = "event_location";
/// Event description.
pub const DESCRIPTION: &str = "description";
/// Status code, see `EventStatusCode`.
pub const STATUS: &str = "status";
/// Availability code, see `Availability`.
pub const AVAILABILITY: &str = "availability";
/// Access level code, see `AccessLevel`.
pub const ACCESS_LEVEL: &str = "access_level";
/// Organizer email address.
pub const ORGANIZER: &str = "organizer";
/// Whether any alarm rows exist.
pub const HAS_ALARM: &str = "has_alarm";
/// Whether any attendee rows exist.
pub const HAS_ATTENDEE_DATA: &str = "has_attendee_data";

/// All-day flag.
pub const ALL_DAY: &str = "all_day";
/// Start instant in epoch milliseconds.
pub const DTSTART: &str = "dtstart";
/// Zone of the start instant.
pub const EVENT_TIMEZONE: &str = "event_timezone";
/// End instant in epoch milliseconds.
pub const DTEND: &str = "dtend";
/// Zone of the end instant.
pub const EVENT_END_TIMEZONE: &str = "event_end_timezone";
/// ISO-8601 duration text.
pub const DURATION: &str = "duration";
/// Newline-joined recurrence rules.
pub const RRULE: &str = "rrule";
/// Zone-tagged recurrence date list.
pub const RDATE: &str = "rdate";
/// Zone-tagged exception date list.
pub const EXDATE: &str = "exdate";

/// Attendee email address.
pub const ATTENDEE_EMAIL: &str = "attendee_email";
/// Attendee URI when it is not an email address.
pub const ATTENDEE_IDENTITY: &str = "attendee_identity";
/// Attendee display name.
pub const ATTENDEE_NAME: &str = "attendee_name";
/// Attendee type code, see `AttendeeType`.
pub const ATTENDEE_TYPE: &str = "attendee_type";
/// Attendee relationship code, see `AttendeeRelationship`.
pub const ATTENDEE_RELATIONSHIP: &str = "attendee_relationship";
/// Attendee status code, see `AttendeeStatus`.
pub const ATTENDEE_STATUS: &str = "attendee_status";

/// Minutes before the start a reminder fires.
pub const MINUTES: &str = "minutes";
/// Reminder method code, see `ReminderMethod`.
pub const METHOD: &str = "method";

/// Extended property name.
pub const NAME: &str = "name";
/// Extended property value.
pub const VALUE: &str = "value";
