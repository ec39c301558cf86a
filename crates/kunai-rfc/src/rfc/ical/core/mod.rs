//! iCalendar core models (RFC 5545).
//!
//! These types describe an event the way calendar clients exchange it:
//! date-times keep their floating/UTC/zoned form, durations keep their
//! nominal/exact components and unknown values are kept for round-tripping.

mod alarm;
mod classification;
mod datetime;
mod duration;
mod event;
mod participant;
mod time;

pub use alarm::{Alarm, AlarmAction};
pub use classification::{Classification, ClassificationKind};
pub use datetime::{Date, DateTime, DateTimeForm};
pub use duration::{Duration, DurationBuilder};
pub use event::{Event, EventStatus, EventTimes, Transparency, UnknownProperty};
pub use participant::{
    Attendee, CalendarUserType, Organizer, ParticipationStatus, Role, mailto, resolve_email,
};
pub use time::{DateList, EventTime};
