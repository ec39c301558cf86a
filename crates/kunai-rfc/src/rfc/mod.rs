//! RFC data models.

pub mod ical;
