//! Semantic iCalendar values (RFC 5545) used by the kunai row codec.
//!
//! The types here describe an event the way a calendar client sees it:
//! zoned, floating and date-only instants, durations, recurrence sets and
//! participants. Storage concerns live in `kunai-db`.

pub mod error;
pub mod rfc;
