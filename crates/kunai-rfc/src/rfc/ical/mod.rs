//! iCalendar (RFC 5545) event model.

pub mod core;
pub mod expand;
pub mod parse;
