//! Parsers for the textual value forms stored in event rows.

mod values;

pub use values::{parse_date, parse_datetime, parse_duration, parse_event_time};
