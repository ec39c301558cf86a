//! Semantic event <-> storage row mapping.

pub mod classification;
pub mod event;
pub mod organizer;
pub mod recurrence;
pub mod side_record;
pub mod time;

pub use event::{EncodedEvent, EventCodec, EventRows, OWNED_EXTENDED_PROPERTIES};
pub use time::{RowEncoding, TimeCodec};
