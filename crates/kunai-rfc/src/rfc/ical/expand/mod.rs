//! Timezone resolution and instant conversion for event times.

mod timezone;

pub use timezone::{
    ConversionError, TimeZoneResolver, convert_from_utc, convert_to_utc, convert_to_utc_lenient,
    default_timezone,
};
