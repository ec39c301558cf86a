//! Zone-tagged recurrence date lists: `"<zoneId>;<ts1>,<ts2>,…"`.
//!
//! UTC lists omit the zone prefix and suffix every timestamp with `Z`.

use chrono::{DateTime as ChronoDateTime, Utc};
use chrono_tz::Tz;

use kunai_core::constants::{RECURRENCE_LIST_TZID_SEPARATOR, RECURRENCE_LIST_VALUE_SEPARATOR};
use kunai_rfc::error::RfcResult;
use kunai_rfc::rfc::ical::core::{DateTime, DateTimeForm, EventTime};
use kunai_rfc::rfc::ical::expand::convert_from_utc;
use kunai_rfc::rfc::ical::parse::parse_event_time;

/// ## Summary
/// Formats instants as a stored date list.
///
/// With `zone` set, timestamps are wall-clock times in that zone behind a
/// `"<zone_id>;"` prefix. Without it they are UTC timestamps.
///
/// ## Errors
/// Returns an error if an instant lies outside the representable years.
pub fn format_list(
    instants: &[ChronoDateTime<Utc>],
    zone: Option<(Tz, &str)>,
) -> RfcResult<Option<String>> {
    if instants.is_empty() {
        return Ok(None);
    }

    let stamps = instants
        .iter()
        .map(|instant| -> RfcResult<String> {
            let stamp = match zone {
                Some((tz, zone_id)) => DateTime::from_naive(
                    convert_from_utc(*instant, tz),
                    DateTimeForm::Zoned {
                        tzid: zone_id.to_string(),
                    },
                )?,
                None => DateTime::from_naive(instant.naive_utc(), DateTimeForm::Utc)?,
            };
            Ok(stamp.to_string())
        })
        .collect::<RfcResult<Vec<_>>>()?;

    let values = stamps.join(&RECURRENCE_LIST_VALUE_SEPARATOR.to_string());
    Ok(Some(match zone {
        Some((_, zone_id)) => format!("{zone_id}{RECURRENCE_LIST_TZID_SEPARATOR}{values}"),
        None => values,
    }))
}

/// ## Summary
/// Parses a stored date list back into event times.
///
/// Entries of a zone-prefixed list are zoned, `Z`-suffixed entries are UTC,
/// `yyyyMMdd` entries are dates.
///
/// ## Errors
/// Returns `RfcError::ParseError` if any entry is malformed.
pub fn parse_list(text: &str) -> RfcResult<Vec<EventTime>> {
    let (tzid, values) = match text.split_once(RECURRENCE_LIST_TZID_SEPARATOR) {
        Some((tzid, values)) => (Some(tzid.trim()), values),
        None => (None, text),
    };

    values
        .split(RECURRENCE_LIST_VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|stamp| !stamp.is_empty())
        .map(|stamp| parse_event_time(stamp, tzid))
        .collect()
}
