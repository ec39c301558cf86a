//! Value parsing for DATE, DATE-TIME and DURATION text (RFC 5545 §3.3).

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::{Date, DateTime, DateTimeForm, Duration, EventTime};

/// ## Summary
/// Parses a DATE value (`yyyyMMdd`).
///
/// ## Errors
/// Returns `RfcError::ParseError` if the text is not eight ASCII digits.
pub fn parse_date(s: &str) -> RfcResult<Date> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RfcError::ParseError(format!("invalid DATE: {s:?}")));
    }

    let year = parse_number(&s[0..4], s)?;
    let month = parse_number(&s[4..6], s)?;
    let day = parse_number(&s[6..8], s)?;
    let date = Date::new(year, month, day);

    // Reject dates like 20210230
    date.naive()?;
    Ok(date)
}

/// ## Summary
/// Parses a DATE-TIME value (`yyyyMMdd'T'HHmmss`, optionally suffixed with `Z`).
///
/// A trailing `Z` yields a UTC value; otherwise `tzid` decides between a
/// zoned and a floating value.
///
/// ## Errors
/// Returns `RfcError::ParseError` if the text is malformed.
pub fn parse_datetime(s: &str, tzid: Option<&str>) -> RfcResult<DateTime> {
    let (body, utc) = match s.strip_suffix('Z') {
        Some(body) => (body, true),
        None => (s, false),
    };

    let Some((date_part, time_part)) = body.split_once('T') else {
        return Err(RfcError::ParseError(format!("invalid DATE-TIME: {s:?}")));
    };
    if time_part.len() != 6 || !time_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RfcError::ParseError(format!("invalid DATE-TIME: {s:?}")));
    }

    let date = parse_date(date_part)?;
    let form = match (utc, tzid) {
        (true, _) => DateTimeForm::Utc,
        (false, Some(tzid)) => DateTimeForm::Zoned {
            tzid: tzid.to_string(),
        },
        (false, None) => DateTimeForm::Floating,
    };

    let dt = DateTime {
        year: date.year,
        month: date.month,
        day: date.day,
        hour: parse_number(&time_part[0..2], s)?,
        minute: parse_number(&time_part[2..4], s)?,
        second: parse_number(&time_part[4..6], s)?,
        form,
    };

    dt.naive()?;
    Ok(dt)
}

/// ## Summary
/// Parses either a DATE or a DATE-TIME value.
///
/// ## Errors
/// Returns `RfcError::ParseError` if the text is neither.
pub fn parse_event_time(s: &str, tzid: Option<&str>) -> RfcResult<EventTime> {
    if s.contains('T') {
        parse_datetime(s, tzid).map(EventTime::DateTime)
    } else {
        parse_date(s).map(EventTime::Date)
    }
}

/// ## Summary
/// Parses a DURATION value (RFC 5545 §3.3.6), e.g. `P1D`, `PT1H30M`, `-P2W`.
///
/// ## Errors
/// Returns `RfcError::ParseError` if the text does not follow the duration grammar.
pub fn parse_duration(s: &str) -> RfcResult<Duration> {
    let invalid = || RfcError::ParseError(format!("invalid DURATION: {s:?}"));

    let mut builder = Duration::builder();
    let mut rest = s;

    // Parse optional sign
    if let Some(stripped) = rest.strip_prefix('-') {
        builder = builder.negative();
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    } else {
        // No sign present, duration is positive
    }

    // Must start with 'P'
    rest = rest.strip_prefix('P').ok_or_else(invalid)?;
    if rest.is_empty() {
        return Err(invalid());
    }

    // Week format
    if let Some(weeks) = rest.strip_suffix('W') {
        return Ok(builder.weeks(weeks.parse().map_err(|_e| invalid())?).build());
    }

    let mut in_time = false;
    let mut saw_component = false;
    let mut saw_time_component = false;
    let mut number = String::new();

    for c in rest.chars() {
        if c.is_ascii_digit() {
            number.push(c);
            continue;
        }

        if c == 'T' {
            if in_time || !number.is_empty() {
                return Err(invalid());
            }
            in_time = true;
            continue;
        }

        let value: u32 = number.parse().map_err(|_e| invalid())?;
        number.clear();
        saw_component = true;
        saw_time_component |= in_time;

        builder = match c {
            'D' if !in_time => builder.days(value),
            'H' if in_time => builder.hours(value),
            'M' if in_time => builder.minutes(value),
            'S' if in_time => builder.seconds(value),
            _ => return Err(invalid()),
        };
    }

    if !number.is_empty() || !saw_component || (in_time && !saw_time_component) {
        return Err(invalid());
    }

    Ok(builder.build())
}

fn parse_number<T: std::str::FromStr>(digits: &str, whole: &str) -> RfcResult<T> {
    digits
        .parse()
        .map_err(|_e| RfcError::ParseError(format!("invalid number in {whole:?}")))
}
