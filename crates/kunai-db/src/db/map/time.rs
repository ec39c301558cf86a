//! Event time model <-> flat row columns.
//!
//! The row permits a single end encoding: an absolute end instant for
//! single events, or a duration text for recurring ones. Start and every
//! recurrence list share one zone identifier.

use chrono::{DateTime as ChronoDateTime, Days, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;

use kunai_core::config::CodecConfig;
use kunai_core::constants::{RECURRENCE_RULE_SEPARATOR, TIMEZONE_UTC};
use kunai_rfc::rfc::ical::core::{
    Date, DateList, DateTime, DateTimeForm, Duration, EventTime, EventTimes,
};
use kunai_rfc::rfc::ical::expand::{
    TimeZoneResolver, convert_from_utc, convert_to_utc_lenient, default_timezone,
};

use super::recurrence;
use crate::db::keys;
use crate::db::row::{self, ColumnValue, Row};
use crate::error::{DbError, DbResult};

/// Time columns of an event row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowEncoding {
    pub all_day: bool,
    /// Start instant in epoch milliseconds.
    pub dt_start: i64,
    pub start_timezone_id: String,
    /// End instant in epoch milliseconds. Never set together with `duration_text`.
    pub dt_end: Option<i64>,
    pub end_timezone_id: Option<String>,
    pub duration_text: Option<String>,
    pub rrule_text: Option<String>,
    pub rdate_text: Option<String>,
    pub exdate_text: Option<String>,
}

impl RowEncoding {
    /// Writes every time column, absent values as `Null`.
    pub fn write_to(&self, row: &mut Row) {
        let columns: [(&str, ColumnValue); 9] = [
            (keys::ALL_DAY, self.all_day.into()),
            (keys::DTSTART, self.dt_start.into()),
            (keys::EVENT_TIMEZONE, self.start_timezone_id.clone().into()),
            (keys::DTEND, self.dt_end.into()),
            (keys::EVENT_END_TIMEZONE, self.end_timezone_id.clone().into()),
            (keys::DURATION, self.duration_text.clone().into()),
            (keys::RRULE, self.rrule_text.clone().into()),
            (keys::RDATE, self.rdate_text.clone().into()),
            (keys::EXDATE, self.exdate_text.clone().into()),
        ];
        for (column, value) in columns {
            row.insert(column.to_string(), value);
        }
    }

    /// ## Summary
    /// Reads the time columns of an event row.
    ///
    /// ## Errors
    /// Returns `DbError::InvalidTimeModel` if `all_day` or `dtstart` is missing.
    pub fn read_from(row: &Row) -> DbResult<Self> {
        let all_day = row
            .get(keys::ALL_DAY)
            .and_then(ColumnValue::as_bool)
            .ok_or_else(|| DbError::InvalidTimeModel("row has no all_day flag".to_string()))?;
        let dt_start = row::integer(row, keys::DTSTART)
            .ok_or_else(|| DbError::InvalidTimeModel("row has no start".to_string()))?;

        let start_timezone_id = row::text(row, keys::EVENT_TIMEZONE).map_or_else(
            || {
                if !all_day {
                    tracing::warn!("Timed row has no timezone, reading it as UTC");
                }
                TIMEZONE_UTC.to_string()
            },
            str::to_string,
        );
        let text = |column| row::text(row, column).map(str::to_string);

        Ok(Self {
            all_day,
            dt_start,
            start_timezone_id,
            dt_end: row::integer(row, keys::DTEND),
            end_timezone_id: text(keys::EVENT_END_TIMEZONE),
            duration_text: text(keys::DURATION),
            rrule_text: text(keys::RRULE),
            rdate_text: text(keys::RDATE),
            exdate_text: text(keys::EXDATE),
        })
    }

    fn set_end(&mut self, end: ChronoDateTime<Utc>, frame: &Frame) {
        self.dt_end = Some(end.timestamp_millis());
        self.end_timezone_id = Some(frame.zone_id.clone());
    }
}

/// Resolved zone and start of the event being encoded.
#[derive(Debug)]
struct Frame {
    all_day: bool,
    zone: Tz,
    zone_id: String,
    start: ChronoDateTime<Utc>,
    /// Local time of day of the start, used to place date-only list entries.
    start_time: NaiveTime,
}

impl Frame {
    /// Whether stored list entries are UTC timestamps rather than zoned wall times.
    fn utc_lists(&self) -> bool {
        self.all_day || self.zone == Tz::UTC
    }
}

/// Supplied end of an event after checking it against the start.
#[derive(Debug)]
enum EndCheck {
    /// No end, an end that was dropped on its own, or a valid end instant.
    Usable(Option<ChronoDateTime<Utc>>),
    /// The end precedes the start; the event keeps neither end nor duration.
    BeforeStart,
}

/// Encodes and decodes the time columns of event rows.
#[derive(Debug)]
pub struct TimeCodec {
    resolver: TimeZoneResolver,
    default_zone: Tz,
}

impl TimeCodec {
    /// Creates a codec whose floating times use the configured or host zone.
    #[must_use]
    pub fn new(config: &CodecConfig) -> Self {
        let mut resolver = TimeZoneResolver::new();
        let default_zone = default_timezone(config.default_timezone.as_deref(), &mut resolver);
        tracing::debug!(default_zone = default_zone.name(), "Time codec ready");
        Self {
            resolver,
            default_zone,
        }
    }

    #[must_use]
    pub fn with_default_zone(default_zone: Tz) -> Self {
        Self {
            resolver: TimeZoneResolver::new(),
            default_zone,
        }
    }

    fn resolve_or_default(&mut self, tzid: &str) -> Tz {
        self.resolver.resolve(tzid).unwrap_or_else(|e| {
            tracing::warn!(tzid, error = %e, "Unknown timezone, using default zone");
            self.default_zone
        })
    }

    fn frame(&mut self, start: &EventTime) -> DbResult<Frame> {
        match start {
            EventTime::Date(date) => Ok(Frame {
                all_day: true,
                zone: Tz::UTC,
                zone_id: TIMEZONE_UTC.to_string(),
                start: utc_midnight(*date)?,
                start_time: NaiveTime::MIN,
            }),
            EventTime::DateTime(dt) => {
                let zone = match &dt.form {
                    DateTimeForm::Utc => Tz::UTC,
                    DateTimeForm::Floating => self.default_zone,
                    DateTimeForm::Zoned { tzid } => self.resolve_or_default(tzid),
                };
                let naive = dt.naive()?;
                Ok(Frame {
                    all_day: false,
                    zone,
                    zone_id: zone.name().to_string(),
                    start: convert_to_utc_lenient(naive, zone)?,
                    start_time: naive.time(),
                })
            }
        }
    }

    /// Projects any event time onto the timeline of the event.
    ///
    /// All-day events cut entries to their date. Dates in timed events take
    /// the start's time of day; floating entries take the event's zone.
    fn project(&mut self, time: &EventTime, frame: &Frame) -> DbResult<ChronoDateTime<Utc>> {
        if frame.all_day {
            return utc_midnight(time.date());
        }

        let (naive, zone) = match time {
            EventTime::Date(date) => (date.naive()?.and_time(frame.start_time), frame.zone),
            EventTime::DateTime(dt) => {
                let zone = match &dt.form {
                    DateTimeForm::Utc => Tz::UTC,
                    DateTimeForm::Floating => frame.zone,
                    DateTimeForm::Zoned { tzid } => self.resolve_or_default(tzid),
                };
                (dt.naive()?, zone)
            }
        };
        Ok(convert_to_utc_lenient(naive, zone)?)
    }

    /// Places the supplied end on the timeline of the event.
    fn check_end(&mut self, end: Option<&EventTime>, frame: &Frame) -> DbResult<EndCheck> {
        let Some(end) = end else {
            return Ok(EndCheck::Usable(None));
        };

        let instant = self.project(end, frame)?;
        if instant < frame.start {
            tracing::warn!(
                %instant,
                start = %frame.start,
                "End before start, ignoring end and duration"
            );
            return Ok(EndCheck::BeforeStart);
        }
        if frame.all_day && (instant - frame.start).num_days() < 1 {
            tracing::debug!("All-day end shorter than a day, dropping end");
            return Ok(EndCheck::Usable(None));
        }
        Ok(EndCheck::Usable(Some(instant)))
    }

    fn project_lists(&mut self, lists: &[DateList], frame: &Frame) -> DbResult<Vec<ChronoDateTime<Utc>>> {
        let mut instants = Vec::new();
        for value in lists.iter().flat_map(|list| &list.values) {
            instants.push(self.project(value, frame)?);
        }
        Ok(instants)
    }

    fn format_lists(instants: &[ChronoDateTime<Utc>], frame: &Frame) -> DbResult<Option<String>> {
        let zone = (!frame.utc_lists()).then_some((frame.zone, frame.zone_id.as_str()));
        Ok(recurrence::format_list(instants, zone)?)
    }

    /// ## Summary
    /// Encodes the time model of an event into row columns.
    ///
    /// ## Errors
    /// - `DbError::InvalidTimeModel` if the event has no start.
    /// - `DbError::RfcError` / `DbError::ConversionError` if a time cannot be placed on the timeline.
    #[tracing::instrument(skip_all, fields(recurring = times.is_recurring()))]
    pub fn encode(&mut self, times: &EventTimes) -> DbResult<RowEncoding> {
        let start = times
            .start
            .as_ref()
            .ok_or_else(|| DbError::InvalidTimeModel("event has no start".to_string()))?;
        let frame = self.frame(start)?;
        let recurring = times.is_recurring();

        let (end, duration) = match self.check_end(times.end.as_ref(), &frame)? {
            EndCheck::Usable(end) => (end, valid_duration(times.duration, frame.all_day)),
            EndCheck::BeforeStart => (None, None),
        };

        let mut encoding = RowEncoding {
            all_day: frame.all_day,
            dt_start: frame.start.timestamp_millis(),
            start_timezone_id: frame.zone_id.clone(),
            ..RowEncoding::default()
        };

        match (end, duration, recurring, frame.all_day) {
            // Single events store an absolute end; end wins over duration
            (Some(end), _, false, _) => encoding.set_end(end, &frame),
            (None, Some(duration), false, true) => {
                encoding.set_end(add_days(frame.start, duration.nominal_days())?, &frame);
            }
            (None, Some(duration), false, false) => {
                encoding.set_end(add_duration(frame.start, duration, frame.zone)?, &frame);
            }
            (None, None, false, true) => encoding.set_end(add_days(frame.start, 1)?, &frame),
            (None, None, false, false) => encoding.set_end(frame.start, &frame),

            // Recurring events store a duration; a supplied end becomes the span
            (Some(end), _, true, true) => {
                encoding.duration_text = Some(whole_days((end - frame.start).num_days()).to_string());
            }
            (Some(end), _, true, false) => {
                let span = Duration::from_exact_seconds((end - frame.start).num_seconds());
                encoding.duration_text = Some(span.to_string());
            }
            (None, Some(duration), true, _) => encoding.duration_text = Some(duration.to_string()),
            // Also reached by all-day durations under a day, which collapse to
            // absent; the shortest stored all-day span is one day
            (None, None, true, true) => encoding.duration_text = Some(Duration::days(1).to_string()),
            (None, None, true, false) => encoding.duration_text = Some(Duration::zero().to_string()),
        }

        if !times.recurrence_rules.is_empty() {
            encoding.rrule_text = Some(
                times
                    .recurrence_rules
                    .join(&RECURRENCE_RULE_SEPARATOR.to_string()),
            );
        }

        let mut rdates = self.project_lists(&times.recurrence_dates, &frame)?;
        // Storage drops the start instance once RDATEs exist
        if !rdates.is_empty() && !rdates.contains(&frame.start) {
            rdates.insert(0, frame.start);
        }
        encoding.rdate_text = Self::format_lists(&rdates, &frame)?;

        let exdates = self.project_lists(&times.exception_dates, &frame)?;
        encoding.exdate_text = Self::format_lists(&exdates, &frame)?;

        tracing::trace!(?encoding, "Encoded event times");
        Ok(encoding)
    }

    /// Returns the event time of `instant` as stored with `tzid`.
    fn stored_time(&mut self, instant: ChronoDateTime<Utc>, tzid: &str) -> DbResult<DateTime> {
        if tzid != TIMEZONE_UTC {
            match self.resolver.resolve(tzid) {
                Ok(tz) => {
                    return Ok(DateTime::from_naive(
                        convert_from_utc(instant, tz),
                        DateTimeForm::Zoned {
                            tzid: tzid.to_string(),
                        },
                    )?);
                }
                Err(e) => tracing::warn!(tzid, error = %e, "Unknown stored timezone, reading as UTC"),
            }
        }
        Ok(DateTime::from_naive(instant.naive_utc(), DateTimeForm::Utc)?)
    }

    fn decode_list(text: Option<&str>, all_day: bool, start: Option<&EventTime>) -> Vec<DateList> {
        let Some(text) = text else {
            return Vec::new();
        };

        let mut values = match recurrence::parse_list(text) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(text, error = %e, "Ignoring malformed date list");
                return Vec::new();
            }
        };
        if all_day {
            values = values
                .into_iter()
                .map(|value| EventTime::Date(value.date()))
                .collect();
        }
        if let Some(position) = start.and_then(|start| values.iter().position(|value| value == start)) {
            values.remove(position);
        }

        if values.is_empty() {
            Vec::new()
        } else {
            vec![DateList::new(values)]
        }
    }

    /// ## Summary
    /// Decodes the time columns of an event row.
    ///
    /// ## Errors
    /// Returns `DbError::InvalidTimeModel` if a stored instant is out of range.
    #[tracing::instrument(skip_all, fields(all_day = encoding.all_day))]
    pub fn decode(&mut self, encoding: &RowEncoding) -> DbResult<EventTimes> {
        let start_instant = from_millis(encoding.dt_start)?;
        let start = if encoding.all_day {
            EventTime::Date(Date::from_naive(start_instant.date_naive())?)
        } else {
            EventTime::DateTime(self.stored_time(start_instant, &encoding.start_timezone_id)?)
        };

        let mut times = EventTimes::starting_at(start.clone());

        if let Some(dt_end) = encoding.dt_end {
            let end_instant = from_millis(dt_end)?;
            times.end = Some(if encoding.all_day {
                EventTime::Date(Date::from_naive(end_instant.date_naive())?)
            } else {
                let tzid = encoding
                    .end_timezone_id
                    .as_deref()
                    .unwrap_or(&encoding.start_timezone_id);
                EventTime::DateTime(self.stored_time(end_instant, tzid)?)
            });
        } else if let Some(text) = &encoding.duration_text {
            match text.parse::<Duration>() {
                Ok(duration) => times.duration = Some(duration),
                Err(e) => tracing::warn!(text, error = %e, "Ignoring malformed duration"),
            }
        } else {
            // Neither stored: a single instant
        }

        if let Some(rules) = &encoding.rrule_text {
            times.recurrence_rules = rules
                .split(RECURRENCE_RULE_SEPARATOR)
                .map(str::trim)
                .filter(|rule| !rule.is_empty())
                .map(str::to_string)
                .collect();
        }

        times.recurrence_dates =
            Self::decode_list(encoding.rdate_text.as_deref(), encoding.all_day, Some(&start));
        times.exception_dates =
            Self::decode_list(encoding.exdate_text.as_deref(), encoding.all_day, None);

        Ok(times)
    }
}

/// Drops negative durations and reduces all-day durations to whole days,
/// dropping them when shorter than a day.
fn valid_duration(duration: Option<Duration>, all_day: bool) -> Option<Duration> {
    let duration = duration?;
    if duration.negative && !duration.is_zero() {
        tracing::warn!(%duration, "Negative duration, dropping duration");
        return None;
    }
    if !all_day {
        return Some(duration);
    }

    let days = duration.whole_days();
    if days < 1 {
        tracing::debug!(%duration, "All-day duration shorter than a day, dropping duration");
        return None;
    }
    Some(whole_days(days))
}

fn whole_days(days: i64) -> Duration {
    Duration::days(u32::try_from(days).unwrap_or(u32::MAX))
}

fn utc_midnight(date: Date) -> DbResult<ChronoDateTime<Utc>> {
    Ok(date.naive()?.and_time(NaiveTime::MIN).and_utc())
}

fn from_millis(millis: i64) -> DbResult<ChronoDateTime<Utc>> {
    ChronoDateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DbError::InvalidTimeModel(format!("instant out of range: {millis}")))
}

fn out_of_range(start: ChronoDateTime<Utc>) -> DbError {
    DbError::InvalidTimeModel(format!("end out of range for start {start}"))
}

fn add_days(start: ChronoDateTime<Utc>, days: i64) -> DbResult<ChronoDateTime<Utc>> {
    let days = u64::try_from(days).map_err(|_e| out_of_range(start))?;
    start
        .checked_add_days(Days::new(days))
        .ok_or_else(|| out_of_range(start))
}

/// Adds nominal days on the local calendar of `zone`, then exact time to the instant.
fn add_duration(start: ChronoDateTime<Utc>, duration: Duration, zone: Tz) -> DbResult<ChronoDateTime<Utc>> {
    let nominal_days = duration.nominal_days();
    let shifted = if nominal_days == 0 {
        start
    } else {
        let days = u64::try_from(nominal_days).map_err(|_e| out_of_range(start))?;
        let local = convert_from_utc(start, zone)
            .checked_add_days(Days::new(days))
            .ok_or_else(|| out_of_range(start))?;
        convert_to_utc_lenient(local, zone)?
    };

    shifted
        .checked_add_signed(TimeDelta::seconds(duration.exact_seconds()))
        .ok_or_else(|| out_of_range(start))
}
