#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Time model scenarios written through the batcher and read back from the store.

use kunai_test::component::constants::TIMEZONE_UTC;
use kunai_test::component::db::row::{ColumnValue, integer, text};
use kunai_test::rfc::rfc::ical::core::Duration;

use super::helpers::*;

/// ## Summary
/// A zoned start without end or duration is stored as a zero-length event.
#[test_log::test]
fn zoned_start_without_end_is_zero_length() {
    let mut test = TestStore::new();
    let event = event_at(vienna(2020, 6, 1, 12, 30, 0));

    let id = test.add(&event);
    let row = test.row(id);

    let start = vienna_millis(2020, 6, 1, 12, 30);
    assert_eq!(integer(&row, keys::DTSTART), Some(start));
    assert_eq!(integer(&row, keys::DTEND), Some(start));
    assert_eq!(text(&row, keys::EVENT_TIMEZONE), Some("Europe/Vienna"));
    assert_eq!(text(&row, keys::EVENT_END_TIMEZONE), Some("Europe/Vienna"));
    assert_eq!(row.get(keys::DURATION), Some(&ColumnValue::Null));

    let loaded = test.load(id);
    assert_eq!(loaded.times.start, event.times.start);
    assert_eq!(loaded.times.end, event.times.start);
}

/// ## Summary
/// A duration on a single event becomes an absolute end in the start's zone.
#[test_log::test]
fn duration_on_single_event_becomes_end() {
    let mut test = TestStore::new();
    let mut event = event_at(vienna(2020, 6, 1, 12, 30, 0));
    event.times.duration = Some("PT1H30M".parse().unwrap());

    let id = test.add(&event);
    let row = test.row(id);

    assert_eq!(integer(&row, keys::DTEND), Some(vienna_millis(2020, 6, 1, 14, 0)));
    assert_eq!(text(&row, keys::EVENT_END_TIMEZONE), Some("Europe/Vienna"));
    assert_eq!(row.get(keys::DURATION), Some(&ColumnValue::Null));

    let loaded = test.load(id);
    assert_eq!(loaded.times.end, Some(vienna(2020, 6, 1, 14, 0, 0)));
    assert_eq!(loaded.times.duration, None);
}

/// ## Summary
/// An all-day recurring event stores its span as whole days and its
/// recurrence dates as UTC midnights, starting with the event start.
#[test_log::test]
fn all_day_recurring_event_uses_day_duration() {
    let mut test = TestStore::new();
    let mut event = event_at(date(2020, 6, 1));
    event.times.end = Some(date(2020, 7, 1));
    event.times.recurrence_dates = vec![
        DateList::new(vec![date(2021, 6, 1)]),
        DateList::new(vec![vienna(2022, 6, 1, 12, 0, 30)]),
    ];

    let id = test.add(&event);
    let row = test.row(id);

    assert_eq!(row.get(keys::ALL_DAY), Some(&ColumnValue::Boolean(true)));
    assert_eq!(text(&row, keys::EVENT_TIMEZONE), Some(TIMEZONE_UTC));
    assert_eq!(text(&row, keys::DURATION), Some("P30D"));
    assert_eq!(row.get(keys::DTEND), Some(&ColumnValue::Null));
    assert_eq!(row.get(keys::EVENT_END_TIMEZONE), Some(&ColumnValue::Null));
    assert_eq!(
        text(&row, keys::RDATE),
        Some("20200601T000000Z,20210601T000000Z,20220601T000000Z")
    );

    let loaded = test.load(id);
    assert_eq!(loaded.times.start, Some(date(2020, 6, 1)));
    assert_eq!(loaded.times.end, None);
    assert_eq!(loaded.times.duration, Some("P30D".parse::<Duration>().unwrap()));
    assert!(loaded.times.is_recurring());
}

/// ## Summary
/// A one-day nominal duration across the spring DST change ends at the same
/// wall-clock time, 23 hours later.
#[test_log::test]
fn nominal_day_across_dst_keeps_wall_clock() {
    let mut test = TestStore::new();
    let mut event = event_at(vienna(2020, 3, 28, 10, 0, 0));
    event.times.duration = Some("P1D".parse().unwrap());

    let id = test.add(&event);
    let row = test.row(id);

    let start = integer(&row, keys::DTSTART).unwrap();
    let end = integer(&row, keys::DTEND).unwrap();
    assert_eq!(end, vienna_millis(2020, 3, 29, 10, 0));
    assert_eq!(end - start, 23 * 3600 * 1000);
}

/// ## Summary
/// A floating start is interpreted in the codec's default zone.
#[test_log::test]
fn floating_start_is_stored_in_default_zone() {
    let mut test = TestStore::new();
    let event = event_at(DateTime::floating(2020, 6, 1, 9, 0, 0).into());

    let id = test.add(&event);
    let row = test.row(id);

    assert_eq!(text(&row, keys::EVENT_TIMEZONE), Some("Europe/Vienna"));
    assert_eq!(integer(&row, keys::DTSTART), Some(vienna_millis(2020, 6, 1, 9, 0)));
}

/// ## Summary
/// Rules and exception dates survive a store round trip in order.
#[test_log::test]
fn recurrence_rules_and_exceptions_round_trip() {
    let mut test = TestStore::new();
    let mut event = event_at(vienna(2020, 6, 1, 9, 0, 0));
    event.times.duration = Some("PT30M".parse().unwrap());
    event.times.recurrence_rules = vec!["FREQ=WEEKLY;BYDAY=MO".to_string(), "FREQ=MONTHLY".to_string()];
    event.times.exception_dates = vec![DateList::new(vec![vienna(2020, 6, 8, 9, 0, 0)])];

    let id = test.add(&event);
    let row = test.row(id);

    assert_eq!(text(&row, keys::RRULE), Some("FREQ=WEEKLY;BYDAY=MO\nFREQ=MONTHLY"));
    assert_eq!(text(&row, keys::DURATION), Some("PT30M"));
    assert_eq!(row.get(keys::DTEND), Some(&ColumnValue::Null));

    let loaded = test.load(id);
    assert_eq!(loaded.times.recurrence_rules, event.times.recurrence_rules);
    assert_eq!(loaded.times.exception_dates, event.times.exception_dates);
    assert_eq!(loaded.times.end, None);
}

/// ## Summary
/// An event without a start is rejected before anything is enqueued.
#[test_log::test]
fn missing_start_is_rejected() {
    let event = Event {
        title: Some("No start".to_string()),
        ..Event::default()
    };

    let err = codec().encode(&event).unwrap_err();
    assert!(matches!(err, DbError::InvalidTimeModel(_)));
}
