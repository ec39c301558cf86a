#![allow(clippy::unwrap_used)]
//! Import and encode paths of the command line application.

use kunai_test::app::import::{encode_events, import_events};

use super::helpers::*;

const EVENTS: &str = r#"[
    {
        "title": "Planning",
        "start": { "date_time": { "year": 2020, "month": 6, "day": 1, "hour": 9, "minute": 0, "second": 0, "form": "floating" } },
        "end": { "date_time": { "year": 2020, "month": 6, "day": 1, "hour": 10, "minute": 0, "second": 0, "form": "floating" } },
        "classification": "X-TEAM-ONLY",
        "attendees": [{ "uri": "mailto:dev@example.com" }],
        "organizer": { "uri": "mailto:lead@example.com" }
    },
    {
        "title": "Offsite",
        "start": { "date": { "year": 2020, "month": 9, "day": 14 } },
        "duration": "P2D"
    }
]"#;

/// ## Summary
/// Imported events are written in one unit of work and decode back.
#[test_log::test]
fn import_writes_and_reads_back() {
    let events: Vec<Event> = serde_json::from_str(EVENTS).unwrap();
    let mut store = MemoryStore::new();
    let mut codec = codec();

    let report = import_events(&mut store, &mut codec, BatchLimits::default(), &events).unwrap();

    // Two events, one attendee, one classification side record
    assert_eq!(report.affected_rows, 4);
    assert_eq!(report.events.len(), 2);

    let planning = &report.events[0];
    assert_eq!(planning.times.start, Some(vienna(2020, 6, 1, 9, 0, 0)));
    assert_eq!(planning.times.end, Some(vienna(2020, 6, 1, 10, 0, 0)));
    assert_eq!(planning.classification, Some(Classification::parse("X-TEAM-ONLY")));
    assert_eq!(planning.organizer, Some(Organizer::new("mailto:lead@example.com")));

    let offsite = &report.events[1];
    assert_eq!(offsite.times.start, Some(date(2020, 9, 14)));
    assert_eq!(offsite.times.end, Some(date(2020, 9, 16)));
}

/// ## Summary
/// An event without a start aborts the import before anything is stored.
#[test_log::test]
fn import_rejects_event_without_start() {
    let mut events: Vec<Event> = serde_json::from_str(EVENTS).unwrap();
    events.push(Event::default());
    let mut store = MemoryStore::new();

    let err = import_events(&mut store, &mut codec(), BatchLimits::default(), &events).unwrap_err();

    assert!(matches!(err, DbError::InvalidTimeModel(_)));
    assert_eq!(store.transaction_count(), 0);
}

/// ## Summary
/// Encoding alone produces printable rows without touching a store.
#[test_log::test]
fn encode_produces_json_rows() {
    let events: Vec<Event> = serde_json::from_str(EVENTS).unwrap();

    let rows = encode_events(&mut codec(), &events).unwrap();
    let json = serde_json::to_value(&rows).unwrap();

    assert_eq!(json[0]["values"][keys::EVENT_TIMEZONE], "Europe/Vienna");
    assert_eq!(json[0]["attendees"].as_array().unwrap().len(), 1);
    assert_eq!(json[1]["values"][keys::ALL_DAY], true);
    assert_eq!(json[1]["values"][keys::EVENT_TIMEZONE], "UTC");
}
