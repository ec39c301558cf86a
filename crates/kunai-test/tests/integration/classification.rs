#![allow(clippy::unwrap_used)]
//! Classification, organizer and side-record round trips through the store.

use kunai_test::component::constants::UNKNOWN_PROPERTY_NAME;
use kunai_test::component::db::enums::AccessLevel;
use kunai_test::component::db::row::{integer, text};
use kunai_test::rfc::rfc::ical::core::UnknownProperty;

use super::helpers::*;

fn classified(classification: &str) -> Event {
    let mut event = event_at(vienna(2020, 6, 1, 9, 0, 0));
    event.classification = Some(Classification::parse(classification));
    event
}

fn unknown_property_rows(test: &TestStore, id: i64) -> Vec<Row> {
    test.extended_properties(id)
        .into_iter()
        .filter(|row| text(row, keys::NAME) == Some(UNKNOWN_PROPERTY_NAME))
        .collect()
}

/// ## Summary
/// Public and private fit the access-level column and need no side record.
#[test_log::test]
fn exact_classifications_have_no_side_record() {
    let mut test = TestStore::new();

    for (value, level) in [("PUBLIC", AccessLevel::Public), ("PRIVATE", AccessLevel::Private)] {
        let id = test.add(&classified(value));

        assert_eq!(integer(&test.row(id), keys::ACCESS_LEVEL), Some(level.code()));
        assert!(unknown_property_rows(&test, id).is_empty());
        assert_eq!(test.load(id).classification, Some(Classification::parse(value)));
    }
}

/// ## Summary
/// Confidential is stored with its code and preserved in a side record.
#[test_log::test]
fn confidential_round_trips() {
    let mut test = TestStore::new();
    let id = test.add(&classified("CONFIDENTIAL"));

    assert_eq!(
        integer(&test.row(id), keys::ACCESS_LEVEL),
        Some(AccessLevel::Confidential.code())
    );
    assert_eq!(unknown_property_rows(&test, id).len(), 1);

    let loaded = test.load(id);
    assert_eq!(loaded.classification, Some(Classification::CONFIDENTIAL));
    assert!(loaded.unknown_properties.is_empty());
}

/// ## Summary
/// An extension token takes the private code and keeps its text.
#[test_log::test]
fn extension_token_round_trips() {
    let mut test = TestStore::new();
    let id = test.add(&classified("X-INTERNAL"));

    assert_eq!(
        integer(&test.row(id), keys::ACCESS_LEVEL),
        Some(AccessLevel::Private.code())
    );
    assert_eq!(
        test.load(id).classification,
        Some(Classification::parse("X-INTERNAL"))
    );
}

/// ## Summary
/// Updating to an exact classification removes the stale side record.
#[test_log::test]
fn update_clears_stale_side_record() {
    let mut test = TestStore::new();
    let id = test.add(&classified("X-INTERNAL"));
    assert_eq!(unknown_property_rows(&test, id).len(), 1);

    test.update(id, &classified("PUBLIC"));

    assert!(unknown_property_rows(&test, id).is_empty());
    assert_eq!(test.load(id).classification, Some(Classification::PUBLIC));
}

/// ## Summary
/// Updating an event keeps extended properties written by other writers.
#[test_log::test]
fn update_keeps_foreign_extended_properties() {
    let mut test = TestStore::new();
    let id = test.add(&classified("X-INTERNAL"));

    let mut foreign = Row::new();
    foreign.insert(keys::NAME.to_string(), "vnd.example.sync-state".into());
    foreign.insert(keys::VALUE.to_string(), "etag-17".into());
    let mut batch = BatchOperation::default();
    batch.enqueue(Operation::insert(Table::ExtendedProperties, foreign).with_value(keys::EVENT_ID, id));
    batch.commit(&mut test.store).unwrap();

    let mut renamed = classified("PUBLIC");
    renamed.title = Some("Renamed".to_string());
    test.update(id, &renamed);

    let names: Vec<_> = test
        .extended_properties(id)
        .iter()
        .filter_map(|row| text(row, keys::NAME).map(str::to_string))
        .collect();
    assert_eq!(names, ["vnd.example.sync-state"]);

    let loaded = test.load(id);
    assert_eq!(loaded.title.as_deref(), Some("Renamed"));
    assert_eq!(loaded.classification, Some(Classification::PUBLIC));
}

/// ## Summary
/// The organizer is stored only for events with attendees.
#[test_log::test]
fn organizer_requires_attendees() {
    let mut test = TestStore::new();
    let mut event = event_at(vienna(2020, 6, 1, 9, 0, 0));
    event.organizer = Some(Organizer::new("mailto:boss@example.com"));

    let solo = test.add(&event);
    assert_eq!(text(&test.row(solo), keys::ORGANIZER), None);
    assert_eq!(test.load(solo).organizer, None);

    event.attendees = vec![
        Attendee::new("mailto:boss@example.com"),
        Attendee::new("mailto:dev@example.com"),
    ];
    let group = test.add(&event);
    assert_eq!(text(&test.row(group), keys::ORGANIZER), Some("boss@example.com"));

    let loaded = test.load(group);
    assert_eq!(loaded.organizer, Some(Organizer::new("mailto:boss@example.com")));
    let uris: Vec<_> = loaded.attendees.iter().map(|a| a.uri.as_str()).collect();
    assert_eq!(uris, ["mailto:boss@example.com", "mailto:dev@example.com"]);
}

/// ## Summary
/// Categories, URL and unknown properties come back from their side records.
#[test_log::test]
fn side_records_round_trip() {
    let mut test = TestStore::new();
    let mut event = event_at(vienna(2020, 6, 1, 9, 0, 0));
    event.categories = vec!["Work".to_string(), "Planning".to_string()];
    event.url = Some("https://example.com/meeting".to_string());
    event.unknown_properties = vec![UnknownProperty {
        name: "X-MEETING-ROOM".to_string(),
        value: "4.12".to_string(),
        parameters: vec![("X-FLOOR".to_string(), "4".to_string())],
    }];

    let id = test.add(&event);
    let loaded = test.load(id);

    assert_eq!(loaded.categories, event.categories);
    assert_eq!(loaded.url, event.url);
    assert_eq!(loaded.unknown_properties, event.unknown_properties);
}
