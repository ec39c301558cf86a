#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Size-budgeted commits against the in-memory store.

use kunai_test::component::db::row::ColumnValue;

use super::helpers::*;

fn attendee_insert(event_id: i64, n: usize) -> Operation {
    let mut values = Row::new();
    values.insert(
        keys::ATTENDEE_EMAIL.to_string(),
        ColumnValue::Text(format!("guest{n}@example.com")),
    );
    Operation::insert(Table::Attendees, values).with_value(keys::EVENT_ID, event_id)
}

/// ## Summary
/// Thousands of dependent rows for one event are split into several
/// transactions that together affect every row.
#[test_log::test]
fn many_dependent_rows_span_several_transactions() {
    let mut test = TestStore::new();
    let event_id = test.add(&event_at(vienna(2020, 6, 1, 9, 0, 0)));
    let before = test.store.transaction_count();

    let mut batch = BatchOperation::new(BatchLimits {
        budget_bytes: 64 * 1024,
        max_operations: None,
    });
    for n in 0..4000 {
        batch.enqueue(attendee_insert(event_id, n));
    }

    let affected = batch.commit(&mut test.store).unwrap();

    assert_eq!(affected, 4000);
    assert!(batch.is_empty());
    assert!(test.store.transaction_count() - before > 1);
    assert_eq!(test.store.row_count(Table::Attendees), 4000);
    assert_eq!(test.load(event_id).attendees.len(), 4000);
}

/// ## Summary
/// The operation cap splits runs even when the byte budget would allow more.
#[test_log::test]
fn operation_cap_splits_runs() {
    let mut store = MemoryStore::new();
    let mut batch = BatchOperation::new(BatchLimits {
        budget_bytes: 1024 * 1024,
        max_operations: Some(10),
    });
    for n in 0..25 {
        batch.enqueue(attendee_insert(1, n));
    }

    assert_eq!(batch.commit(&mut store).unwrap(), 25);
    assert_eq!(store.transaction_count(), 3);
}

/// ## Summary
/// A single operation larger than the budget fails the commit before any
/// transaction is attempted.
#[test_log::test]
fn oversized_operation_fails_before_any_transaction() {
    let mut store = MemoryStore::new();
    let mut batch = BatchOperation::new(BatchLimits {
        budget_bytes: 4096,
        max_operations: None,
    });
    batch.enqueue(attendee_insert(1, 0));
    batch.enqueue(attendee_insert(1, 1).with_estimated_size(10_000));
    batch.enqueue(attendee_insert(1, 2));

    let err = batch.commit(&mut store).unwrap_err();

    assert!(matches!(
        err,
        DbError::StorageQuotaExceeded {
            index: 1,
            size: 10_000,
            budget: 4096
        }
    ));
    assert_eq!(store.transaction_count(), 0);
    assert_eq!(store.row_count(Table::Attendees), 0);
}

/// ## Summary
/// Events added in one unit of work keep their dependent rows even when the
/// rows land in a later transaction than the event itself.
#[test_log::test]
fn dependents_follow_their_event_across_runs() {
    let mut codec = codec();
    let mut store = MemoryStore::new();
    let mut batch = BatchOperation::new(BatchLimits {
        budget_bytes: 1024 * 1024,
        max_operations: Some(2),
    });

    for title in ["First", "Second"] {
        let mut event = event_at(vienna(2020, 6, 1, 9, 0, 0));
        event.title = Some(title.to_string());
        event.attendees = (0..3)
            .map(|n| Attendee::new(format!("mailto:{title}{n}@example.com")))
            .collect();
        add_event(&mut batch, &codec.encode(&event).unwrap());
    }

    assert_eq!(batch.commit(&mut store).unwrap(), 8);
    assert_eq!(store.transaction_count(), 4);

    for (id, title) in event_ids(&store).unwrap().into_iter().zip(["First", "Second"]) {
        let event = load_event(&store, &mut codec, id).unwrap().unwrap();
        assert_eq!(event.title.as_deref(), Some(title));
        assert_eq!(event.attendees.len(), 3);
    }
}

/// ## Summary
/// A failing transaction stops the commit; earlier transactions stay applied.
#[test_log::test]
fn failure_keeps_committed_runs() {
    let mut store = MemoryStore::new().fail_on_transaction(2);
    let mut batch = BatchOperation::new(BatchLimits {
        budget_bytes: 1024 * 1024,
        max_operations: Some(5),
    });
    for n in 0..15 {
        batch.enqueue(attendee_insert(1, n));
    }

    let err = batch.commit(&mut store).unwrap_err();

    assert!(matches!(
        err,
        DbError::StorageBoundaryError(StorageError::Unavailable(_))
    ));
    assert_eq!(store.transaction_count(), 1);
    assert_eq!(store.row_count(Table::Attendees), 5);
}

/// ## Summary
/// Deleting an event removes its dependent rows in the same unit of work.
#[test_log::test]
fn delete_removes_dependents() {
    let mut test = TestStore::new();
    let mut event = event_at(vienna(2020, 6, 1, 9, 0, 0));
    event.attendees = vec![Attendee::new("mailto:dev@example.com")];
    event.categories = vec!["Work".to_string()];
    let id = test.add(&event);

    let mut batch = BatchOperation::default();
    delete_event(&mut batch, id);
    batch.commit(&mut test.store).unwrap();

    assert!(event_ids(&test.store).unwrap().is_empty());
    assert_eq!(test.store.row_count(Table::Attendees), 0);
    assert_eq!(test.store.row_count(Table::ExtendedProperties), 0);
}
