//! Event writes through a `BatchOperation` and reads from a `RowStore`.

use kunai_rfc::rfc::ical::core::Event;

use crate::db::RowStore;
use crate::db::batch::{BatchOperation, Operation};
use crate::db::keys;
use crate::db::map::{EncodedEvent, EventCodec, EventRows, OWNED_EXTENDED_PROPERTIES};
use crate::db::row::{Row, Selection, Table};
use crate::error::DbResult;

/// Tables holding rows that belong to an event.
const DEPENDENT_TABLES: [Table; 3] = [Table::Attendees, Table::Reminders, Table::ExtendedProperties];

/// How dependent rows find their event.
#[derive(Debug, Clone, Copy)]
enum EventLink {
    /// The event is inserted by this batch operation.
    Pending(usize),
    /// The event is already stored under this id.
    Stored(i64),
}

fn enqueue_dependents(batch: &mut BatchOperation, link: EventLink, encoded: &EncodedEvent) {
    let dependents = [
        (Table::Attendees, &encoded.attendees),
        (Table::Reminders, &encoded.reminders),
        (Table::ExtendedProperties, &encoded.extended_properties),
    ];

    for (table, rows) in dependents {
        for values in rows {
            let operation = Operation::insert(table, values.clone());
            batch.enqueue(match link {
                EventLink::Pending(index) => operation.with_back_reference(keys::EVENT_ID, index),
                EventLink::Stored(id) => operation.with_value(keys::EVENT_ID, id),
            });
        }
    }
}

/// ## Summary
/// Enqueues the insertion of an event and its dependent rows.
///
/// Returns the batch index of the core row insert.
pub fn add_event(batch: &mut BatchOperation, encoded: &EncodedEvent) -> usize {
    let event = batch.enqueue(Operation::insert(Table::Events, encoded.values.clone()));
    enqueue_dependents(batch, EventLink::Pending(event), encoded);
    tracing::debug!(
        index = event,
        attendees = encoded.attendees.len(),
        reminders = encoded.reminders.len(),
        "Enqueued event insert"
    );
    event
}

/// ## Summary
/// Enqueues an update of a stored event.
///
/// The core row is overwritten column by column. Attendees and reminders are
/// replaced. Of the extended properties only the codec's own names are
/// replaced, which also removes a stale classification side record; rows
/// stored under other names are kept.
#[tracing::instrument(skip(batch, encoded))]
pub fn update_event(batch: &mut BatchOperation, id: i64, encoded: &EncodedEvent) {
    batch.enqueue(Operation::update(
        Table::Events,
        Selection::Id(id),
        encoded.values.clone(),
    ));
    batch.enqueue(Operation::delete(Table::Attendees, Selection::event(id)));
    batch.enqueue(Operation::delete(Table::Reminders, Selection::event(id)));
    batch.enqueue(Operation::delete(
        Table::ExtendedProperties,
        Selection::And(vec![
            Selection::event(id),
            Selection::one_of(keys::NAME, OWNED_EXTENDED_PROPERTIES),
        ]),
    ));
    enqueue_dependents(batch, EventLink::Stored(id), encoded);
}

/// Enqueues the removal of a stored event and its dependent rows.
#[tracing::instrument(skip(batch))]
pub fn delete_event(batch: &mut BatchOperation, id: i64) {
    for table in DEPENDENT_TABLES {
        batch.enqueue(Operation::delete(table, Selection::event(id)));
    }
    batch.enqueue(Operation::delete(Table::Events, Selection::Id(id)));
}

fn dependent_rows<S: RowStore + ?Sized>(store: &S, table: Table, id: i64) -> DbResult<Vec<Row>> {
    Ok(store
        .query(table, &Selection::event(id))?
        .into_iter()
        .map(|(_, values)| values)
        .collect())
}

/// ## Summary
/// Reads and decodes a stored event.
///
/// ## Errors
/// - `DbError::StorageBoundaryError` if the store cannot be read.
/// - `DbError::InvalidTimeModel` if the stored row lacks its time columns.
#[tracing::instrument(skip(store, codec))]
pub fn load_event<S: RowStore + ?Sized>(
    store: &S,
    codec: &mut EventCodec,
    id: i64,
) -> DbResult<Option<Event>> {
    let Some((_, values)) = store
        .query(Table::Events, &Selection::Id(id))?
        .into_iter()
        .next()
    else {
        return Ok(None);
    };

    let rows = EventRows {
        values,
        attendees: dependent_rows(store, Table::Attendees, id)?,
        reminders: dependent_rows(store, Table::Reminders, id)?,
        extended_properties: dependent_rows(store, Table::ExtendedProperties, id)?,
    };
    codec.decode(&rows).map(Some)
}

/// ## Summary
/// Returns the ids of all stored events in ascending order.
///
/// ## Errors
/// Returns `DbError::StorageBoundaryError` if the store cannot be read.
pub fn event_ids<S: RowStore + ?Sized>(store: &S) -> DbResult<Vec<i64>> {
    Ok(store
        .query(Table::Events, &Selection::All)?
        .into_iter()
        .map(|(id, _)| id)
        .collect())
}
