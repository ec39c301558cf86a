//! Imports events from JSON through the codec and batcher.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use kunai_db::db::RowStore;
use kunai_db::db::batch::{BatchLimits, BatchOperation};
use kunai_db::db::map::{EncodedEvent, EventCodec};
use kunai_db::db::query::event::{add_event, event_ids, load_event};
use kunai_db::db::row::Row;
use kunai_db::error::DbResult;
use kunai_rfc::rfc::ical::core::Event;

/// ## Summary
/// Reads a JSON array of events.
///
/// ## Errors
/// Returns an error if the file cannot be opened or is not a JSON event array.
pub fn read_events(path: &Path) -> anyhow::Result<Vec<Event>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing events from {}", path.display()))
}

/// Stored rows of one event, printable as JSON.
#[derive(Debug, Serialize)]
pub struct EncodedRows {
    pub values: Row,
    pub attendees: Vec<Row>,
    pub reminders: Vec<Row>,
    pub extended_properties: Vec<Row>,
}

impl From<EncodedEvent> for EncodedRows {
    fn from(encoded: EncodedEvent) -> Self {
        Self {
            values: encoded.values,
            attendees: encoded.attendees,
            reminders: encoded.reminders,
            extended_properties: encoded.extended_properties,
        }
    }
}

/// ## Summary
/// Encodes events without storing them.
///
/// ## Errors
/// Returns the first encoding failure, e.g. `DbError::InvalidTimeModel`.
pub fn encode_events(codec: &mut EventCodec, events: &[Event]) -> DbResult<Vec<EncodedRows>> {
    events
        .iter()
        .map(|event| codec.encode(event).map(EncodedRows::from))
        .collect()
}

/// Outcome of an import.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub affected_rows: usize,
    /// Every stored event, decoded back from its rows.
    pub events: Vec<Event>,
}

/// ## Summary
/// Writes all events in one unit of work and reads every stored event back.
///
/// ## Errors
/// - `DbError::InvalidTimeModel` if an event has no start; nothing is written then.
/// - `DbError::StorageQuotaExceeded` if one row cannot fit a transaction.
/// - `DbError::StorageBoundaryError` if the store rejects a transaction.
#[tracing::instrument(skip_all, fields(events = events.len()))]
pub fn import_events<S: RowStore + ?Sized>(
    store: &mut S,
    codec: &mut EventCodec,
    limits: BatchLimits,
    events: &[Event],
) -> DbResult<ImportReport> {
    let mut batch = BatchOperation::new(limits);
    for event in events {
        add_event(&mut batch, &codec.encode(event)?);
    }

    tracing::debug!(operations = batch.len(), "Events encoded");
    let affected_rows = batch.commit(store)?;
    tracing::info!(affected_rows, "Events imported");

    let mut stored = Vec::new();
    for id in event_ids(store)? {
        if let Some(event) = load_event(store, codec, id)? {
            stored.push(event);
        }
    }

    Ok(ImportReport {
        affected_rows,
        events: stored,
    })
}
