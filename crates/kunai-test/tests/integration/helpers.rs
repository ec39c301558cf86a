#![allow(dead_code, clippy::expect_used)]
//! Test helpers for integration tests.
//!
//! Provides a codec pinned to a known default zone, event builders and a
//! store wrapper that runs whole units of work.

use chrono::TimeZone;
use chrono_tz::Tz;

pub use kunai_test::component::db::batch::{BatchLimits, BatchOperation, Operation};
pub use kunai_test::component::db::keys;
pub use kunai_test::component::db::map::{EventCodec, TimeCodec};
pub use kunai_test::component::db::query::event::{
    add_event, delete_event, event_ids, load_event, update_event,
};
pub use kunai_test::component::db::row::{Row, Selection, Table};
pub use kunai_test::component::db::store::MemoryStore;
pub use kunai_test::component::db::{DbError, RowStore, StorageError};
pub use kunai_test::rfc::rfc::ical::core::{
    Attendee, Classification, Date, DateList, DateTime, Event, EventTime, EventTimes, Organizer,
};

/// Codec whose floating times resolve to Vienna.
pub fn codec() -> EventCodec {
    EventCodec::with_time_codec(TimeCodec::with_default_zone(Tz::Europe__Vienna))
}

pub fn vienna(y: u16, m: u8, d: u8, h: u8, min: u8, s: u8) -> EventTime {
    DateTime::zoned(y, m, d, h, min, s, "Europe/Vienna").into()
}

pub fn date(y: u16, m: u8, d: u8) -> EventTime {
    Date::new(y, m, d).into()
}

/// Epoch milliseconds of a wall-clock time in Vienna.
pub fn vienna_millis(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Tz::Europe__Vienna
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("unambiguous Vienna time")
        .timestamp_millis()
}

pub fn event_at(start: EventTime) -> Event {
    Event {
        title: Some("Test event".to_string()),
        times: EventTimes::starting_at(start),
        ..Event::default()
    }
}

/// Store plus codec, committing each call as its own unit of work.
pub struct TestStore {
    pub store: MemoryStore,
    pub codec: EventCodec,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            codec: codec(),
        }
    }

    /// Adds an event and returns its id.
    pub fn add(&mut self, event: &Event) -> i64 {
        let mut batch = BatchOperation::default();
        add_event(&mut batch, &self.codec.encode(event).expect("encode event"));
        batch.commit(&mut self.store).expect("commit event");
        *event_ids(&self.store)
            .expect("list events")
            .last()
            .expect("stored event")
    }

    pub fn update(&mut self, id: i64, event: &Event) {
        let mut batch = BatchOperation::default();
        update_event(&mut batch, id, &self.codec.encode(event).expect("encode event"));
        batch.commit(&mut self.store).expect("commit update");
    }

    pub fn load(&mut self, id: i64) -> Event {
        load_event(&self.store, &mut self.codec, id)
            .expect("load event")
            .expect("event exists")
    }

    /// Core row of a stored event.
    pub fn row(&self, id: i64) -> Row {
        self.store
            .query(Table::Events, &Selection::Id(id))
            .expect("query event")
            .into_iter()
            .next()
            .expect("event row")
            .1
    }

    pub fn extended_properties(&self, id: i64) -> Vec<Row> {
        self.store
            .query(Table::ExtendedProperties, &Selection::event(id))
            .expect("query extended properties")
            .into_iter()
            .map(|(_, row)| row)
            .collect()
    }
}
