use chrono::NaiveDate;
use sqlx::FromRow;

use crate::event::{Event, NaturalKey};

#[derive(FromRow)]
pub(super) struct EventRow {
    id: i64,
    title: String,
    date: NaiveDate,
    location: String,
    liked: bool,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: Some(row.id),
            title: row.title,
            date: row.date,
            location: row.location,
            liked: row.liked,
        }
    }
}

#[derive(FromRow)]
pub(super) struct TombstoneRow {
    title: String,
    date: NaiveDate,
}

impl From<TombstoneRow> for NaturalKey {
    fn from(row: TombstoneRow) -> Self {
        NaturalKey::new(row.title, row.date)
    }
}
